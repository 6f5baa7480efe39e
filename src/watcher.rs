//! Shared viewport intersection watcher.
//!
//! Lazy components defer their first render until they are about to enter
//! the viewport. One watcher instance serves every component on a page — a
//! page with hundreds of components must not allocate hundreds of native
//! observers, so the watcher is a page-scoped service that components
//! register with and that owners pass in explicitly (dependency injection,
//! not static state, so tests can drive visibility deterministically).
//!
//! ## One-shot semantics
//!
//! An entry fires at most once: as soon as its rectangle intersects the
//! viewport expanded by the fixed [`LOOKAHEAD_MARGIN`], the entry is removed
//! and its id is reported to the caller. Components that disconnect before
//! becoming visible call [`ViewportWatcher::unobserve`] so a stale entry can
//! never fire later.

use std::collections::BTreeMap;

use crate::tables::LOOKAHEAD_MARGIN;

/// Identifier handed out at registration, used to release the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchId(u64);

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow the rectangle by `margin` on every side.
    fn expand(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Page-scoped intersection watcher with one-shot delivery.
#[derive(Debug)]
pub struct ViewportWatcher {
    viewport: Rect,
    margin: f64,
    entries: BTreeMap<WatchId, Rect>,
    next_id: u64,
}

impl ViewportWatcher {
    /// Create a watcher for an initial viewport, with the standard
    /// look-ahead margin.
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            margin: LOOKAHEAD_MARGIN,
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Register a one-shot entry for an element's bounding box. The entry
    /// does not fire until the next [`Self::poll`] or [`Self::set_viewport`],
    /// even if the element is already visible: observer callbacks arrive on
    /// the next event-loop turn, never re-entrantly during registration.
    pub fn observe(&mut self, bounds: Rect) -> WatchId {
        let id = WatchId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, bounds);
        id
    }

    /// Release an entry that has not fired yet. Releasing an already-fired
    /// or unknown id is a no-op.
    pub fn unobserve(&mut self, id: WatchId) {
        self.entries.remove(&id);
    }

    /// Move the viewport (scroll/resize) and collect the entries that became
    /// visible. Fired entries are removed.
    pub fn set_viewport(&mut self, viewport: Rect) -> Vec<WatchId> {
        self.viewport = viewport;
        self.poll()
    }

    /// Re-check the current viewport without moving it. Used right after
    /// registration for elements already on screen at connect time.
    pub fn poll(&mut self) -> Vec<WatchId> {
        let lookahead = self.viewport.expand(self.margin);
        let fired: Vec<WatchId> = self
            .entries
            .iter()
            .filter(|(_, bounds)| lookahead.intersects(bounds))
            .map(|(id, _)| *id)
            .collect();
        for id in &fired {
            self.entries.remove(id);
        }
        fired
    }

    /// Number of entries still waiting to fire.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
