//! Lazy-activation wrapper composing a component with the render cache.
//!
//! A component here is anything that can report its configuration as an
//! [`AttributeSet`] and build a markup subtree from it. [`Lazy`] wraps such
//! a component with the behavior every lazily-rendered block on a page
//! shares:
//!
//! ```text
//! Unobserved → Observing → Visible → Initialized → (re-render)* → Disconnected
//! ```
//!
//! - **Observing**: registered with the page's shared [`ViewportWatcher`].
//! - **Visible**: fires exactly once when the watcher reports intersection;
//!   duplicate signals are ignored (re-entrancy guard).
//! - **Initialized**: attributes are normalized, fingerprinted, and the
//!   subtree is served from the [`RenderCache`] or freshly built.
//! - **Re-render**: an attribute mutation recomputes the fingerprint; an
//!   unchanged fingerprint is a no-op, a changed one invalidates and runs a
//!   fresh build-or-hit cycle.
//! - **Disconnected**: the watcher entry is released, the cache cleared, and
//!   the component's recurring work cancelled. A disconnected instance never
//!   builds again.
//!
//! A build failure is caught here: the instance renders a deterministic
//! fallback block instead of leaving a broken subtree, the error is logged,
//! and the fallback is never cached. One broken component must not take the
//! page down with it.

use maud::{Markup, html};
use thiserror::Error;
use tracing::{error, warn};

use crate::attrs::AttributeSet;
use crate::cache::{CacheStats, CachedSubtree, RenderCache};
use crate::watcher::{Rect, ViewportWatcher, WatchId};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("build failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Markup(#[from] crate::request::MarkupError),
}

/// A renderable page component.
pub trait Component {
    /// Current normalized configuration. Called on every render attempt.
    fn attributes(&self) -> AttributeSet;

    /// Build the subtree for a configuration. Pure with respect to the
    /// page: returns markup, mutates only internal state.
    fn build(&mut self, attrs: &AttributeSet) -> Result<Markup, BuildError>;

    /// Cancel recurring work owned by the instance (autoplay timers, theme
    /// listeners). Called once on disconnect.
    fn cancel_recurring(&mut self) {}
}

/// Lifecycle phase of a lazy instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unobserved,
    Observing,
    Initialized,
    Disconnected,
}

/// Lazy-activation wrapper around a [`Component`].
#[derive(Debug)]
pub struct Lazy<C> {
    component: C,
    phase: Phase,
    cache: RenderCache,
    watch: Option<WatchId>,
    /// Subtree currently spliced into the page, if any.
    current: Option<CachedSubtree>,
}

impl<C: Component> Lazy<C> {
    pub fn new(component: C) -> Self {
        Self {
            component,
            phase: Phase::Unobserved,
            cache: RenderCache::new(),
            watch: None,
            current: None,
        }
    }

    /// Register with the page's shared watcher. The instance renders
    /// nothing until the watcher reports it visible.
    pub fn connect(&mut self, watcher: &mut ViewportWatcher, bounds: Rect) {
        if self.phase != Phase::Unobserved {
            warn!(phase = ?self.phase, "connect ignored: instance already connected");
            return;
        }
        self.watch = Some(watcher.observe(bounds));
        self.phase = Phase::Observing;
    }

    /// Watcher entry for routing fired ids back to this instance.
    pub fn watch_id(&self) -> Option<WatchId> {
        self.watch
    }

    /// Visibility signal from the watcher. Runs the first render and
    /// returns the subtree to splice into the page. Duplicate signals after
    /// initialization are ignored, as is any signal after disconnect.
    pub fn notify_visible(&mut self) -> Option<CachedSubtree> {
        match self.phase {
            Phase::Unobserved | Phase::Observing => {
                // The watcher entry is one-shot; it is spent now.
                self.watch = None;
                self.phase = Phase::Initialized;
                Some(self.render())
            }
            Phase::Initialized => None,
            Phase::Disconnected => {
                warn!("visibility signal for a disconnected instance ignored");
                None
            }
        }
    }

    /// Attribute-mutation signal. Recomputes the fingerprint; when
    /// unchanged nothing happens, when changed the cache is invalidated and
    /// a fresh build-or-hit cycle runs. Returns the replacement subtree when
    /// one was produced.
    pub fn attributes_changed(&mut self) -> Option<CachedSubtree> {
        if self.phase != Phase::Initialized {
            return None;
        }
        let fingerprint = self.component.attributes().fingerprint();
        if self.cache.cached_fingerprint() == Some(fingerprint.as_str()) {
            return None;
        }
        self.cache.invalidate();
        Some(self.render())
    }

    /// Re-render request with the configuration unchanged (sibling
    /// mutation, layout pass). Runs a build-or-hit cycle; with an unchanged
    /// fingerprint this serves the cached clone without calling `build`.
    pub fn rerender(&mut self) -> Option<CachedSubtree> {
        if self.phase != Phase::Initialized {
            return None;
        }
        Some(self.render())
    }

    /// Removal from the page: release the watcher entry, clear the cache,
    /// cancel recurring work. Terminal.
    pub fn disconnect(&mut self, watcher: &mut ViewportWatcher) {
        if let Some(id) = self.watch.take() {
            watcher.unobserve(id);
        }
        self.cache.invalidate();
        self.current = None;
        self.component.cancel_recurring();
        self.phase = Phase::Disconnected;
    }

    /// Build-or-hit cycle for the current attributes.
    fn render(&mut self) -> CachedSubtree {
        let attrs = self.component.attributes();
        let fingerprint = attrs.fingerprint();
        let subtree = match self.cache.lookup(&fingerprint) {
            Some(cached) => cached,
            None => match self.component.build(&attrs) {
                Ok(markup) => {
                    let subtree = CachedSubtree {
                        html: markup.into_string(),
                    };
                    self.cache.store(fingerprint, subtree.clone());
                    subtree
                }
                Err(err) => {
                    // Never cached: the next cycle retries the build.
                    error!(%err, "component build failed, rendering fallback");
                    CachedSubtree {
                        html: fallback_subtree().into_string(),
                    }
                }
            },
        };
        self.current = Some(subtree.clone());
        subtree
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Subtree currently in the page, if the instance has rendered.
    pub fn current(&self) -> Option<&CachedSubtree> {
        self.current.as_ref()
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }
}

/// Deterministic block substituted when a build fails.
pub fn fallback_subtree() -> Markup {
    html! {
        div class="render-error" {
            h2 { "Error loading content" }
            p { "This section could not be displayed." }
        }
    }
}
