//! # Picweave
//!
//! Responsive media markup generation with a fingerprint-keyed lazy render
//! cache. Given the logical identity of an image or video — a primary or
//! light/dark source pair, alt text, per-breakpoint width hints — Picweave
//! deterministically produces the full `<picture>`/`<video>` fragment
//! enumerating every `(format × width × color-scheme)` source variant, and
//! wraps any page component in a lazy-activation pattern that builds its
//! subtree only once visible and reuses it while its configuration is
//! unchanged.
//!
//! # Architecture: Generator + Cache
//!
//! Two cooperating mechanisms, deliberately independent:
//!
//! ```text
//! 1. Markup generator   MediaRequest  →  maud fragment     (pure, deterministic)
//! 2. Render cache       AttributeSet  →  fingerprint  →  cached subtree
//! ```
//!
//! The generator is a pure function: no I/O, no document, byte-identical
//! output for equal input. The cache wraps any component: it activates on
//! first viewport intersection, fingerprints the component's recognized
//! attributes, and rebuilds only when the fingerprint changes. The two meet
//! in concrete components, which ask the generator for media fragments
//! inside their `build` step.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`tables`] | Width buckets, format preference order, breakpoints, themes |
//! | [`request`] | [`MediaRequest`](request::MediaRequest), source resolution, base-name derivation |
//! | [`markup`] | `<picture>`/`<video>` generators and the `sizes` builder |
//! | [`attrs`] | Attribute normalization and SHA-256 fingerprints |
//! | [`cache`] | Per-instance fingerprint-keyed render cache |
//! | [`watcher`] | Shared one-shot viewport intersection watcher |
//! | [`component`] | `Component` trait and the `Lazy` activation wrapper |
//! | [`config`] | Site-wide defaults from a JSON document |
//!
//! # Design Decisions
//!
//! ## Maud Over String Templating
//!
//! Fragments are built with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro, instead of string concatenation with per-call-site attribute
//! whitelisting. All interpolation is auto-escaped and attribute filtering
//! lives in one place, so escaping bugs are a compile-time concern rather
//! than an audit of every component.
//!
//! ## Ordering Is a Contract
//!
//! Browsers select the first matching `<source>`, so variant order —
//! most-modern format first, light before dark, ascending widths — is a
//! correctness requirement. The tables in [`tables`] fix that order in one
//! place and the generators iterate them; nothing sorts at render time.
//!
//! ## One Watcher Per Page
//!
//! Lazy components share a single [`watcher::ViewportWatcher`] passed in by
//! the page owner. The watcher is a plain value, not a static singleton, so
//! tests drive visibility by moving a viewport rectangle instead of mocking
//! a browser.
//!
//! ## Recoverable by Default
//!
//! A half-specified theme pair reduces to a primary source, an out-of-range
//! width hint clamps, a missing source renders the fixed placeholder, and a
//! failed build renders a deterministic error block — each with a logged
//! warning or error. One broken media block must never blank the page.

pub mod attrs;
pub mod cache;
pub mod component;
pub mod config;
pub mod markup;
pub mod request;
pub mod tables;
pub mod watcher;

pub use attrs::AttributeSet;
pub use component::{Component, Lazy};
pub use markup::{generate_picture_markup, generate_video_markup};
pub use request::MediaRequest;
pub use watcher::ViewportWatcher;
