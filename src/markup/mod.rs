//! Responsive markup generation.
//!
//! The generators in this module are pure functions from a
//! [`MediaRequest`](crate::request::MediaRequest) to a `maud::Markup`
//! fragment: no I/O, no document, deterministic output. Identical requests
//! produce byte-identical fragments, so callers can cache rendered output
//! keyed on the request's fingerprint.
//!
//! | Submodule | Role |
//! |-----------|------|
//! | [`sizes`] | Width-hint parsing, clamping, and the `sizes` attribute |
//! | [`picture`] | `<picture>` fragments: format × width × theme source matrix |
//! | [`video`] | `<video>` fragments with the same theming and format rules |

pub mod picture;
pub mod sizes;
pub mod video;

pub use picture::generate_picture_markup;
pub use video::{VideoOptions, generate_video_markup};
