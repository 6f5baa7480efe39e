//! Width-hint parsing and the `sizes` attribute.
//!
//! Each request carries three width hints (mobile/tablet/desktop), either
//! viewport-relative (`50vw`) or an absolute CSS length (`480px`). The
//! `sizes` attribute emits one descriptor per breakpoint class plus a final
//! absolute fallback for viewports beyond the largest breakpoint, resolved
//! from the desktop hint against the largest width bucket.
//!
//! Out-of-range viewport percentages are clamped into
//! [`MIN_VIEWPORT_WIDTH`]..=[`MAX_VIEWPORT_WIDTH`] rather than rejected;
//! unparseable hints fall back to `100vw`. Both recoveries log a warning and
//! continue — a bad width hint must never break a page.

use tracing::warn;

use crate::tables::{
    BreakpointClass, MAX_VIEWPORT_WIDTH, MIN_VIEWPORT_WIDTH, is_safe_css_length, largest_width,
};

/// A parsed responsive width hint.
#[derive(Debug, Clone, PartialEq)]
pub enum WidthHint {
    /// Viewport-relative width in vw, already clamped.
    Viewport(f64),
    /// Absolute CSS length, passed through verbatim.
    Absolute(String),
}

impl WidthHint {
    /// Parse and normalize a hint string.
    ///
    /// `"50vw"` → `Viewport(50.0)` (clamped to 10..=200),
    /// `"480px"`/`"30rem"` → `Absolute`, anything unsafe or unparseable →
    /// `Viewport(100.0)` with a warning.
    pub fn parse(value: &str) -> WidthHint {
        let trimmed = value.trim();
        if let Some(number) = trimmed.strip_suffix("vw") {
            match number.parse::<f64>() {
                Ok(vw) if vw.is_finite() => {
                    let clamped = vw.clamp(MIN_VIEWPORT_WIDTH, MAX_VIEWPORT_WIDTH);
                    if clamped != vw {
                        warn!(value = trimmed, clamped, "viewport width hint clamped");
                    }
                    return WidthHint::Viewport(clamped);
                }
                _ => {}
            }
        } else if is_safe_css_length(trimmed) && trimmed.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return WidthHint::Absolute(trimmed.to_string());
        }
        warn!(value = trimmed, "unparseable width hint, defaulting to 100vw");
        WidthHint::Viewport(100.0)
    }

    /// Render as a `sizes` value.
    pub fn to_css(&self) -> String {
        match self {
            WidthHint::Viewport(vw) => format!("{}vw", trim_float(*vw)),
            WidthHint::Absolute(value) => value.clone(),
        }
    }

    /// Resolve against an assumed viewport width, for the absolute fallback
    /// descriptor.
    fn resolve_px(&self, viewport: u32) -> String {
        match self {
            WidthHint::Viewport(vw) => {
                let px = (f64::from(viewport) * vw / 100.0).round() as u32;
                format!("{}px", px)
            }
            WidthHint::Absolute(value) => value.clone(),
        }
    }
}

/// Render a float without a trailing `.0` so `50.0` prints as `50`.
fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Build the `sizes` attribute from the three breakpoint hints.
///
/// One media-conditioned descriptor per bounded breakpoint, then the desktop
/// hint, then the absolute fallback beyond the largest bucket. The desktop
/// descriptor and the fallback collapse into one entry when the desktop hint
/// is already absolute.
pub fn sizes_attribute(mobile: &WidthHint, tablet: &WidthHint, desktop: &WidthHint) -> String {
    let mut parts = Vec::with_capacity(4);
    for (class, hint) in [
        (BreakpointClass::Mobile, mobile),
        (BreakpointClass::Tablet, tablet),
    ] {
        // Bounded classes always have a max width.
        if let Some(max) = class.max_width() {
            parts.push(format!("(max-width: {}px) {}", max, hint.to_css()));
        }
    }
    match desktop {
        WidthHint::Viewport(_) => {
            parts.push(format!(
                "(max-width: {}px) {}",
                largest_width(),
                desktop.to_css()
            ));
            parts.push(desktop.resolve_px(largest_width()));
        }
        WidthHint::Absolute(value) => parts.push(value.clone()),
    }
    parts.join(", ")
}
