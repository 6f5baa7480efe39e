//! Shared constant tables for responsive markup generation.
//!
//! Everything else in the crate derives its variant matrices from the fixed
//! tables in this module: the ascending pixel-width buckets, the
//! preference-ordered media formats, the three breakpoint classes, and the
//! supported aspect ratios. Keeping them in one place makes the generator's
//! ordering guarantees auditable: a `<picture>` element's source order is a
//! correctness requirement (browsers take the first matching `<source>`),
//! not cosmetics.
//!
//! ## Width buckets
//!
//! Responsive variants are generated for a fixed ascending list of pixel
//! widths. The asset pipeline is expected to publish a file at
//! `{directory}/{stem}-{width}.{ext}` for every width/format combination,
//! plus the unsuffixed primary file for non-responsive contexts. The
//! generator constructs URLs by this convention; it never checks that the
//! files exist.
//!
//! ## Format preference
//!
//! Formats are enumerated most-efficient-first so that first-match-wins
//! source selection prefers the best format the browser supports. The
//! fallback `<img>` always points at the unsuffixed primary file, so no
//! legacy-format variant row is needed.

use std::fmt;

/// Ascending pixel-width buckets for responsive variants.
///
/// Matches common device classes: tablet portrait, tablet landscape, laptop,
/// full HD, QHD, and 4K.
pub const RESPONSIVE_WIDTHS: [u32; 6] = [768, 1024, 1366, 1920, 2560, 3840];

/// Look-ahead margin (px) applied around the viewport when deciding whether
/// a lazy component should start rendering.
pub const LOOKAHEAD_MARGIN: f64 = 50.0;

/// Fixed placeholder image emitted when a request resolves to no usable
/// source. Deterministic so callers and tests can rely on it.
pub const PLACEHOLDER_SRC: &str = "/images/placeholder.webp";

/// Alt text for the placeholder when the request carries none.
pub const PLACEHOLDER_ALT: &str = "Image unavailable";

/// Lower/upper clamp bounds for viewport-relative width hints, in vw.
pub const MIN_VIEWPORT_WIDTH: f64 = 10.0;
pub const MAX_VIEWPORT_WIDTH: f64 = 200.0;

/// Image formats enumerated in `<picture>` elements, most efficient first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Avif,
    Webp,
}

impl ImageFormat {
    /// All formats in emission order (most-modern-first).
    pub const PREFERENCE_ORDER: [ImageFormat; 2] = [ImageFormat::Avif, ImageFormat::Webp];

    /// File extension used by the `{stem}-{width}.{ext}` convention.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Avif => "avif",
            ImageFormat::Webp => "webp",
        }
    }

    /// MIME type for the `<source type="...">` attribute.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Avif => "image/avif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

/// Video container formats, most efficient first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Webm,
    Mp4,
}

impl VideoFormat {
    pub const PREFERENCE_ORDER: [VideoFormat; 2] = [VideoFormat::Webm, VideoFormat::Mp4];

    pub fn extension(self) -> &'static str {
        match self {
            VideoFormat::Webm => "webm",
            VideoFormat::Mp4 => "mp4",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            VideoFormat::Webm => "video/webm",
            VideoFormat::Mp4 => "video/mp4",
        }
    }
}

/// Discrete viewport-width buckets used to select a responsive sizing hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointClass {
    Mobile,
    Tablet,
    Desktop,
}

impl BreakpointClass {
    /// Upper bound of the bucket in CSS pixels. Desktop is open-ended; its
    /// `sizes` entry is the unconditioned final descriptor.
    pub fn max_width(self) -> Option<u32> {
        match self {
            BreakpointClass::Mobile => Some(768),
            BreakpointClass::Tablet => Some(1024),
            BreakpointClass::Desktop => None,
        }
    }
}

/// Largest width bucket, used to resolve the absolute `sizes` fallback for
/// viewports beyond every breakpoint.
pub fn largest_width() -> u32 {
    RESPONSIVE_WIDTHS[RESPONSIVE_WIDTHS.len() - 1]
}

/// User color-scheme preference, in emission order (light before dark).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const EMISSION_ORDER: [Theme; 2] = [Theme::Light, Theme::Dark];

    /// Media condition gating themed `<source>` variants.
    pub fn media_condition(self) -> &'static str {
        match self {
            Theme::Light => "(prefers-color-scheme: light)",
            Theme::Dark => "(prefers-color-scheme: dark)",
        }
    }
}

/// Supported aspect ratios for the fallback element's intrinsic sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Square,
    FourThree,
    ThreeFour,
    SixteenNine,
    NineSixteen,
    UltraWide,
}

impl AspectRatio {
    /// Parse an attribute value like `"16/9"`. Unknown ratios are `None`;
    /// the caller decides whether to warn.
    pub fn parse(value: &str) -> Option<AspectRatio> {
        match value.trim() {
            "1/1" => Some(AspectRatio::Square),
            "4/3" => Some(AspectRatio::FourThree),
            "3/4" => Some(AspectRatio::ThreeFour),
            "16/9" => Some(AspectRatio::SixteenNine),
            "9/16" => Some(AspectRatio::NineSixteen),
            "21/9" => Some(AspectRatio::UltraWide),
            _ => None,
        }
    }

    /// CSS `aspect-ratio` property value.
    pub fn to_css(self) -> &'static str {
        match self {
            AspectRatio::Square => "1 / 1",
            AspectRatio::FourThree => "4 / 3",
            AspectRatio::ThreeFour => "3 / 4",
            AspectRatio::SixteenNine => "16 / 9",
            AspectRatio::NineSixteen => "9 / 16",
            AspectRatio::UltraWide => "21 / 9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_css())
    }
}

/// Check that a CSS length value contains only characters a length may use.
///
/// This is a whitelist, not a parser: it rejects anything that could break
/// out of an attribute or style context (`;`, quotes, parens). Accepts
/// values like `100vw`, `24px`, `1.5rem`, `50%`.
pub fn is_safe_css_length(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '%' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_are_ascending() {
        for pair in RESPONSIVE_WIDTHS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn format_order_is_most_modern_first() {
        assert_eq!(ImageFormat::PREFERENCE_ORDER[0], ImageFormat::Avif);
        assert_eq!(ImageFormat::PREFERENCE_ORDER[1], ImageFormat::Webp);
    }

    #[test]
    fn video_format_order() {
        assert_eq!(VideoFormat::PREFERENCE_ORDER[0], VideoFormat::Webm);
    }

    #[test]
    fn theme_order_is_light_first() {
        assert_eq!(Theme::EMISSION_ORDER[0], Theme::Light);
        assert_eq!(
            Theme::Dark.media_condition(),
            "(prefers-color-scheme: dark)"
        );
    }

    #[test]
    fn breakpoint_bounds() {
        assert_eq!(BreakpointClass::Mobile.max_width(), Some(768));
        assert_eq!(BreakpointClass::Tablet.max_width(), Some(1024));
        assert_eq!(BreakpointClass::Desktop.max_width(), None);
    }

    #[test]
    fn largest_width_is_4k() {
        assert_eq!(largest_width(), 3840);
    }

    #[test]
    fn aspect_ratio_parses_known_values() {
        assert_eq!(AspectRatio::parse("16/9"), Some(AspectRatio::SixteenNine));
        assert_eq!(AspectRatio::parse(" 1/1 "), Some(AspectRatio::Square));
        assert_eq!(AspectRatio::parse("2/1"), None);
        assert_eq!(AspectRatio::parse(""), None);
    }

    #[test]
    fn aspect_ratio_css_output() {
        assert_eq!(AspectRatio::SixteenNine.to_css(), "16 / 9");
    }

    #[test]
    fn safe_css_length_accepts_ordinary_values() {
        assert!(is_safe_css_length("100vw"));
        assert!(is_safe_css_length("1.5rem"));
        assert!(is_safe_css_length("50%"));
        assert!(is_safe_css_length("-4px"));
    }

    #[test]
    fn safe_css_length_rejects_injection() {
        assert!(!is_safe_css_length(""));
        assert!(!is_safe_css_length("100vw; position: fixed"));
        assert!(!is_safe_css_length("url(evil)"));
        assert!(!is_safe_css_length("\"x\""));
    }
}
