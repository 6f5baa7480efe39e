//! `<picture>` fragment generation.
//!
//! Builds the full responsive source matrix for one image request: format
//! outer loop (most-modern first), light-before-dark when themed, ascending
//! widths inside each `srcset`, and a single fallback `<img>` that always
//! uses the light (or primary) source. The ordering is load-bearing —
//! browsers take the first matching `<source>` — and stable across calls
//! with equal input.
//!
//! Failure handling is local and recoverable: a request with no usable
//! source gets the fixed placeholder fragment, a source with no extractable
//! base name gets a logged error and an empty fragment. Neither escapes the
//! generator as an error.

use maud::{Markup, html};
use tracing::error;

use crate::request::{MediaRequest, ResolvedSources, SourceName, resolve_sources};
use crate::tables::{ImageFormat, PLACEHOLDER_ALT, PLACEHOLDER_SRC, RESPONSIVE_WIDTHS, Theme};

use super::sizes::{WidthHint, sizes_attribute};

/// Generate the responsive `<picture>` fragment for a request.
pub fn generate_picture_markup(request: &MediaRequest) -> Markup {
    request.check_accessibility();

    let resolved = match resolve_sources(request) {
        Ok(Some(resolved)) => resolved,
        Ok(None) => return placeholder_fragment(request),
        Err(err) => {
            error!(%err, "cannot generate picture markup");
            return html! {};
        }
    };

    let sizes = request_sizes(request);
    let picture = html! {
        picture {
            @match &resolved {
                ResolvedSources::Primary(name) => {
                    @for format in ImageFormat::PREFERENCE_ORDER {
                        source type=(format.mime_type())
                            srcset=(srcset(name, format))
                            sizes=(sizes);
                    }
                }
                ResolvedSources::Themed { light, dark } => {
                    @for format in ImageFormat::PREFERENCE_ORDER {
                        @for (theme, name) in [(Theme::Light, light), (Theme::Dark, dark)] {
                            source type=(format.mime_type())
                                media=(theme.media_condition())
                                srcset=(srcset(name, format))
                                sizes=(sizes);
                        }
                    }
                }
            }
            (fallback_img(request, resolved.fallback(), &sizes))
        }
    };

    if request.include_schema {
        schema_wrapper(request, resolved.fallback(), picture)
    } else {
        picture
    }
}

/// The deterministic placeholder emitted when no source resolves.
pub fn placeholder_fragment(request: &MediaRequest) -> Markup {
    let alt = if request.alt.trim().is_empty() {
        PLACEHOLDER_ALT
    } else {
        request.alt.trim()
    };
    html! {
        picture {
            img src=(PLACEHOLDER_SRC) alt=(alt) loading="lazy";
        }
    }
}

/// Ascending-width `srcset` value for one source and format.
fn srcset(name: &SourceName, format: ImageFormat) -> String {
    RESPONSIVE_WIDTHS
        .iter()
        .map(|width| format!("{} {}w", name.variant_url(*width, format.extension()), width))
        .collect::<Vec<_>>()
        .join(", ")
}

fn request_sizes(request: &MediaRequest) -> String {
    sizes_attribute(
        &WidthHint::parse(&request.mobile_width),
        &WidthHint::parse(&request.tablet_width),
        &WidthHint::parse(&request.desktop_width),
    )
}

/// The theme-agnostic fallback element. Its `src` is the unsuffixed primary
/// (or light) file, per the naming convention's non-responsive contexts.
fn fallback_img(request: &MediaRequest, fallback: &SourceName, sizes: &str) -> Markup {
    let style = request
        .parsed_aspect_ratio()
        .map(|ratio| format!("aspect-ratio: {};", ratio.to_css()));
    html! {
        img src=(fallback.original)
            alt=(request.alt)
            sizes=(sizes)
            loading=(request.loading.as_attr())
            fetchpriority=[request.fetch_priority.as_attr()]
            style=[style];
    }
}

/// schema.org ImageObject microdata container. Carries machine-readable
/// metadata without touching the visual markup inside.
fn schema_wrapper(request: &MediaRequest, fallback: &SourceName, picture: Markup) -> Markup {
    html! {
        div itemscope itemtype="https://schema.org/ImageObject" {
            meta itemprop="url" content=(fallback.original);
            @if !request.alt.trim().is_empty() {
                meta itemprop="description" content=(request.alt);
            }
            (picture)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{FetchPriority, Loading};

    // =========================================================================
    // Primary-only requests
    // =========================================================================

    #[test]
    fn primary_fallback_src_is_the_primary_source() {
        let req = MediaRequest::primary("/img/hero.jpg", "Hero");
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains(r#"src="/img/hero.jpg""#));
        assert!(html.contains(r#"alt="Hero""#));
    }

    #[test]
    fn primary_emits_no_theme_conditions() {
        let req = MediaRequest::primary("/img/hero.jpg", "Hero");
        let html = generate_picture_markup(&req).into_string();
        assert!(!html.contains("prefers-color-scheme"));
    }

    #[test]
    fn primary_emits_formats_most_modern_first() {
        let req = MediaRequest::primary("/img/hero.jpg", "Hero");
        let html = generate_picture_markup(&req).into_string();
        let avif = html.find("image/avif").unwrap();
        let webp = html.find("image/webp").unwrap();
        assert!(avif < webp);
    }

    #[test]
    fn srcset_widths_ascend_and_follow_naming_convention() {
        let req = MediaRequest::primary("/img/hero.jpg", "Hero");
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains("/img/hero-768.avif 768w"));
        assert!(html.contains("/img/hero-3840.avif 3840w"));
        let first = html.find("hero-768.avif").unwrap();
        let last = html.find("hero-3840.avif").unwrap();
        assert!(first < last);
    }

    #[test]
    fn sources_precede_fallback_img() {
        let req = MediaRequest::primary("/img/hero.jpg", "Hero");
        let html = generate_picture_markup(&req).into_string();
        let last_source = html.rfind("<source").unwrap();
        let img = html.find("<img").unwrap();
        assert!(last_source < img);
    }

    // =========================================================================
    // Themed requests
    // =========================================================================

    #[test]
    fn themed_light_sources_precede_dark() {
        let req = MediaRequest::themed("/img/a-light.jpg", "/img/a-dark.jpg", "A");
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains("(prefers-color-scheme: light)"));
        assert!(html.contains("(prefers-color-scheme: dark)"));
        let light = html.find("(prefers-color-scheme: light)").unwrap();
        let dark = html.find("(prefers-color-scheme: dark)").unwrap();
        assert!(light < dark);
    }

    #[test]
    fn themed_fallback_is_light_source() {
        let req = MediaRequest::themed("/img/a-light.jpg", "/img/a-dark.jpg", "A");
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains(r#"src="/img/a-light.jpg""#));
    }

    #[test]
    fn themed_emits_both_themes_per_format() {
        let req = MediaRequest::themed("/img/a-light.jpg", "/img/a-dark.jpg", "A");
        let html = generate_picture_markup(&req).into_string();
        assert_eq!(html.matches("(prefers-color-scheme: light)").count(), 2);
        assert_eq!(html.matches("(prefers-color-scheme: dark)").count(), 2);
        assert!(html.contains("/img/a-dark-1920.webp 1920w"));
    }

    #[test]
    fn half_pair_renders_as_primary() {
        let req = MediaRequest {
            dark_src: "/img/a-dark.jpg".into(),
            alt: "A".into(),
            ..MediaRequest::default()
        };
        let html = generate_picture_markup(&req).into_string();
        assert!(!html.contains("prefers-color-scheme"));
        assert!(html.contains(r#"src="/img/a-dark.jpg""#));
    }

    // =========================================================================
    // Placeholder and error paths
    // =========================================================================

    #[test]
    fn no_sources_yields_placeholder() {
        let req = MediaRequest::default();
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains(PLACEHOLDER_SRC));
        assert!(html.contains(PLACEHOLDER_ALT));
    }

    #[test]
    fn placeholder_keeps_request_alt() {
        let req = MediaRequest {
            alt: "Team photo".into(),
            ..MediaRequest::default()
        };
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains(PLACEHOLDER_SRC));
        assert!(html.contains("Team photo"));
    }

    #[test]
    fn placeholder_is_deterministic() {
        let req = MediaRequest::default();
        assert_eq!(
            generate_picture_markup(&req).into_string(),
            placeholder_fragment(&req).into_string()
        );
    }

    #[test]
    fn malformed_source_yields_empty_fragment() {
        let req = MediaRequest::primary("/images/", "A");
        assert_eq!(generate_picture_markup(&req).into_string(), "");
    }

    // =========================================================================
    // Attributes and options
    // =========================================================================

    #[test]
    fn loading_and_fetch_priority_attrs() {
        let req = MediaRequest {
            primary_src: "/img/hero.jpg".into(),
            alt: "Hero".into(),
            loading: Loading::Eager,
            fetch_priority: FetchPriority::High,
            ..MediaRequest::default()
        };
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains(r#"loading="eager""#));
        assert!(html.contains(r#"fetchpriority="high""#));
    }

    #[test]
    fn auto_fetch_priority_emits_no_attribute() {
        let req = MediaRequest::primary("/img/hero.jpg", "Hero");
        let html = generate_picture_markup(&req).into_string();
        assert!(!html.contains("fetchpriority"));
    }

    #[test]
    fn aspect_ratio_styles_fallback() {
        let req = MediaRequest {
            primary_src: "/img/hero.jpg".into(),
            alt: "Hero".into(),
            aspect_ratio: "16/9".into(),
            ..MediaRequest::default()
        };
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains("aspect-ratio: 16 / 9"));
    }

    #[test]
    fn sizes_reflect_width_hints() {
        let req = MediaRequest {
            primary_src: "/img/hero.jpg".into(),
            alt: "Hero".into(),
            mobile_width: "100vw".into(),
            desktop_width: "50vw".into(),
            ..MediaRequest::default()
        };
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains("(max-width: 768px) 100vw"));
        assert!(html.contains("50vw"));
    }

    #[test]
    fn out_of_range_hint_is_clamped_in_output() {
        let req = MediaRequest {
            primary_src: "/img/hero.jpg".into(),
            alt: "Hero".into(),
            mobile_width: "500vw".into(),
            ..MediaRequest::default()
        };
        let html = generate_picture_markup(&req).into_string();
        assert!(html.contains("(max-width: 768px) 200vw"));
    }

    // =========================================================================
    // Schema wrapper
    // =========================================================================

    #[test]
    fn schema_wraps_without_altering_picture() {
        let plain = MediaRequest::primary("/img/hero.jpg", "Hero");
        let with_schema = MediaRequest {
            include_schema: true,
            ..plain.clone()
        };
        let plain_html = generate_picture_markup(&plain).into_string();
        let schema_html = generate_picture_markup(&with_schema).into_string();
        assert!(schema_html.contains("https://schema.org/ImageObject"));
        assert!(schema_html.contains(r#"itemprop="url" content="/img/hero.jpg""#));
        // The visual markup is embedded unchanged.
        assert!(schema_html.contains(&plain_html));
    }

    #[test]
    fn schema_omits_description_without_alt() {
        let req = MediaRequest {
            primary_src: "/img/deco.jpg".into(),
            is_decorative: true,
            include_schema: true,
            ..MediaRequest::default()
        };
        let html = generate_picture_markup(&req).into_string();
        assert!(!html.contains(r#"itemprop="description""#));
    }

    // =========================================================================
    // Determinism
    // =========================================================================

    #[test]
    fn identical_requests_yield_identical_fragments() {
        let req = MediaRequest {
            light_src: "/img/a-light.jpg".into(),
            dark_src: "/img/a-dark.jpg".into(),
            alt: "A".into(),
            mobile_width: "100vw".into(),
            desktop_width: "50vw".into(),
            aspect_ratio: "4/3".into(),
            ..MediaRequest::default()
        };
        let first = generate_picture_markup(&req).into_string();
        let second = generate_picture_markup(&req.clone()).into_string();
        assert_eq!(first, second);
    }

    #[test]
    fn escaping_is_applied_to_alt_text() {
        let req = MediaRequest::primary("/img/hero.jpg", "<script>alert('x')</script>");
        let html = generate_picture_markup(&req).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
