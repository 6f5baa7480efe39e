//! `<video>` fragment generation.
//!
//! Same source-resolution and theming rules as the picture generator: a
//! primary source or a light/dark pair, half-pairs reduced to primary with a
//! warning, light variants before dark, formats most-efficient first (WebM
//! before MP4). Format variants are derived from the source stem by the
//! naming convention (`{directory}/{stem}.{ext}`); the original file is
//! appended as an untyped last-resort source so an unusual container still
//! plays where the browser supports it.

use maud::{Markup, html};
use tracing::error;

use crate::request::{MediaRequest, ResolvedSources, SourceName, resolve_sources};
use crate::tables::{Theme, VideoFormat};

/// Playback options carried outside the media identity.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoOptions {
    /// Poster image shown before playback.
    pub poster: String,
    /// Autoplay implies `muted` and `playsinline` — browsers refuse audible
    /// autoplay, so emitting it any other way produces a video that never
    /// starts.
    pub autoplay: bool,
    pub muted: bool,
    pub controls: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
    /// `preload` attribute; empty emits nothing.
    pub preload: String,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            poster: String::new(),
            autoplay: false,
            muted: false,
            controls: true,
            looped: false,
            preload: "metadata".to_string(),
        }
    }
}

/// Generate the `<video>` fragment for a request.
pub fn generate_video_markup(request: &MediaRequest, options: &VideoOptions) -> Markup {
    request.check_accessibility();

    let resolved = match resolve_sources(request) {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            error!("video request has no usable source");
            return html! {};
        }
        Err(err) => {
            error!(%err, "cannot generate video markup");
            return html! {};
        }
    };

    let muted = options.muted || options.autoplay;
    let poster = (!options.poster.trim().is_empty()).then(|| options.poster.trim().to_string());
    let preload = (!options.preload.is_empty()).then_some(options.preload.as_str());

    html! {
        video poster=[poster]
            preload=[preload]
            aria-label=[(!request.alt.trim().is_empty()).then_some(request.alt.as_str())]
            autoplay[options.autoplay]
            muted[muted]
            playsinline[options.autoplay]
            loop[options.looped]
            controls[options.controls]
        {
            @match &resolved {
                ResolvedSources::Primary(name) => {
                    @for format in VideoFormat::PREFERENCE_ORDER {
                        source type=(format.mime_type()) src=(format_url(name, format));
                    }
                }
                ResolvedSources::Themed { light, dark } => {
                    @for format in VideoFormat::PREFERENCE_ORDER {
                        @for (theme, name) in [(Theme::Light, light), (Theme::Dark, dark)] {
                            source type=(format.mime_type())
                                media=(theme.media_condition())
                                src=(format_url(name, format));
                        }
                    }
                }
            }
            source src=(resolved.fallback().original);
            p { "Your browser does not support embedded video." }
        }
    }
}

/// Container-variant URL: the source stem with the format's extension.
fn format_url(name: &SourceName, format: VideoFormat) -> String {
    if name.directory.is_empty() {
        format!("{}.{}", name.stem, format.extension())
    } else {
        format!("{}/{}.{}", name.directory, name.stem, format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_video_emits_webm_before_mp4() {
        let req = MediaRequest::primary("/video/intro.mp4", "Intro");
        let html = generate_video_markup(&req, &VideoOptions::default()).into_string();
        let webm = html.find("/video/intro.webm").unwrap();
        let mp4 = html.find("/video/intro.mp4").unwrap();
        assert!(webm < mp4);
        assert!(html.contains(r#"type="video/webm""#));
    }

    #[test]
    fn primary_video_has_no_theme_conditions() {
        let req = MediaRequest::primary("/video/intro.mp4", "Intro");
        let html = generate_video_markup(&req, &VideoOptions::default()).into_string();
        assert!(!html.contains("prefers-color-scheme"));
    }

    #[test]
    fn themed_video_light_before_dark() {
        let req = MediaRequest::themed("/video/a-light.mp4", "/video/a-dark.mp4", "A");
        let html = generate_video_markup(&req, &VideoOptions::default()).into_string();
        let light = html.find("(prefers-color-scheme: light)").unwrap();
        let dark = html.find("(prefers-color-scheme: dark)").unwrap();
        assert!(light < dark);
        // Last-resort source is the light original.
        assert!(html.contains(r#"src="/video/a-light.mp4""#));
    }

    #[test]
    fn no_source_is_empty_fragment() {
        let req = MediaRequest::default();
        assert_eq!(
            generate_video_markup(&req, &VideoOptions::default()).into_string(),
            ""
        );
    }

    #[test]
    fn autoplay_forces_muted_and_playsinline() {
        let req = MediaRequest::primary("/video/loop.mp4", "Loop");
        let options = VideoOptions {
            autoplay: true,
            muted: false,
            ..VideoOptions::default()
        };
        let html = generate_video_markup(&req, &options).into_string();
        assert!(html.contains("autoplay"));
        assert!(html.contains("muted"));
        assert!(html.contains("playsinline"));
    }

    #[test]
    fn poster_and_preload_attributes() {
        let req = MediaRequest::primary("/video/intro.mp4", "Intro");
        let options = VideoOptions {
            poster: "/video/intro-poster.webp".into(),
            ..VideoOptions::default()
        };
        let html = generate_video_markup(&req, &options).into_string();
        assert!(html.contains(r#"poster="/video/intro-poster.webp""#));
        assert!(html.contains(r#"preload="metadata""#));
    }

    #[test]
    fn alt_text_becomes_aria_label() {
        let req = MediaRequest::primary("/video/intro.mp4", "Launch teaser");
        let html = generate_video_markup(&req, &VideoOptions::default()).into_string();
        assert!(html.contains(r#"aria-label="Launch teaser""#));
    }

    #[test]
    fn identical_input_is_byte_identical() {
        let req = MediaRequest::themed("/v/a-light.mp4", "/v/a-dark.mp4", "A");
        let options = VideoOptions::default();
        assert_eq!(
            generate_video_markup(&req, &options).into_string(),
            generate_video_markup(&req, &options).into_string()
        );
    }

    #[test]
    fn video_options_deserialize_with_loop_rename() {
        let options: VideoOptions =
            serde_json::from_str(r#"{"autoplay": true, "loop": true}"#).unwrap();
        assert!(options.autoplay);
        assert!(options.looped);
        assert!(options.controls);
    }
}
