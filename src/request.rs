//! Media requests and source resolution.
//!
//! A [`MediaRequest`] is the sole input to the markup generators: the logical
//! identity of an image or video (primary or light/dark source paths, alt
//! text, per-breakpoint width hints, loading hints) read off a component's
//! attributes. Requests are constructed fresh on every render attempt and
//! never mutated.
//!
//! ## Source rules
//!
//! A request carries either `primary_src` alone or both `light_src` and
//! `dark_src`. A half-specified theme pair (light without dark, or the
//! reverse) is a validation error that reduces to the available source as a
//! non-themed primary, with a warning. This one policy applies everywhere —
//! no per-call-site variation.
//!
//! ## Base names
//!
//! Responsive variant URLs are built from the source's directory and stem by
//! the `{directory}/{stem}-{width}.{ext}` convention. A source with no
//! extractable stem is malformed and the generator produces an empty
//! fragment for it.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::tables::AspectRatio;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MarkupError {
    #[error("source has no extractable base name: {0:?}")]
    BadSource(String),
}

/// Loading hint for the fallback element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    Eager,
    #[default]
    Lazy,
}

impl Loading {
    pub fn as_attr(self) -> &'static str {
        match self {
            Loading::Eager => "eager",
            Loading::Lazy => "lazy",
        }
    }
}

/// Fetch-priority hint. `Auto` emits no attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchPriority {
    High,
    Low,
    #[default]
    Auto,
}

impl FetchPriority {
    /// Attribute value, or `None` when the browser default applies.
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            FetchPriority::High => Some("high"),
            FetchPriority::Low => Some("low"),
            FetchPriority::Auto => None,
        }
    }
}

fn default_width() -> String {
    "100vw".to_string()
}

/// Input to the markup generators. See the module docs for source rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaRequest {
    /// Theme-agnostic source path. Mutually exclusive with the themed pair.
    pub primary_src: String,
    /// Light-scheme source. Only meaningful together with `dark_src`.
    pub light_src: String,
    /// Dark-scheme source. Only meaningful together with `light_src`.
    pub dark_src: String,
    /// Alternative text. Required unless `is_decorative`.
    pub alt: String,
    /// Marks the media as purely decorative (empty alt is then intentional).
    pub is_decorative: bool,
    /// Width hint for viewports in the mobile bucket.
    #[serde(default = "default_width")]
    pub mobile_width: String,
    /// Width hint for viewports in the tablet bucket.
    #[serde(default = "default_width")]
    pub tablet_width: String,
    /// Width hint for viewports above the tablet bucket.
    #[serde(default = "default_width")]
    pub desktop_width: String,
    /// Aspect ratio string like `"16/9"`; empty for none.
    pub aspect_ratio: String,
    pub loading: Loading,
    pub fetch_priority: FetchPriority,
    /// Wrap the fragment in schema.org ImageObject microdata.
    pub include_schema: bool,
}

impl Default for MediaRequest {
    fn default() -> Self {
        Self {
            primary_src: String::new(),
            light_src: String::new(),
            dark_src: String::new(),
            alt: String::new(),
            is_decorative: false,
            mobile_width: default_width(),
            tablet_width: default_width(),
            desktop_width: default_width(),
            aspect_ratio: String::new(),
            loading: Loading::default(),
            fetch_priority: FetchPriority::default(),
            include_schema: false,
        }
    }
}

impl MediaRequest {
    /// Convenience constructor for a theme-agnostic request.
    pub fn primary(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            primary_src: src.into(),
            alt: alt.into(),
            ..Self::default()
        }
    }

    /// Convenience constructor for a themed request.
    pub fn themed(
        light: impl Into<String>,
        dark: impl Into<String>,
        alt: impl Into<String>,
    ) -> Self {
        Self {
            light_src: light.into(),
            dark_src: dark.into(),
            alt: alt.into(),
            ..Self::default()
        }
    }

    /// Parsed aspect ratio, warning on unknown values.
    pub fn parsed_aspect_ratio(&self) -> Option<AspectRatio> {
        if self.aspect_ratio.is_empty() {
            return None;
        }
        let parsed = AspectRatio::parse(&self.aspect_ratio);
        if parsed.is_none() {
            warn!(value = %self.aspect_ratio, "unsupported aspect ratio ignored");
        }
        parsed
    }

    /// Warn when the request carries neither alt text nor a decorative flag.
    /// Non-fatal: accessibility gaps degrade, they don't break the build.
    pub fn check_accessibility(&self) {
        if self.alt.trim().is_empty() && !self.is_decorative {
            warn!(
                source = %self.display_source(),
                "media has no alt text and is not marked decorative"
            );
        }
    }

    /// Best source path for log messages.
    fn display_source(&self) -> &str {
        if !self.primary_src.is_empty() {
            &self.primary_src
        } else if !self.light_src.is_empty() {
            &self.light_src
        } else {
            &self.dark_src
        }
    }
}

/// A source path split into the parts the naming convention needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceName {
    /// Directory portion including the trailing slash context, no slash kept.
    /// Empty for bare filenames.
    pub directory: String,
    /// Filename stem without extension.
    pub stem: String,
    /// Full original path, used verbatim by the fallback element.
    pub original: String,
}

impl SourceName {
    /// Split `"/images/hero.jpg"` into directory `"/images"` and stem
    /// `"hero"`. Fails when no stem can be extracted (empty name, dotfile,
    /// trailing slash).
    pub fn parse(src: &str) -> Result<SourceName, MarkupError> {
        let trimmed = src.trim();
        let (directory, file) = match trimmed.rfind('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
            None => ("", trimmed),
        };
        let stem = match file.rfind('.') {
            Some(0) | None => file, // dotfile or no extension: stem is the whole name
            Some(idx) => &file[..idx],
        };
        if stem.is_empty() {
            return Err(MarkupError::BadSource(src.to_string()));
        }
        Ok(SourceName {
            directory: directory.to_string(),
            stem: stem.to_string(),
            original: trimmed.to_string(),
        })
    }

    /// Responsive variant URL by the `{directory}/{stem}-{width}.{ext}`
    /// convention.
    pub fn variant_url(&self, width: u32, extension: &str) -> String {
        if self.directory.is_empty() {
            format!("{}-{}.{}", self.stem, width, extension)
        } else {
            format!("{}/{}-{}.{}", self.directory, self.stem, width, extension)
        }
    }
}

/// Usable sources after validation, or `None` when nothing resolved (the
/// generator then emits the placeholder fragment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSources {
    Primary(SourceName),
    Themed { light: SourceName, dark: SourceName },
}

impl ResolvedSources {
    /// Source the fallback element defaults to: the light source when
    /// themed, otherwise the primary.
    pub fn fallback(&self) -> &SourceName {
        match self {
            ResolvedSources::Primary(name) => name,
            ResolvedSources::Themed { light, .. } => light,
        }
    }
}

/// Resolve a request's sources, applying the half-pair policy.
///
/// Returns `Ok(None)` when no source field is usable — a recoverable
/// condition, not an error. Returns `Err` only for a source string with no
/// extractable base name.
pub fn resolve_sources(request: &MediaRequest) -> Result<Option<ResolvedSources>, MarkupError> {
    let light = non_empty(&request.light_src);
    let dark = non_empty(&request.dark_src);
    let primary = non_empty(&request.primary_src);

    match (light, dark) {
        (Some(light), Some(dark)) => {
            if primary.is_some() {
                warn!("both primary and themed sources given; themed pair wins");
            }
            Ok(Some(ResolvedSources::Themed {
                light: SourceName::parse(light)?,
                dark: SourceName::parse(dark)?,
            }))
        }
        (Some(single), None) | (None, Some(single)) => {
            // Half-specified pair: reduce to a non-themed primary.
            warn!(
                source = single,
                "theme pair half-specified; reducing to a non-themed primary"
            );
            let chosen = primary.unwrap_or(single);
            Ok(Some(ResolvedSources::Primary(SourceName::parse(chosen)?)))
        }
        (None, None) => match primary {
            Some(src) => Ok(Some(ResolvedSources::Primary(SourceName::parse(src)?))),
            None => Ok(None),
        },
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
