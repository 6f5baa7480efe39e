//! Site-wide defaults configuration.
//!
//! Components needing cross-cutting defaults (responsive asset directory,
//! placeholder image, business identity for schema metadata) read them from
//! a site configuration document: a JSON object fetched by the page shell
//! and handed to this crate as text. The core treats it purely as a
//! read-only key/value source.
//!
//! ## Fallback behavior
//!
//! Every field has a stock default and user documents are sparse — a site
//! overrides just the keys it cares about, and user values are merged over
//! stock defaults key-by-key. An absent or malformed document degrades to
//! the stock defaults with a logged warning; configuration problems must
//! never stop the page from rendering. Unknown keys in an otherwise valid
//! document are rejected to catch typos early.
//!
//! ```json
//! {
//!   "responsive_dir": "/images/responsive",
//!   "fonts": ["Inter", "Georgia"],
//!   "business": { "name": "Acme Co", "description": "Widgets since 1952" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

/// Site-wide defaults. All fields optional in user documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SiteDefaults {
    /// Directory prepended to bare (directory-less) source names when
    /// building responsive variant URLs.
    pub responsive_dir: String,
    /// Font family names the page shell preloads; first entry is primary.
    pub fonts: Vec<String>,
    /// Business identity carried into schema metadata.
    pub business: BusinessInfo,
}

impl Default for SiteDefaults {
    fn default() -> Self {
        Self {
            responsive_dir: "/images/responsive".to_string(),
            fonts: vec!["system-ui".to_string()],
            business: BusinessInfo::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BusinessInfo {
    pub name: String,
    pub description: String,
}

impl SiteDefaults {
    /// Validate values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.responsive_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "responsive_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Parse a configuration document, merging user values over stock
    /// defaults. Malformed input degrades to the stock defaults with a
    /// warning rather than failing the caller.
    pub fn from_document(text: &str) -> SiteDefaults {
        let overlay: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "config document is not valid JSON; using defaults");
                return SiteDefaults::default();
            }
        };
        match resolve_defaults(stock_defaults_value(), Some(overlay)) {
            Ok(defaults) => defaults,
            Err(err) => {
                warn!(%err, "config document rejected; using defaults");
                SiteDefaults::default()
            }
        }
    }

    /// Load from a file path; a missing file yields the stock defaults.
    pub fn load(path: &Path) -> SiteDefaults {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_document(&text),
            Err(_) => SiteDefaults::default(),
        }
    }
}

/// Stock defaults as a JSON value, the base layer for merging.
pub fn stock_defaults_value() -> serde_json::Value {
    serde_json::to_value(SiteDefaults::default()).unwrap_or(serde_json::Value::Null)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Objects merge key-by-key; anything else in the overlay replaces the base
/// value entirely. Base keys absent from the overlay are preserved.
pub fn merge_json(base: serde_json::Value, overlay: serde_json::Value) -> serde_json::Value {
    match (base, overlay) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => merge_json(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto a base, then deserialize and validate.
pub fn resolve_defaults(
    base: serde_json::Value,
    overlay: Option<serde_json::Value>,
) -> Result<SiteDefaults, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_json(base, ov),
        None => base,
    };
    let defaults: SiteDefaults = serde_json::from_value(merged)?;
    defaults.validate()?;
    Ok(defaults)
}

/// Stock configuration document with every key at its default, printed by
/// the `gen-config` CLI command.
pub fn stock_config_json() -> String {
    match serde_json::to_string_pretty(&SiteDefaults::default()) {
        Ok(json) => json,
        Err(_) => "{}".to_string(),
    }
}
