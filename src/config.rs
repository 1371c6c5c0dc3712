//! Handler configuration.
//!
//! Loads, validates, and merges a `config.toml`. Stock defaults are serialized
//! to a TOML table first and the user file is merged on top, so a config file
//! only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [matching]
//! negative_constraints = "unconstrained"  # or "reject"
//! ratio_tolerance = 0.05
//!
//! [crop]
//! source = "largest-fitting"              # or "smallest-fitting", "original"
//!
//! [files]
//! image_extensions = ["gif", "jpg", "jpeg", "png"]
//! flash_extensions = ["swf"]
//! thumbnail_prefix = "cq5dam.thumbnail."
//!
//! [[formats]]
//! name = "teaser"
//! ratio = [16, 9]
//! min_width = 400
//! extensions = ["jpg", "png"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::format::{FormatError, FormatRegistry, MediaFormat, MediaFormatBuilder};
use crate::rendition::FileTypes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Invalid media format definition: {0}")]
    Format(#[from] FormatError),
}

/// Handler configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlerConfig {
    /// Constraint matching behavior.
    pub matching: MatchingConfig,
    /// Virtual crop rendition settings.
    pub crop: CropConfig,
    /// File type classification.
    pub files: FilesConfig,
    /// Media format definitions.
    pub formats: Vec<MediaFormatConfig>,
}

impl HandlerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.matching.ratio_tolerance) {
            return Err(ConfigError::Validation(
                "matching.ratio_tolerance must be in [0, 1)".into(),
            ));
        }
        if self.files.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "files.image_extensions must not be empty".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for format in &self.formats {
            if !seen.insert(format.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate media format name {:?}",
                    format.name
                )));
            }
        }
        Ok(())
    }

    /// Build every configured media format into a registry.
    pub fn format_registry(&self) -> Result<FormatRegistry, ConfigError> {
        self.formats
            .iter()
            .map(|f| f.build().map_err(ConfigError::from))
            .collect()
    }
}

/// How matchers treat negative numeric constraints, which the format builder
/// accepts without validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NegativeConstraintPolicy {
    /// Negative values constrain nothing, like `0`.
    #[default]
    Unconstrained,
    /// A format with any negative value never matches.
    Reject,
}

/// Which stored rendition a virtual crop is cut from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropSourcePolicy {
    /// Largest non-original rendition that contains the crop; the original
    /// only when no other rendition fits.
    #[default]
    LargestFitting,
    /// Smallest rendition (original included) that contains the crop.
    SmallestFitting,
    /// Always the original, if it contains the crop.
    Original,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    pub negative_constraints: NegativeConstraintPolicy,
    /// Allowed absolute difference between candidate and format ratio.
    pub ratio_tolerance: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            negative_constraints: NegativeConstraintPolicy::default(),
            ratio_tolerance: crate::selection::RATIO_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    pub source: CropSourcePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Extensions rendered inline as images.
    pub image_extensions: Vec<String>,
    /// Extensions handled as flash movies.
    pub flash_extensions: Vec<String>,
    /// Rendition names starting with this prefix are asset thumbnails.
    pub thumbnail_prefix: String,
}

impl FilesConfig {
    pub fn file_types(&self) -> FileTypes {
        FileTypes {
            image_extensions: self.image_extensions.clone(),
            flash_extensions: self.flash_extensions.clone(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        let types = FileTypes::default();
        Self {
            image_extensions: types.image_extensions,
            flash_extensions: types.flash_extensions,
            thumbnail_prefix: "cq5dam.thumbnail.".to_string(),
        }
    }
}

/// A media format as written in `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaFormatConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub width: i64,
    pub height: i64,
    pub min_width: i64,
    pub max_width: i64,
    pub min_height: i64,
    pub max_height: i64,
    /// `[width, height]` ratio pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<[i64; 2]>,
    pub file_size_max: i64,
    pub extensions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendition_group: Option<String>,
    pub download: bool,
    pub internal: bool,
    pub ranking: i32,
    pub properties: BTreeMap<String, toml::Value>,
}

impl MediaFormatConfig {
    pub fn build(&self) -> Result<MediaFormat, FormatError> {
        let mut builder = MediaFormatBuilder::create(self.name.as_str())
            .width(self.width)
            .height(self.height)
            .width_range(self.min_width, self.max_width)
            .height_range(self.min_height, self.max_height)
            .file_size_max(self.file_size_max)
            .extensions(&self.extensions)
            .download(self.download)
            .internal(self.internal)
            .ranking(self.ranking)
            .properties(
                self.properties
                    .iter()
                    .map(|(k, v)| (k.clone(), toml_to_json(v))),
            );
        if let Some([w, h]) = self.ratio {
            builder = builder.ratio_of(w, h);
        }
        if let Some(label) = &self.label {
            builder = builder.label(label);
        }
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        if let Some(group) = &self.rendition_group {
            builder = builder.rendition_group(group);
        }
        builder.build()
    }
}

fn toml_to_json(value: &toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s.clone()),
        toml::Value::Integer(i) => serde_json::Value::from(*i),
        toml::Value::Float(f) => serde_json::Value::from(*f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(*b),
        toml::Value::Datetime(d) => serde_json::Value::String(d.to_string()),
        toml::Value::Array(items) => items.iter().map(toml_to_json).collect(),
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(HandlerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<HandlerConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: HandlerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<HandlerConfig, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Media Handler Configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Constraint matching
# ---------------------------------------------------------------------------
[matching]
# How negative widths, heights, ratios and file sizes in a media format are
# treated: "unconstrained" (same as 0) or "reject" (the format never matches).
negative_constraints = "unconstrained"

# Allowed absolute difference between a rendition's width/height ratio and
# the media format ratio.
ratio_tolerance = 0.05

# ---------------------------------------------------------------------------
# Virtual crop renditions
# ---------------------------------------------------------------------------
[crop]
# Stored rendition a requested crop is cut from:
#   "largest-fitting"  - largest non-original rendition containing the crop,
#                        falling back to the original
#   "smallest-fitting" - smallest rendition containing the crop
#   "original"         - always the original
source = "largest-fitting"

# ---------------------------------------------------------------------------
# File types
# ---------------------------------------------------------------------------
[files]
# Extensions rendered inline as images. Everything else is a download.
image_extensions = ["gif", "jpg", "jpeg", "png"]

# Extensions handled as flash movies.
flash_extensions = ["swf"]

# Renditions whose name starts with this prefix are asset thumbnails and are
# only offered when thumbnails are requested explicitly.
thumbnail_prefix = "cq5dam.thumbnail."

# ---------------------------------------------------------------------------
# Media formats
# ---------------------------------------------------------------------------
# Each [[formats]] entry defines one named media format. Numeric values of 0
# mean "unconstrained". Lower ranking is preferred.
#
# [[formats]]
# name = "home_stage"
# label = "Home Stage"
# width = 960
# height = 315
# extensions = ["jpg", "png"]
# rendition_group = "stage"
# ranking = 10
#
# [[formats]]
# name = "teaser"
# ratio = [16, 9]
# min_width = 400
# max_width = 1280
#
# [[formats]]
# name = "download"
# download = true
# extensions = ["pdf", "zip"]
# file_size_max = 10485760
"##
}
