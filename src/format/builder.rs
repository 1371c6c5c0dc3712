//! Fluent construction of [`MediaFormat`] values.
//!
//! The builder is a plain mutable staging struct. Every setter stores one
//! attribute and hands the builder back; [`MediaFormatBuilder::build`]
//! consumes it, validates the name, and returns the immutable format.
//!
//! ```
//! use media_handler::format::MediaFormatBuilder;
//!
//! let teaser = MediaFormatBuilder::create("teaser")
//!     .width_range(400, 800)
//!     .ratio_of(16, 9)
//!     .extensions(["jpg", "png"])
//!     .build()
//!     .unwrap();
//! assert_eq!(teaser.min_width(), 400);
//! assert_eq!(teaser.width(), 0);
//! ```

use super::MediaFormat;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid media format name {0:?}: must be non-empty and contain only letters, digits, '_', '-', '.' or ':'")]
    InvalidName(String),
}

/// Staging area for a [`MediaFormat`]. See the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct MediaFormatBuilder {
    name: String,
    label: Option<String>,
    description: Option<String>,
    width: i64,
    min_width: i64,
    max_width: i64,
    height: i64,
    min_height: i64,
    max_height: i64,
    ratio: f64,
    ratio_width: i64,
    ratio_height: i64,
    file_size_max: i64,
    extensions: Vec<String>,
    rendition_group: Option<String>,
    download: bool,
    internal: bool,
    ranking: i32,
    // Bulk entries fill keys; individual entries always win over them.
    bulk_properties: BTreeMap<String, serde_json::Value>,
    properties: BTreeMap<String, serde_json::Value>,
}

impl MediaFormatBuilder {
    /// Start a format. The name is validated by [`build`](Self::build).
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Fixed width (exact match).
    pub fn width(mut self, width: i64) -> Self {
        self.width = width;
        self
    }

    /// Width range; the fixed width is left untouched.
    pub fn width_range(mut self, min: i64, max: i64) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    pub fn min_width(mut self, min: i64) -> Self {
        self.min_width = min;
        self
    }

    pub fn max_width(mut self, max: i64) -> Self {
        self.max_width = max;
        self
    }

    /// Fixed height (exact match).
    pub fn height(mut self, height: i64) -> Self {
        self.height = height;
        self
    }

    /// Height range; the fixed height is left untouched.
    pub fn height_range(mut self, min: i64, max: i64) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    pub fn min_height(mut self, min: i64) -> Self {
        self.min_height = min;
        self
    }

    pub fn max_height(mut self, max: i64) -> Self {
        self.max_height = max;
        self
    }

    /// Sets fixed width and height together.
    pub fn fixed_dimension(mut self, width: i64, height: i64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Ratio from a width/height pair. Both sides are kept for later retrieval.
    pub fn ratio_of(mut self, ratio_width: i64, ratio_height: i64) -> Self {
        self.ratio_width = ratio_width;
        self.ratio_height = ratio_height;
        if ratio_width > 0 && ratio_height > 0 {
            self.ratio = ratio_width as f64 / ratio_height as f64;
        }
        self
    }

    pub fn file_size_max(mut self, bytes: i64) -> Self {
        self.file_size_max = bytes;
        self
    }

    /// Allowed extensions. Entries are copied as given, empty ones included.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().to_string())
            .collect();
        self
    }

    pub fn rendition_group(mut self, group: impl Into<String>) -> Self {
        self.rendition_group = Some(group.into());
        self
    }

    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    pub fn internal(mut self, internal: bool) -> Self {
        self.internal = internal;
        self
    }

    pub fn ranking(mut self, ranking: i32) -> Self {
        self.ranking = ranking;
        self
    }

    /// Set one property. Wins over any bulk entry for the same key.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Merge a batch of properties. Keys already set via
    /// [`property`](Self::property) keep their individual value.
    pub fn properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.bulk_properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Validate and freeze the format.
    pub fn build(self) -> Result<MediaFormat, FormatError> {
        if !is_valid_name(&self.name) {
            return Err(FormatError::InvalidName(self.name));
        }

        let mut properties = self.bulk_properties;
        properties.extend(self.properties);

        Ok(MediaFormat {
            name: self.name,
            label: self.label,
            description: self.description,
            width: self.width,
            min_width: self.min_width,
            max_width: self.max_width,
            height: self.height,
            min_height: self.min_height,
            max_height: self.max_height,
            ratio: self.ratio,
            ratio_width: self.ratio_width,
            ratio_height: self.ratio_height,
            file_size_max: self.file_size_max,
            extensions: self.extensions,
            rendition_group: self.rendition_group,
            download: self.download,
            internal: self.internal,
            ranking: self.ranking,
            properties,
        })
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
