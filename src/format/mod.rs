//! Media formats: named, immutable constraint sets used to pick a rendition.
//!
//! A [`MediaFormat`] describes what an acceptable output looks like: fixed
//! or ranged pixel dimensions, an aspect ratio, a byte-size ceiling, allowed
//! file extensions and a few flags. Formats are only ever created through
//! [`MediaFormatBuilder`], which validates the name once at `build()` time.
//!
//! ## Zero Means Unconstrained
//!
//! Every numeric constraint uses `0` for "no constraint". Fields are `i64` so
//! that negative values survive construction untouched; whether a matcher
//! treats them as unconstrained or as unsatisfiable is decided by
//! [`NegativeConstraintPolicy`](crate::config::NegativeConstraintPolicy).
//!
//! ## Fixed Before Range
//!
//! A format may carry both a fixed `width` and a `min_width..max_width` range.
//! The fixed value wins: range bounds are consulted only when the fixed field
//! on that axis is `0`.
//!
//! | Module | Role |
//! |---|---|
//! | [`builder`] | Fluent staging struct, validated into a `MediaFormat` |
//! | [`registry`] | Named lookup, rendition groups, internal-format filtering |

pub mod builder;
pub mod registry;

pub use builder::{FormatError, MediaFormatBuilder};
pub use registry::FormatRegistry;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An immutable media format. Identity is the name.
#[derive(Debug, Clone, Serialize)]
pub struct MediaFormat {
    pub(crate) name: String,
    pub(crate) label: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) width: i64,
    pub(crate) min_width: i64,
    pub(crate) max_width: i64,
    pub(crate) height: i64,
    pub(crate) min_height: i64,
    pub(crate) max_height: i64,
    pub(crate) ratio: f64,
    pub(crate) ratio_width: i64,
    pub(crate) ratio_height: i64,
    pub(crate) file_size_max: i64,
    pub(crate) extensions: Vec<String>,
    pub(crate) rendition_group: Option<String>,
    pub(crate) download: bool,
    pub(crate) internal: bool,
    pub(crate) ranking: i32,
    pub(crate) properties: BTreeMap<String, serde_json::Value>,
}

impl MediaFormat {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label; falls back to the name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn min_width(&self) -> i64 {
        self.min_width
    }

    pub fn max_width(&self) -> i64 {
        self.max_width
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn min_height(&self) -> i64 {
        self.min_height
    }

    pub fn max_height(&self) -> i64 {
        self.max_height
    }

    /// Aspect ratio (width / height). A ratio pair takes effect only when both
    /// sides are positive; otherwise the directly set value is returned.
    pub fn ratio(&self) -> f64 {
        if self.ratio_width > 0 && self.ratio_height > 0 {
            self.ratio_width as f64 / self.ratio_height as f64
        } else {
            self.ratio
        }
    }

    pub fn ratio_width(&self) -> i64 {
        self.ratio_width
    }

    pub fn ratio_height(&self) -> i64 {
        self.ratio_height
    }

    pub fn file_size_max(&self) -> i64 {
        self.file_size_max
    }

    /// Allowed file extensions, in declaration order. Empty means any.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn rendition_group(&self) -> Option<&str> {
        self.rendition_group.as_deref()
    }

    pub fn is_download(&self) -> bool {
        self.download
    }

    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn ranking(&self) -> i32 {
        self.ranking
    }

    pub fn properties(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.properties
    }

    /// String-typed property lookup.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    /// Whether any fixed or ranged pixel dimension is set (non-zero).
    pub fn has_dimension_constraints(&self) -> bool {
        [
            self.width,
            self.height,
            self.min_width,
            self.max_width,
            self.min_height,
            self.max_height,
        ]
        .iter()
        .any(|&v| v != 0)
    }

    /// Name of the first negative numeric constraint, if any.
    pub(crate) fn first_negative_constraint(&self) -> Option<&'static str> {
        let fields = [
            ("width", self.width),
            ("min_width", self.min_width),
            ("max_width", self.max_width),
            ("height", self.height),
            ("min_height", self.min_height),
            ("max_height", self.max_height),
            ("ratio_width", self.ratio_width),
            ("ratio_height", self.ratio_height),
            ("file_size_max", self.file_size_max),
        ];
        fields
            .into_iter()
            .find(|(_, value)| *value < 0)
            .map(|(field, _)| field)
            .or_else(|| (self.ratio < 0.0).then_some("ratio"))
    }
}

impl PartialEq for MediaFormat {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for MediaFormat {}

impl Hash for MediaFormat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
