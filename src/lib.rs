//! # Media Handler
//!
//! Media format matching and rendition selection for content-managed assets.
//! An asset in a content repository carries several stored renditions (the
//! uploaded original plus generated web sizes and thumbnails). Given a set of
//! media formats, this crate decides which rendition a page should reference,
//! optionally synthesizing a virtual rendition from an editor-drawn crop.
//!
//! # Architecture: Two Pure Steps
//!
//! ```text
//! 1. Enumerate  stored renditions + crop  →  ordered candidates   (CropRenditionHandler)
//! 2. Match      candidates + MediaArgs    →  Option<Selection>     (selection::select)
//! ```
//!
//! Both steps are pure functions over in-memory data. The content store is
//! reached only through the [`source::AssetSource`] trait, which hands over a
//! fresh rendition snapshot on every call.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`format`] | `MediaFormat` value type, its validating builder, and a name-keyed registry |
//! | [`crop`] | `CropDimension` and the repository's `left,top,right,bottom` crop strings |
//! | [`rendition`] | Normalized rendition metadata, virtual crop paths, file type classification |
//! | [`selection`] | Candidate enumeration and constraint matching |
//! | [`asset`] | Per-request `Asset` aggregate with typed rendition accessors |
//! | [`source`] | `AssetSource` trait plus in-memory and filesystem sources |
//! | [`config`] | `config.toml` loading, validation, merging, and format definitions |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No-Match Is Not an Error
//!
//! Invalid format names fail at `build()`. Everything after construction is
//! total: an asset without a fitting rendition yields `None`, whether the
//! cause is an empty asset, an unmatched format, or a failed type filter.
//!
//! ## Virtual Renditions Are a Variant
//!
//! A virtual crop is a [`rendition::RenditionKind::VirtualCrop`], not a stored
//! rendition with extra fields. It leads the candidate list whenever a crop is
//! requested and a stored image rendition contains the crop rectangle.
//!
//! ## Open Policies Are Configuration
//!
//! Two behaviors are policy rather than fixed rules: how negative constraints
//! in a format are treated, and which stored rendition backs a virtual crop.
//! Both live in [`config::HandlerConfig`] and flow into
//! [`selection::SelectionPolicy`].

pub mod asset;
pub mod config;
pub mod crop;
pub mod format;
pub mod output;
pub mod rendition;
pub mod selection;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
