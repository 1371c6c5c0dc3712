//! Read-only access to an asset's stored renditions.
//!
//! The selection core never talks to a content store directly. It asks an
//! [`AssetSource`] for a snapshot of the asset's renditions and works on
//! that. Two sources ship with the crate:
//!
//! | Source | Backing |
//! |---|---|
//! | [`MemoryAsset`] | Metadata already in memory, e.g. a JSON manifest |
//! | [`FsAsset`] | An asset directory on disk, dimensions read with `image` |
//!
//! Sources are expected to return a fresh snapshot on every call; the core
//! does not cache between calls.

pub mod fs_asset;

pub use fs_asset::FsAsset;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset directory {0} has no renditions/ folder")]
    MissingRenditions(String),
}

/// One stored binary variant, as reported by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRendition {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub original: bool,
    #[serde(default)]
    pub thumbnail: bool,
}

/// Descriptive metadata of the asset itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The repository resource behind an asset, for callers that need to resolve
/// further content relative to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceView {
    pub path: String,
    pub resource_type: String,
}

/// Read-only view of a content asset.
pub trait AssetSource: Sync {
    /// Repository path of the asset.
    fn path(&self) -> &str;

    /// Asset name; defaults to the last path segment.
    fn name(&self) -> &str {
        let path = self.path();
        path.rsplit('/').next().unwrap_or(path)
    }

    fn metadata(&self) -> AssetMetadata;

    /// Snapshot of all stored renditions, thumbnails included.
    fn renditions(&self) -> Vec<StoredRendition>;

    /// The underlying resource, when the source is backed by one.
    fn resource(&self) -> Option<ResourceView> {
        None
    }
}

/// An asset whose metadata is fully held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryAsset {
    pub path: String,
    #[serde(default)]
    pub metadata: AssetMetadata,
    #[serde(default)]
    pub renditions: Vec<StoredRendition>,
}

impl MemoryAsset {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            metadata: AssetMetadata::default(),
            renditions: Vec::new(),
        }
    }

    pub fn with_rendition(mut self, rendition: StoredRendition) -> Self {
        self.renditions.push(rendition);
        self
    }

    /// Load from a JSON manifest file.
    pub fn from_json_file(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl AssetSource for MemoryAsset {
    fn path(&self) -> &str {
        &self.path
    }

    fn metadata(&self) -> AssetMetadata {
        self.metadata.clone()
    }

    fn renditions(&self) -> Vec<StoredRendition> {
        self.renditions.clone()
    }

    fn resource(&self) -> Option<ResourceView> {
        Some(ResourceView {
            path: self.path.clone(),
            resource_type: "dam:Asset".to_string(),
        })
    }
}

impl<T: AssetSource + ?Sized> AssetSource for Box<T> {
    fn path(&self) -> &str {
        (**self).path()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn metadata(&self) -> AssetMetadata {
        (**self).metadata()
    }

    fn renditions(&self) -> Vec<StoredRendition> {
        (**self).renditions()
    }

    fn resource(&self) -> Option<ResourceView> {
        (**self).resource()
    }
}

/// Open an asset from a directory ([`FsAsset`]) or a JSON manifest
/// ([`MemoryAsset`]).
pub fn open_asset(
    path: &Path,
    thumbnail_prefix: &str,
) -> Result<Box<dyn AssetSource + Send>, SourceError> {
    if path.is_dir() {
        Ok(Box::new(FsAsset::open(path, thumbnail_prefix)?))
    } else {
        Ok(Box::new(MemoryAsset::from_json_file(path)?))
    }
}
