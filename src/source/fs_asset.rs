//! Asset source backed by a directory on disk.
//!
//! ```text
//! standard.jpg/
//! ├── metadata.json                 # optional {"title": ..., "description": ...}
//! └── renditions/
//!     ├── original                  # the uploaded binary (extension optional)
//!     ├── cq5dam.web.1280.1280.jpg
//!     └── cq5dam.thumbnail.319.319.png
//! ```
//!
//! Pixel dimensions come from the image header via the `image` crate, without
//! decoding pixels. Files the crate can't identify (PDFs, archives, flash)
//! or has no decoder for in this build (BMP, AVIF) report `0x0` and stay
//! available as download candidates. A file whose stem is `original` is the original rendition;
//! names starting with the thumbnail prefix are thumbnails.

use super::{AssetMetadata, AssetSource, SourceError, StoredRendition};
use crate::rendition::{file_extension, mime_type_for_extension};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FsAsset {
    path: String,
    metadata: AssetMetadata,
    renditions: Vec<StoredRendition>,
}

impl FsAsset {
    /// Read an asset directory. `thumbnail_prefix` marks thumbnail renditions
    /// by file name.
    pub fn open(dir: &Path, thumbnail_prefix: &str) -> Result<Self, SourceError> {
        let renditions_dir = dir.join("renditions");
        if !renditions_dir.is_dir() {
            return Err(SourceError::MissingRenditions(dir.display().to_string()));
        }

        let metadata_path = dir.join("metadata.json");
        let metadata = if metadata_path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&metadata_path)?)?
        } else {
            AssetMetadata::default()
        };

        let mut entries: Vec<_> = std::fs::read_dir(&renditions_dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|e| e.path().is_file())
            .collect();
        entries.sort_by_key(|e| e.file_name());

        let mut renditions = Vec::with_capacity(entries.len());
        for entry in entries {
            let file_path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let (width, height, guessed_mime) = identify(&file_path)?;
            let mime_type = file_extension(&name)
                .and_then(mime_type_for_extension)
                .map(String::from)
                .or(guessed_mime);
            let stem = name.split('.').next().unwrap_or(&name);

            debug!(rendition = %name, width, height, "read stored rendition");
            renditions.push(StoredRendition {
                original: stem == "original",
                thumbnail: !thumbnail_prefix.is_empty() && name.starts_with(thumbnail_prefix),
                path: file_path.display().to_string(),
                name,
                width,
                height,
                file_size: Some(entry.metadata()?.len()),
                mime_type,
            });
        }

        Ok(Self {
            path: dir.display().to_string(),
            metadata,
            renditions,
        })
    }
}

impl AssetSource for FsAsset {
    fn path(&self) -> &str {
        &self.path
    }

    fn metadata(&self) -> AssetMetadata {
        self.metadata.clone()
    }

    fn renditions(&self) -> Vec<StoredRendition> {
        self.renditions.clone()
    }
}

/// Dimensions and header-sniffed mime type. Unknown formats, and formats
/// this build has no decoder for, yield `0x0`.
fn identify(path: &Path) -> Result<(u32, u32, Option<String>), SourceError> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    let Some(format) = reader.format() else {
        return Ok((0, 0, None));
    };
    let mime_type = Some(format.to_mime_type().to_string());
    match reader.into_dimensions() {
        Ok((width, height)) => Ok((width, height, mime_type)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read dimensions, reporting 0x0");
            Ok((0, 0, mime_type))
        }
    }
}
