//! Shared test utilities for the media-handler test suite.
//!
//! Provides a standard asset with a realistic rendition set and small
//! constructors for ad-hoc stored renditions.
//!
//! # Standard Asset
//!
//! ```text
//! /content/dam/test/standard.jpg
//!   original                        2560x1440  (original)
//!   cq5dam.web.1280.1280.jpg        1280x720
//!   cq5dam.web.960.960.jpg           960x540
//!   teaser.480.270.jpg               480x270
//!   intro.swf                        400x300
//!   brochure.pdf                       0x0
//!   cq5dam.thumbnail.319.319.png     319x180   (thumbnail)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let policy = SelectionPolicy::default();
//! let handler = CropRenditionHandler::new(&standard_renditions(), Some(standard_crop()), &policy);
//! assert_eq!(handler.available_renditions(&MediaArgs::default()).len(), 7);
//! ```

use crate::crop::CropDimension;
use crate::rendition::{file_extension, mime_type_for_extension};
use crate::source::{AssetMetadata, MemoryAsset, StoredRendition};

pub const STANDARD_ASSET: &str = "/content/dam/test/standard.jpg";

pub fn rendition_path(name: &str) -> String {
    format!("{STANDARD_ASSET}/jcr:content/renditions/{name}")
}

/// A stored rendition with a mime type derived from the name and a file
/// size proportional to its area.
pub fn rendition(name: &str, width: u32, height: u32) -> StoredRendition {
    StoredRendition {
        name: name.to_string(),
        path: rendition_path(name),
        width,
        height,
        file_size: Some(u64::from(width) * u64::from(height) / 8),
        mime_type: file_extension(name)
            .and_then(mime_type_for_extension)
            .map(String::from),
        original: false,
        thumbnail: false,
    }
}

pub fn original(width: u32, height: u32) -> StoredRendition {
    StoredRendition {
        mime_type: Some("image/jpeg".to_string()),
        original: true,
        ..rendition("original", width, height)
    }
}

pub fn flash(name: &str, width: u32, height: u32) -> StoredRendition {
    rendition(name, width, height)
}

pub fn thumbnail(name: &str, width: u32, height: u32) -> StoredRendition {
    StoredRendition {
        thumbnail: true,
        ..rendition(name, width, height)
    }
}

pub fn standard_renditions() -> Vec<StoredRendition> {
    vec![
        original(2560, 1440),
        rendition("cq5dam.web.1280.1280.jpg", 1280, 720),
        rendition("cq5dam.web.960.960.jpg", 960, 540),
        rendition("teaser.480.270.jpg", 480, 270),
        flash("intro.swf", 400, 300),
        StoredRendition {
            file_size: Some(250_000),
            ..rendition("brochure.pdf", 0, 0)
        },
        thumbnail("cq5dam.thumbnail.319.319.png", 319, 180),
    ]
}

/// The crop editors draw for the home stage format.
pub fn standard_crop() -> CropDimension {
    CropDimension::new(0, 0, 960, 315)
}

pub fn standard_asset() -> MemoryAsset {
    MemoryAsset {
        path: STANDARD_ASSET.to_string(),
        metadata: AssetMetadata {
            title: Some("Standard Test Image".to_string()),
            description: Some("A landscape used across tests".to_string()),
        },
        renditions: standard_renditions(),
    }
}
