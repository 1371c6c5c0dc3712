//! Normalized view of one stored or virtually derived rendition.
//!
//! Stored renditions come from an [`AssetSource`](crate::source::AssetSource)
//! as [`StoredRendition`] records and are normalized into
//! [`RenditionMetadata`]. A virtual rendition is never stored: it is the
//! result of applying a [`CropDimension`] to a stored rendition, and carries
//! its origin in [`RenditionKind::VirtualCrop`].
//!
//! ## Virtual Paths
//!
//! The path of a virtual rendition encodes everything needed to produce the
//! binary later: the source rendition path, the output size, the crop string,
//! and a file name suffix.
//!
//! ```text
//! {source}.image_file.{width}.{height}.{left,top,right,bottom}.file/{name}
//! ```

use crate::crop::CropDimension;
use crate::source::StoredRendition;
use serde::Serialize;

/// Whether a rendition exists in the repository or is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenditionKind {
    Stored,
    VirtualCrop {
        source_path: String,
        crop: CropDimension,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenditionMetadata {
    name: String,
    path: String,
    width: u32,
    height: u32,
    file_size: Option<u64>,
    mime_type: Option<String>,
    extension: String,
    original: bool,
    thumbnail: bool,
    kind: RenditionKind,
}

impl RenditionMetadata {
    pub fn from_stored(stored: &StoredRendition) -> Self {
        let extension = file_extension(&stored.name)
            .or_else(|| stored.mime_type.as_deref().and_then(extension_for_mime_type))
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self {
            name: stored.name.clone(),
            path: stored.path.clone(),
            width: stored.width,
            height: stored.height,
            file_size: stored.file_size,
            mime_type: stored.mime_type.clone(),
            extension,
            original: stored.original,
            thumbnail: stored.thumbnail,
            kind: RenditionKind::Stored,
        }
    }

    /// Derive a virtual rendition by cropping `source`. The result reports
    /// the crop's width and height and has no known file size.
    pub fn virtual_crop(source: &RenditionMetadata, crop: CropDimension) -> Self {
        let path = format!(
            "{}.image_file.{}.{}.{}.file/{}",
            source.path,
            crop.width,
            crop.height,
            crop.crop_string(),
            source.file_name()
        );
        Self {
            name: source.name.clone(),
            path,
            width: crop.width,
            height: crop.height,
            file_size: None,
            mime_type: source.mime_type.clone(),
            extension: source.extension.clone(),
            original: false,
            thumbnail: false,
            kind: RenditionKind::VirtualCrop {
                source_path: source.path.clone(),
                crop,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Repository path of the binary, or the synthesized path for virtual
    /// renditions.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Byte size; `None` when unknown (virtual renditions, or sources that
    /// don't report it).
    pub fn file_size(&self) -> Option<u64> {
        self.file_size
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Lower-case file extension without the dot. Empty if unknown.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn is_original(&self) -> bool {
        self.original
    }

    pub fn is_thumbnail(&self) -> bool {
        self.thumbnail
    }

    pub fn kind(&self) -> &RenditionKind {
        &self.kind
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self.kind, RenditionKind::VirtualCrop { .. })
    }

    pub fn crop_dimension(&self) -> Option<&CropDimension> {
        match &self.kind {
            RenditionKind::VirtualCrop { crop, .. } => Some(crop),
            RenditionKind::Stored => None,
        }
    }

    /// Width / height, or `None` for renditions without pixel dimensions.
    pub fn ratio(&self) -> Option<f64> {
        (self.width > 0 && self.height > 0).then(|| self.width as f64 / self.height as f64)
    }

    /// Name with an extension, suitable as a download file name suffix.
    fn file_name(&self) -> String {
        if file_extension(&self.name).is_some() || self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }
}

/// Extension-based classification of renditions into image, flash and
/// download types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypes {
    /// Extensions a browser renders inline as an image.
    pub image_extensions: Vec<String>,
    /// Extensions handled as flash movies.
    pub flash_extensions: Vec<String>,
}

impl Default for FileTypes {
    fn default() -> Self {
        Self {
            image_extensions: ["gif", "jpg", "jpeg", "png"]
                .map(String::from)
                .to_vec(),
            flash_extensions: vec!["swf".to_string()],
        }
    }
}

impl FileTypes {
    pub fn is_image(&self, extension: &str) -> bool {
        contains_ignore_case(&self.image_extensions, extension)
    }

    pub fn is_flash(&self, extension: &str) -> bool {
        contains_ignore_case(&self.flash_extensions, extension)
    }

    /// Anything that is not an inline image is offered as a download.
    pub fn is_download(&self, extension: &str) -> bool {
        !self.is_image(extension)
    }
}

fn contains_ignore_case(list: &[String], extension: &str) -> bool {
    !extension.is_empty() && list.iter().any(|e| e.eq_ignore_ascii_case(extension))
}

/// Extension of a file name (text after the last dot), if any.
pub fn file_extension(name: &str) -> Option<&str> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && !ext.contains('/'))
}

pub fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "swf" => "application/x-shockwave-flash",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

pub fn extension_for_mime_type(mime_type: &str) -> Option<&'static str> {
    let ext = match mime_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/tiff" => "tif",
        "image/webp" => "webp",
        "application/x-shockwave-flash" => "swf",
        "application/pdf" => "pdf",
        "application/zip" => "zip",
        _ => return None,
    };
    Some(ext)
}
