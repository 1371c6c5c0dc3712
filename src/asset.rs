//! The per-request asset aggregate and its rendition accessors.
//!
//! An [`Asset`] ties an [`AssetSource`] to the crop and default constraints
//! of one media reference. Every accessor takes a fresh rendition snapshot
//! from the source, builds candidates, and runs the matcher:
//!
//! ```text
//! source.renditions() ──► CropRenditionHandler ──► select() ──► Rendition
//!                          (crop, thumbnails)       (formats)     (type post-filter)
//! ```
//!
//! The typed accessors ([`Asset::image_rendition`] and friends) only check the
//! type of the one rendition the matcher picked. A best match of the wrong
//! type yields `None` instead of falling through to a worse candidate.

use crate::crop::CropDimension;
use crate::format::MediaFormat;
use crate::rendition::{FileTypes, RenditionMetadata};
use crate::selection::{CropRenditionHandler, MediaArgs, SelectionPolicy, select};
use crate::source::{AssetSource, ResourceView};
use serde::Serialize;
use tracing::debug;

/// A content asset bound to the crop and defaults of one media reference.
#[derive(Debug, Clone)]
pub struct Asset<S: AssetSource> {
    source: S,
    crop: Option<CropDimension>,
    default_args: MediaArgs,
    policy: SelectionPolicy,
}

impl<S: AssetSource> Asset<S> {
    pub fn new(source: S, crop: Option<CropDimension>, default_args: MediaArgs) -> Self {
        Self {
            source,
            crop,
            default_args,
            policy: SelectionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &str {
        self.source.path()
    }

    pub fn crop(&self) -> Option<CropDimension> {
        self.crop
    }

    pub fn default_args(&self) -> &MediaArgs {
        &self.default_args
    }

    /// Metadata title, else the asset name.
    pub fn title(&self) -> String {
        self.source
            .metadata()
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.source.name().to_string())
    }

    /// Alt text from the default args, else the title.
    pub fn alt_text(&self) -> String {
        self.default_args
            .alt_text
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.title())
    }

    pub fn description(&self) -> Option<String> {
        self.source.metadata().description
    }

    /// Candidates for `args` in matching order.
    pub fn available_renditions(&self, args: &MediaArgs) -> Vec<RenditionMetadata> {
        let stored = self.source.renditions();
        CropRenditionHandler::new(&stored, self.crop, &self.policy).available_renditions(args)
    }

    /// Rendition for the asset's own default args.
    pub fn default_rendition(&self) -> Option<Rendition> {
        self.rendition(&self.default_args)
    }

    pub fn rendition(&self, args: &MediaArgs) -> Option<Rendition> {
        let candidates = self.available_renditions(args);
        let selection = select(&candidates, args, &self.policy)?;
        if selection.rendition.path().is_empty() {
            debug!(asset = self.path(), "selected rendition has no path");
            return None;
        }
        Some(Rendition::new(
            selection.rendition,
            selection.media_format,
            &self.policy.file_types,
        ))
    }

    pub fn image_rendition(&self, args: &MediaArgs) -> Option<Rendition> {
        self.rendition(args).filter(Rendition::is_image)
    }

    pub fn flash_rendition(&self, args: &MediaArgs) -> Option<Rendition> {
        self.rendition(args).filter(Rendition::is_flash)
    }

    pub fn download_rendition(&self, args: &MediaArgs) -> Option<Rendition> {
        self.rendition(args).filter(Rendition::is_download)
    }

    /// The underlying repository handle.
    pub fn as_repository_handle(&self) -> Option<&S> {
        Some(&self.source)
    }

    /// The repository resource, when the source is backed by one.
    pub fn as_resource(&self) -> Option<ResourceView> {
        self.source.resource()
    }
}

/// A selected rendition with its matched format and type classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendition {
    metadata: RenditionMetadata,
    media_format: Option<MediaFormat>,
    image: bool,
    flash: bool,
    download: bool,
}

impl Rendition {
    fn new(
        metadata: RenditionMetadata,
        media_format: Option<MediaFormat>,
        types: &FileTypes,
    ) -> Self {
        let extension = metadata.extension();
        Self {
            image: types.is_image(extension),
            flash: types.is_flash(extension),
            download: types.is_download(extension),
            metadata,
            media_format,
        }
    }

    pub fn metadata(&self) -> &RenditionMetadata {
        &self.metadata
    }

    pub fn media_format(&self) -> Option<&MediaFormat> {
        self.media_format.as_ref()
    }

    pub fn path(&self) -> &str {
        self.metadata.path()
    }

    pub fn width(&self) -> u32 {
        self.metadata.width()
    }

    pub fn height(&self) -> u32 {
        self.metadata.height()
    }

    pub fn is_image(&self) -> bool {
        self.image
    }

    pub fn is_flash(&self) -> bool {
        self.flash
    }

    pub fn is_download(&self) -> bool {
        self.download
    }
}
