//! The caller's constraint bundle for one selection.

use crate::format::MediaFormat;

/// Constraints and flags for a rendition lookup.
///
/// With media formats set, each format is a complete alternative and the
/// args-level extensions and fixed dimensions narrow every one of them.
/// Without formats, the args-level constraints alone decide.
///
/// There is no "must be image" flag: type requirements are a post-filter on
/// the selected rendition, see [`Asset::image_rendition`](crate::asset::Asset::image_rendition).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaArgs {
    /// Alternative formats, tried in ranking order.
    pub media_formats: Vec<MediaFormat>,
    /// Allowed extensions on top of any format restriction. Empty means any.
    pub file_extensions: Vec<String>,
    /// Exact width (0 = unconstrained).
    pub fixed_width: u32,
    /// Exact height (0 = unconstrained).
    pub fixed_height: u32,
    /// Only accept renditions that are offered as downloads.
    pub download: bool,
    /// Offer asset thumbnails as candidates.
    pub include_asset_thumbnails: bool,
    /// Alt text override for the asset.
    pub alt_text: Option<String>,
}

impl MediaArgs {
    /// Args carrying the given formats and nothing else.
    pub fn with_formats(formats: impl IntoIterator<Item = MediaFormat>) -> Self {
        Self {
            media_formats: formats.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Formats in the order they are tried: ascending ranking, ties kept in
    /// declaration order.
    pub(crate) fn formats_by_ranking(&self) -> Vec<&MediaFormat> {
        let mut formats: Vec<&MediaFormat> = self.media_formats.iter().collect();
        formats.sort_by_key(|f| f.ranking());
        formats
    }
}
