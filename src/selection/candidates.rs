//! Candidate enumeration for one asset, including the virtual crop rendition.
//!
//! ## Candidate Order
//!
//! ```text
//! 1. virtual crop rendition          (only when a crop was requested)
//! 2. stored renditions               larger area first, original last on ties
//!                                    (first when tied for the largest area)
//! 3. asset thumbnails                (only with include_asset_thumbnails)
//! ```
//!
//! The order is what the matcher walks, so the first candidate that satisfies
//! a format is the one returned.
//!
//! ## Crop Source
//!
//! The crop rectangle is cut from one stored image rendition that contains
//! it. Which one is decided by [`CropSourcePolicy`]; by default the largest
//! generated rendition that fits wins over the original, because editors draw
//! crops on the web rendition.

use super::SelectionPolicy;
use super::args::MediaArgs;
use super::calculations::compare_stored;
use crate::config::CropSourcePolicy;
use crate::crop::CropDimension;
use crate::rendition::RenditionMetadata;
use crate::source::StoredRendition;
use std::collections::HashSet;
use tracing::debug;

/// Builds the ordered candidate list for one asset and an optional crop.
#[derive(Debug, Clone)]
pub struct CropRenditionHandler<'a> {
    renditions: Vec<RenditionMetadata>,
    crop: Option<CropDimension>,
    policy: &'a SelectionPolicy,
}

impl<'a> CropRenditionHandler<'a> {
    /// Duplicate paths in `stored` are dropped, first occurrence wins.
    pub fn new(
        stored: &[StoredRendition],
        crop: Option<CropDimension>,
        policy: &'a SelectionPolicy,
    ) -> Self {
        let mut seen = HashSet::new();
        let renditions = stored
            .iter()
            .filter(|r| seen.insert(r.path.as_str()))
            .map(RenditionMetadata::from_stored)
            .collect();
        Self {
            renditions,
            crop: crop.filter(|c| !c.is_empty()),
            policy,
        }
    }

    pub fn original_rendition(&self) -> Option<&RenditionMetadata> {
        self.renditions.iter().find(|r| r.is_original())
    }

    /// The stored rendition the crop is cut from, per the crop source policy.
    pub fn crop_source(&self) -> Option<&RenditionMetadata> {
        let crop = self.crop?;
        let mut fitting: Vec<&RenditionMetadata> = self
            .renditions
            .iter()
            .filter(|r| !r.is_thumbnail())
            .filter(|r| self.policy.file_types.is_image(r.extension()))
            .filter(|r| crop.fits_within(r.width(), r.height()))
            .collect();
        // Largest first, non-originals before the original, then by path
        fitting.sort_by(|a, b| {
            b.area()
                .cmp(&a.area())
                .then_with(|| a.is_original().cmp(&b.is_original()))
                .then_with(|| a.path().cmp(b.path()))
        });

        match self.policy.crop_source {
            CropSourcePolicy::LargestFitting => fitting
                .iter()
                .find(|r| !r.is_original())
                .or_else(|| fitting.iter().find(|r| r.is_original()))
                .copied(),
            CropSourcePolicy::SmallestFitting => {
                let smallest = fitting.last()?.area();
                fitting.into_iter().find(|r| r.area() == smallest)
            }
            CropSourcePolicy::Original => fitting.into_iter().find(|r| r.is_original()),
        }
    }

    /// The virtual rendition for the requested crop, if a source fits it.
    pub fn virtual_rendition(&self) -> Option<RenditionMetadata> {
        let crop = self.crop?;
        let Some(source) = self.crop_source() else {
            debug!(%crop, "no stored rendition contains the requested crop");
            return None;
        };
        Some(RenditionMetadata::virtual_crop(source, crop))
    }

    /// All candidates for `args`, in matching order.
    pub fn available_renditions(&self, args: &MediaArgs) -> Vec<RenditionMetadata> {
        let (mut thumbnails, mut stored): (Vec<&RenditionMetadata>, Vec<&RenditionMetadata>) =
            self.renditions.iter().partition(|r| r.is_thumbnail());
        sort_tier(&mut stored);
        sort_tier(&mut thumbnails);

        let mut candidates: Vec<RenditionMetadata> = self.virtual_rendition().into_iter().collect();
        candidates.extend(stored.into_iter().cloned());
        if args.include_asset_thumbnails {
            candidates.extend(thumbnails.into_iter().cloned());
        }
        candidates
    }
}

fn sort_tier(tier: &mut [&RenditionMetadata]) {
    let top_area = tier.iter().map(|r| r.area()).max().unwrap_or(0);
    tier.sort_by(|a, b| {
        compare_stored(
            (a.area(), a.is_original(), a.path()),
            (b.area(), b.is_original(), b.path()),
            top_area,
        )
    });
}
