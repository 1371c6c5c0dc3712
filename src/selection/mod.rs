//! Rendition selection: candidate enumeration and constraint matching.
//!
//! Selection runs in two steps, each a pure function over in-memory data:
//!
//! ```text
//! stored renditions ──► CropRenditionHandler ──► ordered candidates
//!                         (+ virtual crop)            │
//! MediaArgs (formats) ──────────────────────────► select() ──► Option<Selection>
//! ```
//!
//! - **Calculations**: dimension, ratio and file-size predicates (unit testable)
//! - **Args**: [`MediaArgs`], the caller's constraint bundle
//! - **Candidates**: [`CropRenditionHandler`] builds the ordered candidate list
//! - **Matcher**: [`select`] walks formats × candidates and returns the first hit
//!
//! Nothing here does I/O or keeps state between calls, so selection can run
//! concurrently for any number of assets.

mod args;
mod calculations;
mod candidates;
mod matcher;

pub use args::MediaArgs;
pub use candidates::CropRenditionHandler;
pub use matcher::{Mismatch, Selection, check_format, select};

use crate::config::{CropSourcePolicy, HandlerConfig, NegativeConstraintPolicy};
use crate::rendition::FileTypes;

/// Default allowed difference between a candidate's ratio and a format ratio.
pub const RATIO_TOLERANCE: f64 = 0.05;

/// Behavioral knobs for selection, usually derived from [`HandlerConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPolicy {
    pub negative_constraints: NegativeConstraintPolicy,
    pub ratio_tolerance: f64,
    pub crop_source: CropSourcePolicy,
    pub file_types: FileTypes,
}

impl SelectionPolicy {
    pub fn from_config(config: &HandlerConfig) -> Self {
        Self {
            negative_constraints: config.matching.negative_constraints,
            ratio_tolerance: config.matching.ratio_tolerance,
            crop_source: config.crop.source,
            file_types: config.files.file_types(),
        }
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::from_config(&HandlerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_default_config() {
        let policy = SelectionPolicy::default();
        assert_eq!(policy.ratio_tolerance, RATIO_TOLERANCE);
        assert_eq!(policy.crop_source, CropSourcePolicy::LargestFitting);
        assert_eq!(
            policy.negative_constraints,
            NegativeConstraintPolicy::Unconstrained
        );
        assert!(policy.file_types.is_image("jpg"));
    }
}
