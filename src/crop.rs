//! Crop regions on an asset's pixel grid.
//!
//! Crop coordinates are persisted by the content repository as a
//! `left,top,right,bottom` string (e.g. `"0,0,960,315"`), while the rest of
//! the crate works with `(left, top, width, height)`. [`CropDimension`]
//! converts between the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CropError {
    #[error("Invalid crop string {0:?}: expected four comma-separated integers left,top,right,bottom")]
    Malformed(String),
    #[error("Invalid crop string {0:?}: right/bottom must be greater than left/top")]
    Inverted(String),
}

/// A rectangle on the original pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropDimension {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropDimension {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// A zero-area crop means "no crop".
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the crop rectangle lies within a `width` x `height` grid.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Repository crop string: `left,top,right,bottom`.
    pub fn crop_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.left,
            self.top,
            self.right(),
            self.bottom()
        )
    }

    /// Parse a `left,top,right,bottom` crop string.
    pub fn from_crop_string(value: &str) -> Result<Self, CropError> {
        let parts: Vec<u32> = value
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| CropError::Malformed(value.to_string()))?;

        let &[left, top, right, bottom] = parts.as_slice() else {
            return Err(CropError::Malformed(value.to_string()));
        };
        if right <= left || bottom <= top {
            return Err(CropError::Inverted(value.to_string()));
        }
        Ok(Self::new(left, top, right - left, bottom - top))
    }
}

impl FromStr for CropDimension {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_crop_string(s)
    }
}

impl fmt::Display for CropDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.crop_string())
    }
}
