//! Pure predicate functions for constraint matching.
//!
//! All functions here are pure and testable without any assets. Constraint
//! values `<= 0` never constrain; negative values only reach these functions
//! when the policy treats them as unconstrained.

use std::cmp::Ordering;

/// Check one axis: exact match when `fixed` is set, otherwise the inclusive
/// `min..=max` bounds, each ignored when unset.
///
/// ```text
/// fixed=800           → 800 only
/// min=400, max=800    → 400..=800
/// min=400             → 400..
/// ```
pub fn dimension_matches(actual: u32, fixed: i64, min: i64, max: i64) -> bool {
    let actual = i64::from(actual);
    if fixed > 0 {
        return actual == fixed;
    }
    (min <= 0 || actual >= min) && (max <= 0 || actual <= max)
}

/// Check the candidate's width/height ratio against `ratio` within
/// `tolerance`. A candidate without pixel dimensions never satisfies a set
/// ratio.
pub fn ratio_matches(width: u32, height: u32, ratio: f64, tolerance: f64) -> bool {
    if ratio.is_nan() || ratio <= 0.0 {
        return true;
    }
    if width == 0 || height == 0 {
        return false;
    }
    (width as f64 / height as f64 - ratio).abs() <= tolerance
}

/// Check a byte size against `max`. Unknown sizes pass: a virtual crop has no
/// binary yet.
pub fn file_size_matches(size: Option<u64>, max: i64) -> bool {
    max <= 0 || size.is_none_or(|s| s <= max as u64)
}

/// Ordering of stored candidates: larger area first. On equal area the
/// original goes last, except in the top tier (`top_area`) where it leads.
/// Remaining ties fall back to the path so the order is total.
pub fn compare_stored(
    a: (u64, bool, &str),
    b: (u64, bool, &str),
    top_area: u64,
) -> Ordering {
    let (area_a, original_a, path_a) = a;
    let (area_b, original_b, path_b) = b;
    area_b
        .cmp(&area_a)
        .then_with(|| {
            if area_a == top_area {
                original_b.cmp(&original_a)
            } else {
                original_a.cmp(&original_b)
            }
        })
        .then_with(|| path_a.cmp(path_b))
}
