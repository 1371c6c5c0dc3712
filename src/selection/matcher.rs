//! Constraint matching: pick the first candidate that satisfies a format.
//!
//! Formats are tried in ascending ranking (declaration order on ties). For
//! each format the candidates are walked in the order the
//! [`CropRenditionHandler`](super::CropRenditionHandler) produced, and the
//! first candidate passing every check wins:
//!
//! | Check | Rule |
//! |---|---|
//! | Type | download formats need a download candidate; others an image or flash |
//! | Extension | in the format's list (if any) and in the args' list (if any) |
//! | Dimension | fixed width/height exact, else min/max bounds (skipped for downloads) |
//! | Ratio | within tolerance of the format ratio (skipped for downloads) |
//! | File size | at most `file_size_max`; unknown sizes pass |
//!
//! With no formats at all, only the args-level constraints apply and any file
//! type is accepted unless `download` is requested.

use super::SelectionPolicy;
use super::args::MediaArgs;
use super::calculations::{dimension_matches, file_size_matches, ratio_matches};
use crate::config::NegativeConstraintPolicy;
use crate::format::MediaFormat;
use crate::rendition::RenditionMetadata;
use std::fmt;
use tracing::{debug, trace, warn};

/// The selected candidate and the format it satisfied.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub rendition: RenditionMetadata,
    /// `None` when the args carried no formats.
    pub media_format: Option<MediaFormat>,
}

/// Why a candidate failed a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    Type,
    Extension,
    Dimension,
    Ratio,
    FileSize,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Mismatch::Type => "file type",
            Mismatch::Extension => "extension",
            Mismatch::Dimension => "dimension",
            Mismatch::Ratio => "ratio",
            Mismatch::FileSize => "file size",
        };
        f.write_str(reason)
    }
}

/// Select the best candidate for `args`, or `None` when nothing matches.
pub fn select(
    candidates: &[RenditionMetadata],
    args: &MediaArgs,
    policy: &SelectionPolicy,
) -> Option<Selection> {
    if args.media_formats.is_empty() {
        let rendition = candidates
            .iter()
            .find(|c| check_args(c, args, policy).is_ok())?;
        debug!(rendition = rendition.path(), "selected without media format");
        return Some(Selection {
            rendition: rendition.clone(),
            media_format: None,
        });
    }

    for format in args.formats_by_ranking() {
        if policy.negative_constraints == NegativeConstraintPolicy::Reject
            && let Some(field) = format.first_negative_constraint()
        {
            warn!(format = format.name(), field, "negative constraint, format skipped");
            continue;
        }
        for candidate in candidates {
            match check_format(candidate, format, args, policy) {
                Ok(()) => {
                    debug!(
                        format = format.name(),
                        rendition = candidate.path(),
                        "selected rendition"
                    );
                    return Some(Selection {
                        rendition: candidate.clone(),
                        media_format: Some(format.clone()),
                    });
                }
                Err(reason) => trace!(
                    format = format.name(),
                    rendition = candidate.path(),
                    %reason,
                    "candidate rejected"
                ),
            }
        }
    }
    debug!("no rendition matches any media format");
    None
}

/// Check one candidate against one format plus the args-level constraints.
pub fn check_format(
    candidate: &RenditionMetadata,
    format: &MediaFormat,
    args: &MediaArgs,
    policy: &SelectionPolicy,
) -> Result<(), Mismatch> {
    let types = &policy.file_types;
    let extension = candidate.extension();
    let download = format.is_download() || args.download;

    if download {
        if !types.is_download(extension) {
            return Err(Mismatch::Type);
        }
    } else if !types.is_image(extension) && !types.is_flash(extension) {
        return Err(Mismatch::Type);
    }

    if !extension_allowed(extension, format.extensions())
        || !extension_allowed(extension, &args.file_extensions)
    {
        return Err(Mismatch::Extension);
    }

    check_fixed_args(candidate, args)?;

    if !format.is_download() {
        let (w, h) = (candidate.width(), candidate.height());
        if !dimension_matches(w, format.width(), format.min_width(), format.max_width())
            || !dimension_matches(h, format.height(), format.min_height(), format.max_height())
        {
            return Err(Mismatch::Dimension);
        }
        if !ratio_matches(w, h, format.ratio(), policy.ratio_tolerance) {
            return Err(Mismatch::Ratio);
        }
    }

    if !file_size_matches(candidate.file_size(), format.file_size_max()) {
        return Err(Mismatch::FileSize);
    }
    Ok(())
}

/// Args-only check, used when no media format is given.
fn check_args(
    candidate: &RenditionMetadata,
    args: &MediaArgs,
    policy: &SelectionPolicy,
) -> Result<(), Mismatch> {
    if args.download && !policy.file_types.is_download(candidate.extension()) {
        return Err(Mismatch::Type);
    }
    if !extension_allowed(candidate.extension(), &args.file_extensions) {
        return Err(Mismatch::Extension);
    }
    check_fixed_args(candidate, args)
}

fn check_fixed_args(candidate: &RenditionMetadata, args: &MediaArgs) -> Result<(), Mismatch> {
    let width_ok = dimension_matches(candidate.width(), i64::from(args.fixed_width), 0, 0);
    let height_ok = dimension_matches(candidate.height(), i64::from(args.fixed_height), 0, 0);
    if width_ok && height_ok {
        Ok(())
    } else {
        Err(Mismatch::Dimension)
    }
}

/// Empty entries are ignored; a list with no usable entries allows anything.
fn extension_allowed(extension: &str, allowed: &[String]) -> bool {
    let mut allowed = allowed.iter().map(|e| e.trim()).filter(|e| !e.is_empty()).peekable();
    allowed.peek().is_none() || allowed.any(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::CropDimension;
    use crate::format::MediaFormatBuilder;
    use crate::selection::CropRenditionHandler;
    use crate::test_helpers::*;

    fn candidates(crop: Option<CropDimension>) -> Vec<RenditionMetadata> {
        let policy = SelectionPolicy::default();
        CropRenditionHandler::new(&standard_renditions(), crop, &policy)
            .available_renditions(&MediaArgs::default())
    }

    fn select_default(candidates: &[RenditionMetadata], args: &MediaArgs) -> Option<Selection> {
        select(candidates, args, &SelectionPolicy::default())
    }

    fn selected_name(selection: Option<Selection>) -> Option<String> {
        selection.map(|s| s.rendition.name().to_string())
    }

    #[test]
    fn no_formats_returns_first_candidate() {
        let c = candidates(Some(standard_crop()));
        let selection = select_default(&c, &MediaArgs::default()).unwrap();
        assert!(selection.rendition.is_virtual());
        assert_eq!(selection.media_format, None);
    }

    #[test]
    fn no_candidates_yields_none() {
        let args = MediaArgs::with_formats([MediaFormatBuilder::create("any").build().unwrap()]);
        assert_eq!(select_default(&[], &args), None);
        assert_eq!(select_default(&[], &MediaArgs::default()), None);
    }

    #[test]
    fn fixed_dimension_format_picks_virtual_crop() {
        let stage = MediaFormatBuilder::create("home_stage")
            .fixed_dimension(960, 315)
            .build()
            .unwrap();
        let c = candidates(Some(standard_crop()));
        let selection = select_default(&c, &MediaArgs::with_formats([stage.clone()])).unwrap();
        assert!(selection.rendition.is_virtual());
        assert_eq!(selection.media_format, Some(stage));
    }

    #[test]
    fn fixed_dimension_without_crop_has_no_match() {
        let stage = MediaFormatBuilder::create("home_stage")
            .fixed_dimension(960, 315)
            .build()
            .unwrap();
        let c = candidates(None);
        assert_eq!(select_default(&c, &MediaArgs::with_formats([stage])), None);
    }

    #[test]
    fn range_format_picks_largest_within_bounds() {
        let teaser = MediaFormatBuilder::create("teaser")
            .width_range(400, 1000)
            .build()
            .unwrap();
        let c = candidates(None);
        let selected = selected_name(select_default(&c, &MediaArgs::with_formats([teaser])));
        assert_eq!(selected.as_deref(), Some("cq5dam.web.960.960.jpg"));
    }

    #[test]
    fn ratio_format_skips_wrong_ratio() {
        // Virtual crop 960x315 is ~3.05; the 16:9 stored renditions follow it
        let wide = MediaFormatBuilder::create("wide")
            .ratio_of(16, 9)
            .max_width(1280)
            .build()
            .unwrap();
        let c = candidates(Some(standard_crop()));
        let selected = selected_name(select_default(&c, &MediaArgs::with_formats([wide])));
        assert_eq!(selected.as_deref(), Some("cq5dam.web.1280.1280.jpg"));
    }

    #[test]
    fn extension_restriction_case_insensitive() {
        let swf = MediaFormatBuilder::create("movie")
            .extensions(["SWF"])
            .build()
            .unwrap();
        let c = candidates(None);
        let selected = selected_name(select_default(&c, &MediaArgs::with_formats([swf])));
        assert_eq!(selected.as_deref(), Some("intro.swf"));
    }

    #[test]
    fn empty_extension_entries_ignored() {
        let format = MediaFormatBuilder::create("blank")
            .extensions(["", "  "])
            .build()
            .unwrap();
        let c = candidates(None);
        let selected = selected_name(select_default(&c, &MediaArgs::with_formats([format])));
        assert_eq!(selected.as_deref(), Some("original"));
    }

    #[test]
    fn args_extensions_narrow_formats() {
        let any = MediaFormatBuilder::create("any").build().unwrap();
        let args = MediaArgs {
            file_extensions: vec!["png".to_string()],
            ..MediaArgs::with_formats([any])
        };
        assert_eq!(select_default(&candidates(None), &args), None);
    }

    #[test]
    fn file_size_max_filters_stored_but_not_virtual() {
        let small = MediaFormatBuilder::create("small")
            .file_size_max(60_000)
            .build()
            .unwrap();
        let c = candidates(Some(standard_crop()));
        let selected = select_default(&c, &MediaArgs::with_formats([small.clone()])).unwrap();
        assert!(selected.rendition.is_virtual());

        let c = candidates(None);
        let selected = selected_name(select_default(&c, &MediaArgs::with_formats([small])));
        assert_eq!(selected.as_deref(), Some("teaser.480.270.jpg"));
    }

    #[test]
    fn download_format_against_images_only_yields_none() {
        let download = MediaFormatBuilder::create("download")
            .download(true)
            .build()
            .unwrap();
        let images_only: Vec<RenditionMetadata> = candidates(None)
            .into_iter()
            .filter(|c| SelectionPolicy::default().file_types.is_image(c.extension()))
            .collect();
        assert!(!images_only.is_empty());
        assert_eq!(
            select_default(&images_only, &MediaArgs::with_formats([download])),
            None
        );

        let image = MediaFormatBuilder::create("image").build().unwrap();
        let selected = selected_name(select_default(&images_only, &MediaArgs::with_formats([image])));
        assert_eq!(selected.as_deref(), Some("original"));
    }

    #[test]
    fn download_format_skips_dimension_checks() {
        let download = MediaFormatBuilder::create("download")
            .download(true)
            .fixed_dimension(1, 1)
            .extensions(["pdf"])
            .build()
            .unwrap();
        let c = candidates(None);
        let selected = selected_name(select_default(&c, &MediaArgs::with_formats([download])));
        assert_eq!(selected.as_deref(), Some("brochure.pdf"));
    }

    #[test]
    fn non_download_format_never_returns_pdf() {
        let any = MediaFormatBuilder::create("any").extensions(["pdf"]).build().unwrap();
        let c = candidates(None);
        let result = select_default(&c, &MediaArgs::with_formats([any]));
        assert_eq!(result, None);
    }

    #[test]
    fn lower_ranking_format_wins_even_with_worse_candidate() {
        let large = MediaFormatBuilder::create("large")
            .min_width(1000)
            .ranking(20)
            .build()
            .unwrap();
        let small = MediaFormatBuilder::create("small")
            .max_width(500)
            .ranking(10)
            .build()
            .unwrap();
        let c = candidates(None);
        let selection = select_default(&c, &MediaArgs::with_formats([large, small])).unwrap();
        assert_eq!(selection.media_format.unwrap().name(), "small");
        assert_eq!(selection.rendition.name(), "teaser.480.270.jpg");
    }

    #[test]
    fn ranking_ties_keep_declaration_order() {
        let first = MediaFormatBuilder::create("first").max_width(500).build().unwrap();
        let second = MediaFormatBuilder::create("second").build().unwrap();
        let c = candidates(None);
        let selection = select_default(&c, &MediaArgs::with_formats([first, second])).unwrap();
        assert_eq!(selection.media_format.unwrap().name(), "first");
    }

    #[test]
    fn unmatched_format_falls_through_to_next() {
        let impossible = MediaFormatBuilder::create("impossible")
            .fixed_dimension(7, 7)
            .build()
            .unwrap();
        let any = MediaFormatBuilder::create("any").ranking(5).build().unwrap();
        let c = candidates(None);
        let selection = select_default(&c, &MediaArgs::with_formats([impossible, any])).unwrap();
        assert_eq!(selection.media_format.unwrap().name(), "any");
    }

    #[test]
    fn negative_policy_unconstrained_treats_as_zero() {
        let neg = MediaFormatBuilder::create("neg").width(-1).build().unwrap();
        let c = candidates(None);
        assert!(select_default(&c, &MediaArgs::with_formats([neg])).is_some());
    }

    #[test]
    fn negative_policy_reject_skips_format() {
        let policy = SelectionPolicy {
            negative_constraints: NegativeConstraintPolicy::Reject,
            ..SelectionPolicy::default()
        };
        let neg = MediaFormatBuilder::create("neg").max_height(-1).build().unwrap();
        let c = candidates(None);
        assert_eq!(select(&c, &MediaArgs::with_formats([neg]), &policy), None);
    }

    #[test]
    fn args_fixed_dimension_without_formats() {
        let args = MediaArgs {
            fixed_width: 480,
            fixed_height: 270,
            ..MediaArgs::default()
        };
        let selected = selected_name(select_default(&candidates(None), &args));
        assert_eq!(selected.as_deref(), Some("teaser.480.270.jpg"));
    }

    #[test]
    fn args_download_without_formats() {
        let args = MediaArgs {
            download: true,
            ..MediaArgs::default()
        };
        let selected = selected_name(select_default(&candidates(None), &args));
        assert_eq!(selected.as_deref(), Some("intro.swf"));
    }

    #[test]
    fn check_format_reports_reason() {
        let policy = SelectionPolicy::default();
        let c = candidates(None);
        let original = &c[0];
        let args = MediaArgs::default();

        let fixed = MediaFormatBuilder::create("f").width(10).build().unwrap();
        assert_eq!(check_format(original, &fixed, &args, &policy), Err(Mismatch::Dimension));

        let square = MediaFormatBuilder::create("s").ratio(1.0).build().unwrap();
        assert_eq!(check_format(original, &square, &args, &policy), Err(Mismatch::Ratio));

        let png = MediaFormatBuilder::create("p").extensions(["png"]).build().unwrap();
        assert_eq!(check_format(original, &png, &args, &policy), Err(Mismatch::Extension));

        let tiny = MediaFormatBuilder::create("t").file_size_max(1).build().unwrap();
        assert_eq!(check_format(original, &tiny, &args, &policy), Err(Mismatch::FileSize));

        let download = MediaFormatBuilder::create("d").download(true).build().unwrap();
        assert_eq!(check_format(original, &download, &args, &policy), Err(Mismatch::Type));
    }

    #[test]
    fn extension_allowed_rules() {
        assert!(extension_allowed("jpg", &[]));
        assert!(extension_allowed("jpg", &["".to_string()]));
        assert!(extension_allowed("jpg", &["JPG".to_string()]));
        assert!(!extension_allowed("jpg", &["png".to_string()]));
        assert!(!extension_allowed("", &["png".to_string()]));
    }
}
