//! End-to-end selection through the public API: config-defined formats,
//! an in-memory asset, and the typed rendition accessors.

use media_handler::asset::Asset;
use media_handler::config::{self, CropSourcePolicy, NegativeConstraintPolicy};
use media_handler::crop::CropDimension;
use media_handler::format::MediaFormatBuilder;
use media_handler::selection::{MediaArgs, SelectionPolicy};
use media_handler::source::{MemoryAsset, StoredRendition};

const ASSET: &str = "/content/dam/we-retail/en/activities/hiking/hiking_1.jpg";

const CONFIG: &str = r#"
[matching]
negative_constraints = "reject"

[[formats]]
name = "home_stage"
label = "Home Stage"
width = 960
height = 315
extensions = ["jpg", "png"]
rendition_group = "stage"

[[formats]]
name = "home_stage_mobile"
width = 480
height = 158
extensions = ["jpg", "png"]
rendition_group = "stage"
ranking = 10

[[formats]]
name = "teaser"
ratio = [16, 9]
max_width = 1000

[[formats]]
name = "download"
download = true

[[formats]]
name = "broken"
width = -1
internal = true
"#;

fn stored(name: &str, width: u32, height: u32, size: u64) -> StoredRendition {
    StoredRendition {
        name: name.to_string(),
        path: format!("{ASSET}/jcr:content/renditions/{name}"),
        width,
        height,
        file_size: Some(size),
        mime_type: None,
        original: false,
        thumbnail: false,
    }
}

fn hiking() -> MemoryAsset {
    MemoryAsset::new(ASSET)
        .with_rendition(StoredRendition {
            mime_type: Some("image/jpeg".to_string()),
            original: true,
            ..stored("original", 3000, 2000, 2_400_000)
        })
        .with_rendition(stored("cq5dam.web.1280.1280.jpg", 1280, 853, 310_000))
        .with_rendition(stored("cq5dam.web.800.800.jpg", 800, 450, 95_000))
        .with_rendition(stored("trail-map.pdf", 0, 0, 800_000))
        .with_rendition(StoredRendition {
            thumbnail: true,
            ..stored("cq5dam.thumbnail.140.100.png", 140, 93, 9_000)
        })
}

fn config() -> config::HandlerConfig {
    config::resolve_config(Some(toml::from_str(CONFIG).unwrap())).unwrap()
}

#[test]
fn stage_group_picks_virtual_crop() {
    let config = config();
    let registry = config.format_registry().unwrap();
    let args = MediaArgs::with_formats(registry.group("stage").into_iter().cloned());
    let crop = CropDimension::from_crop_string("100,200,1060,515").unwrap();

    let asset = Asset::new(hiking(), Some(crop), args.clone())
        .with_policy(SelectionPolicy::from_config(&config));
    let rendition = asset.image_rendition(&args).unwrap();

    assert_eq!(rendition.media_format().unwrap().name(), "home_stage");
    assert_eq!((rendition.width(), rendition.height()), (960, 315));
    assert_eq!(
        rendition.path(),
        format!(
            "{ASSET}/jcr:content/renditions/cq5dam.web.1280.1280.jpg\
             .image_file.960.315.100,200,1060,515.file/cq5dam.web.1280.1280.jpg"
        )
    );
}

#[test]
fn stage_group_without_crop_has_no_rendition() {
    let config = config();
    let registry = config.format_registry().unwrap();
    let args = MediaArgs::with_formats(registry.group("stage").into_iter().cloned());
    let asset = Asset::new(hiking(), None, args);
    assert!(asset.default_rendition().is_none());
}

#[test]
fn teaser_ratio_and_width() {
    let config = config();
    let registry = config.format_registry().unwrap();
    let teaser = registry.get("teaser").unwrap().clone();
    let asset = Asset::new(hiking(), None, MediaArgs::default());

    let rendition = asset.rendition(&MediaArgs::with_formats([teaser])).unwrap();
    assert!(rendition.path().ends_with("cq5dam.web.800.800.jpg"));
    assert!(rendition.is_image());
}

#[test]
fn download_format_picks_pdf() {
    let registry = config().format_registry().unwrap();
    let download = registry.get("download").unwrap().clone();
    let asset = Asset::new(hiking(), None, MediaArgs::default());

    let rendition = asset
        .download_rendition(&MediaArgs::with_formats([download]))
        .unwrap();
    assert!(rendition.path().ends_with("trail-map.pdf"));
    assert!(!rendition.is_image());
}

#[test]
fn internal_formats_not_offered() {
    let registry = config().format_registry().unwrap();
    let offered: Vec<&str> = registry.offered().iter().map(|f| f.name()).collect();
    assert_eq!(
        offered,
        ["home_stage", "teaser", "download", "home_stage_mobile"]
    );
    assert!(registry.get("broken").is_some());
}

#[test]
fn reject_policy_skips_negative_format() {
    let config = config();
    let policy = SelectionPolicy::from_config(&config);
    assert_eq!(policy.negative_constraints, NegativeConstraintPolicy::Reject);

    let broken = config.format_registry().unwrap().get("broken").unwrap().clone();
    let asset = Asset::new(hiking(), None, MediaArgs::default()).with_policy(policy);
    assert!(asset.rendition(&MediaArgs::with_formats([broken.clone()])).is_none());

    // Stock policy treats the same format as unconstrained
    let asset = Asset::new(hiking(), None, MediaArgs::default());
    assert!(asset.rendition(&MediaArgs::with_formats([broken])).is_some());
}

#[test]
fn thumbnails_offered_only_on_request() {
    let small = MediaFormatBuilder::create("icon")
        .max_width(200)
        .build()
        .unwrap();
    let asset = Asset::new(hiking(), None, MediaArgs::default());

    let args = MediaArgs::with_formats([small]);
    assert!(asset.rendition(&args).is_none());

    let args = MediaArgs {
        include_asset_thumbnails: true,
        ..args
    };
    let rendition = asset.rendition(&args).unwrap();
    assert!(rendition.metadata().is_thumbnail());
}

#[test]
fn original_crop_source_policy() {
    let policy = SelectionPolicy {
        crop_source: CropSourcePolicy::Original,
        ..SelectionPolicy::default()
    };
    let crop = CropDimension::new(0, 0, 960, 315);
    let asset = Asset::new(hiking(), Some(crop), MediaArgs::default()).with_policy(policy);
    let candidates = asset.available_renditions(&MediaArgs::default());

    assert!(
        candidates[0]
            .path()
            .starts_with(&format!("{ASSET}/jcr:content/renditions/original.image_file"))
    );
    assert!(candidates[0].path().ends_with(".file/original.jpg"));
}

#[test]
fn asset_accessors() {
    let asset = Asset::new(
        hiking(),
        None,
        MediaArgs {
            alt_text: Some("Hikers on a ridge".to_string()),
            ..MediaArgs::default()
        },
    );
    assert_eq!(asset.title(), "hiking_1.jpg");
    assert_eq!(asset.alt_text(), "Hikers on a ridge");
    assert_eq!(asset.description(), None);
    assert_eq!(asset.as_resource().unwrap().path, ASSET);
}

#[test]
fn concurrent_selection_is_consistent() {
    use rayon::prelude::*;

    let teaser = MediaFormatBuilder::create("teaser")
        .ratio_of(16, 9)
        .build()
        .unwrap();
    let args = MediaArgs::with_formats([teaser]);
    let asset = Asset::new(hiking(), None, args.clone());

    let paths: Vec<String> = (0..64)
        .into_par_iter()
        .map(|_| asset.default_rendition().unwrap().path().to_string())
        .collect();
    assert!(paths.windows(2).all(|w| w[0] == w[1]));
    assert!(paths[0].ends_with("cq5dam.web.800.800.jpg"));
}
