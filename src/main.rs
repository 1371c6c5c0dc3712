use clap::{Parser, Subcommand, ValueEnum};
use media_handler::asset::{Asset, Rendition};
use media_handler::config::{self, HandlerConfig};
use media_handler::crop::CropDimension;
use media_handler::format::MediaFormat;
use media_handler::output;
use media_handler::selection::{MediaArgs, SelectionPolicy};
use media_handler::source::{self, SourceError};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{Level, debug};

#[derive(Parser)]
#[command(name = "media-handler")]
#[command(about = "Pick the rendition of a content asset that fits a media format")]
#[command(long_about = "\
Pick the rendition of a content asset that fits a media format

An asset is either a directory or a JSON manifest:

  standard.jpg/
  ├── metadata.json                  # optional {\"title\": ..., \"description\": ...}
  └── renditions/
      ├── original                   # the uploaded binary
      ├── cq5dam.web.1280.1280.jpg   # generated renditions
      └── cq5dam.thumbnail.319.319.png

  standard.json                      # {\"path\": ..., \"renditions\": [...]}

Media formats are defined in the config file under [[formats]].

Candidate order:
  1. virtual crop rendition (with --crop)
  2. stored renditions, largest first
  3. thumbnails (with --thumbnails)

Run 'media-handler gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file; stock defaults apply when it does not exist
    #[arg(long, default_value = "media-handler.toml", global = true)]
    config: PathBuf,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that enumerate candidates.
#[derive(clap::Args, Clone)]
struct CandidateArgs {
    /// Crop rectangle in repository notation
    #[arg(long, value_name = "LEFT,TOP,RIGHT,BOTTOM")]
    crop: Option<CropDimension>,

    /// Offer asset thumbnails as candidates
    #[arg(long)]
    thumbnails: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Any,
    Image,
    Flash,
    Download,
}

#[derive(Subcommand)]
enum Command {
    /// List the candidate renditions of an asset in matching order
    Candidates {
        asset: PathBuf,
        #[command(flatten)]
        candidates: CandidateArgs,
    },
    /// Select the best rendition of each asset
    Select {
        #[arg(required = true)]
        assets: Vec<PathBuf>,
        #[command(flatten)]
        candidates: CandidateArgs,
        /// Media format from the config (repeatable)
        #[arg(long = "format", value_name = "NAME")]
        formats: Vec<String>,
        /// All media formats of a rendition group
        #[arg(long)]
        group: Option<String>,
        /// Allowed file extension (repeatable)
        #[arg(long = "extension", value_name = "EXT")]
        extensions: Vec<String>,
        /// Required type of the selected rendition
        #[arg(long, value_enum, default_value_t = Kind::Any)]
        kind: Kind,
    },
    /// List the media formats offered by the config
    Formats,
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Candidates { asset, candidates } => {
            let config = config::load_config(&cli.config)?;
            let source = source::open_asset(&asset, &config.files.thumbnail_prefix)?;
            let asset = Asset::new(source, candidates.crop, MediaArgs::default())
                .with_policy(SelectionPolicy::from_config(&config));
            let args = MediaArgs {
                include_asset_thumbnails: candidates.thumbnails,
                ..MediaArgs::default()
            };
            output::print_candidates(asset.path(), &asset.available_renditions(&args));
        }
        Command::Select {
            assets,
            candidates,
            formats,
            group,
            extensions,
            kind,
        } => {
            let config = config::load_config(&cli.config)?;
            let args = MediaArgs {
                media_formats: resolve_formats(&config, &formats, group.as_deref())?,
                file_extensions: extensions,
                include_asset_thumbnails: candidates.thumbnails,
                ..MediaArgs::default()
            };
            let policy = SelectionPolicy::from_config(&config);
            debug!(assets = assets.len(), formats = args.media_formats.len(), "selecting");

            let results: Vec<Result<(String, Option<Rendition>), SourceError>> = assets
                .par_iter()
                .map(|path| {
                    let source = source::open_asset(path, &config.files.thumbnail_prefix)?;
                    let asset = Asset::new(source, candidates.crop, args.clone())
                        .with_policy(policy.clone());
                    let rendition = match kind {
                        Kind::Any => asset.rendition(&args),
                        Kind::Image => asset.image_rendition(&args),
                        Kind::Flash => asset.flash_rendition(&args),
                        Kind::Download => asset.download_rendition(&args),
                    };
                    Ok((asset.path().to_string(), rendition))
                })
                .collect();
            for result in results {
                let (asset_path, rendition) = result?;
                output::print_selection(&asset_path, rendition.as_ref());
            }
        }
        Command::Formats => {
            let config = config::load_config(&cli.config)?;
            let registry = config.format_registry()?;
            output::print_formats(&registry.offered());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. Library code only emits events.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Look up `--format` names and `--group` members in the configured registry.
fn resolve_formats(
    config: &HandlerConfig,
    names: &[String],
    group: Option<&str>,
) -> Result<Vec<MediaFormat>, Box<dyn std::error::Error>> {
    let registry = config.format_registry()?;
    let mut formats = Vec::new();
    for name in names {
        let format = registry
            .get(name)
            .ok_or_else(|| format!("unknown media format: {}", name))?;
        formats.push(format.clone());
    }
    if let Some(group) = group {
        let members = registry.group(group);
        if members.is_empty() {
            return Err(format!("no media formats in rendition group: {}", group).into());
        }
        formats.extend(members.into_iter().cloned());
    }
    Ok(formats)
}
