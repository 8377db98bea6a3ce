use clap::{Parser, Subcommand};
use log::{info, warn};
use school_gallery::catalog::{AlbumRecord, Catalog, FilterCriteria, PhotoRecord};
use school_gallery::imaging::{
    CompressOptions, ImageAsset, MediaType, RustBackend, compress_images, generate_thumbnail,
    is_valid_image_type, needs_compression,
};
use school_gallery::{config, output, stats};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Declared type for files whose extension is not an image type.
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Parser)]
#[command(name = "school-gallery")]
#[command(about = "Prepare photos for upload and search a school album catalog")]
#[command(long_about = "\
Prepare photos for upload and search a school album catalog

Images are resized to fit a bounded size and re-encoded in their own format
before upload, with a square JPEG preview for grids. Album lists exported
from the backend as JSON can be searched and filtered offline.

Inputs may be files or directories; directories are walked recursively and
every .jpg, .jpeg, .png and .webp file is picked up.

Run 'school-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize and re-encode images that are ready for upload
    Compress {
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Where compressed files are written, mirroring walked subdirectories
        #[arg(long, default_value = "compressed")]
        out_dir: PathBuf,
    },
    /// Write square JPEG previews
    Thumbnail {
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long, default_value = "thumbnails")]
        out_dir: PathBuf,
        /// Side in pixels (defaults to [thumbnails].size)
        #[arg(long)]
        size: Option<u32>,
    },
    /// Report which files are accepted and which need compression
    Check {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Search an album list exported as JSON
    Search {
        /// JSON array of album records
        albums: PathBuf,
        /// Free-text query
        query: String,
        /// Restrict to a category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Restrict to a year (repeatable)
        #[arg(long = "year")]
        years: Vec<String>,
        /// Restrict to a month, 1-12 (repeatable)
        #[arg(long = "month")]
        months: Vec<String>,
        #[arg(long, default_value_t = 0)]
        min_photos: u32,
        /// Defaults to no upper bound
        #[arg(long)]
        max_photos: Option<u32>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a catalog snapshot
    Stats {
        /// JSON object with "albums" and "photos" arrays
        snapshot: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Deserialize)]
struct Snapshot {
    #[serde(default)]
    albums: Vec<AlbumRecord>,
    #[serde(default)]
    photos: Vec<PhotoRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let load_config = || config::load_config(&cli.config_dir);

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Compress { inputs, out_dir } => {
            let config = load_config()?;
            let (relatives, assets): (Vec<PathBuf>, Vec<ImageAsset>) =
                load_assets(&inputs)?.into_iter().unzip();
            let destinations = output_paths(&relatives);
            let options = CompressOptions::from(&config.compression);
            let backend = RustBackend::new();
            let outcome = compress_images(&backend, &assets, &options, |p| {
                info!("{:>3.0}% {}", p.percent, p.current);
            });

            let written = outcome.results.iter().zip(&destinations).enumerate();
            for (i, (result, destination)) in written {
                if outcome.is_degraded(i) {
                    continue;
                }
                let path = out_dir.join(destination);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &result.asset.bytes)?;
            }
            output::print_compression_report(&outcome);
        }
        Command::Thumbnail {
            inputs,
            out_dir,
            size,
        } => {
            let config = load_config()?;
            let size = size.unwrap_or(config.thumbnails.size);
            let backend = RustBackend::new();
            std::fs::create_dir_all(&out_dir)?;
            for (i, (_, asset)) in load_assets(&inputs)?.iter().enumerate() {
                let thumbnail = match generate_thumbnail(&backend, asset, size) {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("{}", e);
                        continue;
                    }
                };
                let bytes = thumbnail
                    .decode_bytes()
                    .ok_or("thumbnail data URL is not base64")?;
                std::fs::write(out_dir.join(thumbnail_file_name(&asset.name)), bytes)?;
                println!("{}", output::format_thumbnail_line(i + 1, &asset.name, &thumbnail));
            }
        }
        Command::Check { inputs } => {
            let config = load_config()?;
            for (i, (_, asset)) in load_assets(&inputs)?.iter().enumerate() {
                let valid = is_valid_image_type(asset);
                let needs = needs_compression(asset, config.compression.max_size_mb);
                println!("{}", output::format_check_line(i + 1, asset, valid, needs));
            }
        }
        Command::Search {
            albums,
            query,
            categories,
            years,
            months,
            min_photos,
            max_photos,
            json,
        } => {
            let config = load_config()?;
            for category in &categories {
                if !config.catalog.is_known_category(category) {
                    warn!("category {:?} is not in [catalog].categories", category);
                }
            }
            let records: Vec<AlbumRecord> =
                serde_json::from_str(&std::fs::read_to_string(&albums)?)?;
            let criteria = FilterCriteria::default()
                .with_categories(categories)
                .with_years(years)
                .with_months(months)
                .with_photo_count_range(min_photos, max_photos.unwrap_or(u32::MAX));

            let results = Catalog::from(&config.catalog).search(&records, &query, &criteria);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                output::print_search_results(&results, &query, &config.catalog);
            }
        }
        Command::Stats { snapshot } => {
            let snapshot: Snapshot = serde_json::from_str(&std::fs::read_to_string(&snapshot)?)?;
            let stats = stats::catalog_stats(&snapshot.albums, &snapshot.photos, chrono::Utc::now());
            output::print_stats(&stats);
        }
    }

    Ok(())
}

/// Expand files and directories into image assets, in walk order, each with
/// its path relative to the input it came from.
///
/// Files given explicitly are always loaded so unsupported ones can be
/// reported; files found by walking a directory are kept only when their
/// extension is an image type.
fn load_assets(inputs: &[PathBuf]) -> std::io::Result<Vec<(PathBuf, ImageAsset)>> {
    let mut assets = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && media_type_for(entry.path()).is_some() {
                    let relative = entry.path().strip_prefix(input).unwrap_or(entry.path());
                    assets.push((relative.to_path_buf(), load_asset(entry.path())?));
                }
            }
        } else {
            let asset = load_asset(input)?;
            assets.push((PathBuf::from(&asset.name), asset));
        }
    }
    Ok(assets)
}

/// Distinct output paths for `relatives`. A path seen before gets the input's
/// position appended to its stem, so `a.jpg` twice becomes `a.jpg`, `a-2.jpg`.
fn output_paths(relatives: &[PathBuf]) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    relatives
        .iter()
        .enumerate()
        .map(|(i, relative)| {
            if taken.insert(relative.clone()) {
                return relative.clone();
            }
            let stem = relative
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = match relative.extension() {
                Some(ext) => format!("{stem}-{}.{}", i + 1, ext.to_string_lossy()),
                None => format!("{stem}-{}", i + 1),
            };
            let renamed = relative.with_file_name(name);
            warn!(
                "{} collides with an earlier input, writing {}",
                relative.display(),
                renamed.display()
            );
            taken.insert(renamed.clone());
            renamed
        })
        .collect()
}

fn media_type_for(path: &Path) -> Option<MediaType> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(MediaType::from_extension)
}

fn load_asset(path: &Path) -> std::io::Result<ImageAsset> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = media_type_for(path).map_or(UNKNOWN_MEDIA_TYPE, MediaType::mime);
    Ok(ImageAsset::new(name, media_type, bytes))
}

/// `assembly.png` → `assembly.thumb.jpg`
fn thumbnail_file_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    format!("{stem}.thumb.{}", MediaType::Jpeg.extension())
}
