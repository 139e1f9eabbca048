use clap::{Parser, Subcommand};
use lightbox::imaging::{BackColor, RustBackend};
use lightbox::rotation_cache::RotationCacheStore;
use lightbox::transform::TransformOp;
use lightbox::{config, session, thumbnail};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lightbox")]
#[command(about = "Directory image browser core — rotation cache and thumbnails")]
#[command(long_about = "\
Directory image browser core — rotation cache and thumbnails

Rotations and flips are non-destructive: they are recorded per image in a
small per-directory cache file (rotation_cache.txt by default) and replayed
on load. Thumbnails are generated in parallel into a disk cache keyed by
their rendering parameters.

Transform ops: Identity, FlipHorizontal, FlipVertical, Rotate90, Rotate180,
Rotate270, Rotate90FlipHorizontal, Rotate270FlipHorizontal.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "lightbox.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the recognized image files of a directory
    List {
        directory: PathBuf,
    },
    /// Generate thumbnails for a directory's images
    Thumbs {
        directory: PathBuf,
        /// Thumbnail box width in pixels
        #[arg(long, default_value_t = 160)]
        width: u32,
        /// Thumbnail box height in pixels
        #[arg(long, default_value_t = 120)]
        height: u32,
        /// Background fill color (RRGGBB or #RRGGBB)
        #[arg(long, default_value = "000000")]
        background: BackColor,
        /// Transform applied to every thumbnail
        #[arg(long, default_value = "Identity")]
        transform: TransformOp,
        /// Thumbnail cache directory (default: <directory>/.lightbox-thumbs)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
        /// Skip the disk cache — compute every thumbnail directly
        #[arg(long)]
        no_cache: bool,
    },
    /// Inspect or edit a directory's rotation cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Print all records of the rotation cache
    Show {
        directory: PathBuf,
        /// Emit records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set an image's transform sequence (reduced before writing)
    Set {
        directory: PathBuf,
        /// Image file name (basename)
        filename: String,
        /// Transform ops, in application order
        #[arg(required = true)]
        ops: Vec<TransformOp>,
    },
    /// Remove an image's record
    Remove {
        directory: PathBuf,
        /// Image file name (basename)
        filename: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command {
        Command::List { directory } => {
            let files = session::list_image_files(&directory, &config);
            for file in &files {
                println!("{}", file.display());
            }
            eprintln!("{} image file(s)", files.len());
        }
        Command::Thumbs {
            directory,
            width,
            height,
            background,
            transform,
            cache_dir,
            no_cache,
        } => {
            let files = session::list_image_files(&directory, &config);
            let cache_dir = if no_cache {
                None
            } else {
                Some(cache_dir.unwrap_or_else(|| directory.join(".lightbox-thumbs")))
            };

            let thumbs = thumbnail::get_thumbnails(
                &RustBackend::new(),
                &files,
                width,
                height,
                background,
                transform,
                cache_dir.as_deref(),
            )?;

            for thumb in &thumbs {
                println!("{}", thumb.key);
            }
            match &cache_dir {
                Some(dir) => eprintln!(
                    "{} thumbnail(s) at {width}x{height}, cached in {}",
                    thumbs.len(),
                    dir.display()
                ),
                None => eprintln!("{} thumbnail(s) at {width}x{height}, uncached", thumbs.len()),
            }
        }
        Command::Cache(cache_command) => {
            let store = RotationCacheStore::new(config.rotation_cache_filename.clone());
            match cache_command {
                CacheCommand::Show { directory, json } => {
                    let records = store.read_all(&directory)?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&records)?);
                    } else {
                        for record in &records {
                            let ops: Vec<&str> =
                                record.ops.iter().map(|op| op.name()).collect();
                            println!("{}\t{}", record.filename, ops.join("-"));
                        }
                        eprintln!("{} record(s)", records.len());
                    }
                }
                CacheCommand::Set {
                    directory,
                    filename,
                    ops,
                } => {
                    let persisted = store.flush(&directory, &filename, &ops)?;
                    if persisted.is_empty() {
                        eprintln!("{filename}: sequence cancels out, record removed");
                    } else {
                        let names: Vec<&str> = persisted.iter().map(|op| op.name()).collect();
                        eprintln!("{filename}: {}", names.join("-"));
                    }
                }
                CacheCommand::Remove {
                    directory,
                    filename,
                } => {
                    store.flush(&directory, &filename, &[])?;
                    eprintln!("{filename}: record removed");
                }
            }
        }
    }

    Ok(())
}
