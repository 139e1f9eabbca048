//! Disk-backed thumbnail cache with a parallel fan-out.
//!
//! Thumbnails are derived images: any of them can be regenerated from its
//! source at any time, so the cache needs no manifest — the cache *filename*
//! is the key. [`ThumbnailKey`] encodes every rendering parameter into the
//! name, which makes lookups a plain `exists()` check and makes concurrent
//! regeneration races harmless (two workers producing the same key write
//! identical bytes; last write wins).
//!
//! ## Cache filenames
//!
//! ```text
//! {stem}_{width}_{height}_{RRGGBB}_{transform code}{.ext}
//! dawn_100_80_000000_0.jpg
//! ```
//!
//! Changing any parameter changes the name, so stale variants never shadow
//! a request; they are simply never asked for again.
//!
//! ## Known limitation
//!
//! A cache hit is trusted as-is — there is no check against the source
//! file's modification time. A source image that changes behind an unchanged
//! path keeps serving its old cached thumbnail until the cache directory is
//! cleared.

use crate::imaging::{self, BackColor, BackendError, ImageBackend};
use crate::transform::TransformOp;
use image::DynamicImage;
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Deterministic identity of one rendered thumbnail variant.
///
/// Doubles as the on-disk cache filename and as an in-memory grouping key:
/// equal parameters always produce the same key, and any differing
/// parameter produces a different one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThumbnailKey {
    stem: String,
    extension: String,
    width: u32,
    height: u32,
    back: BackColor,
    transform: TransformOp,
}

impl ThumbnailKey {
    pub fn new(
        source: &Path,
        width: u32,
        height: u32,
        back: BackColor,
        transform: TransformOp,
    ) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Self {
            stem,
            extension,
            width,
            height,
            back,
            transform,
        }
    }

    /// The cache filename for this variant.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}{}",
            self.stem,
            self.width,
            self.height,
            self.back.hex(),
            self.transform.code(),
            self.extension
        )
    }

    /// Full path of the cached file inside `cache_directory`.
    pub fn path_in(&self, cache_directory: &Path) -> PathBuf {
        cache_directory.join(self.file_name())
    }
}

/// Re-derive a cached thumbnail's filename after its source was renamed.
///
/// The parameter suffix (width, height, color, transform code + extension)
/// is preserved; only the stem changes. Works for stems containing
/// underscores because the suffix is always the last four `_`-separated
/// tokens.
pub fn renamed_cached_file_name(cached_file_name: &str, new_stem: &str) -> String {
    let mut tail: Vec<&str> = cached_file_name.rsplitn(5, '_').take(4).collect();
    tail.reverse();
    format!("{}_{}", new_stem, tail.join("_"))
}

/// One generated thumbnail, owned by the caller.
#[derive(Debug)]
pub struct Thumbnail {
    /// Basename of the source file.
    pub key: String,
    pub image: DynamicImage,
}

/// Generate one thumbnail directly: decode, transform, fit. No caching.
pub fn thumbnail_image(
    backend: &impl ImageBackend,
    source: &Path,
    width: u32,
    height: u32,
    back: BackColor,
    transform: TransformOp,
) -> Result<DynamicImage, ThumbnailError> {
    let mut image = backend.decode(source)?;
    if transform != TransformOp::Identity {
        image = imaging::apply_op(&image, transform);
    }
    Ok(imaging::fit_image(&image, width, height, back))
}

/// Generate thumbnails for a set of files, in parallel, optionally backed by
/// a disk cache.
///
/// Without a usable cache directory every file is decoded and resized
/// directly. With one, each worker checks for the keyed file first and loads
/// it as-is on a hit; on a miss it renders the thumbnail, stores it under
/// the key, and returns it. The fan-out is unordered, but the result is
/// always sorted by key (source basename) ascending, so callers see a
/// stable sequence regardless of completion order.
///
/// A cache directory is usable when it exists or its parent exists; it is
/// created if missing. Anything else degrades to the uncached path.
///
/// Decode failures abort the whole call with an error naming the offending
/// file.
pub fn get_thumbnails(
    backend: &impl ImageBackend,
    file_paths: &[PathBuf],
    width: u32,
    height: u32,
    back: BackColor,
    transform: TransformOp,
    cache_directory: Option<&Path>,
) -> Result<Vec<Thumbnail>, ThumbnailError> {
    let cache_dir = match cache_directory {
        Some(dir) => prepare_cache_dir(dir)?,
        None => None,
    };

    let mut thumbnails = file_paths
        .par_iter()
        .map(|path| {
            let key = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let image = match &cache_dir {
                Some(dir) => {
                    cached_thumbnail(backend, path, width, height, back, transform, dir)?
                }
                None => thumbnail_image(backend, path, width, height, back, transform)?,
            };
            Ok(Thumbnail { key, image })
        })
        .collect::<Result<Vec<_>, ThumbnailError>>()?;

    thumbnails.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(thumbnails)
}

/// Resolve the cache directory: existing, creatable, or unusable (`None`).
fn prepare_cache_dir(dir: &Path) -> Result<Option<PathBuf>, ThumbnailError> {
    if dir.exists() {
        return Ok(Some(dir.to_path_buf()));
    }
    if dir.parent().is_some_and(|p| p.exists()) {
        std::fs::create_dir_all(dir)?;
        return Ok(Some(dir.to_path_buf()));
    }
    Ok(None)
}

/// One worker's unit: serve from cache or render and store.
fn cached_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    width: u32,
    height: u32,
    back: BackColor,
    transform: TransformOp,
    cache_dir: &Path,
) -> Result<DynamicImage, ThumbnailError> {
    let key = ThumbnailKey::new(source, width, height, back, transform);
    let cached_path = key.path_in(cache_dir);

    if cached_path.exists() {
        log::debug!("thumbnail cache hit: {}", cached_path.display());
        return Ok(backend.decode(&cached_path)?);
    }

    log::debug!("thumbnail cache miss: {}", cached_path.display());
    let image = thumbnail_image(backend, source, width, height, back, transform)?;
    backend.encode(&image, &cached_path)?;
    Ok(image)
}
