//! Per-directory rotation cache file.
//!
//! Rotations are non-destructive: the original image files are never
//! rewritten. Instead, each browsed directory carries one flat text file
//! (default `rotation_cache.txt`) mapping image filenames to the transform
//! sequence the user applied, and the browser replays that sequence on load.
//!
//! # File format
//!
//! One record per line, tab-separated:
//!
//! ```text
//! photo1.jpg	Rotate90-FlipHorizontal
//! photo2.jpg	Rotate270
//! ```
//!
//! - The filename is a basename only, matched ASCII case-insensitively;
//!   the first matching line wins.
//! - Operations are hyphen-joined wire names (see
//!   [`TransformOp`](crate::transform::TransformOp)).
//! - A line with no tab is a filename with an empty sequence.
//! - Lines are unordered. A record with an empty sequence is never written;
//!   absence of a record and absence of the whole file both mean "no
//!   transforms".
//!
//! # Lifecycle
//!
//! The file is created on the first non-empty flush, rewritten in full on
//! every flush, and deleted when a flush would leave zero records. There is
//! no atomic replace: a crash mid-write can truncate the file. See
//! [`RotationCacheStore::flush`] for the single-writer obligation.
//!
//! # Corrupt lines
//!
//! A line whose operation list fails to parse is skipped with a warning
//! rather than aborting the read; the rest of the file stays usable. Flushes
//! preserve unparseable lines byte-for-byte (they are filtered by filename
//! only), so a newer record format is not destroyed by an older browser.

use crate::transform::{self, ParseOpError, TransformOp};
use log::warn;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A malformed cache line, surfaced at the record level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("corrupt cache record {line:?}: {source}")]
pub struct CorruptRecord {
    /// The offending line, verbatim.
    pub line: String,
    #[source]
    pub source: ParseOpError,
}

/// One image's persisted transform sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheRecord {
    /// Basename of the image file, no directory.
    pub filename: String,
    /// Ops in application order.
    pub ops: Vec<TransformOp>,
}

/// Parse one cache line.
///
/// Returns `Ok(None)` for blank lines. A missing tab means an empty
/// sequence; a trailing empty op list (`name<TAB>`) also parses as empty.
pub fn parse_record(line: &str) -> Result<Option<CacheRecord>, CorruptRecord> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let Some((filename, ops_part)) = line.split_once('\t') else {
        return Ok(Some(CacheRecord {
            filename: line.to_string(),
            ops: Vec::new(),
        }));
    };
    let mut ops = Vec::new();
    if !ops_part.is_empty() {
        for name in ops_part.split('-') {
            let op = name.parse().map_err(|source| CorruptRecord {
                line: line.to_string(),
                source,
            })?;
            ops.push(op);
        }
    }
    Ok(Some(CacheRecord {
        filename: filename.to_string(),
        ops,
    }))
}

/// Format a record as a cache line (no trailing newline).
fn format_record(filename: &str, ops: &[TransformOp]) -> String {
    let names: Vec<&str> = ops.iter().map(|op| op.name()).collect();
    format!("{}\t{}", filename, names.join("-"))
}

/// Extract the filename part of a raw cache line (text before the first tab).
fn line_filename(line: &str) -> &str {
    line.split_once('\t').map_or(line, |(name, _)| name)
}

/// Reads and writes the per-directory rotation cache file.
///
/// The cache file name is threaded in through the constructor — typically
/// [`BrowserConfig::rotation_cache_filename`](crate::config::BrowserConfig)
/// — so the store itself carries no hidden defaults.
#[derive(Debug, Clone)]
pub struct RotationCacheStore {
    cache_filename: String,
}

impl RotationCacheStore {
    pub fn new(cache_filename: impl Into<String>) -> Self {
        Self {
            cache_filename: cache_filename.into(),
        }
    }

    /// Path of the cache file inside `directory`.
    pub fn cache_path(&self, directory: &Path) -> PathBuf {
        directory.join(&self.cache_filename)
    }

    /// All parseable records in `directory`'s cache file.
    ///
    /// A missing file is an empty cache. Corrupt lines are skipped with a
    /// warning; other IO failures surface.
    pub fn read_all(&self, directory: &Path) -> Result<Vec<CacheRecord>, CacheError> {
        let path = self.cache_path(directory);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for line in content.lines() {
            match parse_record(line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(corrupt) => warn!("{}: skipping {corrupt}", path.display()),
            }
        }
        Ok(records)
    }

    /// The persisted transform sequence for `filename`, if any.
    ///
    /// `filename` is a basename; matching is ASCII case-insensitive and the
    /// first matching record wins. A missing cache file or an unmatched
    /// filename both yield `Ok(None)`.
    pub fn read_record(
        &self,
        directory: &Path,
        filename: &str,
    ) -> Result<Option<CacheRecord>, CacheError> {
        Ok(self
            .read_all(directory)?
            .into_iter()
            .find(|r| r.filename.eq_ignore_ascii_case(filename)))
    }

    /// Persist `ops` (reduced) as the record for `filename`, rewriting the
    /// whole cache file.
    ///
    /// The sequence is reduced first; every existing line whose filename
    /// matches case-insensitively is dropped; a new line is appended when
    /// the reduced sequence is non-empty; the file is deleted when the
    /// resulting record count is zero. Returns the reduced sequence that was
    /// persisted.
    ///
    /// This is a read-all/rewrite-all with no locking or atomic rename:
    /// callers must ensure a single logical writer per directory. Write
    /// failures surface as [`CacheError`] — a lost flush is only acceptable
    /// when reported.
    pub fn flush(
        &self,
        directory: &Path,
        filename: &str,
        ops: &[TransformOp],
    ) -> Result<Vec<TransformOp>, CacheError> {
        let reduced = transform::reduce(ops);
        let path = self.cache_path(directory);

        // Retain other files' lines verbatim, corrupt ones included.
        let mut lines: Vec<String> = match std::fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .filter(|l| !l.trim().is_empty())
                .filter(|l| !line_filename(l).eq_ignore_ascii_case(filename))
                .map(|l| l.to_string())
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        if !reduced.is_empty() {
            lines.push(format_record(filename, &reduced));
        }

        if lines.is_empty() {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        } else {
            let mut content = lines.join("\n");
            content.push('\n');
            std::fs::write(&path, content)?;
        }

        log::debug!(
            "flushed {} ({} ops) to {}",
            filename,
            reduced.len(),
            path.display()
        );
        Ok(reduced)
    }
}
