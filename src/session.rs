//! Browsing session: navigation through a directory's images with
//! write-back persistence of rotate/flip edits.
//!
//! A [`BrowsingSession`] holds one mutable cursor over the image files of a
//! single directory. Edits made with [`add_transform`](BrowsingSession::add_transform)
//! are applied to the displayed image immediately but buffered in memory;
//! the buffered sequence is flushed through the
//! [`RotationCacheStore`](crate::rotation_cache::RotationCacheStore) only at
//! flush points — navigation, directory change, or an explicit reload. This
//! write-back policy avoids rewriting the cache file on every single click.
//!
//! On load, the pending sequence is seeded with the image's persisted
//! record, so a later flush rewrites the full cumulative sequence.
//!
//! The session is strictly sequential: navigation, transform application,
//! and flushes are ordered operations against one cursor, and there is one
//! logical writer per directory. All methods are synchronous, bounded by
//! filesystem and decoder latency; there is no cancellation.
//!
//! ```text
//! Empty ── set_directory ──► Loaded ── next / previous / reload ──► Loaded
//! ```
//!
//! Every state-changing entry point funnels through one private reset
//! transition rather than clearing fields ad hoc.

use crate::config::BrowserConfig;
use crate::imaging::{self, BackColor, BackendError, ImageBackend};
use crate::rotation_cache::{CacheError, RotationCacheStore};
use crate::transform::TransformOp;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Single-slot change notification.
///
/// Fired whenever the displayed image changes — a new image was loaded,
/// rotated, or zoomed — after the mutation is fully applied. No payload:
/// the host re-reads the current image. No ordering guarantee beyond that.
pub trait ChangeListener {
    fn image_changed(&self);
}

/// Navigation cursor over one directory's images.
pub struct BrowsingSession<B: ImageBackend> {
    backend: B,
    config: BrowserConfig,
    store: RotationCacheStore,
    directory: Option<PathBuf>,
    files: Vec<PathBuf>,
    index: Option<usize>,
    /// Exclusively owned; released before a replacement is decoded.
    current: Option<DynamicImage>,
    /// Persisted record plus this session's unflushed edits.
    pending: Vec<TransformOp>,
    dirty: bool,
    zoom_level: i32,
    zoomed: Option<DynamicImage>,
    listener: Option<Box<dyn ChangeListener>>,
}

impl<B: ImageBackend> BrowsingSession<B> {
    /// Create a session; enters `config.initial_directory` when it exists.
    pub fn new(config: BrowserConfig, backend: B) -> Result<Self, BrowseError> {
        let store = RotationCacheStore::new(config.rotation_cache_filename.clone());
        let mut session = Self {
            backend,
            config,
            store,
            directory: None,
            files: Vec::new(),
            index: None,
            current: None,
            pending: Vec::new(),
            dirty: false,
            zoom_level: 0,
            zoomed: None,
            listener: None,
        };
        if let Some(dir) = session.config.initial_directory.clone()
            && dir.is_dir()
        {
            session.set_directory(dir)?;
        }
        Ok(session)
    }

    /// Register the host's change listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listener = Some(listener);
    }

    /// Switch to `path`, flushing pending edits first.
    ///
    /// A differing path resets all per-session state before loading and
    /// advances to the first image. The already-current path behaves as
    /// [`reload`](Self::reload). An unreadable path leaves the file list
    /// empty and the session without a current image — not an error;
    /// navigation is a no-op until a valid directory is set.
    pub fn set_directory(&mut self, path: impl AsRef<Path>) -> Result<(), BrowseError> {
        let path = path.as_ref();
        if self.directory.as_deref() == Some(path) {
            return self.reload();
        }
        self.flush_pending()?;
        self.reset_state();
        self.directory = Some(path.to_path_buf());
        self.files = list_image_files(path, &self.config);
        self.next()
    }

    /// Advance to the next image, wrapping past the end back to the first.
    ///
    /// No-op on an empty file list. A dirty pending sequence is flushed
    /// before moving.
    pub fn next(&mut self) -> Result<(), BrowseError> {
        if self.files.is_empty() {
            return Ok(());
        }
        self.flush_pending()?;
        let i = match self.index {
            Some(i) if i + 1 < self.files.len() => i + 1,
            _ => 0,
        };
        self.load_image(i)
    }

    /// Retreat to the previous image, wrapping before the first to the last.
    pub fn previous(&mut self) -> Result<(), BrowseError> {
        if self.files.is_empty() {
            return Ok(());
        }
        self.flush_pending()?;
        let i = match self.index {
            Some(i) if i > 0 => i - 1,
            _ => self.files.len() - 1,
        };
        self.load_image(i)
    }

    /// Apply `op` to the displayed image and buffer it for the next flush.
    ///
    /// No-op without a current image. The on-disk cache is not touched
    /// here — write-back, not write-through.
    pub fn add_transform(&mut self, op: TransformOp) {
        let Some(image) = self.current.take() else {
            return;
        };
        self.current = Some(imaging::apply_op(&image, op));
        self.pending.push(op);
        self.dirty = true;
        if self.zoom_level != 0 {
            self.render_zoom();
        }
        self.notify();
    }

    /// Re-read the directory listing, picking up externally added or
    /// removed files, without changing directory.
    ///
    /// Pending edits are flushed first. The cursor is re-resolved by the
    /// current file's name; if that file vanished, the session is left
    /// without a current image rather than implicitly navigating.
    pub fn reload(&mut self) -> Result<(), BrowseError> {
        let Some(dir) = self.directory.clone() else {
            return Ok(());
        };
        self.flush_pending()?;

        let current_name = self
            .index
            .and_then(|i| self.files.get(i))
            .and_then(|p| p.file_name())
            .map(|n| n.to_os_string());
        self.files = list_image_files(&dir, &self.config);

        match current_name.and_then(|name| {
            self.files
                .iter()
                .position(|p| p.file_name() == Some(name.as_os_str()))
        })
        {
            Some(pos) => self.index = Some(pos),
            None => {
                let had_image = self.current.is_some();
                let directory = self.directory.take();
                let files = std::mem::take(&mut self.files);
                self.reset_state();
                self.directory = directory;
                self.files = files;
                if had_image {
                    self.notify();
                }
            }
        }
        Ok(())
    }

    /// Adjust the zoom overlay — purely a display concern.
    ///
    /// `increment == 0` clears the overlay; otherwise the level shifts and
    /// the current image is re-rendered through the same fit algorithm as
    /// thumbnails, at a box scaled by 1.25 per level. The persisted
    /// transform sequence is never touched.
    pub fn zoom(&mut self, increment: i32) {
        if self.current.is_none() {
            return;
        }
        if increment == 0 {
            self.zoom_level = 0;
        } else {
            self.zoom_level += increment;
        }
        if self.zoom_level == 0 {
            self.zoomed = None;
        } else {
            self.render_zoom();
        }
        self.notify();
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Image files of the current directory, sorted by file name.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    /// The current image with all transforms applied, without zoom.
    pub fn current_image(&self) -> Option<&DynamicImage> {
        self.current.as_ref()
    }

    /// What the host should display: the zoom overlay when active,
    /// otherwise the current image.
    pub fn displayed_image(&self) -> Option<&DynamicImage> {
        self.zoomed.as_ref().or(self.current.as_ref())
    }

    /// Unflushed transform sequence for the current image (persisted record
    /// plus this session's edits).
    pub fn pending_ops(&self) -> &[TransformOp] {
        &self.pending
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    /// The one reset transition. Every state-changing entry point goes
    /// through here instead of clearing fields inline.
    fn reset_state(&mut self) {
        self.directory = None;
        self.files.clear();
        self.index = None;
        self.current = None;
        self.pending.clear();
        self.dirty = false;
        self.zoom_level = 0;
        self.zoomed = None;
    }

    /// Flush the pending sequence if dirty. Keeps the in-memory sequence in
    /// its reduced (persisted) form afterwards.
    fn flush_pending(&mut self) -> Result<(), BrowseError> {
        if !self.dirty {
            return Ok(());
        }
        let (Some(dir), Some(i)) = (self.directory.clone(), self.index) else {
            return Ok(());
        };
        let Some(name) = self.files.get(i).map(|p| basename(p)) else {
            return Ok(());
        };
        self.pending = self.store.flush(&dir, &name, &self.pending)?;
        self.dirty = false;
        Ok(())
    }

    /// Load `self.files[i]`: decode, seed the pending sequence from the
    /// rotation cache, apply it, notify.
    fn load_image(&mut self, i: usize) -> Result<(), BrowseError> {
        let Some(dir) = self.directory.clone() else {
            return Ok(());
        };
        let path = self.files[i].clone();

        // Release the previous buffer before decoding the next one.
        self.current = None;
        self.zoom_level = 0;
        self.zoomed = None;
        self.index = Some(i);

        let mut image = self.backend.decode(&path)?;

        let record = self.store.read_record(&dir, &basename(&path))?;
        self.pending = record.map(|r| r.ops).unwrap_or_default();
        if !self.pending.is_empty() {
            image = imaging::apply_sequence(image, &self.pending);
        }
        self.current = Some(image);
        self.dirty = false;
        self.notify();
        Ok(())
    }

    fn render_zoom(&mut self) {
        let Some(image) = &self.current else {
            self.zoomed = None;
            return;
        };
        let (w, h) = imaging::zoom_box((image.width(), image.height()), self.zoom_level);
        self.zoomed = Some(imaging::fit_image(image, w, h, BackColor::BLACK));
    }

    fn notify(&self) {
        if let Some(listener) = &self.listener {
            listener.image_changed();
        }
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Non-recursive listing of recognized image files, sorted by file name.
///
/// An unreadable directory yields an empty list.
pub fn list_image_files(directory: &Path, config: &BrowserConfig) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| config.recognizes(path))
        .collect()
}
