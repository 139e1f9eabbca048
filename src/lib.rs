//! # Lightbox
//!
//! A directory image browser core: browse the images of a directory,
//! rotate and flip them non-destructively, and serve a grid of thumbnails
//! from a disk-backed cache. The original files are never touched — edits
//! persist as a transform sequence in a small per-directory cache file and
//! are replayed on load, so they survive across sessions.
//!
//! The crate is UI-agnostic. A host (desktop shell, TUI, web service) wires
//! keyboard or menu actions to [`session::BrowsingSession`] methods and
//! re-reads the current image on each change notification; decoding and
//! encoding sit behind the [`imaging::ImageBackend`] trait.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`transform`] | rotate/flip ops, wire encodings, sequence reduction |
//! | [`rotation_cache`] | per-directory flat cache file: read, flush, delete-on-empty |
//! | [`thumbnail`] | deterministic cache keys + parallel thumbnail generation |
//! | [`session`] | navigation state machine with write-back persistence |
//! | [`imaging`] | decode/encode backend trait, fit geometry, pixel operations |
//! | [`config`] | `lightbox.toml` loading and validation |
//!
//! # Design Decisions
//!
//! ## Write-Back, Not Write-Through
//!
//! Rotating an image updates the screen immediately but only buffers the
//! edit; the cache file is rewritten at flush points (navigation, directory
//! change, reload). Users often tap rotate several times in a row — flushing
//! each click would rewrite the whole file every time for no benefit, since
//! the file is the unit of persistence anyway.
//!
//! ## The Cache Filename Is the Thumbnail Cache
//!
//! Thumbnails carry every rendering parameter in their filename, so the
//! cache needs no index and no manifest: a hit is an `exists()` check, and
//! concurrent workers racing on the same key write identical bytes. See
//! [`thumbnail::ThumbnailKey`].
//!
//! ## Single Writer Per Directory
//!
//! The rotation cache flush is a read-all/rewrite-all with no locking or
//! atomic rename. One [`session::BrowsingSession`] per directory at a time
//! is a caller obligation; concurrent writers can lose updates. This keeps
//! the file format trivially inspectable (one tab-separated line per image)
//! at the cost of multi-process safety nobody asked for.
//!
//! ## Sequences Reduce Once, Not to a Fixpoint
//!
//! [`transform::reduce`] applies each cancellation rule family in a single
//! backward sweep. Cache files written by earlier versions of the browser
//! were reduced the same way, so a stricter reducer would make old and new
//! files disagree about the same sequence. See the function docs for the
//! exact consequence.

pub mod config;
pub mod imaging;
pub mod rotation_cache;
pub mod session;
pub mod thumbnail;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;
