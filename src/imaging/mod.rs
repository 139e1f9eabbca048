//! Image processing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate via [`RustBackend`] |
//! | **Rotate / flip** | `image::DynamicImage` quarter-turn and flip ops |
//! | **Fit into box** | Lanczos3 resize + centered compose on an RGB canvas |
//!
//! The module is split into:
//! - **Calculations**: pure functions for placement math (unit testable)
//! - **Params**: [`BackColor`], the background fill used when fitting
//! - **Backend**: [`ImageBackend`] trait — the decode/encode seam — and
//!   [`RustBackend`], its production implementation
//! - **Operations**: pixel work combining calculations + the `image` crate

pub mod backend;
pub mod calculations;
pub mod operations;
pub mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{FitPlacement, fit_placement, zoom_box};
pub use operations::{apply_op, apply_sequence, fit_image};
pub use params::BackColor;
pub use rust_backend::RustBackend;
