//! Pure calculation functions for image placement.
//!
//! All functions here are pure and testable without any I/O or images.

/// Where a scaled image lands inside a target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitPlacement {
    /// Horizontal offset of the scaled image inside the box.
    pub x: u32,
    /// Vertical offset of the scaled image inside the box.
    pub y: u32,
    /// Scaled image width.
    pub width: u32,
    /// Scaled image height.
    pub height: u32,
}

/// Calculate how a source image fits entirely within a target box while
/// preserving aspect ratio.
///
/// The uniform scale factor is `min(target_w / src_w, target_h / src_h)`;
/// the scaled image is centered along whichever axis has slack. Scaled
/// dimensions and offsets truncate toward zero, matching cache files
/// produced by earlier versions of the browser.
///
/// # Examples
/// ```
/// # use lightbox::imaging::fit_placement;
/// // Wide source letterboxed top and bottom in a square box
/// let p = fit_placement((200, 100), (100, 100));
/// assert_eq!((p.width, p.height), (100, 50));
/// assert_eq!((p.x, p.y), (0, 25));
/// ```
pub fn fit_placement(source: (u32, u32), target: (u32, u32)) -> FitPlacement {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let percent_w = tgt_w as f64 / src_w as f64;
    let percent_h = tgt_h as f64 / src_h as f64;
    let percent = percent_w.min(percent_h);

    // Extreme aspect ratios would truncate to zero.
    let width = ((src_w as f64 * percent) as u32).max(1);
    let height = ((src_h as f64 * percent) as u32).max(1);

    let (x, y) = if percent_h < percent_w {
        ((((tgt_w as f64) - src_w as f64 * percent) / 2.0) as u32, 0)
    } else {
        (0, (((tgt_h as f64) - src_h as f64 * percent) / 2.0) as u32)
    };

    FitPlacement {
        x,
        y,
        width,
        height,
    }
}

/// Target box for a zoomed rendering of a `source`-sized image.
///
/// Each zoom step scales by 1.25; negative levels shrink. Level 0 is the
/// identity box.
pub fn zoom_box(source: (u32, u32), level: i32) -> (u32, u32) {
    let factor = 1.25f64.powi(level);
    let scale = |v: u32| ((v as f64 * factor).round() as u32).max(1);
    (scale(source.0), scale(source.1))
}
