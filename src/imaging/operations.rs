//! Pixel operations: applying transforms and fitting images into boxes.

use super::calculations::fit_placement;
use super::params::BackColor;
use crate::transform::TransformOp;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, imageops};

/// Apply one transform op, returning the transformed image.
///
/// Rotations are clockwise; the combined ops rotate first, then flip
/// horizontally.
pub fn apply_op(image: &DynamicImage, op: TransformOp) -> DynamicImage {
    match op {
        TransformOp::Identity => image.clone(),
        TransformOp::FlipHorizontal => image.fliph(),
        TransformOp::FlipVertical => image.flipv(),
        TransformOp::Rotate90 => image.rotate90(),
        TransformOp::Rotate180 => image.rotate180(),
        TransformOp::Rotate270 => image.rotate270(),
        TransformOp::Rotate90FlipHorizontal => image.rotate90().fliph(),
        TransformOp::Rotate270FlipHorizontal => image.rotate270().fliph(),
    }
}

/// Apply a whole transform sequence in order (left-to-right).
pub fn apply_sequence(image: DynamicImage, ops: &[TransformOp]) -> DynamicImage {
    ops.iter().fold(image, |img, &op| apply_op(&img, op))
}

/// Fit an image into an exactly `target_width × target_height` box.
///
/// The source is scaled uniformly to fit entirely within the box (see
/// [`fit_placement`](super::calculations::fit_placement)), centered along
/// the slack axis, with the remainder filled by `back`. Resampling is
/// Lanczos3. The output is always RGB at exactly the target dimensions.
pub fn fit_image(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    back: BackColor,
) -> DynamicImage {
    let placement = fit_placement(
        (image.width(), image.height()),
        (target_width, target_height),
    );

    let scaled = image
        .resize_exact(placement.width, placement.height, FilterType::Lanczos3)
        .to_rgb8();

    let mut canvas = RgbImage::from_pixel(target_width, target_height, back.rgb());
    imageops::replace(&mut canvas, &scaled, placement.x as i64, placement.y as i64);
    DynamicImage::ImageRgb8(canvas)
}
