//! Pure Rust decode/encode backend — zero external dependencies.
//!
//! Everything is statically linked into the binary. Decoders and encoders
//! come from the `image` crate; the compiled-in formats are JPEG, PNG, GIF,
//! BMP, TIFF, and WebP.

use super::backend::{BackendError, ImageBackend};
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Production backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.decode())
            .map_err(|source| BackendError::Decode {
                path: path.to_path_buf(),
                source,
            })
    }

    fn encode(&self, image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
        image.save(path).map_err(|source| BackendError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn decode_synthetic_png() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.png");
        crate::test_helpers::create_test_png(&path, 200, 150);

        let backend = RustBackend::new();
        let img = backend.decode(&path).unwrap();
        assert_eq!((img.width(), img.height()), (200, 150));
    }

    #[test]
    fn decode_nonexistent_file_errors_with_path() {
        let backend = RustBackend::new();
        let err = backend.decode(Path::new("/nonexistent/image.jpg")).unwrap_err();
        assert!(matches!(
            err,
            BackendError::Decode { path, .. } if path == Path::new("/nonexistent/image.jpg")
        ));
    }

    #[test]
    fn decode_non_image_content_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fake.png");
        std::fs::write(&path, b"not an image").unwrap();

        let backend = RustBackend::new();
        assert!(backend.decode(&path).is_err());
    }

    #[test]
    fn encode_then_decode_round_trips_dimensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            60,
            40,
            image::Rgb([200, 10, 10]),
        ));

        let backend = RustBackend::new();
        backend.encode(&img, &path).unwrap();
        let decoded = backend.decode(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (60, 40));
    }

    #[test]
    fn encode_to_unwritable_path_errors() {
        let backend = RustBackend::new();
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        let err = backend
            .encode(&img, Path::new("/nonexistent-dir/out.png"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Encode { .. }));
    }
}
