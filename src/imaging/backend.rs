//! Image decode/encode backend trait and shared types.
//!
//! The rest of the crate treats the actual codec as an external collaborator
//! behind [`ImageBackend`]: sessions and the thumbnail cache only ever ask
//! for "the decoded pixels at this path" or "write these pixels at this
//! path". The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Trait for image decode/encode backends.
///
/// `Sync` so a single backend can serve the thumbnail cache's parallel
/// fan-out.
pub trait ImageBackend: Sync {
    /// Decode the image file at `path`.
    ///
    /// Errors identify the offending path; missing files and corrupt or
    /// unsupported content are both decode failures.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `image` to `path`, with the format implied by the extension.
    fn encode(&self, image: &DynamicImage, path: &Path) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock backend that fabricates images without touching a codec.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        /// Per-path dimension overrides (keyed by full path string).
        pub dimensions: Mutex<HashMap<String, (u32, u32)>>,
        /// Paths whose decode should fail.
        pub failing: Mutex<Vec<String>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode(String),
        Encode(String),
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(entries: &[(&str, (u32, u32))]) -> Self {
            let backend = Self::default();
            let mut map = backend.dimensions.lock().unwrap();
            for (path, dims) in entries {
                map.insert(path.to_string(), *dims);
            }
            drop(map);
            backend
        }

        pub fn fail_on(self, path: &Path) -> Self {
            self.failing
                .lock()
                .unwrap()
                .push(path.to_string_lossy().into_owned());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// How many times `path` was decoded.
        pub fn decode_count(&self, path: &Path) -> usize {
            let wanted = path.to_string_lossy();
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Decode(p) if *p == wanted))
                .count()
        }
    }

    impl ImageBackend for MockBackend {
        fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
            let key = path.to_string_lossy().into_owned();
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(key.clone()));

            if self.failing.lock().unwrap().contains(&key) {
                return Err(BackendError::Decode {
                    path: path.to_path_buf(),
                    source: image::ImageError::IoError(std::io::Error::other(
                        "mock decode failure",
                    )),
                });
            }

            let (w, h) = self
                .dimensions
                .lock()
                .unwrap()
                .get(&key)
                .copied()
                .unwrap_or((8, 8));
            Ok(DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
                w,
                h,
                image::Rgb([128, 128, 128]),
            )))
        }

        fn encode(&self, _image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Encode(path.to_string_lossy().into_owned()));
            std::fs::write(path, b"mock thumbnail").map_err(|e| BackendError::Encode {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(e),
            })
        }
    }

    #[test]
    fn mock_records_decode_with_dimensions() {
        let backend = MockBackend::with_dimensions(&[("/test/image.jpg", (640, 480))]);

        let img = backend.decode(Path::new("/test/image.jpg")).unwrap();
        assert_eq!((img.width(), img.height()), (640, 480));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Decode(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_defaults_unknown_paths_to_8x8() {
        let backend = MockBackend::new();
        let img = backend.decode(Path::new("/whatever.png")).unwrap();
        assert_eq!((img.width(), img.height()), (8, 8));
    }

    #[test]
    fn mock_failing_path_errors_with_path() {
        let backend = MockBackend::new().fail_on(Path::new("/bad.jpg"));
        let err = backend.decode(Path::new("/bad.jpg")).unwrap_err();
        assert!(matches!(
            err,
            BackendError::Decode { path, .. } if path == Path::new("/bad.jpg")
        ));
    }

    #[test]
    fn mock_decode_count_tracks_per_path() {
        let backend = MockBackend::new();
        backend.decode(Path::new("/a.jpg")).unwrap();
        backend.decode(Path::new("/a.jpg")).unwrap();
        backend.decode(Path::new("/b.jpg")).unwrap();

        assert_eq!(backend.decode_count(Path::new("/a.jpg")), 2);
        assert_eq!(backend.decode_count(Path::new("/b.jpg")), 1);
        assert_eq!(backend.decode_count(Path::new("/c.jpg")), 0);
    }
}
