//! Shared test utilities for the lightbox test suite.

use crate::session::ChangeListener;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

/// Create a small valid PNG file with the given dimensions.
///
/// The pixel gradient makes accidental constant-color assertions fail loudly.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}

/// Change listener that counts notifications.
pub struct CountingListener {
    count: Rc<Cell<usize>>,
}

impl CountingListener {
    /// Returns the listener and a shared handle to its counter.
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        (
            Self {
                count: Rc::clone(&count),
            },
            count,
        )
    }
}

impl ChangeListener for CountingListener {
    fn image_changed(&self) {
        self.count.set(self.count.get() + 1);
    }
}
