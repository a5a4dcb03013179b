//! Image output
//!
//! Converts generator output in [-1, 1] back to 8-bit RGB and writes PNGs,
//! either one image per file or as a square mosaic.

mod save;

pub use save::{save_grid, save_image, to_rgb8};
