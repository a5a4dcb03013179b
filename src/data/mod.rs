//! Image dataset pipeline
//!
//! [`ImageFolder`] finds and decodes images; [`BatchLoader`] turns it into
//! shuffled (N, H, W, 3) batches in [-1, 1] with an in-memory cache and a
//! background prefetch thread.

mod batch;
mod folder;
mod loader;

pub use batch::ImageBatch;
pub use folder::{decode_image, ImageFolder, IMAGE_EXTENSIONS};
pub use loader::{BatchLoader, Epoch, LoaderConfig};
