//! Image directory scanning and decoding

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use ndarray::Array3;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// File extensions recognised as images (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// A directory tree of images, scanned once
#[derive(Debug, Clone)]
pub struct ImageFolder {
    root: PathBuf,
    image_size: usize,
    paths: Vec<PathBuf>,
}

impl ImageFolder {
    /// Recursively collect every image file under `root`, sorted by path
    ///
    /// Fails when `root` is missing or holds no images.
    pub fn open(root: impl AsRef<Path>, image_size: usize) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::DatasetNotFound(root));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = entry.map_err(|e| Error::Loader(e.to_string()))?;
            if entry.file_type().is_file() && is_image(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(Error::EmptyDataset(root));
        }
        tracing::info!(root = %root.display(), images = paths.len(), "scanned image folder");
        Ok(Self { root, image_size, paths })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn image_size(&self) -> usize {
        self.image_size
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Decode the `index`-th image
    pub fn load(&self, index: usize) -> Result<Array3<f32>> {
        let path = self
            .paths
            .get(index)
            .ok_or_else(|| Error::Loader(format!("image index {index} out of range")))?;
        decode_image(path, self.image_size)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Decode an image as RGB, resize it to `size`×`size` (bilinear, aspect ratio
/// not kept) and rescale to [-1, 1]
pub fn decode_image(path: &Path, size: usize) -> Result<Array3<f32>> {
    let img = image::open(path)
        .map_err(|source| Error::ImageDecode { path: path.to_path_buf(), source })?
        .to_rgb8();
    let side = u32::try_from(size).map_err(|e| Error::Loader(e.to_string()))?;
    let img = if img.dimensions() == (side, side) {
        img
    } else {
        image::imageops::resize(&img, side, side, FilterType::Triangle)
    };
    let pixels = Array3::from_shape_vec((size, size, 3), img.into_raw())
        .map_err(|e| Error::Loader(format!("{}: {e}", path.display())))?;
    Ok(pixels.mapv(|v| f32::from(v) / 127.5 - 1.0))
}
