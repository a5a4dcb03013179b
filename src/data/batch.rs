//! Image batch data structure

use ndarray::{Array3, Array4, Axis};

use crate::error::{Error, Result};

/// A batch of images, NHWC, values in [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    images: Array4<f32>,
}

impl ImageBatch {
    /// Create a new batch
    pub fn new(images: Array4<f32>) -> Self {
        Self { images }
    }

    /// Stack equally sized (H, W, C) images
    pub fn stack(samples: &[&Array3<f32>]) -> Result<Self> {
        let views: Vec<_> = samples.iter().map(|s| s.view()).collect();
        let images = ndarray::stack(Axis(0), &views)
            .map_err(|e| Error::Loader(format!("cannot stack images: {e}")))?;
        Ok(Self { images })
    }

    /// Number of images
    pub fn len(&self) -> usize {
        self.images.dim().0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn images(&self) -> &Array4<f32> {
        &self.images
    }

    pub fn into_inner(self) -> Array4<f32> {
        self.images
    }
}
