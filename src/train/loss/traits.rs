//! Loss function trait

use ndarray::ArrayD;

use crate::error::Result;

/// Trait for loss functions over network outputs
pub trait LossFn {
    /// Scalar loss for `predictions` against `targets`
    fn forward(&self, predictions: &ArrayD<f32>, targets: &ArrayD<f32>) -> Result<f32>;

    /// Gradient of the loss with respect to `predictions`
    fn backward(&self, predictions: &ArrayD<f32>, targets: &ArrayD<f32>) -> Result<ArrayD<f32>>;

    /// Name of the loss function
    fn name(&self) -> &str;
}
