//! Neural network layers with explicit forward and backward passes
//!
//! Activations are `ndarray::ArrayD<f32>` with the batch on axis 0 and
//! images laid out NHWC. Shapes handed to [`Layer::output_shape`] and kept
//! by [`Sequential`] are per-sample, batch axis excluded.

mod activations;
mod batch_norm;
mod conv;
mod conv_transpose;
mod dense;
mod dropout;
mod im2col;
mod init;
mod reshape;
mod sequential;

pub use activations::{LeakyRelu, Sigmoid, Tanh};
pub use batch_norm::BatchNorm;
pub use conv::Conv2d;
pub use conv_transpose::ConvTranspose2d;
pub use dense::Dense;
pub use dropout::Dropout;
pub use init::glorot_uniform;
pub use reshape::{Flatten, Reshape};
pub use sequential::{LayerSummary, Sequential};

use ndarray::{ArrayD, IxDyn};

use crate::autograd::{Context, Param};
use crate::error::{Error, Result};

/// A differentiable network layer
pub trait Layer: Send {
    /// Layer name for summaries and error messages
    fn name(&self) -> &'static str;

    /// Per-sample output shape for a per-sample input shape
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>>;

    /// Run the layer on a batch
    ///
    /// When `ctx.records()` is set the layer keeps whatever `backward`
    /// needs; otherwise any previous record is dropped.
    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>>;

    /// Propagate `grad_output` to the layer input, accumulating parameter
    /// gradients on the way
    fn backward(&mut self, grad_output: ArrayD<f32>) -> Result<ArrayD<f32>>;

    /// Trainable parameters, in a stable order
    fn params_mut(&mut self) -> Vec<&mut Param> {
        Vec::new()
    }

    /// Number of trainable scalars
    fn num_parameters(&self) -> usize {
        0
    }
}

/// Reshape an owned array, copying only when it is not in standard layout
pub(crate) fn reshape(x: ArrayD<f32>, shape: &[usize], layer: &'static str) -> Result<ArrayD<f32>> {
    let x = if x.is_standard_layout() { x } else { x.as_standard_layout().into_owned() };
    let from = x.shape().to_vec();
    x.into_shape_with_order(IxDyn(shape))
        .map_err(|e| Error::invalid_input(layer, format!("cannot reshape {from:?} to {shape:?}: {e}")))
}

/// Check the per-sample part of a batch shape
pub(crate) fn check_sample_shape(
    x: &ArrayD<f32>,
    expected: &[usize],
    layer: &'static str,
) -> Result<()> {
    if x.ndim() != expected.len() + 1 || &x.shape()[1..] != expected {
        return Err(Error::invalid_input(
            layer,
            format!("expected (batch, {expected:?}), got {:?}", x.shape()),
        ));
    }
    Ok(())
}
