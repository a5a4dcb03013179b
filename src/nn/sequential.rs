//! Layer stack with static shape tracking

use ndarray::ArrayD;
use serde::Serialize;

use super::{check_sample_shape, Layer};
use crate::autograd::{Context, Param};
use crate::error::{Error, Result};

/// One row of a model summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub name: &'static str,
    pub output_shape: Vec<usize>,
    pub params: usize,
}

/// Layers applied in order
///
/// Per-sample shapes are resolved as layers are pushed, so a model that
/// builds successfully has a fixed, known shape after every layer.
pub struct Sequential {
    input_shape: Vec<usize>,
    layers: Vec<Box<dyn Layer>>,
    shapes: Vec<Vec<usize>>,
}

impl Sequential {
    pub fn new(input_shape: &[usize]) -> Self {
        Self { input_shape: input_shape.to_vec(), layers: Vec::new(), shapes: Vec::new() }
    }

    /// Append a layer, resolving its output shape
    pub fn push(&mut self, layer: impl Layer + 'static) -> Result<&mut Self> {
        let shape = layer.output_shape(self.output_shape())?;
        self.shapes.push(shape);
        self.layers.push(Box::new(layer));
        Ok(self)
    }

    /// Fail with [`Error::ShapeMismatch`] unless the current output shape is `expected`
    pub fn expect_shape(&self, expected: &[usize]) -> Result<()> {
        if self.output_shape() != expected {
            return Err(Error::ShapeMismatch {
                layer: self.layers.last().map_or("input", |l| l.name()).to_string(),
                expected: expected.to_vec(),
                actual: self.output_shape().to_vec(),
            });
        }
        Ok(())
    }

    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    /// Current per-sample output shape
    pub fn output_shape(&self) -> &[usize] {
        self.shapes.last().unwrap_or(&self.input_shape)
    }

    /// Output shape after every layer
    pub fn shapes(&self) -> &[Vec<usize>] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        check_sample_shape(&input, &self.input_shape, "sequential")?;
        self.layers.iter_mut().try_fold(input, |x, layer| layer.forward(x, ctx))
    }

    /// Backpropagate through every layer in reverse, returning the input gradient
    pub fn backward(&mut self, grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.layers.iter_mut().rev().try_fold(grad_output, |g, layer| layer.backward(g))
    }

    pub fn params_mut(&mut self) -> Vec<&mut Param> {
        self.layers.iter_mut().flat_map(|l| l.params_mut()).collect()
    }

    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.num_parameters()).sum()
    }

    pub fn zero_grad(&mut self) {
        for p in self.params_mut() {
            p.zero_grad();
        }
    }

    pub fn summary(&self) -> Vec<LayerSummary> {
        self.layers
            .iter()
            .zip(&self.shapes)
            .map(|(l, s)| LayerSummary { name: l.name(), output_shape: s.clone(), params: l.num_parameters() })
            .collect()
    }
}

impl std::fmt::Debug for Sequential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequential")
            .field("input_shape", &self.input_shape)
            .field("layers", &self.layers.iter().map(|l| l.name()).collect::<Vec<_>>())
            .field("output_shape", &self.output_shape())
            .finish()
    }
}
