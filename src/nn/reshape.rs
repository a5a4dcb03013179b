//! Shape-only layers

use ndarray::ArrayD;

use super::{reshape, Layer};
use crate::autograd::Context;
use crate::error::{Error, Result};

/// Reshape each sample to a fixed target shape
#[derive(Debug, Clone)]
pub struct Reshape {
    target: Vec<usize>,
    input_shape: Option<Vec<usize>>,
}

impl Reshape {
    pub fn new(target: &[usize]) -> Self {
        Self { target: target.to_vec(), input_shape: None }
    }
}

impl Layer for Reshape {
    fn name(&self) -> &'static str {
        "reshape"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        let from: usize = input.iter().product();
        let to: usize = self.target.iter().product();
        if from != to {
            return Err(Error::invalid_input(
                "reshape",
                format!("cannot reshape {input:?} ({from} values) to {:?} ({to} values)", self.target),
            ));
        }
        Ok(self.target.clone())
    }

    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        let mut shape = vec![input.shape()[0]];
        shape.extend_from_slice(&self.target);
        self.input_shape = ctx.records().then(|| input.shape().to_vec());
        reshape(input, &shape, "reshape")
    }

    fn backward(&mut self, grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let shape = self.input_shape.take().ok_or(Error::MissingForward("reshape"))?;
        reshape(grad_output, &shape, "reshape")
    }
}

/// Collapse each sample to one dimension
#[derive(Debug, Clone, Default)]
pub struct Flatten {
    input_shape: Option<Vec<usize>>,
}

impl Flatten {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for Flatten {
    fn name(&self) -> &'static str {
        "flatten"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        Ok(vec![input.iter().product()])
    }

    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        let batch = input.shape()[0];
        let features = input.len() / batch.max(1);
        self.input_shape = ctx.records().then(|| input.shape().to_vec());
        reshape(input, &[batch, features], "flatten")
    }

    fn backward(&mut self, grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let shape = self.input_shape.take().ok_or(Error::MissingForward("flatten"))?;
        reshape(grad_output, &shape, "flatten")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    #[test]
    fn test_reshape_round_trip_through_backward() {
        let mut layer = Reshape::new(&[2, 2, 4]);
        let x = Array::from_shape_fn(IxDyn(&[3, 16]), |i| i[1] as f32);
        let y = layer.forward(x.clone(), Context::train()).unwrap();
        assert_eq!(y.shape(), &[3, 2, 2, 4]);
        let g = layer.backward(y).unwrap();
        assert_eq!(g, x);
    }

    #[test]
    fn test_reshape_rejects_wrong_volume() {
        let layer = Reshape::new(&[4, 4, 1024]);
        assert!(layer.output_shape(&[100]).is_err());
        assert_eq!(layer.output_shape(&[16384]).unwrap(), vec![4, 4, 1024]);
    }

    #[test]
    fn test_flatten_shape() {
        let mut layer = Flatten::new();
        assert_eq!(layer.output_shape(&[4, 4, 8]).unwrap(), vec![128]);
        let y = layer.forward(Array::zeros(IxDyn(&[2, 4, 4, 8])), Context::inference()).unwrap();
        assert_eq!(y.shape(), &[2, 128]);
    }
}
