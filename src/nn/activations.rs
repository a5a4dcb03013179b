//! Element-wise activations: LeakyReLU, Tanh, Sigmoid

use ndarray::{ArrayD, Zip};

use super::Layer;
use crate::autograd::Context;
use crate::error::{Error, Result};

/// Leaky rectified linear unit: `x` for positive inputs, `slope * x` otherwise
#[derive(Debug, Clone)]
pub struct LeakyRelu {
    slope: f32,
    input: Option<ArrayD<f32>>,
}

impl LeakyRelu {
    pub fn new(slope: f32) -> Self {
        Self { slope, input: None }
    }

    pub fn slope(&self) -> f32 {
        self.slope
    }
}

impl Layer for LeakyRelu {
    fn name(&self) -> &'static str {
        "leaky_relu"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        Ok(input.to_vec())
    }

    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        let slope = self.slope;
        let output = input.mapv(|v| if v > 0.0 { v } else { slope * v });
        self.input = ctx.records().then_some(input);
        Ok(output)
    }

    fn backward(&mut self, mut grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let input = self.input.take().ok_or(Error::MissingForward("leaky_relu"))?;
        let slope = self.slope;
        Zip::from(&mut grad_output).and(&input).for_each(|g, &x| {
            if x <= 0.0 {
                *g *= slope;
            }
        });
        Ok(grad_output)
    }
}

/// Hyperbolic tangent, output in (-1, 1)
#[derive(Debug, Clone, Default)]
pub struct Tanh {
    output: Option<ArrayD<f32>>,
}

impl Tanh {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for Tanh {
    fn name(&self) -> &'static str {
        "tanh"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        Ok(input.to_vec())
    }

    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        let output = input.mapv_into(f32::tanh);
        self.output = ctx.records().then(|| output.clone());
        Ok(output)
    }

    fn backward(&mut self, mut grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let output = self.output.take().ok_or(Error::MissingForward("tanh"))?;
        // d/dx tanh(x) = 1 - tanh(x)^2
        Zip::from(&mut grad_output).and(&output).for_each(|g, &y| *g *= 1.0 - y * y);
        Ok(grad_output)
    }
}

/// Logistic sigmoid, output in (0, 1)
#[derive(Debug, Clone, Default)]
pub struct Sigmoid {
    output: Option<ArrayD<f32>>,
}

impl Sigmoid {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Numerically stable scalar sigmoid
pub(crate) fn sigmoid(v: f32) -> f32 {
    if v >= 0.0 {
        1.0 / (1.0 + (-v).exp())
    } else {
        let e = v.exp();
        e / (1.0 + e)
    }
}

impl Layer for Sigmoid {
    fn name(&self) -> &'static str {
        "sigmoid"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        Ok(input.to_vec())
    }

    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        let output = input.mapv_into(sigmoid);
        self.output = ctx.records().then(|| output.clone());
        Ok(output)
    }

    fn backward(&mut self, mut grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let output = self.output.take().ok_or(Error::MissingForward("sigmoid"))?;
        Zip::from(&mut grad_output).and(&output).for_each(|g, &y| *g *= y * (1.0 - y));
        Ok(grad_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;
    use proptest::prelude::*;

    #[test]
    fn test_leaky_relu_forward() {
        let mut layer = LeakyRelu::new(0.2);
        let y = layer.forward(arr1(&[-1.0, 0.0, 2.0]).into_dyn(), Context::train()).unwrap();
        assert_eq!(y.as_slice().unwrap(), &[-0.2, 0.0, 2.0]);
    }

    #[test]
    fn test_leaky_relu_backward() {
        let mut layer = LeakyRelu::new(0.2);
        layer.forward(arr1(&[-1.0, 3.0]).into_dyn(), Context::train()).unwrap();
        let g = layer.backward(arr1(&[1.0, 1.0]).into_dyn()).unwrap();
        assert_eq!(g.as_slice().unwrap(), &[0.2, 1.0]);
    }

    #[test]
    fn test_backward_without_forward_fails() {
        let mut layer = Tanh::new();
        let err = layer.backward(arr1(&[1.0]).into_dyn()).unwrap_err();
        assert!(matches!(err, Error::MissingForward("tanh")));
    }

    #[test]
    fn test_inference_does_not_record() {
        let mut layer = Sigmoid::new();
        layer.forward(arr1(&[0.5]).into_dyn(), Context::inference()).unwrap();
        assert!(layer.backward(arr1(&[1.0]).into_dyn()).is_err());
    }

    #[test]
    fn test_tanh_gradient_matches_finite_difference() {
        let x = 0.3f32;
        let mut layer = Tanh::new();
        layer.forward(arr1(&[x]).into_dyn(), Context::train()).unwrap();
        let g = layer.backward(arr1(&[1.0]).into_dyn()).unwrap()[[0]];
        let h = 1e-3;
        let numeric = ((x + h).tanh() - (x - h).tanh()) / (2.0 * h);
        assert_abs_diff_eq!(g, numeric, epsilon = 1e-3);
    }

    #[test]
    fn test_sigmoid_extremes_are_finite() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-500.0).is_finite());
        assert!(sigmoid(500.0) <= 1.0);
    }

    proptest! {
        #[test]
        fn test_tanh_bounded(values in prop::collection::vec(-100.0f32..100.0, 1..32)) {
            let mut layer = Tanh::new();
            let y = layer.forward(arr1(&values).into_dyn(), Context::inference()).unwrap();
            prop_assert!(y.iter().all(|v| (-1.0..=1.0).contains(v)));
        }

        #[test]
        fn test_sigmoid_bounded(values in prop::collection::vec(-100.0f32..100.0, 1..32)) {
            let mut layer = Sigmoid::new();
            let y = layer.forward(arr1(&values).into_dyn(), Context::inference()).unwrap();
            prop_assert!(y.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
