//! Fully connected layer

use ndarray::{Array2, ArrayD, Axis, Ix1, Ix2};
use rand::Rng;

use super::{check_sample_shape, glorot_uniform, Layer};
use crate::autograd::{Context, Param};
use crate::error::{Error, Result};

/// `y = x W + b` on (batch, in_features) inputs
#[derive(Debug, Clone)]
pub struct Dense {
    in_features: usize,
    out_features: usize,
    weight: Param,
    bias: Option<Param>,
    input: Option<Array2<f32>>,
}

impl Dense {
    /// Glorot-uniform weights, zero bias
    pub fn new<R: Rng>(rng: &mut R, in_features: usize, out_features: usize, use_bias: bool) -> Self {
        let weight = glorot_uniform(rng, &[in_features, out_features], in_features, out_features);
        Self {
            in_features,
            out_features,
            weight: Param::new(weight),
            bias: use_bias.then(|| Param::full(&[out_features], 0.0)),
            input: None,
        }
    }

    pub fn weight(&self) -> &Param {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Param> {
        self.bias.as_ref()
    }

    fn weight2(&self) -> Result<ndarray::ArrayView2<'_, f32>> {
        self.weight
            .value()
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|e| Error::invalid_input("dense", e.to_string()))
    }
}

impl Layer for Dense {
    fn name(&self) -> &'static str {
        "dense"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        if input != [self.in_features] {
            return Err(Error::invalid_input(
                "dense",
                format!("expected [{}] features, got {input:?}", self.in_features),
            ));
        }
        Ok(vec![self.out_features])
    }

    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        check_sample_shape(&input, &[self.in_features], "dense")?;
        let x = input
            .into_dimensionality::<Ix2>()
            .map_err(|e| Error::invalid_input("dense", e.to_string()))?;

        let mut y = x.dot(&self.weight2()?);
        if let Some(bias) = &self.bias {
            let b = bias
                .value()
                .view()
                .into_dimensionality::<Ix1>()
                .map_err(|e| Error::invalid_input("dense", e.to_string()))?;
            y += &b;
        }

        self.input = ctx.records().then_some(x);
        Ok(y.into_dyn())
    }

    fn backward(&mut self, grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let x = self.input.take().ok_or(Error::MissingForward("dense"))?;
        let g = grad_output
            .into_dimensionality::<Ix2>()
            .map_err(|e| Error::invalid_input("dense", e.to_string()))?;

        // ∂L/∂W = xᵀ g, ∂L/∂b = Σ_batch g, ∂L/∂x = g Wᵀ
        let grad_x = g.dot(&self.weight2()?.t());
        self.weight.accumulate_grad(&x.t().dot(&g).into_dyn());
        if let Some(bias) = &mut self.bias {
            bias.accumulate_grad(&g.sum_axis(Axis(0)).into_dyn());
        }

        Ok(grad_x.into_dyn())
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        let mut params = vec![&mut self.weight];
        if let Some(bias) = &mut self.bias {
            params.push(bias);
        }
        params
    }

    fn num_parameters(&self) -> usize {
        self.weight.len() + self.bias.as_ref().map_or(0, Param::len)
    }
}
