//! Batch normalization over the channel (last) axis

use ndarray::{Array1, Array2, ArrayD, Axis, Ix1, Ix2};

use super::{reshape, Layer};
use crate::autograd::{Context, Param};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum Record {
    None,
    Batch { xhat: Array2<f32>, inv_std: Array1<f32>, shape: Vec<usize> },
    Moving { inv_std: Array1<f32>, shape: Vec<usize> },
}

/// Normalizes every feature with batch statistics while training and with
/// exponential moving averages otherwise
///
/// Statistics are taken over every axis but the last; variance is biased.
#[derive(Debug, Clone)]
pub struct BatchNorm {
    features: usize,
    momentum: f32,
    epsilon: f32,
    gamma: Param,
    beta: Param,
    moving_mean: Array1<f32>,
    moving_var: Array1<f32>,
    record: Record,
}

impl BatchNorm {
    pub fn new(features: usize, momentum: f32, epsilon: f32) -> Self {
        Self {
            features,
            momentum,
            epsilon,
            gamma: Param::full(&[features], 1.0),
            beta: Param::full(&[features], 0.0),
            moving_mean: Array1::zeros(features),
            moving_var: Array1::ones(features),
            record: Record::None,
        }
    }

    pub fn moving_mean(&self) -> &Array1<f32> {
        &self.moving_mean
    }

    pub fn moving_var(&self) -> &Array1<f32> {
        &self.moving_var
    }

    fn vector(p: &Param) -> Result<ndarray::ArrayView1<'_, f32>> {
        p.value()
            .view()
            .into_dimensionality::<Ix1>()
            .map_err(|e| Error::invalid_input("batch_norm", e.to_string()))
    }

    /// Flatten to (rows, features)
    fn rows(&self, x: ArrayD<f32>) -> Result<Array2<f32>> {
        let rows = x.len() / self.features;
        reshape(x, &[rows, self.features], "batch_norm")?
            .into_dimensionality::<Ix2>()
            .map_err(|e| Error::invalid_input("batch_norm", e.to_string()))
    }
}

impl Layer for BatchNorm {
    fn name(&self) -> &'static str {
        "batch_norm"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        if input.last() != Some(&self.features) {
            return Err(Error::invalid_input(
                "batch_norm",
                format!("expected {} features on the last axis, got {input:?}", self.features),
            ));
        }
        Ok(input.to_vec())
    }

    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        self.output_shape(&input.shape()[1..])?;
        let shape = input.shape().to_vec();
        let x = self.rows(input)?;

        let (mean, var) = if ctx.is_training() {
            let n = x.nrows() as f32;
            let mean = x.sum_axis(Axis(0)) / n;
            let centered = &x - &mean;
            let var = (&centered * &centered).sum_axis(Axis(0)) / n;
            let m = self.momentum;
            self.moving_mean = &self.moving_mean * m + &mean * (1.0 - m);
            self.moving_var = &self.moving_var * m + &var * (1.0 - m);
            (mean, var)
        } else {
            (self.moving_mean.clone(), self.moving_var.clone())
        };

        let eps = self.epsilon;
        let inv_std = var.mapv(|v| 1.0 / (v + eps).sqrt());
        let xhat = (x - &mean) * &inv_std;
        let y = &xhat * &Self::vector(&self.gamma)? + &Self::vector(&self.beta)?;

        self.record = match (ctx.records(), ctx.is_training()) {
            (false, _) => Record::None,
            (true, true) => Record::Batch { xhat, inv_std, shape: shape.clone() },
            (true, false) => Record::Moving { inv_std, shape: shape.clone() },
        };
        reshape(y.into_dyn(), &shape, "batch_norm")
    }

    fn backward(&mut self, grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let record = std::mem::replace(&mut self.record, Record::None);
        let g = self.rows(grad_output)?;
        let gamma = Self::vector(&self.gamma)?.to_owned();

        let (grad_x, shape) = match record {
            Record::None => return Err(Error::MissingForward("batch_norm")),
            Record::Moving { inv_std, shape } => (&g * &(gamma * inv_std), shape),
            Record::Batch { xhat, inv_std, shape } => {
                let n = g.nrows() as f32;
                self.gamma.accumulate_grad(&(&g * &xhat).sum_axis(Axis(0)).into_dyn());
                self.beta.accumulate_grad(&g.sum_axis(Axis(0)).into_dyn());

                // ∂L/∂x = γ/σ · (g − mean(g) − x̂ · mean(g x̂))
                let mean_g = g.sum_axis(Axis(0)) / n;
                let mean_gx = (&g * &xhat).sum_axis(Axis(0)) / n;
                let grad_x = (&g - &mean_g - &(&xhat * &mean_gx)) * &(gamma * inv_std);
                (grad_x, shape)
            }
        };
        reshape(grad_x.into_dyn(), &shape, "batch_norm")
    }

    fn params_mut(&mut self) -> Vec<&mut Param> {
        vec![&mut self.gamma, &mut self.beta]
    }

    fn num_parameters(&self) -> usize {
        self.gamma.len() + self.beta.len()
    }
}
