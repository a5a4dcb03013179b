//! Strided 2-D convolution with "same" padding

use ndarray::linalg::general_mat_mul;
use ndarray::{Array1, Array2, Array4, ArrayD, Axis, Ix1, Ix2, Ix4, Zip};
use rand::Rng;
use rayon::prelude::*;

use super::im2col::{col2im, im2col, Geometry};
use super::{check_sample_shape, glorot_uniform, Layer};
use crate::autograd::{Context, Param};
use crate::error::{Error, Result};

/// Square-kernel convolution over NHWC batches
///
/// Weight layout is `(kernel * kernel * in_channels, out_channels)`, matching
/// the patch rows produced by im2col. Samples are processed in parallel.
#[derive(Debug, Clone)]
pub struct Conv2d {
    in_channels: usize,
    out_channels: usize,
    kernel: usize,
    stride: usize,
    weight: Param,
    bias: Option<Param>,
    input: Option<Array4<f32>>,
}

impl Conv2d {
    pub fn new<R: Rng>(
        rng: &mut R,
        in_channels: usize,
        out_channels: usize,
        kernel: usize,
        stride: usize,
        use_bias: bool,
    ) -> Self {
        let fan_in = kernel * kernel * in_channels;
        let fan_out = kernel * kernel * out_channels;
        let weight = glorot_uniform(rng, &[fan_in, out_channels], fan_in, fan_out);
        Self {
            in_channels,
            out_channels,
            kernel,
            stride,
            weight: Param::new(weight),
            bias: use_bias.then(|| Param::full(&[out_channels], 0.0)),
            input: None,
        }
    }

    pub fn weight(&self) -> &Param {
        &self.weight
    }

    fn geometry(&self, h: usize, w: usize) -> Geometry {
        Geometry::same(h, w, self.in_channels, self.kernel, self.stride)
    }

    fn weight2(&self) -> Result<ndarray::ArrayView2<'_, f32>> {
        self.weight
            .value()
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|e| Error::invalid_input("conv2d", e.to_string()))
    }

    fn bias1(&self) -> Result<Option<ndarray::ArrayView1<'_, f32>>> {
        self.bias
            .as_ref()
            .map(|b| {
                b.value()
                    .view()
                    .into_dimensionality::<Ix1>()
                    .map_err(|e| Error::invalid_input("conv2d", e.to_string()))
            })
            .transpose()
    }
}

impl Layer for Conv2d {
    fn name(&self) -> &'static str {
        "conv2d"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        match input {
            [h, w, c] if *c == self.in_channels => {
                let g = self.geometry(*h, *w);
                Ok(vec![g.out_h, g.out_w, self.out_channels])
            }
            _ => Err(Error::invalid_input(
                "conv2d",
                format!("expected [h, w, {}], got {input:?}", self.in_channels),
            )),
        }
    }

    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        let out_shape = self.output_shape(&input.shape()[1..])?;
        let x = input
            .into_dimensionality::<Ix4>()
            .map_err(|e| Error::invalid_input("conv2d", e.to_string()))?;
        let (batch, h, w, _) = x.dim();
        let g = self.geometry(h, w);
        let weight = self.weight2()?;
        let bias = self.bias1()?;

        let out_channels = self.out_channels;
        let mut output = Array4::<f32>::zeros((batch, out_shape[0], out_shape[1], out_shape[2]));
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(x.axis_iter(Axis(0)))
            .try_for_each(|(mut out, sample)| -> Result<()> {
                let cols = im2col(sample, &g);
                let mut y = cols.dot(&weight);
                if let Some(b) = &bias {
                    y += b;
                }
                let y = y
                    .into_shape_with_order((g.out_h, g.out_w, out_channels))
                    .map_err(|e| Error::invalid_input("conv2d", e.to_string()))?;
                out.assign(&y);
                Ok(())
            })?;

        self.input = ctx.records().then_some(x);
        Ok(output.into_dyn())
    }

    fn backward(&mut self, grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let x = self.input.take().ok_or(Error::MissingForward("conv2d"))?;
        let (batch, h, w, _) = x.dim();
        let g = self.geometry(h, w);
        check_sample_shape(&grad_output, &[g.out_h, g.out_w, self.out_channels], "conv2d")?;
        let grad_output = grad_output.as_standard_layout().into_owned();
        let rows = g.out_h * g.out_w;
        let weight = self.weight2()?;

        let out_channels = self.out_channels;
        // (batch, out_h * out_w, out_channels)
        let grad = grad_output
            .view()
            .into_shape_with_order((batch, rows, out_channels))
            .map_err(|e| Error::invalid_input("conv2d", e.to_string()))?;

        // ∂L/∂x = col2im(g Wᵀ) per sample
        let mut grad_x = Array4::<f32>::zeros((batch, h, w, self.in_channels));
        Zip::from(grad_x.axis_iter_mut(Axis(0))).and(grad.axis_iter(Axis(0))).par_for_each(
            |mut gx, gy| {
                let dcols = gy.dot(&weight.t());
                gx.assign(&col2im(dcols.view(), &g));
            },
        );

        // ∂L/∂W = Σ_samples im2col(x)ᵀ g
        let patch = g.patch_len();
        let grad_w = (0..batch)
            .into_par_iter()
            .fold(
                || Array2::<f32>::zeros((patch, out_channels)),
                |mut acc, n| {
                    let cols = im2col(x.index_axis(Axis(0), n), &g);
                    general_mat_mul(1.0, &cols.t(), &grad.index_axis(Axis(0), n), 1.0, &mut acc);
                    acc
                },
            )
            .reduce(|| Array2::<f32>::zeros((patch, out_channels)), |a, b| a + b);

        self.weight.accumulate_grad(&grad_w.into_dyn());
        if let Some(bias) = &mut self.bias {
            let grad_b: Array1<f32> = grad.sum_axis(Axis(0)).sum_axis(Axis(0));
            bias.accumulate_grad(&grad_b.into_dyn());
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
