//! Strided transposed convolution (fractionally strided upsampling)

use ndarray::linalg::general_mat_mul;
use ndarray::{Array1, Array2, Array4, ArrayD, Axis, Ix1, Ix2, Ix4};
use rand::Rng;
use rayon::prelude::*;

use super::im2col::{col2im, im2col, Geometry};
use super::{check_sample_shape, glorot_uniform, Layer};
use crate::autograd::{Context, Param};
use crate::error::{Error, Result};

/// Transposed convolution with "same" padding: output resolution is
/// `input * stride`
///
/// Computed as the adjoint of a [`Conv2d`](super::Conv2d) running from the
/// output space back to the input space. Weight layout is
/// `(in_channels, kernel * kernel * out_channels)`.
#[derive(Debug, Clone)]
pub struct ConvTranspose2d {
    in_channels: usize,
    out_channels: usize,
    kernel: usize,
    stride: usize,
    weight: Param,
    bias: Option<Param>,
    input: Option<Array4<f32>>,
}

impl ConvTranspose2d {
    pub fn new<R: Rng>(
        rng: &mut R,
        in_channels: usize,
        out_channels: usize,
        kernel: usize,
        stride: usize,
        use_bias: bool,
    ) -> Self {
        let patch = kernel * kernel * out_channels;
        let weight = glorot_uniform(rng, &[in_channels, patch], patch, kernel * kernel * in_channels);
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

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Geometry of the adjoint convolution, output space to input space
    fn geometry(&self, h: usize, w: usize) -> Geometry {
        Geometry::same(h * self.stride, w * self.stride, self.out_channels, self.kernel, self.stride)
    }

    fn weight2(&self) -> Result<ndarray::ArrayView2<'_, f32>> {
        self.weight
            .value()
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|e| Error::invalid_input("conv_transpose2d", e.to_string()))
    }
}

impl Layer for ConvTranspose2d {
    fn name(&self) -> &'static str {
        "conv_transpose2d"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        match input {
            [h, w, c] if *c == self.in_channels => {
                Ok(vec![h * self.stride, w * self.stride, self.out_channels])
            }
            _ => Err(Error::invalid_input(
                "conv_transpose2d",
                format!("expected [h, w, {}], got {input:?}", self.in_channels),
            )),
        }
    }

    fn forward(&mut self, input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        self.output_shape(&input.shape()[1..])?;
        let x = input
            .as_standard_layout()
            .into_owned()
            .into_dimensionality::<Ix4>()
            .map_err(|e| Error::invalid_input("conv_transpose2d", e.to_string()))?;
        let (batch, h, w, _) = x.dim();
        let g = self.geometry(h, w);
        let weight = self.weight2()?;
        let in_channels = self.in_channels;

        let mut output = Array4::<f32>::zeros((batch, g.in_h, g.in_w, self.out_channels));
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(x.axis_iter(Axis(0)))
            .try_for_each(|(mut out, sample)| -> Result<()> {
                let rows = sample
                    .into_shape_with_order((h * w, in_channels))
                    .map_err(|e| Error::invalid_input("conv_transpose2d", e.to_string()))?;
                out.assign(&col2im(rows.dot(&weight).view(), &g));
                Ok(())
            })?;

        if let Some(bias) = &self.bias {
            let b = bias
                .value()
                .view()
                .into_dimensionality::<Ix1>()
                .map_err(|e| Error::invalid_input("conv_transpose2d", e.to_string()))?;
            output += &b;
        }

        self.input = ctx.records().then_some(x);
        Ok(output.into_dyn())
    }

    fn backward(&mut self, grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let x = self.input.take().ok_or(Error::MissingForward("conv_transpose2d"))?;
        let (batch, h, w, _) = x.dim();
        let g = self.geometry(h, w);
        check_sample_shape(&grad_output, &[g.in_h, g.in_w, self.out_channels], "conv_transpose2d")?;
        if grad_output.shape()[0] != batch {
            return Err(Error::invalid_input(
                "conv_transpose2d",
                format!("gradient batch {} does not match input batch {batch}", grad_output.shape()[0]),
            ));
        }
        let grad = grad_output
            .into_dimensionality::<Ix4>()
            .map_err(|e| Error::invalid_input("conv_transpose2d", e.to_string()))?;
        let weight = self.weight2()?;
        let in_channels = self.in_channels;

        // ∂L/∂x = im2col(g) Wᵀ per sample
        let mut grad_x = Array4::<f32>::zeros((batch, h, w, in_channels));
        grad_x
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(grad.axis_iter(Axis(0)))
            .try_for_each(|(mut gx, gy)| -> Result<()> {
                let dx = im2col(gy, &g)
                    .dot(&weight.t())
                    .into_shape_with_order((h, w, in_channels))
                    .map_err(|e| Error::invalid_input("conv_transpose2d", e.to_string()))?;
                gx.assign(&dx);
                Ok(())
            })?;

        // ∂L/∂W = Σ_samples xᵀ im2col(g)
        let patch = g.patch_len();
        let grad_w = (0..batch)
            .into_par_iter()
            .try_fold(
                || Array2::<f32>::zeros((in_channels, patch)),
                |mut acc, n| -> Result<Array2<f32>> {
                    let dcols = im2col(grad.index_axis(Axis(0), n), &g);
                    let rows = x
                        .index_axis(Axis(0), n)
                        .into_shape_with_order((h * w, in_channels))
                        .map_err(|e| Error::invalid_input("conv_transpose2d", e.to_string()))?;
                    general_mat_mul(1.0, &rows.t(), &dcols, 1.0, &mut acc);
                    Ok(acc)
                },
            )
            .try_reduce(|| Array2::<f32>::zeros((in_channels, patch)), |a, b| Ok(a + b))?;

        self.weight.accumulate_grad(&grad_w.into_dyn());
        if let Some(bias) = &mut self.bias {
            let grad_b: Array1<f32> = grad.sum_axis(Axis(0)).sum_axis(Axis(0)).sum_axis(Axis(0));
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
