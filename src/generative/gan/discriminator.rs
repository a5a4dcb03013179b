//! Discriminator network: images to real/fake probabilities.

use ndarray::ArrayD;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::DiscriminatorConfig;
use crate::autograd::{Context, Param};
use crate::error::{Error, Result};
use crate::nn::{Conv2d, Dense, Dropout, Flatten, LayerSummary, LeakyRelu, Sequential, Sigmoid};

const KERNEL: usize = 5;
const STRIDE: usize = 2;

/// Discriminator network
///
/// ```text
/// image ─► [Conv(k5, s2) ─► LReLU ─► Dropout] × (stages - 1)
///       ─► Conv(k5, s2) ─► LReLU ─► Flatten ─► Dense(1) ─► Sigmoid
/// ```
///
/// Default widths are 64, 128, 256, 512 over 32×32, 16×16, 8×8, 4×4.
#[derive(Debug)]
pub struct Discriminator {
    config: DiscriminatorConfig,
    net: Sequential,
}

impl Discriminator {
    /// Create a new discriminator with random initialization
    pub fn new(config: DiscriminatorConfig) -> Result<Self> {
        Self::build(config, &mut StdRng::from_os_rng())
    }

    /// Create a new discriminator with a seed for reproducibility
    pub fn with_seed(config: DiscriminatorConfig, seed: u64) -> Result<Self> {
        Self::build(config, &mut StdRng::seed_from_u64(seed))
    }

    fn build<R: Rng>(config: DiscriminatorConfig, rng: &mut R) -> Result<Self> {
        let widths = config.stage_channels()?;
        if !(0.0..1.0).contains(&config.dropout) {
            return Err(Error::ConfigError(format!(
                "dropout must be in [0, 1), got {}",
                config.dropout
            )));
        }
        let mut net = Sequential::new(&[config.image_size, config.image_size, 3]);

        let mut side = config.image_size;
        let mut in_ch = 3;
        let last = widths.len() - 1;
        for (i, &out_ch) in widths.iter().enumerate() {
            net.push(Conv2d::new(rng, in_ch, out_ch, KERNEL, STRIDE, true))?;
            side /= STRIDE;
            net.expect_shape(&[side, side, out_ch])?;
            net.push(LeakyRelu::new(config.leaky_slope))?;
            if i < last {
                net.push(Dropout::new(config.dropout, rng.random()))?;
            }
            in_ch = out_ch;
        }

        let features = side * side * in_ch;
        net.push(Flatten::new())?
            .push(Dense::new(rng, features, 1, true))?
            .push(Sigmoid::new())?;
        net.expect_shape(&[1])?;

        Ok(Self { config, net })
    }

    pub fn config(&self) -> &DiscriminatorConfig {
        &self.config
    }

    /// Probabilities of shape (batch, 1)
    pub fn forward(&mut self, images: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        self.net.forward(images, ctx)
    }

    /// Backpropagate a score gradient; returns the gradient w.r.t. the images
    pub fn backward(&mut self, grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.net.backward(grad_output)
    }

    pub fn params_mut(&mut self) -> Vec<&mut Param> {
        self.net.params_mut()
    }

    pub fn zero_grad(&mut self) {
        self.net.zero_grad();
    }

    /// Get number of parameters
    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.net.num_parameters()
    }

    pub fn shapes(&self) -> &[Vec<usize>] {
        self.net.shapes()
    }

    pub fn summary(&self) -> Vec<LayerSummary> {
        self.net.summary()
    }
}
