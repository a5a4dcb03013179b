//! Generator network: latent vectors to images.

use ndarray::ArrayD;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{GeneratorConfig, OutputActivation};
use crate::autograd::{Context, Param};
use crate::error::{Error, Result};
use crate::nn::{
    BatchNorm, ConvTranspose2d, Dense, LayerSummary, LeakyRelu, Reshape, Sequential, Sigmoid, Tanh,
};

const SEED_SIDE: usize = 4;
const KERNEL: usize = 5;
const STRIDE: usize = 2;

/// Generator network
///
/// ```text
/// z (latent) ─► Dense ─► BN ─► LReLU ─► Reshape(4, 4, C)
///            ─► [ConvT(k5, s2) ─► BN ─► LReLU] × (stages - 1)
///            ─► ConvT(k5, s2, 3 channels) ─► output activation
/// ```
///
/// With the default configuration the feature maps go
/// 4×4×1024 → 8×8×512 → 16×16×256 → 32×32×128 → 64×64×3.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    net: Sequential,
}

impl Generator {
    /// Create a new generator with random initialization
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::build(config, &mut StdRng::from_os_rng())
    }

    /// Create a new generator with a seed for reproducibility
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Result<Self> {
        Self::build(config, &mut StdRng::seed_from_u64(seed))
    }

    fn build<R: Rng>(config: GeneratorConfig, rng: &mut R) -> Result<Self> {
        let widths = config.stage_channels()?;
        let c = config.channels;
        let (momentum, eps, slope) = (config.bn_momentum, config.bn_epsilon, config.leaky_slope);

        let mut net = Sequential::new(&[config.latent_dim]);
        net.push(Dense::new(rng, config.latent_dim, SEED_SIDE * SEED_SIDE * c, false))?
            .push(BatchNorm::new(SEED_SIDE * SEED_SIDE * c, momentum, eps))?
            .push(LeakyRelu::new(slope))?
            .push(Reshape::new(&[SEED_SIDE, SEED_SIDE, c]))?;
        net.expect_shape(&[SEED_SIDE, SEED_SIDE, c])?;

        let mut side = SEED_SIDE;
        let mut in_ch = c;
        let last = widths.len() - 1;
        for (i, &out_ch) in widths.iter().enumerate() {
            net.push(ConvTranspose2d::new(rng, in_ch, out_ch, KERNEL, STRIDE, false))?;
            side *= STRIDE;
            net.expect_shape(&[side, side, out_ch])?;
            if i < last {
                net.push(BatchNorm::new(out_ch, momentum, eps))?.push(LeakyRelu::new(slope))?;
            }
            in_ch = out_ch;
        }

        match config.output_activation {
            OutputActivation::Tanh => {
                net.push(Tanh::new())?;
            }
            OutputActivation::SigmoidTanh => {
                net.push(Sigmoid::new())?.push(Tanh::new())?;
            }
        }
        net.expect_shape(&[config.image_size, config.image_size, 3])?;

        Ok(Self { config, net })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn latent_dim(&self) -> usize {
        self.config.latent_dim
    }

    /// Generate images of shape (batch, size, size, 3)
    ///
    /// Accepts latents shaped (batch, latent_dim, 1) or (batch, latent_dim).
    pub fn forward(&mut self, latent: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        let shape = latent.shape().to_vec();
        let latent = match shape.as_slice() {
            [batch, d, 1] if *d == self.config.latent_dim => {
                crate::nn::reshape(latent, &[*batch, *d], "generator")?
            }
            [_, d] if *d == self.config.latent_dim => latent,
            shape => {
                return Err(Error::invalid_input(
                    "generator",
                    format!(
                        "expected latents shaped (batch, {0}, 1) or (batch, {0}), got {shape:?}",
                        self.config.latent_dim
                    ),
                ))
            }
        };
        self.net.forward(latent, ctx)
    }

    /// Backpropagate an image gradient; returns the gradient w.r.t. the latent batch
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

    /// Output shape after every layer
    pub fn shapes(&self) -> &[Vec<usize>] {
        self.net.shapes()
    }

    pub fn summary(&self) -> Vec<LayerSummary> {
        self.net.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generative::gan::latent::sample_latent;
    use proptest::prelude::*;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig { latent_dim: 16, channels: 32, ..Default::default() }
    }

    #[test]
    fn test_generator_default_shape_trail() {
        let gen = Generator::with_seed(GeneratorConfig::default(), 42).unwrap();
        let convs: Vec<&Vec<usize>> = gen
            .summary()
            .iter()
            .zip(gen.shapes())
            .filter(|(s, _)| s.name == "conv_transpose2d" || s.name == "reshape")
            .map(|(_, shape)| shape)
            .collect();
        assert_eq!(
            convs,
            vec![
                &vec![4, 4, 1024],
                &vec![8, 8, 512],
                &vec![16, 16, 256],
                &vec![32, 32, 128],
                &vec![64, 64, 3]
            ]
        );
    }

    #[test]
    fn test_generator_output_range() {
        let mut gen = Generator::with_seed(small_config(), 1).unwrap();
        let z = sample_latent(&mut StdRng::seed_from_u64(2), 2, 16);
        let y = gen.forward(z.into_dyn(), Context::inference()).unwrap();
        assert_eq!(y.shape(), &[2, 64, 64, 3]);
        assert!(y.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_generator_accepts_flat_latents() {
        let mut gen = Generator::with_seed(small_config(), 1).unwrap();
        let z = ArrayD::zeros(ndarray::IxDyn(&[3, 16]));
        let y = gen.forward(z, Context::inference()).unwrap();
        assert_eq!(y.shape()[0], 3);
    }

    #[test]
    fn test_generator_rejects_wrong_latent_dim() {
        let mut gen = Generator::with_seed(small_config(), 1).unwrap();
        let z = ArrayD::zeros(ndarray::IxDyn(&[2, 15, 1]));
        assert!(matches!(
            gen.forward(z, Context::inference()),
            Err(Error::InvalidInput { layer: "generator", .. })
        ));
    }

    #[test]
    fn test_generator_backward_reaches_every_param() {
        let config = GeneratorConfig { image_size: 16, channels: 8, latent_dim: 4, ..Default::default() };
        let mut gen = Generator::with_seed(config, 3).unwrap();
        let z = sample_latent(&mut StdRng::seed_from_u64(4), 2, 4);
        let y = gen.forward(z.into_dyn(), Context::train()).unwrap();
        let gz = gen.backward(ArrayD::ones(y.raw_dim())).unwrap();
        assert_eq!(gz.shape(), &[2, 4]);
        assert!(gen.params_mut().iter().all(|p| p.grad().is_some()));
    }

    #[test]
    fn test_generator_sigmoid_tanh_range() {
        let config = GeneratorConfig {
            image_size: 16,
            channels: 8,
            latent_dim: 4,
            output_activation: OutputActivation::SigmoidTanh,
            ..Default::default()
        };
        let mut gen = Generator::with_seed(config, 3).unwrap();
        let z = sample_latent(&mut StdRng::seed_from_u64(5), 2, 4);
        let y = gen.forward(z.into_dyn(), Context::inference()).unwrap();
        assert!(y.iter().all(|&v| (0.0..0.77).contains(&v)));
    }

    #[test]
    fn test_generator_seeded_is_deterministic() {
        let config = GeneratorConfig { image_size: 8, channels: 4, latent_dim: 4, ..Default::default() };
        let mut a = Generator::with_seed(config.clone(), 9).unwrap();
        let mut b = Generator::with_seed(config, 9).unwrap();
        let z = sample_latent(&mut StdRng::seed_from_u64(0), 1, 4).into_dyn();
        assert_eq!(
            a.forward(z.clone(), Context::inference()).unwrap(),
            b.forward(z, Context::inference()).unwrap()
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn test_generator_output_in_tanh_range(seed in 0u64..10000) {
            let config = GeneratorConfig { image_size: 8, channels: 4, latent_dim: 4, ..Default::default() };
            let mut gen = Generator::with_seed(config, seed).unwrap();
            let z = sample_latent(&mut StdRng::seed_from_u64(seed), 2, 4);
            let y = gen.forward(z.into_dyn(), Context::train()).unwrap();
            prop_assert!(y.iter().all(|v| (-1.0..=1.0).contains(v)));
        }
    }
}
