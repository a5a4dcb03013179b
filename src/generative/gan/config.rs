//! Configuration types for the DCGAN components.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Final activation of the generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputActivation {
    /// `tanh`, output in (-1, 1)
    #[default]
    Tanh,
    /// `tanh(sigmoid(x))`, output in (0.0, 0.762); kept for comparison runs
    SigmoidTanh,
}

/// Configuration for the Generator network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Dimension of the latent space
    pub latent_dim: usize,
    /// Channels of the 4×4 seed feature map; halved by every upsampling stage
    pub channels: usize,
    /// Side of the square output image, a power of two ≥ 8
    pub image_size: usize,
    /// Negative slope of the LeakyReLU activations
    pub leaky_slope: f32,
    /// Batch normalization momentum
    pub bn_momentum: f32,
    /// Batch normalization epsilon
    pub bn_epsilon: f32,
    pub output_activation: OutputActivation,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            latent_dim: 128,
            channels: 1024,
            image_size: 64,
            leaky_slope: 0.2,
            bn_momentum: 0.99,
            bn_epsilon: 1e-3,
            output_activation: OutputActivation::Tanh,
        }
    }
}

impl GeneratorConfig {
    /// Number of stride-2 stages between 4×4 and the image size
    pub fn stages(&self) -> Result<usize> {
        stages(self.image_size)
    }

    /// Output channels of every transposed convolution
    pub fn stage_channels(&self) -> Result<Vec<usize>> {
        let stages = self.stages()?;
        if self.channels >> (stages - 1) == 0 || self.channels % (1 << (stages - 1)) != 0 {
            return Err(Error::ConfigError(format!(
                "generator channels {} must be a positive multiple of {}",
                self.channels,
                1 << (stages - 1)
            )));
        }
        let mut widths: Vec<usize> = (1..stages).map(|i| self.channels >> i).collect();
        widths.push(3);
        Ok(widths)
    }
}

/// Configuration for the Discriminator network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscriminatorConfig {
    /// Side of the square input image, a power of two ≥ 8
    pub image_size: usize,
    /// Channels of the first convolution; doubled by every stage
    pub channels: usize,
    /// Dropout rate after every convolution stage but the last
    pub dropout: f32,
    /// Negative slope of the LeakyReLU activations
    pub leaky_slope: f32,
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self { image_size: 64, channels: 64, dropout: 0.1, leaky_slope: 0.2 }
    }
}

impl DiscriminatorConfig {
    pub fn stages(&self) -> Result<usize> {
        stages(self.image_size)
    }

    pub fn stage_channels(&self) -> Result<Vec<usize>> {
        if self.channels == 0 {
            return Err(Error::ConfigError("discriminator channels must be positive".into()));
        }
        Ok((0..self.stages()?).map(|i| self.channels << i).collect())
    }
}

/// Configuration for the complete GAN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanConfig {
    pub generator: GeneratorConfig,
    pub discriminator: DiscriminatorConfig,
    /// Learning rate for both optimizers
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    /// Amplitude of the uniform noise added to discriminator labels
    pub label_noise: f32,
}

impl Default for GanConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            discriminator: DiscriminatorConfig::default(),
            learning_rate: 1e-4,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            label_noise: 0.15,
        }
    }
}

fn stages(image_size: usize) -> Result<usize> {
    if image_size < 8 || !image_size.is_power_of_two() {
        return Err(Error::ConfigError(format!(
            "image size must be a power of two >= 8, got {image_size}"
        )));
    }
    Ok((image_size / 4).trailing_zeros() as usize)
}
