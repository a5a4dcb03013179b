//! YAML schema definitions for declarative GAN training

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::LoaderConfig;
use crate::generative::{DiscriminatorConfig, GanConfig, GeneratorConfig, OutputActivation};

/// Complete training specification
///
/// Every section except `data.dir` has defaults, so the smallest manifest is
///
/// ```yaml
/// data:
///   dir: ./images
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanSpec {
    pub data: DataSpec,
    #[serde(default)]
    pub model: ModelSpec,
    #[serde(default)]
    pub optimizer: OptimSpec,
    #[serde(default)]
    pub training: TrainingParams,
    #[serde(default)]
    pub sampling: SamplingSpec,
}

/// Dataset location and batching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSpec {
    /// Directory searched recursively for images
    pub dir: PathBuf,
    /// Side of the square training images
    #[serde(default = "default_image_size")]
    pub image_size: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_true")]
    pub shuffle: bool,
    /// Batches decoded ahead of training
    #[serde(default = "default_prefetch")]
    pub prefetch: usize,
}

/// Network architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default = "default_latent_dim")]
    pub latent_dim: usize,
    /// Channels of the generator's 4×4 projection
    #[serde(default = "default_generator_channels")]
    pub generator_channels: usize,
    /// Channels of the discriminator's first convolution
    #[serde(default = "default_discriminator_channels")]
    pub discriminator_channels: usize,
    #[serde(default = "default_dropout")]
    pub dropout: f32,
    #[serde(default = "default_leaky_slope")]
    pub leaky_slope: f32,
    #[serde(default)]
    pub output_activation: OutputActivation,
}

/// Adam hyperparameters, shared by both networks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimSpec {
    #[serde(default = "default_lr")]
    pub lr: f32,
    #[serde(default = "default_beta1")]
    pub beta1: f32,
    #[serde(default = "default_beta2")]
    pub beta2: f32,
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
}

/// Run-level parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    /// Amplitude of uniform noise on discriminator labels
    #[serde(default = "default_label_noise")]
    pub label_noise: f32,
    /// Seed for weights, latents, label noise and shuffling
    #[serde(default)]
    pub seed: Option<u64>,
    /// Compute threads; all cores when absent
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Sample image output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSpec {
    /// Completed epochs between sample writes; 0 disables
    #[serde(default = "default_every")]
    pub every: usize,
    #[serde(default = "default_num_images")]
    pub num_images: usize,
    /// Sample directory; `<output_dir>/samples` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Side of the final sample mosaic; 0 disables
    #[serde(default = "default_grid")]
    pub grid: usize,
}

fn default_image_size() -> usize {
    64
}
fn default_batch_size() -> usize {
    128
}
fn default_true() -> bool {
    true
}
fn default_prefetch() -> usize {
    2
}
fn default_latent_dim() -> usize {
    128
}
fn default_generator_channels() -> usize {
    1024
}
fn default_discriminator_channels() -> usize {
    64
}
fn default_dropout() -> f32 {
    0.1
}
fn default_leaky_slope() -> f32 {
    0.2
}
fn default_lr() -> f32 {
    1e-4
}
fn default_beta1() -> f32 {
    0.9
}
fn default_beta2() -> f32 {
    0.999
}
fn default_epsilon() -> f32 {
    1e-7
}
fn default_epochs() -> usize {
    10
}
fn default_label_noise() -> f32 {
    0.15
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}
fn default_every() -> usize {
    5
}
fn default_num_images() -> usize {
    3
}
fn default_grid() -> usize {
    4
}

impl GanSpec {
    /// Defaults everywhere, reading images from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            data: DataSpec::new(dir),
            model: ModelSpec::default(),
            optimizer: OptimSpec::default(),
            training: TrainingParams::default(),
            sampling: SamplingSpec::default(),
        }
    }

    /// Network and optimizer settings
    pub fn gan_config(&self) -> GanConfig {
        let model = &self.model;
        let generator = GeneratorConfig {
            latent_dim: model.latent_dim,
            channels: model.generator_channels,
            image_size: self.data.image_size,
            leaky_slope: model.leaky_slope,
            output_activation: model.output_activation,
            ..Default::default()
        };
        let discriminator = DiscriminatorConfig {
            image_size: self.data.image_size,
            channels: model.discriminator_channels,
            dropout: model.dropout,
            leaky_slope: model.leaky_slope,
        };
        GanConfig {
            generator,
            discriminator,
            learning_rate: self.optimizer.lr,
            beta1: self.optimizer.beta1,
            beta2: self.optimizer.beta2,
            epsilon: self.optimizer.epsilon,
            label_noise: self.training.label_noise,
        }
    }

    /// Batch loader settings; the shuffle seed follows the run seed
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            batch_size: self.data.batch_size,
            shuffle: self.data.shuffle,
            prefetch: self.data.prefetch,
            seed: self.training.seed,
        }
    }

    /// Where sample images go
    pub fn sample_dir(&self) -> PathBuf {
        self.sampling.dir.clone().unwrap_or_else(|| self.training.output_dir.join("samples"))
    }

    /// Where `history.json` goes
    pub fn history_path(&self) -> PathBuf {
        self.training.output_dir.join(HISTORY_FILE)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data.dir
    }
}

/// File name of the per-epoch loss history
pub const HISTORY_FILE: &str = "history.json";

impl DataSpec {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            image_size: default_image_size(),
            batch_size: default_batch_size(),
            shuffle: true,
            prefetch: default_prefetch(),
        }
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            latent_dim: default_latent_dim(),
            generator_channels: default_generator_channels(),
            discriminator_channels: default_discriminator_channels(),
            dropout: default_dropout(),
            leaky_slope: default_leaky_slope(),
            output_activation: OutputActivation::default(),
        }
    }
}

impl Default for OptimSpec {
    fn default() -> Self {
        Self { lr: default_lr(), beta1: default_beta1(), beta2: default_beta2(), epsilon: default_epsilon() }
    }
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            label_noise: default_label_noise(),
            seed: None,
            threads: None,
            output_dir: default_output_dir(),
        }
    }
}

impl Default for SamplingSpec {
    fn default() -> Self {
        Self { every: default_every(), num_images: default_num_images(), dir: None, grid: default_grid() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_manifest_gets_defaults() {
        let spec: GanSpec = serde_yaml::from_str("data:\n  dir: ./images\n").unwrap();
        assert_eq!(spec, GanSpec::new("./images"));
        assert_eq!(spec.data.batch_size, 128);
        assert_eq!(spec.model.latent_dim, 128);
        assert_eq!(spec.training.epochs, 10);
        assert_eq!(spec.sampling.every, 5);
        assert_eq!(spec.sampling.num_images, 3);
        assert_eq!(spec.sample_dir(), PathBuf::from("./output/samples"));
    }

    #[test]
    fn test_full_manifest() {
        let yaml = r"
data: { dir: /data/art, image_size: 32, batch_size: 16, shuffle: false, prefetch: 4 }
model: { latent_dim: 64, generator_channels: 256, discriminator_channels: 32,
         dropout: 0.2, leaky_slope: 0.1, output_activation: sigmoid_tanh }
optimizer: { lr: 0.0002, beta1: 0.5, beta2: 0.99, epsilon: 1.0e-8 }
training: { epochs: 3, label_noise: 0.0, seed: 7, threads: 2, output_dir: /tmp/run }
sampling: { every: 1, num_images: 2, dir: /tmp/samples, grid: 3 }
";
        let spec: GanSpec = serde_yaml::from_str(yaml).unwrap();
        assert!(!spec.data.shuffle);
        assert_eq!(spec.model.output_activation, OutputActivation::SigmoidTanh);
        assert_eq!(spec.training.seed, Some(7));
        assert_eq!(spec.sample_dir(), PathBuf::from("/tmp/samples"));
        assert_eq!(spec.history_path(), PathBuf::from("/tmp/run/history.json"));

        let gan = spec.gan_config();
        assert_eq!(gan.generator.image_size, 32);
        assert_eq!(gan.discriminator.image_size, 32);
        assert_eq!(gan.generator.channels, 256);
        assert_eq!(gan.beta1, 0.5);
        assert_eq!(gan.label_noise, 0.0);

        let loader = spec.loader_config();
        assert_eq!(loader.batch_size, 16);
        assert_eq!(loader.seed, Some(7));
    }

    #[test]
    fn test_missing_data_dir_is_an_error() {
        assert!(serde_yaml::from_str::<GanSpec>("model: { latent_dim: 8 }\n").is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let spec = GanSpec::new("./images");
        let text = serde_yaml::to_string(&spec).unwrap();
        assert_eq!(serde_yaml::from_str::<GanSpec>(&text).unwrap(), spec);
    }
}
