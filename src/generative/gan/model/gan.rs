//! GAN main struct and training logic.

use ndarray::{Array1, Array3, Array4, Ix2, Ix4};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::autograd::Context;
use crate::error::{Error, Result};
use crate::generative::gan::config::GanConfig;
use crate::generative::gan::discriminator::Discriminator;
use crate::generative::gan::generator::Generator;
use crate::generative::gan::latent::sample_latent;
use crate::generative::gan::step::{discriminator_step, generator_step};
use crate::optim::Adam;
use crate::train::BinaryCrossEntropy;

use super::stats::{GanStats, HISTORY_WINDOW};
use super::step_result::StepResult;

/// Generator, discriminator and their optimizers
///
/// Each network has its own Adam instance; optimizer state is never shared.
pub struct Gan {
    /// Configuration
    pub config: GanConfig,
    /// Generator network
    pub generator: Generator,
    /// Discriminator network
    pub discriminator: Discriminator,
    /// Training statistics
    pub stats: GanStats,
    g_optimizer: Adam,
    d_optimizer: Adam,
    loss: BinaryCrossEntropy,
    rng: StdRng,
}

impl Gan {
    /// Create a new GAN
    pub fn new(config: GanConfig) -> Result<Self> {
        let generator = Generator::new(config.generator.clone())?;
        let discriminator = Discriminator::new(config.discriminator.clone())?;
        Self::assemble(config, generator, discriminator, StdRng::from_os_rng())
    }

    /// Create a new GAN with a seed for reproducibility
    pub fn with_seed(config: GanConfig, seed: u64) -> Result<Self> {
        let generator = Generator::with_seed(config.generator.clone(), seed)?;
        let discriminator = Discriminator::with_seed(config.discriminator.clone(), seed.wrapping_add(1))?;
        Self::assemble(config, generator, discriminator, StdRng::seed_from_u64(seed))
    }

    fn assemble(
        config: GanConfig,
        generator: Generator,
        discriminator: Discriminator,
        rng: StdRng,
    ) -> Result<Self> {
        if config.generator.image_size != config.discriminator.image_size {
            return Err(Error::ConfigError(format!(
                "generator produces {0}×{0} images but the discriminator expects {1}×{1}",
                config.generator.image_size, config.discriminator.image_size
            )));
        }
        let adam = || Adam::new(config.learning_rate, config.beta1, config.beta2, config.epsilon);
        let (g_optimizer, d_optimizer) = (adam(), adam());
        Ok(Self {
            config,
            generator,
            discriminator,
            stats: GanStats::default(),
            g_optimizer,
            d_optimizer,
            loss: BinaryCrossEntropy::default(),
            rng,
        })
    }

    /// One discriminator update followed by one generator update
    ///
    /// Both halves use the real batch size. A non-finite loss aborts with
    /// [`Error::NonFiniteLoss`].
    pub fn train_step(&mut self, real: &Array4<f32>) -> Result<StepResult> {
        let step = self.stats.steps;
        let d = discriminator_step(
            &mut self.generator,
            &mut self.discriminator,
            &mut self.d_optimizer,
            &self.loss,
            real,
            self.config.label_noise,
            &mut self.rng,
        )?;
        if !d.loss.is_finite() {
            return Err(Error::NonFiniteLoss { phase: "discriminator", step, value: d.loss });
        }

        let g_loss = generator_step(
            &mut self.generator,
            &mut self.discriminator,
            &mut self.g_optimizer,
            &self.loss,
            real.dim().0,
            &mut self.rng,
        )?;
        if !g_loss.is_finite() {
            return Err(Error::NonFiniteLoss { phase: "generator", step, value: g_loss });
        }

        let result =
            StepResult { d_loss: d.loss, g_loss, d_real_score: d.real_score, d_fake_score: d.fake_score };
        self.record_step(&result);
        Ok(result)
    }

    /// Sample latent vectors of shape (n, latent_dim, 1)
    pub fn sample_latent(&mut self, n: usize) -> Array3<f32> {
        sample_latent(&mut self.rng, n, self.config.generator.latent_dim)
    }

    /// Generate `n` images in inference mode
    pub fn generate(&mut self, n: usize) -> Result<Array4<f32>> {
        let z = self.sample_latent(n);
        self.generate_from(&z)
    }

    /// Generate images from the given latents in inference mode
    pub fn generate_from(&mut self, latent: &Array3<f32>) -> Result<Array4<f32>> {
        self.generator
            .forward(latent.clone().into_dyn(), Context::inference())?
            .into_dimensionality::<Ix4>()
            .map_err(|e| Error::invalid_input("generator", e.to_string()))
    }

    /// Discriminator scores for a batch of images, in inference mode
    pub fn discriminate(&mut self, images: &Array4<f32>) -> Result<Array1<f32>> {
        let scores = self
            .discriminator
            .forward(images.clone().into_dyn(), Context::inference())?
            .into_dimensionality::<Ix2>()
            .map_err(|e| Error::invalid_input("discriminator", e.to_string()))?;
        Ok(scores.column(0).to_owned())
    }

    /// Get total number of parameters
    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.generator.num_parameters() + self.discriminator.num_parameters()
    }

    /// Generator and discriminator learning rate
    pub fn learning_rate(&self) -> f32 {
        self.config.learning_rate
    }

    /// Record training step
    pub fn record_step(&mut self, result: &StepResult) {
        self.stats.steps += 1;

        if self.stats.g_losses.len() >= HISTORY_WINDOW {
            self.stats.g_losses.pop_front();
        }
        self.stats.g_losses.push_back(result.g_loss);

        if self.stats.d_losses.len() >= HISTORY_WINDOW {
            self.stats.d_losses.pop_front();
        }
        self.stats.d_losses.push_back(result.d_loss);
    }

    /// Get average generator loss over recent history
    #[must_use]
    pub fn avg_g_loss(&self) -> f32 {
        if self.stats.g_losses.is_empty() {
            return 0.0;
        }
        self.stats.g_losses.iter().sum::<f32>() / self.stats.g_losses.len() as f32
    }

    /// Get average discriminator loss over recent history
    #[must_use]
    pub fn avg_d_loss(&self) -> f32 {
        if self.stats.d_losses.is_empty() {
            return 0.0;
        }
        self.stats.d_losses.iter().sum::<f32>() / self.stats.d_losses.len() as f32
    }
}

impl std::fmt::Debug for Gan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gan")
            .field("config", &self.config)
            .field("generator", &self.generator)
            .field("discriminator", &self.discriminator)
            .field("steps", &self.stats.steps)
            .finish_non_exhaustive()
    }
}
