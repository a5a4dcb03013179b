//! Deep convolutional GAN
//!
//! # Architecture
//!
//! ```text
//! Latent z ~ N(0, I) ─► Generator ─► fake images ─┬─► Discriminator ─► P(fake)
//!                                                 │
//!                         real images ────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use artgan::generative::{Gan, GanConfig, DiscriminatorConfig, GeneratorConfig};
//!
//! let config = GanConfig {
//!     generator: GeneratorConfig { latent_dim: 8, channels: 8, image_size: 16, ..Default::default() },
//!     discriminator: DiscriminatorConfig { image_size: 16, channels: 4, ..Default::default() },
//!     ..Default::default()
//! };
//! let mut gan = Gan::with_seed(config, 42).unwrap();
//! let images = gan.generate(2).unwrap();
//! assert_eq!(images.shape(), &[2, 16, 16, 3]);
//! ```

mod config;
mod discriminator;
mod generator;
mod latent;
mod model;
pub mod step;

pub use config::{DiscriminatorConfig, GanConfig, GeneratorConfig, OutputActivation};
pub use discriminator::Discriminator;
pub use generator::Generator;
pub use latent::{sample_latent, standard_normal};
pub use model::{Gan, GanStats, StepResult};
pub use step::{discriminator_step, generator_step, DiscriminatorOutcome};
