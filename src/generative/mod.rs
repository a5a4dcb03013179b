//! Generative adversarial networks for image synthesis
//!
//! A deep-convolutional GAN: the generator upsamples latent vectors to
//! 64×64 RGB images in [-1, 1]; the discriminator scores images with a
//! probability. Training alternates one discriminator update with one
//! generator update per batch.

pub mod gan;

pub use gan::{
    Discriminator, DiscriminatorConfig, Gan, GanConfig, GanStats, Generator, GeneratorConfig,
    OutputActivation, StepResult,
};
