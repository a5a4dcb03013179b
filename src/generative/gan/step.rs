//! One adversarial update, split into its two halves.
//!
//! Label convention (inverted, suspected defect): the discriminator is trained
//! to output **0 for real** and **1 for fake** images, and the generator is
//! trained towards 0. Standard DCGAN labelling is the reverse. The inversion
//! is kept unchanged from the Keras recipe these networks reproduce, so runs
//! stay comparable with it. Uniform noise pushes real labels up from 0 and
//! fake labels down from 1.

use ndarray::{concatenate, s, Array2, Array4, ArrayD, Axis, Ix2};
use rand::Rng;

use super::discriminator::Discriminator;
use super::generator::Generator;
use super::latent::sample_latent;
use crate::autograd::Context;
use crate::error::{Error, Result};
use crate::optim::{Adam, Optimizer};
use crate::train::{BinaryCrossEntropy, LossFn};

/// Target for real images
pub const REAL_LABEL: f32 = 0.0;
/// Target for generated images
pub const FAKE_LABEL: f32 = 1.0;

/// Outcome of a discriminator update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscriminatorOutcome {
    pub loss: f32,
    /// Mean discriminator output on the real half of the batch
    pub real_score: f32,
    /// Mean discriminator output on the generated half of the batch
    pub fake_score: f32,
}

/// Noisy discriminator targets: `n` real labels then `n` fake labels
pub fn noisy_labels<R: Rng>(rng: &mut R, n: usize, noise: f32) -> Array2<f32> {
    Array2::from_shape_fn((2 * n, 1), |(i, _)| {
        let u: f32 = rng.random();
        if i < n {
            REAL_LABEL + noise * u
        } else {
            FAKE_LABEL - noise * u
        }
    })
}

/// Update the discriminator on one batch of real images
///
/// A fake batch of the same size is generated without tracking gradients,
/// stacked after the real batch and scored in training mode. Only the
/// discriminator's parameters move.
pub fn discriminator_step<R: Rng>(
    generator: &mut Generator,
    discriminator: &mut Discriminator,
    optimizer: &mut Adam,
    loss: &BinaryCrossEntropy,
    real: &Array4<f32>,
    label_noise: f32,
    rng: &mut R,
) -> Result<DiscriminatorOutcome> {
    let n = real.dim().0;
    let z = sample_latent(rng, n, generator.latent_dim());
    let fake = generator.forward(z.into_dyn(), Context::inference())?;

    let batch = concatenate(Axis(0), &[real.view().into_dyn(), fake.view()])
        .map_err(|e| Error::invalid_input("discriminator_step", e.to_string()))?;
    let labels = noisy_labels(rng, n, label_noise).into_dyn();

    discriminator.zero_grad();
    let scores = discriminator.forward(batch, Context::train())?;
    let value = loss.forward(&scores, &labels)?;
    discriminator.backward(loss.backward(&scores, &labels)?)?;
    optimizer.step(&mut discriminator.params_mut());

    let scores = scores
        .into_dimensionality::<Ix2>()
        .map_err(|e| Error::invalid_input("discriminator_step", e.to_string()))?;
    Ok(DiscriminatorOutcome {
        loss: value,
        real_score: scores.slice(s![..n, ..]).mean().unwrap_or(f32::NAN),
        fake_score: scores.slice(s![n.., ..]).mean().unwrap_or(f32::NAN),
    })
}

/// Update the generator on `n` fresh latent vectors
///
/// The discriminator runs in inference mode but still records so that the
/// loss gradient can flow through it to the generated images; the parameter
/// gradients it accumulates on the way are discarded.
pub fn generator_step<R: Rng>(
    generator: &mut Generator,
    discriminator: &mut Discriminator,
    optimizer: &mut Adam,
    loss: &BinaryCrossEntropy,
    n: usize,
    rng: &mut R,
) -> Result<f32> {
    let z = sample_latent(rng, n, generator.latent_dim());

    generator.zero_grad();
    let fake = generator.forward(z.into_dyn(), Context::train())?;
    let scores = discriminator.forward(fake, Context::eval())?;
    let targets = ArrayD::from_elem(scores.raw_dim(), REAL_LABEL);
    let value = loss.forward(&scores, &targets)?;

    let grad_images = discriminator.backward(loss.backward(&scores, &targets)?)?;
    discriminator.zero_grad();
    generator.backward(grad_images)?;
    optimizer.step(&mut generator.params_mut());

    Ok(value)
}
