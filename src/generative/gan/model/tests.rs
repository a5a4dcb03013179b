//! Tests for the GAN.

use super::*;
use crate::error::Error;
use crate::generative::gan::config::{DiscriminatorConfig, GanConfig, GeneratorConfig};
use ndarray::Array4;

/// Small 16×16 config to keep the networks cheap
fn small_test_config() -> GanConfig {
    GanConfig {
        generator: GeneratorConfig { latent_dim: 8, channels: 8, image_size: 16, ..Default::default() },
        discriminator: DiscriminatorConfig { image_size: 16, channels: 4, ..Default::default() },
        ..Default::default()
    }
}

fn real_batch(n: usize) -> Array4<f32> {
    Array4::from_shape_fn((n, 16, 16, 3), |(b, y, x, c)| {
        (((b * 7 + y * 3 + x * 5 + c) % 13) as f32 / 6.0 - 1.0).clamp(-1.0, 1.0)
    })
}

#[test]
fn test_gan_creation() {
    let gan = Gan::with_seed(small_test_config(), 42).unwrap();
    assert!(gan.num_parameters() > 0);
    assert_eq!(gan.stats.steps, 0);
    assert_eq!(gan.avg_g_loss(), 0.0);
}

#[test]
fn test_gan_rejects_mismatched_image_sizes() {
    let mut config = small_test_config();
    config.discriminator.image_size = 32;
    assert!(matches!(Gan::with_seed(config, 0), Err(Error::ConfigError(_))));
}

#[test]
fn test_gan_sample_latent() {
    let mut gan = Gan::with_seed(small_test_config(), 42).unwrap();
    let z = gan.sample_latent(10);
    assert_eq!(z.shape(), &[10, 8, 1]);
}

#[test]
fn test_gan_generate_in_range() {
    let mut gan = Gan::with_seed(small_test_config(), 42).unwrap();
    let images = gan.generate(3).unwrap();
    assert_eq!(images.shape(), &[3, 16, 16, 3]);
    assert!(images.iter().all(|v| (-1.0..=1.0).contains(v)));
}

#[test]
fn test_gan_generate_from_is_deterministic() {
    let mut gan = Gan::with_seed(small_test_config(), 42).unwrap();
    let z = gan.sample_latent(2);
    assert_eq!(gan.generate_from(&z).unwrap(), gan.generate_from(&z).unwrap());
}

#[test]
fn test_gan_discriminate() {
    let mut gan = Gan::with_seed(small_test_config(), 42).unwrap();
    let scores = gan.discriminate(&real_batch(5)).unwrap();
    assert_eq!(scores.len(), 5);
    assert!(scores.iter().all(|p| (0.0..=1.0).contains(p)));
}

#[test]
fn test_gan_train_step_finite_losses() {
    let mut gan = Gan::with_seed(small_test_config(), 7).unwrap();
    for _ in 0..3 {
        let result = gan.train_step(&real_batch(4)).unwrap();
        assert!(result.d_loss.is_finite());
        assert!(result.g_loss.is_finite());
        assert!((0.0..=1.0).contains(&result.d_real_score));
        assert!((0.0..=1.0).contains(&result.d_fake_score));
    }
    assert_eq!(gan.stats.steps, 3);
    assert_eq!(gan.stats.d_losses.len(), 3);
    assert!(gan.avg_d_loss() > 0.0);
}

#[test]
fn test_gan_train_step_handles_partial_batch() {
    let mut gan = Gan::with_seed(small_test_config(), 7).unwrap();
    assert!(gan.train_step(&real_batch(1)).is_ok());
}

#[test]
fn test_gan_seeded_runs_match() {
    let mut a = Gan::with_seed(small_test_config(), 11).unwrap();
    let mut b = Gan::with_seed(small_test_config(), 11).unwrap();
    let za = a.sample_latent(2);
    let zb = b.sample_latent(2);
    assert_eq!(za, zb);
}

#[test]
fn test_record_step_window() {
    let mut gan = Gan::with_seed(small_test_config(), 0).unwrap();
    let result = StepResult { d_loss: 1.0, g_loss: 2.0, d_real_score: 0.5, d_fake_score: 0.5 };
    for _ in 0..150 {
        gan.record_step(&result);
    }
    assert_eq!(gan.stats.steps, 150);
    assert_eq!(gan.stats.g_losses.len(), 100);
    assert!((gan.avg_g_loss() - 2.0).abs() < 1e-6);
    assert!((gan.avg_d_loss() - 1.0).abs() < 1e-6);
}
