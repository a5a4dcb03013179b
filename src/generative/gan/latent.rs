//! Latent vector sampling.

use ndarray::Array3;
use rand::Rng;

/// One draw from N(0, 1) using the Box-Muller transform
pub fn standard_normal<R: Rng>(rng: &mut R) -> f32 {
    let u1: f64 = rng.random::<f64>().max(1e-10);
    let u2: f64 = rng.random::<f64>();
    ((-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()) as f32
}

/// Sample a latent batch of shape (n, dim, 1) from N(0, I)
pub fn sample_latent<R: Rng>(rng: &mut R, n: usize, dim: usize) -> Array3<f32> {
    Array3::from_shape_simple_fn((n, dim, 1), || standard_normal(rng))
}
