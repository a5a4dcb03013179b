//! Weight initialization

use ndarray::{ArrayD, IxDyn};
use rand::Rng;

/// Glorot (Xavier) uniform initialization
///
/// Samples from U(-limit, limit) with `limit = sqrt(6 / (fan_in + fan_out))`.
pub fn glorot_uniform<R: Rng>(
    rng: &mut R,
    shape: &[usize],
    fan_in: usize,
    fan_out: usize,
) -> ArrayD<f32> {
    let limit = (6.0 / (fan_in + fan_out).max(1) as f64).sqrt() as f32;
    ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.random_range(-limit..limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_glorot_shape() {
        let mut rng = StdRng::seed_from_u64(0);
        let w = glorot_uniform(&mut rng, &[4, 3], 4, 3);
        assert_eq!(w.shape(), &[4, 3]);
    }

    #[test]
    fn test_glorot_deterministic_with_seed() {
        let a = glorot_uniform(&mut StdRng::seed_from_u64(7), &[10], 5, 5);
        let b = glorot_uniform(&mut StdRng::seed_from_u64(7), &[10], 5, 5);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn test_glorot_within_limit(fan_in in 1usize..64, fan_out in 1usize..64, seed in 0u64..1000) {
            let mut rng = StdRng::seed_from_u64(seed);
            let w = glorot_uniform(&mut rng, &[fan_in, fan_out], fan_in, fan_out);
            let limit = (6.0 / (fan_in + fan_out) as f64).sqrt() as f32;
            prop_assert!(w.iter().all(|v| v.abs() <= limit));
        }
    }
}
