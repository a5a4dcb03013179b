//! Binary cross-entropy on probabilities
//!
//! # Formula
//!
//! ```text
//! p_i = clip(p_i, ε, 1 - ε)
//! L = -mean(t_i · ln p_i + (1 - t_i) · ln(1 - p_i))
//! ```
//!
//! Gradient: `∂L/∂p_i = (p_i - t_i) / (p_i (1 - p_i) N)` inside the clip
//! range, zero where the clip is active.

use ndarray::{ArrayD, Zip};

use super::LossFn;
use crate::error::{Error, Result};

/// Binary cross-entropy for sigmoid outputs
///
/// Targets may be soft (noisy labels), any value in [0, 1].
///
/// # Example
///
/// ```
/// use artgan::train::{BinaryCrossEntropy, LossFn};
/// use ndarray::arr1;
///
/// let bce = BinaryCrossEntropy::default();
/// let p = arr1(&[0.9_f32, 0.1]).into_dyn();
/// let t = arr1(&[1.0_f32, 0.0]).into_dyn();
/// let loss = bce.forward(&p, &t).unwrap();
/// assert!((loss - 0.10536).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BinaryCrossEntropy {
    epsilon: f32,
}

impl Default for BinaryCrossEntropy {
    fn default() -> Self {
        Self { epsilon: 1e-7 }
    }
}

impl BinaryCrossEntropy {
    fn check(predictions: &ArrayD<f32>, targets: &ArrayD<f32>) -> Result<()> {
        if predictions.shape() != targets.shape() || predictions.is_empty() {
            return Err(Error::invalid_input(
                "binary_cross_entropy",
                format!(
                    "predictions {:?} and targets {:?} must have the same non-empty shape",
                    predictions.shape(),
                    targets.shape()
                ),
            ));
        }
        Ok(())
    }
}

impl LossFn for BinaryCrossEntropy {
    fn forward(&self, predictions: &ArrayD<f32>, targets: &ArrayD<f32>) -> Result<f32> {
        Self::check(predictions, targets)?;
        let eps = self.epsilon;
        let total = Zip::from(predictions).and(targets).fold(0.0_f64, |acc, &p, &t| {
            let p = p.clamp(eps, 1.0 - eps);
            acc - f64::from(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        });
        Ok((total / predictions.len() as f64) as f32)
    }

    fn backward(&self, predictions: &ArrayD<f32>, targets: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        Self::check(predictions, targets)?;
        let eps = self.epsilon;
        let n = predictions.len() as f32;
        Ok(Zip::from(predictions).and(targets).map_collect(|&p, &t| {
            if p < eps || p > 1.0 - eps {
                0.0
            } else {
                (p - t) / (p * (1.0 - p) * n)
            }
        }))
    }

    fn name(&self) -> &str {
        "BinaryCrossEntropy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;
    use proptest::prelude::*;

    #[test]
    fn test_bce_known_value() {
        let bce = BinaryCrossEntropy::default();
        let p = arr1(&[0.5, 0.5]).into_dyn();
        let t = arr1(&[1.0, 0.0]).into_dyn();
        assert_abs_diff_eq!(bce.forward(&p, &t).unwrap(), std::f32::consts::LN_2, epsilon = 1e-6);
    }

    #[test]
    fn test_bce_clips_saturated_predictions() {
        let bce = BinaryCrossEntropy::default();
        let p = arr1(&[0.0, 1.0]).into_dyn();
        let t = arr1(&[1.0, 0.0]).into_dyn();
        let loss = bce.forward(&p, &t).unwrap();
        assert!(loss.is_finite());
        // 1 - 1e-7 rounds in f32, so the upper clip sits slightly below it
        let hi = 1.0_f32 - 1e-7;
        let expected = (-(1e-7_f32).ln() - (1.0 - hi).ln()) / 2.0;
        assert_abs_diff_eq!(loss, expected, epsilon = 1e-3);
        assert!(bce.backward(&p, &t).unwrap().iter().all(|g| *g == 0.0));
    }

    #[test]
    fn test_bce_gradient_matches_finite_difference() {
        let bce = BinaryCrossEntropy::default();
        let p = arr1(&[0.3, 0.8, 0.55]).into_dyn();
        let t = arr1(&[0.1, 0.95, 0.0]).into_dyn();
        let g = bce.backward(&p, &t).unwrap();

        let h = 1e-3;
        for i in 0..3 {
            let mut pp = p.clone();
            pp[[i]] += h;
            let mut pm = p.clone();
            pm[[i]] -= h;
            let numeric = (bce.forward(&pp, &t).unwrap() - bce.forward(&pm, &t).unwrap()) / (2.0 * h);
            assert_abs_diff_eq!(g[[i]], numeric, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_bce_rejects_shape_mismatch() {
        let bce = BinaryCrossEntropy::default();
        let p = arr1(&[0.5, 0.5]).into_dyn();
        let t = arr1(&[1.0]).into_dyn();
        assert!(bce.forward(&p, &t).is_err());
        assert_eq!(bce.name(), "BinaryCrossEntropy");
    }

    proptest! {
        #[test]
        fn test_bce_non_negative_and_finite(
            p in prop::collection::vec(0.0f32..=1.0, 1..32),
            t in 0.0f32..=1.0,
        ) {
            let bce = BinaryCrossEntropy::default();
            let targets = ArrayD::from_elem(ndarray::IxDyn(&[p.len()]), t);
            let loss = bce.forward(&arr1(&p).into_dyn(), &targets).unwrap();
            prop_assert!(loss.is_finite());
            prop_assert!(loss >= -1e-6);
        }
    }
}
