//! Optimizer trait

use crate::autograd::Param;

/// Trait for optimization algorithms
///
/// Parameters are borrowed from a model on every step, in the model's stable
/// parameter order; implementations may key per-parameter state by position.
pub trait Optimizer {
    /// Perform a single optimization step on the accumulated gradients
    fn step(&mut self, params: &mut [&mut Param]);

    /// Zero gradients on referenced parameters
    fn zero_grad(&mut self, params: &mut [&mut Param]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;
}
