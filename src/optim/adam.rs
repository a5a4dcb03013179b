//! Adam optimizer

use ndarray::{ArrayD, Zip};

use super::Optimizer;
use crate::autograd::Param;

/// Adam with bias correction folded into the step size
///
/// m_t = β1 m + (1 - β1) g, v_t = β2 v + (1 - β2) g²,
/// θ_t = θ - lr · √(1 - β2^t) / (1 - β1^t) · m_t / (√v_t + ε)
///
/// Moment buffers are allocated the first time a parameter receives a gradient.
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
    m: Vec<Option<ArrayD<f32>>>,
    v: Vec<Option<ArrayD<f32>>>,
}

impl Adam {
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self { lr, beta1, beta2, epsilon, t: 0, m: Vec::new(), v: Vec::new() }
    }

    /// β1 = 0.9, β2 = 0.999, ε = 1e-7
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-7)
    }

    /// Number of steps taken
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.t
    }

    #[must_use]
    pub fn beta1(&self) -> f32 {
        self.beta1
    }

    #[must_use]
    pub fn beta2(&self) -> f32 {
        self.beta2
    }

    #[must_use]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [&mut Param]) {
        if self.m.len() < params.len() {
            self.m.resize(params.len(), None);
            self.v.resize(params.len(), None);
        }
        self.t += 1;

        let t = self.t as i32;
        let lr_t = self.lr * ((1.0 - self.beta2.powi(t)).sqrt() / (1.0 - self.beta1.powi(t)));
        let (beta1, beta2, eps) = (self.beta1, self.beta2, self.epsilon);

        for (i, param) in params.iter_mut().enumerate() {
            let (value, grad) = param.value_and_grad_mut();
            let Some(grad) = grad else { continue };
            let m = self.m[i].get_or_insert_with(|| ArrayD::zeros(grad.raw_dim()));
            let v = self.v[i].get_or_insert_with(|| ArrayD::zeros(grad.raw_dim()));

            Zip::from(value).and(grad).and(m).and(v).par_for_each(|w, &g, m, v| {
                *m = beta1 * *m + (1.0 - beta1) * g;
                *v = beta2 * *v + (1.0 - beta2) * g * g;
                *w -= lr_t * *m / (v.sqrt() + eps);
            });
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    fn param(values: &[f32]) -> Param {
        Param::new(arr1(values).into_dyn())
    }

    #[test]
    fn test_adam_first_step_moves_by_lr() {
        // After bias correction the first step is lr * sign(g) for |g| >> ε
        let mut opt = Adam::default_params(0.1);
        let mut p = param(&[1.0, -1.0]);
        p.accumulate_grad(&arr1(&[2.0, -0.5]).into_dyn());
        opt.step(&mut [&mut p]);
        assert_abs_diff_eq!(p.value()[[0]], 0.9, epsilon = 1e-4);
        assert_abs_diff_eq!(p.value()[[1]], -0.9, epsilon = 1e-4);
        assert_eq!(opt.step_count(), 1);
    }

    #[test]
    fn test_adam_skips_params_without_grad() {
        let mut opt = Adam::default_params(0.1);
        let mut a = param(&[1.0]);
        let mut b = param(&[1.0]);
        b.accumulate_grad(&arr1(&[1.0]).into_dyn());
        opt.step(&mut [&mut a, &mut b]);
        assert_eq!(a.value()[[0]], 1.0);
        assert!(b.value()[[0]] < 1.0);
    }

    #[test]
    fn test_adam_minimizes_quadratic() {
        // f(x) = (x - 3)², ∇f = 2(x - 3)
        let mut opt = Adam::default_params(0.1);
        let mut x = param(&[0.0]);
        for _ in 0..500 {
            let g = 2.0 * (x.value()[[0]] - 3.0);
            opt.zero_grad(&mut [&mut x]);
            x.accumulate_grad(&arr1(&[g]).into_dyn());
            opt.step(&mut [&mut x]);
        }
        assert_abs_diff_eq!(x.value()[[0]], 3.0, epsilon = 0.05);
    }

    #[test]
    fn test_adam_hyperparameters() {
        let opt = Adam::new(1e-4, 0.5, 0.9, 1e-8);
        assert_eq!((opt.beta1(), opt.beta2(), opt.epsilon()), (0.5, 0.9, 1e-8));
        assert_eq!(opt.lr(), 1e-4);
    }
}
