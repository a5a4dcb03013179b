//! Inverted dropout

use ndarray::{ArrayD, Zip};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Layer;
use crate::autograd::Context;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum Record {
    None,
    Identity,
    Mask(ArrayD<f32>),
}

/// Zeroes each activation with probability `rate` while training and scales
/// survivors by `1 / (1 - rate)`; identity otherwise
#[derive(Debug, Clone)]
pub struct Dropout {
    rate: f32,
    rng: StdRng,
    record: Record,
}

impl Dropout {
    /// # Panics
    ///
    /// Panics if `rate` is not in `[0, 1)`.
    pub fn new(rate: f32, seed: u64) -> Self {
        assert!((0.0..1.0).contains(&rate), "dropout rate must be in [0, 1)");
        Self { rate, rng: StdRng::seed_from_u64(seed), record: Record::None }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl Layer for Dropout {
    fn name(&self) -> &'static str {
        "dropout"
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        Ok(input.to_vec())
    }

    fn forward(&mut self, mut input: ArrayD<f32>, ctx: Context) -> Result<ArrayD<f32>> {
        if !ctx.is_training() || self.rate == 0.0 {
            self.record = if ctx.records() { Record::Identity } else { Record::None };
            return Ok(input);
        }

        let keep = 1.0 - self.rate;
        let rate = self.rate;
        let rng = &mut self.rng;
        let mask = input.mapv(|_| if rng.random::<f32>() < rate { 0.0 } else { 1.0 / keep });
        Zip::from(&mut input).and(&mask).for_each(|x, &m| *x *= m);
        self.record = if ctx.records() { Record::Mask(mask) } else { Record::None };
        Ok(input)
    }

    fn backward(&mut self, mut grad_output: ArrayD<f32>) -> Result<ArrayD<f32>> {
        match std::mem::replace(&mut self.record, Record::None) {
            Record::None => Err(Error::MissingForward("dropout")),
            Record::Identity => Ok(grad_output),
            Record::Mask(mask) => {
                Zip::from(&mut grad_output).and(&mask).for_each(|g, &m| *g *= m);
                Ok(grad_output)
            }
        }
    }
}
