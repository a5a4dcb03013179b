//! Loss functions for training
//!
//! - [`BinaryCrossEntropy`] - BCE on probabilities, used by both GAN players

mod bce;
mod traits;

pub use bce::BinaryCrossEntropy;
pub use traits::LossFn;
