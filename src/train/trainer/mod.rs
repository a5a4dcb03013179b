//! GAN training orchestration
//!
//! [`GanTrainer`] runs epochs over a batch loader, one adversarial step per
//! batch, and fires callback events around every step and epoch.

mod core;
mod result;
mod train_loop;


pub use core::GanTrainer;
pub use result::{EpochRecord, LossHistory, TrainResult};
