//! Core traits and types for the callback system
//!
//! - `CallbackContext` - State passed to callbacks
//! - `CallbackAction` - Actions a callback can request
//! - `TrainerCallback` - The trait all callbacks implement

use crate::error::Result;
use crate::generative::Gan;

/// Context passed to callbacks with current training state
#[derive(Clone, Debug, Default)]
pub struct CallbackContext {
    /// Current epoch (0-indexed)
    pub epoch: usize,
    /// Total epochs planned
    pub max_epochs: usize,
    /// Current step within epoch
    pub step: usize,
    /// Total steps in epoch
    pub steps_per_epoch: usize,
    /// Global step count
    pub global_step: usize,
    /// Discriminator loss (last step, or epoch mean at epoch end)
    pub d_loss: f32,
    /// Generator loss (last step, or epoch mean at epoch end)
    pub g_loss: f32,
    /// Mean discriminator output on real images
    pub d_real_score: f32,
    /// Mean discriminator output on generated images
    pub d_fake_score: f32,
    /// Current learning rate
    pub lr: f32,
    /// Training duration in seconds
    pub elapsed_secs: f64,
}

impl CallbackContext {
    /// Epochs finished when this context was built at epoch end
    pub fn completed_epochs(&self) -> usize {
        self.epoch + 1
    }
}

/// Action to take after a callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    /// Continue training normally
    Continue,
    /// Stop training
    Stop,
}

/// Trait for training callbacks
///
/// All methods have default no-op implementations. Epoch-end and train-end
/// hooks receive the model and may fail; an error aborts the run.
pub trait TrainerCallback: Send {
    /// Called before training starts
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called before each epoch
    fn on_epoch_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after each training step
    fn on_step_end(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        CallbackAction::Continue
    }

    /// Called after each epoch
    fn on_epoch_end(&mut self, _ctx: &CallbackContext, _gan: &mut Gan) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Called after training ends, including early stops
    fn on_train_end(&mut self, _ctx: &CallbackContext, _gan: &mut Gan) -> Result<()> {
        Ok(())
    }

    /// Get callback name for logging
    fn name(&self) -> &'static str {
        "TrainerCallback"
    }
}
