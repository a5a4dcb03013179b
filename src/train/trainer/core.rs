//! Core GanTrainer struct and basic methods

use std::time::Instant;

use super::result::LossHistory;
use crate::generative::Gan;
use crate::train::callback::{CallbackContext, CallbackManager, TrainerCallback};

/// Drives a [`Gan`] over a [`BatchLoader`](crate::data::BatchLoader) for a
/// number of epochs, dispatching callback events
pub struct GanTrainer {
    pub(crate) gan: Gan,
    pub(crate) callbacks: CallbackManager,
    pub(crate) history: LossHistory,
    pub(crate) start_time: Option<Instant>,
}

impl GanTrainer {
    pub fn new(gan: Gan) -> Self {
        Self { gan, callbacks: CallbackManager::new(), history: LossHistory::default(), start_time: None }
    }

    /// Add a callback to the trainer
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    pub fn gan(&self) -> &Gan {
        &self.gan
    }

    pub fn gan_mut(&mut self) -> &mut Gan {
        &mut self.gan
    }

    pub fn into_gan(self) -> Gan {
        self.gan
    }

    pub fn callbacks(&self) -> &CallbackManager {
        &self.callbacks
    }

    /// History of the most recent run
    pub fn history(&self) -> &LossHistory {
        &self.history
    }

    pub(crate) fn elapsed_secs(&self) -> f64 {
        self.start_time.map_or(0.0, |t| t.elapsed().as_secs_f64())
    }

    /// Build callback context from current state
    pub(crate) fn build_context(
        &self,
        epoch: usize,
        max_epochs: usize,
        step: usize,
        steps_per_epoch: usize,
    ) -> CallbackContext {
        CallbackContext {
            epoch,
            max_epochs,
            step,
            steps_per_epoch,
            global_step: self.gan.stats.steps,
            lr: self.gan.learning_rate(),
            elapsed_secs: self.elapsed_secs(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for GanTrainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GanTrainer")
            .field("gan", &self.gan)
            .field("callbacks", &self.callbacks)
            .field("epochs", &self.history.len())
            .finish()
    }
}
