//! Progress callback for printing training progress

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::error::Result;
use crate::generative::Gan;

/// Prints epoch and step progress to stdout
#[derive(Clone, Debug)]
pub struct ProgressCallback {
    /// Print every N steps
    log_interval: usize,
}

impl ProgressCallback {
    /// Create progress callback
    pub fn new(log_interval: usize) -> Self {
        Self { log_interval }
    }
}

impl Default for ProgressCallback {
    fn default() -> Self {
        Self { log_interval: 10 }
    }
}

impl TrainerCallback for ProgressCallback {
    fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        println!("Epoch {}/{} starting (lr: {:.2e})", ctx.epoch + 1, ctx.max_epochs, ctx.lr);
        CallbackAction::Continue
    }

    fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        let step = ctx.step + 1;
        if self.log_interval > 0 && step % self.log_interval == 0 {
            println!(
                "  Step {}/{}: d_loss: {:.4}, g_loss: {:.4}, D(x): {:.3}, D(G(z)): {:.3}",
                step, ctx.steps_per_epoch, ctx.d_loss, ctx.g_loss, ctx.d_real_score, ctx.d_fake_score
            );
        }
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext, _gan: &mut Gan) -> Result<CallbackAction> {
        println!(
            "Epoch {}/{}: d_loss: {:.4}, g_loss: {:.4} ({:.1}s)",
            ctx.epoch + 1,
            ctx.max_epochs,
            ctx.d_loss,
            ctx.g_loss,
            ctx.elapsed_secs
        );
        Ok(CallbackAction::Continue)
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}
