//! Result of one adversarial training step.

use serde::Serialize;

/// Losses and scores from one discriminator + generator update
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepResult {
    /// Discriminator loss on the stacked real and fake batch
    pub d_loss: f32,
    /// Generator loss
    pub g_loss: f32,
    /// Mean discriminator output on real images (target 0)
    pub d_real_score: f32,
    /// Mean discriminator output on generated images (target 1)
    pub d_fake_score: f32,
}
