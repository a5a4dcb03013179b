//! Statistics tracking for GAN training.

use std::collections::VecDeque;

/// Length of the recent-loss windows
pub(crate) const HISTORY_WINDOW: usize = 100;

/// Statistics from GAN training
#[derive(Debug, Clone)]
pub struct GanStats {
    /// Total training steps
    pub steps: usize,
    /// Generator losses (recent history)
    pub g_losses: VecDeque<f32>,
    /// Discriminator losses (recent history)
    pub d_losses: VecDeque<f32>,
}

impl Default for GanStats {
    fn default() -> Self {
        Self {
            steps: 0,
            g_losses: VecDeque::with_capacity(HISTORY_WINDOW),
            d_losses: VecDeque::with_capacity(HISTORY_WINDOW),
        }
    }
}
