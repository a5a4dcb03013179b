//! GAN main struct and training logic.

mod gan;
mod stats;
mod step_result;

#[cfg(test)]
mod tests;

pub use gan::Gan;
pub use stats::GanStats;
pub use step_result::StepResult;
