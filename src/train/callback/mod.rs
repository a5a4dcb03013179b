//! Callback system for training events
//!
//! Provides hooks for training loop events:
//! - `on_train_begin` / `on_train_end`
//! - `on_epoch_begin` / `on_epoch_end`
//! - `on_step_end`
//!
//! # Example
//!
//! ```rust
//! use artgan::train::callback::{CallbackAction, CallbackContext, TrainerCallback};
//!
//! struct StopAfter(usize);
//!
//! impl TrainerCallback for StopAfter {
//!     fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
//!         if ctx.epoch >= self.0 { CallbackAction::Stop } else { CallbackAction::Continue }
//!     }
//! }
//! ```

mod image_monitor;
mod manager;
mod progress;
mod traits;

pub use image_monitor::{ImageMonitor, FINAL_GRID_FILE};
pub use manager::CallbackManager;
pub use progress::ProgressCallback;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
