//! GAN training: loss, callbacks, the epoch loop and the run session

pub mod callback;
pub mod loss;
mod session;
mod trainer;

pub use callback::{
    CallbackAction, CallbackContext, CallbackManager, ImageMonitor, ProgressCallback, TrainerCallback,
};
pub use loss::{BinaryCrossEntropy, LossFn};
pub use session::Session;
pub use trainer::{EpochRecord, GanTrainer, LossHistory, TrainResult};
