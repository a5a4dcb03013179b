//! # artgan
//!
//! Deep convolutional GAN training on folders of images.
//!
//! - [`nn`], [`autograd`], [`optim`]: a small NHWC layer library on
//!   `ndarray` with explicit forward/backward passes and Adam
//! - [`data`]: recursive image folder scanning, decoding to [-1, 1] and
//!   cached, prefetched batching
//! - [`generative`]: the generator, discriminator and adversarial step
//! - [`train`]: BCE loss, callbacks, the epoch loop and the run [`Session`](train::Session)
//! - [`io`]: writing generated images as PNG
//! - [`config`], [`cli`]: YAML manifests and the `artgan` command line
//!
//! # Example
//!
//! ```no_run
//! use artgan::config::GanSpec;
//! use artgan::train::{ProgressCallback, Session};
//!
//! let mut spec = GanSpec::new("./paintings");
//! spec.training.epochs = 10;
//!
//! let mut session = Session::init(spec)?;
//! session.add_callback(ProgressCallback::new(10));
//! let result = session.run()?;
//! println!("d_loss {:.4}, g_loss {:.4}", result.final_d_loss, result.final_g_loss);
//! # Ok::<(), artgan::Error>(())
//! ```

pub mod autograd;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod generative;
pub mod io;
pub mod nn;
pub mod optim;
pub mod train;

pub use error::{Error, Result};
