//! Execution context and trainable parameters
//!
//! Layers in [`crate::nn`] record what they need for the backward pass
//! while running forward under a recording [`Context`], and accumulate
//! gradients into their [`Param`]s when `backward` is called.
//!
//! ```
//! use artgan::autograd::Context;
//!
//! let ctx = Context::train();
//! assert!(ctx.is_training());
//! assert!(ctx.records());
//!
//! let ctx = Context::inference();
//! assert!(!ctx.records());
//! ```

mod context;
mod param;

pub use context::Context;
pub use param::Param;
