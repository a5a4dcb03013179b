//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! artgan train gan.yaml
//! artgan train gan.yaml --epochs 20 --output-dir ./runs/a
//! artgan validate gan.yaml
//! artgan info gan.yaml --format json
//! artgan init --data ./images --output gan.yaml
//! ```

mod core;
mod init;
mod types;

pub use core::{apply_overrides, parse_args, Cli, Command, InfoArgs, TrainArgs, ValidateArgs};
pub use init::InitArgs;
pub use types::OutputFormat;
