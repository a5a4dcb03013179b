//! Declarative configuration: YAML manifest schema, validation, loading and
//! command-line parsing

pub mod cli;
mod schema;
mod train;
mod validate;

pub use cli::{apply_overrides, parse_args, Cli, Command, InfoArgs, InitArgs, OutputFormat, TrainArgs, ValidateArgs};
pub use schema::{DataSpec, GanSpec, ModelSpec, OptimSpec, SamplingSpec, TrainingParams, HISTORY_FILE};
pub use train::{load_config, parse_config, train_from_spec, train_from_yaml};
pub use validate::{validate_config, ValidationError};
