//! Init command types

use std::path::PathBuf;

use clap::Parser;

/// Arguments for the init command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InitArgs {
    /// Output path (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Image directory written into the manifest
    #[arg(long, default_value = "./data")]
    pub data: PathBuf,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}
