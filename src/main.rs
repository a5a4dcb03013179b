//! artgan CLI
//!
//! # Usage
//!
//! ```bash
//! # Write a manifest, then train from it
//! artgan init --data ./paintings --output gan.yaml
//! artgan train gan.yaml
//!
//! # Train with overrides
//! artgan train gan.yaml --epochs 20 --lr 0.0002 --seed 7
//!
//! # Validate config, show the architecture
//! artgan validate gan.yaml
//! artgan info gan.yaml
//! ```

use std::process::ExitCode;

use artgan::cli::{init_tracing, run_command, Cli, LogLevel};
use clap::Parser;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
