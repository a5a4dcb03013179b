//! Main entry points for YAML-based training

use std::fs;
use std::path::Path;

use crate::config::schema::GanSpec;
use crate::config::validate::validate_config;
use crate::error::{Error, Result};
use crate::train::{Session, TrainResult};

/// Read, parse and validate a YAML manifest
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<GanSpec> {
    let path = config_path.as_ref();
    let yaml_content = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file {}: {e}", path.display())))?;
    let spec = parse_config(&yaml_content)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(spec)
}

/// Parse and validate a YAML manifest held in memory
pub fn parse_config(yaml: &str) -> Result<GanSpec> {
    let spec: GanSpec = serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;
    validate_config(&spec)?;
    Ok(spec)
}

/// Train a GAN from a YAML configuration file
///
/// Loads and validates the manifest, opens a [`Session`], trains, writes
/// samples and `history.json`, then tears the session down.
///
/// # Example
///
/// ```no_run
/// use artgan::config::train_from_yaml;
///
/// let result = train_from_yaml("config.yaml")?;
/// println!("final d_loss {:.4}", result.final_d_loss);
/// # Ok::<(), artgan::Error>(())
/// ```
pub fn train_from_yaml<P: AsRef<Path>>(config_path: P) -> Result<TrainResult> {
    let spec = load_config(config_path)?;
    train_from_spec(spec)
}

/// Train a GAN from an already loaded specification
pub fn train_from_spec(spec: GanSpec) -> Result<TrainResult> {
    let mut session = Session::init(spec)?;
    let result = session.run();
    session.teardown();
    result
}
