//! Init command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{GanSpec, InitArgs};

/// Default manifest text for an image directory
pub fn default_manifest(args: &InitArgs) -> Result<String, String> {
    let spec = GanSpec::new(&args.data);
    let yaml = serde_yaml::to_string(&spec).map_err(|e| format!("YAML serialization error: {e}"))?;
    Ok(format!("# artgan training manifest\n{yaml}"))
}

pub fn run_init(args: InitArgs, level: LogLevel) -> Result<(), String> {
    let manifest = default_manifest(&args)?;

    match &args.output {
        Some(path) => {
            if path.exists() && !args.force {
                return Err(format!("{} already exists (use --force to overwrite)", path.display()));
            }
            std::fs::write(path, manifest).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            log(level, LogLevel::Normal, &format!("Wrote manifest to {}", path.display()));
        }
        None => print!("{manifest}"),
    }
    Ok(())
}
