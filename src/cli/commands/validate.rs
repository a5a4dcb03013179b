//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, GanSpec, ValidateArgs};

/// Format the resolved configuration as indented lines
pub fn format_spec(spec: &GanSpec) -> String {
    let lines = [
        format!("  Data: {} ({size}×{size})", spec.data.dir.display(), size = spec.data.image_size),
        format!("  Batch size: {}", spec.data.batch_size),
        format!("  Latent dim: {}", spec.model.latent_dim),
        format!(
            "  Channels: generator {}, discriminator {}",
            spec.model.generator_channels, spec.model.discriminator_channels
        ),
        format!("  Learning rate: {}", spec.optimizer.lr),
        format!("  Epochs: {}", spec.training.epochs),
        format!("  Label noise: {}", spec.training.label_noise),
        format!("  Output dir: {}", spec.training.output_dir.display()),
        format!("  Samples: every {} epochs, {} images", spec.sampling.every, spec.sampling.num_images),
    ];
    lines.join("\n")
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, &format!("Validating config: {}", args.config.display()));

    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    if !spec.data.dir.is_dir() {
        return Err(format!("Data directory does not exist: {}", spec.data.dir.display()));
    }

    log(level, LogLevel::Normal, "✓ Configuration is valid");
    if args.detailed {
        log(level, LogLevel::Normal, &format_spec(&spec));
    }
    Ok(())
}
