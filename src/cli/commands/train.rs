//! Train command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_config, validate_config, GanSpec, TrainArgs};
use crate::data::ImageFolder;
use crate::train::{ProgressCallback, Session};

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, &format!("artgan: Training from {}", args.config.display()));

    let mut spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    apply_overrides(&mut spec, &args);
    validate_config(&spec).map_err(|e| format!("Config error: {e}"))?;

    if args.dry_run {
        let folder = ImageFolder::open(&spec.data.dir, spec.data.image_size)
            .map_err(|e| format!("Dataset error: {e}"))?;
        log(level, LogLevel::Normal, "Dry run - config and dataset validated successfully");
        log(level, LogLevel::Normal, &format!("  Images: {}", folder.len()));
        log_spec(&spec, level);
        return Ok(());
    }

    let mut session = Session::init(spec).map_err(|e| format!("Setup error: {e}"))?;
    if level != LogLevel::Quiet {
        session.add_callback(ProgressCallback::new(args.log_every));
    }
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  {} images, {} steps per epoch, {} parameters",
            session.loader().len(),
            session.loader().steps_per_epoch(),
            session.gan().num_parameters()
        ),
    );
    log_spec(session.spec(), level);

    let result = session.run().map_err(|e| format!("Training error: {e}"));
    session.teardown();
    let result = result?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Training complete: {} epochs, d_loss {:.4}, g_loss {:.4} ({:.1}s)",
            result.epochs_completed, result.final_d_loss, result.final_g_loss, result.elapsed_secs
        ),
    );
    Ok(())
}

fn log_spec(spec: &GanSpec, level: LogLevel) {
    log(level, LogLevel::Verbose, &format!("  Data: {}", spec.data.dir.display()));
    log(level, LogLevel::Verbose, &format!("  Image size: {}", spec.data.image_size));
    log(level, LogLevel::Verbose, &format!("  Batch size: {}", spec.data.batch_size));
    log(level, LogLevel::Verbose, &format!("  Epochs: {}", spec.training.epochs));
    log(
        level,
        LogLevel::Verbose,
        &format!("  Adam: lr={} beta1={} beta2={}", spec.optimizer.lr, spec.optimizer.beta1, spec.optimizer.beta2),
    );
    log(level, LogLevel::Verbose, &format!("  Samples: {}", spec.sample_dir().display()));
}
