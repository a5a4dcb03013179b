//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::GanSpec;

/// Validate a training specification
///
/// Checks numeric ranges and that the architecture can be planned for the
/// image size. Does not touch the filesystem.
pub fn validate_config(spec: &GanSpec) -> Result<(), ValidationError> {
    if spec.data.dir.as_os_str().is_empty() {
        return Err(ValidationError::EmptyDataDir);
    }

    let size = spec.data.image_size;
    if size < 8 || !size.is_power_of_two() {
        return Err(ValidationError::InvalidImageSize(size));
    }
    if spec.data.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(0));
    }
    if spec.data.prefetch == 0 {
        return Err(ValidationError::InvalidPrefetch(0));
    }

    let model = &spec.model;
    if model.latent_dim == 0 {
        return Err(ValidationError::InvalidLatentDim(0));
    }
    // Upsampling stages from 4×4; every stage but the last halves the channels
    let stages = (size / 4).trailing_zeros() as usize;
    let multiple = 1usize << (stages - 1);
    if model.generator_channels == 0 || model.generator_channels % multiple != 0 {
        return Err(ValidationError::InvalidGeneratorChannels { channels: model.generator_channels, multiple });
    }
    if model.discriminator_channels == 0 {
        return Err(ValidationError::InvalidDiscriminatorChannels(0));
    }
    if !(0.0..1.0).contains(&model.dropout) {
        return Err(ValidationError::InvalidDropout(model.dropout));
    }
    if !(0.0..1.0).contains(&model.leaky_slope) {
        return Err(ValidationError::InvalidLeakySlope(model.leaky_slope));
    }

    let optim = &spec.optimizer;
    if optim.lr.is_nan() || optim.lr <= 0.0 || optim.lr > 1.0 {
        return Err(ValidationError::InvalidLearningRate(optim.lr));
    }
    for (name, value) in [("beta1", optim.beta1), ("beta2", optim.beta2)] {
        if !(0.0..1.0).contains(&value) {
            return Err(ValidationError::InvalidBeta { name, value });
        }
    }
    if optim.epsilon.is_nan() || optim.epsilon <= 0.0 {
        return Err(ValidationError::InvalidEpsilon(optim.epsilon));
    }

    let training = &spec.training;
    if training.epochs == 0 {
        return Err(ValidationError::InvalidEpochs(0));
    }
    if !(0.0..0.5).contains(&training.label_noise) {
        return Err(ValidationError::InvalidLabelNoise(training.label_noise));
    }
    if training.threads == Some(0) {
        return Err(ValidationError::InvalidThreads(0));
    }

    Ok(())
}
