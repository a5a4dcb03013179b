//! Validation error types

/// Validation error type; each variant names the offending field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("data.dir must not be empty")]
    EmptyDataDir,

    #[error("Invalid data.image_size: {0} (must be a power of two >= 8)")]
    InvalidImageSize(usize),

    #[error("Invalid data.batch_size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid data.prefetch: {0} (must be > 0)")]
    InvalidPrefetch(usize),

    #[error("Invalid model.latent_dim: {0} (must be > 0)")]
    InvalidLatentDim(usize),

    #[error("Invalid model.generator_channels: {channels} (must be a positive multiple of {multiple})")]
    InvalidGeneratorChannels { channels: usize, multiple: usize },

    #[error("Invalid model.discriminator_channels: {0} (must be > 0)")]
    InvalidDiscriminatorChannels(usize),

    #[error("Invalid model.dropout: {0} (must be in [0.0, 1.0))")]
    InvalidDropout(f32),

    #[error("Invalid model.leaky_slope: {0} (must be in [0.0, 1.0))")]
    InvalidLeakySlope(f32),

    #[error("Invalid optimizer.lr: {0} (must be > 0.0 and <= 1.0)")]
    InvalidLearningRate(f32),

    #[error("Invalid optimizer.{name}: {value} (must be in [0.0, 1.0))")]
    InvalidBeta { name: &'static str, value: f32 },

    #[error("Invalid optimizer.epsilon: {0} (must be > 0.0)")]
    InvalidEpsilon(f32),

    #[error("Invalid training.epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid training.label_noise: {0} (must be in [0.0, 0.5))")]
    InvalidLabelNoise(f32),

    #[error("Invalid training.threads: {0} (must be > 0)")]
    InvalidThreads(usize),
}
