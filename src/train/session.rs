//! One training run and the process-wide resources it owns

use rayon::{ThreadPool, ThreadPoolBuilder};

use super::callback::{ImageMonitor, TrainerCallback};
use super::trainer::{GanTrainer, TrainResult};
use crate::config::{validate_config, GanSpec};
use crate::data::{BatchLoader, ImageFolder};
use crate::error::{Error, Result};
use crate::generative::Gan;

/// Owns the compute pool, dataset and model of a run
///
/// [`Session::init`] acquires everything up front and fails fast on a bad
/// manifest, a missing or empty dataset or an unplannable architecture.
/// [`Session::teardown`] releases the image cache and the thread pool; it
/// also runs on drop.
///
/// # Example
///
/// ```no_run
/// use artgan::config::GanSpec;
/// use artgan::train::Session;
///
/// let mut session = Session::init(GanSpec::new("./images")).unwrap();
/// let result = session.run().unwrap();
/// println!("{} epochs", result.epochs_completed);
/// session.teardown();
/// ```
pub struct Session {
    spec: GanSpec,
    pool: Option<ThreadPool>,
    loader: BatchLoader,
    trainer: GanTrainer,
}

impl Session {
    /// Validate `spec`, build the compute pool, open the dataset and build
    /// the networks with the sampling callback registered
    pub fn init(spec: GanSpec) -> Result<Self> {
        validate_config(&spec)?;

        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("artgan-compute-{i}"));
        if let Some(threads) = spec.training.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| Error::ConfigError(format!("cannot build compute pool: {e}")))?;

        let folder = ImageFolder::open(&spec.data.dir, spec.data.image_size)?;
        let loader = BatchLoader::new(folder, spec.loader_config())?;

        let config = spec.gan_config();
        let gan = pool.install(|| match spec.training.seed {
            Some(seed) => Gan::with_seed(config, seed),
            None => Gan::new(config),
        })?;
        tracing::info!(
            images = loader.len(),
            steps_per_epoch = loader.steps_per_epoch(),
            parameters = gan.num_parameters(),
            threads = pool.current_num_threads(),
            "session ready"
        );

        let mut trainer = GanTrainer::new(gan);
        trainer.add_callback(
            ImageMonitor::new(spec.sample_dir(), spec.sampling.every, spec.sampling.num_images)
                .with_grid(spec.sampling.grid),
        );

        Ok(Self { spec, pool: Some(pool), loader, trainer })
    }

    /// Register another callback; runs after the sampling callback
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.trainer.add_callback(callback);
    }

    pub fn spec(&self) -> &GanSpec {
        &self.spec
    }

    pub fn gan(&self) -> &Gan {
        self.trainer.gan()
    }

    pub fn gan_mut(&mut self) -> &mut Gan {
        self.trainer.gan_mut()
    }

    pub fn loader(&self) -> &BatchLoader {
        &self.loader
    }

    /// Whether [`Session::teardown`] has run
    pub fn is_closed(&self) -> bool {
        self.pool.is_none()
    }

    /// Train for the configured number of epochs inside the compute pool,
    /// then write `history.json` to the output directory
    pub fn run(&mut self) -> Result<TrainResult> {
        let pool = self.pool.as_ref().ok_or_else(|| Error::Loader("session already torn down".into()))?;
        let epochs = self.spec.training.epochs;
        let (trainer, loader) = (&mut self.trainer, &mut self.loader);
        let result = pool.install(|| trainer.train(epochs, loader))?;

        std::fs::create_dir_all(&self.spec.training.output_dir)?;
        let history = self.spec.history_path();
        result.history.save_json(&history)?;
        tracing::info!(path = %history.display(), epochs = result.epochs_completed, "wrote loss history");
        Ok(result)
    }

    /// Release the image cache and the compute pool
    pub fn teardown(&mut self) {
        self.loader.release_cache();
        if self.pool.take().is_some() {
            tracing::debug!("session closed");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("data", &self.spec.data.dir)
            .field("images", &self.loader.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn small_spec(root: &TempDir) -> GanSpec {
        let images = root.path().join("images");
        std::fs::create_dir(&images).unwrap();
        for i in 0..3u8 {
            RgbImage::from_pixel(12, 12, Rgb([i * 60, 10, 200]))
                .save(images.join(format!("{i}.png")))
                .unwrap();
        }
        let mut spec = GanSpec::new(images);
        spec.data.image_size = 8;
        spec.data.batch_size = 2;
        spec.model.latent_dim = 4;
        spec.model.generator_channels = 4;
        spec.model.discriminator_channels = 2;
        spec.training.epochs = 1;
        spec.training.seed = Some(9);
        spec.training.threads = Some(2);
        spec.training.output_dir = root.path().join("out");
        spec.sampling.grid = 0;
        spec
    }

    #[test]
    fn test_init_fails_fast_on_missing_dataset() {
        let root = TempDir::new().unwrap();
        let mut spec = small_spec(&root);
        spec.data.dir = root.path().join("nope");
        assert!(matches!(Session::init(spec), Err(Error::DatasetNotFound(_))));
    }

    #[test]
    fn test_init_rejects_invalid_manifest() {
        let root = TempDir::new().unwrap();
        let mut spec = small_spec(&root);
        spec.training.epochs = 0;
        assert!(matches!(Session::init(spec), Err(Error::Validation(_))));
    }

    #[test]
    fn test_run_writes_history() {
        let root = TempDir::new().unwrap();
        let spec = small_spec(&root);
        let history_path = spec.history_path();

        let mut session = Session::init(spec).unwrap();
        assert_eq!(session.loader().steps_per_epoch(), 2);
        let result = session.run().unwrap();
        assert_eq!(result.epochs_completed, 1);
        assert!(history_path.exists());

        session.teardown();
        assert!(session.is_closed());
        assert!(session.run().is_err());
    }
}
