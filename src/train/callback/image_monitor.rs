//! Periodic sample generation

use std::path::{Path, PathBuf};

use ndarray::Axis;

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::error::Result;
use crate::generative::Gan;
use crate::io::{save_grid, save_image};

/// File name of the mosaic written when training ends
pub const FINAL_GRID_FILE: &str = "final_grid.png";

/// Writes generated samples every few completed epochs
///
/// After epoch `e` (counting from 1) with `e % every == 0`, draws
/// `num_images` fresh latents, generates in inference mode and writes
/// `generated_img_{e}_{i}.png`. When training ends, writes a `grid`×`grid`
/// mosaic to [`FINAL_GRID_FILE`] unless `grid` is zero.
#[derive(Clone, Debug)]
pub struct ImageMonitor {
    dir: PathBuf,
    every: usize,
    num_images: usize,
    grid: usize,
    written: Vec<PathBuf>,
}

impl ImageMonitor {
    pub fn new(dir: impl Into<PathBuf>, every: usize, num_images: usize) -> Self {
        Self { dir: dir.into(), every, num_images, grid: 4, written: Vec::new() }
    }

    /// Side length of the final mosaic; zero disables it
    pub fn with_grid(mut self, grid: usize) -> Self {
        self.grid = grid;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Whether samples are due after `completed` epochs
    pub fn is_due(&self, completed: usize) -> bool {
        self.every > 0 && completed > 0 && completed % self.every == 0
    }

    /// Sample file name for a completed epoch count and image index
    pub fn sample_name(completed: usize, index: usize) -> String {
        format!("generated_img_{completed}_{index}.png")
    }

    fn write_samples(&mut self, completed: usize, gan: &mut Gan) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let images = gan.generate(self.num_images)?;
        for (i, image) in images.axis_iter(Axis(0)).enumerate() {
            let path = self.dir.join(Self::sample_name(completed, i));
            save_image(image, &path)?;
            self.written.push(path);
        }
        tracing::info!(epoch = completed, count = self.num_images, dir = %self.dir.display(), "wrote samples");
        Ok(())
    }
}

impl TrainerCallback for ImageMonitor {
    fn on_epoch_end(&mut self, ctx: &CallbackContext, gan: &mut Gan) -> Result<CallbackAction> {
        let completed = ctx.completed_epochs();
        if self.is_due(completed) && self.num_images > 0 {
            self.write_samples(completed, gan)?;
        }
        Ok(CallbackAction::Continue)
    }

    fn on_train_end(&mut self, _ctx: &CallbackContext, gan: &mut Gan) -> Result<()> {
        if self.grid == 0 {
            return Ok(());
        }
        std::fs::create_dir_all(&self.dir)?;
        let images = gan.generate(self.grid * self.grid)?;
        let path = self.dir.join(FINAL_GRID_FILE);
        save_grid(images.view(), self.grid, &path)?;
        self.written.push(path);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ImageMonitor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generative::{DiscriminatorConfig, GanConfig, GeneratorConfig};
    use tempfile::TempDir;

    fn tiny_gan() -> Gan {
        let config = GanConfig {
            generator: GeneratorConfig { latent_dim: 4, channels: 4, image_size: 8, ..Default::default() },
            discriminator: DiscriminatorConfig { image_size: 8, channels: 2, ..Default::default() },
            ..Default::default()
        };
        Gan::with_seed(config, 3).unwrap()
    }

    fn epoch_end(epoch: usize) -> CallbackContext {
        CallbackContext { epoch, max_epochs: 10, ..Default::default() }
    }

    #[test]
    fn test_is_due_counts_completed_epochs() {
        let monitor = ImageMonitor::new("unused", 5, 3);
        assert!(!monitor.is_due(0));
        assert!(!monitor.is_due(4));
        assert!(monitor.is_due(5));
        assert!(monitor.is_due(10));
        assert!(!ImageMonitor::new("unused", 0, 3).is_due(5));
    }

    #[test]
    fn test_writes_samples_on_schedule() {
        let dir = TempDir::new().unwrap();
        let samples = dir.path().join("samples");
        let mut monitor = ImageMonitor::new(&samples, 2, 3);
        let mut gan = tiny_gan();

        for epoch in 0..4 {
            monitor.on_epoch_end(&epoch_end(epoch), &mut gan).unwrap();
        }

        let mut names: Vec<String> = std::fs::read_dir(&samples)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "generated_img_2_0.png");
        assert_eq!(names[5], "generated_img_4_2.png");

        let img = image::open(samples.join("generated_img_4_1.png")).unwrap();
        assert_eq!((img.width(), img.height()), (8, 8));
    }

    #[test]
    fn test_final_grid() {
        let dir = TempDir::new().unwrap();
        let mut monitor = ImageMonitor::new(dir.path(), 5, 3).with_grid(2);
        let mut gan = tiny_gan();
        monitor.on_train_end(&CallbackContext::default(), &mut gan).unwrap();

        let grid = image::open(dir.path().join(FINAL_GRID_FILE)).unwrap();
        assert_eq!((grid.width(), grid.height()), (16, 16));
        assert_eq!(monitor.written().len(), 1);
    }

    #[test]
    fn test_zero_grid_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut monitor = ImageMonitor::new(dir.path(), 5, 3).with_grid(0);
        monitor.on_train_end(&CallbackContext::default(), &mut tiny_gan()).unwrap();
        assert!(monitor.written().is_empty());
    }
}
