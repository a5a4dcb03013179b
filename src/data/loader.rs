//! Cached, shuffled, prefetching batch loader

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::batch::ImageBatch;
use super::folder::ImageFolder;
use crate::error::{Error, Result};

type Cache = Arc<Mutex<Option<Arc<Vec<Array3<f32>>>>>>;

/// Batch loader settings
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub batch_size: usize,
    pub shuffle: bool,
    /// Batches decoded ahead of the consumer
    pub prefetch: usize,
    /// Shuffle seed; OS entropy when absent
    pub seed: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 128, shuffle: true, prefetch: 2, seed: None }
    }
}

/// Produces one pass of batches per call to [`BatchLoader::epoch`]
///
/// The first complete pass decodes every image and keeps the decoded arrays
/// in memory; later passes are served from that cache. Decoding and batching
/// happen on a background thread feeding a bounded channel. The final batch
/// of a pass may be short.
#[derive(Debug)]
pub struct BatchLoader {
    folder: Arc<ImageFolder>,
    config: LoaderConfig,
    cache: Cache,
    rng: StdRng,
}

impl BatchLoader {
    pub fn new(folder: ImageFolder, config: LoaderConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(Error::ConfigError("batch size must be positive".into()));
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self { folder: Arc::new(folder), config, cache: Arc::new(Mutex::new(None)), rng })
    }

    pub fn folder(&self) -> &ImageFolder {
        &self.folder
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Number of images per pass
    pub fn len(&self) -> usize {
        self.folder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folder.is_empty()
    }

    /// Batches per pass, counting a trailing partial batch
    pub fn steps_per_epoch(&self) -> usize {
        self.len().div_ceil(self.config.batch_size)
    }

    /// Whether a complete pass has been cached
    pub fn is_cached(&self) -> bool {
        self.cache.lock().map(|c| c.is_some()).unwrap_or(false)
    }

    /// Drop cached images; the next pass decodes from disk again
    pub fn release_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            if cache.take().is_some() {
                tracing::debug!("released image cache");
            }
        }
    }

    /// Start one pass over the dataset
    pub fn epoch(&mut self) -> Epoch {
        let mut order: Vec<usize> = (0..self.len()).collect();
        if self.config.shuffle {
            order.shuffle(&mut self.rng);
        }

        let (tx, rx) = sync_channel(self.config.prefetch.max(1));
        let producer = Producer {
            folder: Arc::clone(&self.folder),
            cache: Arc::clone(&self.cache),
            batch_size: self.config.batch_size,
            order,
        };
        let handle = std::thread::Builder::new()
            .name("artgan-loader".into())
            .spawn(move || producer.run(&tx));

        match handle {
            Ok(handle) => Epoch { rx: Some(rx), handle: Some(handle), failed: None },
            Err(e) => Epoch {
                rx: None,
                handle: None,
                failed: Some(Error::Loader(format!("cannot spawn loader thread: {e}"))),
            },
        }
    }
}

struct Producer {
    folder: Arc<ImageFolder>,
    cache: Cache,
    batch_size: usize,
    order: Vec<usize>,
}

impl Producer {
    fn run(self, tx: &SyncSender<Result<ImageBatch>>) {
        let cached = match self.cache.lock() {
            Ok(cache) => cache.clone(),
            Err(_) => {
                let _ = tx.send(Err(Error::Loader("image cache lock poisoned".into())));
                return;
            }
        };

        match cached {
            Some(images) => self.serve_cached(&images, tx),
            None => self.decode_and_fill(tx),
        }
    }

    fn serve_cached(&self, images: &[Array3<f32>], tx: &SyncSender<Result<ImageBatch>>) {
        for chunk in self.order.chunks(self.batch_size) {
            let samples: Vec<&Array3<f32>> = chunk.iter().map(|&i| &images[i]).collect();
            if tx.send(ImageBatch::stack(&samples)).is_err() {
                return;
            }
        }
    }

    fn decode_and_fill(&self, tx: &SyncSender<Result<ImageBatch>>) {
        let mut decoded: Vec<Option<Array3<f32>>> = vec![None; self.folder.len()];
        for chunk in self.order.chunks(self.batch_size) {
            for &i in chunk {
                match self.folder.load(i) {
                    Ok(img) => decoded[i] = Some(img),
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return;
                    }
                }
            }
            let samples: Vec<&Array3<f32>> = chunk.iter().filter_map(|&i| decoded[i].as_ref()).collect();
            if tx.send(ImageBatch::stack(&samples)).is_err() {
                return;
            }
        }

        let images: Option<Vec<Array3<f32>>> = decoded.into_iter().collect();
        if let (Some(images), Ok(mut cache)) = (images, self.cache.lock()) {
            tracing::debug!(images = images.len(), "filled image cache");
            *cache = Some(Arc::new(images));
        }
    }
}

/// One pass of batches
///
/// Dropping the iterator early stops the producer thread.
#[derive(Debug)]
pub struct Epoch {
    rx: Option<Receiver<Result<ImageBatch>>>,
    handle: Option<JoinHandle<()>>,
    failed: Option<Error>,
}

impl Iterator for Epoch {
    type Item = Result<ImageBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.failed.take() {
            return Some(Err(e));
        }
        let item = self.rx.as_ref()?.recv().ok();
        if item.is_none() {
            self.finish();
        }
        item
    }
}

impl Epoch {
    fn finish(&mut self) {
        self.rx = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("loader thread panicked");
            }
        }
    }
}

impl Drop for Epoch {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn dataset(n: usize) -> (TempDir, ImageFolder) {
        let dir = TempDir::new().unwrap();
        for i in 0..n {
            let shade = (i * 20) as u8;
            RgbImage::from_pixel(8, 8, Rgb([shade, shade, shade]))
                .save(dir.path().join(format!("img_{i:02}.png")))
                .unwrap();
        }
        let folder = ImageFolder::open(dir.path(), 8).unwrap();
        (dir, folder)
    }

    fn config(batch_size: usize, shuffle: bool) -> LoaderConfig {
        LoaderConfig { batch_size, shuffle, prefetch: 2, seed: Some(0) }
    }

    /// First pixel of every image in a pass, in order
    fn first_pixels(loader: &mut BatchLoader) -> Vec<f32> {
        loader
            .epoch()
            .flat_map(|b| {
                let b = b.unwrap();
                (0..b.len()).map(|i| b.images()[[i, 0, 0, 0]]).collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn test_batches_keep_remainder() {
        let (_dir, folder) = dataset(5);
        let mut loader = BatchLoader::new(folder, config(2, false)).unwrap();
        assert_eq!(loader.steps_per_epoch(), 3);
        let sizes: Vec<usize> = loader.epoch().map(|b| b.unwrap().len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_cache_filled_after_first_pass() {
        let (dir, folder) = dataset(4);
        let mut loader = BatchLoader::new(folder, config(3, false)).unwrap();
        assert!(!loader.is_cached());
        let first = first_pixels(&mut loader);
        assert!(loader.is_cached());

        // Later passes come from memory, even with the files gone
        drop(dir);
        assert_eq!(first_pixels(&mut loader), first);

        loader.release_cache();
        assert!(!loader.is_cached());
        assert!(loader.epoch().next().unwrap().is_err());
    }

    #[test]
    fn test_partial_pass_does_not_fill_cache() {
        let (_dir, folder) = dataset(6);
        let mut loader = BatchLoader::new(folder, config(2, false)).unwrap();
        let mut epoch = loader.epoch();
        assert!(epoch.next().unwrap().is_ok());
        drop(epoch);
        assert!(!loader.is_cached());
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let (_dir, folder) = dataset(8);
        let mut loader = BatchLoader::new(folder, config(3, true)).unwrap();
        let mut a = first_pixels(&mut loader);
        let mut b = first_pixels(&mut loader);
        a.sort_by(f32::total_cmp);
        b.sort_by(f32::total_cmp);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn test_unshuffled_order_is_sorted_by_path() {
        let (_dir, folder) = dataset(3);
        let mut loader = BatchLoader::new(folder, config(8, false)).unwrap();
        let pixels = first_pixels(&mut loader);
        assert!(pixels.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let (_dir, folder) = dataset(1);
        assert!(BatchLoader::new(folder, config(0, false)).is_err());
    }
}
