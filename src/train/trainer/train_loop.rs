//! Multi-epoch training loop

use std::time::Instant;

use super::core::GanTrainer;
use super::result::{EpochRecord, TrainResult};
use crate::data::BatchLoader;
use crate::error::Result;
use crate::train::callback::CallbackAction;

#[derive(Default)]
struct EpochTotals {
    steps: usize,
    d_loss: f32,
    g_loss: f32,
    d_real_score: f32,
    d_fake_score: f32,
}

impl EpochTotals {
    fn mean(&self, epoch: usize, elapsed_secs: f64) -> EpochRecord {
        let n = self.steps.max(1) as f32;
        EpochRecord {
            epoch,
            steps: self.steps,
            d_loss: self.d_loss / n,
            g_loss: self.g_loss / n,
            d_real_score: self.d_real_score / n,
            d_fake_score: self.d_fake_score / n,
            elapsed_secs,
        }
    }
}

impl GanTrainer {
    /// Train for `max_epochs` full passes over `loader`
    ///
    /// Every batch, including a short final one, gets one discriminator and
    /// one generator update. Loader, step and callback errors abort the run;
    /// `on_train_end` still fires when a callback stops training.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use artgan::data::{BatchLoader, ImageFolder, LoaderConfig};
    /// use artgan::generative::{Gan, GanConfig};
    /// use artgan::train::{GanTrainer, ProgressCallback};
    ///
    /// let folder = ImageFolder::open("./data", 64).unwrap();
    /// let mut loader = BatchLoader::new(folder, LoaderConfig::default()).unwrap();
    /// let mut trainer = GanTrainer::new(Gan::new(GanConfig::default()).unwrap());
    /// trainer.add_callback(ProgressCallback::new(10));
    ///
    /// let result = trainer.train(10, &mut loader).unwrap();
    /// println!("d_loss {:.4}, g_loss {:.4}", result.final_d_loss, result.final_g_loss);
    /// ```
    pub fn train(&mut self, max_epochs: usize, loader: &mut BatchLoader) -> Result<TrainResult> {
        self.start_time = Some(Instant::now());
        self.history = Default::default();
        let steps_per_epoch = loader.steps_per_epoch();
        let mut stopped_early = false;

        let ctx = self.build_context(0, max_epochs, 0, steps_per_epoch);
        if self.callbacks.on_train_begin(&ctx) == CallbackAction::Stop {
            stopped_early = true;
        }

        for epoch in 0..max_epochs {
            if stopped_early {
                break;
            }
            let ctx = self.build_context(epoch, max_epochs, 0, steps_per_epoch);
            if self.callbacks.on_epoch_begin(&ctx) == CallbackAction::Stop {
                stopped_early = true;
                break;
            }

            let mut totals = EpochTotals::default();
            for (step, batch) in loader.epoch().enumerate() {
                let batch = batch?;
                let result = self.gan.train_step(batch.images())?;
                totals.steps += 1;
                totals.d_loss += result.d_loss;
                totals.g_loss += result.g_loss;
                totals.d_real_score += result.d_real_score;
                totals.d_fake_score += result.d_fake_score;

                let mut ctx = self.build_context(epoch, max_epochs, step, steps_per_epoch);
                ctx.d_loss = result.d_loss;
                ctx.g_loss = result.g_loss;
                ctx.d_real_score = result.d_real_score;
                ctx.d_fake_score = result.d_fake_score;
                if self.callbacks.on_step_end(&ctx) == CallbackAction::Stop {
                    stopped_early = true;
                    break;
                }
            }
            if stopped_early {
                break;
            }

            let record = totals.mean(epoch + 1, self.elapsed_secs());
            tracing::debug!(
                epoch = record.epoch,
                d_loss = record.d_loss,
                g_loss = record.g_loss,
                "epoch finished"
            );
            let mut ctx = self.build_context(epoch, max_epochs, steps_per_epoch, steps_per_epoch);
            ctx.d_loss = record.d_loss;
            ctx.g_loss = record.g_loss;
            ctx.d_real_score = record.d_real_score;
            ctx.d_fake_score = record.d_fake_score;
            self.history.push(record);

            if self.callbacks.on_epoch_end(&ctx, &mut self.gan)? == CallbackAction::Stop {
                stopped_early = true;
            }
        }

        let completed = self.history.len();
        let (final_d_loss, final_g_loss) = self.history.last().map_or((0.0, 0.0), |r| (r.d_loss, r.g_loss));
        let mut ctx = self.build_context(completed.saturating_sub(1), max_epochs, 0, steps_per_epoch);
        ctx.d_loss = final_d_loss;
        ctx.g_loss = final_g_loss;
        self.callbacks.on_train_end(&ctx, &mut self.gan)?;

        Ok(TrainResult {
            epochs_completed: completed,
            final_d_loss,
            final_g_loss,
            history: self.history.clone(),
            stopped_early,
            elapsed_secs: self.elapsed_secs(),
        })
    }
}
