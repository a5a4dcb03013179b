//! Training result types

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Mean losses and scores over one epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Epoch number, counting from 1
    pub epoch: usize,
    pub steps: usize,
    pub d_loss: f32,
    pub g_loss: f32,
    pub d_real_score: f32,
    pub d_fake_score: f32,
    pub elapsed_secs: f64,
}

/// Per-epoch history of a run, written as `history.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LossHistory {
    pub epochs: Vec<EpochRecord>,
}

impl LossHistory {
    pub fn push(&mut self, record: EpochRecord) {
        self.epochs.push(record);
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn last(&self) -> Option<&EpochRecord> {
        self.epochs.last()
    }

    /// Write as pretty-printed JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(std::io::Error::from)?;
        Ok(())
    }

    /// Read a history written by [`LossHistory::save_json`]
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file)).map_err(std::io::Error::from)?)
    }
}

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainResult {
    /// Epochs run to completion
    pub epochs_completed: usize,
    /// Mean discriminator loss of the last completed epoch
    pub final_d_loss: f32,
    /// Mean generator loss of the last completed epoch
    pub final_g_loss: f32,
    pub history: LossHistory,
    /// Whether a callback stopped training early
    pub stopped_early: bool,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}
