//! Pipeline configuration.
//!
//! One `PipelineConfig` is built per orchestrator invocation; nothing here is
//! global state.

use serde::{Deserialize, Serialize};

/// Hyperparameters of the sequence regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Units in the first (sequence-returning) recurrent layer.
    pub units_1: usize,
    /// Units in the second (collapsing) recurrent layer.
    pub units_2: usize,
    /// Dropout rate applied between the two recurrent layers during training.
    pub dropout: f64,
    /// Upper bound on training epochs.
    pub epochs: usize,
    pub batch_size: usize,
    /// Early-stopping patience: halt after this many epochs without
    /// validation-loss improvement, restoring the best-seen weights.
    pub patience: usize,
    pub learning_rate: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            units_1: 128,
            units_2: 64,
            dropout: 0.2,
            epochs: 50,
            batch_size: 16,
            patience: 3,
            learning_rate: 1e-3,
        }
    }
}

/// Configuration for one full prepare→train→project→policy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Length of each training/inference window, in days.
    pub sequence_length: usize,
    /// Projection horizon, in days.
    pub future_days: usize,
    /// Fraction of windows held out for validation.
    pub validation_fraction: f64,
    /// Seed for the shuffled split, weight init, and dropout masks.
    pub seed: u64,
    pub model: ModelConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sequence_length: 7,
            future_days: 7,
            validation_fraction: 0.2,
            seed: 42,
            model: ModelConfig::default(),
        }
    }
}
