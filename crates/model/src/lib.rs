//! The sequence-to-one demand regressor.
//!
//! A two-layer LSTM with dropout and a single linear output unit, trained with
//! MSE loss and Adam. No ML framework is involved: parameters are plain
//! `Vec<f64>` blocks with hand-written backpropagation through time, which
//! keeps training deterministic under a fixed seed and the model scoped to one
//! invocation (no persisted checkpoints).

pub mod lstm;
pub mod network;
pub mod param;
pub mod train;

pub use network::ForecastNet;
pub use train::{evaluate, train, TrainReport};
