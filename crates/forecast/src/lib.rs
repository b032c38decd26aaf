//! Autoregressive projection and the orchestrated per-store forecasting job.
//!
//! A [`DemandForecastJob`] composes preparation → training → projection →
//! policy into one synchronous call. Jobs are store-scoped and run through a
//! [`LocalScheduler`]; every invocation builds its own scalers and retrains
//! the model from scratch (no cross-invocation cache).

pub mod job;
pub mod outcome;
pub mod projector;

pub use job::{DemandForecastJob, ForecastJob, LocalScheduler, ScheduleError, StoreScope};
pub use outcome::ForecastOutcome;
pub use projector::Projector;
pub use shelfcast_model::TrainReport;
