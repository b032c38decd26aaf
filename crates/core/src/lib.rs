//! Domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no I/O, no model math).

pub mod config;
pub mod error;
pub mod id;
pub mod record;

pub use config::{ModelConfig, PipelineConfig};
pub use error::{DomainError, DomainResult};
pub use id::{ProductName, StoreId};
pub use record::{DailyRecord, DemandSpike, ProductState, ScaledRecord, Window};
