//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic pipeline failures. Infrastructure
/// concerns (HTTP mapping, process exit) belong to higher layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No usable rows remained after ingestion and cleaning. Fatal to the call.
    #[error("no usable data rows after cleaning")]
    DataUnavailable,

    /// The requested product does not appear in the combined dataset.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Fewer rows are available than a forecasting window requires.
    ///
    /// At projection time this is non-fatal: the projection truncates, possibly
    /// to zero days. The variant exists for call sites that need a window
    /// outright.
    #[error("insufficient data: need {needed} rows, have {available}")]
    InsufficientData { needed: usize, available: usize },

    /// A known product has no entry in the reorder threshold table.
    ///
    /// This is a configuration defect to be corrected at deploy time, not a
    /// condition to recover from at runtime.
    #[error("no reorder threshold configured for product: {0}")]
    MissingThreshold(String),

    /// An input file could not be read.
    #[error("ingestion failed: {0}")]
    Ingest(String),
}

impl DomainError {
    pub fn product_not_found(name: impl Into<String>) -> Self {
        Self::ProductNotFound(name.into())
    }

    pub fn insufficient_data(needed: usize, available: usize) -> Self {
        Self::InsufficientData { needed, available }
    }

    pub fn missing_threshold(name: impl Into<String>) -> Self {
        Self::MissingThreshold(name.into())
    }

    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest(msg.into())
    }
}
