//! Restocking business rules.
//!
//! Given a product's observed state and a projected demand sequence, decide
//! whether/when the reorder threshold is breached, how many units to move from
//! backroom inventory onto the shelf, and how many units to order.

pub mod policy;
pub mod thresholds;

pub use policy::ReorderPolicy;
pub use thresholds::ThresholdSource;
