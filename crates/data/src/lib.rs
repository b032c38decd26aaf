//! Ingestion, scaling, and window construction.
//!
//! Everything here is synchronous and owned per invocation: the scalers fitted
//! by [`prepare::scale_records`] live for one prepare+predict cycle and are
//! discarded afterwards (no cross-request state).

pub mod loader;
pub mod prepare;
pub mod scaler;
pub mod window;

pub use loader::load;
pub use prepare::{prepare_product_state, scale_records};
pub use scaler::MinMaxScaler;
pub use window::{make_windows, train_val_split, TrainValSplit};
