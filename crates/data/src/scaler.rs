//! Min-max normalization to the [0, 1] range.

use serde::{Deserialize, Serialize};

/// A fitted min-max scaler.
///
/// Fit once over the combined dataset per preparation call and reused (never
/// refit) for inverse transforms within the same run. A scaler is scoped to
/// one invocation; nothing here is shared across requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: f64,
    data_max: f64,
}

impl MinMaxScaler {
    /// Fit over a non-empty slice of raw values.
    ///
    /// An empty slice yields a degenerate scaler over [0, 0]; callers check
    /// for usable data before fitting.
    pub fn fit(values: &[f64]) -> Self {
        let mut data_min = f64::INFINITY;
        let mut data_max = f64::NEG_INFINITY;
        for &v in values {
            data_min = data_min.min(v);
            data_max = data_max.max(v);
        }
        if values.is_empty() {
            data_min = 0.0;
            data_max = 0.0;
        }
        Self { data_min, data_max }
    }

    pub fn data_min(&self) -> f64 {
        self.data_min
    }

    pub fn data_max(&self) -> f64 {
        self.data_max
    }

    /// Map a raw value into [0, 1].
    ///
    /// A constant column (max == min) maps to 0.
    pub fn transform(&self, value: f64) -> f64 {
        let range = self.data_max - self.data_min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.data_min) / range
    }

    /// Map a scaled value back into raw units.
    pub fn inverse_transform(&self, scaled: f64) -> f64 {
        let range = self.data_max - self.data_min;
        self.data_min + scaled * range
    }
}
