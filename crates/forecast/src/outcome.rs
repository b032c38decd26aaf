//! The result payload of one forecasting job.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use shelfcast_core::{DemandSpike, ProductName, StoreId};
use shelfcast_model::TrainReport;

/// Outcome of one prepare→train→project→policy run.
///
/// An insight for higher layers to serve or persist; producing it never
/// mutates ingested history (the single movement-rule adjustment happens on
/// the job's own state copy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutcome {
    pub store_id: StoreId,
    pub product: ProductName,
    /// Rounded per-day demand predictions, oldest first. May be shorter than
    /// the requested horizon (possibly empty) when history is short.
    pub predictions: Vec<i64>,
    pub reorder_needed: bool,
    pub reorder_date: Option<NaiveDate>,
    /// Shortfall between summed projected demand and current coverage.
    pub order_quantity: i64,
    /// Units the movement rule shifted from backroom to shelf, if any.
    pub recommended_move: Option<f64>,
    pub last_observed_date: Option<NaiveDate>,
    pub training: TrainReport,
}

impl ForecastOutcome {
    /// Peak-demand banding over the projected days (Low when empty).
    pub fn demand_spike(&self) -> DemandSpike {
        DemandSpike::classify(self.predictions.iter().copied().max().unwrap_or(0))
    }

    /// Mean projected daily demand, rounded; 0 when no days were projected.
    pub fn predicted_demand_percentage(&self) -> i64 {
        if self.predictions.is_empty() {
            return 0;
        }
        let sum: i64 = self.predictions.iter().sum();
        (sum as f64 / self.predictions.len() as f64).round() as i64
    }

    /// Calendar dates covered by the projection, anchored on the last
    /// observed date (offsets start at 0, so the first entry is the anchor
    /// itself).
    pub fn expected_demand_dates(&self) -> Vec<NaiveDate> {
        let Some(anchor) = self.last_observed_date else {
            return Vec::new();
        };
        (0..self.predictions.len() as u64)
            .map(|i| anchor.checked_add_days(Days::new(i)).unwrap_or(anchor))
            .collect()
    }
}
