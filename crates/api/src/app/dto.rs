//! Response DTOs and mapping from forecast outcomes.

use serde::Serialize;

use shelfcast_forecast::ForecastOutcome;

/// Payload of `GET /api/demand/{store_id}/{product_code}`.
#[derive(Debug, Clone, Serialize)]
pub struct DemandPredictionResponse {
    pub product_code: String,
    pub predicted_demand_percentage: i64,
    pub demand_spike: String,
    pub expected_demand_date_range: Vec<String>,
    pub reorder_needed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_date: Option<String>,
    pub order_quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_move: Option<f64>,
}

impl DemandPredictionResponse {
    pub fn from_outcome(outcome: &ForecastOutcome) -> Self {
        Self {
            product_code: outcome.product.to_string(),
            predicted_demand_percentage: outcome.predicted_demand_percentage(),
            demand_spike: outcome.demand_spike().to_string(),
            expected_demand_date_range: outcome
                .expected_demand_dates()
                .iter()
                .map(|d| d.to_string())
                .collect(),
            reorder_needed: outcome.reorder_needed,
            reorder_date: outcome.reorder_date.map(|d| d.to_string()),
            order_quantity: outcome.order_quantity,
            recommended_move: outcome.recommended_move,
        }
    }
}
