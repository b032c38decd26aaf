use axum::{routing::get, Router};

pub mod demand;
pub mod system;

/// Router for the forecasting query surface.
pub fn router() -> Router {
    Router::new().route(
        "/api/demand/:store_id/:product_code",
        get(demand::get_demand_prediction),
    )
}
