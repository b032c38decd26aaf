use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use shelfcast_core::{ProductName, StoreId};
use shelfcast_forecast::{DemandForecastJob, ForecastJob};

use crate::app::{dto, errors, ApiState};

/// `GET /api/demand/{store_id}/{product_code}`
///
/// Runs the full pipeline for one (store, product) on a blocking thread;
/// training happens inline, so this call is slow by design. A projection that
/// comes back empty is still a 200 with empty arrays, distinct from an unknown
/// product (404).
pub async fn get_demand_prediction(
    Extension(state): Extension<Arc<ApiState>>,
    Path((store_id, product_code)): Path<(String, String)>,
) -> axum::response::Response {
    let store_id = StoreId::from(store_id);
    let Some(files) = state.registry.files_for(&store_id) else {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "unknown_store",
            format!("unknown store: {store_id}"),
        );
    };

    let job = DemandForecastJob::new(
        store_id,
        files.to_vec(),
        ProductName::from(product_code),
        state.config.clone(),
        state.policy.clone(),
    );

    match tokio::task::spawn_blocking(move || job.run()).await {
        Ok(Ok(outcome)) => Json(dto::DemandPredictionResponse::from_outcome(&outcome)).into_response(),
        Ok(Err(err)) => errors::domain_error_to_response(err),
        Err(join_err) => {
            tracing::error!(error = %join_err, "forecast task failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "forecast_failed",
                "forecast task failed",
            )
        }
    }
}
