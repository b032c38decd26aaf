use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shelfcast_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::ProductNotFound(name) => json_error(
            StatusCode::NOT_FOUND,
            "product_not_found",
            format!("product not found: {name}"),
        ),
        DomainError::DataUnavailable => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "data_unavailable",
            "no usable data rows for this store",
        ),
        DomainError::InsufficientData { needed, available } => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "insufficient_data",
            format!("need {needed} rows to forecast, have {available}"),
        ),
        DomainError::MissingThreshold(name) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "missing_threshold",
            format!("no reorder threshold configured for product: {name}"),
        ),
        DomainError::Ingest(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "ingest_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
