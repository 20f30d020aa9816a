use axum::{http::StatusCode, response::Json};
use pizza_restaurant_service::RestaurantError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),
    #[error("Unknown reference: {0:?}")]
    UnknownReference(Vec<String>),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<RestaurantError> for ApiError {
    fn from(e: RestaurantError) -> Self {
        match e {
            RestaurantError::NotFound => ApiError::NotFound(e.to_string()),
            RestaurantError::MissingFields | RestaurantError::PriceOutOfRange(_) => {
                ApiError::Validation(vec![e.to_string()])
            }
            RestaurantError::InvalidReference => ApiError::UnknownReference(vec![e.to_string()]),
            RestaurantError::Database(_)
            | RestaurantError::Pool(_)
            | RestaurantError::Migration(_) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        // Failures of the association endpoint report a list under "errors",
        // everything else a single "error" message.
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, json!({ "errors": errors })),
            ApiError::UnknownReference(errors) => {
                (StatusCode::NOT_FOUND, json!({ "errors": errors }))
            }
            ApiError::InternalError(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("Internal server error: {msg}") }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
