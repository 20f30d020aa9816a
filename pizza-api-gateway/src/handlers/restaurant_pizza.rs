use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::post,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::models::*;

use super::{AppState, run_blocking};

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Restaurant pizza created", body = CreateRestaurantPizzaResponse),
        (status = 400, description = "Missing fields or price outside 1..=30", body = ApiErrorsResponse),
        (status = 404, description = "Restaurant or pizza does not exist", body = ApiErrorsResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateRestaurantPizzaResponse>), ApiError> {
    let Json(payload) =
        payload.map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;

    let service = state.service.clone();
    let created = run_blocking(move || service.add_restaurant_pizza(payload.into())).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}
