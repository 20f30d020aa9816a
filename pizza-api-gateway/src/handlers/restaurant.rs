use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::models::*;

use super::{AppState, run_blocking};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = [Restaurant]),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Restaurant>>, ApiError> {
    let service = state.service.clone();
    let restaurants = run_blocking(move || service.list_restaurants()).await?;

    Ok(Json(restaurants.into_iter().map(Restaurant::from).collect()))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant details with its pizzas", body = RestaurantDetail),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i64, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<RestaurantDetail>, ApiError> {
    let service = state.service.clone();
    let details = run_blocking(move || service.get_restaurant(restaurant_id)).await?;

    Ok(Json(details.into()))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its pizza prices deleted", body = MessageResponse),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i64, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let service = state.service.clone();
    run_blocking(move || service.delete_restaurant(restaurant_id)).await?;

    Ok((
        StatusCode::NO_CONTENT,
        Json(MessageResponse {
            message: "Restaurant deleted successfully".to_string(),
        }),
    ))
}
