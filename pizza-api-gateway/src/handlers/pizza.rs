use axum::{Router, extract::State, response::Json, routing::get};
use tracing::instrument;

use crate::error::ApiError;
use crate::models::Pizza;

use super::{AppState, run_blocking};

pub fn router() -> Router<AppState> {
    Router::new().route("/pizzas", get(list_pizzas))
}

#[utoipa::path(
    get,
    path = "/pizzas",
    responses(
        (status = 200, description = "List of pizzas", body = [Pizza]),
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn list_pizzas(State(state): State<AppState>) -> Result<Json<Vec<Pizza>>, ApiError> {
    let service = state.service.clone();
    let pizzas = run_blocking(move || service.list_pizzas()).await?;

    Ok(Json(pizzas.into_iter().map(Pizza::from).collect()))
}
