pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;

pub use pizza::router as pizza_router;
pub use restaurant::router as restaurant_router;
pub use restaurant_pizza::router as restaurant_pizza_router;

use axum::{Router, response::Html, routing::get};
use pizza_restaurant_service::{RestaurantError, RestaurantService};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub service: RestaurantService,
}

pub fn build_app(service: RestaurantService) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/", get(index))
        .merge(restaurant_router())
        .merge(pizza_router())
        .merge(restaurant_pizza_router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn index() -> Html<&'static str> {
    Html("<h1>Code challenge</h1>")
}

/// Diesel connections block, so storage calls run on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, RestaurantError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("Storage task failed: {e}")))?;
    Ok(result?)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        restaurant::list_restaurants,
        restaurant::get_restaurant,
        restaurant::delete_restaurant,
        pizza::list_pizzas,
        restaurant_pizza::create_restaurant_pizza,
    ),
    components(
        schemas(
            crate::models::Restaurant,
            crate::models::RestaurantDetail,
            crate::models::RestaurantPizzaItem,
            crate::models::Pizza,
            crate::models::CreateRestaurantPizzaRequest,
            crate::models::CreateRestaurantPizzaResponse,
            crate::models::MessageResponse,
            crate::models::ApiErrorResponse,
            crate::models::ApiErrorsResponse
        )
    ),
    tags(
        (name = "restaurants", description = "Restaurant endpoints"),
        (name = "pizzas", description = "Pizza endpoints"),
        (name = "restaurant_pizzas", description = "Pizza prices per restaurant")
    ),
    info(
        title = "Pizza Restaurants API",
        description = "Restaurants, pizzas and the prices restaurants charge for them",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
