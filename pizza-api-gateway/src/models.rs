use pizza_restaurant_service::models;
use pizza_restaurant_service::service::{
    CreatedRestaurantPizza, NewRestaurantPizzaInput, RestaurantDetails,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    /// Unique identifier for the restaurant
    pub id: i64,
    /// Name of the restaurant
    pub name: String,
    /// Address of the restaurant
    pub address: String,
}

impl From<models::Restaurant> for Restaurant {
    fn from(r: models::Restaurant) -> Self {
        Self {
            id: r.id,
            name: r.name,
            address: r.address,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Pizza {
    /// Unique identifier for the pizza
    pub id: i64,
    /// Name of the pizza
    pub name: String,
    /// Comma-separated ingredients
    pub ingredients: String,
}

impl From<models::Pizza> for Pizza {
    fn from(p: models::Pizza) -> Self {
        Self {
            id: p.id,
            name: p.name,
            ingredients: p.ingredients,
        }
    }
}

/// A pizza as offered by one restaurant.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantPizzaItem {
    /// Pizza ID
    pub id: i64,
    pub name: String,
    pub ingredients: String,
    /// Price charged by this restaurant
    pub price: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantDetail {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub restaurant_pizzas: Vec<RestaurantPizzaItem>,
}

impl From<RestaurantDetails> for RestaurantDetail {
    fn from(details: RestaurantDetails) -> Self {
        Self {
            id: details.restaurant.id,
            name: details.restaurant.name,
            address: details.restaurant.address,
            restaurant_pizzas: details
                .pizzas
                .into_iter()
                .map(|(restaurant_pizza, pizza)| RestaurantPizzaItem {
                    id: pizza.id,
                    name: pizza.name,
                    ingredients: pizza.ingredients,
                    price: restaurant_pizza.price,
                })
                .collect(),
        }
    }
}

/// Absent or null fields deserialize to `None` and fail validation later.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    pub restaurant_id: Option<i64>,
    pub pizza_id: Option<i64>,
    /// Price between 1 and 30 inclusive
    pub price: Option<i32>,
}

impl From<CreateRestaurantPizzaRequest> for NewRestaurantPizzaInput {
    fn from(request: CreateRestaurantPizzaRequest) -> Self {
        Self {
            restaurant_id: request.restaurant_id,
            pizza_id: request.pizza_id,
            price: request.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaResponse {
    pub message: String,
    /// Unique identifier for the new restaurant pizza
    pub id: i64,
    pub price: i32,
    pub pizza_id: i64,
    pub restaurant_id: i64,
    pub pizza: Pizza,
    pub restaurant: Restaurant,
}

impl From<CreatedRestaurantPizza> for CreateRestaurantPizzaResponse {
    fn from(created: CreatedRestaurantPizza) -> Self {
        Self {
            message: "Restaurant pizza added successfully".to_string(),
            id: created.restaurant_pizza.id,
            price: created.restaurant_pizza.price,
            pizza_id: created.restaurant_pizza.pizza_id,
            restaurant_id: created.restaurant_pizza.restaurant_id,
            pizza: created.pizza.into(),
            restaurant: created.restaurant.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorsResponse {
    /// Error messages
    pub errors: Vec<String>,
}
