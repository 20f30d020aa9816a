use std::ops::RangeInclusive;

use diesel::dsl::count_star;
use diesel::prelude::*;
use tracing::info;

use crate::db::{DbConnection, DbPool};
use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::RestaurantError;

/// Prices a restaurant may charge for a pizza, bounds included.
pub const PRICE_RANGE: RangeInclusive<i32> = 1..=30;

/// A restaurant with every pizza it offers, each paired with its price row.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantDetails {
    pub restaurant: Restaurant,
    pub pizzas: Vec<(RestaurantPizza, Pizza)>,
}

/// Unvalidated request to offer a pizza at a restaurant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRestaurantPizzaInput {
    pub restaurant_id: Option<i64>,
    pub pizza_id: Option<i64>,
    pub price: Option<i32>,
}

impl NewRestaurantPizzaInput {
    /// Checks presence first, then the price range. References are checked
    /// against storage by [`RestaurantService::add_restaurant_pizza`].
    pub fn validate(&self) -> Result<NewRestaurantPizza, RestaurantError> {
        let (Some(restaurant_id), Some(pizza_id), Some(price)) =
            (self.restaurant_id, self.pizza_id, self.price)
        else {
            return Err(RestaurantError::MissingFields);
        };

        if !PRICE_RANGE.contains(&price) {
            return Err(RestaurantError::PriceOutOfRange(price));
        }

        Ok(NewRestaurantPizza {
            price,
            pizza_id,
            restaurant_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRestaurantPizza {
    pub restaurant_pizza: RestaurantPizza,
    pub pizza: Pizza,
    pub restaurant: Restaurant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub restaurants: usize,
    pub pizzas: usize,
    pub restaurant_pizzas: usize,
}

const SEED_RESTAURANTS: [(&str, &str); 3] = [
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const SEED_PIZZAS: [(&str, &str); 3] = [
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price) into the seed arrays above.
const SEED_PRICES: [(usize, usize, i32); 3] = [(0, 0, 1), (1, 1, 4), (2, 2, 5)];

#[derive(Clone)]
pub struct RestaurantService {
    pool: DbPool,
}

impl RestaurantService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn conn(&self) -> Result<DbConnection, RestaurantError> {
        Ok(self.pool.get()?)
    }

    pub fn list_restaurants(&self) -> Result<Vec<Restaurant>, RestaurantError> {
        let conn = &mut self.conn()?;
        let results = restaurants::table
            .order(restaurants::id)
            .select(Restaurant::as_select())
            .load(conn)?;
        Ok(results)
    }

    pub fn get_restaurant(&self, restaurant_id: i64) -> Result<RestaurantDetails, RestaurantError> {
        let conn = &mut self.conn()?;
        let restaurant = restaurants::table
            .find(restaurant_id)
            .select(Restaurant::as_select())
            .first(conn)
            .optional()?
            .ok_or(RestaurantError::NotFound)?;

        let pizzas = RestaurantPizza::belonging_to(&restaurant)
            .inner_join(pizzas::table)
            .order(restaurant_pizzas::id)
            .select((RestaurantPizza::as_select(), Pizza::as_select()))
            .load::<(RestaurantPizza, Pizza)>(conn)?;

        Ok(RestaurantDetails { restaurant, pizzas })
    }

    /// Removes the restaurant; its restaurant_pizzas rows go with it through
    /// the `ON DELETE CASCADE` foreign key.
    pub fn delete_restaurant(&self, restaurant_id: i64) -> Result<(), RestaurantError> {
        let conn = &mut self.conn()?;
        conn.immediate_transaction::<_, RestaurantError, _>(|conn| {
            let deleted = diesel::delete(restaurants::table.find(restaurant_id)).execute(conn)?;
            if deleted == 0 {
                return Err(RestaurantError::NotFound);
            }
            Ok(())
        })?;

        info!(restaurant_id, "deleted restaurant");
        Ok(())
    }

    pub fn list_pizzas(&self) -> Result<Vec<Pizza>, RestaurantError> {
        let conn = &mut self.conn()?;
        let results = pizzas::table
            .order(pizzas::id)
            .select(Pizza::as_select())
            .load(conn)?;
        Ok(results)
    }

    pub fn add_restaurant_pizza(
        &self,
        input: NewRestaurantPizzaInput,
    ) -> Result<CreatedRestaurantPizza, RestaurantError> {
        let new_restaurant_pizza = input.validate()?;

        let conn = &mut self.conn()?;
        let created = conn.immediate_transaction::<_, RestaurantError, _>(|conn| {
            let restaurant = restaurants::table
                .find(new_restaurant_pizza.restaurant_id)
                .select(Restaurant::as_select())
                .first(conn)
                .optional()?;
            let pizza = pizzas::table
                .find(new_restaurant_pizza.pizza_id)
                .select(Pizza::as_select())
                .first(conn)
                .optional()?;

            let (Some(restaurant), Some(pizza)) = (restaurant, pizza) else {
                return Err(RestaurantError::InvalidReference);
            };

            let restaurant_pizza = diesel::insert_into(restaurant_pizzas::table)
                .values(&new_restaurant_pizza)
                .returning(RestaurantPizza::as_returning())
                .get_result(conn)?;

            Ok(CreatedRestaurantPizza {
                restaurant_pizza,
                pizza,
                restaurant,
            })
        })?;

        info!(
            id = created.restaurant_pizza.id,
            restaurant_id = created.restaurant.id,
            pizza_id = created.pizza.id,
            price = created.restaurant_pizza.price,
            "added restaurant pizza"
        );
        Ok(created)
    }

    /// Fills an empty database with sample restaurants, pizzas and prices.
    /// Does nothing when any restaurant already exists.
    pub fn seed(&self) -> Result<SeedReport, RestaurantError> {
        let conn = &mut self.conn()?;
        let report = conn.immediate_transaction::<_, RestaurantError, _>(|conn| {
            let existing = restaurants::table
                .select(count_star())
                .get_result::<i64>(conn)?;
            if existing > 0 {
                return Ok(SeedReport::default());
            }

            let mut seeded_restaurants = Vec::with_capacity(SEED_RESTAURANTS.len());
            for (name, address) in SEED_RESTAURANTS {
                let restaurant = diesel::insert_into(restaurants::table)
                    .values(NewRestaurant { name, address })
                    .returning(Restaurant::as_returning())
                    .get_result(conn)?;
                seeded_restaurants.push(restaurant);
            }

            let mut seeded_pizzas = Vec::with_capacity(SEED_PIZZAS.len());
            for (name, ingredients) in SEED_PIZZAS {
                let pizza = diesel::insert_into(pizzas::table)
                    .values(NewPizza { name, ingredients })
                    .returning(Pizza::as_returning())
                    .get_result(conn)?;
                seeded_pizzas.push(pizza);
            }

            let prices = SEED_PRICES
                .iter()
                .map(|&(r, p, price)| NewRestaurantPizza {
                    price,
                    pizza_id: seeded_pizzas[p].id,
                    restaurant_id: seeded_restaurants[r].id,
                })
                .collect::<Vec<_>>();
            let mut seeded_prices = 0;
            for price in &prices {
                seeded_prices += diesel::insert_into(restaurant_pizzas::table)
                    .values(price)
                    .execute(conn)?;
            }

            Ok(SeedReport {
                restaurants: seeded_restaurants.len(),
                pizzas: seeded_pizzas.len(),
                restaurant_pizzas: seeded_prices,
            })
        })?;

        info!(
            restaurants = report.restaurants,
            pizzas = report.pizzas,
            restaurant_pizzas = report.restaurant_pizzas,
            "seeded database"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{establish_pool, run_migrations, DatabaseConfig};

    fn setup_service() -> RestaurantService {
        let pool = establish_pool(&DatabaseConfig::in_memory()).unwrap();
        run_migrations(&pool).unwrap();
        RestaurantService::new(pool)
    }

    fn seeded_service() -> RestaurantService {
        let service = setup_service();
        service.seed().unwrap();
        service
    }

    fn restaurant_pizza_count(service: &RestaurantService, restaurant_id: i64) -> i64 {
        let conn = &mut service.pool().get().unwrap();
        restaurant_pizzas::table
            .filter(restaurant_pizzas::restaurant_id.eq(restaurant_id))
            .select(count_star())
            .get_result(conn)
            .unwrap()
    }

    fn input(restaurant_id: i64, pizza_id: i64, price: i32) -> NewRestaurantPizzaInput {
        NewRestaurantPizzaInput {
            restaurant_id: Some(restaurant_id),
            pizza_id: Some(pizza_id),
            price: Some(price),
        }
    }

    #[test]
    fn test_seed_only_fills_empty_database() {
        let service = setup_service();
        let report = service.seed().unwrap();
        assert_eq!(
            report,
            SeedReport {
                restaurants: 3,
                pizzas: 3,
                restaurant_pizzas: 3,
            }
        );

        assert_eq!(service.seed().unwrap(), SeedReport::default());
        assert_eq!(service.list_restaurants().unwrap().len(), 3);
        assert_eq!(service.list_pizzas().unwrap().len(), 3);
    }

    #[test]
    fn test_list_on_empty_database() {
        let service = setup_service();
        assert!(service.list_restaurants().unwrap().is_empty());
        assert!(service.list_pizzas().unwrap().is_empty());
    }

    #[test]
    fn test_list_restaurants_ordered_by_id() {
        let service = seeded_service();
        let restaurants = service.list_restaurants().unwrap();
        let ids = restaurants.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(restaurants[0].name, "Karen's Pizza Shack");
        assert_eq!(restaurants[0].address, "address1");
    }

    #[test]
    fn test_get_restaurant_with_pizzas() {
        let service = seeded_service();
        service.add_restaurant_pizza(input(1, 2, 12)).unwrap();
        service.add_restaurant_pizza(input(1, 2, 15)).unwrap();

        let details = service.get_restaurant(1).unwrap();
        assert_eq!(details.restaurant.name, "Karen's Pizza Shack");
        assert_eq!(details.pizzas.len() as i64, restaurant_pizza_count(&service, 1));

        let prices = details
            .pizzas
            .iter()
            .map(|(rp, pizza)| (pizza.name.as_str(), rp.price))
            .collect::<Vec<_>>();
        assert_eq!(prices, vec![("Emma", 1), ("Geri", 12), ("Geri", 15)]);
        assert!(details
            .pizzas
            .iter()
            .all(|(rp, pizza)| rp.pizza_id == pizza.id && rp.restaurant_id == 1));
    }

    #[test]
    fn test_get_restaurant_not_found() {
        let service = seeded_service();
        assert!(matches!(
            service.get_restaurant(999999),
            Err(RestaurantError::NotFound)
        ));
        // beyond the 32-bit range
        assert!(matches!(
            service.get_restaurant(99_999_999_999),
            Err(RestaurantError::NotFound)
        ));
        assert!(matches!(
            service.add_restaurant_pizza(input(99_999_999_999, 1, 10)),
            Err(RestaurantError::InvalidReference)
        ));
    }

    #[test]
    fn test_delete_restaurant_cascades() {
        let service = seeded_service();
        service.add_restaurant_pizza(input(2, 1, 9)).unwrap();
        assert_eq!(restaurant_pizza_count(&service, 2), 2);

        service.delete_restaurant(2).unwrap();

        assert_eq!(restaurant_pizza_count(&service, 2), 0);
        assert!(matches!(
            service.get_restaurant(2),
            Err(RestaurantError::NotFound)
        ));
        // pizzas are not owned by the restaurant
        assert_eq!(service.list_pizzas().unwrap().len(), 3);
        assert_eq!(restaurant_pizza_count(&service, 1), 1);
    }

    #[test]
    fn test_delete_restaurant_twice() {
        let service = seeded_service();
        service.delete_restaurant(3).unwrap();
        assert!(matches!(
            service.delete_restaurant(3),
            Err(RestaurantError::NotFound)
        ));
    }

    #[test]
    fn test_validate_missing_fields() {
        let missing = [
            NewRestaurantPizzaInput {
                restaurant_id: None,
                ..input(1, 1, 10)
            },
            NewRestaurantPizzaInput {
                pizza_id: None,
                ..input(1, 1, 10)
            },
            NewRestaurantPizzaInput {
                price: None,
                ..input(1, 1, 10)
            },
            NewRestaurantPizzaInput::default(),
        ];
        for i in missing {
            assert!(matches!(i.validate(), Err(RestaurantError::MissingFields)));
        }
    }

    #[test]
    fn test_missing_fields_checked_before_price() {
        let i = NewRestaurantPizzaInput {
            restaurant_id: None,
            ..input(1, 1, 100)
        };
        assert!(matches!(i.validate(), Err(RestaurantError::MissingFields)));
    }

    #[test]
    fn test_price_bounds() {
        for price in [0, 31, -5] {
            assert!(matches!(
                input(1, 1, price).validate(),
                Err(RestaurantError::PriceOutOfRange(p)) if p == price
            ));
        }
        for price in [1, 30] {
            assert_eq!(input(1, 1, price).validate().unwrap().price, price);
        }
    }

    #[test]
    fn test_price_checked_before_references() {
        let service = seeded_service();
        assert!(matches!(
            service.add_restaurant_pizza(input(999999, 1, 31)),
            Err(RestaurantError::PriceOutOfRange(31))
        ));
    }

    #[test]
    fn test_add_restaurant_pizza() {
        let service = seeded_service();
        let created = service.add_restaurant_pizza(input(1, 3, 30)).unwrap();

        assert_eq!(created.restaurant_pizza.price, 30);
        assert_eq!(created.restaurant_pizza.restaurant_id, 1);
        assert_eq!(created.restaurant_pizza.pizza_id, 3);
        assert_eq!(created.pizza.name, "Melanie");
        assert_eq!(created.restaurant.name, "Karen's Pizza Shack");

        let again = service.add_restaurant_pizza(input(1, 3, 30)).unwrap();
        assert_ne!(again.restaurant_pizza.id, created.restaurant_pizza.id);
        assert_eq!(restaurant_pizza_count(&service, 1), 3);
    }

    #[test]
    fn test_add_restaurant_pizza_invalid_reference() {
        let service = seeded_service();
        for (restaurant_id, pizza_id) in [(999999, 1), (1, 999999)] {
            assert!(matches!(
                service.add_restaurant_pizza(input(restaurant_id, pizza_id, 10)),
                Err(RestaurantError::InvalidReference)
            ));
        }
        assert_eq!(restaurant_pizza_count(&service, 1), 1);
    }

    #[test]
    fn test_storage_rejects_out_of_range_price() {
        let service = seeded_service();
        let conn = &mut service.pool().get().unwrap();
        let result = diesel::insert_into(restaurant_pizzas::table)
            .values(NewRestaurantPizza {
                price: 31,
                pizza_id: 1,
                restaurant_id: 1,
            })
            .execute(conn);
        assert!(result.is_err());
    }

    #[test]
    fn test_storage_rejects_unknown_restaurant() {
        let service = seeded_service();
        let conn = &mut service.pool().get().unwrap();
        let result = diesel::insert_into(restaurant_pizzas::table)
            .values(NewRestaurantPizza {
                price: 10,
                pizza_id: 1,
                restaurant_id: 999999,
            })
            .execute(conn);
        assert!(result.is_err());
    }

    #[test]
    fn test_concurrent_writers_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            database_url: dir.path().join("pizzas.db").to_str().unwrap().to_string(),
            pool_size: 5,
        };
        let pool = establish_pool(&config).unwrap();
        run_migrations(&pool).unwrap();
        let service = RestaurantService::new(pool);
        service.seed().unwrap();

        let failures = std::thread::scope(|scope| {
            let workers = (0..8)
                .map(|_| {
                    let service = service.clone();
                    scope.spawn(move || {
                        (0..25)
                            .filter_map(|_| service.add_restaurant_pizza(input(1, 1, 5)).err())
                            .map(|e| e.to_string())
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            workers
                .into_iter()
                .flat_map(|w| w.join().unwrap())
                .collect::<Vec<_>>()
        });

        assert!(failures.is_empty(), "failed writes: {failures:?}");
        assert_eq!(restaurant_pizza_count(&service, 1), 1 + 8 * 25);

        service.delete_restaurant(1).unwrap();
        assert_eq!(restaurant_pizza_count(&service, 1), 0);
    }
}
