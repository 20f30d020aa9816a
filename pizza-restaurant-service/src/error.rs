use thiserror::Error;

/// Failures of the restaurant storage operations.
///
/// The messages of the client-facing variants are the ones returned over HTTP.
#[derive(Error, Debug)]
pub enum RestaurantError {
    #[error("Restaurant not found")]
    NotFound,
    #[error("Missing required fields")]
    MissingFields,
    #[error("validation errors")]
    PriceOutOfRange(i32),
    #[error("Invalid restaurant or pizza ID")]
    InvalidReference,
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(String),
}
