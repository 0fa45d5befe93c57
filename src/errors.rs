//! Unified error types for the inventory core.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants are
//! deliberately distinct so callers can tell bad input (`Validation`,
//! `InvalidQuantity`) from a well-formed request against a missing target
//! (`ProductNotFound`) and from a business-rule rejection
//! (`InsufficientStock`). Persistence failures are never swallowed; they
//! surface as `Database`.

use thiserror::Error;
use uuid::Uuid;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Quantity must be a positive integer, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    #[error("Product {id} not found")]
    ProductNotFound { id: Uuid },

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
