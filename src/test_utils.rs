//! Shared test utilities for the inventory core.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test products with sensible defaults.

use crate::{
    core::catalog::{self, NewProduct, ProductWithVariants, VariantSpec},
    errors::Result,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
///
/// The pool is pinned to a single connection: every pooled connection to
/// `sqlite::memory:` opens its own independent database, so a larger pool
/// would hand concurrent tasks different (empty) databases.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a `NewProduct` request with sensible defaults: one "Size" variant
/// with options S/M/L, a placeholder image, and a fresh creator id.
#[must_use]
pub fn new_test_product(code: &str, name: &str) -> NewProduct {
    NewProduct {
        product_code: code.to_string(),
        product_name: name.to_string(),
        product_image: "https://example.com/image.png".to_string(),
        created_user: Uuid::new_v4(),
        hsn_code: "6109".to_string(),
        variants: vec![VariantSpec {
            name: "Size".to_string(),
            options: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        }],
    }
}

/// Creates and persists a test product with the default variant tree.
pub async fn create_test_product(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
) -> Result<ProductWithVariants> {
    catalog::create_product(db, new_test_product(code, name)).await
}
