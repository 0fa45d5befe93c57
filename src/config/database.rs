//! Database configuration module for the inventory service.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to generate SQL statements from the entity
//! models, ensuring that the database schema matches the Rust struct definitions without
//! requiring manual SQL.

use crate::entities::{Product, StockTransaction, Variant, VariantOption};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/product_inventory.sqlite".to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust
/// struct definitions. It creates tables for products, variants, variant options,
/// and stock transactions, with cascading deletes along the Product → Variant →
/// VariantOption and Product → StockTransaction edges.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    let mut variant_table = schema.create_table_from_entity(Variant);
    let mut option_table = schema.create_table_from_entity(VariantOption);
    let mut transaction_table = schema.create_table_from_entity(StockTransaction);

    db.execute(builder.build(product_table.if_not_exists())).await?;
    db.execute(builder.build(variant_table.if_not_exists())).await?;
    db.execute(builder.build(option_table.if_not_exists())).await?;
    db.execute(builder.build(transaction_table.if_not_exists())).await?;

    // SQLite honours the ON DELETE CASCADE clauses only with foreign keys on;
    // sqlx's SQLite driver sets that pragma on every connection it opens, so
    // no per-connection PRAGMA is needed here.
    Ok(())
}
