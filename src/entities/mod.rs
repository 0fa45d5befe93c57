//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod product;
pub mod stock_transaction;
pub mod variant;
pub mod variant_option;

// Re-export the entity types the rest of the crate works with
pub use product::Entity as Product;
pub use stock_transaction::{Entity as StockTransaction, TransactionType};
pub use variant::Entity as Variant;
pub use variant_option::Entity as VariantOption;
