//! Product entity - Represents one catalog item and its aggregate stock.
//!
//! A product owns a tree of variants (see [`super::variant`]) and a ledger of
//! stock transactions (see [`super::stock_transaction`]). `total_stock` is a
//! materialized view of that ledger: it always equals the signed sum of the
//! product's transactions and is only ever changed together with a ledger
//! append, inside one database transaction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier, generated at creation time and never reused
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Caller-supplied product code (e.g., "PRD001"); not guaranteed unique
    pub product_code: String,
    /// Display name of the product
    pub product_name: String,
    /// Reference to the product image (URL or storage key)
    pub product_image: String,
    /// Identifier of the user who created the product
    pub created_user: Uuid,
    /// HSN classification code
    pub hsn_code: String,
    /// Whether the product is active in the catalog
    pub active: bool,
    /// Whether the product is marked as a favorite
    pub is_favorite: bool,
    /// Aggregate stock quantity; equals the signed sum of the ledger, never negative
    pub total_stock: i64,
    /// When the product was created
    pub create_date: DateTimeUtc,
    /// When the product (including its stock aggregate) was last modified
    pub update_date: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many variants
    #[sea_orm(has_many = "super::variant::Entity")]
    Variants,
    /// One product has many stock transactions
    #[sea_orm(has_many = "super::stock_transaction::Entity")]
    StockTransactions,
}

impl Related<super::variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
    }
}

impl Related<super::stock_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
