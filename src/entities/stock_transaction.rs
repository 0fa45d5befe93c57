//! StockTransaction entity - The append-only stock ledger.
//!
//! Each row records one signed stock mutation against a product: a positive
//! `quantity` together with a [`TransactionType`] of `Add` or `Remove`. Rows
//! are immutable once inserted and are only ever removed by the cascade when
//! the parent product is deleted. The autoincrement `id` doubles as the
//! monotonic sequence number of the ledger.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a stock mutation, stored as `"Add"` / `"Remove"`
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionType {
    /// Stock was added; counts as `+quantity` toward the aggregate
    #[sea_orm(string_value = "Add")]
    Add,
    /// Stock was removed; counts as `-quantity` toward the aggregate
    #[sea_orm(string_value = "Remove")]
    Remove,
}

/// Stock transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_transactions")]
pub struct Model {
    /// Monotonically assigned sequence identifier for the ledger
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the product this transaction belongs to
    pub product_id: Uuid,
    /// Free-text variant combination the mutation applies to (e.g., "M" or "Red/L");
    /// deliberately not validated against the catalog's variant tree
    pub variant_combination: String,
    /// Mutated quantity; always positive, signed by `transaction_type`
    pub quantity: i64,
    /// Whether this row added or removed stock
    pub transaction_type: TransactionType,
    /// When the transaction was recorded
    pub transaction_date: DateTimeUtc,
}

/// Defines relationships between StockTransaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Signed contribution of this row toward the product's `total_stock`.
    #[must_use]
    pub fn signed_quantity(&self) -> i64 {
        match self.transaction_type {
            TransactionType::Add => self.quantity,
            TransactionType::Remove => -self.quantity,
        }
    }
}
