//! Variant entity - Represents one named dimension of a product.
//!
//! A variant (e.g., "Size" or "Color") belongs to exactly one product and
//! groups a set of option values (see [`super::variant_option`]). The
//! `product_id` back-edge exists only for the relational join and is excluded
//! from serialized output to keep the externally visible tree acyclic.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Variant database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variants")]
pub struct Model {
    /// Unique identifier for the variant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the product this variant belongs to (not serialized)
    #[serde(skip_serializing)]
    pub product_id: Uuid,
    /// Name of the dimension (e.g., "Size", "Color")
    pub name: String,
}

/// Defines relationships between Variant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each variant belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// One variant has many options
    #[sea_orm(has_many = "super::variant_option::Entity")]
    Options,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::variant_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
