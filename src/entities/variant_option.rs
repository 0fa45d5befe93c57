//! VariantOption entity - Represents one concrete value of a variant.
//!
//! An option (e.g., "Large" under "Size") belongs to exactly one variant. The
//! catalog does not model which combinations of options across variants are
//! valid; stock mutations carry a free-form combination string instead.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Variant option database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variant_options")]
pub struct Model {
    /// Unique identifier for the option
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the variant this option belongs to (not serialized)
    #[serde(skip_serializing)]
    pub variant_id: i64,
    /// The option value itself (e.g., "Large", "Blue")
    pub option_value: String,
}

/// Defines relationships between VariantOption and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each option belongs to one variant
    #[sea_orm(
        belongs_to = "super::variant::Entity",
        from = "Column::VariantId",
        to = "super::variant::Column::Id",
        on_delete = "Cascade"
    )]
    Variant,
}

impl Related<super::variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
