//! Core business logic - framework-agnostic catalog and stock ledger operations.
//!
//! The catalog module owns product creation and the hydrated read path; the
//! stock module owns the append-only ledger and the `total_stock` aggregate.
//! Everything here takes a `DatabaseConnection` and returns the crate `Result`,
//! leaving transport concerns (HTTP, serialization framing) to the caller.

pub mod catalog;
pub mod stock;

pub use catalog::{
    NewProduct, ProductWithVariants, VariantSpec, VariantWithOptions, create_product, get_product,
    list_products,
};
pub use stock::{add_stock, get_transactions_for_product, rebuild_total_stock, remove_stock};
