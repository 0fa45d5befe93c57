//! Catalog business logic - product creation and the hydrated read path.
//!
//! Products are created together with their entire variant tree in a single
//! database transaction; a failure anywhere in the tree write leaves nothing
//! behind. Reads always return the full tree (product, variants, options) -
//! a product without its variants is not a valid response. Listing is
//! offset/limit paginated over a stable order so pages never overlap or gap.

use crate::{
    config::settings::AppConfig,
    entities::{Product, Variant, VariantOption, product, variant, variant_option},
    errors::{Error, Result},
};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// One variant dimension in a creation request: a name plus its option values.
/// An empty option list is allowed; a blank name is a caller error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSpec {
    /// Name of the dimension (e.g., "Size")
    pub name: String,
    /// Option values for the dimension (e.g., `["S", "M", "L"]`)
    pub options: Vec<String>,
}

/// Creation request for a product and its variant tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    /// Caller-supplied product code; must be non-blank
    pub product_code: String,
    /// Display name; must be non-blank
    pub product_name: String,
    /// Reference to the product image
    pub product_image: String,
    /// Identifier of the creating user
    pub created_user: Uuid,
    /// HSN classification code
    pub hsn_code: String,
    /// Variant dimensions to create with the product
    pub variants: Vec<VariantSpec>,
}

/// A variant together with its hydrated options; the externally visible shape
/// carries only the forward tree (the `variant_id` back-edges are skipped)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantWithOptions {
    /// The variant row itself
    #[serde(flatten)]
    pub variant: variant::Model,
    /// All options of this variant, in insertion order
    pub options: Vec<variant_option::Model>,
}

/// A product together with its fully hydrated variant tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithVariants {
    /// The product row itself
    #[serde(flatten)]
    pub product: product::Model,
    /// All variants of this product, each with its options
    pub variants: Vec<VariantWithOptions>,
}

/// Creates a new product together with its entire variant tree, atomically.
///
/// Validates that the trimmed product code and name are non-empty before
/// touching the database. The product row, every variant, and every option are
/// written inside one database transaction; if any write fails (including a
/// blank variant name discovered mid-tree) the transaction rolls back and no
/// row is visible. The new product starts with `total_stock = 0`, `active`,
/// not favorite, and both timestamps set to now.
///
/// # Errors
/// Returns an error if:
/// - The product name or code is empty or whitespace-only
/// - Any variant name is empty or whitespace-only
/// - A database write fails
pub async fn create_product(
    db: &DatabaseConnection,
    new_product: NewProduct,
) -> Result<ProductWithVariants> {
    if new_product.product_name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if new_product.product_code.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product code cannot be empty".to_string(),
        });
    }

    let now = chrono::Utc::now();
    let id = Uuid::new_v4();

    // Use a transaction so the product and its whole tree commit or nothing does
    let txn = db.begin().await?;

    let product_model = product::ActiveModel {
        id: Set(id),
        product_code: Set(new_product.product_code.trim().to_string()),
        product_name: Set(new_product.product_name.trim().to_string()),
        product_image: Set(new_product.product_image),
        created_user: Set(new_product.created_user),
        hsn_code: Set(new_product.hsn_code),
        active: Set(true),
        is_favorite: Set(false),
        total_stock: Set(0),
        create_date: Set(now),
        update_date: Set(now),
    };
    let product_row = product_model.insert(&txn).await?;

    let mut variants = Vec::with_capacity(new_product.variants.len());
    for spec in new_product.variants {
        // Checked inside the transaction: a bad spec mid-tree rolls everything back
        if spec.name.trim().is_empty() {
            return Err(Error::Validation {
                message: "Variant name cannot be empty".to_string(),
            });
        }

        let variant_model = variant::ActiveModel {
            product_id: Set(id),
            name: Set(spec.name.trim().to_string()),
            ..Default::default()
        };
        let variant_row = variant_model.insert(&txn).await?;

        let mut options = Vec::with_capacity(spec.options.len());
        for option_value in spec.options {
            let option_model = variant_option::ActiveModel {
                variant_id: Set(variant_row.id),
                option_value: Set(option_value),
                ..Default::default()
            };
            options.push(option_model.insert(&txn).await?);
        }

        variants.push(VariantWithOptions {
            variant: variant_row,
            options,
        });
    }

    txn.commit().await?;

    info!(
        product_id = %product_row.id,
        product_code = %product_row.product_code,
        variant_count = variants.len(),
        "Created product"
    );

    Ok(ProductWithVariants {
        product: product_row,
        variants,
    })
}

/// Retrieves a product with its full variant tree hydrated.
///
/// # Errors
/// Returns `Error::ProductNotFound` if the identifier is unknown, or a
/// database error if a query fails.
pub async fn get_product(db: &DatabaseConnection, id: Uuid) -> Result<ProductWithVariants> {
    let product_row = Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id })?;

    let mut trees = hydrate_trees(db, vec![product_row]).await?;
    // hydrate_trees returns exactly one tree per input product
    trees.pop().ok_or(Error::ProductNotFound { id })
}

/// Lists products in a stable order (creation time ascending, id as tiebreak)
/// with offset/limit pagination, each fully hydrated.
///
/// Out-of-range paging inputs are normalized instead of rejected: `page < 1`
/// becomes 1 and `page_size < 1` becomes `settings.default_page_size`, keeping
/// the read path total. `page_size` is capped at `settings.max_page_size`.
///
/// # Errors
/// Returns a database error if a query fails.
pub async fn list_products(
    db: &DatabaseConnection,
    settings: &AppConfig,
    page: u64,
    page_size: u64,
) -> Result<Vec<ProductWithVariants>> {
    let page = page.max(1);
    let page_size = if page_size < 1 {
        settings.default_page_size
    } else {
        page_size.min(settings.max_page_size)
    };

    debug!(page, page_size, "Listing products");

    let products = Product::find()
        .order_by_asc(product::Column::CreateDate)
        .order_by_asc(product::Column::Id)
        .offset((page - 1) * page_size)
        .limit(page_size)
        .all(db)
        .await?;

    hydrate_trees(db, products).await
}

/// Assembles the full variant tree for a batch of products in two queries
/// (all variants, then all options), avoiding per-row round trips.
async fn hydrate_trees<C: ConnectionTrait>(
    db: &C,
    products: Vec<product::Model>,
) -> Result<Vec<ProductWithVariants>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let variants = Variant::find()
        .filter(variant::Column::ProductId.is_in(product_ids))
        .order_by_asc(variant::Column::Id)
        .all(db)
        .await?;

    let variant_ids: Vec<i64> = variants.iter().map(|v| v.id).collect();
    let options = if variant_ids.is_empty() {
        Vec::new()
    } else {
        VariantOption::find()
            .filter(variant_option::Column::VariantId.is_in(variant_ids))
            .order_by_asc(variant_option::Column::Id)
            .all(db)
            .await?
    };

    let mut options_by_variant: HashMap<i64, Vec<variant_option::Model>> = HashMap::new();
    for option in options {
        options_by_variant
            .entry(option.variant_id)
            .or_default()
            .push(option);
    }

    let mut variants_by_product: HashMap<Uuid, Vec<VariantWithOptions>> = HashMap::new();
    for variant_row in variants {
        let options = options_by_variant
            .remove(&variant_row.id)
            .unwrap_or_default();
        variants_by_product
            .entry(variant_row.product_id)
            .or_default()
            .push(VariantWithOptions {
                variant: variant_row,
                options,
            });
    }

    Ok(products
        .into_iter()
        .map(|product_row| {
            let variants = variants_by_product
                .remove(&product_row.id)
                .unwrap_or_default();
            ProductWithVariants {
                product: product_row,
                variants,
            }
        })
        .collect())
}
