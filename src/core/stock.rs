//! Stock ledger business logic - the add/remove mutation path and audit reads.
//!
//! Every mutation runs as one database transaction: load the product, apply an
//! atomic column-expression update to `total_stock`, append the ledger row,
//! commit. The aggregate is never read-modify-written in the application, so
//! concurrent mutations against the same product cannot lose updates; a Remove
//! additionally guards the update with a `total_stock >= quantity` predicate
//! so a racing Remove cannot drive the aggregate negative. A rejected
//! operation leaves both the aggregate and the ledger untouched.

use crate::{
    entities::{Product, StockTransaction, TransactionType, product, stock_transaction},
    errors::{Error, Result},
};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

fn validate_mutation(variant_combination: &str, quantity: i64) -> Result<()> {
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    if variant_combination.trim().is_empty() {
        return Err(Error::Validation {
            message: "Variant combination cannot be empty".to_string(),
        });
    }

    Ok(())
}

async fn append_ledger_row<C: ConnectionTrait>(
    txn: &C,
    product_id: Uuid,
    variant_combination: &str,
    quantity: i64,
    transaction_type: TransactionType,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<stock_transaction::Model> {
    let row = stock_transaction::ActiveModel {
        product_id: Set(product_id),
        variant_combination: Set(variant_combination.to_string()),
        quantity: Set(quantity),
        transaction_type: Set(transaction_type),
        transaction_date: Set(now),
        ..Default::default()
    };
    row.insert(txn).await.map_err(Into::into)
}

async fn current_total<C: ConnectionTrait>(txn: &C, product_id: Uuid) -> Result<i64> {
    Product::find_by_id(product_id)
        .one(txn)
        .await?
        .map(|p| p.total_stock)
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Adds stock to a product and appends the matching ledger row, atomically.
///
/// The aggregate update is a single SQL statement
/// (`total_stock = total_stock + quantity`), so concurrent mutations against
/// the same product serialize at the database instead of clobbering each
/// other's reads. The `variant_combination` is free text and deliberately not
/// validated against the product's variant tree.
///
/// # Errors
/// Returns an error if:
/// - `quantity` is not a positive integer
/// - `variant_combination` is empty or whitespace-only
/// - The product does not exist
/// - A database write fails (nothing is committed in that case)
///
/// # Returns
/// The new `total_stock` after the mutation.
pub async fn add_stock(
    db: &DatabaseConnection,
    product_id: Uuid,
    variant_combination: &str,
    quantity: i64,
) -> Result<i64> {
    validate_mutation(variant_combination, quantity)?;

    // Aggregate update and ledger append commit together or not at all
    let txn = db.begin().await?;

    let _product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let now = chrono::Utc::now();

    Product::update_many()
        .col_expr(
            product::Column::TotalStock,
            Expr::col(product::Column::TotalStock).add(quantity),
        )
        .col_expr(product::Column::UpdateDate, Expr::value(now))
        .filter(product::Column::Id.eq(product_id))
        .exec(&txn)
        .await?;

    append_ledger_row(
        &txn,
        product_id,
        variant_combination,
        quantity,
        TransactionType::Add,
        now,
    )
    .await?;

    let new_total = current_total(&txn, product_id).await?;
    txn.commit().await?;

    info!(%product_id, quantity, new_total, "Added stock");
    Ok(new_total)
}

/// Removes stock from a product and appends the matching ledger row, atomically.
///
/// A removal that would drive `total_stock` below zero is rejected with
/// `InsufficientStock` and leaves both the aggregate and the ledger unchanged.
/// The balance check is performed twice: once against the loaded product for a
/// precise error, and again as a `total_stock >= quantity` predicate on the
/// UPDATE itself, which catches a concurrent removal that drained the balance
/// after the first check.
///
/// # Errors
/// Returns an error if:
/// - `quantity` is not a positive integer
/// - `variant_combination` is empty or whitespace-only
/// - The product does not exist
/// - `quantity` exceeds the current `total_stock`
/// - A database write fails (nothing is committed in that case)
///
/// # Returns
/// The new `total_stock` after the mutation.
pub async fn remove_stock(
    db: &DatabaseConnection,
    product_id: Uuid,
    variant_combination: &str,
    quantity: i64,
) -> Result<i64> {
    validate_mutation(variant_combination, quantity)?;

    let txn = db.begin().await?;

    let product_row = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if product_row.total_stock < quantity {
        // Dropping the transaction rolls it back; nothing was written
        return Err(Error::InsufficientStock {
            available: product_row.total_stock,
            requested: quantity,
        });
    }

    let now = chrono::Utc::now();

    let update = Product::update_many()
        .col_expr(
            product::Column::TotalStock,
            Expr::col(product::Column::TotalStock).sub(quantity),
        )
        .col_expr(product::Column::UpdateDate, Expr::value(now))
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::TotalStock.gte(quantity))
        .exec(&txn)
        .await?;

    if update.rows_affected == 0 {
        // A concurrent removal won the race since our balance check
        return Err(Error::InsufficientStock {
            available: product_row.total_stock,
            requested: quantity,
        });
    }

    append_ledger_row(
        &txn,
        product_id,
        variant_combination,
        quantity,
        TransactionType::Remove,
        now,
    )
    .await?;

    let new_total = current_total(&txn, product_id).await?;
    txn.commit().await?;

    info!(%product_id, quantity, new_total, "Removed stock");
    Ok(new_total)
}

/// Retrieves the full ledger for a product in sequence order (oldest first).
///
/// This is the audit trail: replaying the signed quantities of these rows
/// reproduces the product's `total_stock` exactly.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn get_transactions_for_product(
    db: &DatabaseConnection,
    product_id: Uuid,
) -> Result<Vec<stock_transaction::Model>> {
    StockTransaction::find()
        .filter(stock_transaction::Column::ProductId.eq(product_id))
        .order_by_asc(stock_transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Recomputes a product's `total_stock` from its ledger and stores it.
///
/// The aggregate is a materialized view of the ledger; this is the recovery
/// procedure for repairing it after outside interference, by replaying the
/// signed quantities of every transaction in sequence order.
///
/// # Errors
/// Returns `Error::ProductNotFound` if the product does not exist, or a
/// database error if a query or write fails.
///
/// # Returns
/// The rebuilt `total_stock`.
pub async fn rebuild_total_stock(db: &DatabaseConnection, product_id: Uuid) -> Result<i64> {
    let txn = db.begin().await?;

    let _product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let rows = StockTransaction::find()
        .filter(stock_transaction::Column::ProductId.eq(product_id))
        .order_by_asc(stock_transaction::Column::Id)
        .all(&txn)
        .await?;

    let total: i64 = rows.iter().map(stock_transaction::Model::signed_quantity).sum();

    Product::update_many()
        .col_expr(product::Column::TotalStock, Expr::value(total))
        .col_expr(product::Column::UpdateDate, Expr::value(chrono::Utc::now()))
        .filter(product::Column::Id.eq(product_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    info!(%product_id, total, ledger_rows = rows.len(), "Rebuilt total stock from ledger");
    Ok(total)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_product, setup_test_db};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_mutation_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let id = Uuid::new_v4();

        // Zero quantity
        let result = add_stock(&db, id, "M", 0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidQuantity { quantity: 0 }
        ));

        // Negative quantity
        let result = remove_stock(&db, id, "M", -5).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidQuantity { quantity: -5 }
        ));

        // Blank variant combination
        let result = add_stock(&db, id, "   ", 1).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_stock_mutation_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let missing = Uuid::new_v4();
        let result = add_stock(&db, missing, "M", 5).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id } if id == missing
        ));

        let result = remove_stock(&db, missing, "M", 5).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id } if id == missing
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_shirt_scenario() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_product(&db, "PRD001", "Shirt").await?;
        let id = created.product.id;

        let total = add_stock(&db, id, "M", 10).await?;
        assert_eq!(total, 10);
        assert_eq!(get_transactions_for_product(&db, id).await?.len(), 1);

        let total = remove_stock(&db, id, "M", 4).await?;
        assert_eq!(total, 6);
        assert_eq!(get_transactions_for_product(&db, id).await?.len(), 2);

        // Over-removal is rejected and leaves both aggregate and ledger untouched
        let result = remove_stock(&db, id, "M", 100).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock {
                available: 6,
                requested: 100
            }
        ));

        let product_row = Product::find_by_id(id).one(&db).await?.unwrap();
        assert_eq!(product_row.total_stock, 6);
        assert_eq!(get_transactions_for_product(&db, id).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_from_empty_product_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_product(&db, "PRD001", "Empty").await?;
        let result = remove_stock(&db, created.product.id, "M", 1).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock {
                available: 0,
                requested: 1
            }
        ));

        // Rejection appended nothing
        assert!(
            get_transactions_for_product(&db, created.product.id)
                .await?
                .is_empty()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_ledger_aggregate_consistency() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_product(&db, "PRD001", "Shirt").await?;
        let id = created.product.id;

        add_stock(&db, id, "S", 7).await?;
        add_stock(&db, id, "M", 12).await?;
        remove_stock(&db, id, "S", 3).await?;
        add_stock(&db, id, "L", 1).await?;
        remove_stock(&db, id, "M", 9).await?;

        // The aggregate equals the signed ledger sum computed independently
        let ledger_sum: i64 = get_transactions_for_product(&db, id)
            .await?
            .iter()
            .map(stock_transaction::Model::signed_quantity)
            .sum();
        let product_row = Product::find_by_id(id).one(&db).await?.unwrap();
        assert_eq!(product_row.total_stock, ledger_sum);
        assert_eq!(product_row.total_stock, 8);

        Ok(())
    }

    async fn run_concurrent_adds(n: usize) -> Result<()> {
        // `DatabaseConnection` is not `Clone` when the `mock` feature is
        // enabled, so share it across tasks behind an `Arc`.
        let db = std::sync::Arc::new(setup_test_db().await?);

        let created = create_test_product(&db, "PRD001", "Widget").await?;
        let id = created.product.id;

        let mut handles = Vec::with_capacity(n);
        for _ in 0..n {
            let task_db = std::sync::Arc::clone(&db);
            handles.push(tokio::spawn(
                async move { add_stock(&task_db, id, "default", 1).await },
            ));
        }
        for handle in handles {
            handle.await.unwrap()?;
        }

        let product_row = Product::find_by_id(id).one(db.as_ref()).await?.unwrap();
        assert_eq!(product_row.total_stock, i64::try_from(n).unwrap());
        assert_eq!(get_transactions_for_product(&db, id).await?.len(), n);

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_adds_do_not_lose_updates() -> Result<()> {
        // Repeated runs to catch interleavings
        for _ in 0..5 {
            run_concurrent_adds(2).await?;
        }
        for _ in 0..5 {
            run_concurrent_adds(10).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_adds_large() -> Result<()> {
        run_concurrent_adds(100).await
    }

    #[tokio::test]
    async fn test_rebuild_total_stock_repairs_aggregate() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_product(&db, "PRD001", "Shirt").await?;
        let id = created.product.id;

        add_stock(&db, id, "M", 10).await?;
        remove_stock(&db, id, "M", 4).await?;

        // Corrupt the aggregate behind the ledger's back
        Product::update_many()
            .col_expr(product::Column::TotalStock, Expr::value(999_i64))
            .filter(product::Column::Id.eq(id))
            .exec(&db)
            .await?;

        let rebuilt = rebuild_total_stock(&db, id).await?;
        assert_eq!(rebuilt, 6);

        let product_row = Product::find_by_id(id).one(&db).await?.unwrap();
        assert_eq!(product_row.total_stock, 6);

        Ok(())
    }

    #[tokio::test]
    async fn test_rebuild_total_stock_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let missing = Uuid::new_v4();
        let result = rebuild_total_stock(&db, missing).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id } if id == missing
        ));

        Ok(())
    }
}
