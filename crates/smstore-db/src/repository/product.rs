//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations with partial updates
//! - The sellable listing used by the checkout grid
//! - Relative stock movements
//!
//! ## Stock Movements
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ Read, subtract in Rust, write back (two checkouts race)         │
//! │     UPDATE products SET stock_quantity = 98000 WHERE id = ?         │
//! │                                                                     │
//! │  ✅ Delta update inside one statement                               │
//! │     UPDATE products SET stock_quantity = stock_quantity - 2000      │
//! │                                                                     │
//! │  Two cashiers selling 2 KG and 3 KG at once: -2 + -3 = -5 total    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use smstore_core::validation::new_id;
use smstore_core::{NewProduct, Product, ProductPatch, Quantity, DEFAULT_UNIT};

const SELECT_PRODUCT: &str = r#"
    SELECT
        id, name_en, name_bn, is_packed, unit_type, base_price,
        stock_quantity, image_url, sellable, created_at, updated_at
    FROM products
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let grid = repo.list_sellable().await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        debug!("Listing products");

        let sql = format!("{SELECT_PRODUCT} ORDER BY rowid");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists products that can be put in a cart right now.
    ///
    /// ## Rules
    /// - `stock_quantity > 0`
    /// - `sellable` is not switched off
    /// - Sorted by English name, case-insensitive
    ///
    /// The `sellable` flag and the name order are applied on purpose, on
    /// top of the plain in-stock check, so the checkout grid never shows a
    /// product the owner has switched off.
    pub async fn list_sellable(&self) -> DbResult<Vec<Product>> {
        debug!("Listing sellable products");

        let sql = format!(
            "{SELECT_PRODUCT} WHERE stock_quantity > 0 AND sellable = 1 ORDER BY name_en COLLATE NOCASE"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Sellable products loaded");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Loads several products at once. Unknown ids are skipped.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(SELECT_PRODUCT);
        query.push(" WHERE id IN (");
        let mut list = query.separated(", ");
        for id in ids {
            list.push_bind(id.clone());
        }
        list.push_unseparated(")");

        let products = query.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// Missing `unit_type` becomes "KG" and missing `sellable` becomes true.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: new_id(),
            name_en: new.name_en.trim().to_string(),
            name_bn: new.name_bn.clone(),
            is_packed: new.is_packed,
            unit_type: new
                .unit_type
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            base_price: new.base_price,
            stock_quantity: new.stock_quantity,
            image_url: new.image_url.clone(),
            sellable: new.sellable.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name_en, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name_en, name_bn, is_packed, unit_type, base_price,
                stock_quantity, image_url, sellable, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name_en)
        .bind(&product.name_bn)
        .bind(product.is_packed)
        .bind(&product.unit_type)
        .bind(product.base_price)
        .bind(product.stock_quantity)
        .bind(&product.image_url)
        .bind(product.sellable)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Applies a partial update and returns the product as stored.
    ///
    /// Fields left `None` keep their value.
    ///
    /// ## Returns
    /// * `Ok(None)` - No product with that id
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Option<Product>> {
        debug!(id = %id, "Updating product");

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name_en = COALESCE(?2, name_en),
                name_bn = COALESCE(?3, name_bn),
                is_packed = COALESCE(?4, is_packed),
                unit_type = COALESCE(?5, unit_type),
                base_price = COALESCE(?6, base_price),
                stock_quantity = COALESCE(?7, stock_quantity),
                image_url = COALESCE(?8, image_url),
                sellable = COALESCE(?9, sellable),
                updated_at = ?10
            WHERE id = ?1
            RETURNING
                id, name_en, name_bn, is_packed, unit_type, base_price,
                stock_quantity, image_url, sellable, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name_en.as_deref().map(str::trim))
        .bind(&patch.name_bn)
        .bind(patch.is_packed)
        .bind(&patch.unit_type)
        .bind(patch.base_price)
        .bind(patch.stock_quantity)
        .bind(&patch.image_url)
        .bind(patch.sellable)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Moves stock by `delta` (negative for sales).
    ///
    /// Stock is allowed to go below zero.
    ///
    /// ## Returns
    /// `false` when no product has that id.
    pub async fn adjust_stock(&self, id: &str, delta: Quantity) -> DbResult<bool> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                stock_quantity = stock_quantity + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a product. Past sale items keep their `product_id`.
    ///
    /// ## Returns
    /// `false` when there was nothing to delete.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts products (for seeding and diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use smstore_core::Money;

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    fn onion() -> NewProduct {
        NewProduct {
            name_en: "Onion".to_string(),
            name_bn: Some("পেঁয়াজ".to_string()),
            unit_type: Some("KG".to_string()),
            base_price: Money::from_taka(70),
            stock_quantity: Quantity::from_whole(80),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let created = repo.insert(&onion()).await.unwrap();

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.name_en, "Onion");
        assert_eq!(loaded.name_bn.as_deref(), Some("পেঁয়াজ"));
        assert_eq!(loaded.base_price, Money::from_taka(70));
        assert_eq!(loaded.stock_quantity, Quantity::from_whole(80));
        assert!(loaded.sellable);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_defaults_unit_type() {
        let repo = repo().await;
        let created = repo
            .insert(&NewProduct {
                name_en: "Garlic".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.unit_type, "KG");
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let repo = repo().await;
        let missing = repo.get_by_id("550e8400-e29b-41d4-a716-446655440000").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_sellable_excludes_empty_and_hidden() {
        let repo = repo().await;
        let onion = repo.insert(&onion()).await.unwrap();
        repo.insert(&NewProduct {
            name_en: "Apple".to_string(),
            stock_quantity: Quantity::from_whole(5),
            ..Default::default()
        })
        .await
        .unwrap();
        repo.insert(&NewProduct {
            name_en: "banana".to_string(),
            stock_quantity: Quantity::from_whole(12),
            ..Default::default()
        })
        .await
        .unwrap();
        repo.insert(&NewProduct {
            name_en: "Empty Shelf".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        repo.insert(&NewProduct {
            name_en: "Hidden".to_string(),
            stock_quantity: Quantity::from_whole(3),
            sellable: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

        let names: Vec<String> = repo
            .list_sellable()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name_en)
            .collect();
        // stocked and switched on, names compared without case
        assert_eq!(names, vec!["Apple", "banana", "Onion"]);

        repo.adjust_stock(&onion.id, -Quantity::from_whole(80)).await.unwrap();
        let sellable = repo.list_sellable().await.unwrap();
        assert!(sellable.iter().all(|p| p.stock_quantity.is_positive()));
        assert_eq!(sellable.len(), 2);
        assert_eq!(repo.list_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = repo().await;
        let created = repo.insert(&onion()).await.unwrap();

        let patch = ProductPatch {
            base_price: Some(Money::from_taka(75)),
            ..Default::default()
        };
        let updated = repo.update(&created.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.base_price, Money::from_taka(75));
        assert_eq!(updated.name_en, "Onion");
        assert_eq!(updated.stock_quantity, Quantity::from_whole(80));

        let missing = repo
            .update("550e8400-e29b-41d4-a716-446655440000", &patch)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_adjust_stock_fractional_and_negative() {
        let repo = repo().await;
        let created = repo.insert(&onion()).await.unwrap();

        assert!(repo.adjust_stock(&created.id, -Quantity::from_milli(1500)).await.unwrap());
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock_quantity, Quantity::from_milli(78_500));

        // overselling is recorded, not refused
        repo.adjust_stock(&created.id, -Quantity::from_whole(100)).await.unwrap();
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock_quantity, Quantity::from_milli(-21_500));

        assert!(!repo.adjust_stock("nope", Quantity::ONE).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_and_get_many() {
        let repo = repo().await;
        let a = repo.insert(&onion()).await.unwrap();
        let b = repo.insert(&onion()).await.unwrap();

        let both = repo.get_many(&[a.id.clone(), b.id.clone(), "nope".to_string()]).await.unwrap();
        assert_eq!(both.len(), 2);

        assert!(repo.delete(&a.id).await.unwrap());
        assert!(!repo.delete(&a.id).await.unwrap());

        let remaining = repo.list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
        assert!(repo.get_many(&[]).await.unwrap().is_empty());
    }
}
