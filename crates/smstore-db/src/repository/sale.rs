//! # Sale Repository
//!
//! Database operations for sales, sale items, and the sale reports.
//!
//! ## Read Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sale Read Paths                                  │
//! │                                                                         │
//! │  list_all()            history, newest first                           │
//! │  list_since(t)         dashboards ("today")                            │
//! │  with_items(id)        sale + its lines                                │
//! │  daily_summary()       GROUP BY substr(sale_time, 1, 10)               │
//! │  list_by_day(day)      sales in [day, day+1) + customer                │
//! │  detail(id)            sale + lines with product + customer            │
//! │                                                                         │
//! │  Joins are done as a second `WHERE id IN (...)` query and stitched     │
//! │  together in Rust, so every row type stays a plain FromRow struct.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `sale_time` is stored as RFC 3339 text in UTC, so string order is time
//! order and its first ten characters are the UTC calendar day.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use smstore_core::reports::utc_day_bounds;
use smstore_core::{
    DailySummary, Sale, SaleDetail, SaleItem, SaleItemDetail, SaleWithCustomer, SaleWithItems,
};

const SELECT_SALE: &str = r#"
    SELECT id, sale_time, total_amount, total_paid, payment_status, customer_id
    FROM sales
"#;

const SELECT_ITEM: &str = r#"
    SELECT
        id, sale_id, product_id, quantity_sold, unit,
        unit_price_at_sale, final_line_price
    FROM sale_items
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a sale header.
    pub async fn insert_sale(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, total = %sale.total_amount, status = %sale.payment_status, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, sale_time, total_amount, total_paid, payment_status, customer_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.sale_time)
        .bind(sale.total_amount)
        .bind(sale.total_paid)
        .bind(sale.payment_status)
        .bind(&sale.customer_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Adds a line to a sale.
    ///
    /// ## Snapshot Pattern
    /// The unit price is copied onto the item, so later price changes on
    /// the product do not rewrite history.
    pub async fn add_item(&self, item: &SaleItem) -> DbResult<()> {
        debug!(sale_id = %item.sale_id, product_id = ?item.product_id, "Adding sale item");

        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, product_id, quantity_sold, unit,
                unit_price_at_sale, final_line_price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(item.quantity_sold)
        .bind(&item.unit)
        .bind(item.unit_price_at_sale)
        .bind(item.final_line_price)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Full sales history, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let sql = format!("{SELECT_SALE} ORDER BY sale_time DESC");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = sales.len(), "Sales history loaded");
        Ok(sales)
    }

    /// Sales at or after `start`, newest first.
    pub async fn list_since(&self, start: DateTime<Utc>) -> DbResult<Vec<Sale>> {
        debug!(since = %start, "Listing sales since");

        let sql = format!("{SELECT_SALE} WHERE sale_time >= ?1 ORDER BY sale_time DESC");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(start)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Sales in `[start, end)`, newest first.
    pub async fn list_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "{SELECT_SALE} WHERE sale_time >= ?1 AND sale_time < ?2 ORDER BY sale_time DESC"
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("{SELECT_SALE} WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets all items for a sale, in the order they were rung up.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let sql = format!("{SELECT_ITEM} WHERE sale_id = ?1 ORDER BY rowid");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// A sale with its items. `Ok(None)` when the sale doesn't exist.
    pub async fn with_items(&self, id: &str) -> DbResult<Option<SaleWithItems>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(&sale.id).await?;

        Ok(Some(SaleWithItems { sale, items }))
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Totals per UTC calendar day, newest day first.
    pub async fn daily_summary(&self) -> DbResult<Vec<DailySummary>> {
        let rows = sqlx::query_as::<_, DailySummary>(
            r#"
            SELECT
                substr(sale_time, 1, 10) AS day,
                COALESCE(SUM(total_amount), 0) AS total_amount,
                COALESCE(SUM(total_paid), 0) AS total_paid,
                COUNT(*) AS order_count
            FROM sales
            GROUP BY day
            ORDER BY day DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(days = rows.len(), "Daily summary computed");
        Ok(rows)
    }

    /// Sales of one UTC day, newest first, each with its customer.
    ///
    /// A sale whose customer has since been deleted comes back without one.
    pub async fn list_by_day(&self, day: NaiveDate) -> DbResult<Vec<SaleWithCustomer>> {
        let (start, end) = utc_day_bounds(day);
        let sales = self.list_between(start, end).await?;

        let customer_ids: Vec<String> = sales
            .iter()
            .filter_map(|s| s.customer_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let customers: HashMap<String, _> = CustomerRepository::new(self.pool.clone())
            .get_many(&customer_ids)
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        debug!(%day, sales = sales.len(), customers = customers.len(), "Sales by day loaded");

        Ok(sales
            .into_iter()
            .map(|sale| {
                let customer = sale
                    .customer_id
                    .as_ref()
                    .and_then(|id| customers.get(id).cloned());
                SaleWithCustomer { sale, customer }
            })
            .collect())
    }

    /// Everything about one sale.
    ///
    /// Items whose product no longer exists are left out; the customer is
    /// `None` for walk-in sales or deleted customers.
    pub async fn detail(&self, id: &str) -> DbResult<Option<SaleDetail>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(&sale.id).await?;

        let product_ids: Vec<String> = items
            .iter()
            .filter_map(|i| i.product_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let products: HashMap<String, _> = ProductRepository::new(self.pool.clone())
            .get_many(&product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let items = items
            .into_iter()
            .filter_map(|item| {
                let product = products.get(item.product_id.as_deref()?)?.clone();
                Some(SaleItemDetail { item, product })
            })
            .collect();

        let customer = match sale.customer_id.as_deref() {
            Some(customer_id) => {
                CustomerRepository::new(self.pool.clone())
                    .get_by_id(customer_id)
                    .await?
            }
            None => None,
        };

        Ok(Some(SaleDetail {
            sale,
            items,
            customer,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::TimeZone;
    use smstore_core::validation::new_id;
    use smstore_core::{Money, NewCustomer, NewProduct, PaymentStatus, Quantity};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sale_at(time: DateTime<Utc>, total: i64, paid: i64, customer_id: Option<String>) -> Sale {
        Sale {
            id: new_id(),
            sale_time: time,
            total_amount: Money::from_taka(total),
            total_paid: Money::from_taka(paid),
            payment_status: if paid >= total {
                PaymentStatus::Paid
            } else {
                PaymentStatus::HalfPaid
            },
            customer_id,
        }
    }

    fn item(sale_id: &str, product_id: Option<String>) -> SaleItem {
        SaleItem {
            id: new_id(),
            sale_id: sale_id.to_string(),
            product_id,
            quantity_sold: Quantity::from_whole(2),
            unit: Some("KG".to_string()),
            unit_price_at_sale: Money::from_taka(35),
            final_line_price: Money::from_taka(70),
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let db = db().await;
        let repo = db.sales();
        let sale = sale_at(Utc::now(), 70, 70, None);
        repo.insert_sale(&sale).await.unwrap();
        repo.add_item(&item(&sale.id, None)).await.unwrap();

        let loaded = repo.with_items(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.sale.payment_status, PaymentStatus::Paid);
        assert_eq!(loaded.sale.total_amount, Money::from_taka(70));
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].quantity_sold, Quantity::from_whole(2));

        assert!(repo.with_items(&new_id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_item_requires_existing_sale() {
        let db = db().await;
        let result = db.sales().add_item(&item(&new_id(), None)).await;
        assert!(matches!(result, Err(crate::DbError::ForeignKeyViolation { .. })));
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let db = db().await;
        let repo = db.sales();
        let older = sale_at(Utc.with_ymd_and_hms(2025, 1, 30, 10, 0, 0).unwrap(), 10, 10, None);
        let newer = sale_at(Utc.with_ymd_and_hms(2025, 1, 31, 9, 0, 0).unwrap(), 20, 20, None);
        repo.insert_sale(&older).await.unwrap();
        repo.insert_sale(&newer).await.unwrap();

        let history = repo.list_all().await.unwrap();
        assert_eq!(history[0].id, newer.id);
        assert_eq!(history[1].id, older.id);

        let since = repo
            .list_since(Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap())
            .await
            .unwrap();
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_daily_summary_groups_by_utc_day() {
        let db = db().await;
        let repo = db.sales();
        for sale in [
            sale_at(Utc.with_ymd_and_hms(2025, 1, 30, 23, 59, 59).unwrap(), 100, 100, None),
            sale_at(Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap(), 70, 70, None),
            sale_at(Utc.with_ymd_and_hms(2025, 1, 31, 18, 30, 0).unwrap(), 480, 200, None),
        ] {
            repo.insert_sale(&sale).await.unwrap();
        }

        let summary = repo.daily_summary().await.unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].day, "2025-01-31");
        assert_eq!(summary[0].total_amount, Money::from_taka(550));
        assert_eq!(summary[0].total_paid, Money::from_taka(270));
        assert_eq!(summary[0].order_count, 2);
        assert_eq!(summary[1].day, "2025-01-30");
        assert_eq!(summary[1].order_count, 1);
    }

    #[tokio::test]
    async fn test_list_by_day_joins_customer() {
        let db = db().await;
        let repo = db.sales();
        let akter = db
            .customers()
            .insert(&NewCustomer {
                name: "Mrs. Akter".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let walk_in = sale_at(Utc.with_ymd_and_hms(2025, 1, 31, 8, 0, 0).unwrap(), 70, 70, None);
        let on_credit = sale_at(
            Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap(),
            480,
            0,
            Some(akter.id.clone()),
        );
        let next_day = sale_at(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(), 5, 5, None);
        for sale in [&walk_in, &on_credit, &next_day] {
            repo.insert_sale(sale).await.unwrap();
        }

        let day = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let listed = repo.list_by_day(day).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].sale.id, on_credit.id);
        assert_eq!(listed[0].customer.as_ref().map(|c| c.name.as_str()), Some("Mrs. Akter"));
        assert_eq!(listed[1].sale.id, walk_in.id);
        assert!(listed[1].customer.is_none());
    }

    #[tokio::test]
    async fn test_detail_skips_items_without_product() {
        let db = db().await;
        let potato = db
            .products()
            .insert(&NewProduct {
                name_en: "Potato".to_string(),
                base_price: Money::from_taka(35),
                ..Default::default()
            })
            .await
            .unwrap();

        let repo = db.sales();
        let sale = sale_at(Utc::now(), 140, 140, Some(new_id()));
        repo.insert_sale(&sale).await.unwrap();
        repo.add_item(&item(&sale.id, Some(potato.id.clone()))).await.unwrap();
        repo.add_item(&item(&sale.id, None)).await.unwrap();
        repo.add_item(&item(&sale.id, Some(new_id()))).await.unwrap();

        let detail = repo.detail(&sale.id).await.unwrap().unwrap();
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].product.name_en, "Potato");
        // customer id that matches nobody
        assert!(detail.customer.is_none());

        assert!(repo.detail(&new_id()).await.unwrap().is_none());
    }
}
