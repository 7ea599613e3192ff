//! # Customer Repository
//!
//! Database operations for customers and their running due.
//!
//! A customer's `total_due` moves two ways:
//! - `add_due` adds a sale's shortfall (relative, safe under concurrency)
//! - `set_due` overwrites it when the shop settles up by hand

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use smstore_core::validation::new_id;
use smstore_core::{Customer, CustomerPatch, Money, NewCustomer};

const SELECT_CUSTOMER: &str = "SELECT id, name, phone, total_due, created_at FROM customers";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists every customer in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        debug!("Listing customers");

        let sql = format!("{SELECT_CUSTOMER} ORDER BY rowid");
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Lists customers who owe money (`total_due > 0`).
    pub async fn list_unpaid(&self) -> DbResult<Vec<Customer>> {
        let sql = format!("{SELECT_CUSTOMER} WHERE total_due > 0 ORDER BY rowid");
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = customers.len(), "Unpaid customers loaded");
        Ok(customers)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("{SELECT_CUSTOMER} WHERE id = ?1");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Loads several customers at once. Unknown ids are skipped.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Customer>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(SELECT_CUSTOMER);
        query.push(" WHERE id IN (");
        let mut list = query.separated(", ");
        for id in ids {
            list.push_bind(id.clone());
        }
        list.push_unseparated(")");

        let customers = query.build_query_as::<Customer>().fetch_all(&self.pool).await?;
        Ok(customers)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, new: &NewCustomer) -> DbResult<Customer> {
        let customer = Customer {
            id: new_id(),
            name: new.name.trim().to_string(),
            phone: new.phone.clone(),
            total_due: new.total_due,
            created_at: Utc::now(),
        };

        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, total_due, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.total_due)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Applies a partial update. `Ok(None)` when the id is unknown.
    pub async fn update(&self, id: &str, patch: &CustomerPatch) -> DbResult<Option<Customer>> {
        debug!(id = %id, "Updating customer");

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name = COALESCE(?2, name),
                phone = COALESCE(?3, phone),
                total_due = COALESCE(?4, total_due)
            WHERE id = ?1
            RETURNING id, name, phone, total_due, created_at
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref().map(str::trim))
        .bind(&patch.phone)
        .bind(patch.total_due)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Overwrites the due. `Ok(None)` when the id is unknown.
    pub async fn set_due(&self, id: &str, due: Money) -> DbResult<Option<Customer>> {
        debug!(id = %id, due = %due, "Setting customer due");

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET total_due = ?2
            WHERE id = ?1
            RETURNING id, name, phone, total_due, created_at
            "#,
        )
        .bind(id)
        .bind(due)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Adds `amount` to the due in one statement.
    ///
    /// ## Returns
    /// `false` when no customer has that id.
    pub async fn add_due(&self, id: &str, amount: Money) -> DbResult<bool> {
        debug!(id = %id, amount = %amount, "Adding to customer due");

        let result = sqlx::query("UPDATE customers SET total_due = total_due + ?2 WHERE id = ?1")
            .bind(id)
            .bind(amount)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a customer. Their past sales keep the `customer_id`.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
