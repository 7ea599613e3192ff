//! # Sale Recorder
//!
//! Writes a [`SalePlan`] to the database.
//!
//! ## Write Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         record(plan)                                    │
//! │                                                                         │
//! │  1. customer    CustomerRef::Create → INSERT customers                  │
//! │  2. sale        INSERT sales                                            │
//! │  3. lines       for each line:                                          │
//! │                   INSERT sale_items                                     │
//! │                   UPDATE products SET stock_quantity -= qty             │
//! │  4. due         UPDATE customers SET total_due += shortfall             │
//! │                                                                         │
//! │  Each step is its own statement. There is no surrounding transaction:  │
//! │  if step 3 fails on the second line, the customer, the sale and the    │
//! │  first line stay written. The failing step is logged with the sale id  │
//! │  so the partial sale can be found and repaired.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{error, info, warn};

use crate::error::DbResult;
use crate::pool::Database;
use smstore_core::validation::new_id;
use smstore_core::{CustomerRef, PlannedLine, Sale, SaleItem, SalePlan};

/// Ids produced by a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSale {
    pub sale_id: String,
    /// The customer the sale was attached to, whether supplied or created.
    pub customer_id: Option<String>,
}

/// Runs the recording sequence against a [`Database`].
#[derive(Debug, Clone)]
pub struct SaleRecorder {
    db: Database,
}

impl SaleRecorder {
    pub fn new(db: Database) -> Self {
        SaleRecorder { db }
    }

    /// Records one sale.
    ///
    /// ## Errors
    /// The first failing statement's error. Writes made before it are kept.
    pub async fn record(&self, plan: &SalePlan) -> DbResult<RecordedSale> {
        let customer_id = self.resolve_customer(&plan.customer).await?;

        let sale = Sale {
            id: new_id(),
            sale_time: Utc::now(),
            total_amount: plan.total_amount,
            total_paid: plan.total_paid,
            payment_status: plan.payment_status,
            customer_id: customer_id.clone(),
        };

        self.db.sales().insert_sale(&sale).await.map_err(|e| {
            error!(step = "sale", error = %e, "Recording sale failed");
            e
        })?;

        for (index, line) in plan.lines.iter().enumerate() {
            self.record_line(&sale.id, line).await.map_err(|e| {
                error!(
                    step = "line",
                    sale_id = %sale.id,
                    line = index,
                    error = %e,
                    "Recording sale failed; sale is partially written"
                );
                e
            })?;
        }

        if let (Some(due), Some(id)) = (plan.due_increase(), customer_id.as_deref()) {
            let found = self.db.customers().add_due(id, due).await.map_err(|e| {
                error!(
                    step = "due",
                    sale_id = %sale.id,
                    customer_id = %id,
                    error = %e,
                    "Recording sale failed; sale is written but due is not"
                );
                e
            })?;
            if !found {
                warn!(sale_id = %sale.id, customer_id = %id, "Due not added: no such customer");
            }
        }

        info!(
            sale_id = %sale.id,
            total = %sale.total_amount,
            paid = %sale.total_paid,
            status = %sale.payment_status,
            lines = plan.lines.len(),
            "Sale recorded"
        );

        Ok(RecordedSale {
            sale_id: sale.id,
            customer_id,
        })
    }

    async fn resolve_customer(&self, customer: &CustomerRef) -> DbResult<Option<String>> {
        match customer {
            CustomerRef::None => Ok(None),
            CustomerRef::Existing(id) => Ok(Some(id.clone())),
            CustomerRef::Create(new) => {
                let created = self.db.customers().insert(new).await.map_err(|e| {
                    error!(step = "customer", error = %e, "Recording sale failed");
                    e
                })?;
                info!(customer_id = %created.id, name = %created.name, "Customer created at checkout");
                Ok(Some(created.id))
            }
        }
    }

    async fn record_line(&self, sale_id: &str, line: &PlannedLine) -> DbResult<()> {
        let item = SaleItem {
            id: new_id(),
            sale_id: sale_id.to_string(),
            product_id: line.product_id.clone(),
            quantity_sold: line.quantity,
            unit: line.unit.clone(),
            unit_price_at_sale: line.unit_price,
            final_line_price: line.line_total,
        };
        self.db.sales().add_item(&item).await?;

        if let Some(product_id) = &item.product_id {
            if !self.db.products().adjust_stock(product_id, -line.quantity).await? {
                warn!(sale_id = %sale_id, product_id = %product_id, "Stock not adjusted: no such product");
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
