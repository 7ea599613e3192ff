//! # Domain Types
//!
//! Core domain types used throughout SMStore.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  _id (UUID)     │   │  _id (UUID)     │   │  _id (UUID)     │       │
//! │  │  name_en/_bn    │   │  sale_time      │   │  sale_id (FK)   │       │
//! │  │  base_price     │   │  total_amount   │   │  product_id?    │       │
//! │  │  stock_quantity │   │  total_paid     │   │  quantity_sold  │       │
//! │  └─────────────────┘   │  customer_id?   │   │  final_line_..  │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    Customer     │   │  PaymentStatus  │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  name, phone    │   │  Paid           │                              │
//! │  │  total_due      │   │  Half Paid      │                              │
//! │  └─────────────────┘   │  Unpaid         │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Identifiers are UUID v4 strings serialized as `_id`, which is the key the
//! frontend reads. Amounts are [`Money`] and quantities are [`Quantity`];
//! both travel as plain JSON numbers.
//!
//! ## Inputs vs Rows
//! `New*` structs are request bodies for create (every field defaulted so a
//! sparse body still parses), `*Patch` structs are partial updates where
//! `None` means "leave as is".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Product
// =============================================================================

/// A product on the shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    #[serde(rename = "_id")]
    pub id: String,

    /// English display name.
    pub name_en: String,

    /// Bengali display name.
    pub name_bn: Option<String>,

    /// Sold as a sealed pack rather than loose by weight.
    pub is_packed: bool,

    /// Unit label shown next to quantities ("KG", "Pack").
    pub unit_type: String,

    /// Shelf price per unit.
    pub base_price: Money,

    /// Units in stock. Can go negative; sales never check it.
    pub stock_quantity: Quantity,

    pub image_url: Option<String>,

    /// Hidden from the checkout grid when false.
    pub sellable: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product should appear on the checkout grid.
    pub fn is_sellable(&self) -> bool {
        self.sellable && self.stock_quantity.is_positive()
    }
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct NewProduct {
    pub name_en: String,
    pub name_bn: Option<String>,
    pub is_packed: bool,
    /// Defaults to "KG" when absent.
    pub unit_type: Option<String>,
    pub base_price: Money,
    pub stock_quantity: Quantity,
    pub image_url: Option<String>,
    /// Defaults to true when absent.
    pub sellable: Option<bool>,
}

/// Body of `PUT /api/products/{id}`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ProductPatch {
    pub name_en: Option<String>,
    pub name_bn: Option<String>,
    pub is_packed: Option<bool>,
    pub unit_type: Option<String>,
    pub base_price: Option<Money>,
    pub stock_quantity: Option<Quantity>,
    pub image_url: Option<String>,
    pub sellable: Option<bool>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer who may carry an unpaid balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub phone: Option<String>,

    /// Running balance owed to the shop.
    pub total_due: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/customers`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    /// Opening balance; zero when absent.
    pub total_due: Money,
}

/// Body of `PUT /api/customers/{id}`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub total_due: Option<Money>,
}

// =============================================================================
// Payment Status
// =============================================================================

/// How much of a sale was settled at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum PaymentStatus {
    /// Settled in full.
    #[serde(rename = "Paid")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Paid"))]
    Paid,
    /// Part paid; the rest goes onto the customer's due.
    #[serde(rename = "Half Paid")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Half Paid"))]
    HalfPaid,
    /// Nothing paid.
    #[serde(rename = "Unpaid")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Unpaid"))]
    Unpaid,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::HalfPaid => "Half Paid",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }

    /// Whether a sale with this status adds to the customer's due.
    #[inline]
    pub const fn leaves_due(&self) -> bool {
        !matches!(self, PaymentStatus::Paid)
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Paid
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(PaymentStatus::Paid),
            "Half Paid" => Ok(PaymentStatus::HalfPaid),
            "Unpaid" => Ok(PaymentStatus::Unpaid),
            other => Err(CoreError::InvalidPayment {
                reason: format!("unknown payment_status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Never modified after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    #[serde(rename = "_id")]
    pub id: String,
    #[ts(as = "String")]
    pub sale_time: DateTime<Utc>,
    pub total_amount: Money,
    pub total_paid: Money,
    pub payment_status: PaymentStatus,
    pub customer_id: Option<String>,
}

impl Sale {
    /// Amount left unpaid on this sale. Negative on overpayment.
    #[inline]
    pub fn outstanding(&self) -> Money {
        self.total_amount - self.total_paid
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// One cart line of a sale, with the price frozen at the time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub sale_id: String,
    /// `None` when the cart line did not carry a usable product id.
    pub product_id: Option<String>,
    pub quantity_sold: Quantity,
    /// Unit label; absent on lines recorded through the legacy endpoint.
    pub unit: Option<String>,
    pub unit_price_at_sale: Money,
    pub final_line_price: Money,
}

// =============================================================================
// Read Models
// =============================================================================

/// `GET /api/sales/{id}`: the sale's own fields plus its lines.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// A sale with its customer joined in, as listed by date.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SaleWithCustomer {
    #[serde(flatten)]
    pub sale: Sale,
    /// Omitted entirely for walk-in sales.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub customer: Option<Customer>,
}

/// A sale line with the product it refers to.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SaleItemDetail {
    #[serde(flatten)]
    pub item: SaleItem,
    pub product: Product,
}

/// `GET /api/sales/details/{id}`.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    pub sale: Sale,
    /// Lines whose product has since been deleted are left out.
    pub items: Vec<SaleItemDetail>,
    pub customer: Option<Customer>,
}

/// Sales totals for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailySummary {
    /// The day as `YYYY-MM-DD`.
    #[serde(rename = "_id")]
    pub day: String,
    pub total_amount: Money,
    pub total_paid: Money,
    pub order_count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn potato() -> Product {
        let now = Utc::now();
        Product {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            name_en: "Potato".to_string(),
            name_bn: Some("আলু".to_string()),
            is_packed: false,
            unit_type: "KG".to_string(),
            base_price: Money::from_taka(35),
            stock_quantity: Quantity::from_whole(100),
            image_url: None,
            sellable: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_product_serializes_with_underscore_id() {
        let value = serde_json::to_value(potato()).unwrap();
        assert_eq!(value["_id"], json!("550e8400-e29b-41d4-a716-446655440000"));
        assert_eq!(value["base_price"], json!(35));
        assert_eq!(value["stock_quantity"], json!(100));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_product_is_sellable() {
        let mut product = potato();
        assert!(product.is_sellable());

        product.stock_quantity = Quantity::zero();
        assert!(!product.is_sellable());

        product.stock_quantity = Quantity::from_whole(3);
        product.sellable = false;
        assert!(!product.is_sellable());
    }

    #[test]
    fn test_payment_status_wire_names() {
        assert_eq!(serde_json::to_value(PaymentStatus::HalfPaid).unwrap(), json!("Half Paid"));
        assert_eq!("Unpaid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Unpaid);
        assert!("unpaid".parse::<PaymentStatus>().is_err());
        assert_eq!(PaymentStatus::default(), PaymentStatus::Paid);
        assert!(!PaymentStatus::Paid.leaves_due());
        assert!(PaymentStatus::HalfPaid.leaves_due());
    }

    #[test]
    fn test_new_product_accepts_sparse_body() {
        let body: NewProduct = serde_json::from_value(json!({
            "name_en": "Garlic",
            "base_price": "120"
        }))
        .unwrap();
        assert_eq!(body.base_price, Money::from_taka(120));
        assert!(body.unit_type.is_none());
        assert!(body.sellable.is_none());
    }

    #[test]
    fn test_sale_with_customer_omits_missing_customer() {
        let sale = Sale {
            id: "s1".to_string(),
            sale_time: Utc::now(),
            total_amount: Money::from_taka(70),
            total_paid: Money::from_taka(70),
            payment_status: PaymentStatus::Paid,
            customer_id: None,
        };
        let value = serde_json::to_value(SaleWithCustomer { sale, customer: None }).unwrap();
        assert_eq!(value["_id"], json!("s1"));
        assert_eq!(value["payment_status"], json!("Paid"));
        assert!(value.get("customer").is_none());
    }

    #[test]
    fn test_daily_summary_shape() {
        let row = DailySummary {
            day: "2025-01-31".to_string(),
            total_amount: Money::from_poisha(55050),
            total_paid: Money::from_taka(480),
            order_count: 2,
        };
        assert_eq!(
            serde_json::to_value(row).unwrap(),
            json!({"_id": "2025-01-31", "totalAmount": 550.5, "totalPaid": 480, "orderCount": 2})
        );
    }
}
