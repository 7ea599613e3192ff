//! # Checkout Module
//!
//! Turns a checkout request into a [`SalePlan`]: the exact rows the
//! recorder will write, computed without touching the database.
//!
//! ## Recording Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      From Cart to Rows                                  │
//! │                                                                         │
//! │  CheckoutRequest ──► plan_checkout() ──► SalePlan                       │
//! │  LegacySaleRequest ─► plan_legacy() ───┘     │                          │
//! │                                              ▼                          │
//! │                                 smstore-db SaleRecorder                 │
//! │                                                                         │
//! │   1. CustomerRef::Create  ──► insert customer (half/due only)           │
//! │   2. insert sale          (total_amount, total_paid, status)            │
//! │   3. for each PlannedLine:                                              │
//! │        insert sale_item                                                 │
//! │        stock_quantity -= quantity   (only with a product id)            │
//! │   4. due_increase()       ──► total_due += shortfall                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Payment Types
//! | `paymentType` | `total_paid`            | status      |
//! |---------------|-------------------------|-------------|
//! | `paid`        | `total`                 | Paid        |
//! | `half`        | `customer.halfAmount`   | Half Paid   |
//! | `due`         | 0                       | Unpaid      |
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use smstore_core::checkout::{plan_checkout, CheckoutRequest};
//! use smstore_core::{Money, PaymentStatus};
//!
//! let request: CheckoutRequest = serde_json::from_value(json!({
//!     "cart": [{ "_id": "550e8400-e29b-41d4-a716-446655440000",
//!                "quantity": 2, "base_price": 35 }],
//!     "paymentType": "paid",
//!     "total": 70
//! })).unwrap();
//!
//! let plan = plan_checkout(&request).unwrap();
//! assert_eq!(plan.total_paid, Money::from_taka(70));
//! assert_eq!(plan.payment_status, PaymentStatus::Paid);
//! assert_eq!(plan.due_increase(), None);
//! ```

use serde::Deserialize;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{NewCustomer, PaymentStatus};
use crate::validation::parse_reference;
use crate::{DEFAULT_UNIT, UNKNOWN_CUSTOMER_NAME};

// =============================================================================
// Payment Type
// =============================================================================

/// The cashier's choice of how the customer settles a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    /// Full amount paid now.
    Paid,
    /// Part paid now, remainder owed.
    Half,
    /// Everything owed.
    Due,
}

impl PaymentType {
    /// Status recorded on the sale.
    pub const fn status(&self) -> PaymentStatus {
        match self {
            PaymentType::Paid => PaymentStatus::Paid,
            PaymentType::Half => PaymentStatus::HalfPaid,
            PaymentType::Due => PaymentStatus::Unpaid,
        }
    }

    /// Amount taken at the counter for a sale of `total`.
    pub fn amount_paid(&self, total: Money, half_amount: Money) -> Money {
        match self {
            PaymentType::Paid => total,
            PaymentType::Half => half_amount,
            PaymentType::Due => Money::zero(),
        }
    }

    /// Whether a customer record is needed to carry the remaining due.
    pub const fn needs_customer(&self) -> bool {
        !matches!(self, PaymentType::Paid)
    }
}

impl FromStr for PaymentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentType::Paid),
            "half" => Ok(PaymentType::Half),
            "due" => Ok(PaymentType::Due),
            other => Err(CoreError::InvalidPayment {
                reason: format!("unknown paymentType '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

fn default_payment_type() -> String {
    "paid".to_string()
}

/// Body of `POST /api/sell`.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart: Vec<CheckoutLine>,
    #[serde(default)]
    pub customer: Option<CheckoutCustomer>,
    /// `paid`, `half` or `due`.
    #[serde(default = "default_payment_type")]
    pub payment_type: String,
    /// Sale total. Summed from the lines when absent.
    #[serde(default)]
    pub total: Option<Money>,
}

/// A cart line as the checkout screen sends it.
///
/// The line carries a copy of the product row (`base_price`, `unit_type`)
/// plus what the cashier typed (`employeePrice`, `total`). Zero counts as
/// "not typed".
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct CheckoutLine {
    #[serde(rename = "_id")]
    pub product_id: Option<String>,
    pub quantity: Quantity,
    pub unit: Option<String>,
    pub unit_type: Option<String>,
    #[serde(rename = "employeePrice")]
    pub employee_price: Money,
    pub base_price: Money,
    pub total: Money,
}

impl CheckoutLine {
    /// Cashier's price, else the product's base price, else zero.
    pub fn unit_price(&self) -> Money {
        self.employee_price
            .non_zero()
            .or_else(|| self.base_price.non_zero())
            .unwrap_or_default()
    }

    /// Cashier's line total, else quantity × unit price.
    ///
    /// `None` when quantity × unit price does not fit in poisha.
    pub fn line_total(&self) -> Option<Money> {
        match self.total.non_zero() {
            Some(total) => Some(total),
            None => self.unit_price().multiply_quantity(self.quantity),
        }
    }

    /// `unit`, else `unit_type`, else "KG".
    pub fn unit(&self) -> String {
        [&self.unit, &self.unit_type]
            .into_iter()
            .flatten()
            .find(|u| !u.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_UNIT.to_string())
    }

    fn plan(&self) -> CoreResult<PlannedLine> {
        let line_total = self.line_total().ok_or_else(|| out_of_range("line total"))?;

        Ok(PlannedLine {
            product_id: parse_reference(self.product_id.as_deref()),
            quantity: self.quantity,
            unit: Some(self.unit()),
            unit_price: self.unit_price(),
            line_total,
        })
    }
}

/// Customer block of a checkout.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct CheckoutCustomer {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    /// Phone number.
    pub number: Option<String>,
    #[serde(rename = "halfAmount")]
    pub half_amount: Money,
}

/// Body of the older `POST /api/sales`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct LegacySaleRequest {
    pub items: Vec<LegacySaleLine>,
    pub total_amount: Money,
    pub total_paid: Money,
    /// Defaults to "Paid".
    pub payment_status: Option<String>,
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
}

/// A line of the older sale body. Prices arrive already computed.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct LegacySaleLine {
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
    pub quantity_sold: Quantity,
    pub unit_price_at_sale: Money,
    pub final_line_price: Money,
}

// =============================================================================
// Sale Plan
// =============================================================================

/// Which customer, if any, the sale is attached to.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerRef {
    /// Walk-in sale.
    None,
    /// An id supplied by the client. Not checked for existence.
    Existing(String),
    /// A customer to insert before the sale.
    Create(NewCustomer),
}

impl CustomerRef {
    pub fn existing_id(&self) -> Option<&str> {
        match self {
            CustomerRef::Existing(id) => Some(id),
            _ => None,
        }
    }
}

/// One sale_item row to write, plus its stock movement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLine {
    /// Stock is only decremented when present.
    pub product_id: Option<String>,
    pub quantity: Quantity,
    pub unit: Option<String>,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Everything the recorder writes for one sale.
///
/// Plans from [`plan_checkout`] and [`plan_legacy`] always have a shortfall
/// that fits in poisha.
#[derive(Debug, Clone, PartialEq)]
pub struct SalePlan {
    pub customer: CustomerRef,
    pub total_amount: Money,
    pub total_paid: Money,
    pub payment_status: PaymentStatus,
    pub lines: Vec<PlannedLine>,
}

impl SalePlan {
    /// `total_amount - total_paid`, whatever the status.
    #[inline]
    pub fn shortfall(&self) -> Money {
        self.total_amount - self.total_paid
    }

    /// Amount to add to the customer's due, if the status leaves one.
    ///
    /// Whether there is a customer to charge is decided after the customer
    /// step has run.
    pub fn due_increase(&self) -> Option<Money> {
        self.payment_status.leaves_due().then(|| self.shortfall())
    }
}

fn out_of_range(field: &str) -> CoreError {
    CoreError::AmountOutOfRange {
        field: field.to_string(),
    }
}

/// Rejects totals whose difference would not fit in poisha.
fn check_shortfall(total_amount: Money, total_paid: Money) -> CoreResult<()> {
    total_amount
        .checked_sub(total_paid)
        .map(|_| ())
        .ok_or_else(|| out_of_range("due"))
}

/// Works out which customer a checkout belongs to.
///
/// - a supplied `_id` wins, even when it does not parse (the sale is then
///   recorded without a customer)
/// - otherwise half/due checkouts create a customer from `name`/`number`
pub fn resolve_customer(customer: Option<&CheckoutCustomer>, payment: PaymentType) -> CustomerRef {
    let supplied_id = customer.and_then(|c| c.id.as_deref()).filter(|id| !id.is_empty());

    if let Some(raw) = supplied_id {
        return match parse_reference(Some(raw)) {
            Some(id) => CustomerRef::Existing(id),
            None => CustomerRef::None,
        };
    }

    if !payment.needs_customer() {
        return CustomerRef::None;
    }

    let name = customer
        .and_then(|c| c.name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_CUSTOMER_NAME);
    let phone = customer.and_then(|c| c.number.clone()).unwrap_or_default();

    CustomerRef::Create(NewCustomer {
        name: name.to_string(),
        phone: Some(phone),
        total_due: Money::zero(),
    })
}

/// Plans a `POST /api/sell` checkout.
///
/// ## Errors
/// - `CoreError::InvalidPayment` for an unknown `paymentType`
/// - `CoreError::AmountOutOfRange` when a line, the summed total or the
///   resulting due does not fit in poisha
pub fn plan_checkout(request: &CheckoutRequest) -> CoreResult<SalePlan> {
    let payment: PaymentType = request.payment_type.parse()?;
    let lines = request
        .cart
        .iter()
        .map(CheckoutLine::plan)
        .collect::<CoreResult<Vec<_>>>()?;

    let total_amount = match request.total {
        Some(total) => total,
        None => lines
            .iter()
            .try_fold(Money::zero(), |sum, line| sum.checked_add(line.line_total))
            .ok_or_else(|| out_of_range("total"))?,
    };
    let half_amount = request
        .customer
        .as_ref()
        .map(|c| c.half_amount)
        .unwrap_or_default();
    let total_paid = payment.amount_paid(total_amount, half_amount);
    check_shortfall(total_amount, total_paid)?;

    Ok(SalePlan {
        customer: resolve_customer(request.customer.as_ref(), payment),
        total_amount,
        total_paid,
        payment_status: payment.status(),
        lines,
    })
}

/// Plans a legacy `POST /api/sales` body.
///
/// Totals are taken as sent. No customer is ever created here.
///
/// ## Errors
/// - `CoreError::InvalidPayment` for an unknown `payment_status`
/// - `CoreError::AmountOutOfRange` when `total_amount - total_paid` does
///   not fit in poisha
pub fn plan_legacy(request: &LegacySaleRequest) -> CoreResult<SalePlan> {
    let payment_status = match request.payment_status.as_deref() {
        None | Some("") => PaymentStatus::Paid,
        Some(status) => status.parse()?,
    };
    check_shortfall(request.total_amount, request.total_paid)?;

    let customer = match parse_reference(request.customer_id.as_deref()) {
        Some(id) => CustomerRef::Existing(id),
        None => CustomerRef::None,
    };

    let lines = request
        .items
        .iter()
        .map(|item| PlannedLine {
            product_id: parse_reference(item.product_id.as_deref()),
            quantity: item.quantity_sold,
            unit: None,
            unit_price: item.unit_price_at_sale,
            line_total: item.final_line_price,
        })
        .collect();

    Ok(SalePlan {
        customer,
        total_amount: request.total_amount,
        total_paid: request.total_paid,
        payment_status,
        lines,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const POTATO: &str = "550e8400-e29b-41d4-a716-446655440000";
    const RAHIM: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    fn checkout(body: serde_json::Value) -> SalePlan {
        let request: CheckoutRequest = serde_json::from_value(body).unwrap();
        plan_checkout(&request).unwrap()
    }

    #[test]
    fn test_paid_checkout_of_two_kg_potato() {
        let plan = checkout(json!({
            "cart": [{ "_id": POTATO, "quantity": 2, "unit_type": "KG", "base_price": 35 }],
            "paymentType": "paid",
            "total": 70
        }));

        assert_eq!(plan.total_amount, Money::from_taka(70));
        assert_eq!(plan.total_paid, Money::from_taka(70));
        assert_eq!(plan.payment_status, PaymentStatus::Paid);
        assert_eq!(plan.customer, CustomerRef::None);
        assert_eq!(plan.due_increase(), None);

        let line = &plan.lines[0];
        assert_eq!(line.product_id.as_deref(), Some(POTATO));
        assert_eq!(line.quantity, Quantity::from_whole(2));
        assert_eq!(line.unit.as_deref(), Some("KG"));
        assert_eq!(line.unit_price, Money::from_taka(35));
        assert_eq!(line.line_total, Money::from_taka(70));
    }

    #[test]
    fn test_employee_price_and_line_total_precedence() {
        let line = CheckoutLine {
            employee_price: Money::from_taka(30),
            base_price: Money::from_taka(35),
            quantity: Quantity::from_milli(1500),
            ..Default::default()
        };
        assert_eq!(line.unit_price(), Money::from_taka(30));
        assert_eq!(line.line_total(), Some(Money::from_taka(45)));

        let typed_total = CheckoutLine {
            total: Money::from_taka(50),
            ..line.clone()
        };
        assert_eq!(typed_total.line_total(), Some(Money::from_taka(50)));

        let no_price = CheckoutLine {
            quantity: Quantity::from_whole(3),
            ..Default::default()
        };
        assert_eq!(no_price.unit_price(), Money::zero());
        assert_eq!(no_price.line_total(), Some(Money::zero()));
    }

    #[test]
    fn test_unit_fallbacks() {
        let mut line = CheckoutLine::default();
        assert_eq!(line.unit(), "KG");

        line.unit_type = Some("Pack".to_string());
        assert_eq!(line.unit(), "Pack");

        line.unit = Some("Piece".to_string());
        assert_eq!(line.unit(), "Piece");
    }

    #[test]
    fn test_missing_total_sums_lines() {
        let plan = checkout(json!({
            "cart": [
                { "_id": POTATO, "quantity": 2, "base_price": 35 },
                { "quantity": 1, "base_price": 480 }
            ],
            "paymentType": "due"
        }));
        assert_eq!(plan.total_amount, Money::from_taka(550));
        assert_eq!(plan.total_paid, Money::zero());
        assert_eq!(plan.lines[1].product_id, None);
    }

    #[test]
    fn test_half_checkout_creates_customer_and_owes_shortfall() {
        let plan = checkout(json!({
            "cart": [{ "_id": POTATO, "quantity": 2, "base_price": 35 }],
            "customer": { "name": "Karim", "number": "01800000000", "halfAmount": "30" },
            "paymentType": "half",
            "total": 70
        }));

        assert_eq!(plan.payment_status, PaymentStatus::HalfPaid);
        assert_eq!(plan.total_paid, Money::from_taka(30));
        assert_eq!(plan.due_increase(), Some(Money::from_taka(40)));
        match plan.customer {
            CustomerRef::Create(c) => {
                assert_eq!(c.name, "Karim");
                assert_eq!(c.phone.as_deref(), Some("01800000000"));
                assert!(c.total_due.is_zero());
            }
            other => panic!("expected a new customer, got {:?}", other),
        }
    }

    #[test]
    fn test_due_checkout_without_details_creates_unknown_customer() {
        let customer = resolve_customer(None, PaymentType::Due);
        assert_eq!(
            customer,
            CustomerRef::Create(NewCustomer {
                name: UNKNOWN_CUSTOMER_NAME.to_string(),
                phone: Some(String::new()),
                total_due: Money::zero(),
            })
        );
    }

    #[test]
    fn test_supplied_customer_id_wins() {
        let supplied = CheckoutCustomer {
            id: Some(RAHIM.to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_customer(Some(&supplied), PaymentType::Due),
            CustomerRef::Existing(RAHIM.to_string())
        );

        // a paid sale still links the customer
        assert_eq!(
            resolve_customer(Some(&supplied), PaymentType::Paid).existing_id(),
            Some(RAHIM)
        );

        let garbage = CheckoutCustomer {
            id: Some("nope".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_customer(Some(&garbage), PaymentType::Due), CustomerRef::None);
    }

    #[test]
    fn test_unknown_payment_type_is_rejected() {
        let request: CheckoutRequest =
            serde_json::from_value(json!({ "cart": [], "paymentType": "card" })).unwrap();
        assert!(matches!(
            plan_checkout(&request),
            Err(CoreError::InvalidPayment { .. })
        ));
    }

    #[test]
    fn test_oversized_line_is_rejected() {
        // ৳10^13 × 10^10 KG
        let request: CheckoutRequest = serde_json::from_value(json!({
            "cart": [{ "_id": POTATO, "quantity": 1e10, "employeePrice": 1e13 }],
            "paymentType": "paid"
        }))
        .unwrap();
        assert!(matches!(
            plan_checkout(&request),
            Err(CoreError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_lines_summing_past_range_are_rejected() {
        let request: CheckoutRequest = serde_json::from_value(json!({
            "cart": [
                { "quantity": 1, "total": 5e16 },
                { "quantity": 1, "total": 5e16 }
            ],
            "paymentType": "due"
        }))
        .unwrap();
        assert!(matches!(
            plan_checkout(&request),
            Err(CoreError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_oversized_half_amount_is_rejected() {
        let request: CheckoutRequest = serde_json::from_value(json!({
            "cart": [],
            "customer": { "name": "Karim", "halfAmount": -9e16 },
            "paymentType": "half",
            "total": 9e16
        }))
        .unwrap();
        assert!(matches!(
            plan_checkout(&request),
            Err(CoreError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_legacy_shortfall_out_of_range_is_rejected() {
        let request = LegacySaleRequest {
            total_amount: Money::from_poisha(i64::MAX),
            total_paid: Money::from_poisha(-1),
            payment_status: Some("Half Paid".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            plan_legacy(&request),
            Err(CoreError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_payment_type_defaults_to_paid() {
        let plan = checkout(json!({ "cart": [], "total": 10 }));
        assert_eq!(plan.payment_status, PaymentStatus::Paid);
        assert_eq!(plan.total_paid, Money::from_taka(10));
    }

    #[test]
    fn test_legacy_plan() {
        let request: LegacySaleRequest = serde_json::from_value(json!({
            "items": [{
                "productId": POTATO,
                "quantity_sold": 2,
                "unit_price_at_sale": 35,
                "final_line_price": 70
            }],
            "total_amount": 70,
            "total_paid": 20,
            "payment_status": "Half Paid",
            "customerId": RAHIM
        }))
        .unwrap();

        let plan = plan_legacy(&request).unwrap();
        assert_eq!(plan.customer.existing_id(), Some(RAHIM));
        assert_eq!(plan.due_increase(), Some(Money::from_taka(50)));
        assert_eq!(plan.lines[0].unit, None);
        assert_eq!(plan.lines[0].line_total, Money::from_taka(70));
    }

    #[test]
    fn test_legacy_defaults() {
        let plan = plan_legacy(&LegacySaleRequest::default()).unwrap();
        assert_eq!(plan.payment_status, PaymentStatus::Paid);
        assert_eq!(plan.customer, CustomerRef::None);
        assert!(plan.lines.is_empty());

        let bad = LegacySaleRequest {
            payment_status: Some("Later".to_string()),
            ..Default::default()
        };
        assert!(plan_legacy(&bad).is_err());
    }
}
