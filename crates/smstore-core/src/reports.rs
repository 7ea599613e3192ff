//! # Reports Module
//!
//! Day windows and dashboard totals.
//!
//! ## Two Kinds of "Day"
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dashboards      "today" = since midnight on the shop's clock          │
//! │                  start_of_day(Local::now())                            │
//! │                                                                         │
//! │  Summary/by-date  calendar day in UTC                                  │
//! │                  utc_day_bounds(2025-01-31)                            │
//! │                  = [2025-01-31T00:00Z, 2025-02-01T00:00Z)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Customer, Sale};

// =============================================================================
// Day Windows
// =============================================================================

/// Midnight of `now`'s calendar day in its own timezone, as UTC.
///
/// ## Example
/// ```rust
/// use chrono::{FixedOffset, TimeZone, Utc};
/// use smstore_core::reports::start_of_day;
///
/// // 01:30 in Dhaka (UTC+6) is still the previous evening in UTC
/// let dhaka = FixedOffset::east_opt(6 * 3600).unwrap();
/// let now = dhaka.with_ymd_and_hms(2025, 1, 31, 1, 30, 0).unwrap();
/// assert_eq!(start_of_day(&now), Utc.with_ymd_and_hms(2025, 1, 30, 18, 0, 0).unwrap());
/// ```
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match midnight.and_local_timezone(now.timezone()).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // midnight skipped by a DST jump
        None => Utc.from_utc_datetime(&midnight),
    }
}

/// Parses a `YYYY-MM-DD` path segment.
pub fn parse_day(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: format!("expected YYYY-MM-DD ({})", e),
    })
}

/// Half-open UTC range `[day 00:00, next day 00:00)`.
pub fn utc_day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
    (start, start + Duration::days(1))
}

// =============================================================================
// Dashboards
// =============================================================================

/// `GET /api/dashboard/owner`.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OwnerDashboard {
    pub today_sales: Vec<Sale>,
    /// Cash actually taken today.
    pub total_cash_in: Money,
    /// What today's sales left unpaid.
    pub total_due: Money,
}

impl OwnerDashboard {
    pub fn from_sales(today_sales: Vec<Sale>) -> Self {
        let total_cash_in = today_sales.iter().map(|s| s.total_paid).sum();
        let total_due = today_sales.iter().map(Sale::outstanding).sum();
        OwnerDashboard {
            today_sales,
            total_cash_in,
            total_due,
        }
    }
}

/// `GET /api/dashboard/employee`.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmployeeDashboard {
    /// Newest first.
    pub today_sales: Vec<Sale>,
    pub unpaid_customers: Vec<Customer>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentStatus;
    use chrono::FixedOffset;
    use serde_json::json;

    fn sale(total: i64, paid: i64, status: PaymentStatus) -> Sale {
        Sale {
            id: crate::validation::new_id(),
            sale_time: Utc::now(),
            total_amount: Money::from_taka(total),
            total_paid: Money::from_taka(paid),
            payment_status: status,
            customer_id: None,
        }
    }

    #[test]
    fn test_start_of_day_utc() {
        let now = Utc.with_ymd_and_hms(2025, 1, 31, 15, 45, 12).unwrap();
        assert_eq!(start_of_day(&now), Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_day_behind_utc() {
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = west.with_ymd_and_hms(2025, 1, 31, 22, 0, 0).unwrap();
        assert_eq!(start_of_day(&now), Utc.with_ymd_and_hms(2025, 1, 31, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2025-01-31").unwrap(), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert!(parse_day("31-01-2025").is_err());
        assert!(parse_day("2025-02-30").is_err());
        assert!(parse_day("today").is_err());
    }

    #[test]
    fn test_utc_day_bounds_cross_month() {
        let (start, end) = utc_day_bounds(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_owner_dashboard_totals() {
        let dashboard = OwnerDashboard::from_sales(vec![
            sale(70, 70, PaymentStatus::Paid),
            sale(480, 200, PaymentStatus::HalfPaid),
            sale(120, 0, PaymentStatus::Unpaid),
        ]);
        assert_eq!(dashboard.total_cash_in, Money::from_taka(270));
        assert_eq!(dashboard.total_due, Money::from_taka(400));

        let value = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(value["totalCashIn"], json!(270));
        assert_eq!(value["todaySales"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_owner_dashboard_empty_day() {
        let dashboard = OwnerDashboard::from_sales(Vec::new());
        assert!(dashboard.total_cash_in.is_zero());
        assert!(dashboard.total_due.is_zero());
    }
}
