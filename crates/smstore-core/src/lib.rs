//! # smstore-core: Pure Business Logic for SMStore
//!
//! This crate is the **heart** of the SMStore point-of-sale backend. It
//! contains the domain types and every calculation the sale flow needs,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SMStore Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (browser)                           │   │
//! │  │    Product grid ──► Cart ──► Payment type ──► Dashboards        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  │    /api/products, /api/customers, /api/sell, /api/dashboard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ smstore-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │  reports  │  │   │
//! │  │   │  Product  │  │   Money   │  │ SalePlan  │  │ dashboard │  │   │
//! │  │   │   Sale    │  │ Quantity  │  │ PaymentTy │  │  totals   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    smstore-db (Database Layer)                  │   │
//! │  │         SQLite queries, migrations, repositories, recorder      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, SaleItem, read models)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`quantity`] - Fixed-point quantities for loose goods sold by weight
//! - [`checkout`] - Payment classification and the sale-recording plan
//! - [`reports`] - Day windows and dashboard totals
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use smstore_core::money::Money;
//! use smstore_core::quantity::Quantity;
//!
//! // Potato at ৳35/KG, customer takes 1.5 KG
//! let unit_price = Money::from_poisha(3500);
//! let line = unit_price.multiply_quantity(Quantity::from_milli(1500));
//!
//! assert_eq!(line, Some(Money::from_poisha(5250))); // ৳52.50
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
mod fixed;
pub mod money;
pub mod quantity;
pub mod reports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use smstore_core::Money` instead of
// `use smstore_core::money::Money`

pub use checkout::{CheckoutRequest, CustomerRef, LegacySaleRequest, PaymentType, PlannedLine, SalePlan};
pub use reports::{EmployeeDashboard, OwnerDashboard};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use quantity::Quantity;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Unit label used when a cart line carries neither `unit` nor `unit_type`.
pub const DEFAULT_UNIT: &str = "KG";

/// Name given to customers created on the fly during a half/due checkout
/// when the cashier did not type one.
pub const UNKNOWN_CUSTOMER_NAME: &str = "Unknown";
