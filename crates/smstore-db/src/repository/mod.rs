//! # Repository Module
//!
//! Database repository implementations for SMStore.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.products().list_sellable()                           │
//! │       ▼                                                                 │
//! │  ProductRepository / CustomerRepository / SaleRepository               │
//! │  ├── list_*(&self)                                                     │
//! │  ├── get_by_id(&self, id)        → Option<T>                           │
//! │  ├── insert(&self, &New*)        → T                                   │
//! │  ├── update(&self, id, &*Patch)  → Option<T>                           │
//! │  └── delete(&self, id)           → bool                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  "Not found" is a value (None / false), never an error. The caller     │
//! │  decides whether a missing row is a 404 or a silent no-op.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalogue and stock
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers and dues
//! - [`SaleRepository`](sale::SaleRepository) - Sales, line items, reports

pub mod customer;
pub mod product;
pub mod sale;
