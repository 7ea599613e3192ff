//! # smstore-db: Database Layer for SMStore
//!
//! This crate provides database access for the SMStore server.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SMStore Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (POST /api/sell)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    smstore-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CustomerRepo  │    │ 001_initial_ │  │   │
//! │  │   │               │    │ SaleRepo      │    │   schema.sql │  │   │
//! │  │   └───────┬───────┘    └───────▲───────┘    └──────────────┘  │   │
//! │  │           │                    │                               │   │
//! │  │           │            ┌───────┴───────┐    ┌──────────────┐  │   │
//! │  │           └───────────►│ SaleRecorder  │    │    seed      │  │   │
//! │  │                        │ (recorder.rs) │    │  (seed.rs)   │  │   │
//! │  │                        └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./data/smstore.db                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, customer, sale)
//! - [`recorder`] - The sale recording sequence
//! - [`seed`] - Sample catalogue for an empty database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use smstore_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./data/smstore.db")).await?;
//!
//! let products = db.products().list_sellable().await?;
//! let recorded = db.recorder().record(&plan).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod recorder;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use recorder::{RecordedSale, SaleRecorder};
pub use seed::{seed_if_empty, SeedReport};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
