//! # Seed Data Loader
//!
//! Populates a database with the sample catalogue for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p smstore-db --bin seed
//!
//! # Specify database path
//! cargo run -p smstore-db --bin seed -- --db ./data/dev.db
//! ```
//!
//! The server seeds on start as well (`SEED_ON_START`); this binary is for
//! preparing a database file without running the server.

use std::env;

use smstore_db::{migrations, seed_if_empty, Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./data/smstore.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("SMStore Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./data/smstore.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 SMStore Seed Data Loader");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = migrations::migration_status(db.pool()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, total);

    let report = seed_if_empty(&db).await?;
    if report.is_empty() {
        println!(
            "⚠ Database already has {} products and {} customers",
            db.products().count().await?,
            db.customers().count().await?
        );
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
    } else {
        println!(
            "✓ Inserted {} products and {} customers",
            report.products, report.customers
        );
    }

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
