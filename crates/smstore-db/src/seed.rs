//! # Sample Data
//!
//! A fresh database gets a small Bengali grocery catalogue and two
//! customers so the storefront has something to show. Each table is only
//! seeded while it is empty.

use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use smstore_core::{Money, NewCustomer, NewProduct, Quantity};

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub products: usize,
    pub customers: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.products == 0 && self.customers == 0
    }
}

struct SampleProduct {
    name_en: &'static str,
    name_bn: &'static str,
    is_packed: bool,
    unit_type: &'static str,
    base_price_taka: i64,
    stock: i64,
    image_text: &'static str,
}

const PRODUCTS: &[SampleProduct] = &[
    SampleProduct {
        name_en: "Potato",
        name_bn: "আলু",
        is_packed: false,
        unit_type: "KG",
        base_price_taka: 35,
        stock: 100,
        image_text: "Potato",
    },
    SampleProduct {
        name_en: "Rice 5kg Pack",
        name_bn: "চাল ৫ কেজি প্যাক",
        is_packed: true,
        unit_type: "Pack",
        base_price_taka: 480,
        stock: 50,
        image_text: "Rice+5kg",
    },
    SampleProduct {
        name_en: "Onion",
        name_bn: "পেঁয়াজ",
        is_packed: false,
        unit_type: "KG",
        base_price_taka: 70,
        stock: 80,
        image_text: "Onion",
    },
    SampleProduct {
        name_en: "Sugar 1kg Pack",
        name_bn: "চিনি ১ কেজি প্যাক",
        is_packed: true,
        unit_type: "Pack",
        base_price_taka: 120,
        stock: 60,
        image_text: "Sugar+1kg",
    },
];

/// (name, phone, due in poisha)
const CUSTOMERS: &[(&str, &str, i64)] = &[
    ("Mr. Rahim", "01700000001", 0),
    ("Mrs. Akter", "01700000002", 15050),
];

impl SampleProduct {
    fn to_new(&self) -> NewProduct {
        NewProduct {
            name_en: self.name_en.to_string(),
            name_bn: Some(self.name_bn.to_string()),
            is_packed: self.is_packed,
            unit_type: Some(self.unit_type.to_string()),
            base_price: Money::from_taka(self.base_price_taka),
            stock_quantity: Quantity::from_whole(self.stock),
            image_url: Some(format!(
                "https://via.placeholder.com/300?text={}",
                self.image_text
            )),
            sellable: Some(true),
        }
    }
}

/// Fills each empty table with its sample rows.
///
/// Products and customers are checked separately, so a catalogue that is
/// already stocked still gets the sample customers and the other way round.
pub async fn seed_if_empty(db: &Database) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    let existing = db.products().count().await?;
    if existing == 0 {
        for sample in PRODUCTS {
            db.products().insert(&sample.to_new()).await?;
            report.products += 1;
        }
    } else {
        debug!(existing, "Products present; skipping sample products");
    }

    let existing = db.customers().count().await?;
    if existing == 0 {
        for (name, phone, due) in CUSTOMERS {
            db.customers()
                .insert(&NewCustomer {
                    name: name.to_string(),
                    phone: Some(phone.to_string()),
                    total_due: Money::from_poisha(*due),
                })
                .await?;
            report.customers += 1;
        }
    } else {
        debug!(existing, "Customers present; skipping sample customers");
    }

    if !report.is_empty() {
        info!(
            products = report.products,
            customers = report.customers,
            "Sample data seeded"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    #[tokio::test]
    async fn test_seeds_empty_database_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let report = seed_if_empty(&db).await.unwrap();
        assert_eq!(report, SeedReport { products: 4, customers: 2 });

        let again = seed_if_empty(&db).await.unwrap();
        assert!(again.is_empty());
        assert_eq!(db.products().count().await.unwrap(), 4);
        assert_eq!(db.customers().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seeded_rows() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_if_empty(&db).await.unwrap();

        let products = db.products().list_all().await.unwrap();
        let potato = &products[0];
        assert_eq!(potato.name_en, "Potato");
        assert_eq!(potato.name_bn.as_deref(), Some("আলু"));
        assert_eq!(potato.unit_type, "KG");
        assert_eq!(potato.base_price, Money::from_taka(35));
        assert_eq!(potato.stock_quantity, Quantity::from_whole(100));
        assert!(!potato.is_packed);
        assert!(products[1].is_packed);

        let unpaid = db.customers().list_unpaid().await.unwrap();
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].name, "Mrs. Akter");
        assert_eq!(unpaid[0].total_due, Money::from_poisha(15050));
    }

    #[tokio::test]
    async fn test_stocked_catalogue_still_gets_customers() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .insert(&NewProduct {
                name_en: "Lentils".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let report = seed_if_empty(&db).await.unwrap();
        assert_eq!(report, SeedReport { products: 0, customers: 2 });
        assert_eq!(db.products().count().await.unwrap(), 1);
        assert_eq!(db.customers().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_existing_customers_still_get_catalogue() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers()
            .insert(&NewCustomer {
                name: "Salma".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let report = seed_if_empty(&db).await.unwrap();
        assert_eq!(report, SeedReport { products: 4, customers: 0 });
        assert_eq!(db.customers().count().await.unwrap(), 1);
    }
}
