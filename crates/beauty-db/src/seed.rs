//! # Demo Data
//!
//! First-run seeding. Each table is only filled when it is empty, so calling
//! [`seed_demo_data`] on every start is safe.
//!
//! ```text
//! profiles empty?  ──yes──► Admin User (admin), Sarah Johnson (employee)
//! products empty?  ──yes──► five products, one per category, one sold out
//! ```

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use beauty_core::{NewProduct, NewUser, Role};

/// Demo admin login.
pub const DEMO_ADMIN_EMAIL: &str = "admin@beautyshop.com";
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";

/// Demo employee login.
pub const DEMO_EMPLOYEE_EMAIL: &str = "sarah@beautyshop.com";
pub const DEMO_EMPLOYEE_PASSWORD: &str = "emp123";

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.users == 0 && self.products == 0
    }
}

fn demo_users() -> Vec<NewUser> {
    vec![
        NewUser {
            name: "Admin User".to_string(),
            email: DEMO_ADMIN_EMAIL.to_string(),
            role: Role::Admin,
            password: DEMO_ADMIN_PASSWORD.to_string(),
        },
        NewUser {
            name: "Sarah Johnson".to_string(),
            email: DEMO_EMPLOYEE_EMAIL.to_string(),
            role: Role::Employee,
            password: DEMO_EMPLOYEE_PASSWORD.to_string(),
        },
    ]
}

fn demo_products() -> Vec<NewProduct> {
    // (name, category, cost, price, stock, threshold)
    let rows: [(&str, &str, i64, i64, i64, Option<i64>); 5] = [
        ("Hydrating Face Serum", "Skincare", 1200, 2999, 24, Some(5)),
        ("Matte Liquid Lipstick", "Makeup", 450, 1499, 4, None),
        ("Argan Oil Shampoo", "Haircare", 600, 1899, 15, Some(6)),
        ("Rose Eau de Parfum", "Fragrance", 2500, 6999, 8, Some(3)),
        ("Gel Nail Polish", "Nail Care", 300, 999, 0, None),
    ];

    rows.into_iter()
        .map(|(name, category, cost, price, stock, threshold)| NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            cost_price_cents: cost,
            selling_price_cents: price,
            stock_qty: stock,
            low_stock_threshold: threshold,
        })
        .collect()
}

/// Seeds demo profiles and products into empty tables.
pub async fn seed_demo_data(db: &Database) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    if db.users().count().await? == 0 {
        for user in demo_users() {
            db.users().insert(&user).await?;
            report.users += 1;
        }
    }

    if db.products().count().await? == 0 {
        for product in demo_products() {
            db.products().insert(&product).await?;
            report.products += 1;
        }
    }

    if report.is_empty() {
        info!("Store already populated, nothing seeded");
    } else {
        info!(users = report.users, products = report.products, "Demo data seeded");
    }
    Ok(report)
}
