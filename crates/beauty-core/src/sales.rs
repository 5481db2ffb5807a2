//! # Sale Planning
//!
//! Decides whether a sale may happen and builds the record that gets stored.
//!
//! ```text
//! record_sale command
//!      │
//!      ▼
//! plan_sale(product, qty, method, employee, now) ← THIS MODULE
//!      │  ├── qty < 1       → ValidationError
//!      │  ├── qty > stock   → InsufficientStock
//!      │  └── total > i64   → ValidationError (OutOfRange)
//!      ▼
//! Sale { snapshots, total = unit × qty }
//!      │
//!      ▼
//! SaleRepository::record(sale, product.version)   (one transaction)
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{PaymentMethod, Product, Sale, User};
use crate::validation::validate_quantity;

/// Builds a sale for `quantity` units of `product` sold by `employee`.
///
/// Nothing is written here. The caller persists the returned sale together
/// with the stock decrement, guarded by the product version it read.
pub fn plan_sale(
    product: &Product,
    quantity: i64,
    payment_method: PaymentMethod,
    employee: &User,
    now: DateTime<Utc>,
) -> CoreResult<Sale> {
    validate_quantity(quantity)?;

    if !product.can_sell(quantity) {
        return Err(CoreError::InsufficientStock {
            product: product.name.clone(),
            available: product.stock_qty,
            requested: quantity,
        });
    }

    let unit_price = product.selling_price();
    let total = unit_price
        .checked_mul(quantity)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "total".to_string(),
            min: 0,
            max: i64::MAX,
        })?;

    Ok(Sale {
        id: Uuid::new_v4().to_string(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity,
        unit_price_cents: unit_price.cents(),
        total_cents: total.cents(),
        payment_method,
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        sold_at: now,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn product(stock: i64, price: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "prod-a".to_string(),
            name: "Argan Oil Shampoo".to_string(),
            category: "Haircare".to_string(),
            cost_price_cents: 400,
            selling_price_cents: price,
            stock_qty: stock,
            low_stock_threshold: None,
            created_at: now,
            updated_at: now,
            version: 3,
        }
    }

    fn employee() -> User {
        User {
            id: "user-sarah".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah@beautyshop.com".to_string(),
            role: Role::Employee,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_sale_snapshots_product_and_employee() {
        let now = Utc::now();
        let sale = plan_sale(&product(3, 1000), 2, PaymentMethod::Cash, &employee(), now).unwrap();

        assert_eq!(sale.product_id, "prod-a");
        assert_eq!(sale.product_name, "Argan Oil Shampoo");
        assert_eq!(sale.unit_price_cents, 1000);
        assert_eq!(sale.total_cents, 2000);
        assert_eq!(sale.employee_id, "user-sarah");
        assert_eq!(sale.employee_name, "Sarah Johnson");
        assert_eq!(sale.sold_at, now);
        assert!(uuid::Uuid::parse_str(&sale.id).is_ok());
    }

    #[test]
    fn test_plan_sale_whole_stock() {
        let sale = plan_sale(&product(3, 1000), 3, PaymentMethod::Card, &employee(), Utc::now());
        assert!(sale.is_ok());
    }

    #[test]
    fn test_plan_sale_rejects_over_stock() {
        let err = plan_sale(&product(3, 1000), 5, PaymentMethod::Cash, &employee(), Utc::now())
            .unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 3);
                assert_eq!(requested, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plan_sale_rejects_zero_quantity() {
        let err = plan_sale(&product(3, 1000), 0, PaymentMethod::Cash, &employee(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_plan_sale_total_overflow_is_rejected() {
        let err = plan_sale(
            &product(5, i64::MAX / 2 + 1),
            2,
            PaymentMethod::Cash,
            &employee(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_plan_sale_rejects_quantity_over_cap() {
        let err = plan_sale(&product(5000, 100), 1000, PaymentMethod::Card, &employee(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_plan_sale_out_of_stock() {
        let err = plan_sale(&product(0, 1000), 1, PaymentMethod::Mobile, &employee(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 0, .. }));
    }
}
