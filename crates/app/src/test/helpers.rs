//! Test Helpers

use crate::domain::products::{data::NewProduct, models::ProductUuid};

/// An in-stock product in the `food` category.
pub(crate) fn new_product(uuid: ProductUuid, sku: &str, price: u64) -> NewProduct {
    NewProduct {
        uuid,
        name: format!("Product {sku}"),
        sku: sku.to_string(),
        category: Some("food".to_string()),
        price,
        stock: 10,
        min_stock: 2,
        reserved: 0,
        available: 10,
        location: Some("A-01".to_string()),
        image: None,
        status: "active".to_string(),
    }
}
