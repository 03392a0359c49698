//! Products Data

use crate::domain::products::models::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub price: u64,
    pub stock: i32,
    pub min_stock: i32,
    pub reserved: i32,
    pub available: i32,
    pub location: Option<String>,
    pub image: Option<String>,
    pub status: String,
}

/// Product Update Data
///
/// Only the columns that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<i32>,
    pub min_stock: Option<i32>,
    pub reserved: Option<i32>,
    pub available: Option<i32>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub status: Option<String>,
}

impl ProductUpdate {
    /// Whether no column would be written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
