//! Product Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
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
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
