//! Products

pub mod data;
pub mod errors;
pub mod images;
pub mod models;
mod repository;
pub mod service;

pub use errors::{ImageUploadError, ProductsServiceError};
pub use images::*;
pub use service::*;
