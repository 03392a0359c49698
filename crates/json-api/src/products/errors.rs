//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::products::{ImageUploadError, ProductsServiceError};

/// Status for a failed write. Storage failures are reported as bad requests.
pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("A product with this SKU already exists")
        }
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData
        | ProductsServiceError::InvalidPrice(_) => {
            StatusError::bad_request().brief("Invalid product data")
        }
        ProductsServiceError::NothingToUpdate => {
            StatusError::bad_request().brief("Nothing to update")
        }
        ProductsServiceError::Sql(source) => {
            error!("product write failed: {source}");

            StatusError::bad_request().brief("Product could not be saved")
        }
    }
}

/// Status for a failed read. Only a missing product is the caller's fault.
pub(crate) fn into_read_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        other => {
            error!("failed to fetch product: {other}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn image_status_error(error: ImageUploadError) -> StatusError {
    match error {
        ImageUploadError::UnsupportedFormat => {
            StatusError::bad_request().brief("Unsupported image format (allowed: jpg, jpeg, png)")
        }
        ImageUploadError::Io(source) => {
            error!("failed to store product image: {source}");

            StatusError::bad_request().brief("Failed to upload image")
        }
    }
}
