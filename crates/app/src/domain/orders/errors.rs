//! Order errors.

use reqwest::StatusCode;
use storefront::BuyerValidationError;
use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] BuyerValidationError),

    #[error("choose an e-wallet provider first")]
    MissingProvider,

    #[error("failed to save the order")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("order endpoint unreachable")]
    Request(#[from] reqwest::Error),

    #[error("order endpoint responded with {0}")]
    Status(StatusCode),
}
