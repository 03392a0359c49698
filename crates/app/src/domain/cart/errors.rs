//! Cart store errors.

use storefront::CartError;
use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("failed to access the stored cart")]
    Storage(#[from] StoreError),
}
