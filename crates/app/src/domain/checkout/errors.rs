//! Checkout errors.

use storefront::{BuyerValidationError, PricingError, SessionError};
use thiserror::Error;

use crate::domain::{cart::CartStoreError, orders::OrderError, payments::PaymentError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] BuyerValidationError),

    #[error("choose an e-wallet provider first")]
    MissingProvider,

    #[error("cart is empty")]
    CartEmpty,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("failed to compute totals")]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Cart(#[from] CartStoreError),

    #[error(transparent)]
    Order(#[from] OrderError),
}
