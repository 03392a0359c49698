//! Payment errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("a payment is already in progress")]
    AlreadyInFlight,

    #[error("payment cancelled by user")]
    Cancelled,

    #[error("payment failed")]
    Declined,
}
