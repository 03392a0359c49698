//! Payments

pub mod errors;
pub mod simulator;

pub use errors::PaymentError;
pub use simulator::*;
