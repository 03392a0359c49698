//! Checkout

pub(crate) mod quote;
