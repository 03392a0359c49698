//! Storefront Domain Concerns

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod payments;
pub mod products;
