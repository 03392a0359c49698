//! Storefront application services: storage, cart, payments, orders, checkout and the
//! product catalog.

pub mod context;
pub mod database;
pub mod domain;
pub mod storage;

#[cfg(test)]
mod test;

mod uuids;
