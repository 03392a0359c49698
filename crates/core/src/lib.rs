//! Storefront
//!
//! Cart pricing, checkout selections and the order model shared by the storefront
//! application and its HTTP API. Everything in this crate is synchronous and free of I/O.

pub mod cart;
pub mod checkout;
pub mod customer;
pub mod format;
pub mod orders;
pub mod payments;
pub mod pricing;
pub mod shipping;

pub use cart::{Cart, CartError, LineItem};
pub use checkout::{CheckoutSession, SessionError};
pub use customer::{BuyerDetails, BuyerField, BuyerValidationError};
pub use format::format_rupiah;
pub use orders::{Order, OrderDraft, OrderPayment, PaymentStatus, order_id_at};
pub use payments::{PaymentMethod, PaymentResult};
pub use pricing::{FeeSchedule, Pricing, PricingError, Totals, compute_totals};
pub use shipping::{ShippingKind, ShippingSelection};
