//! Orders
//!
//! An [`Order`] is the immutable record of one completed checkout. It snapshots the buyer,
//! the cart lines, the shipping choice and the payment outcome together with the totals
//! that were charged.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    cart::LineItem,
    customer::BuyerDetails,
    payments::{PaymentMethod, PaymentResult},
    pricing::Totals,
    shipping::ShippingSelection,
};

/// Order id for an order created at `epoch_millis`.
pub fn order_id_at(epoch_millis: i64) -> String {
    format!("ORD-{epoch_millis}")
}

/// Settlement state of an order's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Confirmed by the provider
    Paid,

    /// Accepted, settles offline
    Pending,

    /// Not accepted
    Failed,
}

impl PaymentStatus {
    /// Status implied by a payment result.
    pub fn from_result(result: &PaymentResult) -> Self {
        match (result.success, result.pending) {
            (true, false) => Self::Paid,
            (true, true) => Self::Pending,
            (false, _) => Self::Failed,
        }
    }

    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment section of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayment {
    /// Payment method
    pub method: PaymentMethod,

    /// E-wallet provider, or the method name for other methods
    pub provider: String,

    /// Fee charged for the method
    pub payment_fee: u64,

    /// Amount charged, equal to the order total
    pub amount_paid: u64,

    /// Provider transaction id
    pub transaction_id: Option<String>,

    /// Settlement state
    pub status: PaymentStatus,
}

/// A recorded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `ORD-<epoch millis>`
    pub order_id: String,

    /// Buyer details
    pub customer: BuyerDetails,

    /// Cart lines at the time of checkout
    pub items: Vec<LineItem>,

    /// Shipping choice
    pub shipping: ShippingSelection,

    /// Payment outcome
    pub payment: OrderPayment,

    /// Sum of line totals
    pub subtotal: u64,

    /// Tax on the subtotal
    pub tax: u64,

    /// Grand total
    pub total: u64,

    /// Creation time
    pub created_at: Timestamp,
}

/// Everything needed to record an order except its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Validated buyer details
    pub customer: BuyerDetails,

    /// Cart lines
    pub items: Vec<LineItem>,

    /// Shipping choice
    pub shipping: ShippingSelection,

    /// Payment method
    pub method: PaymentMethod,

    /// Payment outcome
    pub payment: PaymentResult,

    /// Totals charged
    pub totals: Totals,
}

impl OrderDraft {
    /// Turn the draft into an order with the given id and creation time.
    pub fn into_order(self, order_id: String, created_at: Timestamp) -> Order {
        let status = PaymentStatus::from_result(&self.payment);

        let provider = self
            .payment
            .provider
            .unwrap_or_else(|| self.method.as_str().to_string());

        Order {
            order_id,
            customer: self.customer,
            items: self.items,
            shipping: self.shipping,
            payment: OrderPayment {
                method: self.method,
                provider,
                payment_fee: self.totals.payment_fee,
                amount_paid: self.totals.grand_total,
                transaction_id: self.payment.transaction_id,
                status,
            },
            subtotal: self.totals.subtotal,
            tax: self.totals.tax,
            total: self.totals.grand_total,
            created_at,
        }
    }
}
