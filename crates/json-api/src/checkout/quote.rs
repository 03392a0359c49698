//! Checkout Quote Handler

use std::num::NonZeroU32;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront::{
    LineItem, PaymentMethod, PricingError, ShippingKind, ShippingSelection, Totals, format_rupiah,
};

use crate::extensions::*;

/// Cart line to price
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteItem {
    pub id: Uuid,

    #[serde(default)]
    pub name: String,

    /// Unit price in minor units
    pub price: u64,

    /// Quantity, at least 1
    pub qty: u32,
}

/// Shipping choice
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteShipping {
    /// One of `regular`, `express`, `same-day`
    #[serde(rename = "type")]
    pub kind: String,

    /// Cost in minor units
    pub cost: u64,
}

/// Quote Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteRequest {
    pub items: Vec<QuoteItem>,

    pub shipping: QuoteShipping,

    /// One of `bank-transfer`, `e-wallet`, `cod`
    pub payment_method: String,
}

impl QuoteRequest {
    fn into_parts(self) -> Result<(Vec<LineItem>, ShippingSelection, PaymentMethod), StatusError> {
        let kind = self
            .shipping
            .kind
            .parse::<ShippingKind>()
            .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

        let method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

        let items = self
            .items
            .into_iter()
            .map(|item| {
                let qty = NonZeroU32::new(item.qty)
                    .ok_or_else(|| StatusError::bad_request().brief("qty must be at least 1"))?;

                Ok(LineItem::new(item.id, item.name, item.price, qty, ""))
            })
            .collect::<Result<Vec<_>, StatusError>>()?;

        Ok((items, ShippingSelection::new(kind, self.shipping.cost), method))
    }
}

/// Quote Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteResponse {
    pub subtotal: u64,
    pub shipping: u64,
    pub tax: u64,
    pub pre_total: u64,
    pub payment_fee: u64,
    pub grand_total: u64,

    /// Grand total formatted as Rupiah
    pub grand_total_display: String,
}

impl QuoteResponse {
    fn new(totals: Totals, shipping: &ShippingSelection) -> Self {
        Self {
            subtotal: totals.subtotal,
            shipping: shipping.cost,
            tax: totals.tax,
            pre_total: totals.pre_total,
            payment_fee: totals.payment_fee,
            grand_total: totals.grand_total,
            grand_total_display: format_rupiah(totals.grand_total),
        }
    }
}

/// Checkout Quote Handler
///
/// Prices posted cart lines for a shipping and payment choice without recording anything.
#[endpoint(
    tags("checkout"),
    summary = "Quote Checkout Totals",
    responses(
        (status_code = StatusCode::OK, description = "Totals computed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<QuoteRequest>,
    depot: &mut Depot,
) -> Result<Json<QuoteResponse>, StatusError> {
    let state = depot.state()?;
    let (items, shipping, method) = json.into_inner().into_parts()?;

    let totals = state
        .pricing
        .compute(&items, &shipping, method.as_str())
        .map_err(|error| match error {
            PricingError::Overflow => StatusError::bad_request().brief("Amounts are too large"),
            PricingError::NegativeRate(_) => {
                tracing::error!("pricing misconfigured: {error}");

                StatusError::internal_server_error()
            }
        })?;

    Ok(Json(QuoteResponse::new(totals, &shipping)))
}
