//! Checkout service.

use jiff::Timestamp;
use storefront::{
    BuyerDetails, CheckoutSession, Order, OrderDraft, PaymentMethod, PaymentResult, Pricing,
    ShippingKind, Totals,
};
use tracing::info;

use crate::domain::{
    cart::CartStore,
    checkout::errors::CheckoutError,
    orders::OrderRecorder,
    payments::{PaymentError, PaymentSimulator},
};

/// Command handlers for one checkout session.
///
/// A UI adapter calls the `select_*` handlers as the buyer changes their choices and
/// re-renders from the returned totals, then calls [`CheckoutService::process_checkout`]
/// on submit.
#[derive(Debug)]
pub struct CheckoutService {
    session: CheckoutSession,
    pricing: Pricing,
    carts: CartStore,
    recorder: OrderRecorder,
    payments: PaymentSimulator,
}

impl CheckoutService {
    #[must_use]
    pub fn new(pricing: Pricing, carts: CartStore, recorder: OrderRecorder) -> Self {
        Self {
            session: CheckoutSession::new(),
            pricing,
            carts,
            recorder,
            payments: PaymentSimulator::new(),
        }
    }

    /// Replace the session, e.g. to offer a different set of e-wallet providers.
    #[must_use]
    pub fn with_session(mut self, session: CheckoutSession) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &CheckoutSession {
        &self.session
    }

    pub fn carts(&self) -> &CartStore {
        &self.carts
    }

    pub fn recorder(&self) -> &OrderRecorder {
        &self.recorder
    }

    /// Handle to the payment simulator, usable to cancel a payment while
    /// [`CheckoutService::process_checkout`] is awaited.
    pub fn payments(&self) -> PaymentSimulator {
        self.payments.clone()
    }

    /// Totals for the current cart and selections.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart cannot be read or the amounts overflow.
    pub fn totals(&self) -> Result<Totals, CheckoutError> {
        let cart = self.carts.items()?;

        Ok(self.session.totals(&self.pricing, cart.items())?)
    }

    /// Choose shipping and return the recomputed totals.
    ///
    /// # Errors
    ///
    /// See [`CheckoutService::totals`].
    pub fn select_shipping(
        &mut self,
        kind: ShippingKind,
        cost: u64,
    ) -> Result<Totals, CheckoutError> {
        self.session.select_shipping(kind, cost);
        self.totals()
    }

    /// Choose a payment method and return the recomputed totals.
    ///
    /// # Errors
    ///
    /// See [`CheckoutService::totals`].
    pub fn select_payment(&mut self, method: PaymentMethod) -> Result<Totals, CheckoutError> {
        self.session.select_payment(method);
        self.totals()
    }

    /// Choose an e-wallet provider.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Session`] when the payment method is not e-wallet or the
    /// provider is unknown; the session is unchanged.
    pub fn select_provider(&mut self, provider: &str) -> Result<(), CheckoutError> {
        Ok(self.session.select_provider(provider)?)
    }

    /// Validate, pay and record the order, then restore the default selections.
    ///
    /// Nothing is recorded and the cart is kept when any step before recording fails.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Validation`] or [`CheckoutError::MissingProvider`] for incomplete
    ///   input.
    /// - [`CheckoutError::CartEmpty`] when there is nothing to buy.
    /// - [`CheckoutError::Payment`] when the payment was cancelled or not accepted.
    /// - Storage and pricing errors from the collaborators.
    pub async fn process_checkout(
        &mut self,
        buyer: &BuyerDetails,
    ) -> Result<Order, CheckoutError> {
        let customer = buyer.validate()?;

        if !self.session.has_required_provider() {
            return Err(CheckoutError::MissingProvider);
        }

        let cart = self.carts.items()?;

        if cart.is_empty() {
            return Err(CheckoutError::CartEmpty);
        }

        let totals = self.session.totals(&self.pricing, cart.items())?;
        let method = self.session.payment();

        let payment = match (method, self.session.provider()) {
            (PaymentMethod::EWallet, Some(provider)) => {
                self.payments.pay(provider, totals.grand_total).await?
            }
            (PaymentMethod::EWallet, None) => return Err(CheckoutError::MissingProvider),
            (PaymentMethod::BankTransfer | PaymentMethod::Cod, _) => {
                PaymentResult::offline(method, Timestamp::now().as_millisecond())
                    .unwrap_or_else(PaymentResult::failed)
            }
        };

        if !payment.success {
            return Err(PaymentError::Declined.into());
        }

        let order = self.recorder.record(OrderDraft {
            customer,
            items: cart.into_items(),
            shipping: self.session.shipping(),
            method,
            payment,
            totals,
        })?;

        info!(order_id = %order.order_id, "checkout complete");

        self.session.reset();

        Ok(order)
    }
}
