//! Checkout session
//!
//! The selections a buyer makes on the checkout page: shipping, payment method and, for
//! e-wallet payments, the provider. Every transition leaves the session in a state that can
//! be priced immediately.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::LineItem,
    payments::PaymentMethod,
    pricing::{Pricing, PricingError, Totals},
    shipping::{ShippingKind, ShippingSelection},
};

/// E-wallet providers offered when none are configured.
pub const DEFAULT_EWALLET_PROVIDERS: [&str; 4] = ["gopay", "ovo", "dana", "shopeepay"];

/// Rejected session transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A provider was chosen while the payment method is not e-wallet.
    #[error("e-wallet providers can only be chosen when paying by e-wallet (current method: {0})")]
    ProviderRequiresEWallet(PaymentMethod),

    /// The provider is not one of the configured e-wallet providers.
    #[error("unknown e-wallet provider \"{0}\"")]
    UnknownProvider(String),
}

/// Current checkout selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    shipping: ShippingSelection,
    payment: PaymentMethod,
    provider: Option<String>,
    providers: SmallVec<[String; 4]>,
}

impl CheckoutSession {
    /// Session with default selections and the default e-wallet providers.
    pub fn new() -> Self {
        Self::with_providers(DEFAULT_EWALLET_PROVIDERS)
    }

    /// Session with default selections offering the given e-wallet providers.
    ///
    /// The first provider is the one chosen automatically when switching to e-wallet.
    pub fn with_providers<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shipping: ShippingSelection::regular(),
            payment: PaymentMethod::BankTransfer,
            provider: None,
            providers: providers.into_iter().map(Into::into).collect(),
        }
    }

    /// Selected shipping.
    pub fn shipping(&self) -> ShippingSelection {
        self.shipping
    }

    /// Selected payment method.
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    /// Selected e-wallet provider, if any.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Configured e-wallet providers, in display order.
    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    /// Choose a shipping kind and cost.
    pub fn select_shipping(&mut self, kind: ShippingKind, cost: u64) {
        self.shipping = ShippingSelection::new(kind, cost);
    }

    /// Choose a payment method.
    ///
    /// Switching to e-wallet picks the first configured provider when none is selected yet;
    /// switching to any other method forgets the provider.
    pub fn select_payment(&mut self, method: PaymentMethod) {
        self.payment = method;

        if method == PaymentMethod::EWallet {
            if self.provider.is_none() {
                self.provider = self.providers.first().cloned();
            }
        } else {
            self.provider = None;
        }
    }

    /// Choose an e-wallet provider.
    ///
    /// # Errors
    ///
    /// - [`SessionError::ProviderRequiresEWallet`] when the payment method is not e-wallet.
    /// - [`SessionError::UnknownProvider`] when `provider` is not configured.
    pub fn select_provider(&mut self, provider: &str) -> Result<(), SessionError> {
        if self.payment != PaymentMethod::EWallet {
            return Err(SessionError::ProviderRequiresEWallet(self.payment));
        }

        if !self.providers.iter().any(|known| known == provider) {
            return Err(SessionError::UnknownProvider(provider.to_string()));
        }

        self.provider = Some(provider.to_string());

        Ok(())
    }

    /// Whether the selections are complete enough to pay.
    pub fn has_required_provider(&self) -> bool {
        self.payment != PaymentMethod::EWallet || self.provider.is_some()
    }

    /// Price `items` with the current selections.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] when the amounts overflow.
    pub fn totals(&self, pricing: &Pricing, items: &[LineItem]) -> Result<Totals, PricingError> {
        pricing.compute(items, &self.shipping, self.payment.as_str())
    }

    /// Restore the default selections, keeping the configured providers.
    pub fn reset(&mut self) {
        self.shipping = ShippingSelection::regular();
        self.payment = PaymentMethod::BankTransfer;
        self.provider = None;
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}
