//! Pricing
//!
//! Order totals are built up in a fixed sequence:
//!
//! 1. `subtotal` is the exact sum of `price * qty` over every line.
//! 2. `tax` is `subtotal * tax_rate`, rounded.
//! 3. `pre_total` is `subtotal + shipping + tax`.
//! 4. `payment_fee` is `pre_total * fee_percent / 100`, rounded.
//! 5. `grand_total` is `pre_total + payment_fee`.
//!
//! Tax and fee are rounded independently, to the nearest whole minor unit with ties away
//! from zero, on exact decimal values. Every amount is non-negative, so this is the same
//! as rounding half up.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cart::LineItem, payments::PaymentMethod, shipping::ShippingSelection};

/// Value added tax applied to the subtotal (11%).
pub const TAX_RATE: Decimal = Decimal::from_parts(11, 0, 0, false, 2);

/// Fee charged on e-wallet payments, as a percentage (1.5%).
pub const EWALLET_FEE_PERCENT: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Errors raised while pricing a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An intermediate amount did not fit in minor units.
    #[error("amount overflowed while pricing the cart")]
    Overflow,

    /// A configured rate or percentage was negative.
    #[error("rates must not be negative, got {0}")]
    NegativeRate(Decimal),
}

/// Derived order totals, all in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of line totals
    pub subtotal: u64,

    /// Tax on the subtotal
    pub tax: u64,

    /// Subtotal plus shipping plus tax
    pub pre_total: u64,

    /// Payment method surcharge
    pub payment_fee: u64,

    /// Amount payable
    pub grand_total: u64,
}

/// Payment fee percentages keyed by payment method name.
///
/// Methods without an entry are charged nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeSchedule {
    percentages: FxHashMap<String, Decimal>,
}

impl FeeSchedule {
    /// A schedule that charges no fees.
    pub fn empty() -> Self {
        Self {
            percentages: FxHashMap::default(),
        }
    }

    /// Set the fee percentage for a method.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NegativeRate`] if `percent` is negative.
    pub fn with_percent(
        mut self,
        method: PaymentMethod,
        percent: Decimal,
    ) -> Result<Self, PricingError> {
        if percent.is_sign_negative() && !percent.is_zero() {
            return Err(PricingError::NegativeRate(percent));
        }

        self.percentages.insert(method.as_str().to_string(), percent);

        Ok(self)
    }

    /// Fee percentage for a method name; unknown methods are free.
    pub fn percent(&self, method: &str) -> Decimal {
        self.percentages
            .get(method)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        let mut percentages = FxHashMap::default();

        percentages.insert(PaymentMethod::BankTransfer.as_str().to_string(), Decimal::ZERO);
        percentages.insert(PaymentMethod::EWallet.as_str().to_string(), EWALLET_FEE_PERCENT);
        percentages.insert(PaymentMethod::Cod.as_str().to_string(), Decimal::ZERO);

        Self { percentages }
    }
}

/// Tax rate and fee schedule used to price a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    tax_rate: Decimal,
    fees: FeeSchedule,
}

impl Pricing {
    /// Create a pricing configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NegativeRate`] if `tax_rate` is negative.
    pub fn new(tax_rate: Decimal, fees: FeeSchedule) -> Result<Self, PricingError> {
        if tax_rate.is_sign_negative() && !tax_rate.is_zero() {
            return Err(PricingError::NegativeRate(tax_rate));
        }

        Ok(Self { tax_rate, fees })
    }

    /// Configured fee schedule.
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Compute totals for a set of line items.
    ///
    /// `payment_method` is matched by name against the fee schedule so that callers holding
    /// an unrecognised method (for example from an HTTP request) are priced without a fee.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if any amount exceeds `u64` minor units.
    pub fn compute(
        &self,
        items: &[LineItem],
        shipping: &ShippingSelection,
        payment_method: &str,
    ) -> Result<Totals, PricingError> {
        let subtotal = items.iter().try_fold(0_u64, |sum, item| {
            item.line_total()
                .and_then(|line| sum.checked_add(line))
                .ok_or(PricingError::Overflow)
        })?;

        let tax = apply_rate(subtotal, self.tax_rate)?;

        let pre_total = subtotal
            .checked_add(shipping.cost)
            .and_then(|sum| sum.checked_add(tax))
            .ok_or(PricingError::Overflow)?;

        let fee_rate = self
            .fees
            .percent(payment_method)
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or(PricingError::Overflow)?;

        let payment_fee = apply_rate(pre_total, fee_rate)?;

        let grand_total = pre_total
            .checked_add(payment_fee)
            .ok_or(PricingError::Overflow)?;

        Ok(Totals {
            subtotal,
            tax,
            pre_total,
            payment_fee,
            grand_total,
        })
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            tax_rate: TAX_RATE,
            fees: FeeSchedule::default(),
        }
    }
}

/// Compute totals with the default tax rate and fee schedule.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if any amount exceeds `u64` minor units.
pub fn compute_totals(
    items: &[LineItem],
    shipping: &ShippingSelection,
    payment_method: PaymentMethod,
) -> Result<Totals, PricingError> {
    Pricing::default().compute(items, shipping, payment_method.as_str())
}

/// Multiply a minor unit amount by a rate and round to a whole minor unit.
fn apply_rate(amount: u64, rate: Decimal) -> Result<u64, PricingError> {
    Decimal::from(amount)
        .checked_mul(rate)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use testresult::TestResult;
    use uuid::Uuid;

    use crate::shipping::ShippingKind;

    use super::*;

    fn line(price: u64, qty: u32) -> LineItem {
        LineItem::new(
            Uuid::now_v7(),
            "Cat Food",
            price,
            NonZeroU32::new(qty).unwrap_or(NonZeroU32::MIN),
            "",
        )
    }

    fn regular() -> ShippingSelection {
        ShippingSelection::regular()
    }

    #[test]
    fn bank_transfer_has_no_fee() -> TestResult {
        let totals = compute_totals(
            &[line(100_000, 2)],
            &regular(),
            PaymentMethod::BankTransfer,
        )?;

        assert_eq!(
            totals,
            Totals {
                subtotal: 200_000,
                tax: 22_000,
                pre_total: 237_000,
                payment_fee: 0,
                grand_total: 237_000,
            }
        );

        Ok(())
    }

    #[test]
    fn e_wallet_adds_one_and_a_half_percent() -> TestResult {
        let totals = compute_totals(&[line(100_000, 2)], &regular(), PaymentMethod::EWallet)?;

        assert_eq!(totals.pre_total, 237_000);
        assert_eq!(totals.payment_fee, 3_555);
        assert_eq!(totals.grand_total, 240_555);

        Ok(())
    }

    #[test]
    fn cod_has_no_fee() -> TestResult {
        let totals = compute_totals(&[line(12_345, 3)], &regular(), PaymentMethod::Cod)?;

        assert_eq!(totals.payment_fee, 0);
        assert_eq!(totals.grand_total, totals.pre_total);

        Ok(())
    }

    #[test]
    fn unknown_method_has_no_fee() -> TestResult {
        let totals = Pricing::default().compute(&[line(100_000, 1)], &regular(), "crypto")?;

        assert_eq!(totals.payment_fee, 0);

        Ok(())
    }

    #[test]
    fn subtotal_is_exact_sum_of_line_totals() -> TestResult {
        let items = [line(1, 1), line(999, 7), line(25_000, 3), line(0, 4)];
        let totals = compute_totals(&items, &regular(), PaymentMethod::BankTransfer)?;

        assert_eq!(totals.subtotal, 1 + 999 * 7 + 25_000 * 3);

        Ok(())
    }

    #[test]
    fn tax_rounds_half_away_from_zero() -> TestResult {
        // 50 * 0.11 = 5.5 -> 6, 45 * 0.11 = 4.95 -> 5, 40 * 0.11 = 4.4 -> 4
        for (subtotal, expected) in [(50, 6), (45, 5), (40, 4), (0, 0)] {
            let totals = compute_totals(
                &[line(subtotal, 1)],
                &ShippingSelection::new(ShippingKind::Regular, 0),
                PaymentMethod::BankTransfer,
            )?;

            assert_eq!(totals.tax, expected, "tax for subtotal {subtotal}");
        }

        Ok(())
    }

    #[test]
    fn fee_rounds_half_away_from_zero() -> TestResult {
        // pre_total 100 -> 1.5 -> 2; pre_total 1 -> 0.015 -> 0
        let free_shipping = ShippingSelection::new(ShippingKind::Regular, 100);
        let pricing = Pricing::new(Decimal::ZERO, FeeSchedule::default())?;

        let totals = pricing.compute(&[], &free_shipping, PaymentMethod::EWallet.as_str())?;

        assert_eq!(totals.payment_fee, 2);

        let one = ShippingSelection::new(ShippingKind::Regular, 1);
        let totals = pricing.compute(&[], &one, PaymentMethod::EWallet.as_str())?;

        assert_eq!(totals.payment_fee, 0);

        Ok(())
    }

    #[test]
    fn fee_is_rounded_independently_of_tax() -> TestResult {
        // subtotal 150: tax 16.5 -> 17, pre_total 150 + 17 = 167, fee 2.505 -> 3
        let totals = compute_totals(
            &[line(150, 1)],
            &ShippingSelection::new(ShippingKind::Regular, 0),
            PaymentMethod::EWallet,
        )?;

        assert_eq!(totals.tax, 17);
        assert_eq!(totals.pre_total, 167);
        assert_eq!(totals.payment_fee, 3);
        assert_eq!(totals.grand_total, 170);

        Ok(())
    }

    #[test]
    fn grand_total_is_sum_of_parts() -> TestResult {
        let shipping = ShippingSelection::new(ShippingKind::Express, 27_500);

        for method in [
            PaymentMethod::BankTransfer,
            PaymentMethod::EWallet,
            PaymentMethod::Cod,
        ] {
            for items in [vec![], vec![line(1_999, 3)], vec![line(7, 1), line(88_888, 9)]] {
                let totals = compute_totals(&items, &shipping, method)?;

                assert_eq!(
                    totals.grand_total,
                    totals.subtotal + shipping.cost + totals.tax + totals.payment_fee,
                    "grand total for {method} with {} lines",
                    items.len()
                );
            }
        }

        Ok(())
    }

    #[test]
    fn empty_cart_pays_shipping_only() -> TestResult {
        let totals = compute_totals(&[], &regular(), PaymentMethod::BankTransfer)?;

        assert_eq!(totals.subtotal, 0);
        assert_eq!(totals.grand_total, 15_000);

        Ok(())
    }

    #[test]
    fn overflowing_subtotal_is_reported() {
        let result = compute_totals(
            &[line(u64::MAX, 1), line(1, 1)],
            &regular(),
            PaymentMethod::BankTransfer,
        );

        assert_eq!(result, Err(PricingError::Overflow));
    }

    #[test]
    fn custom_fee_schedule_is_applied() -> TestResult {
        let fees = FeeSchedule::empty().with_percent(PaymentMethod::Cod, Decimal::from(2))?;
        let pricing = Pricing::new(TAX_RATE, fees)?;

        let totals = pricing.compute(&[line(100_000, 2)], &regular(), "cod")?;

        assert_eq!(totals.payment_fee, 4_740);

        Ok(())
    }

    #[test]
    fn negative_rates_are_rejected() {
        assert_eq!(
            FeeSchedule::empty().with_percent(PaymentMethod::EWallet, Decimal::NEGATIVE_ONE),
            Err(PricingError::NegativeRate(Decimal::NEGATIVE_ONE))
        );
        assert_eq!(
            Pricing::new(Decimal::NEGATIVE_ONE, FeeSchedule::default()),
            Err(PricingError::NegativeRate(Decimal::NEGATIVE_ONE))
        );
    }

    #[test]
    fn totals_serialize_in_camel_case() -> TestResult {
        let totals = compute_totals(&[line(100_000, 2)], &regular(), PaymentMethod::EWallet)?;
        let value = serde_json::to_value(totals)?;

        assert_eq!(value["preTotal"], 237_000);
        assert_eq!(value["paymentFee"], 3_555);
        assert_eq!(value["grandTotal"], 240_555);

        Ok(())
    }
}
