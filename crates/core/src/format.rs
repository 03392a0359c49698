//! Currency formatting

use rust_decimal::Decimal;
use rusty_money::{Formatter, Money, Params, Position, iso};

/// Format a rupiah amount the way Indonesian storefronts display it, e.g. `Rp 237.000,00`.
///
/// Amounts are whole rupiah; the fractional part is always `,00`.
pub fn format_rupiah(amount: u64) -> String {
    let money = Money::from_decimal(Decimal::from(amount), iso::IDR);

    Formatter::money(
        &money,
        Params {
            digit_separator: '.',
            exponent_separator: ',',
            separator_pattern: &[3; 7],
            positions: &[Position::Symbol, Position::Space, Position::Amount],
            rounding: Some(2),
            symbol: Some("Rp"),
            ..Params::default()
        },
    )
}
