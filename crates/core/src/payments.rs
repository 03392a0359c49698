//! Payment methods and results

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the buyer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Manual bank transfer, confirmed later
    #[default]
    BankTransfer,

    /// E-wallet, confirmed through a provider
    #[serde(rename = "e-wallet")]
    EWallet,

    /// Cash on delivery
    Cod,
}

impl PaymentMethod {
    /// Wire name of the method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankTransfer => "bank-transfer",
            Self::EWallet => "e-wallet",
            Self::Cod => "cod",
        }
    }

    /// Transaction id prefix for methods settled offline.
    const fn offline_prefix(self) -> Option<&'static str> {
        match self {
            Self::BankTransfer => Some("BT"),
            Self::Cod => Some("COD"),
            Self::EWallet => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown payment method name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method \"{0}\"")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bank-transfer" => Ok(Self::BankTransfer),
            "e-wallet" => Ok(Self::EWallet),
            "cod" => Ok(Self::Cod),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Outcome of a payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    /// Whether the payment was accepted
    pub success: bool,

    /// E-wallet provider or payment method name
    pub provider: Option<String>,

    /// Provider transaction id
    pub transaction_id: Option<String>,

    /// Accepted but not yet settled
    pub pending: bool,
}

impl PaymentResult {
    /// A payment confirmed by an e-wallet provider.
    pub fn settled(provider: impl Into<String>, epoch_millis: i64) -> Self {
        Self {
            success: true,
            provider: Some(provider.into()),
            transaction_id: Some(format!("TX-{epoch_millis}")),
            pending: false,
        }
    }

    /// A payment accepted for a method that settles offline.
    ///
    /// Returns `None` for [`PaymentMethod::EWallet`], which always goes through a provider.
    pub fn offline(method: PaymentMethod, epoch_millis: i64) -> Option<Self> {
        let prefix = method.offline_prefix()?;

        Some(Self {
            success: true,
            provider: Some(method.as_str().to_string()),
            transaction_id: Some(format!("{prefix}-{epoch_millis}")),
            pending: true,
        })
    }

    /// A payment that was not accepted.
    pub const fn failed() -> Self {
        Self {
            success: false,
            provider: None,
            transaction_id: None,
            pending: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn method_wire_names_round_trip_through_from_str() -> TestResult {
        for method in [
            PaymentMethod::BankTransfer,
            PaymentMethod::EWallet,
            PaymentMethod::Cod,
        ] {
            assert_eq!(method.as_str().parse::<PaymentMethod>()?, method);
        }

        Ok(())
    }

    #[test]
    fn method_serializes_to_wire_name() -> TestResult {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::EWallet)?,
            "\"e-wallet\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer)?,
            "\"bank-transfer\""
        );

        Ok(())
    }

    #[test]
    fn offline_results_are_pending_with_prefixed_ids() {
        let bank = PaymentResult::offline(PaymentMethod::BankTransfer, 42);
        let cod = PaymentResult::offline(PaymentMethod::Cod, 42);

        assert_eq!(
            bank.as_ref().and_then(|r| r.transaction_id.as_deref()),
            Some("BT-42")
        );
        assert_eq!(
            cod.as_ref().and_then(|r| r.transaction_id.as_deref()),
            Some("COD-42")
        );
        assert!(bank.is_some_and(|r| r.pending && r.success));
        assert!(PaymentResult::offline(PaymentMethod::EWallet, 42).is_none());
    }

    #[test]
    fn settled_result_uses_tx_prefix() {
        let result = PaymentResult::settled("gopay", 1_700_000_000_000);

        assert_eq!(result.transaction_id.as_deref(), Some("TX-1700000000000"));
        assert!(result.success);
        assert!(!result.pending);
    }
}
