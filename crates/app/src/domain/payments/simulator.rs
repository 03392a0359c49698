//! E-wallet payment simulator.
//!
//! Mimics a provider hand-off: the provider "opens" for [`OPEN_DELAY`], then waits for
//! confirmation until [`SETTLE_DELAY`] after the start, at which point the payment settles
//! unless the buyer cancelled while it was awaiting confirmation.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use storefront::{PaymentResult, format_rupiah};
use tokio::{
    select,
    sync::watch,
    time::{Instant, sleep_until},
};
use tracing::info;

use crate::domain::payments::errors::PaymentError;

/// Time spent opening the provider before confirmation can be awaited.
pub const OPEN_DELAY: Duration = Duration::from_millis(1200);

/// Time from the start of a payment until it settles.
pub const SETTLE_DELAY: Duration = Duration::from_millis(2800);

/// Observable state of the simulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaymentPhase {
    /// No payment has started yet
    #[default]
    Idle,

    /// The provider is being opened; cancelling is not possible yet
    Opening { provider: String, amount: u64 },

    /// Waiting for the provider to confirm; cancelling is possible
    Awaiting { provider: String, amount: u64 },

    /// The last payment settled
    Settled(PaymentResult),

    /// The last payment was cancelled by the buyer
    Cancelled,
}

impl PaymentPhase {
    /// Whether a payment is currently running.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Opening { .. } | Self::Awaiting { .. })
    }

    /// Whether [`PaymentSimulator::cancel`] would take effect.
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Awaiting { .. })
    }

    /// Heading to show while the payment runs.
    pub fn title(&self) -> Option<String> {
        match self {
            Self::Opening { provider, .. } => Some(format!("Opening {}...", display(provider))),
            Self::Awaiting { .. } => Some("Waiting for payment confirmation".to_string()),
            Self::Idle | Self::Settled(_) | Self::Cancelled => None,
        }
    }

    /// Message to show while the payment runs.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Opening { provider, amount } => Some(format!(
                "Please complete the payment of {} using {}.",
                format_rupiah(*amount),
                display(provider)
            )),
            Self::Awaiting { provider, .. } => Some(format!(
                "The payment is being processed by {}...",
                display(provider)
            )),
            Self::Idle | Self::Settled(_) | Self::Cancelled => None,
        }
    }
}

fn display(provider: &str) -> String {
    provider.to_uppercase()
}

/// Handle to the simulator. Clones share the same payment state, so one clone can cancel a
/// payment another clone is awaiting.
#[derive(Debug, Clone)]
pub struct PaymentSimulator {
    phase: Arc<watch::Sender<PaymentPhase>>,
}

impl PaymentSimulator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Arc::new(watch::Sender::new(PaymentPhase::Idle)),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> PaymentPhase {
        self.phase.borrow().clone()
    }

    /// Observe phase changes.
    pub fn subscribe(&self) -> watch::Receiver<PaymentPhase> {
        self.phase.subscribe()
    }

    /// Run a payment of `amount` through `provider`.
    ///
    /// Dropping the returned future abandons the payment and returns the simulator to
    /// [`PaymentPhase::Idle`].
    ///
    /// # Errors
    ///
    /// - [`PaymentError::AlreadyInFlight`] when another payment is opening or awaiting.
    /// - [`PaymentError::Cancelled`] when the buyer cancelled before settlement.
    pub async fn pay(&self, provider: &str, amount: u64) -> Result<PaymentResult, PaymentError> {
        let started = Instant::now();

        let claimed = self.phase.send_if_modified(|phase| {
            if phase.is_in_flight() {
                return false;
            }

            *phase = PaymentPhase::Opening {
                provider: provider.to_string(),
                amount,
            };

            true
        });

        if !claimed {
            return Err(PaymentError::AlreadyInFlight);
        }

        let _in_flight = InFlight(&self.phase);

        info!(provider, amount, "opening payment provider");

        sleep_until(started + OPEN_DELAY).await;

        self.phase.send_replace(PaymentPhase::Awaiting {
            provider: provider.to_string(),
            amount,
        });

        info!(provider, "awaiting payment confirmation");

        select! {
            () = sleep_until(started + SETTLE_DELAY) => {}
            () = cancelled(self.phase.subscribe()) => {}
        }

        let result = PaymentResult::settled(provider, Timestamp::now().as_millisecond());

        let settled = self.phase.send_if_modified(|phase| {
            if !phase.can_cancel() {
                return false;
            }

            *phase = PaymentPhase::Settled(result.clone());

            true
        });

        if settled {
            info!(provider, transaction_id = ?result.transaction_id, "payment settled");

            Ok(result)
        } else {
            info!(provider, "payment cancelled");

            Err(PaymentError::Cancelled)
        }
    }

    /// Cancel the running payment.
    ///
    /// Only a payment awaiting confirmation can be cancelled; returns whether the request
    /// took effect.
    pub fn cancel(&self) -> bool {
        self.phase.send_if_modified(|phase| {
            if !phase.can_cancel() {
                return false;
            }

            *phase = PaymentPhase::Cancelled;

            true
        })
    }
}

impl Default for PaymentSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once the phase becomes [`PaymentPhase::Cancelled`].
async fn cancelled(mut phase: watch::Receiver<PaymentPhase>) {
    if phase
        .wait_for(|phase| *phase == PaymentPhase::Cancelled)
        .await
        .is_err()
    {
        // sender gone: leave settlement to the timer
        std::future::pending::<()>().await;
    }
}

/// Returns an abandoned payment to idle.
struct InFlight<'a>(&'a watch::Sender<PaymentPhase>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|phase| {
            if !phase.is_in_flight() {
                return false;
            }

            *phase = PaymentPhase::Idle;

            true
        });
    }
}
