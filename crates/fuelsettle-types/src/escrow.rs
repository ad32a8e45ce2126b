//! # Escrow record — per-order custody accounting
//!
//! Every order owns exactly one [`EscrowRecord`], opened at creation with the
//! full order total and closed by a single release to either the supplier
//! (settlement payout) or the buyer (refund).
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  payout        ┌────────────────────┐
//!   │ HELD ├───────────────▶│ RELEASED(SUPPLIER) │
//!   └───┬──┘                └────────────────────┘
//!       │ refund
//!       ▼
//!   ┌─────────────────┐
//!   │ RELEASED(BUYER) │
//!   └─────────────────┘
//! ```
//!
//! The release is one-shot and irreversible; `held_amount + released_amount`
//! must equal `total_amount` at every observable point.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{FuelSettleError, OrderId, Result};

/// The destination escrowed value was released to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    /// Refund: cancellation or decline.
    Buyer,
    /// Settlement payout: delivery confirmed.
    Supplier,
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buyer => write!(f, "BUYER"),
            Self::Supplier => write!(f, "SUPPLIER"),
        }
    }
}

/// Custody accounting for one order's escrowed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// The order this record custodies value for.
    pub order_id: OrderId,
    /// The order's derived total at capture time.
    pub total_amount: Decimal,
    /// Value currently in custody. Equals `total_amount` until release, zero after.
    pub held_amount: Decimal,
    /// Value already moved out of custody. Zero until release, `total_amount` after.
    pub released_amount: Decimal,
    /// Set exactly once, at the releasing transition.
    pub released_to: Option<Recipient>,
    /// When the capture occurred.
    pub captured_at: DateTime<Utc>,
}

impl EscrowRecord {
    /// Open a record holding the full order total.
    #[must_use]
    pub fn new(order_id: OrderId, total_amount: Decimal) -> Self {
        Self {
            order_id,
            total_amount,
            held_amount: total_amount,
            released_amount: Decimal::ZERO,
            released_to: None,
            captured_at: Utc::now(),
        }
    }

    /// Whether the held value has already left custody.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released_to.is_some()
    }

    /// Release the full held amount to `to`. One-shot.
    ///
    /// Returns the amount moved so the caller can credit the recipient.
    ///
    /// # Errors
    /// Returns [`FuelSettleError::AlreadyReleased`] if nothing is held.
    pub fn mark_released(&mut self, to: Recipient) -> Result<Decimal> {
        if self.is_released() || self.held_amount.is_zero() {
            return Err(FuelSettleError::AlreadyReleased(self.order_id));
        }
        let amount = self.held_amount;
        self.held_amount = Decimal::ZERO;
        self.released_amount += amount;
        self.released_to = Some(to);
        Ok(amount)
    }

    /// Check the conservation equation for this record.
    ///
    /// # Errors
    /// Returns the fatal [`FuelSettleError::ConservationViolation`] if
    /// `held + released != total`. Callers must propagate it, never
    /// suppress it.
    pub fn verify(&self) -> Result<()> {
        if self.held_amount + self.released_amount != self.total_amount {
            return Err(FuelSettleError::ConservationViolation {
                reason: format!(
                    "order {}: held {} + released {} != total {}",
                    self.order_id, self.held_amount, self.released_amount, self.total_amount,
                ),
            });
        }
        Ok(())
    }
}
