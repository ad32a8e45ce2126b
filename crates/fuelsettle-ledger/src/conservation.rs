//! Conservation invariant checker.
//!
//! Mathematical invariant enforced after every settlement transition:
//! ```text
//! Σ(account balances) + Σ(held escrow) == Σ(deposits)
//! ```
//!
//! Escrow capture and release only move value between accounts and custody;
//! they never create or destroy it. If this invariant ever breaks, the
//! operation must abort with the fatal `ConservationViolation` error —
//! it indicates a bug in the vault and is never caught and suppressed.

use fuelsettle_types::{FuelSettleError, Result};
use rust_decimal::Decimal;

use crate::{bank::SettlementBank, vault::EscrowVault};

/// Tracks total deposited supply and validates conservation after every
/// settlement transition.
pub struct ConservationChecker {
    /// Total external deposits since the engine was created.
    deposits: Decimal,
}

impl ConservationChecker {
    /// Create a new tracker with zero recorded supply.
    #[must_use]
    pub fn new() -> Self {
        Self {
            deposits: Decimal::ZERO,
        }
    }

    /// Record an external deposit.
    pub fn record_deposit(&mut self, amount: Decimal) {
        self.deposits += amount;
    }

    /// Expected total supply: everything ever deposited.
    #[must_use]
    pub fn expected_supply(&self) -> Decimal {
        self.deposits
    }

    /// Verify that bank balances plus vault custody equal the deposited
    /// supply.
    ///
    /// # Errors
    /// Returns [`FuelSettleError::ConservationViolation`] if actual ≠ expected.
    pub fn verify(&self, bank: &SettlementBank, vault: &EscrowVault) -> Result<()> {
        let actual = bank.total_supply() + vault.held_total();
        let expected = self.expected_supply();
        if actual != expected {
            return Err(FuelSettleError::ConservationViolation {
                reason: format!(
                    "actual supply {actual} != expected {expected} \
                     (bank={}, held={})",
                    bank.total_supply(),
                    vault.held_total(),
                ),
            });
        }
        Ok(())
    }
}

impl Default for ConservationChecker {
    fn default() -> Self {
        Self::new()
    }
}
