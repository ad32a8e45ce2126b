//! Account balance management for the Custody Plane.
//!
//! Tracks per-account available balances in the single settlement currency.
//! "Payment attached to the request" is modeled as a debit against the
//! buyer's account here; escrow releases land back as credits. All mutations
//! are atomic: either the full operation succeeds or the balance is
//! unchanged.

use std::collections::HashMap;

use fuelsettle_types::{AccountId, FuelSettleError, Result};
use rust_decimal::Decimal;

/// Manages account balances in the settlement currency.
///
/// The bank is the source of truth for value outside escrow. The vault
/// calls into it to take custody of attached payments and to pay out
/// releases.
pub struct SettlementBank {
    /// Per-account available balances.
    balances: HashMap<AccountId, Decimal>,
}

impl SettlementBank {
    /// Create a new empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Deposit external funds into an account.
    pub fn deposit(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_insert(Decimal::ZERO) += amount;
    }

    /// Debit an account (payment attached to a request).
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the account cannot cover `amount`.
    pub fn debit(&mut self, account: AccountId, amount: Decimal) -> Result<()> {
        let balance = self
            .balances
            .get_mut(&account)
            .ok_or(FuelSettleError::InsufficientBalance {
                needed: amount,
                available: Decimal::ZERO,
            })?;

        if *balance < amount {
            return Err(FuelSettleError::InsufficientBalance {
                needed: amount,
                available: *balance,
            });
        }

        *balance -= amount;
        Ok(())
    }

    /// Credit an account (escrow release landing, or change returned).
    pub fn credit(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_insert(Decimal::ZERO) += amount;
    }

    /// Current balance of an account. Zero for unknown accounts.
    #[must_use]
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of all account balances.
    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.balances.values().copied().sum()
    }
}

impl Default for SettlementBank {
    fn default() -> Self {
        Self::new()
    }
}
