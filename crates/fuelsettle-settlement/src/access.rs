//! Access control — resolves a caller's relationship to an order.
//!
//! A pure function of `(caller, order.buyer, order.supplier, action)`.
//! It consults no other state and mutates nothing, which keeps it
//! unit-testable independent of escrow and storage.

use fuelsettle_types::{AccountId, FuelSettleError, Order, Result, Role, SettlementAction};

/// Authorize `caller` to perform `action` on `order`.
///
/// # Errors
/// Returns `Unauthorized` (naming the required role) on any mismatch.
pub fn authorize(caller: AccountId, order: &Order, action: SettlementAction) -> Result<()> {
    let required = action.required_role();
    let expected = match required {
        Role::Buyer => order.buyer,
        Role::Supplier => order.supplier,
    };

    if caller == expected {
        Ok(())
    } else {
        Err(FuelSettleError::Unauthorized { action, required })
    }
}
