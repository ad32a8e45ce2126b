//! # fuelsettle-ledger
//!
//! **Custody Plane**: durable order storage, account balances, escrow
//! custody, and the conservation invariant.
//!
//! ## Architecture
//!
//! The Custody Plane owns all value and all order records:
//! 1. **OrderStore**: sequential id assignment, the sole source of truth
//!    for order existence and current state
//! 2. **SettlementBank**: per-account balances in the settlement currency
//! 3. **EscrowVault**: takes custody of attached payments and performs the
//!    single release per order (payout or refund)
//! 4. **ConservationChecker**: Σ balances + Σ held == Σ deposits, checked
//!    after every transition
//!
//! ## Fund Flow
//!
//! ```text
//! bank.deposit() → vault.capture() → [held 1:1 per order]
//!               → vault.payout() → supplier   (delivery confirmed)
//!               → vault.refund() → buyer      (cancelled / declined)
//! ```
//!
//! The vault is the only component permitted to move custodied value.

pub mod bank;
pub mod conservation;
pub mod order_store;
pub mod vault;

pub use bank::SettlementBank;
pub use conservation::ConservationChecker;
pub use order_store::OrderStore;
pub use vault::EscrowVault;
