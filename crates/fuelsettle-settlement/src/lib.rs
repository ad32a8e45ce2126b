//! # fuelsettle-settlement
//!
//! **Settlement Plane**: access control, the settlement state machine, and
//! the append-only event log.
//!
//! ## Architecture
//!
//! Every mutating request enters the [`SettlementEngine`] and flows:
//! 1. Load the order from the Custody Plane's store
//! 2. Authorize the caller ([`access::authorize`] — pure, deterministic)
//! 3. Validate the requested transition against the current status
//! 4. Drive the escrow vault (payout, refund, or nothing)
//! 5. Commit the new status and append one [`EventLog`] entry
//! 6. Re-verify the conservation invariant
//!
//! Reads (`get`/`list`) bypass access control and the vault entirely.

pub mod access;
pub mod engine;
pub mod event_log;

pub use engine::SettlementEngine;
pub use event_log::EventLog;
