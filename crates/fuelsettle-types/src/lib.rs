//! # fuelsettle-types
//!
//! Shared types, errors, and configuration for the **FuelSettle** escrow
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`AccountId`]
//! - **Order model**: [`Order`], [`OrderStatus`]
//! - **Escrow model**: [`EscrowRecord`], [`Recipient`]
//! - **Actions and roles**: [`SettlementAction`], [`Role`]
//! - **Audit trail**: [`SettlementEvent`]
//! - **Configuration**: [`EngineConfig`], [`OrderLimits`]
//! - **Errors**: [`FuelSettleError`] with `FS_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod action;
pub mod config;
pub mod constants;
pub mod error;
pub mod escrow;
pub mod event;
pub mod ids;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use fuelsettle_types::{Order, OrderStatus, EscrowRecord, ...};

pub use action::*;
pub use config::*;
pub use error::*;
pub use escrow::*;
pub use event::*;
pub use ids::*;
pub use order::*;

// Constants are accessed via `fuelsettle_types::constants::FOO`
// (not re-exported to avoid name collisions).
