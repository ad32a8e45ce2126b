//! Error types for the FuelSettle settlement engine.
//!
//! All errors use the `FS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Funds / escrow errors
//! - 3xx: Authorization errors
//! - 4xx: Transition errors
//! - 9xx: General / internal errors
//!
//! Every error is synchronous and terminates the attempted transition with
//! no partial effect; the core never retries on its own.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{OrderId, OrderStatus, Role, SettlementAction};

/// Central error enum for all FuelSettle operations.
#[derive(Debug, Error)]
pub enum FuelSettleError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// Order creation parameters failed validation (non-positive quantity
    /// or unit price, or quantity above the configured limit).
    #[error("FS_ERR_100: Invalid order parameters: {reason}")]
    InvalidParameters { reason: String },

    /// The requested order does not exist in the store.
    #[error("FS_ERR_101: Order not found: {0}")]
    OrderNotFound(OrderId),

    // =================================================================
    // Funds / Escrow Errors (2xx)
    // =================================================================
    /// The payment attached to the request is below the required total.
    #[error("FS_ERR_200: Insufficient funds attached: required {required}, attached {attached}")]
    InsufficientFunds {
        required: Decimal,
        attached: Decimal,
    },

    /// No escrow record exists for this order.
    #[error("FS_ERR_201: No escrow record for order: {0}")]
    UnknownOrder(OrderId),

    /// The escrow for this order was already released (internal invariant
    /// guard against double spend).
    #[error("FS_ERR_202: Escrow already released for order: {0}")]
    AlreadyReleased(OrderId),

    /// An escrow record already exists for this order.
    #[error("FS_ERR_203: Escrow record already exists for order: {0}")]
    DuplicateEscrow(OrderId),

    /// The paying account's balance cannot cover the attached payment.
    #[error("FS_ERR_204: Insufficient account balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// Conservation invariant violated — critical safety alert. Indicates a
    /// bug in the vault; must abort the operation, never be suppressed.
    #[error("FS_ERR_205: Conservation invariant violation: {reason}")]
    ConservationViolation { reason: String },

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// The caller does not hold the role the action requires on this order.
    #[error("FS_ERR_300: Unauthorized: {action} requires the order's {required}")]
    Unauthorized {
        action: SettlementAction,
        required: Role,
    },

    // =================================================================
    // Transition Errors (4xx)
    // =================================================================
    /// The requested action is not legal from the order's current status.
    #[error("FS_ERR_400: Invalid transition: {action} is not legal from status {from}")]
    InvalidTransition {
        from: OrderStatus,
        action: SettlementAction,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("FS_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, FuelSettleError>;
