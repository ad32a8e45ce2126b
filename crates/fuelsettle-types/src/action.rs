//! Settlement actions and the roles authorized to perform them.
//!
//! The role table is data, not control flow: the access-control gate in the
//! settlement plane resolves `action.required_role()` against the order's
//! buyer/supplier and nothing else.

use serde::{Deserialize, Serialize};

/// The relationship of a caller to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The account that created and funded the order.
    Buyer,
    /// The account designated to fulfill the order.
    Supplier,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buyer => write!(f, "BUYER"),
            Self::Supplier => write!(f, "SUPPLIER"),
        }
    }
}

/// A mutating action requested against an existing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementAction {
    /// Supplier attests delivery; escrow pays out to the supplier.
    ConfirmDelivery,
    /// Marks a delivered order fully reconciled. No fund movement.
    FinalizeSettlement,
    /// Supplier rejects the order; escrow refunds the buyer.
    Decline,
    /// Buyer withdraws the order; escrow refunds the buyer.
    Cancel,
}

impl SettlementAction {
    /// The role a caller must hold on the order to perform this action.
    #[must_use]
    pub fn required_role(self) -> Role {
        match self {
            Self::ConfirmDelivery | Self::FinalizeSettlement | Self::Decline => Role::Supplier,
            Self::Cancel => Role::Buyer,
        }
    }
}

impl std::fmt::Display for SettlementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfirmDelivery => write!(f, "CONFIRM_DELIVERY"),
            Self::FinalizeSettlement => write!(f, "FINALIZE_SETTLEMENT"),
            Self::Decline => write!(f, "DECLINE"),
            Self::Cancel => write!(f, "CANCEL"),
        }
    }
}
