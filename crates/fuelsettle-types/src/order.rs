//! Order types for the FuelSettle settlement engine.
//!
//! An [`Order`] is created by the buyer with the full payment captured into
//! escrow, and moves through its lifecycle only via the settlement state
//! machine. The buyer, supplier, quantity, and unit price are immutable
//! after creation; `total_amount` is always derived from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, OrderId};

/// Lifecycle status of a fuel order.
///
/// Collaborators see this as the integer-coded enumeration
/// {0=Created, 1=Delivered, 2=Settled, 3=Cancelled, 4=Declined}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Funds captured in escrow; actionable by supplier (confirm/decline)
    /// and buyer (cancel).
    Created,
    /// Supplier attested delivery; escrow already paid out to the supplier.
    Delivered,
    /// Terminal bookkeeping acknowledgement over an already-released escrow.
    Settled,
    /// Buyer withdrew the order; escrow refunded to the buyer.
    Cancelled,
    /// Supplier rejected the order; escrow refunded to the buyer.
    Declined,
}

impl OrderStatus {
    /// Stable integer code surfaced to external collaborators.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Created => 0,
            Self::Delivered => 1,
            Self::Settled => 2,
            Self::Cancelled => 3,
            Self::Declined => 4,
        }
    }

    /// Inverse of [`OrderStatus::code`]. Returns `None` for unknown codes.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Created),
            1 => Some(Self::Delivered),
            2 => Some(Self::Settled),
            3 => Some(Self::Cancelled),
            4 => Some(Self::Declined),
            _ => None,
        }
    }

    /// A terminal status permits no further transition.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Cancelled | Self::Declined)
    }

    /// Whether escrow is still held while the order is in this status.
    #[must_use]
    pub fn holds_escrow(self) -> bool {
        matches!(self, Self::Created)
    }

    /// Invoicing collaborators treat delivered and settled orders as billable.
    #[must_use]
    pub fn is_invoice_eligible(self) -> bool {
        matches!(self, Self::Delivered | Self::Settled)
    }

    /// Whether the supplier/buyer can still act on an order in this status.
    #[must_use]
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::Created)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Settled => write!(f, "Settled"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Declined => write!(f, "Declined"),
        }
    }
}

/// A fuel-delivery order. The central entity of the settlement engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Sequential identifier, immutable after creation.
    pub order_id: OrderId,
    /// The account that created and funded the order.
    pub buyer: AccountId,
    /// The account designated to fulfill the order.
    pub supplier: AccountId,
    /// Fuel quantity in litres. Always positive.
    pub quantity_litres: u64,
    /// Price per litre in the settlement currency's smallest unit.
    pub unit_price: Decimal,
    /// Derived `quantity_litres * unit_price`. Recomputed at creation,
    /// never independently settable.
    pub total_amount: Decimal,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Set true only on the Created → Delivered transition.
    pub delivery_confirmed: bool,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Construct a new order in [`OrderStatus::Created`] with the derived total.
    #[must_use]
    pub fn new(
        order_id: OrderId,
        buyer: AccountId,
        supplier: AccountId,
        quantity_litres: u64,
        unit_price: Decimal,
    ) -> Self {
        Self {
            order_id,
            buyer,
            supplier,
            quantity_litres,
            unit_price,
            total_amount: Self::total_of(quantity_litres, unit_price),
            status: OrderStatus::Created,
            delivery_confirmed: false,
            created_at: Utc::now(),
        }
    }

    /// The derived total for a quantity/price pair.
    #[must_use]
    pub fn total_of(quantity_litres: u64, unit_price: Decimal) -> Decimal {
        Decimal::from(quantity_litres) * unit_price
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy(buyer: AccountId, supplier: AccountId) -> Self {
        Self::new(OrderId::FIRST, buyer, supplier, 1000, Decimal::TWO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_amount_is_derived() {
        let order = Order::new(
            OrderId(7),
            AccountId::new(),
            AccountId::new(),
            1000,
            Decimal::TWO,
        );
        assert_eq!(order.total_amount, Decimal::new(2000, 0));
        assert_eq!(order.status, OrderStatus::Created);
        assert!(!order.delivery_confirmed);
    }

    #[test]
    fn status_codes_roundtrip() {
        for code in 0..5 {
            let status = OrderStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
        assert!(OrderStatus::from_code(5).is_none());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!OrderStatus::Created.is_terminal());
        assert!(!OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Settled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Declined.is_terminal());
    }

    #[test]
    fn escrow_held_only_while_created() {
        assert!(OrderStatus::Created.holds_escrow());
        assert!(!OrderStatus::Delivered.holds_escrow());
        assert!(!OrderStatus::Settled.holds_escrow());
        assert!(!OrderStatus::Cancelled.holds_escrow());
        assert!(!OrderStatus::Declined.holds_escrow());
    }

    #[test]
    fn invoice_eligibility() {
        assert!(OrderStatus::Delivered.is_invoice_eligible());
        assert!(OrderStatus::Settled.is_invoice_eligible());
        assert!(!OrderStatus::Created.is_invoice_eligible());
        assert!(!OrderStatus::Cancelled.is_invoice_eligible());
        assert!(!OrderStatus::Declined.is_invoice_eligible());
    }

    #[test]
    fn status_display_labels() {
        assert_eq!(format!("{}", OrderStatus::Created), "Created");
        assert_eq!(format!("{}", OrderStatus::Declined), "Declined");
    }

    #[test]
    fn order_serde_roundtrip() {
        let order = Order::dummy(AccountId::new(), AccountId::new());
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order.order_id, back.order_id);
        assert_eq!(order.total_amount, back.total_amount);
        assert_eq!(order.status, back.status);
    }
}
