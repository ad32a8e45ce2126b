//! Settlement events for the append-only audit trail.
//!
//! One event per committed transition. Collaborators (UI refresh, invoicing,
//! reporting) consume these through the event log's pull-based cursor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, OrderId, OrderStatus};

/// The record of one committed status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementEvent {
    /// Monotone position in the global log.
    pub seq: u64,
    /// The order that transitioned.
    pub order_id: OrderId,
    /// Status before the transition. `None` for the creation event.
    pub from_status: Option<OrderStatus>,
    /// Status after the transition.
    pub to_status: OrderStatus,
    /// The account whose request drove the transition.
    pub actor: AccountId,
    /// When the transition was committed.
    pub occurred_at: DateTime<Utc>,
}

impl SettlementEvent {
    /// Whether this event records the order's creation.
    #[must_use]
    pub fn is_creation(&self) -> bool {
        self.from_status.is_none()
    }
}
