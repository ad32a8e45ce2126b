//! Append-only log of committed transitions.
//!
//! One entry per committed status change, in commit order. Collaborators
//! read through a pull-based cursor (`events_from`) so the core never
//! manages subscriber lifecycles or delivery retries. Appending never
//! fails, so the log can never block a settlement transition.

use chrono::{DateTime, Utc};
use fuelsettle_types::{AccountId, OrderId, OrderStatus, SettlementEvent};

/// The audit trail of every committed transition.
pub struct EventLog {
    events: Vec<SettlementEvent>,
}

impl EventLog {
    /// Create a new empty log.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append a committed transition. Returns the assigned sequence number.
    pub fn append(
        &mut self,
        order_id: OrderId,
        from_status: Option<OrderStatus>,
        to_status: OrderStatus,
        actor: AccountId,
        occurred_at: DateTime<Utc>,
    ) -> u64 {
        let seq = self.events.len() as u64;
        self.events.push(SettlementEvent {
            seq,
            order_id,
            from_status,
            to_status,
            actor,
            occurred_at,
        });
        seq
    }

    /// All events in commit order.
    pub fn iter_all(&self) -> impl Iterator<Item = &SettlementEvent> {
        self.events.iter()
    }

    /// Events for one order, in commit order.
    pub fn iter_order(&self, order_id: OrderId) -> impl Iterator<Item = &SettlementEvent> {
        self.events.iter().filter(move |e| e.order_id == order_id)
    }

    /// Cursor read: all events at or after `seq`. A collaborator that
    /// remembers the last sequence it saw resumes exactly where it left off.
    #[must_use]
    pub fn events_from(&self, seq: u64) -> &[SettlementEvent] {
        let start = usize::try_from(seq).unwrap_or(usize::MAX).min(self.events.len());
        &self.events[start..]
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no transition has been committed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
