//! The settlement state machine.
//!
//! Every mutating request enters here. The engine consults access control
//! and the order store, drives the escrow vault, and commits the new status
//! as a single unit. Inside each operation all fallible checks (existence,
//! authorization, transition validity) run before the first mutation, so a
//! failed request leaves no observable effect on the store or the vault.
//!
//! ## Lifecycle
//!
//! ```text
//!            create (buyer, payment attached)
//!                        │
//!                        ▼
//!                   ┌─────────┐  confirm (supplier, payout)   ┌───────────┐
//!                   │ CREATED ├──────────────────────────────▶│ DELIVERED │
//!                   └─┬─────┬─┘                               └─────┬─────┘
//!    cancel (buyer,   │     │  decline (supplier, refund)           │ finalize
//!       refund)       ▼     ▼                                       ▼
//!              ┌───────────┐ ┌──────────┐                     ┌─────────┐
//!              │ CANCELLED │ │ DECLINED │                     │ SETTLED │
//!              └───────────┘ └──────────┘                     └─────────┘
//! ```
//!
//! Payment releases at delivery confirmation; `Settled` is a terminal
//! bookkeeping acknowledgement with no further fund movement.

use chrono::Utc;
use fuelsettle_ledger::{ConservationChecker, EscrowVault, OrderStore, SettlementBank};
use fuelsettle_types::{
    AccountId, EngineConfig, EscrowRecord, FuelSettleError, Order, OrderId, OrderStatus, Result,
    SettlementAction,
};
use rust_decimal::Decimal;

use crate::{access, event_log::EventLog};

/// Orchestrates order lifecycle transitions over explicitly-owned state.
///
/// Each engine instance owns its own store, bank, vault, and log — there are
/// no process-wide singletons, so tests instantiate isolated engines.
/// Mutations serialize through `&mut self`, which gives the single
/// globally-ordered sequence of transitions per engine.
pub struct SettlementEngine {
    config: EngineConfig,
    store: OrderStore,
    bank: SettlementBank,
    vault: EscrowVault,
    conservation: ConservationChecker,
    log: EventLog,
}

impl SettlementEngine {
    /// Create an engine with empty state.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let store = OrderStore::new(config.limits.clone());
        Self {
            config,
            store,
            bank: SettlementBank::new(),
            vault: EscrowVault::new(),
            conservation: ConservationChecker::new(),
            log: EventLog::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Funding
    // -----------------------------------------------------------------------

    /// Deposit external funds into an account.
    pub fn deposit(&mut self, account: AccountId, amount: Decimal) {
        self.bank.deposit(account, amount);
        self.conservation.record_deposit(amount);
        tracing::debug!(account = %account, amount = %amount, "Deposit");
    }

    /// Current balance of an account.
    #[must_use]
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.bank.balance(account)
    }

    // -----------------------------------------------------------------------
    // Mutating operations
    // -----------------------------------------------------------------------

    /// Create an order with the buyer's payment attached.
    ///
    /// Captures `quantity_litres * unit_price` into escrow (surplus attached
    /// value returns to the buyer as change) and stores the order in
    /// `Created`. If the capture fails, no order is created and no escrow
    /// record exists.
    ///
    /// # Errors
    /// `InvalidParameters`, `InsufficientFunds`, `InsufficientBalance`.
    pub fn create_order(
        &mut self,
        buyer: AccountId,
        supplier: AccountId,
        quantity_litres: u64,
        unit_price: Decimal,
        attached: Decimal,
    ) -> Result<OrderId> {
        self.store.validate(quantity_litres, unit_price)?;
        let required = Order::total_of(quantity_litres, unit_price);

        // The id the store will assign; capture is keyed by it so the escrow
        // record and the order carry the same identifier.
        let order_id = self.store.next_order_id();
        self.vault
            .capture(&mut self.bank, order_id, buyer, attached, required)?;

        // Parameters were validated above, so this cannot fail.
        let assigned = self
            .store
            .create(buyer, supplier, quantity_litres, unit_price)?;
        debug_assert_eq!(assigned, order_id);

        self.log
            .append(order_id, None, OrderStatus::Created, buyer, Utc::now());
        self.conservation.verify(&self.bank, &self.vault)?;

        tracing::info!(
            order = %order_id,
            buyer = %buyer,
            supplier = %supplier,
            total = %required,
            currency = %self.config.currency,
            "Order created"
        );
        Ok(order_id)
    }

    /// Supplier attests delivery. Releases the escrowed total to the
    /// supplier and marks the order `Delivered` with `delivery_confirmed`.
    ///
    /// # Errors
    /// `OrderNotFound`, `Unauthorized`, `InvalidTransition`, vault errors.
    pub fn confirm_delivery(&mut self, caller: AccountId, order_id: OrderId) -> Result<()> {
        let order = self.store.get(order_id)?;
        access::authorize(caller, &order, SettlementAction::ConfirmDelivery)?;
        Self::check_transition(&order, SettlementAction::ConfirmDelivery)?;

        let paid = self
            .vault
            .payout(&mut self.bank, order_id, order.supplier)?;
        self.store
            .commit(order_id, OrderStatus::Delivered, Some(true))?;
        self.log.append(
            order_id,
            Some(order.status),
            OrderStatus::Delivered,
            caller,
            Utc::now(),
        );
        self.conservation.verify(&self.bank, &self.vault)?;

        tracing::info!(
            order = %order_id,
            supplier = %order.supplier,
            paid = %paid,
            "Delivery confirmed, supplier paid"
        );
        Ok(())
    }

    /// Supplier (or the automated follow-up trigger via
    /// [`SettlementEngine::auto_finalize`]) marks a delivered order fully
    /// reconciled. No fund movement — the escrow was already released at
    /// delivery confirmation.
    ///
    /// # Errors
    /// `OrderNotFound`, `Unauthorized`, `InvalidTransition`.
    pub fn finalize_settlement(&mut self, caller: AccountId, order_id: OrderId) -> Result<()> {
        let order = self.store.get(order_id)?;
        access::authorize(caller, &order, SettlementAction::FinalizeSettlement)?;
        self.finalize(&order, caller)
    }

    /// The automated follow-up trigger for settlement finalization. Skips
    /// caller authorization; the supplier is recorded as the acting party.
    ///
    /// # Errors
    /// `OrderNotFound`, `InvalidTransition`.
    pub fn auto_finalize(&mut self, order_id: OrderId) -> Result<()> {
        let order = self.store.get(order_id)?;
        let actor = order.supplier;
        self.finalize(&order, actor)
    }

    fn finalize(&mut self, order: &Order, actor: AccountId) -> Result<()> {
        Self::check_transition(order, SettlementAction::FinalizeSettlement)?;

        self.store
            .commit(order.order_id, OrderStatus::Settled, None)?;
        self.log.append(
            order.order_id,
            Some(order.status),
            OrderStatus::Settled,
            actor,
            Utc::now(),
        );
        self.conservation.verify(&self.bank, &self.vault)?;

        tracing::info!(order = %order.order_id, "Settlement finalized");
        Ok(())
    }

    /// Supplier rejects a created order. Refunds the escrowed total to the
    /// buyer and marks the order `Declined`.
    ///
    /// # Errors
    /// `OrderNotFound`, `Unauthorized`, `InvalidTransition`, vault errors.
    pub fn decline_order(&mut self, caller: AccountId, order_id: OrderId) -> Result<()> {
        let order = self.store.get(order_id)?;
        access::authorize(caller, &order, SettlementAction::Decline)?;
        Self::check_transition(&order, SettlementAction::Decline)?;

        let refunded = self.vault.refund(&mut self.bank, order_id, order.buyer)?;
        self.store.commit(order_id, OrderStatus::Declined, None)?;
        self.log.append(
            order_id,
            Some(order.status),
            OrderStatus::Declined,
            caller,
            Utc::now(),
        );
        self.conservation.verify(&self.bank, &self.vault)?;

        tracing::info!(
            order = %order_id,
            buyer = %order.buyer,
            refunded = %refunded,
            "Order declined, buyer refunded"
        );
        Ok(())
    }

    /// Buyer withdraws a created order. Refunds the escrowed total to the
    /// buyer and marks the order `Cancelled`.
    ///
    /// # Errors
    /// `OrderNotFound`, `Unauthorized`, `InvalidTransition`, vault errors.
    pub fn cancel_order(&mut self, caller: AccountId, order_id: OrderId) -> Result<()> {
        let order = self.store.get(order_id)?;
        access::authorize(caller, &order, SettlementAction::Cancel)?;
        Self::check_transition(&order, SettlementAction::Cancel)?;

        let refunded = self.vault.refund(&mut self.bank, order_id, order.buyer)?;
        self.store.commit(order_id, OrderStatus::Cancelled, None)?;
        self.log.append(
            order_id,
            Some(order.status),
            OrderStatus::Cancelled,
            caller,
            Utc::now(),
        );
        self.conservation.verify(&self.bank, &self.vault)?;

        tracing::info!(
            order = %order_id,
            buyer = %order.buyer,
            refunded = %refunded,
            "Order cancelled, buyer refunded"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read operations — bypass access control and the vault
    // -----------------------------------------------------------------------

    /// Snapshot of one order.
    ///
    /// # Errors
    /// `OrderNotFound` for unknown ids.
    pub fn get_order(&self, order_id: OrderId) -> Result<Order> {
        self.store.get(order_id)
    }

    /// All orders, ascending by id.
    #[must_use]
    pub fn list_orders(&self) -> Vec<Order> {
        self.store.list()
    }

    /// Orders created by `buyer`.
    #[must_use]
    pub fn list_orders_for_buyer(&self, buyer: AccountId) -> Vec<Order> {
        self.store.list_by_buyer(buyer)
    }

    /// Orders designated to `supplier`.
    #[must_use]
    pub fn list_orders_for_supplier(&self, supplier: AccountId) -> Vec<Order> {
        self.store.list_by_supplier(supplier)
    }

    /// The escrow record for an order, if one was ever opened.
    #[must_use]
    pub fn escrow(&self, order_id: OrderId) -> Option<&EscrowRecord> {
        self.vault.get(order_id)
    }

    /// Currently held escrow for an order. Zero if released or unknown.
    #[must_use]
    pub fn held_amount(&self, order_id: OrderId) -> Decimal {
        self.vault.held_amount(order_id)
    }

    /// The append-only transition log (pull-based cursor reads).
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.log
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Transition table
    // -----------------------------------------------------------------------

    /// The status an action is legal from.
    fn expected_from(action: SettlementAction) -> OrderStatus {
        match action {
            SettlementAction::ConfirmDelivery
            | SettlementAction::Decline
            | SettlementAction::Cancel => OrderStatus::Created,
            SettlementAction::FinalizeSettlement => OrderStatus::Delivered,
        }
    }

    fn check_transition(order: &Order, action: SettlementAction) -> Result<()> {
        if order.status == Self::expected_from(action) {
            Ok(())
        } else {
            Err(FuelSettleError::InvalidTransition {
                from: order.status,
                action,
            })
        }
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_funded_buyer() -> (SettlementEngine, AccountId, AccountId) {
        let mut engine = SettlementEngine::default();
        let buyer = AccountId::new();
        let supplier = AccountId::new();
        engine.deposit(buyer, Decimal::new(10_000, 0));
        (engine, buyer, supplier)
    }

    #[test]
    fn create_captures_escrow_and_logs() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();

        let id = engine
            .create_order(buyer, supplier, 1000, Decimal::TWO, Decimal::new(2000, 0))
            .unwrap();

        let order = engine.get_order(id).unwrap();
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(engine.held_amount(id), Decimal::new(2000, 0));
        assert_eq!(engine.balance(buyer), Decimal::new(8000, 0));

        let events: Vec<_> = engine.events().iter_order(id).collect();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_creation());
        assert_eq!(events[0].actor, buyer);
    }

    #[test]
    fn failed_create_leaves_nothing_behind() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();

        let err = engine
            .create_order(buyer, supplier, 1000, Decimal::TWO, Decimal::new(1999, 0))
            .unwrap_err();
        assert!(matches!(err, FuelSettleError::InsufficientFunds { .. }));

        assert!(engine.list_orders().is_empty());
        assert!(engine.escrow(OrderId::FIRST).is_none());
        assert_eq!(engine.balance(buyer), Decimal::new(10_000, 0));
        assert!(engine.events().is_empty());
    }

    #[test]
    fn full_settlement_lifecycle() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();
        let id = engine
            .create_order(buyer, supplier, 1000, Decimal::TWO, Decimal::new(2000, 0))
            .unwrap();

        engine.confirm_delivery(supplier, id).unwrap();
        let order = engine.get_order(id).unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(order.delivery_confirmed);
        assert_eq!(engine.balance(supplier), Decimal::new(2000, 0));
        assert_eq!(engine.held_amount(id), Decimal::ZERO);

        engine.finalize_settlement(supplier, id).unwrap();
        let order = engine.get_order(id).unwrap();
        assert_eq!(order.status, OrderStatus::Settled);
        // Finalization moved no funds.
        assert_eq!(engine.balance(supplier), Decimal::new(2000, 0));

        // One event per committed transition.
        assert_eq!(engine.events().iter_order(id).count(), 3);
    }

    #[test]
    fn finalize_requires_delivered() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();
        let id = engine
            .create_order(buyer, supplier, 1000, Decimal::TWO, Decimal::new(2000, 0))
            .unwrap();

        let err = engine.finalize_settlement(supplier, id).unwrap_err();
        assert!(matches!(
            err,
            FuelSettleError::InvalidTransition {
                from: OrderStatus::Created,
                ..
            }
        ));
    }

    #[test]
    fn finalize_on_settled_is_rejected() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();
        let id = engine
            .create_order(buyer, supplier, 1000, Decimal::TWO, Decimal::new(2000, 0))
            .unwrap();
        engine.confirm_delivery(supplier, id).unwrap();
        engine.finalize_settlement(supplier, id).unwrap();

        let err = engine.finalize_settlement(supplier, id).unwrap_err();
        assert!(matches!(err, FuelSettleError::InvalidTransition { .. }));
    }

    #[test]
    fn auto_finalize_records_supplier_as_actor() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();
        let id = engine
            .create_order(buyer, supplier, 1000, Decimal::TWO, Decimal::new(2000, 0))
            .unwrap();
        engine.confirm_delivery(supplier, id).unwrap();

        engine.auto_finalize(id).unwrap();
        assert_eq!(engine.get_order(id).unwrap().status, OrderStatus::Settled);

        let last = engine.events().iter_order(id).last().unwrap();
        assert_eq!(last.actor, supplier);
        assert_eq!(last.to_status, OrderStatus::Settled);
    }

    #[test]
    fn racing_second_mutation_fails_cleanly() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();
        let id = engine
            .create_order(buyer, supplier, 1000, Decimal::TWO, Decimal::new(2000, 0))
            .unwrap();

        // Two requests race at the state-machine level: the buyer's cancel
        // commits first, the supplier's confirm then fails against the new
        // committed state.
        engine.cancel_order(buyer, id).unwrap();
        let err = engine.confirm_delivery(supplier, id).unwrap_err();
        assert!(matches!(
            err,
            FuelSettleError::InvalidTransition {
                from: OrderStatus::Cancelled,
                ..
            }
        ));

        // The loser changed nothing.
        assert_eq!(engine.balance(buyer), Decimal::new(10_000, 0));
        assert_eq!(engine.balance(supplier), Decimal::ZERO);
        assert_eq!(engine.events().iter_order(id).count(), 2);
    }

    #[test]
    fn mutations_on_unknown_order_fail() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();
        let missing = OrderId(7);
        assert!(matches!(
            engine.confirm_delivery(supplier, missing).unwrap_err(),
            FuelSettleError::OrderNotFound(_)
        ));
        assert!(matches!(
            engine.cancel_order(buyer, missing).unwrap_err(),
            FuelSettleError::OrderNotFound(_)
        ));
    }

    #[test]
    fn independent_orders_do_not_interfere() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();
        let first = engine
            .create_order(buyer, supplier, 1000, Decimal::TWO, Decimal::new(2000, 0))
            .unwrap();
        let second = engine
            .create_order(buyer, supplier, 500, Decimal::TWO, Decimal::new(1000, 0))
            .unwrap();

        engine.decline_order(supplier, first).unwrap();

        // The second order's escrow is untouched by the first's refund.
        assert_eq!(engine.held_amount(second), Decimal::new(1000, 0));
        assert_eq!(
            engine.get_order(second).unwrap().status,
            OrderStatus::Created
        );
    }

    #[test]
    fn listing_filters_by_party() {
        let (mut engine, buyer, supplier) = engine_with_funded_buyer();
        let other_supplier = AccountId::new();
        engine
            .create_order(buyer, supplier, 1000, Decimal::TWO, Decimal::new(2000, 0))
            .unwrap();
        engine
            .create_order(buyer, other_supplier, 500, Decimal::TWO, Decimal::new(1000, 0))
            .unwrap();

        assert_eq!(engine.list_orders().len(), 2);
        assert_eq!(engine.list_orders_for_buyer(buyer).len(), 2);
        assert_eq!(engine.list_orders_for_supplier(supplier).len(), 1);
        assert_eq!(engine.list_orders_for_supplier(other_supplier).len(), 1);
    }
}
