//! Escrow vault — captures and releases order payments.
//!
//! The vault is the only component permitted to move custodied value. It
//! takes custody of the buyer's attached payment at order creation and
//! performs exactly one release per order: to the supplier on delivery
//! confirmation, or back to the buyer on cancellation/decline. Funds are
//! never pooled across orders; each record is accounted and moved
//! independently.

use std::collections::HashMap;

use fuelsettle_types::{
    AccountId, EscrowRecord, FuelSettleError, OrderId, Recipient, Result,
};
use rust_decimal::Decimal;

use crate::bank::SettlementBank;

/// Custodies value associated 1:1 with orders.
pub struct EscrowVault {
    /// Escrow records indexed by order id.
    records: HashMap<OrderId, EscrowRecord>,
}

impl EscrowVault {
    /// Create a new empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Atomically take custody of an attached payment.
    ///
    /// 1. Check the attached payment covers the required total
    /// 2. Debit the full attached amount from the buyer
    /// 3. Return any surplus to the buyer as change
    /// 4. Open an escrow record holding exactly `required`
    ///
    /// If any check fails, no debit occurs and no record exists.
    ///
    /// # Errors
    /// - `DuplicateEscrow` if a record already exists for the order
    /// - `InsufficientFunds` if `attached < required`
    /// - `InsufficientBalance` if the buyer's account cannot cover `attached`
    pub fn capture(
        &mut self,
        bank: &mut SettlementBank,
        order_id: OrderId,
        buyer: AccountId,
        attached: Decimal,
        required: Decimal,
    ) -> Result<()> {
        if self.records.contains_key(&order_id) {
            return Err(FuelSettleError::DuplicateEscrow(order_id));
        }
        if attached < required {
            return Err(FuelSettleError::InsufficientFunds { required, attached });
        }

        bank.debit(buyer, attached)?;

        let change = attached - required;
        if !change.is_zero() {
            bank.credit(buyer, change);
        }

        let record = EscrowRecord::new(order_id, required);
        record.verify()?;
        self.records.insert(order_id, record);

        tracing::info!(
            order = %order_id,
            buyer = %buyer,
            held = %required,
            change = %change,
            "Escrow captured"
        );
        Ok(())
    }

    /// Move the full held amount to the recipient account and zero the hold.
    ///
    /// # Errors
    /// - `UnknownOrder` if no escrow record exists
    /// - `AlreadyReleased` if the held amount is already zero
    /// - `ConservationViolation` if the record fails its post-move check
    pub fn release(
        &mut self,
        bank: &mut SettlementBank,
        order_id: OrderId,
        to: Recipient,
        recipient: AccountId,
    ) -> Result<Decimal> {
        let record = self
            .records
            .get_mut(&order_id)
            .ok_or(FuelSettleError::UnknownOrder(order_id))?;

        let amount = record.mark_released(to)?;
        bank.credit(recipient, amount);
        record.verify()?;

        tracing::info!(
            order = %order_id,
            to = %to,
            recipient = %recipient,
            amount = %amount,
            "Escrow released"
        );
        Ok(amount)
    }

    /// Refund the held amount to the buyer (cancel/decline path).
    pub fn refund(
        &mut self,
        bank: &mut SettlementBank,
        order_id: OrderId,
        buyer: AccountId,
    ) -> Result<Decimal> {
        self.release(bank, order_id, Recipient::Buyer, buyer)
    }

    /// Pay the held amount out to the supplier (delivery confirmation path).
    pub fn payout(
        &mut self,
        bank: &mut SettlementBank,
        order_id: OrderId,
        supplier: AccountId,
    ) -> Result<Decimal> {
        self.release(bank, order_id, Recipient::Supplier, supplier)
    }

    /// Look up an escrow record.
    #[must_use]
    pub fn get(&self, order_id: OrderId) -> Option<&EscrowRecord> {
        self.records.get(&order_id)
    }

    /// Currently held amount for an order. Zero if released or unknown.
    #[must_use]
    pub fn held_amount(&self, order_id: OrderId) -> Decimal {
        self.records
            .get(&order_id)
            .map_or(Decimal::ZERO, |r| r.held_amount)
    }

    /// Sum of all held amounts across records.
    #[must_use]
    pub fn held_total(&self) -> Decimal {
        self.records.values().map(|r| r.held_amount).sum()
    }

    /// Number of escrow records (open and released).
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

impl Default for EscrowVault {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (EscrowVault, SettlementBank, AccountId) {
        let vault = EscrowVault::new();
        let mut bank = SettlementBank::new();
        let buyer = AccountId::new();
        bank.deposit(buyer, Decimal::new(10_000, 0));
        (vault, bank, buyer)
    }

    #[test]
    fn capture_holds_required_amount() {
        let (mut vault, mut bank, buyer) = setup();
        vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(2000, 0),
                Decimal::new(2000, 0),
            )
            .unwrap();

        assert_eq!(vault.held_amount(OrderId(0)), Decimal::new(2000, 0));
        assert_eq!(bank.balance(buyer), Decimal::new(8000, 0));
        assert_eq!(vault.count(), 1);
    }

    #[test]
    fn capture_returns_surplus_as_change() {
        let (mut vault, mut bank, buyer) = setup();
        vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(2500, 0),
                Decimal::new(2000, 0),
            )
            .unwrap();

        // Only the required total is held; the 500 surplus came straight back.
        assert_eq!(vault.held_amount(OrderId(0)), Decimal::new(2000, 0));
        assert_eq!(bank.balance(buyer), Decimal::new(8000, 0));
    }

    #[test]
    fn capture_under_required_fails_without_debit() {
        let (mut vault, mut bank, buyer) = setup();
        let err = vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(1500, 0),
                Decimal::new(2000, 0),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            FuelSettleError::InsufficientFunds { required, attached }
                if required == Decimal::new(2000, 0) && attached == Decimal::new(1500, 0)
        ));
        // No record, no debit.
        assert!(vault.get(OrderId(0)).is_none());
        assert_eq!(bank.balance(buyer), Decimal::new(10_000, 0));
    }

    #[test]
    fn capture_beyond_balance_fails_without_record() {
        let (mut vault, mut bank, buyer) = setup();
        let err = vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(20_000, 0),
                Decimal::new(20_000, 0),
            )
            .unwrap_err();
        assert!(matches!(err, FuelSettleError::InsufficientBalance { .. }));
        assert!(vault.get(OrderId(0)).is_none());
    }

    #[test]
    fn duplicate_capture_blocked() {
        let (mut vault, mut bank, buyer) = setup();
        vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(2000, 0),
                Decimal::new(2000, 0),
            )
            .unwrap();
        let err = vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(2000, 0),
                Decimal::new(2000, 0),
            )
            .unwrap_err();
        assert!(matches!(err, FuelSettleError::DuplicateEscrow(_)));
        // First capture's debit is the only one.
        assert_eq!(bank.balance(buyer), Decimal::new(8000, 0));
    }

    #[test]
    fn payout_credits_supplier() {
        let (mut vault, mut bank, buyer) = setup();
        let supplier = AccountId::new();
        vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(2000, 0),
                Decimal::new(2000, 0),
            )
            .unwrap();

        let moved = vault.payout(&mut bank, OrderId(0), supplier).unwrap();
        assert_eq!(moved, Decimal::new(2000, 0));
        assert_eq!(bank.balance(supplier), Decimal::new(2000, 0));
        assert_eq!(vault.held_amount(OrderId(0)), Decimal::ZERO);
        assert_eq!(
            vault.get(OrderId(0)).unwrap().released_to,
            Some(Recipient::Supplier)
        );
    }

    #[test]
    fn refund_credits_buyer() {
        let (mut vault, mut bank, buyer) = setup();
        vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(2000, 0),
                Decimal::new(2000, 0),
            )
            .unwrap();

        vault.refund(&mut bank, OrderId(0), buyer).unwrap();
        assert_eq!(bank.balance(buyer), Decimal::new(10_000, 0));
        assert_eq!(
            vault.get(OrderId(0)).unwrap().released_to,
            Some(Recipient::Buyer)
        );
    }

    #[test]
    fn double_release_blocked_no_double_spend() {
        let (mut vault, mut bank, buyer) = setup();
        let supplier = AccountId::new();
        vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(2000, 0),
                Decimal::new(2000, 0),
            )
            .unwrap();

        vault.payout(&mut bank, OrderId(0), supplier).unwrap();
        let err = vault.payout(&mut bank, OrderId(0), supplier).unwrap_err();
        assert!(matches!(err, FuelSettleError::AlreadyReleased(_)));
        // Exactly one payout landed.
        assert_eq!(bank.balance(supplier), Decimal::new(2000, 0));
    }

    #[test]
    fn release_unknown_order_fails() {
        let (mut vault, mut bank, buyer) = setup();
        let err = vault.refund(&mut bank, OrderId(42), buyer).unwrap_err();
        assert!(matches!(err, FuelSettleError::UnknownOrder(id) if id == OrderId(42)));
    }

    #[test]
    fn held_total_tracks_open_records_only() {
        let (mut vault, mut bank, buyer) = setup();
        vault
            .capture(
                &mut bank,
                OrderId(0),
                buyer,
                Decimal::new(2000, 0),
                Decimal::new(2000, 0),
            )
            .unwrap();
        vault
            .capture(
                &mut bank,
                OrderId(1),
                buyer,
                Decimal::new(3000, 0),
                Decimal::new(3000, 0),
            )
            .unwrap();
        assert_eq!(vault.held_total(), Decimal::new(5000, 0));

        vault.refund(&mut bank, OrderId(0), buyer).unwrap();
        assert_eq!(vault.held_total(), Decimal::new(3000, 0));
        // Released records stay for audit.
        assert_eq!(vault.count(), 2);
    }
}
