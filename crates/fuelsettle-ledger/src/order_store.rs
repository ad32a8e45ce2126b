//! Durable order storage with sequential identifier assignment.
//!
//! The store is the sole source of truth for order existence and current
//! state. Identifiers are assigned monotonically starting at zero; orders
//! are never deleted, so terminal orders remain queryable indefinitely.

use std::collections::BTreeMap;

use fuelsettle_types::{
    AccountId, FuelSettleError, Order, OrderId, OrderLimits, OrderStatus, Result,
};
use rust_decimal::Decimal;

/// Maps order identifiers to order records.
///
/// A `BTreeMap` keeps `list()` ordered by ascending id without a sort.
/// Mutation happens only through [`OrderStore::create`] and
/// [`OrderStore::commit`]; `commit` replaces the status and delivery flag
/// and nothing else, so buyer, supplier, quantity, and unit price are
/// immutable for the life of the store.
pub struct OrderStore {
    orders: BTreeMap<OrderId, Order>,
    next_id: OrderId,
    limits: OrderLimits,
}

impl OrderStore {
    /// Create an empty store with the given creation limits.
    #[must_use]
    pub fn new(limits: OrderLimits) -> Self {
        Self {
            orders: BTreeMap::new(),
            next_id: OrderId::FIRST,
            limits,
        }
    }

    /// Validate creation parameters without allocating an identifier.
    ///
    /// # Errors
    /// Returns `InvalidParameters` if the quantity or unit price is not
    /// positive, or the quantity exceeds the configured limit.
    pub fn validate(&self, quantity_litres: u64, unit_price: Decimal) -> Result<()> {
        if quantity_litres == 0 {
            return Err(FuelSettleError::InvalidParameters {
                reason: "quantity must be positive".to_string(),
            });
        }
        if quantity_litres > self.limits.max_quantity_litres {
            return Err(FuelSettleError::InvalidParameters {
                reason: format!(
                    "quantity {} litres exceeds limit {}",
                    quantity_litres, self.limits.max_quantity_litres
                ),
            });
        }
        if unit_price <= Decimal::ZERO {
            return Err(FuelSettleError::InvalidParameters {
                reason: "unit price must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Allocate the next identifier and store a new order in `Created`.
    ///
    /// # Errors
    /// Returns `InvalidParameters` as per [`OrderStore::validate`].
    pub fn create(
        &mut self,
        buyer: AccountId,
        supplier: AccountId,
        quantity_litres: u64,
        unit_price: Decimal,
    ) -> Result<OrderId> {
        self.validate(quantity_litres, unit_price)?;

        let order_id = self.next_id;
        let order = Order::new(order_id, buyer, supplier, quantity_litres, unit_price);
        self.orders.insert(order_id, order);
        self.next_id = order_id.next();

        tracing::debug!(
            order = %order_id,
            buyer = %buyer,
            supplier = %supplier,
            qty_litres = quantity_litres,
            unit_price = %unit_price,
            "Order stored"
        );
        Ok(order_id)
    }

    /// Fetch a snapshot of an order.
    ///
    /// # Errors
    /// Returns `OrderNotFound` for unknown ids.
    pub fn get(&self, order_id: OrderId) -> Result<Order> {
        self.orders
            .get(&order_id)
            .cloned()
            .ok_or(FuelSettleError::OrderNotFound(order_id))
    }

    /// All orders, ascending by id.
    #[must_use]
    pub fn list(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    /// Orders created by `buyer`, ascending by id.
    #[must_use]
    pub fn list_by_buyer(&self, buyer: AccountId) -> Vec<Order> {
        self.orders
            .values()
            .filter(|o| o.buyer == buyer)
            .cloned()
            .collect()
    }

    /// Orders designated to `supplier`, ascending by id.
    #[must_use]
    pub fn list_by_supplier(&self, supplier: AccountId) -> Vec<Order> {
        self.orders
            .values()
            .filter(|o| o.supplier == supplier)
            .cloned()
            .collect()
    }

    /// Atomically replace the stored status (and optionally the delivery
    /// flag). Never touches any other field.
    ///
    /// # Errors
    /// Returns `OrderNotFound` for unknown ids.
    pub fn commit(
        &mut self,
        order_id: OrderId,
        new_status: OrderStatus,
        delivery_confirmed: Option<bool>,
    ) -> Result<()> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(FuelSettleError::OrderNotFound(order_id))?;

        order.status = new_status;
        if let Some(confirmed) = delivery_confirmed {
            order.delivery_confirmed = confirmed;
        }
        Ok(())
    }

    /// The identifier the next `create` will assign (the order count).
    #[must_use]
    pub fn next_order_id(&self) -> OrderId {
        self.next_id
    }

    /// Number of orders ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no order has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new(OrderLimits::default())
    }
}
