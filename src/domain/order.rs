use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::order_actor::OrderError;

/// Store-assigned internal identifier.
pub type OrderId = u64;

/// Lifecycle states of an order. Orders only ever move forward, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    /// The single status this one may advance to. `Delivered` is terminal.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line of an order. Owned by its order and never changed after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: u64,
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn new(product_id: u64, product_name: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            price,
        }
    }

    /// `None` when `price * quantity` does not fit a `Decimal`.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Represents a customer purchase order.
///
/// The total is derived from the items when the order is built and cannot be
/// set independently. `id` and the timestamps stay empty until the store
/// persists the order for the first time.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: Option<OrderId>,
    order_number: String,
    customer_name: String,
    customer_email: String,
    status: OrderStatus,
    total_amount: Decimal,
    items: Vec<OrderItem>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Builds a new `PENDING` order with its total computed from `items`.
    ///
    /// Fails when the total cannot be represented.
    pub fn new(
        order_number: impl Into<String>,
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        items: Vec<OrderItem>,
    ) -> Result<Self, OrderError> {
        let total_amount = total_of(&items)?;
        Ok(Self {
            id: None,
            order_number: order_number.into(),
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            status: OrderStatus::Pending,
            total_amount,
            items,
            created_at: None,
            updated_at: None,
        })
    }

    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Moves the order one step forward. Returns the status it left.
    pub fn transition_to(&mut self, target: OrderStatus) -> Result<OrderStatus, OrderError> {
        let from = self.status;
        if !from.can_transition_to(target) {
            return Err(OrderError::invalid_transition(from, target));
        }
        self.status = target;
        Ok(from)
    }

    pub(crate) fn assign_identity(&mut self, id: OrderId, now: DateTime<Utc>) {
        self.id = Some(id);
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

/// Sum of `price * quantity` over all items, at scale 2.
///
/// Overflow is reported against the offending item, or against the total when
/// only the sum overflows.
pub fn total_of(items: &[OrderItem]) -> Result<Decimal, OrderError> {
    let mut total = Decimal::ZERO;
    for (index, item) in items.iter().enumerate() {
        let subtotal = item.subtotal().ok_or_else(|| {
            OrderError::validation(format!("items[{}].price", index), "Item subtotal is too large")
        })?;
        total = total
            .checked_add(subtotal)
            .ok_or_else(|| OrderError::validation("total_amount", "Order total is too large"))?;
    }
    total.rescale(2);
    Ok(total)
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItemCreate>,
}

/// One requested line of a new order.
#[derive(Debug, Clone)]
pub struct OrderItemCreate {
    pub product_id: u64,
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItemCreate {
    pub fn new(product_id: u64, product_name: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            price,
        }
    }
}

impl From<OrderItemCreate> for OrderItem {
    fn from(item: OrderItemCreate) -> Self {
        OrderItem::new(item.product_id, item.product_name, item.quantity, item.price)
    }
}

/// Equality filter used when paging through stored orders.
///
/// `customer_email` matches case-insensitively on a substring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_email: Option<String>,
}

impl OrderFilter {
    pub fn with_status(status: Option<OrderStatus>) -> Self {
        Self {
            status,
            customer_email: None,
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        match &self.customer_email {
            Some(needle) => order
                .customer_email
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: Decimal, quantity: u32) -> OrderItem {
        OrderItem::new(1, "Widget", quantity, price)
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let items = vec![
            item(Decimal::new(129999, 2), 1),
            item(Decimal::new(2550, 2), 3),
            item(Decimal::new(5, 0), 2),
        ];
        let order = Order::new("ORD-20250101-00001", "Alice", "alice@example.com", items).unwrap();
        assert_eq!(order.total_amount(), Decimal::new(138649, 2));
        assert_eq!(order.total_amount().to_string(), "1386.49");
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.id(), None);
    }

    #[test]
    fn test_total_has_scale_two() {
        assert_eq!(total_of(&[item(Decimal::new(10, 0), 1)]).unwrap().to_string(), "10.00");
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        let huge = Decimal::from_str_exact("70000000000000000000000000000").unwrap();
        let err = total_of(&[item(Decimal::ONE, 1), item(huge, 1000)]).unwrap_err();
        assert_eq!(err, OrderError::validation("items[1].price", "Item subtotal is too large"));

        let err = Order::new("ORD-1", "Alice", "alice@example.com", vec![item(huge, 1), item(huge, 1)])
            .unwrap_err();
        assert!(matches!(err, OrderError::ValidationFailure { ref field, .. } if field == "total_amount"));
    }

    #[test]
    fn test_transition_table() {
        let allowed = [
            (OrderStatus::Pending, OrderStatus::Processing),
            (OrderStatus::Processing, OrderStatus::Shipped),
            (OrderStatus::Shipped, OrderStatus::Delivered),
        ];
        let mut succeeded = 0;
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
                if expected {
                    succeeded += 1;
                }
            }
        }
        assert_eq!(succeeded, 3);
    }

    #[test]
    fn test_transition_to_rejects_backward_move() {
        let mut order = Order::new("ORD-1", "Alice", "alice@example.com", vec![item(Decimal::ONE, 1)]).unwrap();
        assert_eq!(order.transition_to(OrderStatus::Processing), Ok(OrderStatus::Pending));
        let err = order.transition_to(OrderStatus::Pending).unwrap_err();
        assert!(matches!(err, OrderError::InvalidStatusTransition { .. }));
        assert_eq!(order.status(), OrderStatus::Processing);
    }

    #[test]
    fn test_filter_matches_status_and_email() {
        let order = Order::new("ORD-1", "Alice", "Alice@Example.com", vec![item(Decimal::ONE, 1)]).unwrap();
        assert!(OrderFilter::default().matches(&order));
        assert!(OrderFilter::with_status(Some(OrderStatus::Pending)).matches(&order));
        assert!(!OrderFilter::with_status(Some(OrderStatus::Shipped)).matches(&order));

        let by_email = OrderFilter {
            status: None,
            customer_email: Some("example.COM".to_string()),
        };
        assert!(by_email.matches(&order));
    }
}
