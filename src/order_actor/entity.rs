use chrono::{DateTime, Utc};

use crate::actor_framework::Entity;
use crate::domain::{Order, OrderFilter, OrderId};

impl Entity for Order {
    type Id = OrderId;
    type Filter = OrderFilter;
    type SortKey = (Option<DateTime<Utc>>, Option<OrderId>);

    fn id(&self) -> Option<OrderId> {
        Order::id(self)
    }

    /// Order numbers are unique across the store and never change.
    fn natural_key(&self) -> &str {
        self.order_number()
    }

    /// Oldest first, ties broken by id, so pages are stable between fetches.
    fn sort_key(&self) -> Self::SortKey {
        (self.created_at(), Order::id(self))
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.matches(self)
    }

    fn on_create(&mut self, id: OrderId, now: DateTime<Utc>) -> Result<(), String> {
        if self.items().is_empty() {
            return Err("Order must contain at least one item".to_string());
        }
        self.assign_identity(id, now);
        Ok(())
    }

    fn on_update(&mut self, now: DateTime<Utc>) -> Result<(), String> {
        self.touch(now);
        Ok(())
    }
}
