use async_trait::async_trait;

use crate::actor_framework::ResourceClient;
use crate::domain::{Order, OrderFilter, OrderId, Page, PageRequest};
use crate::store::{OrderStore, StoreError};

/// Client for interacting with the Order actor.
///
/// This is the in-memory [`OrderStore`]: every call is one request to the
/// actor that owns the orders.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl OrderStore for OrderClient {
    async fn save(&self, order: Order) -> Result<Order, StoreError> {
        Ok(self.inner.save(order).await?)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.inner.get(id).await?)
    }

    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.inner.find_by_key(order_number.to_string()).await?)
    }

    async fn exists_by_order_number(&self, order_number: &str) -> Result<bool, StoreError> {
        Ok(self.inner.exists_by_key(order_number.to_string()).await?)
    }

    async fn find_page(&self, filter: OrderFilter, page: PageRequest) -> Result<Page<Order>, StoreError> {
        Ok(self.inner.query(filter, page).await?)
    }

    async fn delete(&self, order: &Order) -> Result<(), StoreError> {
        let id = order.id().ok_or_else(|| {
            StoreError::NotFound(format!("order {} was never stored", order.order_number()))
        })?;
        Ok(self.inner.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::domain::{OrderItem, OrderStatus};
    use crate::mock_framework::{create_mock_client, expect_find_by_key, expect_get, expect_query};
    use rust_decimal::Decimal;

    fn unsaved_order() -> Order {
        Order::new("ORD-20250101-00001", "Alice", "alice@example.com", vec![
            OrderItem::new(1, "Laptop", 1, Decimal::new(129999, 2)),
        ]).unwrap()
    }

    #[tokio::test]
    async fn test_find_by_id_returns_stored_order() {
        let (inner, mut receiver) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner);

        let task = tokio::spawn(async move { client.find_by_id(42).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, 42);
        let mut stored = unsaved_order();
        stored.assign_identity(42, chrono::Utc::now());
        responder.send(Ok(Some(stored))).unwrap();

        let found = task.await.unwrap().unwrap().expect("order is returned");
        assert_eq!(found.id(), Some(42));
        assert_eq!(found.order_number(), "ORD-20250101-00001");
    }

    #[tokio::test]
    async fn test_find_by_order_number_sends_key_lookup() {
        let (inner, mut receiver) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner);

        let task = tokio::spawn(async move { client.find_by_order_number("ORD-20250101-00001").await });

        let (key, responder) = expect_find_by_key(&mut receiver).await.expect("Expected FindByKey request");
        assert_eq!(key, "ORD-20250101-00001");
        responder.send(Ok(None)).unwrap();

        assert_eq!(task.await.unwrap(), Ok(None));
    }

    #[tokio::test]
    async fn test_find_page_passes_filter_through() {
        let (inner, mut receiver) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner);

        let task = tokio::spawn(async move {
            client
                .find_page(OrderFilter::with_status(Some(OrderStatus::Shipped)), PageRequest::new(2, 10))
                .await
        });

        let (filter, page, responder) = expect_query(&mut receiver).await.expect("Expected Query request");
        assert_eq!(filter.status, Some(OrderStatus::Shipped));
        assert_eq!(page, PageRequest::new(2, 10));
        responder.send(Err(FrameworkError::ActorDropped)).unwrap();

        assert!(matches!(task.await.unwrap(), Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_delete_of_unsaved_order_never_reaches_actor() {
        let (inner, mut receiver) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner);

        let result = client.delete(&unsaved_order()).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(receiver.try_recv().is_err());
    }
}
