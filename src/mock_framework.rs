//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_save`] or [`expect_query`] to assert behavior.

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, Response, ResourceClient, ResourceRequest};
use crate::domain::{Page, PageRequest};

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// Code under test talks to a `ResourceClient` exactly as it would in production,
/// but no `ResourceActor` is running. The test owns the `receiver`, inspects each
/// request as it arrives and answers through the embedded responder. That makes
/// store failures, empty pages and call counts deterministic.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Save request
pub async fn expect_save<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Save { entity, respond_to }) => Some((entity, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a FindByKey request
pub async fn expect_find_by_key<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(String, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::FindByKey { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an ExistsByKey request
pub async fn expect_exists_by_key<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(String, Response<bool>)> {
    match receiver.recv().await {
        Some(ResourceRequest::ExistsByKey { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Query request
pub async fn expect_query<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Filter, PageRequest, Response<Page<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Query { filter, page, respond_to }) => Some((filter, page, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, Response<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderItem};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Order>(10);

        // Test Save
        let save_task = tokio::spawn(async move {
            let order = Order::new("ORD-1", "Test", "test@example.com", vec![
                OrderItem::new(7, "Pen", 2, Decimal::new(150, 2)),
            ]).unwrap();
            client.save(order).await
        });

        let (order, responder) = expect_save(&mut receiver).await.expect("Expected Save request");
        assert_eq!(order.order_number(), "ORD-1");
        let mut stored = order.clone();
        stored.assign_identity(1, chrono::Utc::now());
        responder.send(Ok(stored)).unwrap();

        let result = save_task.await.unwrap().unwrap();
        assert_eq!(result.id(), Some(1));
    }

    #[tokio::test]
    async fn test_expect_returns_none_for_other_request() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let get_task = tokio::spawn(async move { client.get(1).await });

        assert!(expect_delete(&mut receiver).await.is_none());
        assert!(get_task.await.unwrap().is_err());
    }
}
