//! The persistence collaborator consumed by the lifecycle engine and the promoter.
//!
//! Any backend works as long as it honours these semantics; the crate ships an
//! in-memory actor ([`crate::clients::OrderClient`]).

use async_trait::async_trait;
use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::{Order, OrderFilter, OrderId, Page, PageRequest};

/// Errors that can occur inside the order store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl From<FrameworkError> for StoreError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                StoreError::Unavailable(err.to_string())
            }
            FrameworkError::NotFound(id) => StoreError::NotFound(id),
            FrameworkError::DuplicateKey(_) | FrameworkError::ImmutableKey(_) => {
                StoreError::Conflict(err.to_string())
            }
            FrameworkError::HookRejected(reason) => StoreError::Rejected(reason),
        }
    }
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts an order without id (assigning id and timestamps) or replaces a stored one.
    async fn save(&self, order: Order) -> Result<Order, StoreError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<Order>, StoreError>;

    async fn exists_by_order_number(&self, order_number: &str) -> Result<bool, StoreError>;

    /// Matching orders, oldest first.
    async fn find_page(&self, filter: OrderFilter, page: PageRequest) -> Result<Page<Order>, StoreError>;

    async fn delete(&self, order: &Order) -> Result<(), StoreError>;
}
