use thiserror::Error;

use crate::domain::OrderStatus;
use crate::sequence::SequenceError;
use crate::store::StoreError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Validation failed for {field}: {reason}")]
    ValidationFailure { field: String, reason: String },
    #[error("Order not found: {0}")]
    NotFound(String),
    /// `to` is `None` when the rejected move was a cancellation.
    #[error("{message}")]
    InvalidStatusTransition {
        from: OrderStatus,
        to: Option<OrderStatus>,
        message: String,
    },
    #[error("Order number sequence exhausted for {0}")]
    SequenceExhausted(String),
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),
}

impl OrderError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        OrderError::ValidationFailure {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_transition(from: OrderStatus, to: OrderStatus) -> Self {
        OrderError::InvalidStatusTransition {
            from,
            to: Some(to),
            message: format!("Invalid status transition from {} to {}", from, to),
        }
    }

    pub fn cancel_rejected(from: OrderStatus) -> Self {
        OrderError::InvalidStatusTransition {
            from,
            to: None,
            message: format!(
                "Cannot cancel order. Only PENDING orders can be cancelled. Current status: {}",
                from
            ),
        }
    }
}

impl From<SequenceError> for OrderError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::Exhausted { date_key } => OrderError::SequenceExhausted(date_key),
        }
    }
}
