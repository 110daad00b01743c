//! Order lifecycle engine: order creation with daily order numbers, status
//! transitions, cancellation, queries, and background promotion of pending
//! orders, on top of an actor-backed in-memory store.

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod domain;
pub mod lifecycle;
pub mod order_actor;
pub mod promoter;
pub mod sequence;
pub mod store;

#[cfg(test)]
mod mock_framework;
