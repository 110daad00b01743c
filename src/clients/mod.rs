//! Typed handles over the resource actors.

pub mod order_client;

pub use order_client::*;
