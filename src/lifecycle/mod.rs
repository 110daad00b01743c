//! Order creation, lookups, status transitions and cancellation.

pub mod engine;
pub mod validation;

pub use engine::*;
