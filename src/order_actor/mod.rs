//! Order-specific store hooks and the error type shared by every order operation.

pub mod entity;
pub mod error;

pub use error::*;
