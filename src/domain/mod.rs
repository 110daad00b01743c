pub mod order;
pub mod page;

pub use order::*;
pub use page::*;
