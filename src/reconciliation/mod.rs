//! Reconciliation of goods receipts against purchase orders

pub mod engine;
pub mod quantity;

pub use engine::*;
pub use quantity::*;
