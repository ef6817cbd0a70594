//! # Receiving Core
//!
//! Goods-received-note (GRN) reconciliation for purchase orders: tracks how
//! much of each order line is still receivable, rejects receipts that would
//! over-receive, and computes receipt totals with Indian GST.
//!
//! ## Features
//!
//! - **Remaining quantities**: recomputed from the full receipt history on every call
//! - **Receipt validation**: every offending line is reported, not just the first
//! - **GST totals**: CGST/SGST for intra-state vendors, IGST otherwise, rounded half-up to paise
//! - **Receiving desk**: drafts with input clamping and a fresh recheck before submit
//! - **Record service abstraction**: REST client plus an in-memory implementation for tests
//!
//! ## Quick Start
//!
//! ```rust
//! use receiving_core::{PurchaseOrder, PurchaseOrderLine, ReconciliationEngine};
//! use bigdecimal::BigDecimal;
//!
//! let po = PurchaseOrder::new(
//!     "PO-1".to_string(),
//!     "24AAAFF2996A1Z5".to_string(),
//!     vec![PurchaseOrderLine::new(
//!         "Bolt".to_string(),
//!         BigDecimal::from(100),
//!         BigDecimal::from(10),
//!         "Nos".to_string(),
//!         "7318".to_string(),
//!     )],
//! );
//!
//! let engine = ReconciliationEngine::new();
//! let remaining = engine.compute_remaining(&po, &[]).unwrap();
//! assert_eq!(remaining[0].remaining_quantity, BigDecimal::from(100));
//! ```

pub mod client;
pub mod config;
pub mod receiving;
pub mod reconciliation;
pub mod tax;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use client::*;
pub use self::config::Settings;
pub use receiving::*;
pub use reconciliation::*;
pub use tax::gst::*;
pub use traits::*;
pub use types::*;
