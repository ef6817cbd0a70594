//! Receiving module containing drafts and the receiving desk

pub mod core;
pub mod draft;

pub use self::core::*;
pub use draft::*;
