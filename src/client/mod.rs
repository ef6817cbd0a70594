//! Clients for the external record service

pub mod http;

pub use http::*;
