//! # VendorLink Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport (auth, timeout, retry/backoff)
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//! - The [`VendorLinkClient`] entry point
//!
//! ## Architecture
//! - Implements traits defined in `vendorlink-core`
//! - Contains all "impure" code (network, environment, filesystem)

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod logging;

// Re-export commonly used items
pub use client::VendorLinkClient;
pub use http::{HttpTransport, HttpTransportBuilder};
pub use logging::{init_tracing, LogFormat};
