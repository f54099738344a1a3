//! # VendorLink Domain
//!
//! Data types shared by every VendorLink crate.
//!
//! This crate contains:
//! - Schema-less vendor records and list pages
//! - Transport request/response values and attempt metadata
//! - Intake-form schema types
//! - Client configuration
//! - The error taxonomy and `Result` alias
//!
//! ## Architecture
//! - No dependencies on other VendorLink crates
//! - No I/O; everything here is plain data

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{ClientConfig, RetryConfig};
pub use errors::{Result, VendorLinkError};
pub use types::*;
