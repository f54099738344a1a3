//! # VendorLink Core
//!
//! Pure client logic - no HTTP dependencies.
//!
//! This crate contains:
//! - The [`Transport`] port every network call goes through
//! - Deep merge of partial updates into existing records
//! - Pagination and the bounded worker pool for detail fetches
//! - Intake-form schema parsing, validation and submission rendering
//! - Vendor and intake-form services built on the above
//!
//! ## Architecture Principles
//! - Only depends on `vendorlink-domain`
//! - All I/O goes through [`Transport`], implemented in `vendorlink-infra`
//! - Everything else is deterministic and testable with in-memory fakes

pub mod fetcher;
pub mod form;
pub mod merge;
pub mod pagination;
pub mod ports;
pub mod vendors;

pub use fetcher::{FetchOutcome, FetchReport, WorkerPool};
pub use form::{IntakeFormService, SubmissionReceipt, SubmitOptions};
pub use merge::{deep_merge, deep_merge_into};
pub use pagination::Paginator;
pub use ports::{AttemptObserver, Transport};
pub use vendors::VendorService;
