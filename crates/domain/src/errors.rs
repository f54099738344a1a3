//! Error types used throughout VendorLink

use thiserror::Error;

/// Main error type for VendorLink
///
/// Transient failures (`Network`) are recovered inside the transport up to the
/// configured attempt cap; everything else is surfaced to the caller as a
/// distinct variant.
#[derive(Error, Debug)]
pub enum VendorLinkError {
    #[error("No API credential configured")]
    AuthMissing,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit still exceeded after {attempts} attempts")]
    RateLimitExceeded { attempts: u32 },

    #[error("Service unavailable after {attempts} attempts: {reason}")]
    ServiceUnavailable { attempts: u32, reason: String },

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed question '{question}' in section '{section}': expected exactly one tag marker, found {markers}")]
    MalformedQuestion { section: String, question: String, markers: usize },

    #[error("Validation failed (missing: {missing_fields:?}, unknown: {unknown_fields:?})")]
    Validation { missing_fields: Vec<String>, unknown_fields: Vec<String> },

    #[error("A vendor with domain '{domain}' already exists")]
    DuplicateDomain { domain: String },

    #[error("Submission failed: {0}")]
    Submission(#[source] Box<VendorLinkError>),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VendorLinkError {
    /// Shorthand for a validation failure that only reports missing fields.
    pub fn missing(fields: Vec<String>) -> Self {
        Self::Validation { missing_fields: fields, unknown_fields: Vec::new() }
    }

    /// Whether the transport may retry the operation that produced this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AuthMissing => "auth_missing",
            Self::Network(_) => "network",
            Self::RateLimitExceeded { .. } => "rate_limit_exceeded",
            Self::ServiceUnavailable { .. } => "service_unavailable",
            Self::Api { .. } => "api",
            Self::MalformedQuestion { .. } => "malformed_question",
            Self::Validation { .. } => "validation",
            Self::DuplicateDomain { .. } => "duplicate_domain",
            Self::Submission(_) => "submission",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Config(_) => "config",
        }
    }
}

/// Result type alias for VendorLink operations
pub type Result<T> = std::result::Result<T, VendorLinkError>;
