//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use vendorlink_domain::VendorLinkError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VendorLinkError);

impl From<InfraError> for VendorLinkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VendorLinkError> for InfraError {
    fn from(value: VendorLinkError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoVendorLinkError {
    fn into_vendorlink(self) -> VendorLinkError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VendorLinkError */
/* -------------------------------------------------------------------------- */

impl IntoVendorLinkError for HttpError {
    fn into_vendorlink(self) -> VendorLinkError {
        if self.is_timeout() {
            return VendorLinkError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return VendorLinkError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return VendorLinkError::MalformedResponse(format!("undecodable response body: {self}"));
        }

        if self.is_builder() {
            return VendorLinkError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
            return VendorLinkError::Api { status: code, body: message };
        }

        VendorLinkError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_vendorlink())
    }
}

/// Whether a reqwest failure is transient and worth another attempt.
pub(crate) fn is_transient(err: &HttpError) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
