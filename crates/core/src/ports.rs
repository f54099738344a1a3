//! Port interfaces implemented by infrastructure adapters

use async_trait::async_trait;
use vendorlink_domain::{ApiRequest, ApiResponse, AttemptRecord, Result};

/// Executes one logical API call.
///
/// Implementations own authentication, timeouts and retry. A returned
/// `ApiResponse` is always a 2xx; every other outcome is an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Receives metadata about every HTTP attempt a transport makes.
///
/// Called from the retrying task; implementations must be cheap and must not
/// block.
pub trait AttemptObserver: Send + Sync {
    fn on_attempt(&self, record: &AttemptRecord);
}
