//! Entry point wiring configuration, transport and services together.

use std::sync::Arc;

use tracing::info;
use vendorlink_core::ports::{AttemptObserver, Transport};
use vendorlink_core::{IntakeFormService, VendorService, WorkerPool};
use vendorlink_domain::{ClientConfig, Result};

use crate::http::{HttpTransport, HttpTransportBuilder};

/// Configured API client.
///
/// The transport and the worker pool are built once; every service handed
/// out shares them, so the worker bound holds across concurrent calls.
#[derive(Clone)]
pub struct VendorLinkClient {
    transport: Arc<dyn Transport>,
    pool: WorkerPool,
}

impl VendorLinkClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// `AuthMissing` without a token, `Config` for invalid settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_transport(Arc::new(transport), config.max_workers))
    }

    /// Like [`VendorLinkClient::new`], reporting every HTTP attempt to
    /// `observer`.
    ///
    /// # Errors
    /// See [`VendorLinkClient::new`].
    pub fn with_observer(config: &ClientConfig, observer: Arc<dyn AttemptObserver>) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransportBuilder::from_config(config).observer(observer).build()?;
        Ok(Self::with_transport(Arc::new(transport), config.max_workers))
    }

    /// Load configuration from the environment or a config file, then build.
    ///
    /// # Errors
    /// See [`crate::config::load`] and [`VendorLinkClient::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(&crate::config::load()?)
    }

    /// Client over any transport implementation.
    pub fn with_transport(transport: Arc<dyn Transport>, max_workers: usize) -> Self {
        let pool = WorkerPool::new(max_workers);
        info!(max_workers = pool.max_workers(), "vendorlink client ready");
        Self { transport, pool }
    }

    pub fn vendors(&self) -> VendorService {
        VendorService::new(Arc::clone(&self.transport), self.pool.clone())
    }

    pub fn intake_form(&self) -> IntakeFormService {
        IntakeFormService::new(Arc::clone(&self.transport), self.vendors())
    }

    pub fn worker_pool(&self) -> &WorkerPool {
        &self.pool
    }
}
