//! Vendor resource operations
//!
//! Lists page through the transport, detail fetches fan out over the shared
//! [`WorkerPool`], and updates read-merge-write so untouched fields survive.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use vendorlink_domain::constants::{DOMAIN_FIELD, VENDORS_PATH};
use vendorlink_domain::{ApiRequest, Record, RecordExt, Result, VendorLinkError};

use crate::fetcher::{FetchReport, WorkerPool};
use crate::merge::deep_merge;
use crate::pagination::Paginator;
use crate::ports::Transport;

#[derive(Clone)]
pub struct VendorService {
    transport: Arc<dyn Transport>,
    pool: WorkerPool,
}

impl VendorService {
    pub fn new(transport: Arc<dyn Transport>, pool: WorkerPool) -> Self {
        Self { transport, pool }
    }

    /// Every vendor summary, across all pages.
    pub async fn list(&self) -> Result<Vec<Record>> {
        Paginator::new(self.transport.as_ref()).list_all(VENDORS_PATH).await
    }

    /// Full record of one vendor.
    #[instrument(skip(self), fields(vendor = %identifier))]
    pub async fn get(&self, identifier: &str) -> Result<Record> {
        let response = self.transport.execute(ApiRequest::get(vendor_path(identifier))).await?;
        into_record(response.body)
    }

    /// Full records of every vendor, fetched with bounded parallelism.
    ///
    /// Summaries without an identifier are skipped. A failing detail fetch is
    /// reported in its outcome and does not stop the others.
    ///
    /// # Errors
    /// Fails only when listing fails.
    pub async fn describe(&self) -> Result<FetchReport> {
        let summaries = self.list().await?;
        let identifiers: Vec<String> = summaries
            .iter()
            .filter_map(|summary| {
                let identifier = summary.identifier();
                if identifier.is_none() {
                    warn!("skipping vendor summary without identifier");
                }
                identifier
            })
            .collect();

        info!(vendors = identifiers.len(), workers = self.pool.max_workers(), "fetching vendor details");
        Ok(self.pool.fetch_all(identifiers, |identifier| async move { self.get(&identifier).await }).await)
    }

    /// Merge `changes` into the current record and write the result back.
    ///
    /// Returns the stored record when the API echoes one, the merged record
    /// otherwise.
    #[instrument(skip(self, changes), fields(vendor = %identifier))]
    pub async fn update(&self, identifier: &str, changes: &Record) -> Result<Record> {
        let current = self.get(identifier).await?;
        let merged = deep_merge(&current, changes);
        debug!(fields = merged.len(), "writing merged vendor");

        let request = ApiRequest::put(vendor_path(identifier), Value::Object(merged.clone()));
        let response = self.transport.execute(request).await?;
        match response.body {
            Value::Object(stored) => Ok(stored),
            _ => Ok(merged),
        }
    }

    /// Create a vendor from a raw record.
    pub async fn create(&self, record: Record) -> Result<Value> {
        let response = self.transport.execute(ApiRequest::post(VENDORS_PATH, Value::Object(record))).await?;
        Ok(response.body)
    }

    /// The vendor whose domain matches `domain`, if any.
    ///
    /// Comparison ignores case, scheme, a leading `www.` and any path.
    #[instrument(skip(self))]
    pub async fn find_by_domain(&self, domain: &str) -> Result<Option<Record>> {
        let wanted = normalize_domain(domain);
        let candidates = Paginator::new(self.transport.as_ref())
            .list_all_with(VENDORS_PATH, &[(DOMAIN_FIELD, domain)])
            .await?;

        Ok(candidates.into_iter().find(|vendor| {
            vendor.str_field(DOMAIN_FIELD).is_some_and(|candidate| normalize_domain(candidate) == wanted)
        }))
    }
}

fn vendor_path(identifier: &str) -> String {
    format!("{VENDORS_PATH}/{identifier}")
}

fn into_record(body: Value) -> Result<Record> {
    match body {
        Value::Object(record) => Ok(record),
        other => Err(VendorLinkError::MalformedResponse(format!(
            "expected a vendor object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Lowercased host part of a domain or URL, without `www.`.
pub fn normalize_domain(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    let without_scheme = lowered.split_once("://").map_or(lowered.as_str(), |(_, rest)| rest);
    let host = without_scheme.split(['/', '?', '#']).next().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).trim_end_matches('.').to_string()
}
