//! Intake-form retrieval and vendor submission

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, instrument, warn};
use vendorlink_domain::constants::{
    INTAKE_FORM_EXPAND, INTAKE_FORM_PATH, VENDORS_PATH, VENDOR_URL_QUESTION,
};
use vendorlink_domain::{ApiRequest, IntakeFormSchema, RecordExt, Result, VendorLinkError};

use super::fields::{resolve_fields, validate, value_for_question, FieldValues};
use super::schema::parse_intake_form;
use super::submission::render_submission;
use crate::ports::Transport;
use crate::vendors::VendorService;

/// Submission switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Skip the duplicate-domain check.
    pub force: bool,
    /// Run validation before anything is sent.
    pub validate: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self { force: false, validate: true }
    }
}

impl SubmitOptions {
    pub fn forced() -> Self {
        Self { force: true, ..Self::default() }
    }
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    /// Response body of the create call (`null` when empty).
    pub response: Value,
    pub responses_submitted: usize,
}

/// Fetches the intake form and submits filled-in forms as new vendors.
#[derive(Clone)]
pub struct IntakeFormService {
    transport: Arc<dyn Transport>,
    vendors: VendorService,
}

impl IntakeFormService {
    pub fn new(transport: Arc<dyn Transport>, vendors: VendorService) -> Self {
        Self { transport, vendors }
    }

    /// Raw intake-form document, sections expanded down to questions.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<Value> {
        let request = ApiRequest::get(INTAKE_FORM_PATH).with_query("expand", INTAKE_FORM_EXPAND);
        Ok(self.transport.execute(request).await?.body)
    }

    /// Freshly fetched and parsed schema.
    pub async fn schema(&self) -> Result<IntakeFormSchema> {
        parse_intake_form(&self.get().await?)
    }

    /// Section heading to question texts of the current form.
    pub async fn describe(&self) -> Result<Vec<(String, Vec<String>)>> {
        Ok(self.schema().await?.describe())
    }

    pub async fn required_questions(&self) -> Result<Vec<(String, Vec<String>)>> {
        Ok(self.schema().await?.required_questions())
    }

    pub async fn optional_questions(&self) -> Result<Vec<(String, Vec<String>)>> {
        Ok(self.schema().await?.optional_questions())
    }

    /// Validate, check the vendor domain is new, then create the vendor.
    ///
    /// With validation on, an invalid input fails before any request is made.
    /// Without `force`, exactly one lookup request runs before the create.
    ///
    /// # Errors
    /// - `Validation` for missing/unknown fields, or a missing `Vendor URL`
    ///   when the domain check runs
    /// - `DuplicateDomain` when a vendor with the same domain exists
    /// - `Submission` wrapping the transport error of the create call
    #[instrument(skip_all, fields(force = options.force, validate = options.validate))]
    pub async fn submit(
        &self,
        schema: &IntakeFormSchema,
        values: &FieldValues,
        options: SubmitOptions,
    ) -> Result<SubmissionReceipt> {
        if options.validate {
            validate(schema, values)?;
        } else {
            let unknown = resolve_fields(schema, values).unknown;
            if !unknown.is_empty() {
                warn!(?unknown, "ignoring fields that match no question");
            }
        }

        if !options.force {
            let domain = value_for_question(schema, values, VENDOR_URL_QUESTION)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|domain| !domain.is_empty())
                .ok_or_else(|| VendorLinkError::missing(vec![VENDOR_URL_QUESTION.to_string()]))?;

            if let Some(existing) = self.vendors.find_by_domain(domain).await? {
                warn!(domain, existing = ?existing.identifier(), "vendor domain already registered");
                return Err(VendorLinkError::DuplicateDomain { domain: domain.to_string() });
            }
        }

        let (payload, responses_submitted) = render_submission(schema, values);
        let response = self
            .transport
            .execute(ApiRequest::post(VENDORS_PATH, payload))
            .await
            .map_err(|err| VendorLinkError::Submission(Box::new(err)))?;

        info!(responses_submitted, status = response.status, "intake form submitted");
        Ok(SubmissionReceipt { response: response.body, responses_submitted })
    }

    /// Fetch the current schema, then [`IntakeFormService::submit`].
    pub async fn submit_current(
        &self,
        values: &FieldValues,
        options: SubmitOptions,
    ) -> Result<SubmissionReceipt> {
        let schema = self.schema().await?;
        self.submit(&schema, values, options).await
    }

    /// Success flag for callers that only branch on the outcome; the failure
    /// is logged.
    pub async fn submit_flag(
        &self,
        schema: &IntakeFormSchema,
        values: &FieldValues,
        options: SubmitOptions,
    ) -> bool {
        match self.submit(schema, values, options).await {
            Ok(_) => true,
            Err(err) => {
                error!(error = %err, kind = err.label(), "intake form submission failed");
                false
            }
        }
    }
}
