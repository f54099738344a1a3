//! Vendor intake form: schema parsing, validation and submission

pub mod fields;
pub mod schema;
pub mod service;
pub mod submission;

pub use fields::{resolve_fields, validate, FieldValues, ResolvedFields};
pub use schema::{classify_question, parse_intake_form};
pub use service::{IntakeFormService, SubmissionReceipt, SubmitOptions};
pub use submission::render_submission;
