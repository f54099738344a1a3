//! Domain types and models

pub mod form;
pub mod http;
pub mod page;
pub mod record;

pub use form::{ControlRef, IntakeFormSchema, Question, Section, TagKind};
pub use http::{ApiRequest, ApiResponse, AttemptOutcome, AttemptRecord, HttpMethod};
pub use page::{Continuation, Page};
pub use record::{Record, RecordExt};
