//! Intake-form document parsing
//!
//! Raw shape: `{ identifier, sections: [{ identifier, heading, controls: [{
//! identifier, heading, identification, questions: [...] }] }] }`.
//!
//! Each question must carry exactly one tag marker (`answeredTag`,
//! `notApplicableTag`, `questionLevelCommentTag`, `fileUploadTag`). A marker is
//! present when its value is neither `null`, `false` nor an empty string.

use serde_json::Value;
use tracing::{debug, warn};
use vendorlink_domain::constants::UNKNOWN_SECTION;
use vendorlink_domain::{
    ControlRef, IntakeFormSchema, Question, Record, Result, Section, TagKind, VendorLinkError,
};

/// Parse a raw intake-form document.
///
/// Questions with blank text are skipped. Grouping and order follow the
/// document; a question text repeated across (or within) sections is kept.
///
/// # Errors
/// - `MalformedResponse` when the document is not an object
/// - `MalformedQuestion` when a question has zero or several tag markers
pub fn parse_intake_form(raw: &Value) -> Result<IntakeFormSchema> {
    let document = raw.as_object().ok_or_else(|| {
        VendorLinkError::MalformedResponse("intake form document must be an object".into())
    })?;

    let mut sections = Vec::new();
    for raw_section in array(document, "sections") {
        let Some(raw_section) = raw_section.as_object() else {
            warn!("skipping non-object section entry");
            continue;
        };
        sections.push(parse_section(raw_section)?);
    }

    let schema = IntakeFormSchema { identifier: field(document, "identifier"), sections };
    debug!(
        sections = schema.sections.len(),
        questions = schema.question_count(),
        "parsed intake form"
    );
    Ok(schema)
}

fn parse_section(raw: &Record) -> Result<Section> {
    let heading = raw.get("heading").and_then(Value::as_str).unwrap_or(UNKNOWN_SECTION).to_string();
    let mut questions = Vec::new();

    for raw_control in array(raw, "controls") {
        let Some(raw_control) = raw_control.as_object() else {
            continue;
        };
        let control = ControlRef {
            identifier: field(raw_control, "identifier"),
            heading: field(raw_control, "heading"),
            identification: field(raw_control, "identification"),
        };

        for raw_question in array(raw_control, "questions") {
            let Some(raw_question) = raw_question.as_object() else {
                continue;
            };
            let text = raw_question.get("text").and_then(Value::as_str).unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }

            let (tag, tag_value) = classify_question(&heading, text, raw_question)?;
            questions.push(Question {
                text: text.to_string(),
                tag,
                tag_value,
                required: raw_question.get("required").and_then(Value::as_bool).unwrap_or(false),
                identifier: field(raw_question, "identifier"),
                control: control.clone(),
                raw: raw_question.clone(),
            });
        }
    }

    Ok(Section { heading, identifier: field(raw, "identifier"), questions })
}

/// Determine the single tag kind a raw question entry carries.
///
/// # Errors
/// Returns `MalformedQuestion` unless exactly one marker is present.
pub fn classify_question(section: &str, text: &str, raw: &Record) -> Result<(TagKind, Value)> {
    let present: Vec<(TagKind, &Value)> = TagKind::ALL
        .iter()
        .filter_map(|kind| raw.get(kind.marker_field()).filter(|v| is_marker(v)).map(|v| (*kind, v)))
        .collect();

    match present.as_slice() {
        [(kind, value)] => Ok((*kind, (*value).clone())),
        _ => Err(VendorLinkError::MalformedQuestion {
            section: section.to_string(),
            question: text.to_string(),
            markers: present.len(),
        }),
    }
}

fn is_marker(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn array<'a>(map: &'a Record, key: &str) -> &'a [Value] {
    map.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

fn field(map: &Record, key: &str) -> Value {
    map.get(key).cloned().unwrap_or(Value::Null)
}
