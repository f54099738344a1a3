//! Submission payload rendering
//!
//! Shape:
//!
//! ```text
//! { questionnaireVersionIdentifier,
//!   questionResponses: [
//!     { question: { ..question fields.., control: { .., section: { identifier, heading } } },
//!       customFormControlIdentifier,
//!       choices: [<tag value>],
//!       answerText | commentText | fileUploads } ] }
//! ```
//!
//! Responses follow schema order, not input order.

use serde_json::{json, Map, Value};
use vendorlink_domain::{IntakeFormSchema, Question, Section, TagKind};

use super::fields::{is_blank, resolve_fields, FieldValues};

/// Question fields copied from the raw entry when present.
const PASSTHROUGH_FIELDS: &[&str] = &[
    "language",
    "type",
    "identification",
    "options",
    "showNotApplicable",
    "answeredCondition",
    "warningCondition",
    "commentRequiredCondition",
    "fileUploadRequiredCondition",
    "metadata",
    "questionIdentifier",
];

/// Render the submission payload; returns it with the number of responses.
///
/// Only questions with a non-blank value produce a response. For
/// not-applicable questions the value only has to be truthy; the response
/// carries the choice alone.
pub fn render_submission(schema: &IntakeFormSchema, values: &FieldValues) -> (Value, usize) {
    let resolved = resolve_fields(schema, values);

    let mut responses = Vec::new();
    for (section_index, section) in schema.sections.iter().enumerate() {
        for (question_index, question) in section.questions.iter().enumerate() {
            if let Some(value) = resolved.get((section_index, question_index)) {
                if is_blank(value) {
                    continue;
                }
                responses.push(render_response(section, question, value));
            }
        }
    }

    let count = responses.len();
    let payload = json!({
        "questionnaireVersionIdentifier": schema.identifier,
        "questionResponses": responses,
    });
    (payload, count)
}

fn render_response(section: &Section, question: &Question, value: &Value) -> Value {
    let mut response = Map::new();
    response.insert("question".into(), render_question(section, question));
    response.insert("customFormControlIdentifier".into(), question.identifier.clone());
    response.insert("choices".into(), json!([question.tag_value]));

    match question.tag {
        TagKind::Answered => {
            response.insert("answerText".into(), answer_text(value));
        }
        TagKind::Comment => {
            response.insert("commentText".into(), answer_text(value));
        }
        TagKind::FileUpload => {
            let uploads = match value {
                Value::Array(_) => value.clone(),
                other => json!([other]),
            };
            response.insert("fileUploads".into(), uploads);
        }
        TagKind::NotApplicable => {}
    }

    Value::Object(response)
}

fn render_question(section: &Section, question: &Question) -> Value {
    let mut rendered = Map::new();
    for field in PASSTHROUGH_FIELDS {
        if let Some(value) = question.raw.get(*field) {
            rendered.insert((*field).to_string(), value.clone());
        }
    }
    for kind in TagKind::ALL {
        let marker = question.raw.get(kind.marker_field()).cloned().unwrap_or(Value::Null);
        rendered.insert(kind.marker_field().to_string(), marker);
    }

    rendered.insert("text".into(), Value::String(question.text.clone()));
    rendered.insert("identifier".into(), question.identifier.clone());
    rendered.insert("required".into(), Value::Bool(question.required));
    rendered.insert(
        "control".into(),
        json!({
            "identifier": question.control.identifier,
            "heading": question.control.heading,
            "identification": question.control.identification,
            "section": {
                "identifier": section.identifier,
                "heading": section.heading,
            },
        }),
    );
    Value::Object(rendered)
}

fn answer_text(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        other => other.clone(),
    }
}
