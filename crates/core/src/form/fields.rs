//! Field-key resolution and validation
//!
//! A field key is either a bare question text (`"First Name"`), which applies
//! to that question in every section, or a qualified `"Heading:Question"` key
//! that targets one section. A qualified key wins over a bare key for the same
//! question.

use std::collections::HashMap;

use serde_json::Value;
use vendorlink_domain::constants::FIELD_KEY_SEPARATOR;
use vendorlink_domain::{IntakeFormSchema, Record, Result, VendorLinkError};

/// Caller-supplied answers keyed by field key.
pub type FieldValues = Record;

/// Position of a question inside a schema: (section index, question index).
pub type QuestionSlot = (usize, usize);

/// Field values mapped onto schema slots.
#[derive(Debug, Default)]
pub struct ResolvedFields<'a> {
    values: HashMap<QuestionSlot, (&'a Value, bool)>,
    /// Keys that match no question, in input order.
    pub unknown: Vec<String>,
}

impl<'a> ResolvedFields<'a> {
    pub fn get(&self, slot: QuestionSlot) -> Option<&'a Value> {
        self.values.get(&slot).map(|(value, _)| *value)
    }

    /// Value for `slot` when it counts as answered.
    pub fn answered(&self, slot: QuestionSlot) -> Option<&'a Value> {
        self.get(slot).filter(|value| !is_blank(value))
    }

    fn assign(&mut self, slot: QuestionSlot, value: &'a Value, qualified: bool) {
        match self.values.get(&slot) {
            Some((_, true)) if !qualified => {}
            _ => {
                self.values.insert(slot, (value, qualified));
            }
        }
    }
}

/// Map every key of `values` onto the schema questions it targets.
pub fn resolve_fields<'a>(schema: &IntakeFormSchema, values: &'a FieldValues) -> ResolvedFields<'a> {
    let mut resolved = ResolvedFields::default();

    for (key, value) in values {
        let bare: Vec<QuestionSlot> = slots_matching(schema, |_, text| text == key.as_str());
        if !bare.is_empty() {
            for slot in bare {
                resolved.assign(slot, value, false);
            }
            continue;
        }

        let qualified: Vec<QuestionSlot> = slots_matching(schema, |heading, text| {
            split_qualified(key, heading).is_some_and(|rest| rest == text || rest.trim() == text)
        });
        if qualified.is_empty() {
            resolved.unknown.push(key.clone());
            continue;
        }
        for slot in qualified {
            resolved.assign(slot, value, true);
        }
    }

    resolved
}

/// Check `values` against the schema without touching the network.
///
/// # Errors
/// Returns `Validation` listing every required question without a non-blank
/// value and every key that matches no question.
pub fn validate(schema: &IntakeFormSchema, values: &FieldValues) -> Result<()> {
    let resolved = resolve_fields(schema, values);

    let mut missing: Vec<String> = Vec::new();
    for (section_index, section) in schema.sections.iter().enumerate() {
        for (question_index, question) in section.questions.iter().enumerate() {
            if !question.required || resolved.answered((section_index, question_index)).is_some() {
                continue;
            }
            let name = if schema.sections_with_question(&question.text).count() > 1 {
                format!("{}{}{}", section.heading, FIELD_KEY_SEPARATOR, question.text)
            } else {
                question.text.clone()
            };
            if !missing.contains(&name) {
                missing.push(name);
            }
        }
    }

    if missing.is_empty() && resolved.unknown.is_empty() {
        return Ok(());
    }
    Err(VendorLinkError::Validation { missing_fields: missing, unknown_fields: resolved.unknown })
}

/// First answered value for a question text, in any section.
pub fn value_for_question<'a>(
    schema: &IntakeFormSchema,
    values: &'a FieldValues,
    text: &str,
) -> Option<&'a Value> {
    let resolved = resolve_fields(schema, values);
    slots_matching(schema, |_, candidate| candidate == text)
        .into_iter()
        .find_map(|slot| resolved.answered(slot))
        .or_else(|| values.get(text).filter(|value| !is_blank(value)))
}

/// Whether a value counts as unanswered.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(true) | Value::Number(_) => false,
    }
}

fn split_qualified<'k>(key: &'k str, heading: &str) -> Option<&'k str> {
    key.strip_prefix(heading)?.strip_prefix(FIELD_KEY_SEPARATOR)
}

fn slots_matching(schema: &IntakeFormSchema, matches: impl Fn(&str, &str) -> bool) -> Vec<QuestionSlot> {
    let mut slots = Vec::new();
    for (section_index, section) in schema.sections.iter().enumerate() {
        for (question_index, question) in section.questions.iter().enumerate() {
            if matches(&section.heading, &question.text) {
                slots.push((section_index, question_index));
            }
        }
    }
    slots
}
