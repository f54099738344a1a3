//! Intake-form schema types
//!
//! The vendor intake form is a questionnaire: sections contain controls,
//! controls contain questions. The schema flattens controls away but keeps a
//! reference to each question's control, since the submission payload needs
//! it. Section and question order mirror presentation order.

use std::collections::HashSet;

use serde_json::Value;

use crate::types::record::Record;

/// The kind of input slot a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Answered,
    NotApplicable,
    Comment,
    FileUpload,
}

impl TagKind {
    pub const ALL: [TagKind; 4] =
        [TagKind::Answered, TagKind::NotApplicable, TagKind::Comment, TagKind::FileUpload];

    /// Field on a raw question entry whose presence marks this kind.
    pub fn marker_field(self) -> &'static str {
        match self {
            Self::Answered => "answeredTag",
            Self::NotApplicable => "notApplicableTag",
            Self::Comment => "questionLevelCommentTag",
            Self::FileUpload => "fileUploadTag",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::NotApplicable => "not_applicable",
            Self::Comment => "comment",
            Self::FileUpload => "file_upload",
        }
    }
}

/// The control a question belongs to, kept verbatim for submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlRef {
    pub identifier: Value,
    pub heading: Value,
    pub identification: Value,
}

/// One question of the intake form.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Question text; the lookup key within its section.
    pub text: String,
    pub tag: TagKind,
    /// Value of the tag marker field (echoed back as the response choice).
    pub tag_value: Value,
    pub required: bool,
    pub identifier: Value,
    pub control: ControlRef,
    /// The raw question entry as received.
    pub raw: Record,
}

/// A section heading and its questions, in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub identifier: Value,
    pub questions: Vec<Question>,
}

/// Parsed intake form. Derived per fetch and never cached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntakeFormSchema {
    /// Questionnaire version identifier, echoed in submissions.
    pub identifier: Value,
    pub sections: Vec<Section>,
}

impl IntakeFormSchema {
    /// Every question with its section, in order.
    pub fn questions(&self) -> impl Iterator<Item = (&Section, &Question)> {
        self.sections.iter().flat_map(|section| section.questions.iter().map(move |q| (section, q)))
    }

    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|section| section.questions.len()).sum()
    }

    /// Sections sharing `text` as a question.
    pub fn sections_with_question<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Section> {
        self.sections.iter().filter(move |section| section.questions.iter().any(|q| q.text == text))
    }

    /// Section heading to question texts.
    ///
    /// Sections sharing a heading are merged and a question text repeated
    /// within one heading is listed once.
    pub fn describe(&self) -> Vec<(String, Vec<String>)> {
        let mut view: Vec<(String, Vec<String>)> = Vec::new();
        for section in &self.sections {
            let index = match view.iter().position(|(heading, _)| *heading == section.heading) {
                Some(index) => index,
                None => {
                    view.push((section.heading.clone(), Vec::new()));
                    view.len() - 1
                }
            };
            let texts = &mut view[index].1;
            for question in &section.questions {
                if !texts.contains(&question.text) {
                    texts.push(question.text.clone());
                }
            }
        }
        view
    }

    /// All question texts, deduplicated across sections, first-seen order.
    pub fn question_texts(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.questions()
            .filter(|(_, q)| seen.insert(q.text.as_str()))
            .map(|(_, q)| q.text.clone())
            .collect()
    }

    /// Required question texts per section heading.
    pub fn required_questions(&self) -> Vec<(String, Vec<String>)> {
        self.filtered_view(|q| q.required)
    }

    /// Optional question texts per section heading.
    pub fn optional_questions(&self) -> Vec<(String, Vec<String>)> {
        self.filtered_view(|q| !q.required)
    }

    fn filtered_view(&self, keep: impl Fn(&Question) -> bool) -> Vec<(String, Vec<String>)> {
        self.sections
            .iter()
            .map(|section| {
                let texts = section.questions.iter().filter(|q| keep(q)).map(|q| q.text.clone()).collect();
                (section.heading.clone(), texts)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, required: bool) -> Question {
        Question {
            text: text.to_string(),
            tag: TagKind::Answered,
            tag_value: Value::String("answered".into()),
            required,
            identifier: Value::Null,
            control: ControlRef::default(),
            raw: Record::new(),
        }
    }

    fn section(heading: &str, questions: Vec<Question>) -> Section {
        Section { heading: heading.to_string(), identifier: Value::Null, questions }
    }

    fn schema() -> IntakeFormSchema {
        IntakeFormSchema {
            identifier: Value::String("qv-1".into()),
            sections: vec![
                section("Vendor Information", vec![question("Vendor Name", true), question("First Name", false)]),
                section("Owner", vec![question("First Name", true), question("First Name", true)]),
                section("Vendor Information", vec![question("Vendor URL", true), question("Vendor Name", true)]),
            ],
        }
    }

    #[test]
    fn structural_view_keeps_repeats() {
        let schema = schema();
        assert_eq!(schema.question_count(), 6);
        assert_eq!(schema.sections_with_question("First Name").count(), 2);
    }

    #[test]
    fn describe_merges_headings_and_dedups_within_them() {
        let view = schema().describe();
        assert_eq!(
            view,
            vec![
                (
                    "Vendor Information".to_string(),
                    vec!["Vendor Name".to_string(), "First Name".to_string(), "Vendor URL".to_string()]
                ),
                ("Owner".to_string(), vec!["First Name".to_string()]),
            ]
        );
    }

    #[test]
    fn question_texts_dedup_across_sections() {
        assert_eq!(schema().question_texts(), vec!["Vendor Name", "First Name", "Vendor URL"]);
    }

    #[test]
    fn required_and_optional_split() {
        let schema = schema();
        let required = schema.required_questions();
        assert_eq!(required[0].1, vec!["Vendor Name".to_string()]);
        let optional = schema.optional_questions();
        assert_eq!(optional[0].1, vec!["First Name".to_string()]);
        assert!(optional[1].1.is_empty());
    }

    #[test]
    fn marker_fields_are_distinct() {
        let fields: HashSet<_> = TagKind::ALL.iter().map(|kind| kind.marker_field()).collect();
        assert_eq!(fields.len(), 4);
    }
}
