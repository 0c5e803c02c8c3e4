//! Canned schemas offered by the builder's "load template" menu.

use super::catalog::{self, standard_fields};
use super::{FormSchema, FormSection};
use crate::model::application::{ACADEMIC_FIELDS, ADDITIONAL_FIELDS, ESSAY_FIELDS, PERSONAL_FIELDS};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaTemplate {
    Standard,
    Minimal,
    Academic,
}

static STANDARD: Lazy<FormSchema> = Lazy::new(|| FormSchema::new(default_sections()));

static MINIMAL: Lazy<FormSchema> = Lazy::new(|| {
    FormSchema::new(vec![
        FormSection::new("basic", "Basic Information")
            .with_description("How we can reach you")
            .with_fields(standard_fields(&["first_name", "last_name", "email", "phone"])),
        FormSection::new("statement", "Personal Statement")
            .with_fields(standard_fields(&["why_deserve_scholarship"])),
    ])
});

static ACADEMIC: Lazy<FormSchema> = Lazy::new(|| {
    let mut achievements = standard_fields(&["awards_and_honors", "career_goals"]);
    if let Some(file) = catalog::template("custom_file") {
        let mut transcript = file.instantiate("transcript");
        transcript.label = "Official Transcript".to_string();
        transcript.required = true;
        transcript.accepted_formats = Some(vec!["pdf".to_string()]);
        achievements.push(transcript);
    }

    FormSchema::new(vec![
        FormSection::new("personal", "Personal Information").with_fields(standard_fields(&[
            "first_name",
            "last_name",
            "email",
            "phone",
            "date_of_birth",
        ])),
        FormSection::new("academic", "Academic Background").with_fields(standard_fields(ACADEMIC_FIELDS)),
        FormSection::new("achievements", "Academic Achievements")
            .with_description("Honors, goals and your transcript")
            .with_fields(achievements),
    ])
});

/// The personal, academic, essays and additional sections every full
/// application starts from.
pub fn default_sections() -> Vec<FormSection> {
    vec![
        FormSection::new("personal", "Personal Information")
            .with_description("Tell us who you are")
            .with_fields(standard_fields(PERSONAL_FIELDS)),
        FormSection::new("academic", "Academic Information")
            .with_description("Your school and studies")
            .with_fields(standard_fields(ACADEMIC_FIELDS)),
        FormSection::new("essays", "Essays")
            .with_description("Your goals and your story")
            .with_fields(standard_fields(ESSAY_FIELDS)),
        FormSection::new("additional", "Additional Information")
            .with_description("Experience, activities and honors")
            .with_fields(standard_fields(ADDITIONAL_FIELDS)),
    ]
}

impl SchemaTemplate {
    pub const ALL: [SchemaTemplate; 3] = [SchemaTemplate::Standard, SchemaTemplate::Minimal, SchemaTemplate::Academic];

    pub fn name(&self) -> &'static str {
        match self {
            SchemaTemplate::Standard => "Standard application",
            SchemaTemplate::Minimal => "Minimal application",
            SchemaTemplate::Academic => "Academic merit application",
        }
    }

    pub fn schema(&self) -> FormSchema {
        match self {
            SchemaTemplate::Standard => STANDARD.clone(),
            SchemaTemplate::Minimal => MINIMAL.clone(),
            SchemaTemplate::Academic => ACADEMIC.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_is_a_valid_schema() {
        for template in SchemaTemplate::ALL {
            let schema = template.schema();
            assert!(!schema.is_empty(), "{:?} is empty", template);
            assert_eq!(schema.validate(), Ok(()), "{:?}", template);
        }
    }

    #[test]
    fn standard_template_uses_column_ids() {
        let schema = SchemaTemplate::Standard.schema();
        assert_eq!(schema.sections.len(), 4);
        assert!(schema.contains_field_id("gpa"));
        assert!(schema.field("academic_level").is_some_and(|f| f.required));
    }
}
