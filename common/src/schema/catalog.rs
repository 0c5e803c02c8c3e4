//! Read-only catalog of field templates shown in the form builder palette.
//!
//! Templates are never persisted; they only seed new [`FormField`]s. The
//! standard applicant columns (`first_name`, `gpa`, ...) are catalogued under
//! their column name, which is also the id they carry inside the default
//! sections so their answers land in the flat application record.

use super::{FieldType, FieldValidation, FormField};
use crate::model::application::AcademicLevel;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    Personal,
    Contact,
    Academic,
    Essay,
    Custom,
}

impl FieldCategory {
    pub const ALL: [FieldCategory; 5] = [
        FieldCategory::Personal,
        FieldCategory::Contact,
        FieldCategory::Academic,
        FieldCategory::Essay,
        FieldCategory::Custom,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            FieldCategory::Personal => "Personal Information",
            FieldCategory::Contact => "Contact Details",
            FieldCategory::Academic => "Academic",
            FieldCategory::Essay => "Essays",
            FieldCategory::Custom => "Custom Fields",
        }
    }
}

/// Properties copied onto a field when it is instantiated from a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefaults {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_formats: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTemplate {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Name shown in the palette.
    pub label: String,
    pub category: FieldCategory,
    /// Label given to a freshly added field.
    pub default_label: String,
    pub description: String,
    pub default_props: FieldDefaults,
}

impl FieldTemplate {
    fn new(
        id: &str,
        field_type: FieldType,
        label: &str,
        category: FieldCategory,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            field_type,
            label: label.to_string(),
            category,
            default_label: label.to_string(),
            description: description.to_string(),
            default_props: FieldDefaults::default(),
        }
    }

    fn required(mut self) -> Self {
        self.default_props.required = true;
        self
    }

    fn placeholder(mut self, placeholder: &str) -> Self {
        self.default_props.placeholder = Some(placeholder.to_string());
        self
    }

    fn options(mut self, options: &[&str]) -> Self {
        self.default_props.options = Some(options.iter().map(|o| o.to_string()).collect());
        self
    }

    fn validation(mut self, validation: FieldValidation) -> Self {
        self.default_props.validation = Some(validation);
        self
    }

    fn default_label(mut self, label: &str) -> Self {
        self.default_label = label.to_string();
        self
    }

    /// Builds a field carrying this template's defaults under the given id.
    pub fn instantiate(&self, id: impl Into<String>) -> FormField {
        let defaults = &self.default_props;
        FormField {
            id: id.into(),
            field_type: self.field_type,
            label: self.default_label.clone(),
            required: defaults.required,
            order: 0,
            placeholder: defaults.placeholder.clone(),
            options: defaults.options.clone(),
            validation: defaults.validation.clone(),
            accepted_formats: defaults.accepted_formats.clone(),
            max_size: defaults.max_size,
        }
    }
}

fn min_length(len: usize) -> FieldValidation {
    FieldValidation {
        min_length: Some(len),
        ..Default::default()
    }
}

static CATALOG: Lazy<Vec<FieldTemplate>> = Lazy::new(|| {
    use FieldCategory::*;
    use FieldType as T;

    let mut file = FieldTemplate::new(
        "custom_file",
        T::File,
        "File Upload",
        Custom,
        "Supporting document such as a transcript or recommendation letter",
    )
    .default_label("Supporting Document");
    file.default_props.accepted_formats = Some(vec!["pdf".into(), "doc".into(), "docx".into()]);
    file.default_props.max_size = Some(5 * 1024 * 1024);

    vec![
        FieldTemplate::new("first_name", T::Text, "First Name", Personal, "Applicant's given name")
            .required()
            .placeholder("Jane"),
        FieldTemplate::new("last_name", T::Text, "Last Name", Personal, "Applicant's family name")
            .required()
            .placeholder("Doe"),
        FieldTemplate::new("date_of_birth", T::Date, "Date of Birth", Personal, "YYYY-MM-DD").required(),
        FieldTemplate::new("email", T::Email, "Email Address", Contact, "Where notices are sent")
            .required()
            .placeholder("jane.doe@example.com"),
        FieldTemplate::new("phone", T::Phone, "Phone Number", Contact, "Digits, optionally with +")
            .required()
            .placeholder("555-123-4567"),
        FieldTemplate::new("address", T::Text, "Street Address", Contact, "Mailing address"),
        FieldTemplate::new("city", T::Text, "City", Contact, "City of residence"),
        FieldTemplate::new("state", T::Text, "State", Contact, "State or province"),
        FieldTemplate::new("zip", T::Text, "ZIP Code", Contact, "Postal code"),
        FieldTemplate::new("school", T::Text, "School", Academic, "Current or most recent school")
            .required(),
        FieldTemplate::new("graduation_year", T::Number, "Graduation Year", Academic, "Expected graduation year")
            .required()
            .placeholder("2027"),
        FieldTemplate::new("gpa", T::Number, "GPA", Academic, "On a 4.0 scale")
            .required()
            .placeholder("3.5")
            .validation(FieldValidation {
                min: Some(0.0),
                max: Some(4.0),
                ..Default::default()
            }),
        FieldTemplate::new("major", T::Text, "Major", Academic, "Intended or declared field of study")
            .required(),
        FieldTemplate::new("academic_level", T::Select, "Academic Level", Academic, "Current level of study")
            .required()
            .options(&AcademicLevel::ALL.map(|level| level.as_str())),
        FieldTemplate::new("career_goals", T::Textarea, "Career Goals", Essay, "Where the applicant is headed")
            .required()
            .validation(min_length(50)),
        FieldTemplate::new("financial_need", T::Textarea, "Financial Need", Essay, "Why support is needed")
            .required()
            .validation(min_length(25)),
        FieldTemplate::new(
            "community_involvement",
            T::Textarea,
            "Community Involvement",
            Essay,
            "Volunteering and service",
        )
        .validation(min_length(25)),
        FieldTemplate::new(
            "why_deserve_scholarship",
            T::Textarea,
            "Why You Deserve This Scholarship",
            Essay,
            "Personal statement",
        )
        .required()
        .validation(min_length(25)),
        FieldTemplate::new("work_experience", T::Textarea, "Work Experience", Essay, "Jobs and internships"),
        FieldTemplate::new(
            "extracurricular_activities",
            T::Textarea,
            "Extracurricular Activities",
            Essay,
            "Clubs, sports and activities",
        ),
        FieldTemplate::new("awards_and_honors", T::Textarea, "Awards and Honors", Essay, "Recognition received"),
        FieldTemplate::new("custom_text", T::Text, "Short Answer", Custom, "Single line of text")
            .default_label("Short Answer Question"),
        FieldTemplate::new("custom_textarea", T::Textarea, "Long Answer", Custom, "Multi-line response")
            .default_label("Long Answer Question"),
        FieldTemplate::new("custom_number", T::Number, "Number", Custom, "Numeric answer")
            .default_label("Numeric Question"),
        FieldTemplate::new("custom_date", T::Date, "Date", Custom, "Calendar date").default_label("Date Question"),
        FieldTemplate::new("custom_select", T::Select, "Dropdown", Custom, "Pick one of several options")
            .default_label("Choose an Option")
            .options(&["Option 1", "Option 2", "Option 3"]),
        FieldTemplate::new("custom_checkbox", T::Checkbox, "Checkbox", Custom, "Yes/no confirmation")
            .default_label("I confirm"),
        file,
        FieldTemplate::new("custom_email", T::Email, "Email", Custom, "Additional email address")
            .default_label("Reference Email"),
        FieldTemplate::new("custom_phone", T::Phone, "Phone", Custom, "Additional phone number")
            .default_label("Reference Phone"),
    ]
});

/// Every template in palette order.
pub fn field_catalog() -> &'static [FieldTemplate] {
    &CATALOG
}

pub fn template(id: &str) -> Option<&'static FieldTemplate> {
    CATALOG.iter().find(|t| t.id == id)
}

/// Templates grouped by category, categories in palette order.
pub fn templates_by_category() -> Vec<(FieldCategory, Vec<&'static FieldTemplate>)> {
    FieldCategory::ALL
        .iter()
        .map(|category| {
            let templates = CATALOG.iter().filter(|t| t.category == *category).collect();
            (*category, templates)
        })
        .collect()
}

/// The catalog definition of a standard application column, keyed by column name.
pub fn standard_field(name: &str) -> Option<FormField> {
    template(name)
        .filter(|t| t.category != FieldCategory::Custom)
        .map(|t| t.instantiate(name))
}

/// Like [`standard_field`] but for names known to be catalogued.
pub(crate) fn standard_fields(names: &[&str]) -> Vec<FormField> {
    names.iter().filter_map(|name| standard_field(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::application::STANDARD_FIELDS;

    #[test]
    fn every_standard_column_is_catalogued() {
        for name in STANDARD_FIELDS {
            assert!(standard_field(name).is_some(), "{name} missing from catalog");
        }
    }

    #[test]
    fn custom_templates_are_not_standard_fields() {
        assert!(standard_field("custom_text").is_none());
        assert!(template("custom_text").is_some());
    }

    #[test]
    fn grouping_covers_the_whole_catalog() {
        let grouped: usize = templates_by_category().iter().map(|(_, t)| t.len()).sum();
        assert_eq!(grouped, field_catalog().len());
    }

    #[test]
    fn instantiate_copies_defaults() {
        let field = template("custom_file").unwrap().instantiate("doc");
        assert_eq!(field.label, "Supporting Document");
        assert_eq!(field.max_size, Some(5 * 1024 * 1024));
        assert_eq!(field.accepted_formats.as_deref().map(|f| f.len()), Some(3));
    }
}
