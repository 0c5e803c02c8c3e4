//! Form schema engine.
//!
//! A [`FormSchema`] is an ordered list of [`FormSection`]s, each holding an
//! ordered list of typed [`FormField`]s. Admins author schemas in the form
//! builder; the applicant wizard turns each section into a step.
//!
//! The schema is persisted as a JSON document on the scholarship row, so the
//! serde shape here is the storage format: camelCase keys and a lowercase
//! `type` tag on every field.
//!
//! Mutations live in [`editor`], the read-only field catalog in [`catalog`],
//! the three canned schemas in [`templates`] and the conversion of legacy
//! flat custom fields in [`migration`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

pub mod catalog;
pub mod editor;
pub mod ids;
pub mod migration;
pub mod templates;

pub use catalog::{FieldCategory, FieldDefaults, FieldTemplate};
pub use editor::{FieldPatch, SectionPatch};
pub use ids::{IdSource, SystemIds};
pub use templates::SchemaTemplate;

/// The closed set of input kinds a field can take.
///
/// Rendering and validation match on this exhaustively, so adding a variant
/// breaks compilation everywhere a new arm is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Select,
    Checkbox,
    File,
    Email,
    Phone,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Date,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::File,
        FieldType::Email,
        FieldType::Phone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::File => "file",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional validation rules attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Choices for `select` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    /// Lowercase extensions without the dot, e.g. `pdf`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_formats: Option<Vec<String>>,
    /// Upper bound in bytes for `file` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
}

/// Legacy flat field definition stored in `scholarships.custom_fields`.
pub type CustomField = FormField;

impl FormField {
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            required: false,
            order: 0,
            placeholder: None,
            options: None,
            validation: None,
            accepted_formats: None,
            max_size: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl FormSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            order: 0,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends fields and renumbers them `1..N`.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FormField>) -> Self {
        self.fields.extend(fields);
        self.renumber_fields();
        self
    }

    pub(crate) fn renumber_fields(&mut self) {
        for (position, field) in self.fields.iter_mut().enumerate() {
            field.order = position as u32 + 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub sections: Vec<FormSection>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("section index {index} is out of range (schema has {len} sections)")]
    SectionOutOfRange { index: usize, len: usize },
    #[error("field index {index} is out of range in section {section} ({len} fields)")]
    FieldOutOfRange {
        section: usize,
        index: usize,
        len: usize,
    },
    #[error("duplicate section id '{0}'")]
    DuplicateSectionId(String),
    #[error("duplicate field id '{0}'")]
    DuplicateFieldId(String),
    #[error("section '{section}' has order {found}, expected {expected}")]
    SectionOrder {
        section: String,
        expected: u32,
        found: u32,
    },
    #[error("field '{field}' has order {found}, expected {expected}")]
    FieldOrder {
        field: String,
        expected: u32,
        found: u32,
    },
    #[error("select field '{0}' needs at least one option")]
    MissingOptions(String),
    #[error("field '{0}' has an empty label")]
    EmptyLabel(String),
    #[error("field '{field}' has an invalid pattern: {reason}")]
    InvalidPattern { field: String, reason: String },
}

impl FormSchema {
    pub fn new(sections: Vec<FormSection>) -> Self {
        let mut schema = Self { sections };
        schema.renumber_sections();
        schema
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in ascending `order`, which is the order the wizard presents them.
    pub fn ordered_sections(&self) -> Vec<&FormSection> {
        let mut sections: Vec<&FormSection> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        sections
    }

    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields().find(|f| f.id == id)
    }

    pub fn contains_field_id(&self, id: &str) -> bool {
        self.fields().any(|f| f.id == id)
    }

    pub fn contains_section_id(&self, id: &str) -> bool {
        self.sections.iter().any(|s| s.id == id)
    }

    pub(crate) fn renumber_sections(&mut self) {
        for (position, section) in self.sections.iter_mut().enumerate() {
            section.order = position as u32 + 1;
        }
    }

    /// Checks the invariants a schema must hold before it is persisted.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut section_ids = HashSet::new();
        let mut field_ids = HashSet::new();

        for (position, section) in self.sections.iter().enumerate() {
            if !section_ids.insert(section.id.as_str()) {
                return Err(SchemaError::DuplicateSectionId(section.id.clone()));
            }
            let expected = position as u32 + 1;
            if section.order != expected {
                return Err(SchemaError::SectionOrder {
                    section: section.id.clone(),
                    expected,
                    found: section.order,
                });
            }

            for (field_position, field) in section.fields.iter().enumerate() {
                if !field_ids.insert(field.id.as_str()) {
                    return Err(SchemaError::DuplicateFieldId(field.id.clone()));
                }
                let expected = field_position as u32 + 1;
                if field.order != expected {
                    return Err(SchemaError::FieldOrder {
                        field: field.id.clone(),
                        expected,
                        found: field.order,
                    });
                }
                if field.label.trim().is_empty() {
                    return Err(SchemaError::EmptyLabel(field.id.clone()));
                }
                if field.field_type == FieldType::Select
                    && field.options.as_ref().is_none_or(|o| o.is_empty())
                {
                    return Err(SchemaError::MissingOptions(field.id.clone()));
                }
                if let Some(pattern) = field.validation.as_ref().and_then(|v| v.pattern.as_ref()) {
                    regex::Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                        field: field.id.clone(),
                        reason: e.to_string(),
                    })?;
                }
            }
        }
        Ok(())
    }
}
