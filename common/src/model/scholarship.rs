use crate::schema::migration::migrate_legacy_fields;
use crate::schema::{CustomField, FormSchema};
use crate::wizard::{derive_steps, WizardStep};
use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Option<f64>,
    /// ISO date (`YYYY-MM-DD`) after which applications close.
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub form_schema: Option<FormSchema>,
    /// Legacy flat questions predating `form_schema`.
    #[serde(default)]
    pub custom_fields: Option<Vec<CustomField>>,
}

impl Scholarship {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            amount: None,
            deadline: None,
            is_active: true,
            form_schema: None,
            custom_fields: None,
        }
    }

    pub fn legacy_fields(&self) -> &[CustomField] {
        self.custom_fields.as_deref().unwrap_or_default()
    }

    /// The schema the builder should edit: the stored one, else the legacy
    /// fields migrated into sections, else an empty schema.
    pub fn editable_schema(&self) -> FormSchema {
        match &self.form_schema {
            Some(schema) => schema.clone(),
            None if !self.legacy_fields().is_empty() => migrate_legacy_fields(self.legacy_fields()),
            None => FormSchema::default(),
        }
    }

    pub fn wizard_steps(&self) -> Vec<WizardStep> {
        derive_steps(self.form_schema.as_ref(), self.custom_fields.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, FormField, SchemaTemplate};

    #[test]
    fn editable_schema_prefers_stored_schema() {
        let mut scholarship = Scholarship::new("s1", "STEM Award");
        scholarship.form_schema = Some(SchemaTemplate::Minimal.schema());
        scholarship.custom_fields = Some(vec![FormField::new("q", FieldType::Text, "Q")]);
        assert_eq!(scholarship.editable_schema(), SchemaTemplate::Minimal.schema());
    }

    #[test]
    fn editable_schema_migrates_legacy_fields() {
        let mut scholarship = Scholarship::new("s1", "STEM Award");
        scholarship.custom_fields = Some(vec![FormField::new("q", FieldType::Text, "Q")]);
        let schema = scholarship.editable_schema();
        assert_eq!(schema.sections.len(), 5);
        assert!(schema.contains_field_id("q"));
    }

    #[test]
    fn editable_schema_defaults_to_empty() {
        let scholarship = Scholarship::new("s1", "STEM Award");
        assert!(scholarship.editable_schema().is_empty());
    }

    #[test]
    fn missing_flags_deserialize_with_defaults() {
        let scholarship: Scholarship = serde_json::from_str(r#"{"id":"s1","name":"Award"}"#).unwrap();
        assert!(scholarship.is_active);
        assert!(scholarship.form_schema.is_none());
    }
}
