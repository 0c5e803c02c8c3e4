//! Conversion of legacy flat custom fields into a sectioned schema.
//!
//! Scholarships created before the builder existed only carry
//! `custom_fields`. The first time such a scholarship is opened for editing
//! it is presented as the four default sections followed by a "Scholarship
//! Questions" section holding the legacy fields in array order, the order
//! the wizard's custom step shows them in. Their stored `order` values are
//! ignored and renumbered from 1.

use super::templates::default_sections;
use super::{CustomField, FormSchema, FormSection};

pub const LEGACY_SECTION_ID: &str = "scholarship_questions";
pub const LEGACY_SECTION_TITLE: &str = "Scholarship Questions";

pub fn migrate_legacy_fields(custom_fields: &[CustomField]) -> FormSchema {
    let mut sections = default_sections();

    // Legacy ids win; a clash with a default column drops the default copy.
    for section in sections.iter_mut() {
        section
            .fields
            .retain(|f| !custom_fields.iter().any(|c| c.id == f.id));
        section.renumber_fields();
    }

    sections.push(
        FormSection::new(LEGACY_SECTION_ID, LEGACY_SECTION_TITLE)
            .with_description("Questions specific to this scholarship")
            .with_fields(custom_fields.iter().cloned()),
    );
    FormSchema::new(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, FormField};
    use crate::wizard::derive_steps;

    fn legacy() -> Vec<CustomField> {
        let mut first = FormField::new("essay_topic", FieldType::Textarea, "Why engineering?").required();
        first.order = 7;
        let mut second = FormField::new("county", FieldType::Select, "County").with_options(["North", "South"]);
        second.order = 3;
        vec![first, second]
    }

    #[test]
    fn appends_questions_after_default_sections_in_array_order() {
        let schema = migrate_legacy_fields(&legacy());
        let titles: Vec<&str> = schema.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            titles,
            vec!["personal", "academic", "essays", "additional", LEGACY_SECTION_ID]
        );
        let questions = &schema.sections[4];
        assert_eq!(questions.title, LEGACY_SECTION_TITLE);
        // stored orders 7 and 3 do not reorder the fields
        assert_eq!(questions.fields[0].id, "essay_topic");
        assert_eq!(questions.fields[0].order, 1);
        assert_eq!(questions.fields[1].id, "county");
        assert_eq!(questions.fields[1].order, 2);
        assert_eq!(
            derive_steps(None, Some(&legacy()))[4].fields,
            ["essay_topic", "county"]
        );
        assert_eq!(schema.validate(), Ok(()));
    }

    #[test]
    fn legacy_field_shadowing_a_column_keeps_ids_unique() {
        let clash = vec![FormField::new("major", FieldType::Text, "Intended major").required()];
        let schema = migrate_legacy_fields(&clash);
        assert_eq!(schema.validate(), Ok(()));
        assert_eq!(schema.field("major").map(|f| f.label.as_str()), Some("Intended major"));
    }

    #[test]
    fn no_legacy_fields_still_yields_an_empty_questions_section() {
        let schema = migrate_legacy_fields(&[]);
        assert_eq!(schema.sections.len(), 5);
        assert!(schema.sections[4].fields.is_empty());
    }
}
