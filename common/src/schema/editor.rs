//! In-place mutations used by the form builder.
//!
//! Every operation leaves section orders dense `1..N` (and field orders dense
//! inside each touched section). Indices are positions in `sections` /
//! `fields`, which after renumbering always coincide with `order - 1`.

use super::{
    FieldTemplate, FieldType, FieldValidation, FormField, FormSchema, FormSection, IdSource,
    SchemaError, SchemaTemplate, SystemIds,
};

/// Attempts with a fresh suffix before a counter is appended to force uniqueness.
const MAX_ID_ATTEMPTS: usize = 8;

/// Partial update for a section; `None` leaves the value as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Partial update for a field; `None` leaves the value as is. The nested
/// options clear a value when set to `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub required: Option<bool>,
    pub placeholder: Option<Option<String>>,
    pub options: Option<Option<Vec<String>>>,
    pub validation: Option<Option<FieldValidation>>,
    pub accepted_formats: Option<Option<Vec<String>>>,
    pub max_size: Option<Option<u64>>,
}

impl FieldPatch {
    fn apply(self, field: &mut FormField) {
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(placeholder) = self.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(options) = self.options {
            field.options = options;
        }
        if let Some(validation) = self.validation {
            field.validation = validation;
        }
        if let Some(accepted_formats) = self.accepted_formats {
            field.accepted_formats = accepted_formats;
        }
        if let Some(max_size) = self.max_size {
            field.max_size = max_size;
        }
    }
}

impl FormSchema {
    fn section_mut(&mut self, index: usize) -> Result<&mut FormSection, SchemaError> {
        let len = self.sections.len();
        self.sections
            .get_mut(index)
            .ok_or(SchemaError::SectionOutOfRange { index, len })
    }

    fn check_field(&self, section: usize, index: usize) -> Result<(), SchemaError> {
        let len = self
            .sections
            .get(section)
            .ok_or(SchemaError::SectionOutOfRange {
                index: section,
                len: self.sections.len(),
            })?
            .fields
            .len();
        if index >= len {
            return Err(SchemaError::FieldOutOfRange { section, index, len });
        }
        Ok(())
    }

    /// Produces an id of the form `prefix_timestamp_suffix` not yet used in the
    /// schema, drawing a fresh suffix on every collision.
    fn unique_id<I: IdSource>(&self, ids: &mut I, prefix: &str, taken: impl Fn(&Self, &str) -> bool) -> String {
        let timestamp = ids.timestamp_millis();
        let mut attempt = 0;
        loop {
            let mut candidate = format!("{}_{}_{}", prefix, timestamp, ids.random_suffix());
            if attempt >= MAX_ID_ATTEMPTS {
                candidate = format!("{}_{}", candidate, attempt);
            }
            if !taken(self, &candidate) {
                return candidate;
            }
            attempt += 1;
        }
    }

    /// Appends an empty section and returns its index.
    pub fn add_section(&mut self) -> usize {
        self.add_section_with(&mut SystemIds)
    }

    pub fn add_section_with<I: IdSource>(&mut self, ids: &mut I) -> usize {
        let id = self.unique_id(ids, "section", |schema, id| schema.contains_section_id(id));
        let number = self.sections.len() + 1;
        let mut section = FormSection::new(id, format!("Section {}", number));
        section.order = number as u32;
        self.sections.push(section);
        self.renumber_sections();
        self.sections.len() - 1
    }

    pub fn update_section(&mut self, index: usize, patch: SectionPatch) -> Result<(), SchemaError> {
        let section = self.section_mut(index)?;
        if let Some(title) = patch.title {
            section.title = title;
        }
        if let Some(description) = patch.description {
            section.description = description;
        }
        Ok(())
    }

    pub fn remove_section(&mut self, index: usize) -> Result<FormSection, SchemaError> {
        self.section_mut(index)?;
        let removed = self.sections.remove(index);
        self.renumber_sections();
        Ok(removed)
    }

    /// Moves the section at `from` to position `to`; `to` past the end means last.
    pub fn move_section(&mut self, from: usize, to: usize) -> Result<(), SchemaError> {
        self.section_mut(from)?;
        let section = self.sections.remove(from);
        let to = to.min(self.sections.len());
        self.sections.insert(to, section);
        self.renumber_sections();
        Ok(())
    }

    /// Instantiates `template` at the end of the section and returns the new field id.
    pub fn add_field_to_section(
        &mut self,
        section_index: usize,
        template: &FieldTemplate,
    ) -> Result<String, SchemaError> {
        self.add_field_to_section_with(&mut SystemIds, section_index, template)
    }

    pub fn add_field_to_section_with<I: IdSource>(
        &mut self,
        ids: &mut I,
        section_index: usize,
        template: &FieldTemplate,
    ) -> Result<String, SchemaError> {
        self.section_mut(section_index)?;
        let prefix = format!("{}_{}", template.field_type, section_index);
        let id = self.unique_id(ids, &prefix, |schema, id| schema.contains_field_id(id));

        let section = self.section_mut(section_index)?;
        let mut field = template.instantiate(id.clone());
        field.order = section.fields.len() as u32 + 1;
        section.fields.push(field);
        Ok(id)
    }

    pub fn update_field(
        &mut self,
        section_index: usize,
        field_index: usize,
        patch: FieldPatch,
    ) -> Result<(), SchemaError> {
        self.check_field(section_index, field_index)?;
        patch.apply(&mut self.sections[section_index].fields[field_index]);
        Ok(())
    }

    pub fn remove_field(&mut self, section_index: usize, field_index: usize) -> Result<FormField, SchemaError> {
        self.check_field(section_index, field_index)?;
        let section = &mut self.sections[section_index];
        let removed = section.fields.remove(field_index);
        section.renumber_fields();
        Ok(removed)
    }

    /// Moves a field within or across sections. `to_field` past the end of the
    /// target section appends.
    pub fn move_field(
        &mut self,
        from_section: usize,
        from_field: usize,
        to_section: usize,
        to_field: usize,
    ) -> Result<(), SchemaError> {
        self.check_field(from_section, from_field)?;
        self.section_mut(to_section)?;

        let field = self.sections[from_section].fields.remove(from_field);
        self.sections[from_section].renumber_fields();

        let target = &mut self.sections[to_section];
        let to_field = to_field.min(target.fields.len());
        target.fields.insert(to_field, field);
        target.renumber_fields();
        Ok(())
    }

    /// Replaces the whole schema with a canned template. Nothing is merged.
    pub fn load_template(&mut self, template: SchemaTemplate) {
        *self = template.schema();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::catalog;

    /// Replays a fixed list of suffixes against a frozen clock.
    struct ScriptedIds {
        timestamp: i64,
        suffixes: Vec<&'static str>,
        next: usize,
    }

    impl ScriptedIds {
        fn new(timestamp: i64, suffixes: Vec<&'static str>) -> Self {
            Self { timestamp, suffixes, next: 0 }
        }
    }

    impl IdSource for ScriptedIds {
        fn timestamp_millis(&mut self) -> i64 {
            self.timestamp
        }

        fn random_suffix(&mut self) -> String {
            let suffix = self.suffixes[self.next % self.suffixes.len()];
            self.next += 1;
            suffix.to_string()
        }
    }

    fn assert_dense(schema: &FormSchema) {
        let orders: Vec<u32> = schema.sections.iter().map(|s| s.order).collect();
        let expected: Vec<u32> = (1..=schema.sections.len() as u32).collect();
        assert_eq!(orders, expected);
        for section in &schema.sections {
            let orders: Vec<u32> = section.fields.iter().map(|f| f.order).collect();
            let expected: Vec<u32> = (1..=section.fields.len() as u32).collect();
            assert_eq!(orders, expected, "fields of {}", section.id);
        }
    }

    #[test]
    fn orders_stay_dense_across_mixed_operations() {
        let mut schema = FormSchema::default();
        for _ in 0..5 {
            schema.add_section();
            assert_dense(&schema);
        }
        schema.remove_section(1).unwrap();
        assert_dense(&schema);
        schema.move_section(0, 3).unwrap();
        assert_dense(&schema);
        schema.move_section(3, 0).unwrap();
        assert_dense(&schema);
        schema.move_section(2, 99).unwrap();
        assert_dense(&schema);
        schema.remove_section(3).unwrap();
        assert_dense(&schema);
        schema.add_section();
        assert_dense(&schema);
        assert_eq!(schema.sections.len(), 4);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn move_section_keeps_identity() {
        let mut schema = FormSchema::default();
        schema.add_section();
        schema.add_section();
        schema.add_section();
        let ids: Vec<String> = schema.sections.iter().map(|s| s.id.clone()).collect();
        schema.move_section(0, 2).unwrap();
        let moved: Vec<&str> = schema.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(moved, vec![ids[1].as_str(), ids[2].as_str(), ids[0].as_str()]);
    }

    #[test]
    fn field_ids_are_unique_under_same_millisecond_and_colliding_suffix() {
        let text = catalog::template("custom_text").unwrap();
        let mut ids = ScriptedIds::new(
            1_700_000_000_000,
            vec!["sec000000", "abc123def", "abc123def", "zzz999yyy"],
        );
        let mut schema = FormSchema::default();
        schema.add_section_with(&mut ids);

        let first = schema.add_field_to_section_with(&mut ids, 0, text).unwrap();
        let second = schema.add_field_to_section_with(&mut ids, 0, text).unwrap();

        assert_eq!(first, "text_0_1700000000000_abc123def");
        assert_eq!(second, "text_0_1700000000000_zzz999yyy");
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn field_ids_stay_unique_when_suffix_never_changes() {
        let text = catalog::template("custom_text").unwrap();
        let mut ids = ScriptedIds::new(42, vec!["same"]);
        let mut schema = FormSchema::default();
        schema.add_section_with(&mut ids);
        for _ in 0..12 {
            schema.add_field_to_section_with(&mut ids, 0, text).unwrap();
        }
        assert_eq!(schema.sections[0].fields.len(), 12);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn add_field_sets_next_order_and_defaults() {
        let mut schema = FormSchema::default();
        schema.add_section();
        let select = catalog::template("custom_select").unwrap();
        schema.add_field_to_section(0, select).unwrap();
        schema.add_field_to_section(0, select).unwrap();
        let fields = &schema.sections[0].fields;
        assert_eq!(fields[1].order, 2);
        assert!(fields[1].id.starts_with("select_0_"));
        assert_eq!(fields[1].options.as_ref().map(|o| o.len()), Some(3));
    }

    #[test]
    fn move_field_across_sections_renumbers_both() {
        let text = catalog::template("custom_text").unwrap();
        let mut schema = FormSchema::default();
        schema.add_section();
        schema.add_section();
        let a = schema.add_field_to_section(0, text).unwrap();
        schema.add_field_to_section(0, text).unwrap();
        schema.add_field_to_section(1, text).unwrap();

        schema.move_field(0, 0, 1, 0).unwrap();

        assert_eq!(schema.sections[0].fields.len(), 1);
        assert_eq!(schema.sections[1].fields[0].id, a);
        assert_dense(&schema);
    }

    #[test]
    fn update_and_remove_field() {
        let mut schema = FormSchema::default();
        schema.add_section();
        schema.add_field_to_section(0, catalog::template("custom_text").unwrap()).unwrap();
        schema.add_field_to_section(0, catalog::template("custom_number").unwrap()).unwrap();

        schema
            .update_field(
                0,
                1,
                FieldPatch {
                    label: Some("Household size".to_string()),
                    required: Some(true),
                    placeholder: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(schema.sections[0].fields[1].label, "Household size");
        assert!(schema.sections[0].fields[1].required);

        let removed = schema.remove_field(0, 0).unwrap();
        assert_eq!(removed.field_type, FieldType::Text);
        assert_eq!(schema.sections[0].fields[0].order, 1);
    }

    #[test]
    fn update_section_merges_only_given_values() {
        let mut schema = FormSchema::default();
        schema.add_section();
        schema
            .update_section(
                0,
                SectionPatch {
                    description: Some("Tell us more".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(schema.sections[0].title, "Section 1");
        assert_eq!(schema.sections[0].description, "Tell us more");
    }

    #[test]
    fn out_of_range_indices_are_errors() {
        let mut schema = FormSchema::default();
        assert_eq!(
            schema.remove_section(0),
            Err(SchemaError::SectionOutOfRange { index: 0, len: 0 })
        );
        schema.add_section();
        assert!(matches!(
            schema.remove_field(0, 3),
            Err(SchemaError::FieldOutOfRange { section: 0, index: 3, len: 0 })
        ));
        assert!(schema.move_field(0, 0, 5, 0).is_err());
    }

    #[test]
    fn load_template_replaces_everything() {
        let mut schema = FormSchema::default();
        schema.add_section();
        schema.add_section();
        schema.load_template(SchemaTemplate::Minimal);
        assert_eq!(schema, SchemaTemplate::Minimal.schema());
    }
}
