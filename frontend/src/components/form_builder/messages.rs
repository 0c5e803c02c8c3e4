use common::schema::{FieldPatch, FormSchema, SchemaTemplate, SectionPatch};

/// Edits to one validation rule, as typed into the field editor.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationEdit {
    MinLength(String),
    MaxLength(String),
    Min(String),
    Max(String),
    Pattern(String),
}

pub enum Msg {
    Loaded(FormSchema),
    LoadFailed(String),
    AddSection,
    UpdateSection(usize, SectionPatch),
    RemoveSection(usize),
    MoveSection { from: usize, to: usize },
    /// Section index and catalog template id.
    AddField(usize, String),
    SelectField(usize, usize),
    CloseEditor,
    /// Applies to the selected field.
    UpdateField(FieldPatch),
    EditValidation(ValidationEdit),
    RemoveField(usize, usize),
    MoveField {
        from_section: usize,
        from_field: usize,
        to_section: usize,
        to_field: usize,
    },
    LoadTemplate(SchemaTemplate),
    Save,
    Saved(FormSchema),
    SaveFailed(String),
}
