use common::schema::{FormField, FormSchema};
use yew::NodeRef;

use crate::helpers::compute_md5;

/// Form builder state: the schema being edited plus the field open in the
/// editor sheet.
pub struct FormBuilder {
    pub schema: FormSchema,
    /// `(section index, field index)` of the field in the editor.
    pub selected: Option<(usize, usize)>,
    /// Fingerprint of the schema as last loaded or saved.
    pub original_md5: Option<String>,
    pub saving: bool,
    pub load_error: Option<String>,
    pub loaded: bool,
    pub editor_ref: NodeRef,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self {
            schema: FormSchema::default(),
            selected: None,
            original_md5: None,
            saving: false,
            load_error: None,
            loaded: false,
            editor_ref: NodeRef::default(),
        }
    }

    pub fn fingerprint(&self) -> String {
        compute_md5(&serde_json::to_string(&self.schema).unwrap_or_default())
    }

    pub fn is_dirty(&self) -> bool {
        self.original_md5.as_deref() != Some(self.fingerprint().as_str())
    }

    pub fn selected_field(&self) -> Option<&FormField> {
        let (section, field) = self.selected?;
        self.schema.sections.get(section)?.fields.get(field)
    }
}
