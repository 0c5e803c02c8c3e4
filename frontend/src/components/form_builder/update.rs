//! Update function of the form builder.
//!
//! Every structural edit goes through the `FormSchema` editor operations, so
//! orders stay dense and ids unique without any bookkeeping here. Failures
//! (stale indices) are reported as toasts and leave the schema untouched.

use common::requests::SaveFormSchemaRequest;
use common::schema::{catalog, FieldPatch, FieldValidation, FormSchema, SchemaError};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::{set_window_dirty_flag, show_toast};
use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet};

use super::messages::{Msg, ValidationEdit};
use super::state::FormBuilder;

fn report(result: Result<(), SchemaError>) {
    if let Err(e) = result {
        gloo_console::warn!(e.to_string());
        show_toast(&e.to_string());
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// The field's validation after one rule edit; `None` once no rule is left.
pub fn apply_validation_edit(current: Option<FieldValidation>, edit: ValidationEdit) -> Option<FieldValidation> {
    let mut validation = current.unwrap_or_default();
    match edit {
        ValidationEdit::MinLength(raw) => validation.min_length = parse_number(&raw),
        ValidationEdit::MaxLength(raw) => validation.max_length = parse_number(&raw),
        ValidationEdit::Min(raw) => validation.min = parse_number(&raw),
        ValidationEdit::Max(raw) => validation.max = parse_number(&raw),
        ValidationEdit::Pattern(raw) => {
            validation.pattern = Some(raw.trim().to_string()).filter(|p| !p.is_empty())
        }
    }
    (validation != FieldValidation::default()).then_some(validation)
}

/// One option per line, blank lines dropped.
pub fn parse_options(text: &str) -> Option<Vec<String>> {
    let options: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    (!options.is_empty()).then_some(options)
}

pub fn update(component: &mut FormBuilder, ctx: &Context<FormBuilder>, msg: Msg) -> bool {
    let changed = match msg {
        Msg::Loaded(schema) => {
            component.schema = schema;
            component.selected = None;
            component.load_error = None;
            component.original_md5 = Some(component.fingerprint());
            true
        }
        Msg::LoadFailed(error) => {
            gloo_console::error!(format!("Could not load form schema: {}", error));
            component.load_error = Some(error);
            true
        }
        Msg::AddSection => {
            component.schema.add_section();
            true
        }
        Msg::UpdateSection(index, patch) => {
            report(component.schema.update_section(index, patch));
            true
        }
        Msg::RemoveSection(index) => {
            report(component.schema.remove_section(index).map(|_| ()));
            close_editor(component);
            true
        }
        Msg::MoveSection { from, to } => {
            report(component.schema.move_section(from, to));
            close_editor(component);
            true
        }
        Msg::AddField(section, template_id) => {
            let Some(template) = catalog::template(&template_id) else {
                return false;
            };
            match component.schema.add_field_to_section(section, template) {
                Ok(_) => {
                    let field = component.schema.sections[section].fields.len() - 1;
                    component.selected = Some((section, field));
                    open_top_sheet(component.editor_ref.clone());
                }
                Err(e) => report(Err(e)),
            }
            true
        }
        Msg::SelectField(section, field) => {
            component.selected = Some((section, field));
            open_top_sheet(component.editor_ref.clone());
            true
        }
        Msg::CloseEditor => {
            close_editor(component);
            true
        }
        Msg::UpdateField(patch) => {
            if let Some((section, field)) = component.selected {
                report(component.schema.update_field(section, field, patch));
            }
            true
        }
        Msg::EditValidation(edit) => {
            if let Some((section, field)) = component.selected {
                let current = component.selected_field().and_then(|f| f.validation.clone());
                let patch = FieldPatch {
                    validation: Some(apply_validation_edit(current, edit)),
                    ..Default::default()
                };
                report(component.schema.update_field(section, field, patch));
            }
            true
        }
        Msg::RemoveField(section, field) => {
            report(component.schema.remove_field(section, field).map(|_| ()));
            close_editor(component);
            true
        }
        Msg::MoveField {
            from_section,
            from_field,
            to_section,
            to_field,
        } => {
            report(component.schema.move_field(from_section, from_field, to_section, to_field));
            close_editor(component);
            true
        }
        Msg::LoadTemplate(template) => {
            component.schema.load_template(template);
            close_editor(component);
            show_toast(&format!("Loaded \"{}\".", template.name()));
            true
        }
        Msg::Save => {
            if component.saving {
                return false;
            }
            if let Err(e) = component.schema.validate() {
                show_toast(&format!("The form cannot be saved: {}", e));
                return false;
            }
            component.saving = true;
            let url = format!("/api/scholarships/{}/form_schema", ctx.props().scholarship_id);
            let request = SaveFormSchemaRequest {
                form_schema: component.schema.clone(),
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::post::<_, FormSchema>(&url, &request).await {
                    Ok(saved) => link.send_message(Msg::Saved(saved)),
                    Err(e) => link.send_message(Msg::SaveFailed(e)),
                }
            });
            true
        }
        Msg::Saved(schema) => {
            component.saving = false;
            component.schema = schema;
            component.original_md5 = Some(component.fingerprint());
            show_toast("Form saved.");
            true
        }
        Msg::SaveFailed(error) => {
            component.saving = false;
            show_toast(&format!("Could not save the form: {}", error));
            true
        }
    };
    set_window_dirty_flag(component.is_dirty());
    changed
}

fn close_editor(component: &mut FormBuilder) {
    component.selected = None;
    close_top_sheet(component.editor_ref.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_the_last_rule_drops_validation() {
        let validation = apply_validation_edit(None, ValidationEdit::MinLength("10".into()));
        assert_eq!(validation.as_ref().and_then(|v| v.min_length), Some(10));

        let validation = apply_validation_edit(validation, ValidationEdit::Max("4".into()));
        assert_eq!(validation.as_ref().and_then(|v| v.max), Some(4.0));

        let validation = apply_validation_edit(validation, ValidationEdit::MinLength(String::new()));
        let validation = apply_validation_edit(validation, ValidationEdit::Max("abc".into()));
        assert_eq!(validation, None);
    }

    #[test]
    fn options_are_one_per_line() {
        assert_eq!(
            parse_options("Freshman\n\n  Sophomore \n"),
            Some(vec!["Freshman".to_string(), "Sophomore".to_string()])
        );
        assert_eq!(parse_options(" \n"), None);
    }
}
