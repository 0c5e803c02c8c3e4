use common::schema::{FieldPatch, FieldType, FormField};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

use super::messages::{Msg, ValidationEdit};
use super::state::FormBuilder;
use super::update::parse_options;

fn optional_text(raw: String) -> Option<String> {
    let raw = raw.trim().to_string();
    (!raw.is_empty()).then_some(raw)
}

fn parse_formats(raw: &str) -> Option<Vec<String>> {
    let formats: Vec<String> = raw
        .split(',')
        .map(|f| f.trim().trim_start_matches('.').to_lowercase())
        .filter(|f| !f.is_empty())
        .collect();
    (!formats.is_empty()).then_some(formats)
}

fn number_text<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn validation_input(
    label: &str,
    value: String,
    link: &Scope<FormBuilder>,
    edit: fn(String) -> ValidationEdit,
) -> Html {
    let onchange = link.callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::EditValidation(edit(input.value()))
    });
    html! {
        <label class="editor-row">
            <span>{ label.to_string() }</span>
            <input type="text" value={value} onchange={onchange} />
        </label>
    }
}

/// Property editor for the selected field, rendered inside the top sheet.
pub fn field_editor(field: &FormField, link: &Scope<FormBuilder>) -> Html {
    let validation = field.validation.clone().unwrap_or_default();

    let on_label = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::UpdateField(FieldPatch {
            label: Some(input.value()),
            ..Default::default()
        })
    });
    let on_type = link.batch_callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let value = select.value();
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .map(|field_type| {
                Msg::UpdateField(FieldPatch {
                    field_type: Some(field_type),
                    ..Default::default()
                })
            })
    });
    let on_required = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::UpdateField(FieldPatch {
            required: Some(input.checked()),
            ..Default::default()
        })
    });
    let on_placeholder = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::UpdateField(FieldPatch {
            placeholder: Some(optional_text(input.value())),
            ..Default::default()
        })
    });
    let on_options = link.callback(|e: Event| {
        let input: HtmlTextAreaElement = e.target_unchecked_into();
        Msg::UpdateField(FieldPatch {
            options: Some(parse_options(&input.value())),
            ..Default::default()
        })
    });
    let on_formats = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::UpdateField(FieldPatch {
            accepted_formats: Some(parse_formats(&input.value())),
            ..Default::default()
        })
    });
    let on_max_size = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::UpdateField(FieldPatch {
            max_size: Some(input.value().trim().parse().ok()),
            ..Default::default()
        })
    });

    let type_specific = match field.field_type {
        FieldType::Text | FieldType::Textarea => html! {
            <>
                { validation_input("Minimum length", number_text(validation.min_length), link, ValidationEdit::MinLength) }
                { validation_input("Maximum length", number_text(validation.max_length), link, ValidationEdit::MaxLength) }
                { validation_input("Pattern", validation.pattern.clone().unwrap_or_default(), link, ValidationEdit::Pattern) }
            </>
        },
        FieldType::Number => html! {
            <>
                { validation_input("Minimum", number_text(validation.min), link, ValidationEdit::Min) }
                { validation_input("Maximum", number_text(validation.max), link, ValidationEdit::Max) }
            </>
        },
        FieldType::Select => html! {
            <label class="editor-row">
                <span>{ "Options (one per line)" }</span>
                <textarea
                    rows="5"
                    value={field.options.clone().unwrap_or_default().join("\n")}
                    onchange={on_options}
                />
            </label>
        },
        FieldType::File => html! {
            <>
                <label class="editor-row">
                    <span>{ "Accepted formats" }</span>
                    <input
                        type="text"
                        placeholder="pdf, docx"
                        value={field.accepted_formats.clone().unwrap_or_default().join(", ")}
                        onchange={on_formats}
                    />
                </label>
                <label class="editor-row">
                    <span>{ "Maximum size (bytes)" }</span>
                    <input type="number" min="0" value={number_text(field.max_size)} onchange={on_max_size} />
                </label>
            </>
        },
        FieldType::Date | FieldType::Checkbox | FieldType::Email | FieldType::Phone => html! {},
    };

    html! {
        <div class="field-editor">
            <label class="editor-row">
                <span>{ "Label" }</span>
                <input type="text" value={field.label.clone()} onchange={on_label} />
            </label>
            <label class="editor-row">
                <span>{ "Type" }</span>
                <select onchange={on_type}>
                    { for FieldType::ALL.iter().map(|t| html! {
                        <option value={t.as_str()} selected={*t == field.field_type}>{ t.as_str() }</option>
                    }) }
                </select>
            </label>
            <label class="editor-row checkbox">
                <input type="checkbox" checked={field.required} onchange={on_required} />
                <span>{ "Required" }</span>
            </label>
            <label class="editor-row">
                <span>{ "Placeholder" }</span>
                <input type="text" value={field.placeholder.clone().unwrap_or_default()} onchange={on_placeholder} />
            </label>
            { type_specific }
            <div class="editor-actions">
                <span class="field-id">{ format!("id: {}", field.id) }</span>
                <button onclick={link.callback(|_| Msg::CloseEditor)}>{ "Close" }</button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_are_normalised() {
        assert_eq!(
            parse_formats(" .PDF, docx,, "),
            Some(vec!["pdf".to_string(), "docx".to_string()])
        );
        assert_eq!(parse_formats(" , "), None);
    }

    #[test]
    fn blank_placeholder_clears_it() {
        assert_eq!(optional_text("   ".into()), None);
        assert_eq!(optional_text(" GPA ".into()), Some("GPA".into()));
    }
}
