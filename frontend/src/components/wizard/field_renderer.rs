//! Renders one form field as the input its `FieldType` calls for.
//!
//! The match over `FieldType` has no wildcard arm: a new field type does not
//! compile until it has a renderer here.

use common::schema::{FieldType, FormField};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

/// `(field id, new raw value)`
pub type FieldChange = Callback<(String, String)>;

fn input_callback(id: &str, on_change: &FieldChange) -> Callback<InputEvent> {
    let id = id.to_string();
    let on_change = on_change.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_change.emit((id.clone(), input.value()));
    })
}

fn text_like(kind: &'static str, field: &FormField, value: &str, on_change: &FieldChange) -> Html {
    let validation = field.validation.clone().unwrap_or_default();
    html! {
        <input
            id={format!("field-{}", field.id)}
            type={kind}
            value={value.to_string()}
            placeholder={field.placeholder.clone()}
            maxlength={validation.max_length.map(|m| m.to_string())}
            oninput={input_callback(&field.id, on_change)}
        />
    }
}

fn number_input(field: &FormField, value: &str, on_change: &FieldChange) -> Html {
    let validation = field.validation.clone().unwrap_or_default();
    html! {
        <input
            id={format!("field-{}", field.id)}
            type="number"
            step="any"
            value={value.to_string()}
            placeholder={field.placeholder.clone()}
            min={validation.min.map(|m| m.to_string())}
            max={validation.max.map(|m| m.to_string())}
            oninput={input_callback(&field.id, on_change)}
        />
    }
}

fn textarea(field: &FormField, value: &str, on_change: &FieldChange) -> Html {
    let id = field.id.clone();
    let on_change = on_change.clone();
    let min_length = field.validation.as_ref().and_then(|v| v.min_length);
    let length = value.trim().chars().count();
    html! {
        <>
            <textarea
                id={format!("field-{}", field.id)}
                rows="5"
                value={value.to_string()}
                placeholder={field.placeholder.clone()}
                oninput={Callback::from(move |e: InputEvent| {
                    let input: HtmlTextAreaElement = e.target_unchecked_into();
                    on_change.emit((id.clone(), input.value()));
                })}
            />
            <div class="char-count">
                {
                    match min_length {
                        Some(min) => format!("{} characters (minimum {})", length, min),
                        None => format!("{} characters", length),
                    }
                }
            </div>
        </>
    }
}

fn select(field: &FormField, value: &str, on_change: &FieldChange) -> Html {
    let id = field.id.clone();
    let on_change = on_change.clone();
    let options = field.options.clone().unwrap_or_default();
    html! {
        <select
            id={format!("field-{}", field.id)}
            onchange={Callback::from(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                on_change.emit((id.clone(), select.value()));
            })}
        >
            <option value="" selected={value.is_empty()}>{ field.placeholder.clone().unwrap_or_else(|| "Select...".to_string()) }</option>
            { for options.iter().map(|option| html! {
                <option value={option.clone()} selected={option == value}>{ option.clone() }</option>
            }) }
        </select>
    }
}

fn checkbox(field: &FormField, value: &str, on_change: &FieldChange) -> Html {
    let id = field.id.clone();
    let on_change = on_change.clone();
    html! {
        <label class="checkbox-label">
            <input
                id={format!("field-{}", field.id)}
                type="checkbox"
                checked={value == "true"}
                onchange={Callback::from(move |e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    on_change.emit((id.clone(), input.checked().to_string()));
                })}
            />
            { field.label.clone() }
            if field.required {
                <span class="required">{ " *" }</span>
            }
        </label>
    }
}

/// Only the file name is recorded; uploading the file itself happens elsewhere.
fn file_input(field: &FormField, value: &str, on_change: &FieldChange) -> Html {
    let id = field.id.clone();
    let on_change = on_change.clone();
    let accept = field.accepted_formats.as_ref().map(|formats| formats.join(","));
    html! {
        <>
            <input
                id={format!("field-{}", field.id)}
                type="file"
                accept={accept}
                onchange={Callback::from(move |e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    let name = input
                        .files()
                        .and_then(|files| files.get(0))
                        .map(|file| file.name())
                        .unwrap_or_default();
                    on_change.emit((id.clone(), name));
                })}
            />
            if !value.is_empty() {
                <div class="file-name">{ format!("Selected: {}", value) }</div>
            }
        </>
    }
}

pub fn render_field(field: &FormField, value: &str, error: Option<&str>, on_change: &FieldChange) -> Html {
    let control = match field.field_type {
        FieldType::Text => text_like("text", field, value, on_change),
        FieldType::Email => text_like("email", field, value, on_change),
        FieldType::Phone => text_like("tel", field, value, on_change),
        FieldType::Date => text_like("date", field, value, on_change),
        FieldType::Number => number_input(field, value, on_change),
        FieldType::Textarea => textarea(field, value, on_change),
        FieldType::Select => select(field, value, on_change),
        FieldType::Checkbox => checkbox(field, value, on_change),
        FieldType::File => file_input(field, value, on_change),
    };
    let labelled = field.field_type != FieldType::Checkbox;

    html! {
        <div class={classes!("form-field", error.map(|_| "has-error"))}>
            if labelled {
                <label for={format!("field-{}", field.id)}>
                    { field.label.clone() }
                    if field.required {
                        <span class="required">{ " *" }</span>
                    }
                </label>
            }
            { control }
            if let Some(error) = error {
                <div class="field-error">{ error }</div>
            }
        </div>
    }
}

/// How an answer reads on the review step.
pub fn display_value(field: &FormField, value: &str) -> String {
    match field.field_type {
        FieldType::Checkbox => (if value == "true" { "Yes" } else { "No" }).to_string(),
        _ if value.trim().is_empty() => "Not provided".to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_values_are_readable() {
        let consent = FormField::new("consent", FieldType::Checkbox, "I agree");
        assert_eq!(display_value(&consent, "true"), "Yes");
        assert_eq!(display_value(&consent, ""), "No");

        let city = FormField::new("city", FieldType::Text, "City");
        assert_eq!(display_value(&city, " "), "Not provided");
        assert_eq!(display_value(&city, "Lyon"), "Lyon");
    }
}
