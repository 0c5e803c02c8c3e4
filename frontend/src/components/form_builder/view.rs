use common::schema::catalog::templates_by_category;
use common::schema::{FormSection, SchemaTemplate, SectionPatch};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

use super::field_editor::field_editor;
use super::messages::Msg;
use super::state::FormBuilder;

pub fn view(component: &FormBuilder, ctx: &Context<FormBuilder>) -> Html {
    let link = ctx.link();
    if let Some(error) = &component.load_error {
        return html! { <div class="builder-error">{ format!("Could not load the form: {}", error) }</div> };
    }

    html! {
        <div class="form-builder">
            { toolbar(component, ctx) }
            if component.schema.sections.is_empty() {
                <p class="builder-empty">
                    { "This form has no sections. Applicants will only see the review step." }
                </p>
            }
            { for component.schema.sections.iter().enumerate().map(|(index, section)| {
                section_card(component, index, section, link)
            }) }
            <YwMaterialTopSheet node_ref={component.editor_ref.clone()} title={Some("Edit field".to_string())}>
                {
                    match component.selected_field() {
                        Some(field) => field_editor(field, link),
                        None => html! {},
                    }
                }
            </YwMaterialTopSheet>
        </div>
    }
}

fn toolbar(component: &FormBuilder, ctx: &Context<FormBuilder>) -> Html {
    let link = ctx.link();
    let on_template = link.batch_callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let chosen = SchemaTemplate::ALL
            .into_iter()
            .find(|t| t.name() == select.value());
        select.set_value("");
        chosen.map(Msg::LoadTemplate)
    });
    html! {
        <div class="builder-toolbar">
            <h2>{ format!("Application form: {}", ctx.props().scholarship_name) }</h2>
            <select onchange={on_template}>
                <option value="" selected=true>{ "Start from a template..." }</option>
                { for SchemaTemplate::ALL.iter().map(|t| html! {
                    <option value={t.name()}>{ t.name() }</option>
                }) }
            </select>
            <button onclick={link.callback(|_| Msg::AddSection)}>{ "Add section" }</button>
            <button class="primary" disabled={component.saving} onclick={link.callback(|_| Msg::Save)}>
                { if component.saving { "Saving..." } else { "Save form" } }
                if component.is_dirty() {
                    <span class="dirty-dot" title="Unsaved changes" />
                }
            </button>
        </div>
    }
}

fn section_card(component: &FormBuilder, index: usize, section: &FormSection, link: &Scope<FormBuilder>) -> Html {
    let last = component.schema.sections.len().saturating_sub(1);
    let on_title = link.callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::UpdateSection(
            index,
            SectionPatch {
                title: Some(input.value()),
                ..Default::default()
            },
        )
    });
    let on_description = link.callback(move |e: Event| {
        let input: HtmlTextAreaElement = e.target_unchecked_into();
        Msg::UpdateSection(
            index,
            SectionPatch {
                description: Some(input.value()),
                ..Default::default()
            },
        )
    });
    let on_add_field = link.batch_callback(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let template_id = select.value();
        select.set_value("");
        (!template_id.is_empty()).then(|| Msg::AddField(index, template_id))
    });

    html! {
        <section class="builder-section">
            <div class="builder-section-header">
                <span class="order">{ section.order.to_string() }</span>
                <input class="section-title" value={section.title.clone()} onchange={on_title} />
                <button disabled={index == 0} onclick={link.callback(move |_| Msg::MoveSection { from: index, to: index.saturating_sub(1) })}>{ "↑" }</button>
                <button disabled={index == last} onclick={link.callback(move |_| Msg::MoveSection { from: index, to: index + 1 })}>{ "↓" }</button>
                <button class="danger" onclick={link.callback(move |_| Msg::RemoveSection(index))}>{ "Remove" }</button>
            </div>
            <textarea
                class="section-description"
                placeholder="Description shown above the section"
                value={section.description.clone()}
                onchange={on_description}
            />
            <ul class="builder-fields">
                { for section.fields.iter().enumerate().map(|(field_index, field)| {
                    let selected = component.selected == Some((index, field_index));
                    let field_last = section.fields.len().saturating_sub(1);
                    html! {
                        <li class={classes!("builder-field", selected.then_some("selected"))}>
                            <span class="field-label">{ field.label.clone() }</span>
                            <span class="badge">{ field.field_type.as_str() }</span>
                            if field.required {
                                <span class="badge required">{ "required" }</span>
                            }
                            <button disabled={field_index == 0} onclick={link.callback(move |_| Msg::MoveField {
                                from_section: index,
                                from_field: field_index,
                                to_section: index,
                                to_field: field_index.saturating_sub(1),
                            })}>{ "↑" }</button>
                            <button disabled={field_index == field_last} onclick={link.callback(move |_| Msg::MoveField {
                                from_section: index,
                                from_field: field_index,
                                to_section: index,
                                to_field: field_index + 1,
                            })}>{ "↓" }</button>
                            <button disabled={index == last} title="Move to next section" onclick={link.callback(move |_| Msg::MoveField {
                                from_section: index,
                                from_field: field_index,
                                to_section: index + 1,
                                to_field: usize::MAX,
                            })}>{ "⇣" }</button>
                            <button onclick={link.callback(move |_| Msg::SelectField(index, field_index))}>{ "Edit" }</button>
                            <button class="danger" onclick={link.callback(move |_| Msg::RemoveField(index, field_index))}>{ "Remove" }</button>
                        </li>
                    }
                }) }
            </ul>
            <select class="add-field" onchange={on_add_field}>
                <option value="" selected=true>{ "Add a field..." }</option>
                { for templates_by_category().into_iter().map(|(category, templates)| html! {
                    <optgroup label={category.title()}>
                        { for templates.into_iter().map(|t| html! {
                            <option value={t.id.clone()} title={t.description.clone()}>{ t.label.clone() }</option>
                        }) }
                    </optgroup>
                }) }
            </select>
        </section>
    }
}
