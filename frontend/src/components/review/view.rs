use common::model::application::{Application, ApplicationStatus};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

use crate::helpers::format_amount;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

use super::messages::Msg;
use super::state::{available_transitions, ReviewBoard};

pub fn view(component: &ReviewBoard, ctx: &Context<ReviewBoard>) -> Html {
    let link = ctx.link();
    html! {
        <div class="review-board">
            { filters(component, ctx) }
            if let Some(error) = &component.load_error {
                <div class="review-error">{ format!("Could not load applications: {}", error) }</div>
            } else if component.loading && component.applications.is_empty() {
                <div class="review-loading">{ "Loading..." }</div>
            } else if component.applications.is_empty() {
                <p class="empty">{ "No applications match these filters." }</p>
            } else {
                <table class="review-table">
                    <thead>
                        <tr>
                            <th>{ "Applicant" }</th>
                            <th>{ "Scholarship" }</th>
                            <th>{ "Submitted" }</th>
                            <th>{ "GPA" }</th>
                            <th>{ "Status" }</th>
                            <th>{ "Award" }</th>
                            <th />
                        </tr>
                    </thead>
                    <tbody>
                        { for component.applications.iter().map(|application| row(application, ctx)) }
                    </tbody>
                </table>
            }
            <YwMaterialTopSheet node_ref={component.award_sheet.clone()} title={Some("Award scholarship".to_string())}>
                { award_dialog(component, link) }
            </YwMaterialTopSheet>
        </div>
    }
}

fn filters(component: &ReviewBoard, ctx: &Context<ReviewBoard>) -> Html {
    let link = ctx.link();
    let on_scholarship = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::FilterScholarship(Some(select.value()).filter(|v| !v.is_empty()))
    });
    let on_status = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::FilterStatus(select.value().parse::<ApplicationStatus>().ok())
    });
    html! {
        <div class="review-filters">
            <select onchange={on_scholarship}>
                <option value="" selected={component.scholarship_filter.is_none()}>{ "All scholarships" }</option>
                { for ctx.props().scholarships.iter().map(|s| html! {
                    <option
                        value={s.id.clone()}
                        selected={component.scholarship_filter.as_deref() == Some(s.id.as_str())}
                    >
                        { s.name.clone() }
                    </option>
                }) }
            </select>
            <select onchange={on_status}>
                <option value="" selected={component.status_filter.is_none()}>{ "Any status" }</option>
                { for ApplicationStatus::ALL.iter().map(|status| html! {
                    <option value={status.as_str()} selected={component.status_filter == Some(*status)}>
                        { status.label() }
                    </option>
                }) }
            </select>
            <button disabled={component.loading} onclick={link.callback(|_| Msg::Refresh)}>{ "Refresh" }</button>
        </div>
    }
}

fn scholarship_name(ctx: &Context<ReviewBoard>, id: &str) -> String {
    ctx.props()
        .scholarships
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn row(application: &Application, ctx: &Context<ReviewBoard>) -> Html {
    let link = ctx.link();
    let id = application.id.clone().unwrap_or_default();
    let status = application.status;

    let actions = available_transitions(status).into_iter().map(|next| {
        let id = id.clone();
        html! {
            <button onclick={link.callback(move |_| Msg::ChangeStatus(id.clone(), next))}>
                { next.label() }
            </button>
        }
    });
    let award_action = match status {
        ApplicationStatus::Approved => {
            let id = id.clone();
            html! { <button class="primary" onclick={link.callback(move |_| Msg::OpenAward(id.clone()))}>{ "Award" }</button> }
        }
        ApplicationStatus::Awarded => {
            let id = id.clone();
            html! { <button class="danger" onclick={link.callback(move |_| Msg::RemoveAward(id.clone()))}>{ "Remove award" }</button> }
        }
        _ => html! {},
    };

    html! {
        <tr>
            <td>
                <div>{ application.full_name() }</div>
                <div class="muted">{ application.email.clone() }</div>
            </td>
            <td>{ scholarship_name(ctx, &application.scholarship_id) }</td>
            <td>{ application.submitted_at.clone().unwrap_or_else(|| "-".to_string()) }</td>
            <td>{ application.gpa.map(|gpa| format!("{:.2}", gpa)).unwrap_or_else(|| "-".to_string()) }</td>
            <td><span class={classes!("status", status.as_str())}>{ status.label() }</span></td>
            <td>
                {
                    match (application.awarded_amount, &application.awarded_date) {
                        (Some(amount), Some(date)) => format!("{} on {}", format_amount(amount), date),
                        (Some(amount), None) => format_amount(amount),
                        _ => "-".to_string(),
                    }
                }
            </td>
            <td class="actions">
                { for actions }
                { award_action }
            </td>
        </tr>
    }
}

fn award_dialog(component: &ReviewBoard, link: &Scope<ReviewBoard>) -> Html {
    let Some(award) = &component.award else {
        return html! {};
    };
    let on_amount = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetAwardAmount(input.value())
    });
    let on_date = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetAwardDate(input.value())
    });
    html! {
        <div class="award-dialog">
            <label class="editor-row">
                <span>{ "Amount" }</span>
                <input type="number" min="0" step="0.01" value={award.amount.clone()} oninput={on_amount} />
            </label>
            <label class="editor-row">
                <span>{ "Award date (defaults to today)" }</span>
                <input type="date" value={award.date.clone()} oninput={on_date} />
            </label>
            <div class="editor-actions">
                <button onclick={link.callback(|_| Msg::CancelAward)}>{ "Cancel" }</button>
                <button class="primary" onclick={link.callback(|_| Msg::ConfirmAward)}>{ "Confirm award" }</button>
            </div>
        </div>
    }
}
