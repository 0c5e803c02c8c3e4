use common::wizard::{Wizard, WizardStep};
use yew::html::Scope;
use yew::prelude::*;

use crate::helpers::format_amount;

use super::field_renderer::{display_value, render_field, FieldChange};
use super::messages::Msg;
use super::state::ApplicationWizard;

pub fn view(component: &ApplicationWizard, ctx: &Context<ApplicationWizard>) -> Html {
    let link = ctx.link();

    if let Some(error) = &component.load_error {
        return html! { <div class="wizard-error">{ format!("Could not load the application form: {}", error) }</div> };
    }
    let (Some(scholarship), Some(wizard)) = (&component.scholarship, &component.wizard) else {
        return html! { <div class="wizard-loading">{ "Loading..." }</div> };
    };

    if let Some(submitted) = &component.submitted {
        return html! {
            <div class="wizard-done">
                <h2>{ "Application submitted" }</h2>
                <p>{ format!("Thank you for applying to {}.", scholarship.name) }</p>
                <p>{ format!("Reference: {}", submitted.id.clone().unwrap_or_default()) }</p>
                <p>{ "A confirmation email is on its way." }</p>
            </div>
        };
    }

    html! {
        <div class="wizard">
            <header class="wizard-header">
                <h2>{ scholarship.name.clone() }</h2>
                if let Some(amount) = scholarship.amount {
                    <span class="wizard-amount">{ format_amount(amount) }</span>
                }
                if let Some(deadline) = &scholarship.deadline {
                    <span class="wizard-deadline">{ format!("Deadline: {}", deadline) }</span>
                }
            </header>
            if component.locked {
                <div class="wizard-locked">
                    { "This application is being reviewed and can no longer be changed." }
                </div>
            }
            { progress_bar(wizard) }
            { step_tabs(wizard, link) }
            { current_step(wizard, link) }
            if let Some(error) = &component.submit_error {
                <div class="submit-error">{ error.clone() }</div>
            }
            { navigation(component, wizard, link) }
        </div>
    }
}

fn progress_bar(wizard: &Wizard) -> Html {
    let width = format!("width: {:.0}%;", wizard.progress());
    html! {
        <div class="progress">
            <div class="progress-fill" style={width} />
            <span class="progress-label">
                { format!("Step {} of {}", wizard.current_index() + 1, wizard.steps().len()) }
            </span>
        </div>
    }
}

fn step_tabs(wizard: &Wizard, link: &Scope<ApplicationWizard>) -> Html {
    html! {
        <nav class="step-tabs">
            { for wizard.steps().iter().enumerate().map(|(index, step)| {
                let active = index == wizard.current_index();
                html! {
                    <button
                        class={classes!("step-tab", active.then_some("active"))}
                        onclick={link.callback(move |_| Msg::GoTo(index))}
                    >
                        { step.title.clone() }
                    </button>
                }
            }) }
        </nav>
    }
}

fn current_step(wizard: &Wizard, link: &Scope<ApplicationWizard>) -> Html {
    let Some(step) = wizard.current_step() else {
        return html! {};
    };
    let on_change: FieldChange = link.callback(|(field, value)| Msg::SetValue(field, value));

    html! {
        <section class="wizard-step">
            <h3>{ step.title.clone() }</h3>
            if let Some(description) = &step.description {
                <p class="step-description">{ description.clone() }</p>
            }
            if step.is_review() {
                { review(wizard, link) }
            } else {
                { for wizard.step_fields(wizard.current_index()).iter().map(|field| {
                    render_field(field, &wizard.value(&field.id), wizard.error(&field.id), &on_change)
                }) }
            }
        </section>
    }
}

/// Every answer grouped by step, each group with a shortcut back to its step.
fn review(wizard: &Wizard, link: &Scope<ApplicationWizard>) -> Html {
    let groups = wizard
        .steps()
        .iter()
        .enumerate()
        .filter(|(_, step)| !step.is_review())
        .map(|(index, step)| review_group(wizard, index, step, link));
    html! { <div class="review">{ for groups }</div> }
}

fn review_group(wizard: &Wizard, index: usize, step: &WizardStep, link: &Scope<ApplicationWizard>) -> Html {
    html! {
        <div class="review-group">
            <div class="review-group-header">
                <h4>{ step.title.clone() }</h4>
                <button class="link-btn" onclick={link.callback(move |_| Msg::GoTo(index))}>{ "Edit" }</button>
            </div>
            <dl>
                { for wizard.step_fields(index).iter().map(|field| html! {
                    <>
                        <dt>{ field.label.clone() }</dt>
                        <dd>{ display_value(field, &wizard.value(&field.id)) }</dd>
                    </>
                }) }
            </dl>
        </div>
    }
}

fn navigation(component: &ApplicationWizard, wizard: &Wizard, link: &Scope<ApplicationWizard>) -> Html {
    let busy = component.busy();
    html! {
        <div class="wizard-nav">
            <button disabled={wizard.is_first_step() || busy} onclick={link.callback(|_| Msg::Prev)}>
                { "Previous" }
            </button>
            <button disabled={busy || component.locked} onclick={link.callback(|_| Msg::SaveDraft)}>
                { if component.saving { "Saving..." } else { "Save draft" } }
            </button>
            if wizard.is_last_step() {
                <button class="primary" disabled={busy || component.locked} onclick={link.callback(|_| Msg::Submit)}>
                    { if component.submitting { "Submitting..." } else { "Submit application" } }
                </button>
            } else {
                <button class="primary" disabled={busy} onclick={link.callback(|_| Msg::Next)}>
                    { "Next" }
                </button>
            }
        </div>
    }
}
