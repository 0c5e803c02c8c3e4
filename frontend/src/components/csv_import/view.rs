use common::model::csv::{ImportPreview, ImportResult, ImportRowError};
use yew::html::Scope;
use yew::prelude::*;

use super::messages::{Msg, PreviewTab};
use super::state::{CsvImport, Stage};

const TEMPLATE_URL: &str = "/api/applications/import/template";

pub fn view(component: &CsvImport, ctx: &Context<CsvImport>) -> Html {
    let link = ctx.link();
    let body = match &component.stage {
        Stage::SelectFile | Stage::Uploading => file_picker(component, link),
        Stage::Preview(preview) => preview_panel(preview, component.tab, false, link),
        Stage::Starting(preview) => preview_panel(preview, component.tab, true, link),
        Stage::Importing { progress, .. } => html! {
            <div class="import-progress">
                <div class="progress">
                    <div class="progress-fill" style={format!("width: {}%;", progress)} />
                    <span class="progress-label">{ format!("Importing... {}%", progress) }</span>
                </div>
            </div>
        },
        Stage::Done(result) => result_panel(result, link),
        Stage::Failed(error) => html! {
            <div class="import-failed">
                <p>{ format!("The import failed: {}", error) }</p>
                <button onclick={link.callback(|_| Msg::Reset)}>{ "Try again" }</button>
            </div>
        },
    };

    html! {
        <div class="csv-import">
            <header class="import-header">
                <h2>{ "Bulk import applications" }</h2>
                <a class="link-btn" href={TEMPLATE_URL} download="">{ "Download CSV template" }</a>
            </header>
            { body }
        </div>
    }
}

fn file_picker(component: &CsvImport, link: &Scope<CsvImport>) -> Html {
    let uploading = component.stage == Stage::Uploading;
    html! {
        <div class="import-upload">
            <p>{ "Each row becomes a submitted application. Rows are checked before anything is written." }</p>
            <input type="file" accept=".csv,text/csv" ref={component.file_input.clone()} disabled={uploading} />
            <button class="primary" disabled={uploading} onclick={link.callback(|_| Msg::Upload)}>
                { if uploading { "Checking..." } else { "Preview import" } }
            </button>
        </div>
    }
}

fn preview_panel(preview: &ImportPreview, tab: PreviewTab, starting: bool, link: &Scope<CsvImport>) -> Html {
    let tab_button = |target: PreviewTab, label: String| {
        html! {
            <button
                class={classes!("tab", (tab == target).then_some("active"))}
                onclick={link.callback(move |_| Msg::ShowTab(target))}
            >
                { label }
            </button>
        }
    };
    html! {
        <div class="import-preview">
            <p class="import-summary">
                { format!(
                    "{} rows read, {} ready to import, {} problems found.",
                    preview.processed_count,
                    preview.valid_rows.len(),
                    preview.errors.len()
                ) }
            </p>
            <nav class="tabs">
                { tab_button(PreviewTab::Valid, format!("Valid rows ({})", preview.valid_rows.len())) }
                { tab_button(PreviewTab::Errors, format!("Errors ({})", preview.errors.len())) }
            </nav>
            {
                match tab {
                    PreviewTab::Valid => valid_table(preview),
                    PreviewTab::Errors => error_table(&preview.errors),
                }
            }
            <div class="import-actions">
                <button disabled={starting} onclick={link.callback(|_| Msg::Reset)}>{ "Cancel" }</button>
                <button
                    class="primary"
                    disabled={starting || preview.valid_rows.is_empty()}
                    onclick={link.callback(|_| Msg::Start)}
                >
                    { if starting {
                        "Starting...".to_string()
                    } else {
                        format!("Import {} rows", preview.valid_rows.len())
                    } }
                </button>
            </div>
        </div>
    }
}

fn valid_table(preview: &ImportPreview) -> Html {
    if preview.valid_rows.is_empty() {
        return html! { <p class="empty">{ "No row can be imported." }</p> };
    }
    html! {
        <table class="import-table">
            <thead>
                <tr>
                    <th>{ "Row" }</th>
                    <th>{ "Name" }</th>
                    <th>{ "Email" }</th>
                    <th>{ "Scholarship" }</th>
                    <th>{ "School" }</th>
                </tr>
            </thead>
            <tbody>
                { for preview.valid_rows.iter().map(|row| html! {
                    <tr>
                        <td>{ row.row_number.to_string() }</td>
                        <td>{ row.application.full_name() }</td>
                        <td>{ row.application.email.clone() }</td>
                        <td>{ row.application.scholarship_id.clone() }</td>
                        <td>{ row.application.school.clone() }</td>
                    </tr>
                }) }
            </tbody>
        </table>
    }
}

fn error_table(errors: &[ImportRowError]) -> Html {
    if errors.is_empty() {
        return html! { <p class="empty">{ "No problems found." }</p> };
    }
    html! {
        <table class="import-table errors">
            <thead>
                <tr>
                    <th>{ "Row" }</th>
                    <th>{ "Problem" }</th>
                </tr>
            </thead>
            <tbody>
                { for errors.iter().map(|error| html! {
                    <tr>
                        <td>{ error.row.to_string() }</td>
                        <td>{ error.message.clone() }</td>
                    </tr>
                }) }
            </tbody>
        </table>
    }
}

fn result_panel(result: &ImportResult, link: &Scope<CsvImport>) -> Html {
    html! {
        <div class={classes!("import-result", (!result.success).then_some("failed"))}>
            <h3>{ if result.success { "Import finished" } else { "Nothing was imported" } }</h3>
            <p>
                { format!(
                    "{} of {} rows imported, {} skipped.",
                    result.success_count, result.processed_count, result.error_count
                ) }
            </p>
            { error_table(&result.errors) }
            <button onclick={link.callback(|_| Msg::Reset)}>{ "Import another file" }</button>
        </div>
    }
}
