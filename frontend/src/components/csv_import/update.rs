use common::jobs::{JobHandle, JobStatus};
use common::model::csv::{ImportPreview, ImportResult};
use common::requests::StartImportRequest;
use gloo_timers::future::TimeoutFuture;
use web_sys::{FormData, HtmlInputElement};
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::show_toast;

use super::messages::{Msg, PreviewTab};
use super::state::{CsvImport, Stage};

const POLL_INTERVAL_MS: u32 = 1000;

/// The stage a polled job status leads to.
pub fn stage_for(job_id: &str, status: JobStatus) -> Stage {
    match status {
        JobStatus::Pending => Stage::Importing {
            job_id: job_id.to_string(),
            progress: 0,
        },
        JobStatus::InProgress(progress) => Stage::Importing {
            job_id: job_id.to_string(),
            progress: progress.min(100),
        },
        JobStatus::Completed(json) => match serde_json::from_str::<ImportResult>(&json) {
            Ok(result) => Stage::Done(result),
            Err(e) => Stage::Failed(format!("Unreadable import result: {}", e)),
        },
        JobStatus::Failed(error) => Stage::Failed(error),
    }
}

/// Moves a preview into `Starting` and returns the request to send. Any other
/// stage, including one already starting, yields nothing.
pub fn begin_start(stage: &mut Stage) -> Option<StartImportRequest> {
    let Stage::Preview(preview) = stage else {
        return None;
    };
    if preview.valid_rows.is_empty() {
        return None;
    }
    let request = StartImportRequest {
        upload_id: preview.upload_id.clone(),
    };
    *stage = Stage::Starting(preview.clone());
    Some(request)
}

fn selected_form(input: &NodeRef) -> Result<FormData, String> {
    let input = input
        .cast::<HtmlInputElement>()
        .ok_or_else(|| "File input is not mounted".to_string())?;
    let file = input
        .files()
        .and_then(|files| files.get(0))
        .ok_or_else(|| "Choose a CSV file first".to_string())?;
    let form = FormData::new().map_err(|_| "Could not build the upload".to_string())?;
    form.append_with_blob_and_filename("file", &file, &file.name())
        .map_err(|_| "Could not attach the file".to_string())?;
    Ok(form)
}

fn poll(link: Scope<CsvImport>, job_id: String) {
    spawn_local(async move {
        let url = format!("/api/applications/import/status/{}", job_id);
        loop {
            TimeoutFuture::new(POLL_INTERVAL_MS).await;
            match api::get::<JobStatus>(&url).await {
                Ok(status) => {
                    let finished = status.is_finished();
                    link.send_message(Msg::Progress(status));
                    if finished {
                        break;
                    }
                }
                Err(e) => {
                    link.send_message(Msg::PollFailed(e));
                    break;
                }
            }
        }
    });
}

pub fn update(component: &mut CsvImport, ctx: &Context<CsvImport>, msg: Msg) -> bool {
    match msg {
        Msg::Upload => {
            let form = match selected_form(&component.file_input) {
                Ok(form) => form,
                Err(e) => {
                    show_toast(&e);
                    return false;
                }
            };
            component.stage = Stage::Uploading;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::post_form::<ImportPreview>("/api/applications/import/preview", form).await {
                    Ok(preview) => link.send_message(Msg::Previewed(preview)),
                    Err(e) => link.send_message(Msg::UploadFailed(e)),
                }
            });
            true
        }
        Msg::Previewed(preview) => {
            component.tab = if preview.valid_rows.is_empty() {
                PreviewTab::Errors
            } else {
                PreviewTab::Valid
            };
            component.stage = Stage::Preview(preview);
            true
        }
        Msg::UploadFailed(error) => {
            show_toast(&error);
            component.stage = Stage::SelectFile;
            true
        }
        Msg::ShowTab(tab) => {
            component.tab = tab;
            true
        }
        Msg::Start => {
            let Some(request) = begin_start(&mut component.stage) else {
                return false;
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::post::<_, JobHandle>("/api/applications/import/start", &request).await {
                    Ok(handle) => link.send_message(Msg::Started(handle)),
                    Err(e) => link.send_message(Msg::PollFailed(e)),
                }
            });
            true
        }
        Msg::Started(handle) => {
            if !matches!(component.stage, Stage::Starting(_)) {
                return false;
            }
            component.stage = Stage::Importing {
                job_id: handle.job_id.clone(),
                progress: 0,
            };
            poll(ctx.link().clone(), handle.job_id);
            true
        }
        Msg::Progress(status) => {
            let Stage::Importing { job_id, .. } = &component.stage else {
                return false;
            };
            let job_id = job_id.clone();
            component.stage = stage_for(&job_id, status);
            if let Stage::Done(result) = &component.stage {
                show_toast(&format!("Imported {} of {} rows.", result.success_count, result.processed_count));
            }
            true
        }
        Msg::PollFailed(error) => {
            gloo_console::error!(format!("Import failed: {}", error));
            component.stage = Stage::Failed(error);
            true
        }
        Msg::Reset => {
            if matches!(component.stage, Stage::Starting(_)) {
                return false;
            }
            component.stage = Stage::SelectFile;
            component.tab = PreviewTab::Valid;
            true
        }
    }
}
