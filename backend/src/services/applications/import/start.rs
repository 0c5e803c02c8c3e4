//! `POST /api/applications/import/start`
//!
//! 1. The handler claims the upload, registers a `Pending` job and answers
//!    with its id at once. A second start for the same upload is refused
//!    with 409 while the first job runs.
//! 2. A Tokio task runs [`import_blocking`] under `spawn_blocking`. It reloads
//!    the stored upload and reruns stages 1 to 5, since the database may have
//!    changed since the preview.
//! 3. Each committed batch sends `InProgress(percent)` through the job
//!    channel.
//! 4. The final `Completed(ImportResult JSON)` or `Failed(message)` is written
//!    straight into the job map. The upload is removed either way.

use super::pipeline::{commit, prepare};
use super::store::SqliteImportStore;
use super::upload::{claim_upload, read_upload, release_upload};
use super::ImportError;
use crate::config::AppConfig;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::{connect, reply};
use actix_web::{web, Responder};
use common::jobs::{JobHandle, JobStatus};
use common::model::csv::ImportResult;
use common::requests::StartImportRequest;
use common::wizard::validation::current_year;
use log::{error, info};
use tokio::sync::mpsc;

pub async fn process(
    config: web::Data<AppConfig>,
    state: web::Data<JobsState>,
    payload: web::Json<StartImportRequest>,
) -> impl Responder {
    let result = schedule_import_job(&config, &state, payload.into_inner()).await;
    reply("Starting import", result.map(|job_id| JobHandle { job_id }))
}

/// Claims the upload, then hands it to a background job.
async fn schedule_import_job(
    config: &AppConfig,
    state: &JobsState,
    req: StartImportRequest,
) -> Result<String, ImportError> {
    claim_upload(&config.import, &req.upload_id)?;

    let job_id = state.register().await;
    info!("Import job {} started for upload {}", job_id, req.upload_id);

    let state = state.clone();
    let config = config.clone();
    let job_id_clone = job_id.clone();
    tokio::spawn(async move {
        let tx = state.tx.clone();
        let job_id_for_blocking = job_id_clone.clone();
        let handle = tokio::task::spawn_blocking(move || {
            import_blocking(tx, &job_id_for_blocking, &config, &req.upload_id)
        });

        let status = match handle.await {
            Ok(Ok(result)) => match serde_json::to_string(&result) {
                Ok(json) => JobStatus::Completed(json),
                Err(e) => JobStatus::Failed(format!("Could not encode import result: {}", e)),
            },
            Ok(Err(e)) => {
                error!("Import job {} failed: {}", job_id_clone, e);
                JobStatus::Failed(e.to_string())
            }
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };
        state.finish(job_id_clone, status).await;
    });

    Ok(job_id)
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        100
    } else {
        (done * 100 / total) as u32
    }
}

/// Runs the whole import on the current thread, reporting progress on `tx`,
/// and releases the upload once the outcome is known.
fn import_blocking(
    tx: mpsc::Sender<JobUpdate>,
    job_id: &str,
    config: &AppConfig,
    upload_id: &str,
) -> Result<ImportResult, ImportError> {
    let result = run_import(&tx, job_id, config, upload_id);
    release_upload(&config.import, upload_id);
    result
}

fn run_import(
    tx: &mpsc::Sender<JobUpdate>,
    job_id: &str,
    config: &AppConfig,
    upload_id: &str,
) -> Result<ImportResult, ImportError> {
    let text = read_upload(&config.import, upload_id)?;
    let _ = tx.blocking_send(JobUpdate::new(job_id, JobStatus::InProgress(0)));

    let mut conn = connect(config)?;
    let mut store = SqliteImportStore::new(&mut conn);
    let plan = prepare(&text, current_year(), &mut store)?;
    Ok(commit(&plan, &mut store, config.import_batch_size(), |done, total| {
        let _ = tx.blocking_send(JobUpdate::new(job_id, JobStatus::InProgress(percent(done, total))));
    }))
}

#[cfg(test)]
mod tests {
    use super::super::preview::tests::{multipart_request, seeded_config};
    use super::super::upload::upload_path;
    use super::*;
    use crate::db;
    use crate::job_controller::state::start_job_updater;
    use crate::services::applications::configure_routes;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use common::model::application::ApplicationStatus;
    use common::model::csv::ImportPreview;
    use common::responses::ServiceResponse;
    use serde_json::json;
    use std::fs;
    use std::time::Duration;

    const CSV: &str = "scholarship_id,first_name,last_name,email,school,major\n\
                       s1,Ada,Lovelace,ada@example.com,Cambridge,Mathematics\n\
                       s1,Grace,Hopper,grace@example.com,Yale,Physics\n\
                       s1,Bad,Row,,Yale,Physics\n";

    #[test]
    fn percent_rounds_down_and_handles_empty_imports() {
        assert_eq!(percent(50, 120), 41);
        assert_eq!(percent(120, 120), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[actix_web::test]
    async fn unknown_upload_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = seeded_config(dir.path());
        let (state, _rx) = JobsState::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/applications/import/start")
            .set_json(json!({ "upload_id": "0123456789abcdef0123456789abcdef" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn preview_then_start_imports_valid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = seeded_config(dir.path());
        let (state, rx) = JobsState::new();
        actix_web::rt::spawn(start_job_updater(state.clone(), rx));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = multipart_request("/api/applications/import/preview", "applicants.csv", CSV).to_request();
        let preview: ServiceResponse<ImportPreview> = actix_test::call_and_read_body_json(&app, req).await;
        let upload_id = preview.data.unwrap().upload_id;

        let req = actix_test::TestRequest::post()
            .uri("/api/applications/import/start")
            .set_json(json!({ "upload_id": upload_id }))
            .to_request();
        let started: ServiceResponse<JobHandle> = actix_test::call_and_read_body_json(&app, req).await;
        let job_id = started.data.unwrap().job_id;

        // a second start either finds the upload claimed or already gone
        let req = actix_test::TestRequest::post()
            .uri("/api/applications/import/start")
            .set_json(json!({ "upload_id": upload_id }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert!(
            [StatusCode::CONFLICT, StatusCode::NOT_FOUND].contains(&resp.status()),
            "second start answered {}",
            resp.status()
        );

        let mut final_status = None;
        for _ in 0..100 {
            let req = actix_test::TestRequest::get()
                .uri(&format!("/api/applications/import/status/{}", job_id))
                .to_request();
            let body: ServiceResponse<JobStatus> = actix_test::call_and_read_body_json(&app, req).await;
            let status = body.data.unwrap();
            if status.is_finished() {
                final_status = Some(status);
                break;
            }
            actix_web::rt::time::sleep(Duration::from_millis(20)).await;
        }

        let json = match final_status {
            Some(JobStatus::Completed(json)) => json,
            other => panic!("import did not complete: {:?}", other),
        };
        let result: ImportResult = serde_json::from_str(&json).unwrap();
        assert!(result.success);
        assert_eq!(result.processed_count, 3);
        assert_eq!(result.success_count, 2);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.errors[0].row, 4);

        let conn = db::open(&config.database.path).unwrap();
        let rows = db::applications::list(&conn, &Default::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|a| a.status == ApplicationStatus::Submitted));
        assert!(rows.iter().all(|a| a.applicant_id.is_none()));
        assert!(upload_path(&config.import, &upload_id).is_err());
    }

    #[actix_web::test]
    async fn claimed_upload_cannot_be_started_again() {
        let dir = tempfile::tempdir().unwrap();
        let config = seeded_config(dir.path());
        let (state, _rx) = JobsState::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .app_data(web::Data::new(state.clone()))
                .service(configure_routes()),
        )
        .await;

        let upload_id = "0123456789abcdef0123456789abcdef";
        fs::create_dir_all(&config.import.upload_dir).unwrap();
        fs::write(config.import.upload_dir.join(format!("{}.csv", upload_id)), CSV).unwrap();
        claim_upload(&config.import, upload_id).unwrap();

        let req = actix_test::TestRequest::post()
            .uri("/api/applications/import/start")
            .set_json(json!({ "upload_id": upload_id }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert!(state.jobs.read().await.is_empty());
    }

    #[test]
    fn failed_import_still_removes_the_upload() {
        let dir = tempfile::tempdir().unwrap();
        let config = seeded_config(dir.path());
        let (state, _rx) = JobsState::new();

        let upload_id = "fedcba9876543210fedcba9876543210";
        fs::create_dir_all(&config.import.upload_dir).unwrap();
        fs::write(config.import.upload_dir.join(format!("{}.csv", upload_id)), "  \n").unwrap();
        claim_upload(&config.import, upload_id).unwrap();

        let result = import_blocking(state.tx.clone(), "j1", &config, upload_id);
        assert!(matches!(result, Err(ImportError::Csv(_))));
        assert!(upload_path(&config.import, upload_id).is_err());
        assert!(claim_upload(&config.import, upload_id).is_err());
        assert_eq!(fs::read_dir(&config.import.upload_dir).unwrap().count(), 0);
    }
}
