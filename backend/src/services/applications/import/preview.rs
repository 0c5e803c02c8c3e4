use super::pipeline::prepare;
use super::store::SqliteImportStore;
use super::upload::receive_csv;
use super::ImportError;
use crate::config::AppConfig;
use crate::services::{connect, reply};
use actix_multipart::Multipart;
use actix_web::{web, Responder};
use common::csv_import::ImportPlan;
use common::model::csv::ImportPreview;
use common::wizard::validation::current_year;
use log::info;

pub async fn process(config: web::Data<AppConfig>, payload: Multipart) -> impl Responder {
    reply("Previewing import", preview_upload(config.into_inner(), payload).await)
}

/// Runs stages 1 to 5 against the current database contents.
pub(super) fn plan_upload(config: &AppConfig, text: &str) -> Result<ImportPlan, ImportError> {
    let mut conn = connect(config)?;
    let mut store = SqliteImportStore::new(&mut conn);
    prepare(text, current_year(), &mut store)
}

async fn preview_upload(config: std::sync::Arc<AppConfig>, payload: Multipart) -> Result<ImportPreview, ImportError> {
    let upload = receive_csv(payload, &config.import).await?;
    let text = upload.text;
    let plan = tokio::task::spawn_blocking(move || plan_upload(&config, &text))
        .await
        .map_err(|e| ImportError::Task(e.to_string()))??;

    info!(
        "Previewed upload {}: {} rows, {} valid, {} errors",
        upload.upload_id,
        plan.processed_count,
        plan.valid_count(),
        plan.errors.len()
    );
    Ok(ImportPreview {
        upload_id: upload.upload_id,
        processed_count: plan.processed_count,
        valid_rows: plan.valid,
        errors: plan.errors,
    })
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use crate::config::tests::scratch_config;
    use crate::db;
    use crate::services::applications::configure_routes;
    use actix_web::{test, App};
    use common::model::scholarship::Scholarship;
    use common::responses::ServiceResponse;

    pub(crate) const BOUNDARY: &str = "portal-test-boundary";

    pub(crate) fn multipart_body(filename: &str, content: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = filename,
            c = content
        )
    }

    pub(crate) fn multipart_request(uri: &str, filename: &str, content: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(filename, content))
    }

    pub(crate) fn seeded_config(dir: &std::path::Path) -> AppConfig {
        let config = scratch_config(dir);
        let conn = db::open(&config.database.path).unwrap();
        db::init_schema(&conn).unwrap();
        db::scholarships::save(&conn, &Scholarship::new("s1", "STEM Award")).unwrap();
        config
    }

    const CSV: &str = "scholarship_id,first_name,last_name,email,school,major,gpa\n\
                       s1,Ada,Lovelace,ada@example.com,Cambridge,Mathematics,3.9\n\
                       s1,Alan,Turing,not-an-email,Princeton,Logic,5.2\n";

    #[actix_web::test]
    async fn preview_reports_rows_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = seeded_config(dir.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = multipart_request("/api/applications/import/preview", "applicants.csv", CSV).to_request();
        let body: ServiceResponse<ImportPreview> = test::call_and_read_body_json(&app, req).await;
        assert!(body.success, "{:?}", body.error);
        let preview = body.data.unwrap();
        assert_eq!(preview.processed_count, 2);
        assert_eq!(preview.valid_rows.len(), 1);
        assert_eq!(preview.valid_rows[0].application.email, "ada@example.com");
        assert_eq!(preview.errors.len(), 2);
        assert!(preview.errors.iter().all(|e| e.row == 3));
        assert_eq!(preview.upload_id.len(), 32);
        assert!(config.import.upload_dir.join(format!("{}.csv", preview.upload_id)).is_file());

        let conn = db::open(&config.database.path).unwrap();
        assert!(db::applications::list(&conn, &Default::default()).unwrap().is_empty());
    }

    #[actix_web::test]
    async fn non_csv_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = seeded_config(dir.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .service(configure_routes()),
        )
        .await;

        let req = multipart_request("/api/applications/import/preview", "applicants.xlsx", CSV).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: ServiceResponse<ImportPreview> = test::read_body_json(resp).await;
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("The file must end with .csv"));
    }
}
