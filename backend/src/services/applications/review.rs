//! Admin review actions. Each successful change notifies the applicant.

use crate::config::AppConfig;
use crate::db;
use crate::error::StoreError;
use crate::services::notifications::{Notice, Notifier};
use crate::services::{connect, reply};
use actix_web::{web, Responder};
use chrono::Utc;
use common::model::application::Application;
use common::requests::{AwardRequest, StatusChangeRequest};
use log::info;
use rusqlite::Connection;

fn notify(conn: &Connection, notifier: &Notifier, notice: Notice, application: &Application) {
    match db::scholarships::get(conn, &application.scholarship_id) {
        Ok(scholarship) => notifier.dispatch(notice, application, &scholarship.name),
        Err(e) => log::warn!("No notice for {:?}: {}", application.id, e),
    }
}

pub async fn status(
    config: web::Data<AppConfig>,
    notifier: web::Data<Notifier>,
    id: web::Path<String>,
    payload: web::Json<StatusChangeRequest>,
) -> impl Responder {
    let result = connect(&config).and_then(|conn| {
        let application = db::applications::set_status(&conn, &id, payload.status)?;
        info!("Application {} moved to {}", id, application.status);
        notify(&conn, &notifier, Notice::StatusUpdate, &application);
        Ok(application)
    });
    reply("Changing application status", result)
}

pub async fn award(
    config: web::Data<AppConfig>,
    notifier: web::Data<Notifier>,
    id: web::Path<String>,
    payload: web::Json<AwardRequest>,
) -> impl Responder {
    let AwardRequest { amount, awarded_date } = payload.into_inner();
    let awarded_date = awarded_date
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());

    let result = connect(&config).and_then(|conn| {
        let application = db::applications::award(&conn, &id, amount, &awarded_date)?;
        info!("Application {} awarded {:.2}", id, amount);
        notify(&conn, &notifier, Notice::Award, &application);
        Ok(application)
    });
    reply("Awarding application", result)
}

pub async fn remove_award(config: web::Data<AppConfig>, id: web::Path<String>) -> impl Responder {
    let result: Result<Application, StoreError> =
        connect(&config).and_then(|conn| db::applications::remove_award(&conn, &id));
    reply("Removing award", result)
}

#[cfg(test)]
mod tests {
    use crate::config::tests::scratch_config;
    use crate::db;
    use crate::services::applications::configure_routes;
    use crate::services::notifications::tests::RecordingMailer;
    use crate::services::notifications::Notifier;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use common::model::application::{Application, ApplicationStatus};
    use common::model::scholarship::Scholarship;
    use common::responses::ServiceResponse;
    use serde_json::json;
    use std::sync::Arc;

    #[actix_web::test]
    async fn review_flow_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        let conn = db::open(&config.database.path).unwrap();
        db::init_schema(&conn).unwrap();
        db::scholarships::save(&conn, &Scholarship::new("s1", "STEM Award")).unwrap();
        let mut application = Application::new("s1");
        application.applicant_id = Some("u1".into());
        application.email = "ada@example.com".into();
        let id = db::applications::upsert(&conn, &application, ApplicationStatus::Submitted).unwrap();

        let notifier = Notifier::new(config.notifications.clone(), Arc::new(RecordingMailer::default()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .app_data(web::Data::new(notifier))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/applications/{}/award", id))
            .set_json(json!({ "amount": 500.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        for status in ["under_review", "approved"] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/applications/{}/status", id))
                .set_json(json!({ "status": status }))
                .to_request();
            let body: ServiceResponse<Application> = test::call_and_read_body_json(&app, req).await;
            assert!(body.success, "{:?}", body.error);
        }

        let req = test::TestRequest::post()
            .uri(&format!("/api/applications/{}/award", id))
            .set_json(json!({ "amount": 500.0, "awarded_date": "2026-05-01" }))
            .to_request();
        let body: ServiceResponse<Application> = test::call_and_read_body_json(&app, req).await;
        let awarded = body.data.unwrap();
        assert_eq!(awarded.status, ApplicationStatus::Awarded);
        assert_eq!(awarded.awarded_date.as_deref(), Some("2026-05-01"));

        let req = test::TestRequest::post()
            .uri(&format!("/api/applications/{}/remove_award", id))
            .to_request();
        let body: ServiceResponse<Application> = test::call_and_read_body_json(&app, req).await;
        let reverted = body.data.unwrap();
        assert_eq!(reverted.status, ApplicationStatus::Approved);
        assert_eq!(reverted.awarded_amount, None);
    }
}
