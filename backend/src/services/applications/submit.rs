use crate::config::AppConfig;
use crate::db;
use crate::error::StoreError;
use crate::services::notifications::{Notice, Notifier};
use crate::services::{connect, reply};
use actix_web::{web, Responder};
use chrono::{NaiveDate, Utc};
use common::model::application::{Application, ApplicationStatus};
use common::model::scholarship::Scholarship;
use common::requests::SaveApplicationRequest;
use log::info;

pub async fn process(
    config: web::Data<AppConfig>,
    notifier: web::Data<Notifier>,
    payload: web::Json<SaveApplicationRequest>,
) -> impl Responder {
    let result = submit_application(&config, &payload.application).inspect(|(application, scholarship)| {
        notifier.dispatch(Notice::SubmissionConfirmation, application, &scholarship.name);
    });
    reply("Submitting application", result.map(|(application, _)| application))
}

fn ensure_open(scholarship: &Scholarship, today: NaiveDate) -> Result<(), StoreError> {
    if !scholarship.is_active {
        return Err(StoreError::Invalid(format!(
            "{} is not accepting applications",
            scholarship.name
        )));
    }
    let deadline = scholarship
        .deadline
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    if deadline.is_some_and(|deadline| today > deadline) {
        return Err(StoreError::Invalid(format!(
            "The deadline for {} has passed",
            scholarship.name
        )));
    }
    Ok(())
}

/// Upserts the application as submitted. The server sets `submitted_at`.
fn submit_application(config: &AppConfig, application: &Application) -> Result<(Application, Scholarship), StoreError> {
    let conn = connect(config)?;
    let scholarship = db::scholarships::get(&conn, &application.scholarship_id)?;
    ensure_open(&scholarship, Utc::now().date_naive())?;

    let id = db::applications::upsert(&conn, application, ApplicationStatus::Submitted)?;
    info!("Application {} submitted for scholarship {}", id, scholarship.id);
    Ok((db::applications::get(&conn, &id)?, scholarship))
}
