use crate::config::AppConfig;
use crate::db;
use crate::error::StoreError;
use crate::services::{connect, reply};
use actix_web::{web, Responder};
use common::model::application::{Application, ApplicationStatus};
use common::requests::SaveApplicationRequest;

pub async fn get(config: web::Data<AppConfig>, path: web::Path<(String, String)>) -> impl Responder {
    let (scholarship_id, applicant_id) = path.into_inner();
    let result = connect(&config).and_then(|conn| db::applications::find_draft(&conn, &scholarship_id, &applicant_id));
    reply("Loading draft", result)
}

pub async fn save(config: web::Data<AppConfig>, payload: web::Json<SaveApplicationRequest>) -> impl Responder {
    reply("Saving draft", save_draft(&config, &payload.application))
}

fn save_draft(config: &AppConfig, application: &Application) -> Result<Application, StoreError> {
    let conn = connect(config)?;
    let id = db::applications::upsert(&conn, application, ApplicationStatus::Draft)?;
    db::applications::get(&conn, &id)
}
