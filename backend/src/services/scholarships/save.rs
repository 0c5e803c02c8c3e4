use crate::config::AppConfig;
use crate::db;
use crate::error::StoreError;
use crate::services::{connect, reply};
use actix_web::{web, Responder};
use common::model::scholarship::Scholarship;
use log::info;

pub async fn process(config: web::Data<AppConfig>, payload: web::Json<Scholarship>) -> impl Responder {
    reply("Saving scholarship", save_scholarship(&config, payload.into_inner()))
}

/// Returns the scholarship as stored, including a generated id.
fn save_scholarship(config: &AppConfig, mut scholarship: Scholarship) -> Result<Scholarship, StoreError> {
    if scholarship.id.trim().is_empty() {
        scholarship.id = uuid::Uuid::new_v4().to_string();
    }
    let conn = connect(config)?;
    db::scholarships::save(&conn, &scholarship)?;
    info!("Saved scholarship {} ({})", scholarship.id, scholarship.name);
    db::scholarships::get(&conn, &scholarship.id)
}
