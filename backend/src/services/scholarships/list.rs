use crate::config::AppConfig;
use crate::db;
use crate::error::StoreError;
use crate::services::{connect, reply};
use actix_web::{web, Responder};
use common::model::scholarship::Scholarship;

pub async fn process(config: web::Data<AppConfig>) -> impl Responder {
    reply("Listing scholarships", list_scholarships(&config))
}

fn list_scholarships(config: &AppConfig) -> Result<Vec<Scholarship>, StoreError> {
    let conn = connect(config)?;
    db::scholarships::list(&conn)
}
