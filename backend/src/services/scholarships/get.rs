use crate::config::AppConfig;
use crate::db;
use crate::services::{connect, reply};
use actix_web::{web, Responder};

pub async fn process(config: web::Data<AppConfig>, id: web::Path<String>) -> impl Responder {
    let result = connect(&config).and_then(|conn| db::scholarships::get(&conn, &id));
    reply("Loading scholarship", result)
}
