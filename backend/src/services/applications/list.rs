use crate::config::AppConfig;
use crate::db;
use crate::services::{connect, reply};
use actix_web::{web, Responder};
use common::requests::ApplicationListQuery;

pub async fn process(config: web::Data<AppConfig>, query: web::Query<ApplicationListQuery>) -> impl Responder {
    let result = connect(&config).and_then(|conn| db::applications::list(&conn, &query));
    reply("Listing applications", result)
}
