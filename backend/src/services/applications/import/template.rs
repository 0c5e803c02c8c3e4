use super::ImportError;
use crate::services::reply;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder};
use common::csv_import::{csv_template, TEMPLATE_FILE_NAME};

/// Serves the header row plus one example row as a download.
pub async fn process() -> impl Responder {
    match csv_template() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(TEMPLATE_FILE_NAME.to_string())],
            })
            .body(body),
        Err(e) => reply::<(), _>("Building import template", Err(ImportError::from(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};
    use common::csv_import::CSV_HEADERS;

    #[actix_web::test]
    async fn template_is_a_csv_attachment() {
        let app = test::init_service(App::new().route("/template", web::get().to(process))).await;
        let req = test::TestRequest::get().uri("/template").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let disposition = resp
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains(TEMPLATE_FILE_NAME));

        let body = test::read_body(resp).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(text.lines().next(), Some(CSV_HEADERS.join(",").as_str()));
        assert_eq!(text.lines().count(), 2);
    }
}
