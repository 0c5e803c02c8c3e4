use crate::config::AppConfig;
use crate::db;
use crate::error::StoreError;
use crate::services::{connect, reply};
use actix_web::{web, Responder};
use common::requests::SaveFormSchemaRequest;
use common::schema::FormSchema;

pub async fn get(config: web::Data<AppConfig>, id: web::Path<String>) -> impl Responder {
    reply("Loading form schema", editable_schema(&config, &id))
}

pub async fn save(
    config: web::Data<AppConfig>,
    id: web::Path<String>,
    payload: web::Json<SaveFormSchemaRequest>,
) -> impl Responder {
    reply("Saving form schema", save_schema(&config, &id, payload.into_inner().form_schema))
}

fn editable_schema(config: &AppConfig, id: &str) -> Result<FormSchema, StoreError> {
    let conn = connect(config)?;
    Ok(db::scholarships::get(&conn, id)?.editable_schema())
}

fn save_schema(config: &AppConfig, id: &str, schema: FormSchema) -> Result<FormSchema, StoreError> {
    let conn = connect(config)?;
    db::scholarships::save_form_schema(&conn, id, &schema)?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use crate::config::tests::scratch_config;
    use crate::db;
    use crate::services::scholarships::configure_routes;
    use actix_web::{test, web, App};
    use common::model::scholarship::Scholarship;
    use common::responses::ServiceResponse;
    use common::schema::{FieldType, FormField, FormSchema};
    use serde_json::json;

    #[actix_web::test]
    async fn legacy_fields_are_served_migrated_and_saved_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        let conn = db::open(&config.database.path).unwrap();
        db::init_schema(&conn).unwrap();
        let mut scholarship = Scholarship::new("s1", "Award");
        scholarship.custom_fields = Some(vec![FormField::new("why", FieldType::Textarea, "Why us?")]);
        db::scholarships::save(&conn, &scholarship).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/scholarships/s1/form_schema").to_request();
        let body: ServiceResponse<FormSchema> = test::call_and_read_body_json(&app, req).await;
        let schema = body.data.unwrap();
        assert_eq!(schema.sections.len(), 5);
        assert!(schema.contains_field_id("why"));

        let req = test::TestRequest::post()
            .uri("/api/scholarships/s1/form_schema")
            .set_json(json!({ "form_schema": schema }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let stored = db::scholarships::get(&conn, "s1").unwrap();
        assert_eq!(stored.form_schema.map(|s| s.sections.len()), Some(5));
    }

    #[actix_web::test]
    async fn unknown_scholarship_is_a_404_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        db::init_schema(&db::open(&config.database.path).unwrap()).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/scholarships/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        let body: ServiceResponse<Scholarship> = test::read_body_json(resp).await;
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Scholarship missing not found"));
    }
}
