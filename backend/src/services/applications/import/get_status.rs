use crate::error::StoreError;
use crate::job_controller::state::JobsState;
use crate::services::reply;
use actix_web::{web, Responder};

pub(crate) async fn process(job_id: web::Path<String>, state: web::Data<JobsState>) -> impl Responder {
    let job_id = job_id.into_inner();
    let status = state
        .status(&job_id)
        .await
        .ok_or_else(|| StoreError::NotFound(format!("Job {}", job_id)));
    reply("Reading import status", status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::jobs::JobStatus;
    use common::responses::ServiceResponse;

    #[actix_web::test]
    async fn reports_registered_jobs_and_404s_unknown_ones() {
        let (state, _rx) = JobsState::new();
        let job_id = state.register().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/status/{job_id}", web::get().to(process)),
        )
        .await;

        let req = test::TestRequest::get().uri(&format!("/status/{}", job_id)).to_request();
        let body: ServiceResponse<JobStatus> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.data, Some(JobStatus::Pending));

        let req = test::TestRequest::get().uri("/status/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
