//! Thin wrappers over `gloo_net` for the portal's JSON API.
//!
//! Every endpoint answers with a `ServiceResponse` envelope; these helpers
//! unwrap it so callers only see `Ok(data)` or the single error message meant
//! for the user.

use common::responses::ServiceResponse;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::FormData;

async fn read<T: DeserializeOwned>(response: Result<Response, gloo_net::Error>) -> Result<Option<T>, String> {
    let response = response.map_err(|e| format!("Network error: {}", e))?;
    let body: ServiceResponse<T> = response
        .json()
        .await
        .map_err(|e| format!("Unexpected response ({}): {}", response.status(), e))?;
    body.into_result()
}

fn required<T>(data: Option<T>) -> Result<T, String> {
    data.ok_or_else(|| "The server returned no data".to_string())
}

pub async fn get<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    read(Request::get(url).send().await).await.and_then(required)
}

/// For endpoints whose `data` may legitimately be `null`.
pub async fn get_optional<T: DeserializeOwned>(url: &str) -> Result<Option<T>, String> {
    read::<Option<T>>(Request::get(url).send().await)
        .await
        .map(Option::flatten)
}

pub async fn post<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, String> {
    let request = Request::post(url).json(body).map_err(|e| e.to_string())?;
    read(request.send().await).await.and_then(required)
}

pub async fn post_empty<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    read(Request::post(url).send().await).await.and_then(required)
}

pub async fn post_form<T: DeserializeOwned>(url: &str, form: FormData) -> Result<T, String> {
    let request = Request::post(url).body(form).map_err(|e| e.to_string())?;
    read(request.send().await).await.and_then(required)
}
