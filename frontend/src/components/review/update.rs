use common::model::application::Application;
use common::requests::{AwardRequest, StatusChangeRequest};
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::show_toast;
use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet};

use super::messages::Msg;
use super::state::{AwardForm, ReviewBoard};

fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

fn list_url(component: &ReviewBoard) -> String {
    let mut params = Vec::new();
    if let Some(scholarship) = &component.scholarship_filter {
        params.push(format!("scholarship_id={}", encode(scholarship)));
    }
    if let Some(status) = component.status_filter {
        params.push(format!("status={}", status.as_str()));
    }
    if params.is_empty() {
        "/api/applications".to_string()
    } else {
        format!("/api/applications?{}", params.join("&"))
    }
}

pub fn load(component: &mut ReviewBoard, link: &Scope<ReviewBoard>) {
    component.loading = true;
    let url = list_url(component);
    let link = link.clone();
    spawn_local(async move {
        match api::get::<Vec<Application>>(&url).await {
            Ok(applications) => link.send_message(Msg::Loaded(applications)),
            Err(e) => link.send_message(Msg::LoadFailed(e)),
        }
    });
}

/// Posts one review action; the stored row comes back as `Updated`.
fn act<B: serde::Serialize + 'static>(link: &Scope<ReviewBoard>, url: String, body: Option<B>) {
    let link = link.clone();
    spawn_local(async move {
        let result = match &body {
            Some(body) => api::post::<_, Application>(&url, body).await,
            None => api::post_empty::<Application>(&url).await,
        };
        match result {
            Ok(application) => link.send_message(Msg::Updated(application)),
            Err(e) => link.send_message(Msg::ActionFailed(e)),
        }
    });
}

pub fn update(component: &mut ReviewBoard, ctx: &Context<ReviewBoard>, msg: Msg) -> bool {
    match msg {
        Msg::Refresh => {
            load(component, ctx.link());
            true
        }
        Msg::Loaded(applications) => {
            component.loading = false;
            component.load_error = None;
            component.applications = applications;
            true
        }
        Msg::LoadFailed(error) => {
            gloo_console::error!(format!("Could not load applications: {}", error));
            component.loading = false;
            component.load_error = Some(error);
            true
        }
        Msg::FilterScholarship(scholarship) => {
            component.scholarship_filter = scholarship;
            load(component, ctx.link());
            true
        }
        Msg::FilterStatus(status) => {
            component.status_filter = status;
            load(component, ctx.link());
            true
        }
        Msg::ChangeStatus(id, status) => {
            act(
                ctx.link(),
                format!("/api/applications/{}/status", id),
                Some(StatusChangeRequest { status }),
            );
            false
        }
        Msg::OpenAward(id) => {
            let amount = component
                .applications
                .iter()
                .find(|a| a.id.as_deref() == Some(id.as_str()))
                .and_then(|a| {
                    ctx.props()
                        .scholarships
                        .iter()
                        .find(|s| s.id == a.scholarship_id)
                        .and_then(|s| s.amount)
                })
                .map(|amount| amount.to_string())
                .unwrap_or_default();
            component.award = Some(AwardForm {
                application_id: id,
                amount,
                date: String::new(),
            });
            open_top_sheet(component.award_sheet.clone());
            true
        }
        Msg::SetAwardAmount(amount) => {
            if let Some(award) = &mut component.award {
                award.amount = amount;
            }
            false
        }
        Msg::SetAwardDate(date) => {
            if let Some(award) = &mut component.award {
                award.date = date;
            }
            false
        }
        Msg::ConfirmAward => {
            let Some(award) = &component.award else {
                return false;
            };
            let amount = match award.amount.trim().parse::<f64>() {
                Ok(amount) if amount > 0.0 => amount,
                _ => {
                    show_toast("Enter a positive award amount.");
                    return false;
                }
            };
            let request = AwardRequest {
                amount,
                awarded_date: Some(award.date.trim().to_string()).filter(|d| !d.is_empty()),
            };
            act(
                ctx.link(),
                format!("/api/applications/{}/award", award.application_id),
                Some(request),
            );
            component.award = None;
            close_top_sheet(component.award_sheet.clone());
            true
        }
        Msg::CancelAward => {
            component.award = None;
            close_top_sheet(component.award_sheet.clone());
            true
        }
        Msg::RemoveAward(id) => {
            act::<()>(ctx.link(), format!("/api/applications/{}/remove_award", id), None);
            false
        }
        Msg::Updated(application) => {
            show_toast(&format!("{} is now {}.", application.full_name(), application.status.label()));
            let filtered_out = component
                .status_filter
                .is_some_and(|status| status != application.status);
            if filtered_out {
                component.applications.retain(|a| a.id != application.id);
            } else {
                component.replace(application);
            }
            true
        }
        Msg::ActionFailed(error) => {
            show_toast(&error);
            true
        }
    }
}
