//! Update function of the application wizard.
//!
//! Navigation and validation are delegated to `common::wizard::Wizard`; this
//! module only adds the round-trips for draft saving and submission and the
//! toasts that report them. An open scholarship without a stored draft gets
//! one as soon as the wizard loads.

use common::model::application::Application;
use common::requests::SaveApplicationRequest;
use common::wizard::Wizard;
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::{set_window_dirty_flag, show_toast};

use super::messages::Msg;
use super::state::ApplicationWizard;

fn create_draft(link: &Scope<ApplicationWizard>, application: Application) {
    let link = link.clone();
    let request = SaveApplicationRequest { application };
    spawn_local(async move {
        match api::post::<_, Application>("/api/applications/draft", &request).await {
            Ok(saved) => link.send_message(Msg::DraftCreated(saved)),
            Err(e) => gloo_console::warn!(format!("Could not create the draft: {}", e)),
        }
    });
}

pub fn update(component: &mut ApplicationWizard, ctx: &Context<ApplicationWizard>, msg: Msg) -> bool {
    match msg {
        Msg::Loaded { scholarship, draft } => {
            let mut wizard = Wizard::for_scholarship(&scholarship, Some(ctx.props().applicant_id.clone()));
            if let Some(draft) = draft {
                component.locked = !draft.status.is_applicant_editable();
                wizard.load_draft(draft);
            }
            if scholarship.is_active && !wizard.is_saved() && !ctx.props().applicant_id.trim().is_empty() {
                create_draft(ctx.link(), wizard.draft());
            }
            component.scholarship = Some(scholarship);
            component.wizard = Some(wizard);
            component.load_error = None;
            true
        }
        Msg::LoadFailed(error) => {
            gloo_console::error!(format!("Could not load application form: {}", error));
            component.load_error = Some(error);
            true
        }
        Msg::SetValue(field, value) => {
            if let Some(wizard) = &mut component.wizard {
                wizard.set_value(field, value);
                set_window_dirty_flag(true);
            }
            true
        }
        Msg::Next => {
            if let Some(wizard) = &mut component.wizard {
                if !wizard.next_step() && !wizard.errors().is_empty() {
                    show_toast("Please fix the highlighted fields before continuing.");
                }
            }
            true
        }
        Msg::Prev => {
            if let Some(wizard) = &mut component.wizard {
                wizard.prev_step();
            }
            true
        }
        Msg::GoTo(index) => {
            if let Some(wizard) = &mut component.wizard {
                wizard.go_to_step(index);
            }
            true
        }
        Msg::SaveDraft => {
            let Some(wizard) = &component.wizard else {
                return false;
            };
            if component.busy() || component.locked {
                return false;
            }
            component.saving = true;
            let request = SaveApplicationRequest {
                application: wizard.draft(),
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::post::<_, Application>("/api/applications/draft", &request).await {
                    Ok(saved) => link.send_message(Msg::DraftSaved(saved)),
                    Err(e) => link.send_message(Msg::SaveFailed(e)),
                }
            });
            true
        }
        Msg::DraftSaved(saved) => {
            component.saving = false;
            if let Some(wizard) = &mut component.wizard {
                wizard.load_draft(saved);
            }
            set_window_dirty_flag(false);
            show_toast("Draft saved.");
            true
        }
        Msg::DraftCreated(saved) => {
            if let Some(wizard) = &mut component.wizard {
                wizard.adopt_id(&saved);
            }
            false
        }
        Msg::SaveFailed(error) => {
            component.saving = false;
            show_toast(&format!("Could not save the draft: {}", error));
            true
        }
        Msg::Submit => {
            let Some(wizard) = &component.wizard else {
                return false;
            };
            if component.busy() || component.locked {
                return false;
            }
            component.submitting = true;
            component.submit_error = None;
            let request = SaveApplicationRequest {
                application: wizard.submission(),
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::post::<_, Application>("/api/applications/submit", &request).await {
                    Ok(saved) => link.send_message(Msg::Submitted(saved)),
                    Err(e) => link.send_message(Msg::SubmitFailed(e)),
                }
            });
            true
        }
        Msg::Submitted(saved) => {
            component.submitting = false;
            set_window_dirty_flag(false);
            component.submitted = Some(saved.clone());
            ctx.props().on_submitted.emit(saved);
            true
        }
        Msg::SubmitFailed(error) => {
            component.submitting = false;
            component.submit_error = Some(error);
            true
        }
    }
}
