//! Multi-step application wizard.
//!
//! - Steps come from the scholarship's form schema, its legacy custom fields,
//!   or the built-in step list, via `common::wizard::derive_steps`.
//! - On first render the scholarship and the applicant's saved draft are
//!   fetched and merged into the wizard.
//! - "Save draft" and "Submit" both upsert on (scholarship, applicant).

use common::model::application::Application;
use common::model::scholarship::Scholarship;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;

mod field_renderer;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::WizardProps;
pub use state::ApplicationWizard;

impl Component for ApplicationWizard {
    type Message = Msg;
    type Properties = WizardProps;

    fn create(_ctx: &Context<Self>) -> Self {
        ApplicationWizard::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            let link = ctx.link().clone();
            let props = ctx.props().clone();
            spawn_local(async move {
                let scholarship =
                    match api::get::<Scholarship>(&format!("/api/scholarships/{}", props.scholarship_id)).await {
                        Ok(scholarship) => scholarship,
                        Err(e) => {
                            link.send_message(Msg::LoadFailed(e));
                            return;
                        }
                    };
                let draft_url = format!(
                    "/api/applications/draft/{}/{}",
                    props.scholarship_id, props.applicant_id
                );
                match api::get_optional::<Application>(&draft_url).await {
                    Ok(draft) => link.send_message(Msg::Loaded { scholarship, draft }),
                    Err(e) => link.send_message(Msg::LoadFailed(e)),
                }
            });
        }
    }
}
