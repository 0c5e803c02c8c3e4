//! Admin editor for a scholarship's application form.
//!
//! Sections and fields are edited in place; the selected field opens in a top
//! sheet. Saving validates the whole schema before it is posted.

use common::schema::FormSchema;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;

mod field_editor;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::FormBuilderProps;
pub use state::FormBuilder;

impl Component for FormBuilder {
    type Message = Msg;
    type Properties = FormBuilderProps;

    fn create(_ctx: &Context<Self>) -> Self {
        FormBuilder::new()
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
            let url = format!("/api/scholarships/{}/form_schema", ctx.props().scholarship_id);
            spawn_local(async move {
                match api::get::<FormSchema>(&url).await {
                    Ok(schema) => link.send_message(Msg::Loaded(schema)),
                    Err(e) => link.send_message(Msg::LoadFailed(e)),
                }
            });
        }
    }
}
