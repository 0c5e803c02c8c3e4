//! Admin review of submitted applications: filtering, status changes and
//! awards.

use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::ReviewProps;
pub use state::ReviewBoard;

impl Component for ReviewBoard {
    type Message = Msg;
    type Properties = ReviewProps;

    fn create(_ctx: &Context<Self>) -> Self {
        ReviewBoard::new()
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
            update::load(self, ctx.link());
        }
    }
}
