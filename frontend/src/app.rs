use common::model::application::Application;
use common::model::scholarship::Scholarship;
use web_sys::HtmlSelectElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::csv_import::CsvImport;
use crate::components::form_builder::FormBuilder;
use crate::components::review::ReviewBoard;
use crate::components::wizard::ApplicationWizard;
use crate::helpers::{applicant_id, confirm_discard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Apply,
    FormBuilder,
    Import,
    Review,
}

impl Page {
    const ALL: [Page; 4] = [Page::Apply, Page::FormBuilder, Page::Import, Page::Review];

    fn title(&self) -> &'static str {
        match self {
            Page::Apply => "Apply",
            Page::FormBuilder => "Form builder",
            Page::Import => "Import",
            Page::Review => "Review",
        }
    }

    fn needs_scholarship(&self) -> bool {
        matches!(self, Page::Apply | Page::FormBuilder)
    }
}

pub enum Msg {
    ScholarshipsLoaded(Vec<Scholarship>),
    LoadFailed(String),
    Navigate(Page),
    SelectScholarship(String),
    Submitted(Application),
}

pub struct App {
    page: Page,
    scholarships: Vec<Scholarship>,
    selected: Option<String>,
    applicant_id: String,
    load_error: Option<String>,
    loaded: bool,
}

impl App {
    fn selected_scholarship(&self) -> Option<&Scholarship> {
        let id = self.selected.as_deref()?;
        self.scholarships.iter().find(|s| s.id == id)
    }

    fn sidebar(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_select = link.callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            Msg::SelectScholarship(select.value())
        });
        html! {
            <aside class="sidebar">
                <h1>{ "Scholarship portal" }</h1>
                <nav>
                    { for Page::ALL.iter().map(|page| {
                        let page = *page;
                        html! {
                            <button
                                class={classes!("nav-item", (self.page == page).then_some("active"))}
                                onclick={link.callback(move |_| Msg::Navigate(page))}
                            >
                                { page.title() }
                            </button>
                        }
                    }) }
                </nav>
                if self.page.needs_scholarship() {
                    <label class="scholarship-picker">
                        <span>{ "Scholarship" }</span>
                        <select onchange={on_select}>
                            { for self.scholarships.iter().map(|s| html! {
                                <option value={s.id.clone()} selected={self.selected.as_deref() == Some(s.id.as_str())}>
                                    { s.name.clone() }
                                </option>
                            }) }
                        </select>
                    </label>
                }
            </aside>
        }
    }

    fn content(&self, ctx: &Context<Self>) -> Html {
        if let Some(error) = &self.load_error {
            return html! { <div class="app-error">{ format!("Could not load scholarships: {}", error) }</div> };
        }
        match self.page {
            Page::Import => html! { <CsvImport /> },
            Page::Review => html! { <ReviewBoard scholarships={self.scholarships.clone()} /> },
            Page::Apply | Page::FormBuilder => {
                let Some(scholarship) = self.selected_scholarship() else {
                    return html! { <p class="empty">{ "No scholarship is open for applications." }</p> };
                };
                if self.page == Page::Apply {
                    html! {
                        <ApplicationWizard
                            key={format!("apply-{}", scholarship.id)}
                            scholarship_id={scholarship.id.clone()}
                            applicant_id={self.applicant_id.clone()}
                            on_submitted={ctx.link().callback(Msg::Submitted)}
                        />
                    }
                } else {
                    html! {
                        <FormBuilder
                            key={format!("builder-{}", scholarship.id)}
                            scholarship_id={scholarship.id.clone()}
                            scholarship_name={scholarship.name.clone()}
                        />
                    }
                }
            }
        }
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            page: Page::Apply,
            scholarships: Vec::new(),
            selected: None,
            applicant_id: applicant_id(),
            load_error: None,
            loaded: false,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ScholarshipsLoaded(scholarships) => {
                self.selected = scholarships
                    .iter()
                    .find(|s| s.is_active)
                    .or_else(|| scholarships.first())
                    .map(|s| s.id.clone());
                self.scholarships = scholarships;
                true
            }
            Msg::LoadFailed(error) => {
                gloo_console::error!(format!("Could not load scholarships: {}", error));
                self.load_error = Some(error);
                true
            }
            Msg::Navigate(page) => {
                if page == self.page || !confirm_discard() {
                    return false;
                }
                self.page = page;
                true
            }
            Msg::SelectScholarship(id) => {
                if !confirm_discard() {
                    return true;
                }
                self.selected = Some(id);
                true
            }
            Msg::Submitted(application) => {
                gloo_console::log!(format!(
                    "Application {} submitted",
                    application.id.unwrap_or_default()
                ));
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="app">
                { self.sidebar(ctx) }
                <main class="content">
                    { self.content(ctx) }
                </main>
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::get::<Vec<Scholarship>>("/api/scholarships").await {
                    Ok(scholarships) => link.send_message(Msg::ScholarshipsLoaded(scholarships)),
                    Err(e) => link.send_message(Msg::LoadFailed(e)),
                }
            });
        }
    }
}
