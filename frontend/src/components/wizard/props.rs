use common::model::application::Application;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct WizardProps {
    pub scholarship_id: String,
    /// Opaque id of the person applying; drafts are keyed on it.
    pub applicant_id: String,
    /// Called once with the stored application after a successful submission.
    #[prop_or_default]
    pub on_submitted: Callback<Application>,
}
