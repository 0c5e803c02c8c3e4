use common::model::application::Application;
use common::model::scholarship::Scholarship;
use common::wizard::Wizard;

/// Runtime data of the application wizard.
///
/// `wizard` stays `None` until the scholarship and any saved draft have been
/// fetched on first render.
pub struct ApplicationWizard {
    pub scholarship: Option<Scholarship>,
    pub wizard: Option<Wizard>,
    pub load_error: Option<String>,
    pub saving: bool,
    pub submitting: bool,
    /// The single message shown when submission fails.
    pub submit_error: Option<String>,
    /// Set once the application has been submitted from this wizard.
    pub submitted: Option<Application>,
    /// The stored application is past `submitted` and can no longer change.
    pub locked: bool,
    /// Guard for first-render loading.
    pub loaded: bool,
}

impl ApplicationWizard {
    pub fn new() -> Self {
        Self {
            scholarship: None,
            wizard: None,
            load_error: None,
            saving: false,
            submitting: false,
            submit_error: None,
            submitted: None,
            locked: false,
            loaded: false,
        }
    }

    pub fn busy(&self) -> bool {
        self.saving || self.submitting
    }
}
