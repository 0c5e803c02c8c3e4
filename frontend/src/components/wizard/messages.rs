use common::model::application::Application;
use common::model::scholarship::Scholarship;

pub enum Msg {
    Loaded {
        scholarship: Scholarship,
        draft: Option<Application>,
    },
    LoadFailed(String),
    SetValue(String, String),
    Next,
    Prev,
    GoTo(usize),
    SaveDraft,
    DraftSaved(Application),
    /// A draft created on load, without a toast.
    DraftCreated(Application),
    SaveFailed(String),
    Submit,
    Submitted(Application),
    SubmitFailed(String),
}
