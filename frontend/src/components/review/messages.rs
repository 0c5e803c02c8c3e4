use common::model::application::{Application, ApplicationStatus};

pub enum Msg {
    Refresh,
    Loaded(Vec<Application>),
    LoadFailed(String),
    FilterScholarship(Option<String>),
    FilterStatus(Option<ApplicationStatus>),
    ChangeStatus(String, ApplicationStatus),
    OpenAward(String),
    SetAwardAmount(String),
    SetAwardDate(String),
    ConfirmAward,
    CancelAward,
    RemoveAward(String),
    /// Replaces the row with the stored copy returned by the server.
    Updated(Application),
    ActionFailed(String),
}
