use common::jobs::{JobHandle, JobStatus};
use common::model::csv::ImportPreview;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewTab {
    Valid,
    Errors,
}

pub enum Msg {
    Upload,
    Previewed(ImportPreview),
    UploadFailed(String),
    ShowTab(PreviewTab),
    Start,
    Started(JobHandle),
    Progress(JobStatus),
    PollFailed(String),
    Reset,
}
