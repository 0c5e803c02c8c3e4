use common::model::csv::{ImportPreview, ImportResult};
use yew::NodeRef;

use super::messages::PreviewTab;

/// Where the import currently stands.
#[derive(Clone, Debug, PartialEq)]
pub enum Stage {
    SelectFile,
    Uploading,
    Preview(ImportPreview),
    /// The start request is in flight.
    Starting(ImportPreview),
    /// Carries the last reported percentage.
    Importing { job_id: String, progress: u32 },
    Done(ImportResult),
    Failed(String),
}

pub struct CsvImport {
    pub stage: Stage,
    pub tab: PreviewTab,
    pub file_input: NodeRef,
}

impl CsvImport {
    pub fn new() -> Self {
        Self {
            stage: Stage::SelectFile,
            tab: PreviewTab::Valid,
            file_input: NodeRef::default(),
        }
    }
}
