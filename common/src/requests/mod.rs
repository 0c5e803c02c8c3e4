//! Request bodies accepted by the HTTP API.

use crate::model::application::{Application, ApplicationStatus};
use crate::schema::FormSchema;
use serde::{Deserialize, Serialize};

/// Body of the draft and submit endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveApplicationRequest {
    pub application: Application,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFormSchemaRequest {
    pub form_schema: FormSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardRequest {
    pub amount: f64,
    /// `YYYY-MM-DD`; today when omitted.
    #[serde(default)]
    pub awarded_date: Option<String>,
}

/// Starts committing a previously previewed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartImportRequest {
    pub upload_id: String,
}

/// Query string of the admin application list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationListQuery {
    #[serde(default)]
    pub scholarship_id: Option<String>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
}
