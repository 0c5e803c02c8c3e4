//! Status of background jobs started through the API.

use serde::{Deserialize, Serialize};

/// Polled by the client until it reaches `Completed` or `Failed`.
///
/// `InProgress` carries a percentage. `Completed` carries the job's result
/// serialized as JSON, which the caller decodes into the type it expects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(String),
    Failed(String),
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Completed(_) | JobStatus::Failed(_))
    }
}

/// Returned when a job is scheduled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_externally_tagged() {
        let json = serde_json::to_string(&JobStatus::InProgress(40)).unwrap();
        assert_eq!(json, r#"{"InProgress":40}"#);
        let back: JobStatus = serde_json::from_str(r#""Pending""#).unwrap();
        assert_eq!(back, JobStatus::Pending);
        assert!(!back.is_finished());
        assert!(JobStatus::Failed("boom".into()).is_finished());
    }
}
