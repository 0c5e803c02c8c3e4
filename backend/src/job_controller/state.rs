//! Shared state of long-running background jobs.
//!
//! Jobs, such as the CSV import in `services::applications::import::start`,
//! run outside the request/response cycle:
//! - `JobsState` is cloned into every worker and into the Actix app data.
//! - Workers report progress as `JobUpdate` messages on the MPSC channel.
//! - `start_job_updater` drains the channel into the shared map, which the
//!   status endpoint reads.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Capacity of the progress channel.
pub const JOB_CHANNEL_CAPACITY: usize = 100;

#[derive(Clone)]
pub struct JobsState {
    /// Job id to its latest status.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,
    /// Progress reports from workers. Blocking workers send with `blocking_send`.
    pub tx: mpsc::Sender<JobUpdate>,
}

impl JobsState {
    /// Fresh state plus the receiver to hand to [`start_job_updater`].
    pub fn new() -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(JOB_CHANNEL_CAPACITY);
        let state = JobsState {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    /// Registers a new job as `Pending` and returns its id.
    pub async fn register(&self) -> String {
        let job_id = uuid::Uuid::new_v4().to_string();
        self.jobs.write().await.insert(job_id.clone(), JobStatus::Pending);
        job_id
    }

    /// Records a final status directly, bypassing the channel.
    pub async fn finish(&self, job_id: String, status: JobStatus) {
        self.jobs.write().await.insert(job_id, status);
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }
}

#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobUpdate {
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
        }
    }
}

/// Applies channel updates to the shared map until every sender is dropped.
///
/// Progress that arrives after a job has finished is discarded so a late
/// `InProgress` never hides the final result.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        if jobs.get(&update.job_id).is_some_and(JobStatus::is_finished) {
            continue;
        }
        jobs.insert(update.job_id, update.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn late_progress_does_not_override_completion() {
        let (state, rx) = JobsState::new();
        let job_id = state.register().await;
        assert_eq!(state.status(&job_id).await, Some(JobStatus::Pending));

        state.finish(job_id.clone(), JobStatus::Completed("{}".into())).await;
        state
            .tx
            .send(JobUpdate::new(job_id.clone(), JobStatus::InProgress(90)))
            .await
            .unwrap();
        let other = state.register().await;
        state
            .tx
            .send(JobUpdate::new(other.clone(), JobStatus::InProgress(10)))
            .await
            .unwrap();

        // The updater's own sender belongs to another channel so `rx` closes
        // once `state` is dropped.
        let jobs = state.jobs.clone();
        let updater = JobsState {
            jobs: jobs.clone(),
            tx: mpsc::channel(1).0,
        };
        drop(state);
        start_job_updater(updater, rx).await;

        let jobs = jobs.read().await;
        assert_eq!(jobs.get(&job_id), Some(&JobStatus::Completed("{}".into())));
        assert_eq!(jobs.get(&other), Some(&JobStatus::InProgress(10)));
    }
}
