//! In-memory job state management
//!
//! A crawl job is registered here when it is requested and updated only by
//! the crawl task that owns it. Status queries read a snapshot; since there
//! is a single writer per job, readers only ever see a stale value, never a
//! torn one. The registry is injected into the orchestrator so it can be
//! faked in tests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Lifecycle of a crawl job. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Starting,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Observable state of one crawl job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobState {
    pub job_id: String,
    pub status: JobStatus,
    pub total_links: usize,
    pub processed_links: usize,
    pub failed_links: usize,
    pub progress_percent: u8,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Thread-safe registry mapping job ids to their state.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<String, JobState>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job and return its id.
    pub async fn create(&self) -> String {
        let job_id = Uuid::new_v4().to_string();
        let state = JobState {
            job_id: job_id.clone(),
            status: JobStatus::Starting,
            total_links: 0,
            processed_links: 0,
            failed_links: 0,
            progress_percent: 0,
            started_at: Utc::now(),
            ended_at: None,
            error: None,
        };

        let mut jobs = self.jobs.write().await;
        jobs.insert(job_id.clone(), state);

        tracing::info!("Registered new crawl job: {}", job_id);
        job_id
    }

    /// Transition the job into `Processing` with the number of links it will
    /// crawl.
    pub async fn start_processing(&self, job_id: &str, total_links: usize) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(job_id) {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Processing;
            job.total_links = total_links;
        }
    }

    /// Record progress after a link has been processed, success or failure.
    ///
    /// `processed_links` is monotonically non-decreasing and never exceeds
    /// `total_links`; `progress_percent` is derived as
    /// `floor(100 * processed / total)`.
    pub async fn update_progress(&self, job_id: &str, processed_links: usize, failed_links: usize) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(job_id) {
            if job.status.is_terminal() {
                return;
            }
            job.processed_links = processed_links.min(job.total_links).max(job.processed_links);
            job.failed_links = failed_links;
            job.progress_percent = if job.total_links == 0 {
                0
            } else {
                (job.processed_links * 100 / job.total_links) as u8
            };
        }
    }

    /// Mark the job as completed. No transition leaves this state.
    pub async fn complete(&self, job_id: &str) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(job_id) {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Completed;
            job.ended_at = Some(Utc::now());
            tracing::info!("Crawl job completed: {}", job_id);
        }
    }

    /// Mark the job as failed with the fatal error text attached.
    pub async fn fail(&self, job_id: &str, error: &str) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(job_id) {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Failed;
            job.ended_at = Some(Utc::now());
            job.error = Some(error.to_string());
            tracing::error!("Crawl job failed: {} - {}", job_id, error);
        }
    }

    /// Snapshot of a single job's state.
    pub async fn get(&self, job_id: &str) -> Option<JobState> {
        let jobs = self.jobs.read().await;
        jobs.get(job_id).cloned()
    }

    /// Snapshot of every registered job.
    pub async fn list(&self) -> Vec<JobState> {
        let jobs = self.jobs.read().await;
        jobs.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_job_lifecycle() {
        let registry = JobRegistry::new();
        let job_id = registry.create().await;

        let job = registry.get(&job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Starting);
        assert_eq!(job.progress_percent, 0);

        registry.start_processing(&job_id, 4).await;
        registry.update_progress(&job_id, 1, 0).await;

        let job = registry.get(&job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.processed_links, 1);
        assert_eq!(job.progress_percent, 25);

        registry.update_progress(&job_id, 4, 1).await;
        registry.complete(&job_id).await;

        let job = registry.get(&job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress_percent, 100);
        assert_eq!(job.failed_links, 1);
        assert!(job.ended_at.is_some());
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_bounded() {
        let registry = JobRegistry::new();
        let job_id = registry.create().await;
        registry.start_processing(&job_id, 3).await;

        let mut last = 0;
        for processed in [1, 2, 2, 3, 5] {
            registry.update_progress(&job_id, processed, 0).await;
            let job = registry.get(&job_id).await.unwrap();
            assert!(job.progress_percent >= last);
            assert!(job.progress_percent <= 100);
            assert!(job.processed_links <= job.total_links);
            last = job.progress_percent;
        }
    }

    #[tokio::test]
    async fn test_terminal_states_are_final() {
        let registry = JobRegistry::new();
        let job_id = registry.create().await;
        registry.start_processing(&job_id, 2).await;
        registry.fail(&job_id, "input table unreadable").await;

        registry.complete(&job_id).await;
        registry.update_progress(&job_id, 2, 0).await;

        let job = registry.get(&job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.processed_links, 0);
        assert_eq!(job.error.as_deref(), Some("input table unreadable"));
    }

    #[tokio::test]
    async fn test_independent_jobs() {
        let registry = JobRegistry::new();
        let first = registry.create().await;
        let second = registry.create().await;

        registry.start_processing(&first, 10).await;
        registry.update_progress(&first, 5, 2).await;

        let untouched = registry.get(&second).await.unwrap();
        assert_eq!(untouched.status, JobStatus::Starting);
        assert_eq!(untouched.processed_links, 0);
        assert_eq!(registry.list().await.len(), 2);
    }
}
