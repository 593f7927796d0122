//! In-process tracker for scrape and extract jobs.
//!
//! A job is accepted immediately in the `in_progress` state and moves to
//! exactly one terminal state: `success`, `failure` or `cancelled`. The work
//! runs on its own tokio task; cancelling abandons it and its result is
//! dropped. Finished jobs are kept for a retention window so clients can poll
//! them, then pruned.
//!
//! # Usage
//!
//!   let job = tracker.spawn(JobKind::Scrape, SCRAPING_IN_PROGRESS, async move {
//!       service.scrape(&url, &selector).await
//!   }).await;
//!   let status = tracker.get(job.id).await;

use chrono::{DateTime, Utc};
use extraction::Outcome;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// How long finished jobs stay queryable.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Scrape,
    Extract,
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobState {
    InProgress { message: String },
    Success { text: String, display: String },
    Failure { message: String, display: String },
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::InProgress { .. })
    }
}

impl From<Outcome> for JobState {
    fn from(outcome: Outcome) -> Self {
        let display = outcome.display();
        match outcome {
            Outcome::Success { text } => JobState::Success { text, display },
            Outcome::Failure { message } => JobState::Failure { message, display },
        }
    }
}

/// Snapshot of a job as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobView {
    pub id: Uuid,
    pub kind: JobKind,
    #[serde(flatten)]
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

struct JobEntry {
    kind: JobKind,
    state: JobState,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    cancel: CancellationToken,
}

impl JobEntry {
    fn view(&self, id: Uuid) -> JobView {
        JobView {
            id,
            kind: self.kind,
            state: self.state.clone(),
            created_at: self.created_at,
            finished_at: self.finished_at,
        }
    }

    fn finish(&mut self, state: JobState) {
        self.state = state;
        self.finished_at = Some(Utc::now());
    }
}

/// Thread-safe, cloneable job table.
#[derive(Clone)]
pub struct JobTracker {
    jobs: Arc<RwLock<HashMap<Uuid, JobEntry>>>,
    retention: Duration,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    /// Register a job and run `work` on a new task.
    ///
    /// Returns the `in_progress` snapshot straight away.
    pub async fn spawn<F>(&self, kind: JobKind, in_progress: &str, work: F) -> JobView
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        self.prune().await;

        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let entry = JobEntry {
            kind,
            state: JobState::InProgress {
                message: in_progress.to_string(),
            },
            created_at: Utc::now(),
            finished_at: None,
            cancel: cancel.clone(),
        };
        let view = entry.view(id);
        self.jobs.write().await.insert(id, entry);

        let tracker = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(job_id = %id, "Job abandoned after cancel");
                }
                outcome = work => {
                    tracker.complete(id, outcome).await;
                }
            }
        });

        tracing::info!(job_id = %id, kind = ?kind, "Job accepted");
        view
    }

    /// Record the outcome, unless the job was cancelled first.
    async fn complete(&self, id: Uuid, outcome: Outcome) {
        let mut jobs = self.jobs.write().await;
        let Some(entry) = jobs.get_mut(&id) else {
            return;
        };
        if entry.state.is_terminal() {
            return;
        }

        tracing::info!(job_id = %id, success = outcome.is_success(), "Job finished");
        entry.finish(outcome.into());
    }

    /// Current snapshot of a job.
    pub async fn get(&self, id: Uuid) -> Option<JobView> {
        self.jobs.read().await.get(&id).map(|entry| entry.view(id))
    }

    /// Cancel a running job. Finished jobs are returned unchanged.
    pub async fn cancel(&self, id: Uuid) -> Option<JobView> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs.get_mut(&id)?;

        if !entry.state.is_terminal() {
            entry.cancel.cancel();
            entry.finish(JobState::Cancelled);
            tracing::info!(job_id = %id, "Job cancelled");
        }

        Some(entry.view(id))
    }

    /// Drop finished jobs older than the retention window.
    pub async fn prune(&self) {
        let now = Utc::now();
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, entry| match entry.finished_at {
            Some(finished) => (now - finished)
                .to_std()
                .map(|age| age < self.retention)
                .unwrap_or(true),
            None => true,
        });

        let pruned = before - jobs.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned finished jobs");
        }
    }

    /// Prune on a fixed interval for the life of the process.
    pub fn start_pruning(&self, every: Duration) {
        let tracker = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                tracker.prune().await;
            }
        });
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    async fn wait_terminal(tracker: &JobTracker, id: Uuid) -> JobView {
        for _ in 0..100 {
            let view = tracker.get(id).await.unwrap();
            if view.state.is_terminal() {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {id} never finished");
    }

    #[tokio::test]
    async fn test_job_starts_in_progress_then_finishes() {
        let tracker = JobTracker::new();
        let (tx, rx) = oneshot::channel::<()>();

        let job = tracker
            .spawn(JobKind::Scrape, "⏳ Scraping website... Please wait.", async move {
                let _ = rx.await;
                Outcome::success("# Page")
            })
            .await;

        assert_eq!(
            job.state,
            JobState::InProgress {
                message: "⏳ Scraping website... Please wait.".into()
            }
        );

        tx.send(()).unwrap();
        let done = wait_terminal(&tracker, job.id).await;
        assert_eq!(
            done.state,
            JobState::Success {
                text: "# Page".into(),
                display: "# Page".into()
            }
        );
        assert!(done.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_failure_carries_display_string() {
        let tracker = JobTracker::new();
        let job = tracker
            .spawn(JobKind::Extract, "⏳", async { Outcome::failure("boom") })
            .await;

        let done = wait_terminal(&tracker, job.id).await;
        assert_eq!(
            done.state,
            JobState::Failure {
                message: "boom".into(),
                display: "❌ <span style='color:red;'>boom</span>".into()
            }
        );
    }

    #[tokio::test]
    async fn test_cancelled_job_never_delivers_result() {
        let tracker = JobTracker::new();
        let (tx, rx) = oneshot::channel::<()>();

        let job = tracker
            .spawn(JobKind::Extract, "⏳", async move {
                let _ = rx.await;
                Outcome::success("late answer")
            })
            .await;

        let cancelled = tracker.cancel(job.id).await.unwrap();
        assert_eq!(cancelled.state, JobState::Cancelled);

        // the receiver may already be gone with the abandoned task
        let _ = tx.send(());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(tracker.get(job.id).await.unwrap().state, JobState::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_after_finish_is_noop() {
        let tracker = JobTracker::new();
        let job = tracker
            .spawn(JobKind::Scrape, "⏳", async { Outcome::success("done") })
            .await;
        wait_terminal(&tracker, job.id).await;

        let view = tracker.cancel(job.id).await.unwrap();
        assert!(view.state.is_terminal());
        assert_ne!(view.state, JobState::Cancelled);
        assert!(tracker.cancel(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_prune_keeps_running_jobs() {
        let tracker = JobTracker::with_retention(Duration::ZERO);
        let (_tx, rx) = oneshot::channel::<()>();

        let running = tracker
            .spawn(JobKind::Scrape, "⏳", async move {
                let _ = rx.await;
                Outcome::success("x")
            })
            .await;
        let finished = tracker
            .spawn(JobKind::Scrape, "⏳", async { Outcome::success("y") })
            .await;
        wait_terminal(&tracker, finished.id).await;

        tracker.prune().await;
        assert!(tracker.get(running.id).await.is_some());
        assert!(tracker.get(finished.id).await.is_none());
    }

    #[test]
    fn test_view_serializes_flat() {
        let view = JobView {
            id: Uuid::nil(),
            kind: JobKind::Scrape,
            state: JobState::InProgress {
                message: "⏳ Scraping website... Please wait.".into(),
            },
            created_at: Utc::now(),
            finished_at: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["kind"], "scrape");
        assert_eq!(json["message"], "⏳ Scraping website... Please wait.");
        assert!(json.get("finished_at").is_none());
    }
}
