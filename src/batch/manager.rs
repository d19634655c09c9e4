//! Bounded-concurrency scheduling of many exports of one document.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt as _;
use futures::stream;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::document::model::Document;
use crate::encode::encoder::{AbortHandle, Encoder};
use crate::encode::registry::EncoderRegistry;
use crate::encode::settings::{ExportProgress, ExportResult, ExportSettings};
use crate::foundation::error::{ReelError, ReelResult};

/// Lifecycle of a batch job. `Completed`, `Failed` and `Cancelled` are terminal and sticky.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting for a concurrency slot.
    Pending,
    /// Encoder running.
    Running,
    /// Output produced.
    Completed,
    /// Encoder failed; see [`BatchExportJob::error`].
    Failed,
    /// Cancelled before or while running.
    Cancelled,
}

impl JobStatus {
    /// Whether the job will never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// One export inside a batch.
#[derive(Clone, Debug)]
pub struct BatchExportJob {
    /// Unique job id.
    pub id: Uuid,
    /// Requested export.
    pub settings: ExportSettings,
    /// Current status.
    pub status: JobStatus,
    /// Last progress reported by the encoder.
    pub progress: Option<ExportProgress>,
    /// Output, once completed.
    pub result: Option<Arc<ExportResult>>,
    /// Failure message, once failed.
    pub error: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Time the job reached a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
}

impl BatchExportJob {
    fn new(settings: ExportSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            settings,
            status: JobStatus::Pending,
            progress: None,
            result: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn settle(&mut self, status: JobStatus) {
        self.status = status;
        self.completed_at = Some(Utc::now());
    }
}

/// Callbacks and limits for one [`BatchExportManager::run`].
pub struct BatchOptions {
    /// Jobs allowed to run at once (values below 1 are treated as 1).
    pub concurrency_limit: usize,
    /// Fired once per job when it reaches a terminal status.
    pub on_job_complete: Option<Box<dyn Fn(&BatchExportJob)>>,
    /// Fired with `(settled, total)` after each job settles.
    pub on_progress: Option<Box<dyn Fn(usize, usize)>>,
    /// Fired once with every job after the last one settles.
    pub on_all_complete: Option<Box<dyn Fn(&[BatchExportJob])>>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency_limit: 2,
            on_job_complete: None,
            on_progress: None,
            on_all_complete: None,
        }
    }
}

impl std::fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOptions")
            .field("concurrency_limit", &self.concurrency_limit)
            .finish_non_exhaustive()
    }
}

impl BatchOptions {
    /// Options with `concurrency_limit` and no callbacks.
    pub fn with_concurrency(concurrency_limit: usize) -> Self {
        Self {
            concurrency_limit,
            ..Self::default()
        }
    }

    /// Set the per-job completion callback.
    pub fn on_job_complete(mut self, f: impl Fn(&BatchExportJob) + 'static) -> Self {
        self.on_job_complete = Some(Box::new(f));
        self
    }

    /// Set the settled-count callback.
    pub fn on_progress(mut self, f: impl Fn(usize, usize) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Set the batch completion callback.
    pub fn on_all_complete(mut self, f: impl Fn(&[BatchExportJob]) + 'static) -> Self {
        self.on_all_complete = Some(Box::new(f));
        self
    }
}

#[derive(Debug, Default)]
struct BatchState {
    jobs: Vec<BatchExportJob>,
    active: HashMap<Uuid, AbortHandle>,
}

impl BatchState {
    fn cancel(&mut self, index: usize) -> bool {
        let Some(job) = self.jobs.get_mut(index) else {
            return false;
        };
        if job.status.is_terminal() {
            return false;
        }
        if let Some(handle) = self.active.get(&job.id) {
            handle.abort();
        }
        job.settle(JobStatus::Cancelled);
        true
    }
}

/// Cloneable handle for cancelling jobs while [`BatchExportManager::run`] is awaited.
#[derive(Clone, Debug)]
pub struct BatchAbortHandle {
    state: Arc<Mutex<BatchState>>,
}

impl BatchAbortHandle {
    /// Abort every running encoder and cancel every job that has not finished.
    ///
    /// Returns the number of jobs cancelled.
    pub fn abort_all(&self) -> usize {
        let mut state = self.state.lock();
        let cancelled = (0..state.jobs.len()).filter(|&i| state.cancel(i)).count();
        tracing::info!(cancelled, "batch abort requested");
        cancelled
    }

    /// Cancel one job. Returns `false` when the id is unknown or the job already finished.
    pub fn cancel_job(&self, id: Uuid) -> bool {
        let mut state = self.state.lock();
        match state.jobs.iter().position(|j| j.id == id) {
            Some(i) => state.cancel(i),
            None => false,
        }
    }

    /// Snapshot of every job of the current batch.
    pub fn jobs(&self) -> Vec<BatchExportJob> {
        self.state.lock().jobs.clone()
    }
}

/// Runs many exports of one document with bounded concurrency.
///
/// Scheduling is cooperative: jobs interleave at encoder frame boundaries on the calling task.
/// One job's failure never affects its siblings.
pub struct BatchExportManager {
    document: Arc<Document>,
    registry: EncoderRegistry,
    state: Arc<Mutex<BatchState>>,
}

impl std::fmt::Debug for BatchExportManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchExportManager")
            .field("registry", &self.registry)
            .field("jobs", &self.state.lock().jobs.len())
            .finish_non_exhaustive()
    }
}

impl BatchExportManager {
    /// Manager exporting `document` with encoders from `registry`.
    pub fn new(document: Arc<Document>, registry: EncoderRegistry) -> Self {
        Self {
            document,
            registry,
            state: Arc::new(Mutex::new(BatchState::default())),
        }
    }

    /// Handle usable while [`Self::run`] is in flight.
    pub fn abort_handle(&self) -> BatchAbortHandle {
        BatchAbortHandle {
            state: self.state.clone(),
        }
    }

    /// See [`BatchAbortHandle::abort_all`].
    pub fn abort_all(&self) -> usize {
        self.abort_handle().abort_all()
    }

    /// See [`BatchAbortHandle::cancel_job`].
    pub fn cancel_job(&self, id: Uuid) -> bool {
        self.abort_handle().cancel_job(id)
    }

    /// Snapshot of every job of the current (or last) batch.
    pub fn jobs(&self) -> Vec<BatchExportJob> {
        self.abort_handle().jobs()
    }

    /// Run one job per settings entry and return every job once all are terminal.
    ///
    /// A format without a registered encoder fails only its own job, before any frame work.
    #[tracing::instrument(level = "info", skip_all, fields(jobs = settings.len(), limit = options.concurrency_limit))]
    pub async fn run(
        &mut self,
        settings: Vec<ExportSettings>,
        options: BatchOptions,
    ) -> ReelResult<Vec<BatchExportJob>> {
        let total = settings.len();
        {
            let mut state = self.state.lock();
            state.active.clear();
            state.jobs = settings.into_iter().map(BatchExportJob::new).collect();
        }

        let this: &Self = self;
        let settled = Cell::new(0usize);
        let limit = options.concurrency_limit.max(1);
        stream::iter(0..total)
            .map(|index| {
                let settled = &settled;
                let options = &options;
                async move {
                    let job = this.run_job(index).await;
                    if let Some(cb) = &options.on_job_complete {
                        cb(&job);
                    }
                    settled.set(settled.get() + 1);
                    if let Some(cb) = &options.on_progress {
                        cb(settled.get(), total);
                    }
                }
            })
            .buffer_unordered(limit)
            .collect::<Vec<()>>()
            .await;

        let jobs = self.jobs();
        let count = |s: JobStatus| jobs.iter().filter(|j| j.status == s).count();
        tracing::info!(
            completed = count(JobStatus::Completed),
            failed = count(JobStatus::Failed),
            cancelled = count(JobStatus::Cancelled),
            "batch finished"
        );
        if let Some(cb) = &options.on_all_complete {
            cb(&jobs);
        }
        Ok(jobs)
    }

    /// Drive job `index` to a terminal status and return its final snapshot.
    async fn run_job(&self, index: usize) -> BatchExportJob {
        let started = {
            let mut state = self.state.lock();
            let job = &mut state.jobs[index];
            if job.status == JobStatus::Pending {
                job.status = JobStatus::Running;
                Some((job.id, job.settings.clone()))
            } else {
                None
            }
        };
        let Some((id, settings)) = started else {
            return self.state.lock().jobs[index].clone();
        };

        let outcome = match self.registry.create(settings.format, self.document.clone()) {
            Ok(encoder) => self.encode_tracked(index, id, encoder, &settings).await,
            Err(e) => Err(e),
        };

        let mut state = self.state.lock();
        state.active.remove(&id);
        let job = &mut state.jobs[index];
        if !job.status.is_terminal() {
            match outcome {
                Ok(result) => {
                    job.result = Some(Arc::new(result));
                    job.settle(JobStatus::Completed);
                }
                Err(e) if e.is_aborted() => job.settle(JobStatus::Cancelled),
                Err(e) => {
                    tracing::warn!(job = %id, format = %settings.format, error = %e, "export job failed");
                    job.error = Some(e.to_string());
                    job.settle(JobStatus::Failed);
                }
            }
        }
        job.clone()
    }

    async fn encode_tracked(
        &self,
        index: usize,
        id: Uuid,
        mut encoder: Box<dyn Encoder>,
        settings: &ExportSettings,
    ) -> ReelResult<ExportResult> {
        {
            let mut state = self.state.lock();
            // Cancelled between slot assignment and encoder creation.
            if state.jobs[index].status != JobStatus::Running {
                return Err(ReelError::Aborted);
            }
            state.active.insert(id, encoder.abort_handle());
        }
        let state = self.state.clone();
        encoder.set_progress_callback(Box::new(move |p: &ExportProgress| {
            if let Some(job) = state.lock().jobs.get_mut(index) {
                job.progress = Some(*p);
            }
        }));
        encoder.encode(settings).await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/manager.rs"]
mod tests;
