use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration as StdDuration;

use chrono::{Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use eyre::{eyre, Result};
use futures::stream::{self, Stream};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use uuid::Uuid;

use styledoc_ai::AiService;
use styledoc_compiler::{compile_document, compile_document_with_ai, CompileOptions, CompileProgress};

use crate::event::{JobEvent, JobReportSummary};
use crate::job::{Job, JobProgress, JobStatus};

struct StreamState {
    handle: Option<Arc<StdMutex<Job>>>,
    seen: usize,
    pending: VecDeque<JobProgress>,
    done: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JobStats {
    pub total: usize,
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

/// Manages async document-formatting jobs: bounded concurrency, per-job
/// progress history, SSE-style streaming, and TTL-based cleanup. Constructed
/// explicitly by whatever owns it (`styledoc-server`'s router state,
/// `styledoc-cli`'s `serve` command) rather than reached for as a global.
pub struct JobManager {
    jobs: DashMap<Uuid, Arc<StdMutex<Job>>>,
    semaphore: Arc<Semaphore>,
    retention: ChronoDuration,
    cleanup_handle: StdMutex<Option<JoinHandle<()>>>,
}

impl JobManager {
    pub fn new(max_concurrent_jobs: usize, job_retention_hours: i64) -> Self {
        Self {
            jobs: DashMap::new(),
            semaphore: Arc::new(Semaphore::new(max_concurrent_jobs)),
            retention: ChronoDuration::hours(job_retention_hours),
            cleanup_handle: StdMutex::new(None),
        }
    }

    pub fn create_job(
        &self,
        user_id: Option<String>,
        input_text: Option<String>,
        input_file_name: Option<String>,
        options: Option<CompileOptions>,
    ) -> Job {
        let job = Job::new(user_id, input_text, input_file_name, options);
        self.jobs.insert(job.job_id, Arc::new(StdMutex::new(job.clone())));
        job
    }

    pub fn get_job(&self, job_id: Uuid) -> Option<Job> {
        self.jobs.get(&job_id).map(|entry| entry.lock().expect("job lock poisoned").clone())
    }

    pub fn get_user_jobs(&self, user_id: &str, limit: usize) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .map(|entry| entry.value().lock().expect("job lock poisoned").clone())
            .filter(|job| job.user_id.as_deref() == Some(user_id))
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs.truncate(limit);
        jobs
    }

    /// Run a job to completion. Acquires a concurrency permit, then drives
    /// the compiler pipeline, recording progress into the job's history as
    /// it goes. The actual compile work runs on a blocking thread so the
    /// async runtime stays responsive while parsing/rendering/validating.
    pub async fn run_job(&self, job_id: Uuid, ai_service: Option<Arc<dyn AiService>>) -> Result<Job> {
        let handle = self.jobs.get(&job_id).map(|entry| entry.value().clone()).ok_or_else(|| eyre!("job not found: {job_id}"))?;

        let _permit = self.semaphore.acquire().await.map_err(|_| eyre!("job manager semaphore closed"))?;

        let (input_text, options) = {
            let mut job = handle.lock().expect("job lock poisoned");
            job.status = JobStatus::Running;
            job.updated_at = Utc::now();
            (job.input_text.clone().unwrap_or_default(), job.options.clone().unwrap_or_default())
        };

        let progress_handle = handle.clone();
        let on_progress = move |progress: CompileProgress| {
            let mut job = progress_handle.lock().expect("job lock poisoned");
            let recorded = JobProgress::from_compile_progress(&progress, Utc::now());
            job.current_progress = Some(recorded.clone());
            job.progress_history.push(recorded);
            job.updated_at = Utc::now();
        };

        let result = if let Some(ai_service) = ai_service {
            compile_document_with_ai(&input_text, ai_service.as_ref(), &options, Some(on_progress)).await
        } else {
            tokio::task::spawn_blocking(move || compile_document(&input_text, &options, Some(on_progress)))
                .await
                .map_err(|join_error| eyre!("compile task panicked: {join_error}"))?
        };

        {
            let mut job = handle.lock().expect("job lock poisoned");
            if result.success {
                job.status = JobStatus::Completed;
                job.output_bytes = result.docx_bytes.clone();
                job.output_filename = Some(job.output_filename_or_default());
            } else {
                job.status = JobStatus::Failed;
                job.error = result.error.clone();
            }
            job.result = Some(result);
            job.updated_at = Utc::now();
            Ok(job.clone())
        }
    }

    pub fn cancel_job(&self, job_id: Uuid) -> bool {
        let Some(entry) = self.jobs.get(&job_id) else { return false };
        let mut job = entry.lock().expect("job lock poisoned");
        if matches!(job.status, JobStatus::Pending | JobStatus::Running) {
            job.status = JobStatus::Cancelled;
            job.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    pub fn delete_job(&self, job_id: Uuid) -> bool {
        self.jobs.remove(&job_id).is_some()
    }

    /// Poll `job_id`'s progress history at `poll_interval` and yield SSE-
    /// shaped events until the job reaches a terminal status.
    pub fn stream_progress(&self, job_id: Uuid, poll_interval: StdDuration) -> impl Stream<Item = JobEvent> {
        let handle = self.jobs.get(&job_id).map(|entry| entry.value().clone());
        let state = StreamState { handle, seen: 0, pending: VecDeque::new(), done: false };

        stream::unfold(state, move |mut state| {
            let poll_interval = poll_interval;
            async move {
                if state.done {
                    return None;
                }
                if let Some(progress) = state.pending.pop_front() {
                    return Some((JobEvent::Progress(progress), state));
                }
                let Some(handle) = state.handle.clone() else {
                    state.done = true;
                    return Some((JobEvent::Error { message: "job not found".to_string() }, state));
                };

                loop {
                    let (new_progress, status, result, error) = {
                        let job = handle.lock().expect("job lock poisoned");
                        let new_progress: Vec<JobProgress> = job.progress_history[state.seen..].to_vec();
                        (new_progress, job.status, job.result.clone(), job.error.clone())
                    };

                    if !new_progress.is_empty() {
                        state.seen += new_progress.len();
                        state.pending.extend(new_progress);
                        let first = state.pending.pop_front().expect("checked non-empty above");
                        return Some((JobEvent::Progress(first), state));
                    }

                    match status {
                        JobStatus::Completed => {
                            let report = result.as_ref().and_then(|r| r.report.as_ref()).map(|report| JobReportSummary {
                                ok: report.summary.ok,
                                errors: report.summary.errors,
                                warnings: report.summary.warnings,
                            });
                            let filename = handle.lock().expect("job lock poisoned").output_filename.clone();
                            let warnings = result.map(|r| r.warnings).unwrap_or_default();
                            state.done = true;
                            return Some((JobEvent::Completed { job_id, filename, warnings, report }, state));
                        }
                        JobStatus::Failed => {
                            let message = error.unwrap_or_else(|| "unknown error".to_string());
                            state.done = true;
                            return Some((JobEvent::Error { message }, state));
                        }
                        JobStatus::Cancelled => {
                            state.done = true;
                            return Some((JobEvent::Cancelled { message: "job was cancelled".to_string() }, state));
                        }
                        JobStatus::Pending | JobStatus::Running => {
                            tokio::time::sleep(poll_interval).await;
                        }
                    }
                }
            }
        })
    }

    pub fn cleanup_old_jobs(&self) -> usize {
        let cutoff = Utc::now() - self.retention;
        let stale: Vec<Uuid> = self
            .jobs
            .iter()
            .filter(|entry| entry.value().lock().expect("job lock poisoned").updated_at < cutoff)
            .map(|entry| *entry.key())
            .collect();
        for job_id in &stale {
            self.jobs.remove(job_id);
        }
        stale.len()
    }

    pub fn start_cleanup_loop(self: &Arc<Self>, interval_hours: u64) {
        let manager = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(StdDuration::from_secs(interval_hours * 3600));
            loop {
                interval.tick().await;
                manager.cleanup_old_jobs();
            }
        });
        *self.cleanup_handle.lock().expect("cleanup handle lock poisoned") = Some(handle);
    }

    pub fn stop_cleanup_loop(&self) {
        if let Some(handle) = self.cleanup_handle.lock().expect("cleanup handle lock poisoned").take() {
            handle.abort();
        }
    }

    /// Cancel the cleanup loop and any in-flight jobs, then drop all job
    /// state. Intended to run from a server's shutdown hook.
    pub fn shutdown(&self) {
        self.stop_cleanup_loop();
        for entry in self.jobs.iter() {
            let mut job = entry.value().lock().expect("job lock poisoned");
            if job.status == JobStatus::Running {
                job.status = JobStatus::Cancelled;
                job.error = Some("service shutting down, job was cancelled".to_string());
            }
        }
        self.jobs.clear();
    }

    pub fn get_stats(&self) -> JobStats {
        let mut stats = JobStats::default();
        for entry in self.jobs.iter() {
            stats.total += 1;
            match entry.value().lock().expect("job lock poisoned").status {
                JobStatus::Pending => stats.pending += 1,
                JobStatus::Running => stats.running += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
                JobStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }
}
