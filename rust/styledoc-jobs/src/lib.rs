//! Async execution and SSE-style progress streaming layered on top of
//! `styledoc-compiler`. A `JobManager` tracks in-flight and historical
//! compilation jobs, bounds how many run concurrently, and exposes a
//! polling stream of progress events suitable for a server-sent-events
//! endpoint.

mod event;
mod job;
mod manager;

pub use event::{JobEvent, JobReportSummary};
pub use job::{Job, JobProgress, JobStatus};
pub use manager::{JobManager, JobStats};

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::StreamExt;

    use styledoc_compiler::CompileOptions;

    use super::*;

    fn sample_markdown() -> &'static str {
        "---\ntitle: 示例论文\nauthor: 张三\n---\n\
         # 摘要\n\n这是摘要正文。\n\n\
         # Abstract\n\nThis is the abstract.\n\n\
         # 引言\n\n正文内容。\n\n\
         # 致谢\n\n感谢。\n\n\
         # 参考文献\n\n[1] Author, Title.\n"
    }

    #[tokio::test]
    async fn run_job_completes_and_records_progress_history() {
        let manager = JobManager::new(2, 24);
        let job = manager.create_job(None, Some(sample_markdown().to_string()), None, Some(CompileOptions::default()));

        let finished = manager.run_job(job.job_id, None).await.unwrap();

        assert_eq!(finished.status, JobStatus::Completed);
        assert!(!finished.progress_history.is_empty());
        assert!(finished.output_bytes.is_some());
        assert!(finished.progress_history.iter().any(|p| p.phase == "done"));
    }

    #[tokio::test]
    async fn cancel_job_marks_pending_job_cancelled() {
        let manager = JobManager::new(2, 24);
        let job = manager.create_job(None, Some(sample_markdown().to_string()), None, None);

        assert!(manager.cancel_job(job.job_id));
        assert_eq!(manager.get_job(job.job_id).unwrap().status, JobStatus::Cancelled);
        assert!(!manager.cancel_job(job.job_id), "already-cancelled job cannot be cancelled again");
    }

    #[tokio::test]
    async fn stream_progress_ends_with_completed_event() {
        let manager = Arc::new(JobManager::new(2, 24));
        let job = manager.create_job(None, Some(sample_markdown().to_string()), None, Some(CompileOptions::default()));

        let job_id = job.job_id;
        let manager_clone = manager.clone();
        let run_handle = tokio::spawn(async move { manager_clone.run_job(job_id, None).await });

        let events: Vec<JobEvent> = manager.stream_progress(job_id, Duration::from_millis(10)).collect().await;
        run_handle.await.unwrap().unwrap();

        assert!(matches!(events.last(), Some(JobEvent::Completed { .. })), "{events:?}");
    }

    #[test]
    fn delete_job_removes_it_from_the_table() {
        let manager = JobManager::new(2, 24);
        let job = manager.create_job(None, None, None, None);
        assert!(manager.delete_job(job.job_id));
        assert!(manager.get_job(job.job_id).is_none());
    }

    #[test]
    fn get_stats_counts_by_status() {
        let manager = JobManager::new(2, 24);
        manager.create_job(None, None, None, None);
        let second = manager.create_job(None, None, None, None);
        manager.cancel_job(second.job_id);

        let stats = manager.get_stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.cancelled, 1);
    }
}
