//! SSE-shaped events emitted while a job runs. `styledoc-server` maps these
//! directly onto `text/event-stream` frames.

use serde::Serialize;
use uuid::Uuid;

use crate::job::JobProgress;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum JobEvent {
    Progress(JobProgress),
    Completed { job_id: Uuid, filename: Option<String>, warnings: Vec<String>, report: Option<JobReportSummary> },
    Error { message: String },
    Cancelled { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReportSummary {
    pub ok: bool,
    pub errors: usize,
    pub warnings: usize,
}
