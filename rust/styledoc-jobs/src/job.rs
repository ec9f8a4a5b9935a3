//! The job record and its lifecycle states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use styledoc_compiler::{CompileOptions, CompileProgress, CompileResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProgress {
    pub phase: String,
    pub progress: f64,
    pub message: String,
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl JobProgress {
    pub fn from_compile_progress(progress: &CompileProgress, timestamp: DateTime<Utc>) -> Self {
        Self {
            phase: format!("{:?}", progress.phase).to_lowercase(),
            progress: progress.progress,
            message: progress.message.clone(),
            detail: progress.detail.clone(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub job_id: Uuid,
    pub user_id: Option<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub input_text: Option<String>,
    pub input_file_name: Option<String>,
    pub options: Option<CompileOptions>,
    pub result: Option<CompileResult>,
    pub progress_history: Vec<JobProgress>,
    pub current_progress: Option<JobProgress>,
    pub error: Option<String>,
    pub output_bytes: Option<Vec<u8>>,
    pub output_filename: Option<String>,
}

impl Job {
    pub fn new(user_id: Option<String>, input_text: Option<String>, input_file_name: Option<String>, options: Option<CompileOptions>) -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::new_v4(),
            user_id,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
            input_text,
            input_file_name,
            options,
            result: None,
            progress_history: Vec::new(),
            current_progress: None,
            error: None,
            output_bytes: None,
            output_filename: None,
        }
    }

    pub fn output_filename_or_default(&self) -> String {
        if let Some(name) = &self.input_file_name {
            let base = name.rsplit_once('.').map(|(base, _)| base).unwrap_or(name);
            format!("{base}_formatted.docx")
        } else {
            format!("formatted_{}.docx", &self.job_id.simple().to_string()[..8])
        }
    }
}
