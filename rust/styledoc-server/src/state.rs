use std::sync::Arc;

use styledoc_ai::AiService;
use styledoc_jobs::JobManager;

use crate::quota::QuotaGate;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobManager>,
    pub quota: Arc<dyn QuotaGate>,
    pub ai_service: Option<Arc<dyn AiService>>,
    pub max_upload_bytes: u64,
}

impl AppState {
    pub fn new(jobs: Arc<JobManager>, quota: Arc<dyn QuotaGate>, ai_service: Option<Arc<dyn AiService>>, max_upload_mb: u64) -> Self {
        Self { jobs, quota, ai_service, max_upload_bytes: max_upload_mb * 1024 * 1024 }
    }

    pub fn authenticate(&self, card_key: &str) -> Result<String, crate::error::ApiError> {
        self.quota.authenticate(card_key).ok_or(crate::error::ApiError::InvalidCardKey)
    }
}
