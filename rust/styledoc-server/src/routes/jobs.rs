use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use styledoc_jobs::{Job, JobEvent, JobStatus};

use crate::error::ApiError;
use crate::state::AppState;

const STREAM_POLL_INTERVAL: Duration = Duration::from_millis(500);
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Deserialize)]
pub struct CardKeyQuery {
    pub card_key: String,
}

fn authorize_job(state: &AppState, job_id: Uuid, user_id: &str) -> Result<Job, ApiError> {
    let job = state.jobs.get_job(job_id).ok_or_else(|| ApiError::NotFound("任务不存在".to_string()))?;
    if job.user_id.as_deref() != Some(user_id) {
        return Err(ApiError::Forbidden("无权访问此任务".to_string()));
    }
    Ok(job)
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    pub progress: Option<f64>,
    pub phase: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub output_filename: Option<String>,
}

fn status_name(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "pending",
        JobStatus::Running => "running",
        JobStatus::Completed => "completed",
        JobStatus::Failed => "failed",
        JobStatus::Cancelled => "cancelled",
    }
}

pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<CardKeyQuery>,
) -> Result<Json<JobStatusResponse>, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    let job = authorize_job(&state, job_id, &user_id)?;

    let progress = job.current_progress;
    Ok(Json(JobStatusResponse {
        job_id: job.job_id.to_string(),
        status: status_name(job.status).to_string(),
        progress: progress.as_ref().map(|p| p.progress),
        phase: progress.as_ref().map(|p| p.phase.clone()),
        message: progress.as_ref().map(|p| p.message.clone()),
        error: job.error,
        output_filename: job.output_filename,
    }))
}

fn job_event_to_sse(event: JobEvent) -> Event {
    let (name, data) = match &event {
        JobEvent::Progress(progress) => ("progress", serde_json::to_value(progress)),
        JobEvent::Completed { job_id, filename, warnings, report } => {
            ("completed", serde_json::to_value(serde_json::json!({"job_id": job_id, "filename": filename, "warnings": warnings, "report": report})))
        }
        JobEvent::Error { message } => ("error", serde_json::to_value(serde_json::json!({"message": message}))),
        JobEvent::Cancelled { message } => ("cancelled", serde_json::to_value(serde_json::json!({"message": message}))),
    };
    let data = data.unwrap_or(serde_json::Value::Null);
    Event::default().event(name).json_data(data).unwrap_or_else(|_| Event::default().event("error").data("serialization failed"))
}

pub async fn stream_job_progress(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<CardKeyQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    authorize_job(&state, job_id, &user_id)?;

    let stream = state.jobs.stream_progress(job_id, STREAM_POLL_INTERVAL).map(|event| Ok(job_event_to_sse(event)));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

pub async fn download_result(State(state): State<AppState>, Path(job_id): Path<Uuid>, Query(query): Query<CardKeyQuery>) -> Result<Response, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    let job = authorize_job(&state, job_id, &user_id)?;

    if job.status != JobStatus::Completed {
        return Err(ApiError::BadRequest("任务尚未完成".to_string()));
    }
    let bytes = job.output_bytes.ok_or_else(|| ApiError::Internal("输出文件不存在".to_string()))?;
    let filename = job.output_filename.unwrap_or_else(|| "formatted.docx".to_string());

    Ok((
        [(axum::http::header::CONTENT_TYPE, DOCX_MIME.to_string()), (axum::http::header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\""))],
        bytes,
    )
        .into_response())
}

pub async fn get_validation_report(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<CardKeyQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    let job = authorize_job(&state, job_id, &user_id)?;

    if job.status != JobStatus::Completed {
        return Err(ApiError::BadRequest("任务尚未完成".to_string()));
    }

    let Some(report) = job.result.and_then(|result| result.report) else {
        return Ok(Json(serde_json::json!({ "report": null })));
    };

    let violations: Vec<serde_json::Value> = report
        .violations
        .iter()
        .take(50)
        .map(|violation| {
            serde_json::json!({
                "id": violation.id,
                "severity": violation.severity,
                "message": violation.message,
                "location": violation.location,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "report": {
            "summary": {
                "ok": report.summary.ok,
                "errors": report.summary.errors,
                "warnings": report.summary.warnings,
                "infos": report.summary.infos,
            },
            "violations": violations,
        }
    })))
}

pub async fn delete_job(State(state): State<AppState>, Path(job_id): Path<Uuid>, Query(query): Query<CardKeyQuery>) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    authorize_job(&state, job_id, &user_id)?;
    state.jobs.delete_job(job_id);
    Ok(Json(serde_json::json!({ "message": "任务已删除" })))
}

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub card_key: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

pub async fn list_jobs(State(state): State<AppState>, Query(query): Query<ListJobsQuery>) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    let limit = query.limit.clamp(1, 100);
    let jobs = state.jobs.get_user_jobs(&user_id, limit);

    let jobs: Vec<serde_json::Value> = jobs
        .into_iter()
        .map(|job| {
            serde_json::json!({
                "job_id": job.job_id,
                "status": status_name(job.status),
                "input_file_name": job.input_file_name,
                "output_filename": job.output_filename,
                "created_at": job.created_at,
                "updated_at": job.updated_at,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({ "jobs": jobs })))
}
