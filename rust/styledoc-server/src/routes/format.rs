use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use styledoc_compiler::{CompileOptions, InputFormatOption};
use styledoc_ooxml::{extract_plain_text, DocxPackage};
use styledoc_specs::validate_custom_spec;

use crate::error::ApiError;
use crate::state::AppState;

fn parse_input_format(value: &str) -> InputFormatOption {
    match value {
        "markdown" => InputFormatOption::Markdown,
        "plaintext" | "plain_text" | "text" => InputFormatOption::PlainText,
        _ => InputFormatOption::Auto,
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

fn spawn_job(state: AppState, user_id: String, job_id: uuid::Uuid, use_ai_recognition: bool) {
    tokio::spawn(async move {
        let ai_service = if use_ai_recognition { state.ai_service.clone() } else { None };
        if let Err(error) = state.jobs.run_job(job_id, ai_service).await {
            tracing::error!(%job_id, %error, "job failed to run");
            return;
        }
        state.quota.increment(&user_id);
    });
}

#[derive(Debug, Deserialize)]
pub struct FormatTextQuery {
    pub card_key: String,
}

#[derive(Debug, Deserialize)]
pub struct FormatTextRequest {
    pub text: Option<String>,
    #[serde(default = "default_input_format")]
    pub input_format: String,
    pub spec_name: Option<String>,
    pub custom_spec_json: Option<String>,
    #[serde(default = "default_true")]
    pub include_cover: bool,
    #[serde(default = "default_true")]
    pub include_toc: bool,
    #[serde(default = "default_toc_title")]
    pub toc_title: String,
    #[serde(default)]
    pub use_ai_recognition: bool,
}

fn default_input_format() -> String {
    "auto".to_string()
}

fn default_true() -> bool {
    true
}

fn default_toc_title() -> String {
    "目 录".to_string()
}

pub async fn format_text(
    State(state): State<AppState>,
    Query(query): Query<FormatTextQuery>,
    Json(request): Json<FormatTextRequest>,
) -> Result<Json<JobResponse>, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    let usage = state.quota.usage(&user_id);
    if !usage.has_quota() {
        return Err(ApiError::QuotaExceeded);
    }

    let text = request.text.filter(|text| !text.is_empty()).ok_or_else(|| ApiError::BadRequest("文本内容不能为空".to_string()))?;

    let custom_spec = match &request.custom_spec_json {
        Some(json) => Some(validate_custom_spec(json).map_err(|error| ApiError::BadRequest(format!("自定义规范无效: {error}")))?),
        None => None,
    };

    let options = CompileOptions {
        input_format: parse_input_format(&request.input_format),
        spec_name: request.spec_name,
        custom_spec,
        include_cover: request.include_cover,
        include_toc: request.include_toc,
        toc_title: request.toc_title,
        ..CompileOptions::default()
    };

    let job = state.jobs.create_job(Some(user_id.clone()), Some(text), None, Some(options));
    spawn_job(state, user_id, job.job_id, request.use_ai_recognition);

    Ok(Json(JobResponse { job_id: job.job_id.to_string(), status: "pending".to_string(), message: "任务已创建，正在处理中".to_string() }))
}

#[derive(Debug, Deserialize)]
pub struct FormatFileQuery {
    pub card_key: String,
    #[serde(default = "default_input_format")]
    pub input_format: String,
    pub spec_name: Option<String>,
    #[serde(default = "default_true")]
    pub include_cover: bool,
    #[serde(default = "default_true")]
    pub include_toc: bool,
    #[serde(default = "default_toc_title")]
    pub toc_title: String,
    #[serde(default)]
    pub use_ai_recognition: bool,
}

const SUPPORTED_EXTENSIONS: &[&str] = &["docx", "txt", "md", "markdown"];

fn decode_text_bytes(bytes: &[u8]) -> Result<String, ApiError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }
    let (text, _encoding, had_errors) = encoding_rs::GBK.decode(bytes);
    if had_errors {
        return Err(ApiError::BadRequest("无法解析文件编码".to_string()));
    }
    Ok(text.into_owned())
}

pub async fn format_file(
    State(state): State<AppState>,
    Query(query): Query<FormatFileQuery>,
    mut multipart: Multipart,
) -> Result<Json<JobResponse>, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    let usage = state.quota.usage(&user_id);
    if !usage.has_quota() {
        return Err(ApiError::QuotaExceeded);
    }

    let field = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::BadRequest(error.to_string()))?
        .ok_or_else(|| ApiError::BadRequest("文件名不能为空".to_string()))?;
    let file_name = field.file_name().ok_or_else(|| ApiError::BadRequest("文件名不能为空".to_string()))?.to_string();

    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()).unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ApiError::BadRequest("仅支持 .docx, .txt, .md 文件".to_string()));
    }

    let content = field.bytes().await.map_err(|error| ApiError::BadRequest(error.to_string()))?;

    if state.max_upload_bytes > 0 && content.len() as u64 > state.max_upload_bytes {
        let size_mb = content.len() as f64 / (1024.0 * 1024.0);
        let limit_mb = state.max_upload_bytes as f64 / (1024.0 * 1024.0);
        return Err(ApiError::BadRequest(format!("文件大小 ({size_mb:.1} MB) 超过限制 ({limit_mb:.0} MB)")));
    }

    let (text, detected_format) = if extension == "docx" {
        let package = DocxPackage::from_bytes(&content).map_err(|error| ApiError::BadRequest(format!("无法解析 docx 文件: {error}")))?;
        let text = extract_plain_text(&package).map_err(|error| ApiError::BadRequest(format!("无法解析 docx 文件: {error}")))?;
        (text, InputFormatOption::PlainText)
    } else {
        let text = decode_text_bytes(&content)?;
        let detected = if extension == "md" || extension == "markdown" { InputFormatOption::Markdown } else { InputFormatOption::Auto };
        (text, detected)
    };

    if text.trim().is_empty() {
        return Err(ApiError::BadRequest("文件内容为空".to_string()));
    }

    let requested_format = parse_input_format(&query.input_format);
    let input_format = if matches!(requested_format, InputFormatOption::Auto) { detected_format } else { requested_format };

    let options = CompileOptions {
        input_format,
        spec_name: query.spec_name,
        include_cover: query.include_cover,
        include_toc: query.include_toc,
        toc_title: query.toc_title,
        ..CompileOptions::default()
    };

    let job = state.jobs.create_job(Some(user_id.clone()), Some(text), Some(file_name), Some(options));
    spawn_job(state, user_id, job.job_id, query.use_ai_recognition);

    Ok(Json(JobResponse { job_id: job.job_id.to_string(), status: "pending".to_string(), message: "文件已上传，正在处理中".to_string() }))
}
