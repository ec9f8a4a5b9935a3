use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use styledoc_specs::{ai_generate_spec, builtin_specs, export_spec_to_json, get_spec_schema, validate_custom_spec};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SpecListResponse {
    pub specs: Vec<String>,
}

pub async fn list_specs() -> Json<SpecListResponse> {
    Json(SpecListResponse { specs: builtin_specs().into_keys().collect() })
}

pub async fn get_schema() -> Json<serde_json::Value> {
    Json(get_spec_schema())
}

#[derive(Debug, Deserialize)]
pub struct ValidateSpecRequest {
    pub spec_json: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateSpecResponse {
    pub valid: bool,
    pub spec_name: String,
}

pub async fn validate_spec(Json(request): Json<ValidateSpecRequest>) -> Result<Json<ValidateSpecResponse>, ApiError> {
    let spec = validate_custom_spec(&request.spec_json).map_err(|error| ApiError::BadRequest(error.to_string()))?;
    Ok(Json(ValidateSpecResponse { valid: true, spec_name: spec.name }))
}

#[derive(Debug, Deserialize)]
pub struct GenerateSpecQuery {
    pub card_key: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSpecRequest {
    pub requirements: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateSpecResponse {
    pub success: bool,
    pub spec_json: String,
    pub spec_name: String,
}

pub async fn generate_spec(
    State(state): State<AppState>,
    Query(query): Query<GenerateSpecQuery>,
    Json(request): Json<GenerateSpecRequest>,
) -> Result<Json<GenerateSpecResponse>, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    let usage = state.quota.usage(&user_id);
    if !usage.has_quota() {
        return Err(ApiError::QuotaExceeded);
    }

    let ai_service = state.ai_service.as_ref().ok_or_else(|| ApiError::Internal("no AI service configured".to_string()))?;
    let spec = ai_generate_spec(&request.requirements, ai_service.as_ref())
        .await
        .map_err(|error| ApiError::Internal(format!("生成规范失败: {error}")))?;

    state.quota.increment(&user_id);

    let spec_json = export_spec_to_json(&spec).map_err(|error| ApiError::Internal(error.to_string()))?;
    Ok(Json(GenerateSpecResponse { success: true, spec_name: spec.name.clone(), spec_json }))
}
