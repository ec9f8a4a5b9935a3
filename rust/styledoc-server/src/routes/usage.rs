use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub card_key: String,
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub usage_count: u32,
    pub usage_limit: u32,
    pub remaining: i64,
}

pub async fn get_usage(State(state): State<AppState>, Query(query): Query<UsageQuery>) -> Result<Json<UsageResponse>, ApiError> {
    let user_id = state.authenticate(&query.card_key)?;
    let usage = state.quota.usage(&user_id);
    Ok(Json(UsageResponse { usage_count: usage.usage_count, usage_limit: usage.usage_limit, remaining: usage.remaining() }))
}
