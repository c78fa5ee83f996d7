//! Search and recent-search handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::{PathRejection, QueryRejection}},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::user::push_recent_search,
    repositories::contains_pattern,
    routes::posts::with_comments,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Users by username, name or bio and posts by caption
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let query = params.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::bad_request("Search query is required"));
    }

    let pattern = contains_pattern(query);
    let users = state.user_repository.search(&pattern).await?;
    let posts = state.post_repository.search(&pattern).await?;
    let posts = with_comments(&state, posts).await?;

    Ok(Json(json!({
        "status": "success",
        "data": { "users": users, "posts": posts },
    })))
}

/// The requester's recent searches, most recent first
pub async fn recent_searches(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let me = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let newest_first: Vec<Uuid> = me.recent_searches.iter().rev().copied().collect();
    let recent = state.user_repository.summaries(&newest_first).await?;

    Ok(Json(json!({
        "status": "success",
        "data": { "recentSearches": recent },
    })))
}

pub async fn add_recent_search(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = path?;
    if state.user_repository.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let me = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let recent = push_recent_search(&me.recent_searches, user_id);
    state
        .user_repository
        .set_recent_searches(user.id, &recent)
        .await?;

    Ok(Json(json!({ "status": "success" })))
}

pub async fn remove_recent_search(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = path?;
    let me = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let recent: Vec<Uuid> = me
        .recent_searches
        .into_iter()
        .filter(|id| *id != user_id)
        .collect();
    state
        .user_repository
        .set_recent_searches(user.id, &recent)
        .await?;

    Ok(Json(json!({ "status": "success" })))
}
