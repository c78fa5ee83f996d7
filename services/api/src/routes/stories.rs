//! Story handlers

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::{Multipart, multipart::MultipartRejection};
use chrono::Utc;
use common::{expiry::story_cutoff, storage::MediaCategory};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        NewStory, StoryResponse,
        post::feed_owners,
        story::record_viewer,
    },
    state::AppState,
    upload::{STORY_MEDIA, read_form},
};

/// Upload a story; its kind follows the file's MIME type
pub async fn create_story(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let mut form = read_form(multipart, &STORY_MEDIA).await?;
    let upload = STORY_MEDIA.accept(&mut form)?;

    let media = state
        .media
        .save(MediaCategory::Stories, &upload.extension, &upload.bytes)
        .await?;
    debug!("{} stored {} upload at {}", user.username, upload.kind, media);

    let story = state
        .story_repository
        .create(&NewStory {
            user_id: user.id,
            media,
            media_type: upload.kind,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "story": StoryResponse::from(story) },
        })),
    ))
}

/// Unexpired stories from the requester and everyone they follow
pub async fn get_stories(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let following = state.user_repository.following_ids(user.id).await?;
    let owners = feed_owners(user.id, &following);

    let stories: Vec<StoryResponse> = state
        .story_repository
        .active_for_owners(&owners, story_cutoff(Utc::now()))
        .await?
        .into_iter()
        .map(StoryResponse::from)
        .collect();

    Ok(Json(json!({
        "status": "success",
        "data": { "stories": stories },
    })))
}

/// Record that the requester saw the story
pub async fn view_story(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let mut story = state
        .story_repository
        .find_active(id, story_cutoff(Utc::now()))
        .await?
        .ok_or_else(|| ApiError::not_found("Story not found"))?;

    if record_viewer(&mut story.viewers, user.id) {
        state.story_repository.set_viewers(id, &story.viewers).await?;
    }

    Ok(Json(json!({
        "status": "success",
        "data": { "story": StoryResponse::from(story) },
    })))
}
