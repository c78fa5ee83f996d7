//! Post, reel, like and comment handlers

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::{Multipart, multipart::MultipartRejection};
use common::storage::MediaCategory;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        CommentRequest, NewPost, PostRecord, PostResponse,
        post::{feed_owners, normalize_caption, normalize_comment, normalize_location, toggle_like},
    },
    state::AppState,
    upload::{POST_MEDIA, read_form},
};

/// Attach comments to a batch of posts
pub(crate) async fn with_comments(
    state: &AppState,
    posts: Vec<PostRecord>,
) -> ApiResult<Vec<PostResponse>> {
    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let comments = state.post_repository.comments_for(&ids).await?;
    Ok(PostResponse::assemble(posts, comments))
}

async fn load_post(state: &AppState, id: Uuid) -> ApiResult<PostResponse> {
    let post = state
        .post_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let mut posts = with_comments(state, vec![post]).await?;
    posts.pop().ok_or(ApiError::InternalServerError)
}

/// Create a post (or a reel, when the media is a video)
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let mut form = read_form(multipart, &POST_MEDIA).await?;

    let upload = POST_MEDIA.accept(&mut form)?;
    let caption = normalize_caption(form.text("caption")).map_err(ApiError::BadRequest)?;
    let location = normalize_location(form.text("location")).map_err(ApiError::BadRequest)?;

    let media = state
        .media
        .save(MediaCategory::Posts, &upload.extension, &upload.bytes)
        .await?;
    debug!("{} stored {} upload at {}", user.username, upload.kind, media);

    let post = state
        .post_repository
        .create(&NewPost {
            user_id: user.id,
            media,
            media_type: upload.kind,
            caption,
            location,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "post": PostResponse::new(post, Vec::new()) },
        })),
    ))
}

/// Posts from the requester and everyone they follow, newest first
pub async fn get_feed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let following = state.user_repository.following_ids(user.id).await?;
    let owners = feed_owners(user.id, &following);

    let posts = state.post_repository.feed(&owners).await?;
    let posts = with_comments(&state, posts).await?;

    Ok(Json(json!({
        "status": "success",
        "data": { "posts": posts },
    })))
}

/// Video posts, newest first
pub async fn get_reels(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let reels = state.post_repository.reels().await?;
    let reels = with_comments(&state, reels).await?;

    Ok(Json(json!({
        "status": "success",
        "data": { "reels": reels },
    })))
}

/// Like the post, or unlike it if already liked
pub async fn like_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let mut post = state
        .post_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    toggle_like(&mut post.likes, user.id);

    if !state.post_repository.set_likes(id, &post.likes).await? {
        return Err(ApiError::not_found("Post not found"));
    }

    let mut posts = with_comments(&state, vec![post]).await?;
    let post = posts.pop().ok_or(ApiError::InternalServerError)?;

    Ok(Json(json!({
        "status": "success",
        "data": { "post": post },
    })))
}

/// Append a comment to the post
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let text = normalize_comment(&payload.text).map_err(ApiError::BadRequest)?;

    if state.post_repository.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Post not found"));
    }

    state.post_repository.add_comment(id, user.id, &text).await?;
    let post = load_post(&state, id).await?;

    Ok(Json(json!({
        "status": "success",
        "data": { "post": post },
    })))
}
