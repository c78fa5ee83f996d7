//! Profile, follow and profile picture handlers

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
    response::IntoResponse,
};
use axum_extra::extract::{Multipart, multipart::MultipartRejection};
use common::storage::MediaCategory;
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{ProfileResponse, UpdateProfileRequest, User, UserResponse},
    state::AppState,
    upload::{PROFILE_PICTURE, read_form, replace_stored_file},
};

async fn user_by_username(state: &AppState, username: &str) -> ApiResult<User> {
    state
        .user_repository
        .find_by_username(username)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Profile with stats and follower/following lists
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(viewer): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(username) = path?;
    let user = user_by_username(&state, &username).await?;

    let followers = state.user_repository.followers(user.id).await?;
    let following = state.user_repository.following(user.id).await?;
    let is_following = state
        .user_repository
        .is_following(viewer.id, user.id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "data": ProfileResponse::new(user, followers, following, is_following),
    })))
}

/// Update name, bio, location or website
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let update = payload.validated().map_err(ApiError::BadRequest)?;

    let updated = state
        .user_repository
        .update_profile(user.id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(json!({
        "status": "success",
        "data": UserResponse::from(updated),
    })))
}

/// Replace the profile picture. The previous file is removed only once
/// the new path is saved, and never when it is the default avatar.
pub async fn update_profile_picture(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let mut form = read_form(multipart, &PROFILE_PICTURE).await?;
    let upload = PROFILE_PICTURE.accept(&mut form)?;

    let current = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let keep_previous = state
        .media
        .is_default_profile_picture(&current.profile_picture);

    let users = state.user_repository.clone();
    let updated = replace_stored_file(
        &state.media,
        MediaCategory::Profiles,
        &upload,
        &current.profile_picture,
        keep_previous,
        |path| async move { users.update_profile_picture(user.id, &path).await },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!("User {} changed profile picture", user.id);

    Ok(Json(json!({
        "status": "success",
        "data": UserResponse::from(updated),
    })))
}

/// Follow `username`
pub async fn follow(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(username) = path?;
    let target = user_by_username(&state, &username).await?;
    if target.id == user.id {
        return Err(ApiError::bad_request("You cannot follow yourself"));
    }

    state.user_repository.follow(user.id, target.id).await?;
    follow_state(&state, &target, true).await
}

/// Stop following `username`
pub async fn unfollow(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(username) = path?;
    let target = user_by_username(&state, &username).await?;
    if target.id == user.id {
        return Err(ApiError::bad_request("You cannot unfollow yourself"));
    }

    state.user_repository.unfollow(user.id, target.id).await?;
    follow_state(&state, &target, false).await
}

async fn follow_state(
    state: &AppState,
    target: &User,
    following: bool,
) -> ApiResult<Json<serde_json::Value>> {
    let refreshed = state
        .user_repository
        .find_by_id(target.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "isFollowing": following,
            "followersCount": refreshed.followers_count,
        },
    })))
}
