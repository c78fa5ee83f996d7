//! Direct message handlers

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{SendMessageRequest, chat::room_participants},
    state::AppState,
};

/// Conversations of the requester, most recently active first
pub async fn list_chats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let chats = state.chat_repository.rooms_for(user.id).await?;

    Ok(Json(json!({
        "status": "success",
        "data": { "chats": chats },
    })))
}

/// History with `user_id` in send order; empty before the first message
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = path?;
    room_participants(user.id, user_id).map_err(ApiError::BadRequest)?;

    let messages = match state.chat_repository.find_room(user.id, user_id).await? {
        Some(room_id) => state.chat_repository.messages(room_id).await?,
        None => Vec::new(),
    };

    Ok(Json(json!({
        "status": "success",
        "data": { "messages": messages },
    })))
}

/// Send a message to `user_id`
pub async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = path?;
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let room = room_participants(user.id, user_id).map_err(ApiError::BadRequest)?;
    let text = payload.validated_text().map_err(ApiError::BadRequest)?;

    if state.user_repository.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let message = state
        .chat_repository
        .send(room, user.id, user_id, &text)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "message": message },
        })),
    ))
}
