//! Middleware for bearer token validation

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use common::token::bearer_token;
use tracing::debug;
use uuid::Uuid;

use crate::{error::AuthError, state::AppState};

/// Identity carried by a valid token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

/// Reject the request unless it carries a valid bearer token, then expose
/// the caller as an [`AuthUser`] extension
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AuthError::Unauthorized)?;

    let claims = state.tokens.validate(token).map_err(|e| {
        debug!("Rejected token: {}", e);
        AuthError::Unauthorized
    })?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(req).await)
}
