//! API service routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use common::settings::CorsConfig;
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
};

use crate::{middleware::auth_middleware, state::AppState, upload::MAX_REQUEST_BYTES};

pub mod chats;
pub mod posts;
pub mod profile;
pub mod search;
pub mod stories;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/posts", post(posts::create_post))
        .route("/api/posts/feed", get(posts::get_feed))
        .route("/api/posts/reels", get(posts::get_reels))
        .route("/api/posts/:id/like", patch(posts::like_post))
        .route("/api/posts/:id/comments", post(posts::add_comment))
        .route(
            "/api/stories",
            get(stories::get_stories).post(stories::create_story),
        )
        .route("/api/stories/:id/view", patch(stories::view_story))
        .route("/api/profile/update", put(profile::update_profile))
        .route(
            "/api/profile/update-profile-picture",
            put(profile::update_profile_picture),
        )
        .route("/api/profile/:username", get(profile::get_profile))
        .route(
            "/api/profile/:username/follow",
            post(profile::follow).delete(profile::unfollow),
        )
        .route("/api/search", get(search::search))
        .route("/api/search/recent", get(search::recent_searches))
        .route(
            "/api/search/recent/:user_id",
            post(search::add_recent_search).delete(search::remove_recent_search),
        )
        .route("/api/chats", get(chats::list_chats))
        .route(
            "/api/chats/:user_id/messages",
            get(chats::get_messages).post(chats::send_message),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES));

    let public_prefix = state.media.public_prefix().to_string();
    let media_root = state.media.root().to_path_buf();

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .nest_service(&public_prefix, ServeDir::new(media_root))
        .with_state(state)
}

/// CORS policy for the browser clients
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = config
        .origins()
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}
