//! Application state shared across handlers

use common::{storage::MediaStore, token::TokenService};
use sqlx::PgPool;

use crate::repositories::{ChatRepository, PostRepository, StoryRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub media: MediaStore,
    pub user_repository: UserRepository,
    pub post_repository: PostRepository,
    pub story_repository: StoryRepository,
    pub chat_repository: ChatRepository,
}

impl AppState {
    pub fn new(pool: PgPool, tokens: TokenService, media: MediaStore) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            post_repository: PostRepository::new(pool.clone()),
            story_repository: StoryRepository::new(pool.clone()),
            chat_repository: ChatRepository::new(pool),
            tokens,
            media,
        }
    }
}
