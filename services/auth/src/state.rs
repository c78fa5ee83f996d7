//! Application state shared across handlers

use common::token::TokenService;
use sqlx::PgPool;

use crate::{rate_limiter::RateLimiter, repositories::UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub user_repository: UserRepository,
    pub rate_limiter: RateLimiter,
    /// Public path assigned as picture to every new account
    pub default_profile_picture: String,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        tokens: TokenService,
        rate_limiter: RateLimiter,
        default_profile_picture: String,
    ) -> Self {
        Self {
            user_repository: UserRepository::new(pool),
            tokens,
            rate_limiter,
            default_profile_picture,
        }
    }
}
