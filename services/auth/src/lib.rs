//! Authentication service: registration, login and the current-user
//! endpoint. Issues the bearer tokens every other service validates.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;
