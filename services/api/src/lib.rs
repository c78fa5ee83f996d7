//! Social API service: posts, reels, stories, profiles, search and
//! direct messages behind bearer-token authentication.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod upload;

pub use state::AppState;
