//! Repositories for database operations

pub mod chat;
pub mod post;
pub mod story;
pub mod user;

pub use chat::ChatRepository;
pub use post::PostRepository;
pub use story::StoryRepository;
pub use user::UserRepository;

/// `ILIKE` pattern matching `query` anywhere, with wildcards in the query
/// taken literally
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
