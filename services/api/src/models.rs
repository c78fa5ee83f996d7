//! API models for request and response payloads

pub mod chat;
pub mod media;
pub mod post;
pub mod story;
pub mod user;

pub use chat::{ChatSummary, Message, SendMessageRequest};
pub use media::MediaKind;
pub use post::{Comment, CommentRequest, NewPost, PostRecord, PostResponse};
pub use story::{NewStory, StoryRecord, StoryResponse};
pub use user::{ProfileResponse, UpdateProfileRequest, User, UserResponse, UserSummary};
