//! Posts, reels, likes and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{media::MediaKind, user::UserSummary};

pub const MAX_CAPTION_CHARS: usize = 500;
pub const MAX_LOCATION_CHARS: usize = 100;

/// Post row joined with its author
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub id: Uuid,
    pub author: UserSummary,
    pub media: String,
    pub media_type: MediaKind,
    pub caption: String,
    pub location: String,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author. `id` increases with arrival order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    #[serde(skip)]
    pub post_id: Uuid,
    pub user: UserSummary,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub media: String,
    pub media_type: MediaKind,
    pub caption: String,
    pub location: String,
}

/// `POST /posts/:id/comments` body
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub user: UserSummary,
    pub media: String,
    pub media_type: MediaKind,
    pub caption: String,
    pub location: String,
    pub likes: Vec<Uuid>,
    pub likes_count: usize,
    pub comments: Vec<Comment>,
    pub comments_count: usize,
    pub created_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn new(post: PostRecord, comments: Vec<Comment>) -> Self {
        Self {
            id: post.id,
            user: post.author,
            media: post.media,
            media_type: post.media_type,
            caption: post.caption,
            location: post.location,
            likes_count: post.likes.len(),
            likes: post.likes,
            comments_count: comments.len(),
            comments,
            created_at: post.created_at,
        }
    }

    /// Attach comments to their posts, keeping the order of both inputs
    pub fn assemble(posts: Vec<PostRecord>, comments: Vec<Comment>) -> Vec<Self> {
        let mut by_post: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_post.entry(comment.post_id).or_default().push(comment);
        }

        posts
            .into_iter()
            .map(|post| {
                let comments = by_post.remove(&post.id).unwrap_or_default();
                Self::new(post, comments)
            })
            .collect()
    }
}

/// Add `user_id` to the like set if absent, remove it otherwise.
/// Returns true when the post is liked afterwards.
pub fn toggle_like(likes: &mut Vec<Uuid>, user_id: Uuid) -> bool {
    match likes.iter().position(|id| *id == user_id) {
        Some(index) => {
            likes.remove(index);
            false
        }
        None => {
            likes.push(user_id);
            true
        }
    }
}

/// Owners whose content appears in a feed: the requester plus everyone
/// they follow
pub fn feed_owners(requester: Uuid, following: &[Uuid]) -> Vec<Uuid> {
    let mut owners = Vec::with_capacity(following.len() + 1);
    owners.push(requester);
    for id in following {
        if !owners.contains(id) {
            owners.push(*id);
        }
    }
    owners
}

/// Trim an optional caption and enforce its length limit
pub fn normalize_caption(caption: Option<&str>) -> Result<String, String> {
    let caption = caption.unwrap_or_default().trim();
    if caption.chars().count() > MAX_CAPTION_CHARS {
        return Err(format!(
            "Caption cannot be more than {} characters",
            MAX_CAPTION_CHARS
        ));
    }
    Ok(caption.to_string())
}

/// Trim an optional location and enforce its length limit
pub fn normalize_location(location: Option<&str>) -> Result<String, String> {
    let location = location.unwrap_or_default().trim();
    if location.chars().count() > MAX_LOCATION_CHARS {
        return Err(format!(
            "Location cannot be more than {} characters",
            MAX_LOCATION_CHARS
        ));
    }
    Ok(location.to_string())
}

/// Comment text must be non-empty after trimming
pub fn normalize_comment(text: &str) -> Result<String, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Comment text is required".to_string());
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_trimmed_and_bounded() {
        assert_eq!(normalize_location(None).unwrap(), "");
        assert_eq!(normalize_location(Some("  Lagos ")).unwrap(), "Lagos");
        assert!(normalize_location(Some(&"é".repeat(MAX_LOCATION_CHARS))).is_ok());
        assert!(normalize_location(Some(&"x".repeat(MAX_LOCATION_CHARS + 1))).is_err());
    }

    fn author() -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            name: "Alice".to_string(),
            profile_picture: "/uploads/profiles/default-avatar.png".to_string(),
        }
    }

    fn post(id: Uuid) -> PostRecord {
        PostRecord {
            id,
            author: author(),
            media: "/uploads/posts/a.png".to_string(),
            media_type: MediaKind::Image,
            caption: "hi".to_string(),
            location: String::new(),
            likes: vec![],
            created_at: Utc::now(),
        }
    }

    fn comment(id: i64, post_id: Uuid, text: &str) -> Comment {
        Comment {
            id,
            post_id,
            user: author(),
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn toggling_twice_restores_like_set() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let original = vec![other];
        let mut likes = original.clone();

        assert!(toggle_like(&mut likes, me));
        assert_eq!(likes, vec![other, me]);
        assert!(!toggle_like(&mut likes, me));
        assert_eq!(likes, original);
    }

    #[test]
    fn like_never_duplicates() {
        let me = Uuid::new_v4();
        let mut likes = vec![];
        for _ in 0..5 {
            toggle_like(&mut likes, me);
        }
        assert_eq!(likes, vec![me]);
    }

    #[test]
    fn feed_owners_include_self_once() {
        let me = Uuid::new_v4();
        let a = Uuid::new_v4();
        let owners = feed_owners(me, &[a, me, a]);
        assert_eq!(owners, vec![me, a]);
        assert_eq!(feed_owners(me, &[]), vec![me]);
    }

    #[test]
    fn caption_is_trimmed_and_bounded() {
        assert_eq!(normalize_caption(Some("  hi  ")).unwrap(), "hi");
        assert_eq!(normalize_caption(None).unwrap(), "");
        assert!(normalize_caption(Some(&"x".repeat(500))).is_ok());
        assert!(normalize_caption(Some(&"x".repeat(501))).is_err());
    }

    #[test]
    fn blank_comment_is_rejected() {
        assert!(normalize_comment("   ").is_err());
        assert_eq!(normalize_comment(" nice ").unwrap(), "nice");
    }

    #[test]
    fn assemble_keeps_post_and_comment_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let comments = vec![
            comment(1, second, "a"),
            comment(2, first, "b"),
            comment(3, second, "c"),
        ];

        let posts = PostResponse::assemble(vec![post(first), post(second)], comments);
        assert_eq!(posts[0].id, first);
        assert_eq!(posts[0].comments_count, 1);
        let texts: Vec<_> = posts[1].comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[test]
    fn response_uses_camel_case() {
        let json = serde_json::to_value(PostResponse::new(post(Uuid::new_v4()), vec![])).unwrap();
        assert_eq!(json["mediaType"], "image");
        assert_eq!(json["likesCount"], 0);
        assert_eq!(json["user"]["username"], "alice");
    }
}
