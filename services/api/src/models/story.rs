//! Stories: short-lived media with a viewer set

use chrono::{DateTime, Utc};
use common::expiry::story_expires_at;
use serde::Serialize;
use uuid::Uuid;

use super::{media::MediaKind, user::UserSummary};

/// Story row joined with its author
#[derive(Debug, Clone)]
pub struct StoryRecord {
    pub id: Uuid,
    pub author: UserSummary,
    pub media: String,
    pub media_type: MediaKind,
    pub viewers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStory {
    pub user_id: Uuid,
    pub media: String,
    pub media_type: MediaKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    pub id: Uuid,
    pub user: UserSummary,
    pub media: String,
    pub media_type: MediaKind,
    pub viewers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<StoryRecord> for StoryResponse {
    fn from(story: StoryRecord) -> Self {
        Self {
            id: story.id,
            user: story.author,
            media: story.media,
            media_type: story.media_type,
            viewers: story.viewers,
            expires_at: story_expires_at(story.created_at),
            created_at: story.created_at,
        }
    }
}

/// Add a viewer unless already present. Returns true when the set changed.
pub fn record_viewer(viewers: &mut Vec<Uuid>, viewer: Uuid) -> bool {
    if viewers.contains(&viewer) {
        return false;
    }
    viewers.push(viewer);
    true
}
