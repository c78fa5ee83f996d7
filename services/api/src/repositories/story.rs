//! Story queries. Reads never return stories past their expiry cutoff.

use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{MediaKind, NewStory, StoryRecord, UserSummary};

const STORY_SELECT: &str = r#"
    SELECT s.id, s.media, s.media_type, s.viewers, s.created_at,
           u.id AS author_id, u.username AS author_username, u.name AS author_name,
           u.profile_picture AS author_profile_picture
    FROM stories s
    JOIN users u ON u.id = s.user_id
"#;

fn story_from_row(row: &PgRow) -> StoryRecord {
    let media_type: String = row.get("media_type");
    StoryRecord {
        id: row.get("id"),
        author: UserSummary {
            id: row.get("author_id"),
            username: row.get("author_username"),
            name: row.get("author_name"),
            profile_picture: row.get("author_profile_picture"),
        },
        media: row.get("media"),
        media_type: MediaKind::from_db(&media_type),
        viewers: row.get("viewers"),
        created_at: row.get("created_at"),
    }
}

#[derive(Clone)]
pub struct StoryRepository {
    pool: PgPool,
}

impl StoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_story: &NewStory) -> DatabaseResult<StoryRecord> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO stories (id, user_id, media, media_type) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(new_story.user_id)
            .bind(&new_story.media)
            .bind(new_story.media_type.as_str())
            .execute(&self.pool)
            .await?;

        let row = sqlx::query(&format!("{STORY_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        info!("User {} created story {}", new_story.user_id, id);
        Ok(story_from_row(&row))
    }

    /// Unexpired stories of `owner_ids`, newest first
    pub async fn active_for_owners(
        &self,
        owner_ids: &[Uuid],
        cutoff: DateTime<Utc>,
    ) -> DatabaseResult<Vec<StoryRecord>> {
        let rows = sqlx::query(&format!(
            "{STORY_SELECT} WHERE s.user_id = ANY($1) AND s.created_at > $2
             ORDER BY s.created_at DESC, s.id"
        ))
        .bind(owner_ids)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(story_from_row).collect())
    }

    pub async fn find_active(
        &self,
        id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> DatabaseResult<Option<StoryRecord>> {
        let row = sqlx::query(&format!(
            "{STORY_SELECT} WHERE s.id = $1 AND s.created_at > $2"
        ))
        .bind(id)
        .bind(cutoff)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(story_from_row))
    }

    pub async fn set_viewers(&self, id: Uuid, viewers: &[Uuid]) -> DatabaseResult<()> {
        sqlx::query("UPDATE stories SET viewers = $2 WHERE id = $1")
            .bind(id)
            .bind(viewers)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
