use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use sqlx::PgPool;

use crate::models::ExpiredStory;

#[derive(Clone)]
pub struct StoryRepository {
    pool: PgPool,
}

impl StoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete every story created at or before `cutoff` and return what was
    /// removed, so the caller can drop the files afterwards
    pub async fn delete_expired(&self, cutoff: DateTime<Utc>) -> DatabaseResult<Vec<ExpiredStory>> {
        let rows = sqlx::query_as::<_, ExpiredStory>(
            "DELETE FROM stories WHERE created_at <= $1 RETURNING id, media",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
