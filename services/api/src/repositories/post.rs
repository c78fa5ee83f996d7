//! Post, like and comment queries

use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Comment, MediaKind, NewPost, PostRecord, UserSummary};

const POST_SELECT: &str = r#"
    SELECT p.id, p.media, p.media_type, p.caption, p.location, p.likes, p.created_at,
           u.id AS author_id, u.username AS author_username, u.name AS author_name,
           u.profile_picture AS author_profile_picture
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

fn author_from_row(row: &PgRow) -> UserSummary {
    UserSummary {
        id: row.get("author_id"),
        username: row.get("author_username"),
        name: row.get("author_name"),
        profile_picture: row.get("author_profile_picture"),
    }
}

fn post_from_row(row: &PgRow) -> PostRecord {
    let media_type: String = row.get("media_type");
    PostRecord {
        id: row.get("id"),
        author: author_from_row(row),
        media: row.get("media"),
        media_type: MediaKind::from_db(&media_type),
        caption: row.get("caption"),
        location: row.get("location"),
        likes: row.get("likes"),
        created_at: row.get("created_at"),
    }
}

fn comment_from_row(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        post_id: row.get("post_id"),
        user: author_from_row(row),
        text: row.get("text"),
        created_at: row.get("created_at"),
    }
}

/// Post repository for database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a post and refresh the owner's post counter
    pub async fn create(&self, new_post: &NewPost) -> DatabaseResult<PostRecord> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, media, media_type, caption, location)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(new_post.user_id)
        .bind(&new_post.media)
        .bind(new_post.media_type.as_str())
        .bind(&new_post.caption)
        .bind(&new_post.location)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE users SET posts_count = (SELECT COUNT(*) FROM posts WHERE user_id = $1)
             WHERE id = $1",
        )
        .bind(new_post.user_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(&format!("{POST_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("User {} created {} post {}", new_post.user_id, new_post.media_type, id);
        Ok(post_from_row(&row))
    }

    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<PostRecord>> {
        let row = sqlx::query(&format!("{POST_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(post_from_row))
    }

    /// Posts owned by any of `owner_ids`, newest first
    pub async fn feed(&self, owner_ids: &[Uuid]) -> DatabaseResult<Vec<PostRecord>> {
        let rows = sqlx::query(&format!(
            "{POST_SELECT} WHERE p.user_id = ANY($1) ORDER BY p.created_at DESC, p.id"
        ))
        .bind(owner_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Video posts from everyone, newest first
    pub async fn reels(&self) -> DatabaseResult<Vec<PostRecord>> {
        let rows = sqlx::query(&format!(
            "{POST_SELECT} WHERE p.media_type = $1 ORDER BY p.created_at DESC, p.id"
        ))
        .bind(MediaKind::Video.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Case-insensitive match on the caption, newest first
    pub async fn search(&self, pattern: &str) -> DatabaseResult<Vec<PostRecord>> {
        let rows = sqlx::query(&format!(
            "{POST_SELECT} WHERE p.caption ILIKE $1 ORDER BY p.created_at DESC, p.id LIMIT 50"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Overwrite the like set. Callers read, modify and write back without
    /// locking, so concurrent toggles on one post are last-write-wins.
    pub async fn set_likes(&self, id: Uuid, likes: &[Uuid]) -> DatabaseResult<bool> {
        let updated = sqlx::query("UPDATE posts SET likes = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(likes)
            .execute(&self.pool)
            .await?
            .rows_affected()
            > 0;
        Ok(updated)
    }

    pub async fn add_comment(&self, post_id: Uuid, user_id: Uuid, text: &str) -> DatabaseResult<()> {
        sqlx::query("INSERT INTO post_comments (post_id, user_id, text) VALUES ($1, $2, $3)")
            .bind(post_id)
            .bind(user_id)
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Comments of the given posts in arrival order
    pub async fn comments_for(&self, post_ids: &[Uuid]) -> DatabaseResult<Vec<Comment>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT c.id, c.post_id, c.text, c.created_at,
                   u.id AS author_id, u.username AS author_username, u.name AS author_name,
                   u.profile_picture AS author_profile_picture
            FROM post_comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = ANY($1)
            ORDER BY c.id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(comment_from_row).collect())
    }
}
