//! User, follow graph and recent-search queries

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{UpdateProfileRequest, User, UserSummary};

const USER_COLUMNS: &str = "id, username, email, name, bio, location, website, profile_picture, \
     posts_count, followers_count, following_count, recent_searches, created_at, updated_at";

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Summaries for the given ids, in the order of `ids`
    pub async fn summaries(&self, ids: &[Uuid]) -> DatabaseResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username, u.name, u.profile_picture
            FROM UNNEST($1::uuid[]) WITH ORDINALITY AS wanted(id, position)
            JOIN users u ON u.id = wanted.id
            ORDER BY wanted.position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Ids of every account `user_id` follows
    pub async fn following_ids(&self, user_id: Uuid) -> DatabaseResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT followee_id FROM follows WHERE follower_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    pub async fn followers(&self, user_id: Uuid) -> DatabaseResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username, u.name, u.profile_picture
            FROM follows f JOIN users u ON u.id = f.follower_id
            WHERE f.followee_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn following(&self, user_id: Uuid) -> DatabaseResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username, u.name, u.profile_picture
            FROM follows f JOIN users u ON u.id = f.followee_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> DatabaseResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Add a follow edge and refresh both users' counters in one transaction.
    /// Returns false when the edge already existed.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> DatabaseResult<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        refresh_follow_counters(&mut tx, follower_id, followee_id).await?;
        tx.commit().await?;

        if inserted {
            info!("User {} now follows {}", follower_id, followee_id);
        }
        Ok(inserted)
    }

    /// Remove a follow edge and refresh both users' counters.
    /// Returns false when there was nothing to remove.
    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> DatabaseResult<bool> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        refresh_follow_counters(&mut tx, follower_id, followee_id).await?;
        tx.commit().await?;

        if removed {
            info!("User {} unfollowed {}", follower_id, followee_id);
        }
        Ok(removed)
    }

    /// Apply the present fields of `update`
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: &UpdateProfileRequest,
    ) -> DatabaseResult<Option<User>> {
        let query = format!(
            "UPDATE users SET
                 name = COALESCE($2, name),
                 bio = COALESCE($3, bio),
                 location = COALESCE($4, location),
                 website = COALESCE($5, website),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(update.name.as_deref())
            .bind(update.bio.as_deref())
            .bind(update.location.as_deref())
            .bind(update.website.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn update_profile_picture(
        &self,
        id: Uuid,
        profile_picture: &str,
    ) -> DatabaseResult<Option<User>> {
        let query = format!(
            "UPDATE users SET profile_picture = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(profile_picture)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Case-insensitive match on username, name or bio
    pub async fn search(&self, pattern: &str) -> DatabaseResult<Vec<UserSummary>> {
        debug!("Searching users matching {}", pattern);

        let rows = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, name, profile_picture
            FROM users
            WHERE username ILIKE $1 OR name ILIKE $1 OR bio ILIKE $1
            ORDER BY username
            LIMIT 50
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn set_recent_searches(&self, id: Uuid, recent: &[Uuid]) -> DatabaseResult<()> {
        sqlx::query("UPDATE users SET recent_searches = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(recent)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

async fn refresh_follow_counters(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    follower_id: Uuid,
    followee_id: Uuid,
) -> DatabaseResult<()> {
    sqlx::query(
        "UPDATE users SET following_count =
             (SELECT COUNT(*) FROM follows WHERE follower_id = $1), updated_at = NOW()
         WHERE id = $1",
    )
    .bind(follower_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        "UPDATE users SET followers_count =
             (SELECT COUNT(*) FROM follows WHERE followee_id = $1), updated_at = NOW()
         WHERE id = $1",
    )
    .bind(followee_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
