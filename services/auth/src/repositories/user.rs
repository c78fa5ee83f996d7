//! User repository for database operations

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use common::error::DatabaseError;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    models::{NewUser, User},
};

const USER_COLUMNS: &str = "id, username, email, password_hash, name, bio, location, website, \
     profile_picture, posts_count, followers_count, following_count, created_at, updated_at";

/// Hash a plain-text password with argon2 and a random salt
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Check a plain-text password against a stored argon2 hash
pub fn verify_password(password_hash: &str, password: &str) -> AuthResult<bool> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// A taken username or email comes back as a validation error.
    pub async fn create(&self, new_user: &NewUser) -> AuthResult<User> {
        info!("Creating new user: {}", new_user.username);

        let password_hash = hash_password(&new_user.password)?;

        let query = format!(
            "INSERT INTO users (id, username, email, password_hash, name, profile_picture)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&password_hash)
            .bind(&new_user.name)
            .bind(&new_user.profile_picture)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let err = DatabaseError::from(e);
                if err.is_unique_violation() {
                    AuthError::Validation("Username or email is already registered".to_string())
                } else {
                    AuthError::Database(err)
                }
            })
    }

    /// Find a user by username or email
    pub async fn find_by_username_or_email(&self, identifier: &str) -> AuthResult<Option<User>> {
        debug!("Finding user by username or email: {}", identifier);

        let query = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE username = $1 OR email = LOWER($1)"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        debug!("Finding user by ID: {}", id);

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> AuthResult<bool> {
        verify_password(&user.password_hash, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password(&hash, "correct horse").unwrap());
        assert!(!verify_password(&hash, "wrong horse").unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password("password1").unwrap();
        let b = hash_password("password1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify_password("not-a-phc-string", "x"),
            Err(AuthError::PasswordHash(_))
        ));
    }
}
