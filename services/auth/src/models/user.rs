//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub profile_picture: String,
    pub posts_count: i32,
    pub followers_count: i32,
    pub following_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload, password still in plain text
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
    pub profile_picture: String,
}

/// Registration request body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    /// Trimmed copy with the email lowercased
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
        }
    }
}

/// Login request body; clients send either `email` or `username`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "email", alias = "username")]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub profile_picture: String,
    pub posts_count: i32,
    pub followers_count: i32,
    pub following_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            bio: user.bio,
            location: user.location,
            website: user.website,
            profile_picture: user.profile_picture,
            posts_count: user.posts_count,
            followers_count: user.followers_count,
            following_count: user.following_count,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_accepts_email_or_username() {
        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.io","password":"x"}"#).unwrap();
        assert_eq!(by_email.identifier, "a@b.io");

        let by_name: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"x"}"#).unwrap();
        assert_eq!(by_name.identifier, "alice");
    }

    #[test]
    fn register_normalizes_fields() {
        let req = RegisterRequest {
            username: " alice ".to_string(),
            name: " Alice A ".to_string(),
            email: " Alice@Example.COM ".to_string(),
            password: " keep spaces ".to_string(),
        }
        .normalized();

        assert_eq!(req.username, "alice");
        assert_eq!(req.name, "Alice A");
        assert_eq!(req.email, "alice@example.com");
        assert_eq!(req.password, " keep spaces ");
    }

    #[test]
    fn response_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            name: "Alice".to_string(),
            bio: String::new(),
            location: String::new(),
            website: String::new(),
            profile_picture: "/uploads/profiles/default-avatar.png".to_string(),
            posts_count: 0,
            followers_count: 0,
            following_count: 0,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["profilePicture"], "/uploads/profiles/default-avatar.png");
    }
}
