//! User profile models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Number of user ids kept in a user's recent searches
pub const RECENT_SEARCH_LIMIT: usize = 5;

/// User row without credentials
#[derive(Debug, Clone, FromRow)]
pub struct User {
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
    pub recent_searches: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal user reference embedded in posts, stories, chats and lists
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub profile_picture: String,
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
    pub updated_at: DateTime<Utc>,
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
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub posts_count: i32,
    pub followers_count: i32,
    pub following_count: i32,
}

/// Profile page payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub stats: ProfileStats,
    pub followers: Vec<UserSummary>,
    pub following: Vec<UserSummary>,
    /// Whether the requester follows this profile
    pub is_following: bool,
}

impl ProfileResponse {
    pub fn new(
        user: User,
        followers: Vec<UserSummary>,
        following: Vec<UserSummary>,
        is_following: bool,
    ) -> Self {
        let stats = ProfileStats {
            posts_count: user.posts_count,
            followers_count: user.followers_count,
            following_count: user.following_count,
        };

        Self {
            user: user.into(),
            stats,
            followers,
            following,
            is_following,
        }
    }
}

/// `PUT /profile/update` body; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

impl UpdateProfileRequest {
    /// Trim every present field and check the length limits
    pub fn validated(self) -> Result<Self, String> {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        let update = Self {
            name: trim(self.name),
            bio: trim(self.bio),
            location: trim(self.location),
            website: trim(self.website),
        };

        if let Some(name) = &update.name {
            let length = name.chars().count();
            if length < 3 {
                return Err("Name must be at least 3 characters long".to_string());
            }
            if length > 50 {
                return Err("Name cannot be more than 50 characters".to_string());
            }
        }

        if update.bio.as_ref().is_some_and(|b| b.chars().count() > 150) {
            return Err("Bio cannot be more than 150 characters".to_string());
        }

        if update.location.as_ref().is_some_and(|l| l.chars().count() > 100) {
            return Err("Location cannot be more than 100 characters".to_string());
        }

        if update.website.as_ref().is_some_and(|w| w.chars().count() > 255) {
            return Err("Website cannot be more than 255 characters".to_string());
        }

        Ok(update)
    }
}

/// Move `searched` to the most recent end of the list, keeping the last
/// [`RECENT_SEARCH_LIMIT`] distinct ids
pub fn push_recent_search(recent: &[Uuid], searched: Uuid) -> Vec<Uuid> {
    let mut updated: Vec<Uuid> = recent.iter().copied().filter(|id| *id != searched).collect();
    updated.push(searched);

    let overflow = updated.len().saturating_sub(RECENT_SEARCH_LIMIT);
    updated.drain(..overflow);
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_searches_keep_last_five_distinct() {
        let ids: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();

        let mut recent = Vec::new();
        for id in &ids {
            recent = push_recent_search(&recent, *id);
        }
        assert_eq!(recent, ids[1..].to_vec());

        // Searching an existing entry moves it to the end
        recent = push_recent_search(&recent, ids[2]);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent.last(), Some(&ids[2]));
        assert_eq!(recent.iter().filter(|id| **id == ids[2]).count(), 1);
    }

    #[test]
    fn profile_update_limits() {
        let ok = UpdateProfileRequest {
            name: Some("  Alice  ".to_string()),
            bio: Some("b".repeat(150)),
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(ok.name.as_deref(), Some("Alice"));
        assert!(ok.location.is_none());

        let long_bio = UpdateProfileRequest {
            bio: Some("b".repeat(151)),
            ..Default::default()
        };
        assert_eq!(
            long_bio.validated().unwrap_err(),
            "Bio cannot be more than 150 characters"
        );

        let short_name = UpdateProfileRequest {
            name: Some("Al".to_string()),
            ..Default::default()
        };
        assert!(short_name.validated().is_err());
    }

    #[test]
    fn profile_response_flattens_user_and_adds_stats() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            bio: String::new(),
            location: String::new(),
            website: String::new(),
            profile_picture: "/uploads/profiles/default-avatar.png".to_string(),
            posts_count: 3,
            followers_count: 2,
            following_count: 1,
            recent_searches: vec![],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(ProfileResponse::new(user, vec![], vec![], true)).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["stats"]["postsCount"], 3);
        assert_eq!(json["stats"]["followersCount"], 2);
        assert_eq!(json["isFollowing"], true);
        assert!(json.get("recentSearches").is_none());
    }
}
