//! Direct messages between two users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserSummary;

/// A room is identified by its two participants, smallest id first
pub fn room_participants(a: Uuid, b: Uuid) -> Result<(Uuid, Uuid), String> {
    if a == b {
        return Err("You cannot message yourself".to_string());
    }
    Ok(if a < b { (a, b) } else { (b, a) })
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// One entry of the chat list: the other participant and the latest message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: Uuid,
    pub participant: UserSummary,
    pub last_message: Option<Message>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub text: String,
}

impl SendMessageRequest {
    pub fn validated_text(&self) -> Result<String, String> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err("Message text is required".to_string());
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participants_are_ordered() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(room_participants(a, b).unwrap(), room_participants(b, a).unwrap());

        let (low, high) = room_participants(a, b).unwrap();
        assert!(low < high);
    }

    #[test]
    fn no_room_with_yourself() {
        let a = Uuid::new_v4();
        assert!(room_participants(a, a).is_err());
    }

    #[test]
    fn message_text_is_required() {
        let blank = SendMessageRequest {
            text: "  ".to_string(),
        };
        assert!(blank.validated_text().is_err());

        let hello = SendMessageRequest {
            text: " hello ".to_string(),
        };
        assert_eq!(hello.validated_text().unwrap(), "hello");
    }
}
