//! Chat room and message queries

use common::error::DatabaseResult;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{ChatSummary, Message, UserSummary, chat::room_participants};

#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Room shared by two distinct users, if they ever exchanged a message
    pub async fn find_room(&self, a: Uuid, b: Uuid) -> DatabaseResult<Option<Uuid>> {
        let Ok((low, high)) = room_participants(a, b) else {
            return Ok(None);
        };

        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM chat_rooms WHERE participant_a = $1 AND participant_b = $2",
        )
        .bind(low)
        .bind(high)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }

    /// Every room of `user_id` with the other participant and the latest
    /// message, most recently active first
    pub async fn rooms_for(&self, user_id: Uuid) -> DatabaseResult<Vec<ChatSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.updated_at,
                   u.id AS other_id, u.username AS other_username, u.name AS other_name,
                   u.profile_picture AS other_profile_picture,
                   m.id AS message_id, m.sender_id, m.receiver_id, m.text,
                   m.created_at AS message_created_at
            FROM chat_rooms r
            JOIN users u ON u.id = CASE WHEN r.participant_a = $1
                                        THEN r.participant_b ELSE r.participant_a END
            LEFT JOIN LATERAL (
                SELECT id, sender_id, receiver_id, text, created_at
                FROM chat_messages
                WHERE room_id = r.id
                ORDER BY id DESC
                LIMIT 1
            ) m ON TRUE
            WHERE r.participant_a = $1 OR r.participant_b = $1
            ORDER BY r.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let chats = rows
            .into_iter()
            .map(|row| {
                let room_id: Uuid = row.get("id");
                let message_id: Option<i64> = row.get("message_id");
                let last_message = message_id.map(|id| Message {
                    id,
                    room_id,
                    sender_id: row.get("sender_id"),
                    receiver_id: row.get("receiver_id"),
                    text: row.get("text"),
                    created_at: row.get("message_created_at"),
                });

                ChatSummary {
                    id: room_id,
                    participant: UserSummary {
                        id: row.get("other_id"),
                        username: row.get("other_username"),
                        name: row.get("other_name"),
                        profile_picture: row.get("other_profile_picture"),
                    },
                    last_message,
                    updated_at: row.get("updated_at"),
                }
            })
            .collect();

        Ok(chats)
    }

    /// Messages of a room in send order
    pub async fn messages(&self, room_id: Uuid) -> DatabaseResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, room_id, sender_id, receiver_id, text, created_at
            FROM chat_messages
            WHERE room_id = $1
            ORDER BY id
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    /// Store a message, creating the room on first contact
    pub async fn send(
        &self,
        room: (Uuid, Uuid),
        sender_id: Uuid,
        receiver_id: Uuid,
        text: &str,
    ) -> DatabaseResult<Message> {
        let mut tx = self.pool.begin().await?;

        let room_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO chat_rooms (id, participant_a, participant_b)
            VALUES ($1, $2, $3)
            ON CONFLICT (participant_a, participant_b)
            DO UPDATE SET updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(room.0)
        .bind(room.1)
        .fetch_one(&mut *tx)
        .await?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO chat_messages (room_id, sender_id, receiver_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, room_id, sender_id, receiver_id, text, created_at
            "#,
        )
        .bind(room_id)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(text)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(message)
    }
}
