use sqlx::FromRow;
use uuid::Uuid;

/// A story row removed by the sweep; `media` is its public file path
#[derive(Debug, Clone, FromRow)]
pub struct ExpiredStory {
    pub id: Uuid,
    pub media: String,
}

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub stories_deleted: usize,
    pub files_deleted: usize,
    pub files_missing: usize,
    pub files_failed: usize,
}
