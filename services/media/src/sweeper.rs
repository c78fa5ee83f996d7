//! Scheduled story expiry
//!
//! Each run deletes the story rows past their time-to-live first and only
//! then removes the files, so no row is ever left pointing at a missing
//! file. A file that cannot be removed is logged and left behind.

use chrono::{DateTime, Utc};
use common::{error::DatabaseError, expiry::story_cutoff, storage::MediaStore};
use thiserror::Error;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, warn};

use crate::{
    database::StoryRepository,
    models::{ExpiredStory, SweepReport},
};

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),
}

#[derive(Clone)]
pub struct StorySweeper {
    stories: StoryRepository,
    media: MediaStore,
}

impl StorySweeper {
    pub fn new(stories: StoryRepository, media: MediaStore) -> Self {
        Self { stories, media }
    }

    /// Delete everything expired at `now`
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<SweepReport, SweepError> {
        let expired = self.stories.delete_expired(story_cutoff(now)).await?;
        let report = remove_files(&self.media, &expired).await;

        if report.stories_deleted > 0 {
            info!(
                "Expired {} stories ({} files removed, {} already gone, {} failed)",
                report.stories_deleted, report.files_deleted, report.files_missing, report.files_failed
            );
        } else {
            debug!("No expired stories");
        }

        Ok(report)
    }

    /// Run a sweep on `schedule` until the returned scheduler is shut down
    pub async fn start(&self, schedule: &str) -> Result<JobScheduler, SweepError> {
        let sweeper = self.clone();
        let scheduler = JobScheduler::new().await?;

        let job = Job::new_async(schedule, move |_, _| {
            let sweeper = sweeper.clone();
            Box::pin(async move {
                if let Err(e) = sweeper.sweep_once(Utc::now()).await {
                    error!("Story sweep failed: {}", e);
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!("Started story sweeper with schedule: {}", schedule);
        Ok(scheduler)
    }
}

/// Remove the media files of deleted stories
pub async fn remove_files(media: &MediaStore, expired: &[ExpiredStory]) -> SweepReport {
    let mut report = SweepReport {
        stories_deleted: expired.len(),
        ..SweepReport::default()
    };

    for story in expired {
        match media.delete(&story.media).await {
            Ok(true) => report.files_deleted += 1,
            Ok(false) => report.files_missing += 1,
            Err(e) => {
                warn!("Failed to remove media {} of story {}: {}", story.media, story.id, e);
                report.files_failed += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SWEEP_SCHEDULE;
    use common::storage::{MediaCategory, StorageConfig};
    use uuid::Uuid;

    fn store(dir: &std::path::Path) -> MediaStore {
        MediaStore::new(&StorageConfig {
            root: dir.to_string_lossy().to_string(),
            public_prefix: "/uploads".to_string(),
        })
    }

    fn expired(media: &str) -> ExpiredStory {
        ExpiredStory {
            id: Uuid::new_v4(),
            media: media.to_string(),
        }
    }

    #[tokio::test]
    async fn removes_files_of_expired_stories() {
        let tmp = tempfile::tempdir().unwrap();
        let media = store(tmp.path());
        let first = media.save(MediaCategory::Stories, "png", b"one").await.unwrap();
        let second = media.save(MediaCategory::Stories, "mp4", b"two").await.unwrap();
        let kept = media.save(MediaCategory::Stories, "png", b"kept").await.unwrap();

        let report = remove_files(
            &media,
            &[
                expired(&first),
                expired(&second),
                expired("/uploads/stories/already-gone.png"),
                expired("/uploads/../outside.png"),
            ],
        )
        .await;

        assert_eq!(
            report,
            SweepReport {
                stories_deleted: 4,
                files_deleted: 2,
                files_missing: 1,
                files_failed: 1,
            }
        );
        assert!(!media.resolve(&first).unwrap().exists());
        assert!(!media.resolve(&second).unwrap().exists());
        assert!(media.resolve(&kept).unwrap().exists());
    }

    #[tokio::test]
    async fn nothing_expired() {
        let tmp = tempfile::tempdir().unwrap();
        let report = remove_files(&store(tmp.path()), &[]).await;
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn schedules_parse() {
        let noop = |_: Uuid, _: JobScheduler| -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
            Box::pin(async {})
        };
        assert!(Job::new_async(DEFAULT_SWEEP_SCHEDULE, noop).is_ok());
        assert!(Job::new_async("every now and then", noop).is_err());
    }
}
