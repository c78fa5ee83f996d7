//! On-disk media store
//!
//! Uploaded files live under `root/<category>/` and are exposed to clients
//! through a public path prefix (`/uploads` by default). Only public paths
//! are stored in the database; the store maps them back to files.

use chrono::Utc;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory that holds uploaded files
    #[serde(default = "default_root")]
    pub root: String,
    /// URL prefix under which `root` is served
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
}

fn default_root() -> String {
    "uploads".to_string()
}

fn default_public_prefix() -> String {
    "/uploads".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            public_prefix: default_public_prefix(),
        }
    }
}

/// File name of the avatar every new user starts with
pub const DEFAULT_AVATAR_FILE: &str = "default-avatar.png";

/// Sub-directory an upload is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Posts,
    Stories,
    Profiles,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 3] = [Self::Posts, Self::Stories, Self::Profiles];

    pub fn dir(&self) -> &'static str {
        match self {
            MediaCategory::Posts => "posts",
            MediaCategory::Stories => "stories",
            MediaCategory::Profiles => "profiles",
        }
    }
}

/// Local filesystem media store
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    public_prefix: String,
}

impl MediaStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
            public_prefix: config.public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Create the category directories if they are missing
    pub async fn ensure_dirs(&self) -> StorageResult<()> {
        for category in MediaCategory::ALL {
            tokio::fs::create_dir_all(self.root.join(category.dir())).await?;
        }
        info!("Media store ready at {}", self.root.display());
        Ok(())
    }

    /// Public path of the avatar assigned to new users
    pub fn default_profile_picture(&self) -> String {
        format!(
            "{}/{}/{}",
            self.public_prefix,
            MediaCategory::Profiles.dir(),
            DEFAULT_AVATAR_FILE
        )
    }

    pub fn is_default_profile_picture(&self, public_path: &str) -> bool {
        public_path == self.default_profile_picture()
    }

    /// Write `bytes` under a fresh unique name and return its public path
    pub async fn save(
        &self,
        category: MediaCategory,
        extension: &str,
        bytes: &[u8],
    ) -> StorageResult<String> {
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StorageError::InvalidPath(format!(
                "bad extension {:?}",
                extension
            )));
        }

        let file_name = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension.to_ascii_lowercase()
        );

        let dir = self.root.join(category.dir());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        let public_path = format!("{}/{}/{}", self.public_prefix, category.dir(), file_name);
        debug!("Stored {} bytes at {}", bytes.len(), public_path);
        Ok(public_path)
    }

    /// Map a public path back to a file inside the store
    pub fn resolve(&self, public_path: &str) -> StorageResult<PathBuf> {
        let relative = public_path
            .strip_prefix(&self.public_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StorageError::InvalidPath(public_path.to_string()))?;

        let relative = Path::new(relative);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if relative.as_os_str().is_empty() || escapes || relative.to_string_lossy().contains('\\') {
            return Err(StorageError::InvalidPath(public_path.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// Remove the file behind a public path. Returns false when it was
    /// already gone.
    pub async fn delete(&self, public_path: &str) -> StorageResult<bool> {
        let path = self.resolve(public_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted media file {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
