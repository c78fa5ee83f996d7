//! Multipart upload handling
//!
//! Reads a multipart form, checks the file against an [`UploadPolicy`] and
//! hands the bytes to the media store.

use axum::body::Bytes;
use axum_extra::extract::Multipart;
use common::{
    error::DatabaseResult,
    storage::{MediaCategory, MediaStore},
};
use std::{collections::HashMap, future::Future, path::Path};
use tracing::warn;

use crate::{
    error::{ApiError, ApiResult},
    models::MediaKind,
};

const MIB: usize = 1024 * 1024;

/// Largest request body accepted on upload routes; policies enforce the
/// per-file limit below this.
pub const MAX_REQUEST_BYTES: usize = 12 * MIB;

/// Accepted file types and size for one kind of upload
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub field: &'static str,
    pub extensions: &'static [&'static str],
    pub max_bytes: usize,
    pub type_error: &'static str,
    pub missing_error: &'static str,
}

pub const POST_MEDIA: UploadPolicy = UploadPolicy {
    field: "media",
    extensions: &["jpeg", "jpg", "png", "mp4"],
    max_bytes: 10 * MIB,
    type_error: "Only .png, .jpg, .jpeg and .mp4 format allowed!",
    missing_error: "Please upload an image or video",
};

pub const STORY_MEDIA: UploadPolicy = UploadPolicy {
    field: "media",
    extensions: &["jpeg", "jpg", "png", "mp4"],
    max_bytes: 10 * MIB,
    type_error: "Only .png, .jpg, .jpeg and .mp4 format allowed!",
    missing_error: "Please upload a file",
};

pub const PROFILE_PICTURE: UploadPolicy = UploadPolicy {
    field: "profilePicture",
    extensions: &["jpeg", "jpg", "png", "gif"],
    max_bytes: 5 * MIB,
    type_error: "Only image files (jpeg, jpg, png, gif) are allowed!",
    missing_error: "Please upload an image",
};

/// A file part of a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// A file that passed its policy
#[derive(Debug, Clone)]
pub struct AcceptedUpload {
    pub extension: String,
    pub kind: MediaKind,
    pub bytes: Bytes,
}

/// Text fields plus the file part named by the policy
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

fn mime_for_extension(extension: &str) -> &'static [&'static str] {
    match extension {
        "jpg" | "jpeg" => &["image/jpeg", "image/jpg"],
        "png" => &["image/png"],
        "gif" => &["image/gif"],
        "mp4" => &["video/mp4"],
        _ => &[],
    }
}

impl UploadPolicy {
    /// Both the file extension and the declared MIME type must be allowed
    pub fn check(&self, file: UploadedFile) -> ApiResult<AcceptedUpload> {
        if file.bytes.is_empty() {
            return Err(ApiError::bad_request(self.missing_error));
        }

        if file.bytes.len() > self.max_bytes {
            return Err(ApiError::bad_request(format!(
                "File too large, the limit is {} MB",
                self.max_bytes / MIB
            )));
        }

        let extension = Path::new(&file.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let mime = file.content_type.trim().to_ascii_lowercase();

        let allowed = self.extensions.contains(&extension.as_str())
            && mime_for_extension(&extension).contains(&mime.as_str());
        if !allowed {
            return Err(ApiError::bad_request(self.type_error));
        }

        Ok(AcceptedUpload {
            extension,
            kind: MediaKind::from_mime(&mime),
            bytes: file.bytes,
        })
    }

    /// Pull the policy's file out of `form`, or fail with the missing-file
    /// message
    pub fn accept(&self, form: &mut MultipartForm) -> ApiResult<AcceptedUpload> {
        let file = form
            .file
            .take()
            .ok_or_else(|| ApiError::bad_request(self.missing_error))?;
        self.check(file)
    }
}

/// Read every part of the form. The part named `policy.field` is kept as
/// the file, others as text.
pub async fn read_form(mut multipart: Multipart, policy: &UploadPolicy) -> ApiResult<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == policy.field {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;

            form.file = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else if !name.is_empty() {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid form field: {}", e)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Store a new file and point the owner's record at it, then drop the file
/// it replaces.
///
/// `update` writes the new public path and returns the updated record, or
/// `None` when the owner no longer exists. If it fails, the new file is
/// deleted and the old one kept, so the record never points at a missing
/// file. `keep_previous` protects shared files such as the default avatar.
pub async fn replace_stored_file<T, F, Fut>(
    media: &MediaStore,
    category: MediaCategory,
    upload: &AcceptedUpload,
    previous: &str,
    keep_previous: bool,
    update: F,
) -> ApiResult<Option<T>>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = DatabaseResult<Option<T>>>,
{
    let new_path = media.save(category, &upload.extension, &upload.bytes).await?;

    let updated = match update(new_path.clone()).await {
        Ok(Some(record)) => record,
        outcome => {
            if let Err(e) = media.delete(&new_path).await {
                warn!("Failed to remove orphaned upload {}: {}", new_path, e);
            }
            return outcome.map_err(ApiError::from);
        }
    };

    if !keep_previous && previous != new_path {
        if let Err(e) = media.delete(previous).await {
            warn!("Failed to remove replaced file {}: {}", previous, e);
        }
    }

    Ok(Some(updated))
}
