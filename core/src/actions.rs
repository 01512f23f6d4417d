//! Management actions: rename, delete, upload, access check, stream recording
//! and download links.
//!
//! Every action returns an [`ActionOutcome`] instead of an error so the UI can
//! show it directly; [`ActionOutcome::needs_reload`] says whether the catalog
//! has to be fetched again afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tracing::{info, warn};

use crate::error::{GalleryError, Result};
use crate::helpers::{mime_for, strip_extension};
use crate::http::HttpClient;
use crate::models::{AccessReply, ActionReply, UploadReply, VideoEntry};

/// The backend endpoints behind the management actions.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    async fn check_key(&self, key: &str) -> Result<AccessReply>;
    async fn rename(&self, old_name: &str, new_name: &str) -> Result<ActionReply>;
    async fn delete(&self, video_name: &str) -> Result<ActionReply>;
    async fn upload(&self, file_name: &str, bytes: Vec<u8>, title: &str) -> Result<UploadReply>;
    async fn start_recording(&self, stream_key: &str) -> Result<UploadReply>;
    fn download_url(&self, file_name: &str) -> Result<String>;
}

#[async_trait]
impl ManagementApi for HttpClient {
    async fn check_key(&self, key: &str) -> Result<AccessReply> {
        self.post_json(self.auth_endpoint("/check_key")?, &json!({ "key": key })).await
    }

    async fn rename(&self, old_name: &str, new_name: &str) -> Result<ActionReply> {
        let body = json!({ "old_name": old_name, "new_name": new_name });
        self.post_json(self.endpoint("/rename-video")?, &body).await
    }

    async fn delete(&self, video_name: &str) -> Result<ActionReply> {
        self.post_json(self.endpoint("/delete-video")?, &json!({ "video_name": video_name })).await
    }

    async fn upload(&self, file_name: &str, bytes: Vec<u8>, title: &str) -> Result<UploadReply> {
        let part = Part::bytes(bytes).file_name(file_name.to_string()).mime_str(mime_for(file_name))?;
        let form = Form::new().part("file", part).text("title", title.to_string());
        self.post_multipart(self.endpoint("/upload")?, form).await
    }

    async fn start_recording(&self, stream_key: &str) -> Result<UploadReply> {
        let path = format!("/stream?key={}", urlencoding::encode(stream_key));
        self.post_empty(self.endpoint(&path)?).await
    }

    fn download_url(&self, file_name: &str) -> Result<String> {
        let path = format!("/video:download/{}", urlencoding::encode(file_name));
        Ok(self.endpoint(&path)?.to_string())
    }
}

/// Shown when the key check fails for any reason.
pub const INVALID_KEY_MESSAGE: &str = "Invalid key!";

const RENAME_FAILED: &str = "Failed to rename video";
const DELETE_FAILED: &str = "Failed to delete video";
const UPLOAD_FAILED: &str = "Upload failed";

/// Why an action was refused before any request went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingFile,
    MissingTitle,
    InvalidKey,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingFile => write!(f, "Select a file to upload"),
            Rejection::MissingTitle => write!(f, "Enter a title"),
            Rejection::InvalidKey => write!(f, "{INVALID_KEY_MESSAGE}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The user cancelled or changed nothing; no request was sent.
    Skipped,
    Rejected(Rejection),
    /// `entry` is the renamed video; `previous_url` is where it used to live.
    Renamed { previous_url: String, entry: VideoEntry },
    Deleted,
    Uploaded { message: String },
    AccessGranted,
    Recording { message: String },
    Failed(String),
}

impl ActionOutcome {
    /// Rename and delete change the library, so the list must be refetched.
    pub fn needs_reload(&self) -> bool {
        matches!(self, ActionOutcome::Renamed { .. } | ActionOutcome::Deleted)
    }
}

/// Request body for a rename plus the title the readout should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub old_name: String,
    pub new_name: String,
    pub new_title: String,
}

/// Turns prompt input into a rename request. `None` when the prompt was
/// cancelled, left empty or not changed. The original extension is kept unless
/// the user typed one.
pub fn plan_rename(entry: &VideoEntry, input: Option<&str>) -> Option<RenamePlan> {
    let typed = input.map(str::trim).filter(|s| !s.is_empty())?;
    let old_name = entry.file_name();
    if typed == entry.display_name || typed == old_name {
        return None;
    }
    let stem = strip_extension(typed);
    let (new_name, new_title) = if stem.len() < typed.len() && !stem.is_empty() {
        (typed.to_string(), stem.to_string())
    } else {
        let ext = entry.extension().unwrap_or_default();
        (format!("{typed}{ext}"), typed.to_string())
    };
    Some(RenamePlan { old_name, new_name, new_title })
}

fn reply_error(error: Option<String>, fallback: &str) -> String {
    error.filter(|e| !e.trim().is_empty()).unwrap_or_else(|| fallback.to_string())
}

pub async fn rename_video(api: &dyn ManagementApi, entry: &VideoEntry, input: Option<&str>) -> ActionOutcome {
    let Some(plan) = plan_rename(entry, input) else {
        return ActionOutcome::Skipped;
    };
    match api.rename(&plan.old_name, &plan.new_name).await {
        Ok(reply) if reply.success => {
            info!(from = %plan.old_name, to = %plan.new_name, "Renamed video");
            ActionOutcome::Renamed {
                previous_url: entry.url.clone(),
                entry: entry.renamed(&plan.new_name, &plan.new_title),
            }
        }
        Ok(reply) => ActionOutcome::Failed(reply_error(reply.error, RENAME_FAILED)),
        Err(e) => {
            warn!(error = %e, "Rename request failed");
            ActionOutcome::Failed(format!("{RENAME_FAILED}: {e}"))
        }
    }
}

pub async fn delete_video(api: &dyn ManagementApi, entry: &VideoEntry, confirmed: bool) -> ActionOutcome {
    if !confirmed {
        return ActionOutcome::Skipped;
    }
    let name = entry.file_name();
    match api.delete(&name).await {
        Ok(reply) if reply.success => {
            info!(video = %name, "Deleted video");
            ActionOutcome::Deleted
        }
        Ok(reply) => ActionOutcome::Failed(reply_error(reply.error, DELETE_FAILED)),
        Err(e) => {
            warn!(error = %e, "Delete request failed");
            ActionOutcome::Failed(format!("{DELETE_FAILED}: {e}"))
        }
    }
}

/// Reads `file` and posts it with `title`. Does not touch the catalog.
pub async fn upload_video(api: &dyn ManagementApi, file: Option<&Path>, title: &str) -> ActionOutcome {
    let Some(path) = file else {
        return ActionOutcome::Rejected(Rejection::MissingFile);
    };
    let title = title.trim();
    if title.is_empty() {
        return ActionOutcome::Rejected(Rejection::MissingTitle);
    }
    let file_name = match path.file_name() {
        Some(n) => n.to_string_lossy().into_owned(),
        None => return ActionOutcome::Rejected(Rejection::MissingFile),
    };
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read upload file");
            return ActionOutcome::Failed(GalleryError::from(e).to_string());
        }
    };
    info!(file = %file_name, size = bytes.len(), "Uploading video");
    match api.upload(&file_name, bytes, title).await {
        Ok(reply) if reply.success => ActionOutcome::Uploaded {
            message: reply.message.unwrap_or_else(|| format!("{file_name} uploaded")),
        },
        Ok(reply) => ActionOutcome::Failed(reply_error(reply.error, UPLOAD_FAILED)),
        Err(e) => {
            warn!(error = %e, "Upload request failed");
            ActionOutcome::Failed(format!("{UPLOAD_FAILED}: {e}"))
        }
    }
}

/// Advisory access gate: only `{"access": "granted"}` unlocks.
pub async fn check_access(api: &dyn ManagementApi, key: &str) -> ActionOutcome {
    match api.check_key(key).await {
        Ok(reply) if reply.granted() => ActionOutcome::AccessGranted,
        Ok(reply) => {
            info!(access = %reply.access, "Access key refused");
            ActionOutcome::Rejected(Rejection::InvalidKey)
        }
        Err(e) => {
            warn!(error = %e, "Access check failed");
            ActionOutcome::Rejected(Rejection::InvalidKey)
        }
    }
}

pub async fn start_recording(api: &dyn ManagementApi, stream_key: &str) -> ActionOutcome {
    let key = stream_key.trim();
    if key.is_empty() {
        return ActionOutcome::Skipped;
    }
    match api.start_recording(key).await {
        Ok(reply) if reply.success => ActionOutcome::Recording {
            message: reply.message.unwrap_or_else(|| "Recording started".to_string()),
        },
        Ok(reply) => ActionOutcome::Failed(reply_error(reply.error.or(reply.message), "Recording failed")),
        Err(e) => {
            warn!(error = %e, "Recording request failed");
            ActionOutcome::Failed(e.to_string())
        }
    }
}

/// Upload form state kept by the UI between frames.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<PathBuf>,
    pub title: String,
}

impl UploadRequest {
    pub fn is_ready(&self) -> bool {
        self.file.is_some() && !self.title.trim().is_empty()
    }
}
