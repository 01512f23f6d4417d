use serde::{Deserialize, Serialize};

use crate::helpers::{format_date_label, strip_extension};

/// One video's normalized metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub url: String,
    pub display_name: String,
    /// Milliseconds since the Unix epoch, 0 when the backend did not say.
    pub last_modified: i64,
}

impl VideoEntry {
    pub fn new(url: impl Into<String>, display_name: impl Into<String>, last_modified: i64) -> Self {
        Self { url: url.into(), display_name: display_name.into(), last_modified }
    }

    /// Last path segment of the URL, percent-decoded. This is the name the backend
    /// knows the file by (`clip1.mp4`), as opposed to the display name (`clip1`).
    pub fn file_name(&self) -> String {
        let without_query = self.url.split(['?', '#']).next().unwrap_or_default();
        let raw = without_query.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
        urlencoding::decode(raw).map(|s| s.into_owned()).unwrap_or_else(|_| raw.to_string())
    }

    /// Same video under a new backend file name: the last path segment of the
    /// URL is swapped, query and date are kept.
    pub fn renamed(&self, file_name: &str, display_name: &str) -> VideoEntry {
        let (path, rest) = match self.url.find(['?', '#']) {
            Some(i) => self.url.split_at(i),
            None => (self.url.as_str(), ""),
        };
        let path = path.trim_end_matches('/');
        let dir = path.rfind('/').map(|i| &path[..=i]).unwrap_or_default();
        let url = format!("{dir}{}{rest}", urlencoding::encode(file_name));
        VideoEntry { url, display_name: display_name.to_string(), last_modified: self.last_modified }
    }

    /// Extension of the backend file name including the dot, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        let stem = strip_extension(&name);
        if stem.len() < name.len() { Some(name[stem.len()..].to_string()) } else { None }
    }

    pub fn date_label(&self) -> String {
        format_date_label(self.last_modified)
    }
}

/// Reply of `GET /videos/count`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountReply {
    #[serde(default)]
    pub count: u64,
}

/// One record of `GET /videos`. The documented shape is an object; the reference
/// backend returns bare file names, so both are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawVideoRecord {
    Detailed {
        name: String,
        #[serde(default)]
        creation_date: Option<String>,
    },
    Bare(String),
}

impl RawVideoRecord {
    pub fn name(&self) -> &str {
        match self {
            RawVideoRecord::Detailed { name, .. } => name,
            RawVideoRecord::Bare(name) => name,
        }
    }

    pub fn creation_date(&self) -> Option<&str> {
        match self {
            RawVideoRecord::Detailed { creation_date, .. } => creation_date.as_deref(),
            RawVideoRecord::Bare(_) => None,
        }
    }
}

/// Reply of `/rename-video` and `/delete-video`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply of `/upload` and `/stream`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Reply of `/check_key`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessReply {
    #[serde(default)]
    pub access: String,
}

impl AccessReply {
    pub fn granted(&self) -> bool {
        self.access == "granted"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceKind {
    /// HTML directory index plus one HEAD request per file.
    #[default]
    StaticListing,
    /// `/videos/count` + `/videos` with server-side filtering.
    PaginatedApi,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::StaticListing => "static",
            SourceKind::PaginatedApi => "api",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "static" | "listing" => Some(SourceKind::StaticListing),
            "api" | "paginated" => Some(SourceKind::PaginatedApi),
            _ => None,
        }
    }
}

/// Everything the core needs to talk to a backend and drive the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Origin of `/check_key`; empty means `base_url`.
    #[serde(default)]
    pub auth_url: String,
    #[serde(default)]
    pub source: SourceKind,
    pub listing_path: String,
    pub video_extensions: Vec<String>,
    pub page_size: usize,
    pub batch_size: usize,
    pub thumbnail_seek_secs: f32,
    /// 0 = no cap on concurrent frame grabs.
    pub thumbnail_parallel: usize,
    pub ffmpeg_path: String,
    pub head_parallel: usize,
    pub request_timeout_secs: u64,
    pub upload_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            auth_url: String::new(),
            source: SourceKind::StaticListing,
            listing_path: "/streams_src/".to_string(),
            video_extensions: vec!["mp4".to_string()],
            page_size: 10,
            batch_size: 20,
            thumbnail_seek_secs: 5.0,
            thumbnail_parallel: 0,
            ffmpeg_path: "ffmpeg".to_string(),
            head_parallel: 8,
            request_timeout_secs: 30,
            upload_timeout_secs: 600,
        }
    }
}

impl ClientConfig {
    pub fn auth_base(&self) -> &str {
        if self.auth_url.trim().is_empty() { &self.base_url } else { &self.auth_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_decoded_last_segment() {
        let e = VideoEntry::new("http://h/streams_src/my%20clip.mp4", "my clip", 0);
        assert_eq!(e.file_name(), "my clip.mp4");
        assert_eq!(e.extension().as_deref(), Some(".mp4"));
    }

    #[test]
    fn test_renamed_swaps_last_segment() {
        let e = VideoEntry::new("http://h:5000/gallery/video/clip1.mp4", "clip1", 42);
        let r = e.renamed("my trip.mp4", "my trip");
        assert_eq!(r.url, "http://h:5000/gallery/video/my%20trip.mp4");
        assert_eq!(r.file_name(), "my trip.mp4");
        assert_eq!(r.display_name, "my trip");
        assert_eq!(r.last_modified, 42);
        let q = VideoEntry::new("http://h/abs/other.mp4?dl=1", "other", 0).renamed("new.mp4", "new");
        assert_eq!(q.url, "http://h/abs/new.mp4?dl=1");
    }

    #[test]
    fn test_record_shapes() {
        let v: Vec<RawVideoRecord> = serde_json::from_str(
            r#"[{"name":"a.mp4","creation_date":"2024-01-02"},"b.mp4",{"name":"c.mp4"}]"#,
        )
        .unwrap();
        assert_eq!(v[0].name(), "a.mp4");
        assert_eq!(v[0].creation_date(), Some("2024-01-02"));
        assert_eq!(v[1].name(), "b.mp4");
        assert_eq!(v[1].creation_date(), None);
        assert_eq!(v[2].creation_date(), None);
    }

    #[test]
    fn test_access_reply() {
        let ok: AccessReply = serde_json::from_str(r#"{"access":"granted"}"#).unwrap();
        let no: AccessReply = serde_json::from_str(r#"{"access":"denied"}"#).unwrap();
        assert!(ok.granted());
        assert!(!no.granted());
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!(SourceKind::parse("API"), Some(SourceKind::PaginatedApi));
        assert_eq!(SourceKind::parse("static"), Some(SourceKind::StaticListing));
        assert_eq!(SourceKind::parse("ftp"), None);
    }
}
