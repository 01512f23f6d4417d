use std::path::PathBuf;

use vidshelf_core::{ActionOutcome, CatalogPage, GalleryError, LoadTicket, ThumbnailReady, UploadRequest, VideoEntry};

/// Results sent back from background tasks to the UI thread.
#[derive(Debug)]
pub enum Msg {
    CatalogLoaded {
        ticket: LoadTicket,
        result: Result<CatalogPage, GalleryError>,
    },
    ThumbnailReady(ThumbnailReady),
    AccessChecked(ActionOutcome),
    /// Rename or delete finished.
    ActionFinished(ActionOutcome),
    UploadFinished(ActionOutcome),
    RecordingFinished(ActionOutcome),
}

/// At most one modal is open at a time.
#[derive(Debug, Clone, Default)]
pub enum Dialog {
    #[default]
    None,
    Rename {
        entry: VideoEntry,
        input: String,
    },
    ConfirmDelete {
        entry: VideoEntry,
    },
    Alert(String),
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: StatusKind::Info }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: StatusKind::Success }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: StatusKind::Error }
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub request: UploadRequest,
    pub in_flight: bool,
    pub status: Option<StatusLine>,
}

impl UploadForm {
    pub fn pick(&mut self, file: PathBuf, default_title: String) {
        if self.request.title.trim().is_empty() {
            self.request.title = default_title;
        }
        self.request.file = Some(file);
    }
}

#[derive(Debug, Default)]
pub struct AccessGate {
    pub granted: bool,
    pub key_input: String,
    pub checking: bool,
}

#[derive(Debug, Default)]
pub struct RecordingForm {
    pub stream_key: String,
    pub in_flight: bool,
    pub status: Option<StatusLine>,
}
