//! Frame grabbing with ffmpeg and scaling onto the 80x45 list canvas.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::imageops::FilterType;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::{GalleryError, Result};
use crate::render::ItemId;

pub const THUMB_WIDTH: u32 = 80;
pub const THUMB_HEIGHT: u32 = 45;

/// Frames this far in are rarely the black lead-in.
pub const SEEK_OFFSET_SECS: f32 = 5.0;

/// Upper bound for one grab so a stalled stream cannot pin a decoder forever.
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed-size RGBA pixel buffer shown next to a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailCanvas {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ThumbnailCanvas {
    pub fn blank(width: u32, height: u32) -> Self {
        Self { width, height, rgba: vec![0; (width * height * 4) as usize] }
    }

    /// Decodes an encoded frame (PNG/JPEG) and stretches it onto the canvas.
    pub fn from_encoded(bytes: &[u8], width: u32, height: u32) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        let scaled = img.resize_exact(width, height, FilterType::Triangle).to_rgba8();
        Ok(Self { width, height, rgba: scaled.into_raw() })
    }
}

/// Produces one encoded still frame of a video.
#[async_trait]
pub trait FrameGrabber: Send + Sync {
    async fn grab(&self, url: &str, at: Duration) -> Result<Vec<u8>>;
}

/// Grabs frames by running `ffmpeg` against the video URL.
#[derive(Debug, Clone)]
pub struct FfmpegGrabber {
    program: String,
}

impl FfmpegGrabber {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self { program: if program.trim().is_empty() { "ffmpeg".to_string() } else { program } }
    }

    fn args(url: &str, at: Duration) -> Vec<String> {
        vec![
            "-v".into(),
            "error".into(),
            "-ss".into(),
            format!("{:.3}", at.as_secs_f64()),
            "-i".into(),
            url.into(),
            "-frames:v".into(),
            "1".into(),
            "-f".into(),
            "image2pipe".into(),
            "-vcodec".into(),
            "png".into(),
            "pipe:1".into(),
        ]
    }
}

#[async_trait]
impl FrameGrabber for FfmpegGrabber {
    async fn grab(&self, url: &str, at: Duration) -> Result<Vec<u8>> {
        let output = tokio::process::Command::new(&self.program)
            .args(Self::args(url, at))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;
        if !output.status.success() || output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GalleryError::Capture(format!("{} exited with {}: {}", self.program, output.status, stderr.trim())));
        }
        Ok(output.stdout)
    }
}

/// Outcome of one capture, tagged with the item it belongs to.
#[derive(Debug, Clone)]
pub struct ThumbnailReady {
    pub id: ItemId,
    pub result: std::result::Result<ThumbnailCanvas, String>,
}

/// Runs frame grabs as independent tasks, optionally capped by a semaphore.
#[derive(Clone)]
pub struct ThumbnailCapturer {
    grabber: Arc<dyn FrameGrabber>,
    seek: Duration,
    limit: Option<Arc<Semaphore>>,
}

impl ThumbnailCapturer {
    /// `parallel == 0` leaves concurrency unbounded.
    pub fn new(grabber: Arc<dyn FrameGrabber>, seek_secs: f32, parallel: usize) -> Self {
        Self {
            grabber,
            seek: Duration::from_secs_f32(seek_secs.max(0.0)),
            limit: (parallel > 0).then(|| Arc::new(Semaphore::new(parallel))),
        }
    }

    pub async fn capture(&self, url: &str) -> Result<ThumbnailCanvas> {
        let _permit = match &self.limit {
            Some(sem) => Some(sem.acquire().await.map_err(|e| GalleryError::Capture(e.to_string()))?),
            None => None,
        };
        trace!(url, seek = ?self.seek, "Grabbing frame");
        let bytes = tokio::time::timeout(CAPTURE_TIMEOUT, self.grabber.grab(url, self.seek))
            .await
            .map_err(|_| GalleryError::Capture(format!("timed out after {:?}", CAPTURE_TIMEOUT)))??;
        ThumbnailCanvas::from_encoded(&bytes, THUMB_WIDTH, THUMB_HEIGHT)
    }

    /// Captures in the background and hands the result to `on_done`. Failures
    /// are delivered as `Err` and never abort other captures.
    pub fn spawn_capture<F>(&self, id: ItemId, url: String, on_done: F) -> JoinHandle<()>
    where
        F: FnOnce(ThumbnailReady) + Send + 'static,
    {
        let this = self.clone();
        tokio::spawn(async move {
            let result = this.capture(&url).await.map_err(|e| {
                debug!(url = %url, error = %e, "Thumbnail capture failed");
                e.to_string()
            });
            on_done(ThumbnailReady { id, result });
        })
    }
}
