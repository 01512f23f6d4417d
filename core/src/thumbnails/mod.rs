//! Lazy thumbnail pipeline.
//!
//! - `VisibilityWatcher` - reports each rendered item the first time it becomes visible
//! - `ThumbnailCapturer` - grabs one frame per reported item and scales it to the list canvas

pub mod capture;
pub mod watcher;

pub use capture::{
    FfmpegGrabber, FrameGrabber, ThumbnailCanvas, ThumbnailCapturer, ThumbnailReady, SEEK_OFFSET_SECS, THUMB_HEIGHT,
    THUMB_WIDTH,
};
pub use watcher::{intersection_ratio, VisibilityWatcher, INTERSECTION_THRESHOLD};
