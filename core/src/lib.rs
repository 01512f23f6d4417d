//! Headless core of the video gallery: catalog loading, incremental rendering,
//! lazy thumbnails, playback selection and management actions.

pub mod actions;
pub mod catalog;
pub mod error;
pub mod gallery;
pub mod helpers;
pub mod http;
pub mod models;
pub mod player;
pub mod render;
pub mod source;
pub mod thumbnails;

pub use actions::{ActionOutcome, ManagementApi, Rejection, UploadRequest};
pub use catalog::{CatalogState, LoadOutcome, LoadTicket};
pub use error::{GalleryError, Result};
pub use gallery::{FilterEffect, Gallery};
pub use http::HttpClient;
pub use models::*;
pub use player::{ExternalPlayer, PlaybackBackend, PlayerPanel};
pub use render::{IncrementalRenderer, ItemId, RenderedItem, ScrollMetrics, ThumbnailSlot};
pub use source::{build_source, CatalogPage, CatalogQuery, FilterMode, VideoSource};
pub use thumbnails::{FfmpegGrabber, ThumbnailCanvas, ThumbnailCapturer, ThumbnailReady, VisibilityWatcher};
