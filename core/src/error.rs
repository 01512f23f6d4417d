use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("thumbnail capture failed: {0}")]
    Capture(String),

    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("player error: {0}")]
    Player(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
