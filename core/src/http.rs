use std::time::Duration;

use reqwest::header::LAST_MODIFIED;
use reqwest::{multipart, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::error::{GalleryError, Result};
use crate::models::ClientConfig;

/// Thin reqwest wrapper that knows the backend origins and the reply conventions
/// (JSON bodies even on error statuses).
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: String,
    auth_base: String,
    upload_timeout: Duration,
}

impl HttpClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("vidshelf/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.request_timeout_secs.max(1)))
            .build()?;
        let base = normalize_base(&cfg.base_url);
        let auth_base = normalize_base(cfg.auth_base());
        // Fail early on an unusable origin rather than on the first request.
        Url::parse(&base)?;
        Url::parse(&auth_base)?;
        Ok(Self {
            client,
            base,
            auth_base,
            upload_timeout: Duration::from_secs(cfg.upload_timeout_secs.max(1)),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URL for a root-relative path such as `/videos/count`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base, path))?)
    }

    pub fn auth_endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.auth_base, path))?)
    }

    pub async fn get_text(&self, url: Url) -> Result<String> {
        trace!(%url, "GET");
        let res = check_status(self.client.get(url).send().await?)?;
        Ok(res.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        trace!(%url, "GET json");
        let res = check_status(self.client.get(url).send().await?)?;
        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|e| GalleryError::Malformed(e.to_string()))
    }

    /// Value of `Last-Modified`, or `None` when the header is missing or the
    /// server answered with an error status.
    pub async fn head_last_modified(&self, url: &Url) -> Result<Option<String>> {
        let res = self.client.head(url.clone()).send().await?;
        if !res.status().is_success() {
            debug!(%url, status = res.status().as_u16(), "HEAD without success status");
            return Ok(None);
        }
        Ok(res
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()))
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, url: Url, body: &B) -> Result<T> {
        trace!(%url, "POST json");
        let res = self.client.post(url).json(body).send().await?;
        read_reply(res).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        trace!(%url, "POST");
        let res = self.client.post(url).send().await?;
        read_reply(res).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, url: Url, form: multipart::Form) -> Result<T> {
        trace!(%url, "POST multipart");
        let res = self
            .client
            .post(url)
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await?;
        read_reply(res).await
    }
}

fn normalize_base(addr: &str) -> String {
    let a = addr.trim().trim_end_matches('/').to_string();
    if !a.starts_with("http://") && !a.starts_with("https://") {
        format!("http://{}", a)
    } else {
        a
    }
}

fn check_status(res: Response) -> Result<Response> {
    if res.status().is_success() {
        Ok(res)
    } else {
        Err(GalleryError::Status { status: res.status().as_u16(), url: res.url().to_string() })
    }
}

/// The backend answers mutations with JSON on both success and failure
/// (`404 {"error": ...}`, `403 {"access": "denied"}`), so the body wins over the status.
async fn read_reply<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let url = res.url().to_string();
    let body = res.text().await?;
    match serde_json::from_str::<T>(&body) {
        Ok(v) => Ok(v),
        Err(_) if !status.is_success() => Err(GalleryError::Status { status: status.as_u16(), url }),
        Err(e) => Err(GalleryError::Malformed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("localhost:5000/"), "http://localhost:5000");
        assert_eq!(normalize_base(" https://h/app/ "), "https://h/app");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let cfg = ClientConfig { base_url: "http://h:5000/gallery".into(), ..Default::default() };
        let c = HttpClient::new(&cfg).unwrap();
        assert_eq!(c.endpoint("/videos/count").unwrap().as_str(), "http://h:5000/gallery/videos/count");
        assert_eq!(
            c.endpoint("/video:download/a.mp4").unwrap().as_str(),
            "http://h:5000/gallery/video:download/a.mp4"
        );
    }

    #[test]
    fn test_auth_endpoint_defaults_to_base() {
        let cfg = ClientConfig { base_url: "http://h".into(), ..Default::default() };
        let c = HttpClient::new(&cfg).unwrap();
        assert_eq!(c.auth_endpoint("/check_key").unwrap().as_str(), "http://h/check_key");
        let cfg = ClientConfig { base_url: "http://h".into(), auth_url: "http://h:5000".into(), ..Default::default() };
        let c = HttpClient::new(&cfg).unwrap();
        assert_eq!(c.auth_endpoint("/check_key").unwrap().as_str(), "http://h:5000/check_key");
    }
}
