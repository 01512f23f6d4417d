use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use super::{sort_newest_first, CatalogPage, CatalogQuery, FilterMode, VideoSource};
use crate::error::{GalleryError, Result};
use crate::helpers::{display_name_from_file, has_video_extension, parse_http_date};
use crate::http::HttpClient;
use crate::models::VideoEntry;

/// A video anchor found in a directory index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLink {
    pub url: Url,
    pub display_name: String,
}

/// Collects anchors whose href ends in one of `extensions`, resolved against `base`.
/// Order follows the document; duplicate targets are kept once.
pub fn parse_listing(html: &str, base: &Url, extensions: &[String]) -> Vec<ListingLink> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let mut out: Vec<ListingLink> = Vec::new();
    for a in document.select(&selector) {
        let Some(href) = a.value().attr("href") else { continue };
        let path_part = href.split(['?', '#']).next().unwrap_or_default();
        if !has_video_extension(path_part, extensions) {
            continue;
        }
        let Ok(url) = base.join(href) else { continue };
        if out.iter().any(|l| l.url == url) {
            continue;
        }
        let last = url
            .path_segments()
            .and_then(|mut segs| segs.next_back())
            .unwrap_or_default()
            .to_string();
        out.push(ListingLink { display_name: display_name_from_file(&last), url });
    }
    out
}

pub struct StaticListingSource {
    client: Arc<HttpClient>,
    listing_path: String,
    extensions: Vec<String>,
    head_parallel: usize,
}

impl StaticListingSource {
    pub fn new(client: Arc<HttpClient>, listing_path: String, extensions: Vec<String>, head_parallel: usize) -> Self {
        Self { client, listing_path, extensions, head_parallel: head_parallel.max(1) }
    }

    async fn last_modified(&self, url: &Url) -> Result<i64> {
        let header = self.client.head_last_modified(url).await?;
        Ok(header.as_deref().and_then(parse_http_date).unwrap_or(0))
    }
}

#[async_trait]
impl VideoSource for StaticListingSource {
    fn filter_mode(&self) -> FilterMode {
        FilterMode::Client
    }

    /// The whole index is one page; `query` is ignored because filtering happens locally.
    async fn fetch(&self, _query: &CatalogQuery) -> Result<CatalogPage> {
        let listing_url = self.client.endpoint(&self.listing_path)?;
        let html = self.client.get_text(listing_url.clone()).await?;
        let links = parse_listing(&html, &listing_url, &self.extensions);
        debug!(count = links.len(), "Parsed directory listing");

        let mut entries: Vec<VideoEntry> = stream::iter(links.into_iter().map(move |link| async move {
            let stamp = self.last_modified(&link.url).await?;
            Ok::<_, GalleryError>(VideoEntry::new(link.url.to_string(), link.display_name, stamp))
        }))
        .buffered(self.head_parallel)
        .try_collect()
        .await?;

        sort_newest_first(&mut entries);
        info!(count = entries.len(), "Loaded static listing");
        let total_count = entries.len();
        Ok(CatalogPage { entries, total_count })
    }
}
