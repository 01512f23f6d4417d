use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{sort_newest_first, CatalogPage, CatalogQuery, FilterMode, VideoSource};
use crate::error::Result;
use crate::helpers::{parse_iso_date, strip_extension};
use crate::http::HttpClient;
use crate::models::{CountReply, RawVideoRecord, VideoEntry};

pub struct PaginatedSource {
    client: Arc<HttpClient>,
}

impl PaginatedSource {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

/// Maps a `/videos` record onto an entry served from `/video/<name>`.
pub fn entry_from_record(client: &HttpClient, record: &RawVideoRecord) -> Result<VideoEntry> {
    let name = record.name();
    let url = client.endpoint(&format!("/video/{}", urlencoding::encode(name)))?;
    let stamp = record.creation_date().and_then(parse_iso_date).unwrap_or(0);
    Ok(VideoEntry::new(url.to_string(), strip_extension(name), stamp))
}

#[async_trait]
impl VideoSource for PaginatedSource {
    fn filter_mode(&self) -> FilterMode {
        FilterMode::Server
    }

    async fn fetch(&self, query: &CatalogQuery) -> Result<CatalogPage> {
        let mut count_url = self.client.endpoint("/videos/count")?;
        count_url.query_pairs_mut().append_pair("query", &query.filter);
        let count: CountReply = self.client.get_json(count_url).await?;

        let mut list_url = self.client.endpoint("/videos")?;
        list_url
            .query_pairs_mut()
            .append_pair("offset", &query.offset().to_string())
            .append_pair("limit", &query.page_size.to_string())
            .append_pair("query", &query.filter);
        let records: Vec<RawVideoRecord> = self.client.get_json(list_url).await?;

        let mut entries = records
            .iter()
            .map(|r| entry_from_record(&self.client, r))
            .collect::<Result<Vec<_>>>()?;
        sort_newest_first(&mut entries);

        info!(page = query.page, count = entries.len(), total = count.count, "Loaded catalog page");
        Ok(CatalogPage { entries, total_count: count.count as usize })
    }
}
