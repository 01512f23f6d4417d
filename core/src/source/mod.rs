//! Catalog backends.
//!
//! Two backends sit behind [`VideoSource`]: a static directory index
//! ([`StaticListingSource`]) and the paginated JSON API ([`PaginatedSource`]).
//! Everything downstream (catalog, renderer, thumbnails) is backend-agnostic.

mod listing;
mod paginated;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{ClientConfig, SourceKind, VideoEntry};

pub use listing::{parse_listing, ListingLink, StaticListingSource};
pub use paginated::{entry_from_record, PaginatedSource};

/// Where the search filter is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Entries are fetched once and hidden locally.
    Client,
    /// The filter is sent with every fetch.
    Server,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub filter: String,
    pub page: usize,
    pub page_size: usize,
}

impl CatalogQuery {
    pub fn offset(&self) -> usize {
        self.page * self.page_size
    }
}

/// One fetched page, already sorted newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    pub entries: Vec<VideoEntry>,
    pub total_count: usize,
}

#[async_trait]
pub trait VideoSource: Send + Sync {
    fn filter_mode(&self) -> FilterMode;

    async fn fetch(&self, query: &CatalogQuery) -> Result<CatalogPage>;
}

/// Newest first; entries with equal stamps keep their fetch order.
pub fn sort_newest_first(entries: &mut [VideoEntry]) {
    entries.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
}

pub fn build_source(cfg: &ClientConfig, client: Arc<HttpClient>) -> Arc<dyn VideoSource> {
    match cfg.source {
        SourceKind::StaticListing => Arc::new(StaticListingSource::new(
            client,
            cfg.listing_path.clone(),
            cfg.video_extensions.clone(),
            cfg.head_parallel,
        )),
        SourceKind::PaginatedApi => Arc::new(PaginatedSource::new(client)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut v = vec![
            VideoEntry::new("u1", "a", 10),
            VideoEntry::new("u2", "b", 30),
            VideoEntry::new("u3", "c", 10),
            VideoEntry::new("u4", "d", 0),
        ];
        sort_newest_first(&mut v);
        let names: Vec<_> = v.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_offset() {
        let q = CatalogQuery { filter: String::new(), page: 3, page_size: 10 };
        assert_eq!(q.offset(), 30);
    }
}
