//! Composition root for the list pipeline: catalog state, renderer and
//! visibility watcher owned together so the UI drives them through one object.

use tracing::debug;

use crate::catalog::{CatalogState, LoadOutcome, LoadTicket};
use crate::error::Result;
use crate::models::VideoEntry;
use crate::render::{IncrementalRenderer, ItemId, RenderedItem, ScrollMetrics, ThumbnailSlot};
use crate::source::{CatalogPage, FilterMode, VideoSource};
use crate::thumbnails::{ThumbnailReady, VisibilityWatcher};

/// What the caller has to do after a filter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEffect {
    Unchanged,
    /// Rendered items were re-filtered locally.
    Refiltered,
    /// The backend filters; start a new load.
    Refetch,
}

#[derive(Debug)]
pub struct Gallery {
    catalog: CatalogState,
    renderer: IncrementalRenderer,
    watcher: VisibilityWatcher,
}

impl Gallery {
    pub fn new(page_size: usize, batch_size: usize, filter_mode: FilterMode) -> Self {
        Self {
            catalog: CatalogState::new(page_size, filter_mode),
            renderer: IncrementalRenderer::new(batch_size),
            watcher: VisibilityWatcher::default(),
        }
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn renderer(&self) -> &IncrementalRenderer {
        &self.renderer
    }

    pub fn watcher(&self) -> &VisibilityWatcher {
        &self.watcher
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &RenderedItem> {
        self.renderer.items().iter().filter(|i| i.visible)
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.catalog.begin_load()
    }

    /// Applies a load result. On success the rendered list is rebuilt from
    /// scratch and the first batch is drawn.
    pub fn finish_load(&mut self, ticket: &LoadTicket, result: Result<CatalogPage>) -> LoadOutcome {
        let outcome = self.catalog.apply(ticket, result);
        if let LoadOutcome::Applied { .. } = outcome {
            self.renderer.clear(self.catalog.generation());
            self.watcher.clear();
            self.renderer.render_next_batch(&mut self.catalog, &mut self.watcher);
        }
        outcome
    }

    pub fn render_next_batch(&mut self) -> usize {
        self.renderer.render_next_batch(&mut self.catalog, &mut self.watcher)
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> usize {
        self.renderer.on_scroll(metrics, &mut self.catalog, &mut self.watcher)
    }

    /// Feeds a visibility sample; returns the item and its URL when a capture
    /// should start.
    pub fn report_intersection(&mut self, id: ItemId, ratio: f32) -> Option<(ItemId, String)> {
        let visible = self.watcher.report(id, ratio)?;
        self.renderer.item(visible).map(|item| (visible, item.entry.url.clone()))
    }

    pub fn set_thumbnail(&mut self, ready: ThumbnailReady) -> bool {
        let slot = match ready.result {
            Ok(canvas) => ThumbnailSlot::Ready(canvas),
            Err(_) => ThumbnailSlot::Failed,
        };
        self.renderer.set_thumbnail(ready.id, slot)
    }

    pub fn set_filter(&mut self, text: &str) -> FilterEffect {
        if !self.catalog.set_filter(text) {
            return FilterEffect::Unchanged;
        }
        debug!(filter = text, "Filter changed");
        match self.catalog.filter_mode() {
            FilterMode::Client => {
                self.renderer.apply_filter(&self.catalog);
                FilterEffect::Refiltered
            }
            FilterMode::Server => FilterEffect::Refetch,
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.catalog.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.catalog.prev_page()
    }

    pub fn set_page(&mut self, page: usize) -> bool {
        self.catalog.set_page(page)
    }

    pub fn activate(&self, id: ItemId) -> Option<VideoEntry> {
        self.renderer.activate(id)
    }
}

/// Full load against `source`, applied through the generation guard.
pub async fn reload(gallery: &mut Gallery, source: &dyn VideoSource) -> LoadOutcome {
    let ticket = gallery.begin_load();
    let result = source.fetch(ticket.query()).await;
    gallery.finish_load(&ticket, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;
    use crate::source::CatalogQuery;
    use crate::thumbnails::ThumbnailCanvas;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct FixedSource {
        mode: FilterMode,
        entries: Vec<VideoEntry>,
        fail: Mutex<bool>,
        queries: Mutex<Vec<CatalogQuery>>,
    }

    impl FixedSource {
        fn new(mode: FilterMode, n: usize) -> Self {
            let entries = (0..n)
                .map(|i| VideoEntry::new(format!("http://h/{i}.mp4"), format!("clip{i}"), (i as i64) * 1000))
                .collect();
            Self { mode, entries, fail: Mutex::new(false), queries: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl VideoSource for FixedSource {
        fn filter_mode(&self) -> FilterMode {
            self.mode
        }

        async fn fetch(&self, query: &CatalogQuery) -> Result<CatalogPage> {
            self.queries.lock().unwrap().push(query.clone());
            if *self.fail.lock().unwrap() {
                return Err(GalleryError::Status { status: 502, url: "http://h/".into() });
            }
            let needle = query.filter.to_lowercase();
            let matching: Vec<_> =
                self.entries.iter().filter(|e| e.display_name.to_lowercase().contains(&needle)).cloned().collect();
            let total_count = matching.len();
            let page = match self.mode {
                FilterMode::Client => matching,
                FilterMode::Server => matching.into_iter().skip(query.offset()).take(query.page_size).collect(),
            };
            Ok(CatalogPage { entries: page, total_count })
        }
    }

    #[tokio::test]
    async fn test_reload_renders_first_batch_sorted() {
        let source = FixedSource::new(FilterMode::Client, 45);
        let mut g = Gallery::new(10, 6, FilterMode::Client);
        assert_eq!(reload(&mut g, &source).await, LoadOutcome::Applied { count: 45 });
        assert_eq!(g.renderer().len(), 6);
        let stamps: Vec<_> = g.catalog().entries().iter().map(|e| e.last_modified).collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(g.renderer().items()[0].entry.display_name, "clip44");
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_rendered_list() {
        let source = FixedSource::new(FilterMode::Client, 8);
        let mut g = Gallery::new(10, 5, FilterMode::Client);
        reload(&mut g, &source).await;
        *source.fail.lock().unwrap() = true;
        assert!(matches!(reload(&mut g, &source).await, LoadOutcome::Failed(_)));
        assert_eq!(g.renderer().len(), 5);
        assert_eq!(g.catalog().entries().len(), 8);
    }

    #[tokio::test]
    async fn test_client_filter_toggles_visibility_without_removal() {
        let source = FixedSource::new(FilterMode::Client, 12);
        let mut g = Gallery::new(10, 20, FilterMode::Client);
        reload(&mut g, &source).await;
        assert_eq!(g.set_filter("CLIP1"), FilterEffect::Refiltered);
        assert_eq!(g.renderer().len(), 12);
        let shown: Vec<_> = g.visible_items().map(|i| i.entry.display_name.as_str()).collect();
        assert_eq!(shown, vec!["clip11", "clip10", "clip1"]);
        assert_eq!(g.set_filter("CLIP1"), FilterEffect::Unchanged);
        assert_eq!(source.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_server_filter_refetches_from_page_zero() {
        let source = FixedSource::new(FilterMode::Server, 30);
        let mut g = Gallery::new(10, 20, FilterMode::Server);
        reload(&mut g, &source).await;
        assert!(g.next_page());
        reload(&mut g, &source).await;
        assert_eq!(g.catalog().page(), 1);
        assert_eq!(g.set_filter("clip2"), FilterEffect::Refetch);
        assert_eq!(g.catalog().page(), 0);
        reload(&mut g, &source).await;
        let last = source.queries.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last, CatalogQuery { filter: "clip2".into(), page: 0, page_size: 10 });
        assert_eq!(g.catalog().total_count(), 11);
        assert_eq!(g.catalog().total_pages(), 2);
    }

    #[tokio::test]
    async fn test_page_change_clears_rendered_output() {
        let source = FixedSource::new(FilterMode::Server, 25);
        let mut g = Gallery::new(10, 4, FilterMode::Server);
        reload(&mut g, &source).await;
        g.render_next_batch();
        assert_eq!(g.renderer().len(), 8);
        assert!(g.next_page());
        reload(&mut g, &source).await;
        assert_eq!(g.renderer().len(), 4);
        assert_eq!(g.catalog().loaded_count(), 4);
    }

    fn assert_rendered_once(g: &Gallery) {
        let ids: HashSet<ItemId> = g.renderer().items().iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), g.renderer().len());
    }

    #[tokio::test]
    async fn test_failed_page_load_continues_old_page() {
        let source = FixedSource::new(FilterMode::Server, 25);
        let mut g = Gallery::new(10, 4, FilterMode::Server);
        reload(&mut g, &source).await;
        assert!(g.next_page());
        *source.fail.lock().unwrap() = true;
        assert!(matches!(reload(&mut g, &source).await, LoadOutcome::Failed(_)));
        assert_eq!(g.catalog().page(), 0);
        assert_eq!(g.render_next_batch(), 4);
        let indexes: Vec<_> = g.renderer().items().iter().map(|i| i.id.index).collect();
        assert_eq!(indexes, (0..8).collect::<Vec<_>>());
        assert_rendered_once(&g);
        assert!(g.catalog().loaded_count() <= g.catalog().entries().len());
    }

    #[tokio::test]
    async fn test_scrolling_during_server_filter_refetch() {
        let source = FixedSource::new(FilterMode::Server, 25);
        let mut g = Gallery::new(10, 4, FilterMode::Server);
        reload(&mut g, &source).await;
        assert_eq!(g.set_filter("c"), FilterEffect::Refetch);
        let ticket = g.begin_load();
        g.render_next_batch();
        assert_rendered_once(&g);
        assert_eq!(g.renderer().len(), 8);
        assert_eq!(g.catalog().loaded_count(), 8);

        let outcome = g.finish_load(&ticket, Err(GalleryError::Status { status: 500, url: "http://h/".into() }));
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(g.render_next_batch(), 2);
        assert_rendered_once(&g);
        assert_eq!(g.renderer().len(), 10);
    }

    #[tokio::test]
    async fn test_thumbnails_fire_once_and_old_results_are_ignored() {
        let source = FixedSource::new(FilterMode::Client, 3);
        let mut g = Gallery::new(10, 10, FilterMode::Client);
        reload(&mut g, &source).await;
        let id = g.renderer().items()[0].id;
        let first = g.report_intersection(id, 1.0);
        assert_eq!(first.map(|(_, url)| url), Some("http://h/2.mp4".to_string()));
        assert!(g.report_intersection(id, 1.0).is_none());

        reload(&mut g, &source).await;
        let late = ThumbnailReady { id, result: Ok(ThumbnailCanvas::blank(80, 45)) };
        assert!(!g.set_thumbnail(late));
        let fresh = g.renderer().items()[0].id;
        assert_ne!(fresh, id);
        assert!(g.set_thumbnail(ThumbnailReady { id: fresh, result: Err("decode".into()) }));
        assert_eq!(g.renderer().items()[0].thumbnail, ThumbnailSlot::Failed);
    }

    #[tokio::test]
    async fn test_superseded_load_is_dropped() {
        let source = FixedSource::new(FilterMode::Server, 30);
        let mut g = Gallery::new(10, 20, FilterMode::Server);
        let slow = g.begin_load();
        g.set_filter("clip1");
        let fast = g.begin_load();
        let fast_result = source.fetch(fast.query()).await;
        assert!(matches!(g.finish_load(&fast, fast_result), LoadOutcome::Applied { .. }));
        let slow_result = source.fetch(slow.query()).await;
        assert_eq!(g.finish_load(&slow, slow_result), LoadOutcome::Stale);
        assert!(g.catalog().entries().iter().all(|e| e.display_name.contains("clip1")));
    }
}
