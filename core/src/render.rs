//! Incremental list rendering.
//!
//! The renderer keeps the projection of the catalog that the UI actually draws.
//! It grows one batch at a time: once on load and again whenever the list
//! container is scrolled to within [`SCROLL_THRESHOLD_PX`] of its bottom.

use tracing::trace;

use crate::catalog::CatalogState;
use crate::models::VideoEntry;
use crate::thumbnails::{ThumbnailCanvas, VisibilityWatcher};

pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Distance from the bottom of the list, in pixels, that triggers the next batch.
pub const SCROLL_THRESHOLD_PX: f32 = 10.0;

/// Identifies a rendered item within one list generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId {
    pub generation: u64,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailSlot {
    Blank,
    Ready(ThumbnailCanvas),
    /// Capture failed; the slot stays blank for good.
    Failed,
}

#[derive(Debug, Clone)]
pub struct RenderedItem {
    pub id: ItemId,
    pub entry: VideoEntry,
    pub thumbnail: ThumbnailSlot,
    /// Client-side filter result. Hidden items stay in the list.
    pub visible: bool,
}

/// Geometry of the scrollable list container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f32,
    pub viewport_height: f32,
    pub content_height: f32,
}

impl ScrollMetrics {
    pub fn distance_to_bottom(&self) -> f32 {
        (self.content_height - (self.offset + self.viewport_height)).max(0.0)
    }

    pub fn near_bottom(&self) -> bool {
        self.distance_to_bottom() <= SCROLL_THRESHOLD_PX
    }
}

#[derive(Debug)]
pub struct IncrementalRenderer {
    items: Vec<RenderedItem>,
    batch_size: usize,
    generation: u64,
}

impl IncrementalRenderer {
    pub fn new(batch_size: usize) -> Self {
        Self { items: Vec::new(), batch_size: batch_size.max(1), generation: 0 }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn items(&self) -> &[RenderedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every rendered item; new items will belong to `generation`.
    pub fn clear(&mut self, generation: u64) {
        self.items.clear();
        self.generation = generation;
    }

    /// Appends the next batch from `catalog` and registers each new item with
    /// `watcher`. Returns the number of items appended.
    pub fn render_next_batch(&mut self, catalog: &mut CatalogState, watcher: &mut VisibilityWatcher) -> usize {
        let range = catalog.next_batch(self.batch_size);
        let start = range.start;
        let mut appended = 0;
        for (offset, entry) in catalog.entries()[range].iter().enumerate() {
            let id = ItemId { generation: self.generation, index: start + offset };
            watcher.observe(id);
            self.items.push(RenderedItem {
                id,
                entry: entry.clone(),
                thumbnail: ThumbnailSlot::Blank,
                visible: catalog.matches(entry),
            });
            appended += 1;
        }
        trace!(appended, total = self.items.len(), cursor = catalog.loaded_count(), "Rendered batch");
        appended
    }

    /// Renders another batch if the list is scrolled close enough to its bottom.
    pub fn on_scroll(
        &mut self,
        metrics: ScrollMetrics,
        catalog: &mut CatalogState,
        watcher: &mut VisibilityWatcher,
    ) -> usize {
        if !metrics.near_bottom() {
            return 0;
        }
        self.render_next_batch(catalog, watcher)
    }

    /// Re-evaluates the client-side filter on every rendered item.
    pub fn apply_filter(&mut self, catalog: &CatalogState) {
        for item in &mut self.items {
            item.visible = catalog.matches(&item.entry);
        }
    }

    pub fn item(&self, id: ItemId) -> Option<&RenderedItem> {
        if id.generation != self.generation {
            return None;
        }
        self.items.iter().find(|i| i.id == id)
    }

    /// Entry behind a clicked item, for the player panel.
    pub fn activate(&self, id: ItemId) -> Option<VideoEntry> {
        self.item(id).map(|i| i.entry.clone())
    }

    /// Stores a capture result. Results for a discarded list are ignored.
    pub fn set_thumbnail(&mut self, id: ItemId, slot: ThumbnailSlot) -> bool {
        if id.generation != self.generation {
            return false;
        }
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.thumbnail = slot;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CatalogPage, FilterMode};

    fn catalog(n: usize) -> CatalogState {
        let mut c = CatalogState::new(100, FilterMode::Client);
        let t = c.begin_load();
        let entries = (0..n).map(|i| VideoEntry::new(format!("u{i}"), format!("v{i}"), i as i64)).collect();
        c.apply(&t, Ok(CatalogPage { entries, total_count: n }));
        c
    }

    #[test]
    fn test_batches_of_six_over_45_entries() {
        let mut c = catalog(45);
        let mut w = VisibilityWatcher::default();
        let mut r = IncrementalRenderer::new(6);
        r.clear(c.generation());
        let sizes: Vec<usize> = (0..9).map(|_| r.render_next_batch(&mut c, &mut w)).collect();
        assert_eq!(sizes, vec![6, 6, 6, 6, 6, 6, 6, 3, 0]);
        assert_eq!(r.len(), 45);
    }

    #[test]
    fn test_ceil_calls_render_exactly_n() {
        for n in [0usize, 1, 7, 20, 21, 64] {
            for batch in [1usize, 3, 20, 100] {
                let mut c = catalog(n);
                let mut w = VisibilityWatcher::default();
                let mut r = IncrementalRenderer::new(batch);
                for _ in 0..n.div_ceil(batch) {
                    r.render_next_batch(&mut c, &mut w);
                }
                assert_eq!(r.len(), n, "n={n} batch={batch}");
                assert_eq!(r.render_next_batch(&mut c, &mut w), 0);
            }
        }
    }

    #[test]
    fn test_rendered_items_are_observed_and_ordered() {
        let mut c = catalog(4);
        let mut w = VisibilityWatcher::default();
        let mut r = IncrementalRenderer::new(10);
        r.clear(c.generation());
        r.render_next_batch(&mut c, &mut w);
        let names: Vec<_> = r.items().iter().map(|i| i.entry.display_name.as_str()).collect();
        assert_eq!(names, vec!["v3", "v2", "v1", "v0"]);
        assert!(r.items().iter().all(|i| w.is_observed(i.id)));
    }

    #[test]
    fn test_scroll_threshold() {
        let mut c = catalog(30);
        let mut w = VisibilityWatcher::default();
        let mut r = IncrementalRenderer::new(10);
        let far = ScrollMetrics { offset: 0.0, viewport_height: 100.0, content_height: 500.0 };
        assert_eq!(r.on_scroll(far, &mut c, &mut w), 0);
        let near = ScrollMetrics { offset: 390.0, viewport_height: 100.0, content_height: 500.0 };
        assert_eq!(near.distance_to_bottom(), 10.0);
        assert_eq!(r.on_scroll(near, &mut c, &mut w), 10);
    }

    #[test]
    fn test_thumbnail_for_old_generation_is_ignored() {
        let mut c = catalog(2);
        let mut w = VisibilityWatcher::default();
        let mut r = IncrementalRenderer::new(10);
        r.clear(c.generation());
        r.render_next_batch(&mut c, &mut w);
        let stale = ItemId { generation: c.generation() + 1, index: 0 };
        assert!(!r.set_thumbnail(stale, ThumbnailSlot::Failed));
        let id = r.items()[0].id;
        assert!(r.set_thumbnail(id, ThumbnailSlot::Failed));
        assert_eq!(r.item(id).map(|i| &i.thumbnail), Some(&ThumbnailSlot::Failed));
    }

    #[test]
    fn test_activate_returns_entry() {
        let mut c = catalog(3);
        let mut w = VisibilityWatcher::default();
        let mut r = IncrementalRenderer::new(10);
        r.clear(c.generation());
        r.render_next_batch(&mut c, &mut w);
        let id = r.items()[1].id;
        assert_eq!(r.activate(id).map(|e| e.display_name), Some("v1".to_string()));
    }
}
