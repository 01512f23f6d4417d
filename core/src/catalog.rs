//! Owned catalog state: the current entry list plus filter, paging and the
//! render cursor.
//!
//! Loads are two-phase. [`CatalogState::begin_load`] hands out a [`LoadTicket`]
//! carrying a monotonically increasing generation; [`CatalogState::apply`] only
//! accepts the result of the most recent ticket, so a slow response from a
//! superseded request can never overwrite newer state.

use std::ops::Range;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::VideoEntry;
use crate::source::{sort_newest_first, CatalogPage, CatalogQuery, FilterMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    query: CatalogQuery,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer load was started after this one; the result was dropped.
    Stale,
    /// The previous list is still in place.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CatalogState {
    entries: Vec<VideoEntry>,
    loaded_count: usize,
    filter_text: String,
    page: usize,
    page_size: usize,
    total_count: usize,
    filter_mode: FilterMode,
    latest_generation: u64,
    applied_generation: u64,
    applied_page: usize,
}

impl CatalogState {
    pub fn new(page_size: usize, filter_mode: FilterMode) -> Self {
        Self {
            entries: Vec::new(),
            loaded_count: 0,
            filter_text: String::new(),
            page: 0,
            page_size: page_size.max(1),
            total_count: 0,
            filter_mode,
            latest_generation: 0,
            applied_generation: 0,
            applied_page: 0,
        }
    }

    pub fn entries(&self) -> &[VideoEntry] {
        &self.entries
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Generation of the list currently held (0 before the first successful load).
    pub fn generation(&self) -> u64 {
        self.applied_generation
    }

    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.page_size)
    }

    pub fn query(&self) -> CatalogQuery {
        let filter = match self.filter_mode {
            FilterMode::Server => self.filter_text.clone(),
            FilterMode::Client => String::new(),
        };
        CatalogQuery { filter, page: self.page, page_size: self.page_size }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_generation += 1;
        debug!(generation = self.latest_generation, page = self.page, "Catalog load started");
        LoadTicket { generation: self.latest_generation, query: self.query() }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.latest_generation
    }

    /// Replaces the list wholesale on success, keeps it untouched otherwise.
    pub fn apply(&mut self, ticket: &LoadTicket, result: Result<CatalogPage>) -> LoadOutcome {
        if !self.is_current(ticket) {
            debug!(generation = ticket.generation, latest = self.latest_generation, "Dropping stale catalog result");
            return LoadOutcome::Stale;
        }
        match result {
            Ok(page) => {
                let CatalogPage { mut entries, total_count } = page;
                sort_newest_first(&mut entries);
                let count = entries.len();
                self.entries = entries;
                self.total_count = total_count;
                self.loaded_count = 0;
                self.applied_generation = ticket.generation;
                self.applied_page = ticket.query.page;
                self.page = ticket.query.page;
                info!(generation = ticket.generation, count, total = total_count, "Catalog replaced");
                LoadOutcome::Applied { count }
            }
            Err(e) => {
                warn!(error = %e, "Catalog load failed, keeping previous list");
                self.page = self.applied_page;
                LoadOutcome::Failed(e.to_string())
            }
        }
    }

    /// Next render slice. The cursor advances by `batch_size` even when fewer
    /// entries remain, so once it passes the end every later call is empty.
    pub fn next_batch(&mut self, batch_size: usize) -> Range<usize> {
        let len = self.entries.len();
        let start = self.loaded_count.min(len);
        let end = self.loaded_count.saturating_add(batch_size).min(len);
        self.loaded_count = self.loaded_count.saturating_add(batch_size);
        start..end
    }

    /// Stores the filter and goes back to the first page. Returns true when the
    /// text actually changed. The render cursor stays on the held list until a
    /// new one is applied.
    pub fn set_filter(&mut self, text: &str) -> bool {
        if self.filter_text == text {
            return false;
        }
        self.filter_text = text.to_string();
        self.page = 0;
        true
    }

    /// Case-insensitive substring match on the display name in client mode;
    /// in server mode the backend already filtered.
    pub fn matches(&self, entry: &VideoEntry) -> bool {
        match self.filter_mode {
            FilterMode::Server => true,
            FilterMode::Client => {
                let needle = self.filter_text.trim().to_lowercase();
                needle.is_empty() || entry.display_name.to_lowercase().contains(&needle)
            }
        }
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = &VideoEntry> {
        self.entries.iter().filter(move |e| self.matches(e))
    }

    /// Moves to `page` clamped into the valid range. Returns true on change.
    /// Only the query changes here; entries and cursor follow on `apply`.
    pub fn set_page(&mut self, page: usize) -> bool {
        let last = self.total_pages().saturating_sub(1);
        let target = page.min(last);
        if target == self.page {
            return false;
        }
        self.page = target;
        true
    }

    pub fn next_page(&mut self) -> bool {
        if self.page + 1 >= self.total_pages() {
            return false;
        }
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.set_page(self.page - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;

    fn entries(n: usize) -> Vec<VideoEntry> {
        (0..n).map(|i| VideoEntry::new(format!("u{i}"), format!("clip{i}"), i as i64)).collect()
    }

    fn loaded(n: usize, total: usize, mode: FilterMode) -> CatalogState {
        let mut c = CatalogState::new(10, mode);
        let t = c.begin_load();
        c.apply(&t, Ok(CatalogPage { entries: entries(n), total_count: total }));
        c
    }

    #[test]
    fn test_apply_sorts_descending() {
        let c = loaded(5, 5, FilterMode::Client);
        let stamps: Vec<_> = c.entries().iter().map(|e| e.last_modified).collect();
        assert_eq!(stamps, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut c = CatalogState::new(10, FilterMode::Server);
        let old = c.begin_load();
        let new = c.begin_load();
        let applied = c.apply(&new, Ok(CatalogPage { entries: entries(2), total_count: 2 }));
        assert_eq!(applied, LoadOutcome::Applied { count: 2 });
        let stale = c.apply(&old, Ok(CatalogPage { entries: entries(7), total_count: 7 }));
        assert_eq!(stale, LoadOutcome::Stale);
        assert_eq!(c.entries().len(), 2);
        assert_eq!(c.generation(), new.generation());
    }

    #[test]
    fn test_failed_load_keeps_previous_list() {
        let mut c = loaded(3, 30, FilterMode::Server);
        assert!(c.next_page());
        let t = c.begin_load();
        let out = c.apply(&t, Err(GalleryError::Malformed("boom".into())));
        assert!(matches!(out, LoadOutcome::Failed(_)));
        assert_eq!(c.entries().len(), 3);
        assert_eq!(c.page(), 0);
    }

    #[test]
    fn test_next_batch_clamps_and_advances() {
        let mut c = loaded(5, 5, FilterMode::Client);
        assert_eq!(c.next_batch(3), 0..3);
        assert_eq!(c.next_batch(3), 3..5);
        assert_eq!(c.loaded_count(), 6);
        assert_eq!(c.next_batch(3), 5..5);
        assert!(c.next_batch(3).is_empty());
    }

    #[test]
    fn test_prev_page_is_noop_at_zero() {
        let mut c = loaded(10, 35, FilterMode::Server);
        assert_eq!(c.page(), 0);
        assert!(!c.prev_page());
        assert_eq!(c.page(), 0);
    }

    #[test]
    fn test_next_page_is_noop_at_last() {
        let mut c = loaded(10, 35, FilterMode::Server);
        assert_eq!(c.total_pages(), 4);
        assert!(c.next_page());
        assert!(c.next_page());
        assert!(c.next_page());
        assert_eq!(c.page(), 3);
        assert!(!c.next_page());
        assert_eq!(c.page(), 3);
    }

    #[test]
    fn test_empty_catalog_has_no_pages() {
        let mut c = loaded(0, 0, FilterMode::Server);
        assert_eq!(c.total_pages(), 0);
        assert!(!c.next_page());
        assert!(!c.prev_page());
        assert_eq!(c.page(), 0);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut c = loaded(10, 25, FilterMode::Server);
        assert!(c.set_page(99));
        assert_eq!(c.page(), 2);
    }

    #[test]
    fn test_cursor_resets_only_when_new_page_is_applied() {
        let mut c = loaded(10, 25, FilterMode::Server);
        c.next_batch(4);
        assert!(c.next_page());
        assert_eq!(c.loaded_count(), 4);
        let t = c.begin_load();
        c.apply(&t, Ok(CatalogPage { entries: entries(10), total_count: 25 }));
        assert_eq!(c.page(), 1);
        assert_eq!(c.loaded_count(), 0);
    }

    #[test]
    fn test_failed_page_load_keeps_cursor() {
        let mut c = loaded(10, 25, FilterMode::Server);
        c.next_batch(4);
        assert!(c.next_page());
        let t = c.begin_load();
        c.apply(&t, Err(GalleryError::Malformed("boom".into())));
        assert_eq!(c.page(), 0);
        assert_eq!(c.loaded_count(), 4);
        assert_eq!(c.next_batch(4), 4..8);
    }

    #[test]
    fn test_server_filter_keeps_cursor_until_refetch() {
        let mut c = loaded(10, 25, FilterMode::Server);
        c.next_batch(4);
        assert!(c.set_filter("clip"));
        assert_eq!(c.loaded_count(), 4);
        assert_eq!(c.next_batch(4), 4..8);
    }

    #[test]
    fn test_filter_resets_page_and_matches_case_insensitively() {
        let mut c = CatalogState::new(2, FilterMode::Client);
        let t = c.begin_load();
        c.apply(
            &t,
            Ok(CatalogPage {
                entries: vec![
                    VideoEntry::new("a", "Holiday Beach", 3),
                    VideoEntry::new("b", "office", 2),
                    VideoEntry::new("c", "BEACH party", 1),
                ],
                total_count: 6,
            }),
        );
        assert!(c.next_page());
        assert!(c.set_filter("beach"));
        assert_eq!(c.page(), 0);
        let names: Vec<_> = c.visible_entries().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Holiday Beach", "BEACH party"]);
        assert!(!c.set_filter("beach"));
    }

    #[test]
    fn test_query_carries_filter_only_in_server_mode() {
        let mut s = CatalogState::new(5, FilterMode::Server);
        s.set_filter("cat");
        assert_eq!(s.query().filter, "cat");
        let mut c = CatalogState::new(5, FilterMode::Client);
        c.set_filter("cat");
        assert_eq!(c.query().filter, "");
    }
}
