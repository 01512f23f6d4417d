//! Fire-once visibility tracking for rendered list items.

use std::collections::HashSet;

use tracing::trace;

use crate::render::ItemId;

/// Fraction of an item that has to be inside the list viewport to count as visible.
pub const INTERSECTION_THRESHOLD: f32 = 0.1;

/// Observed-once set of rendered items.
///
/// Items are registered when rendered and reported as visible at most once;
/// after that they are no longer observed, so a thumbnail is never captured twice.
#[derive(Debug)]
pub struct VisibilityWatcher {
    observed: HashSet<ItemId>,
    threshold: f32,
}

impl Default for VisibilityWatcher {
    fn default() -> Self {
        Self::new(INTERSECTION_THRESHOLD)
    }
}

impl VisibilityWatcher {
    pub fn new(threshold: f32) -> Self {
        Self { observed: HashSet::new(), threshold }
    }

    pub fn observe(&mut self, id: ItemId) {
        self.observed.insert(id);
    }

    pub fn is_observed(&self, id: ItemId) -> bool {
        self.observed.contains(&id)
    }

    pub fn clear(&mut self) {
        self.observed.clear();
    }

    /// Feeds one intersection sample. Yields `id` exactly once: the first time
    /// `ratio` reaches the threshold while the item is observed.
    pub fn report(&mut self, id: ItemId, ratio: f32) -> Option<ItemId> {
        if ratio < self.threshold || ratio <= 0.0 {
            return None;
        }
        if self.observed.remove(&id) {
            trace!(?id, ratio, "Item became visible");
            Some(id)
        } else {
            None
        }
    }
}

/// Visible fraction of the vertical span `[item_top, item_bottom]` inside
/// `[view_top, view_bottom]`.
pub fn intersection_ratio(item_top: f32, item_bottom: f32, view_top: f32, view_bottom: f32) -> f32 {
    let height = item_bottom - item_top;
    if height <= 0.0 {
        return 0.0;
    }
    let overlap = item_bottom.min(view_bottom) - item_top.max(view_top);
    (overlap / height).clamp(0.0, 1.0)
}
