//! Pointer focus tracking
//!
//! Records which interactive region currently has pointer focus and the last
//! pointer position relative to that region. At most one region is active;
//! the most recent enter/move wins.
//!
//! Scoped regions report positions relative to their bounding box origin.
//! The [`RegionKey::Global`] sentinel reports raw viewport coordinates and is
//! used by the cursor follower.

use crate::geometry::{Point, Rect};
use crate::region::RegionKey;
use rustc_hash::FxHashMap;

/// Snapshot of pointer focus
///
/// `position` is only meaningful while `active_region` is `Some`; it is left
/// stale after a leave.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerFocus {
    pub active_region: Option<RegionKey>,
    pub position: Point,
}

impl PointerFocus {
    /// Position if `key` is the active region
    pub fn position_in(&self, key: &RegionKey) -> Option<Point> {
        match &self.active_region {
            Some(active) if active == key => Some(self.position),
            _ => None,
        }
    }
}

/// Session-scoped pointer focus state
#[derive(Debug, Default)]
pub struct PointerTracker {
    focus: PointerFocus,
    /// Last known bounding box for each region, supplied by the caller
    bounds: FxHashMap<RegionKey, Rect>,
    /// Move waiting for the next frame flush (see [`PointerTracker::queue_move`])
    pending_move: Option<(RegionKey, Point)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current focus snapshot
    pub fn focus(&self) -> &PointerFocus {
        &self.focus
    }

    pub fn active_region(&self) -> Option<&RegionKey> {
        self.focus.active_region.as_ref()
    }

    /// Pointer entered a region; `bounds` is the region's box in viewport space
    ///
    /// Global regions ignore `bounds`.
    pub fn on_pointer_enter(&mut self, key: RegionKey, bounds: Option<Rect>) {
        if let Some(bounds) = bounds {
            self.bounds.insert(key.clone(), bounds);
        }
        self.activate(key);
    }

    /// Pointer moved inside a region (client coordinates)
    ///
    /// A move for a region other than the active one makes it active.
    pub fn on_pointer_move(&mut self, key: RegionKey, client_x: f32, client_y: f32) {
        let client = Point::new(client_x, client_y);
        self.focus.position = self.relative_position(&key, client);
        self.activate(key);
    }

    /// Pointer moved with fresh bounds for the region (layout changed)
    pub fn on_pointer_move_within(&mut self, key: RegionKey, bounds: Rect, client_x: f32, client_y: f32) {
        self.bounds.insert(key.clone(), bounds);
        self.on_pointer_move(key, client_x, client_y);
    }

    /// Pointer left a region
    ///
    /// Only clears focus when `key` is the active region: a stale leave for a
    /// region that already lost focus must not clear its successor.
    pub fn on_pointer_leave(&mut self, key: &RegionKey) {
        if self.focus.active_region.as_ref() == Some(key) {
            tracing::trace!(region = %key, "pointer focus cleared");
            self.focus.active_region = None;
        }
        if self
            .pending_move
            .as_ref()
            .is_some_and(|(pending, _)| pending == key)
        {
            self.pending_move = None;
        }
    }

    /// Record a move to be applied on the next [`PointerTracker::flush_frame`]
    ///
    /// Moves arrive at display-refresh frequency; queuing keeps state writes
    /// to at most one per animation frame.
    pub fn queue_move(&mut self, key: RegionKey, client_x: f32, client_y: f32) {
        self.pending_move = Some((key, Point::new(client_x, client_y)));
    }

    /// Apply the queued move, if any. Returns true when state changed.
    pub fn flush_frame(&mut self) -> bool {
        match self.pending_move.take() {
            Some((key, client)) => {
                self.on_pointer_move(key, client.x, client.y);
                true
            }
            None => false,
        }
    }

    /// Forget a region's cached bounds (region unmounted)
    pub fn forget_region(&mut self, key: &RegionKey) {
        self.bounds.remove(key);
        self.on_pointer_leave(key);
    }

    fn activate(&mut self, key: RegionKey) {
        if self.focus.active_region.as_ref() != Some(&key) {
            tracing::trace!(region = %key, "pointer focus moved");
            self.focus.active_region = Some(key);
        }
    }

    fn relative_position(&self, key: &RegionKey, client: Point) -> Point {
        if key.is_global() {
            return client;
        }
        match self.bounds.get(key) {
            Some(bounds) => bounds.to_local(client),
            // No box known: fall back to client coordinates
            None => client,
        }
    }
}
