//! Host event model
//!
//! Pointer, scroll, resize, and lifecycle events delivered by the host
//! environment, plus a per-frame queue that coalesces high-frequency events.

use crate::region::RegionKey;
use smallvec::SmallVec;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;

    // Element lifecycle events
    pub const MOUNT: EventType = 60;
    pub const UNMOUNT: EventType = 61;
}

/// A host event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    /// Region the event was delivered to (None for document-level events)
    pub target: Option<RegionKey>,
    pub data: EventData,
    pub timestamp_ms: u64,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    /// Client (viewport) coordinates of the pointer
    Pointer { client_x: f32, client_y: f32 },
    /// Absolute scroll offset after the scroll
    Scroll { scroll_y: f32 },
    Resize { width: f32, height: f32 },
    None,
}

impl Event {
    pub fn pointer(event_type: EventType, target: RegionKey, x: f32, y: f32, at_ms: u64) -> Self {
        Self {
            event_type,
            target: Some(target),
            data: EventData::Pointer {
                client_x: x,
                client_y: y,
            },
            timestamp_ms: at_ms,
        }
    }

    pub fn scroll(scroll_y: f32, at_ms: u64) -> Self {
        Self {
            event_type: event_types::SCROLL,
            target: None,
            data: EventData::Scroll { scroll_y },
            timestamp_ms: at_ms,
        }
    }

    pub fn resize(width: f32, height: f32, at_ms: u64) -> Self {
        Self {
            event_type: event_types::RESIZE,
            target: None,
            data: EventData::Resize { width, height },
            timestamp_ms: at_ms,
        }
    }

    /// Whether a later event of the same kind supersedes this one within a frame
    fn coalesces_with(&self, next: &Event) -> bool {
        if self.event_type != next.event_type {
            return false;
        }
        match self.event_type {
            event_types::POINTER_MOVE => self.target == next.target,
            event_types::SCROLL | event_types::RESIZE => true,
            _ => false,
        }
    }
}

/// Per-frame event queue
///
/// Pointer moves and scrolls arrive at display-refresh frequency. The queue
/// keeps only the latest of a run of coalescable events so consumers perform
/// at most one state write per kind per frame. Order between distinct events
/// is preserved.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: SmallVec<[Event; 8]>,
    coalesced: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        if let Some(last) = self.pending.last_mut() {
            if last.coalesces_with(&event) {
                *last = event;
                self.coalesced += 1;
                return;
            }
        }
        self.pending.push(event);
    }

    /// Take every pending event for this frame
    pub fn drain_frame(&mut self) -> SmallVec<[Event; 8]> {
        if self.coalesced > 0 {
            tracing::trace!(coalesced = self.coalesced, "frame events coalesced");
            self.coalesced = 0;
        }
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_moves_on_same_region_collapse() {
        let mut queue = EventQueue::new();
        let card = RegionKey::index(1);
        queue.push(Event::pointer(event_types::POINTER_MOVE, card.clone(), 1.0, 1.0, 0));
        queue.push(Event::pointer(event_types::POINTER_MOVE, card.clone(), 5.0, 6.0, 4));

        let events = queue.drain_frame();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].data,
            EventData::Pointer {
                client_x: 5.0,
                client_y: 6.0
            }
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn moves_on_different_regions_are_kept_in_order() {
        let mut queue = EventQueue::new();
        queue.push(Event::pointer(event_types::POINTER_MOVE, RegionKey::index(0), 1.0, 1.0, 0));
        queue.push(Event::pointer(event_types::POINTER_MOVE, RegionKey::index(1), 2.0, 2.0, 1));
        queue.push(Event::pointer(event_types::POINTER_MOVE, RegionKey::index(0), 3.0, 3.0, 2));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn leave_breaks_a_move_run() {
        let mut queue = EventQueue::new();
        let card = RegionKey::index(2);
        queue.push(Event::pointer(event_types::POINTER_MOVE, card.clone(), 1.0, 1.0, 0));
        queue.push(Event::pointer(event_types::POINTER_LEAVE, card.clone(), 1.0, 1.0, 1));
        queue.push(Event::pointer(event_types::POINTER_MOVE, card, 2.0, 2.0, 2));
        assert_eq!(queue.drain_frame().len(), 3);
    }

    #[test]
    fn scrolls_keep_latest_offset() {
        let mut queue = EventQueue::new();
        queue.push(Event::scroll(10.0, 0));
        queue.push(Event::scroll(40.0, 1));
        queue.push(Event::scroll(90.0, 2));
        let events = queue.drain_frame();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, EventData::Scroll { scroll_y: 90.0 });
    }
}
