//! Folio Core Runtime
//!
//! Foundational primitives shared by the Folio crates:
//!
//! - **Geometry**: points, rects, the scrolling viewport, colors
//! - **Events**: host pointer/scroll/resize events and a per-frame coalescing queue
//! - **State Machines**: table-driven transitions behind the reveal lifecycle
//! - **Interaction State**: pointer focus tracking and expand/collapse registry
//!
//! # Example
//!
//! ```rust
//! use folio_core::{ContentItemId, ExpansionRegistry, PointerTracker, Rect, RegionKey};
//!
//! let mut pointer = PointerTracker::new();
//! pointer.on_pointer_enter(RegionKey::index(1), Some(Rect::new(0.0, 100.0, 300.0, 200.0)));
//! pointer.on_pointer_move(RegionKey::index(1), 40.0, 150.0);
//! assert_eq!(pointer.focus().position.y, 50.0);
//!
//! let mut expansion = ExpansionRegistry::new();
//! expansion.toggle(ContentItemId::Index(0));
//! assert!(expansion.is_expanded(&ContentItemId::Index(0)));
//! ```

pub mod events;
pub mod expansion;
pub mod fsm;
pub mod geometry;
pub mod pointer;
pub mod region;

pub use events::{Event, EventData, EventQueue, EventType};
pub use expansion::ExpansionRegistry;
pub use fsm::{StateMachine, Transition};
pub use geometry::{Color, Point, Rect, Size, Viewport};
pub use pointer::{PointerFocus, PointerTracker};
pub use region::{ContentItemId, RegionKey};
