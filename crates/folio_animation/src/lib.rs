//! Folio Animation System
//!
//! Scroll-driven reveals, keyframe animations and scroll-linked effects.
//!
//! # Features
//!
//! - **Keyframe Animations**: multi-property tracks sampled on logical time
//! - **Presets**: the entrance and idle animations used across the page
//! - **Scroll Triggers**: `"top 80%"` positions, toggle actions, in-view ratios
//! - **Observers**: RAII visibility observations with ordered crossing events
//! - **Reveal Regions**: per-element lifecycle with stagger and parallax
//! - **Star Field**: seeded cosmetic background
//!
//! # Example
//!
//! ```rust
//! use folio_animation::{
//!     AnimationPreset, AnimationScheduler, ElementId, LayoutMap, ObserverRegistry,
//!     RevealDescriptor, RevealRegion, SchedulerHandle,
//! };
//! use folio_core::{Rect, Viewport};
//!
//! let mut layout = LayoutMap::new();
//! layout.set(ElementId(1), Rect::new(0.0, 1600.0, 1280.0, 500.0));
//!
//! let observers = ObserverRegistry::new();
//! let scheduler = AnimationScheduler::new().shared();
//!
//! let descriptor = RevealDescriptor::new(AnimationPreset::fade_up(1000, 50.0))
//!     .start("top 80%")
//!     .unwrap();
//! let mut region = RevealRegion::new(ElementId(1), descriptor);
//! region.arm(&layout, &observers, SchedulerHandle::new(&scheduler));
//!
//! let viewport = Viewport::new(1280.0, 800.0).with_scroll(1100.0);
//! for event in observers.process(&viewport, &layout) {
//!     region.handle(&event);
//! }
//! assert_eq!(region.fire_count(), 1);
//! ```

pub mod easing;
pub mod error;
pub mod host;
pub mod keyframe;
pub mod observer;
pub mod presets;
pub mod reveal;
pub mod scheduler;
pub mod scrub;
pub mod stagger;
pub mod starfield;
pub mod trigger;

pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use host::{ElementId, LayoutHost, LayoutMap};
pub use keyframe::{KeyframeProperties, MultiKeyframe, MultiKeyframeAnimation, PlayDirection};
pub use observer::{Crossing, ObservationId, ObserveKind, ObserverEvent, ObserverHandle, ObserverRegistry};
pub use presets::AnimationPreset;
pub use reveal::{ArmOutcome, RevealDescriptor, RevealEvent, RevealRegion, RevealState};
pub use scheduler::{AnimationScheduler, AnimationTarget, SchedulerEvent, SchedulerHandle, TweenId};
pub use scrub::ScrubBinding;
pub use stagger::{StaggerConfig, StaggerOrder};
pub use starfield::{Star, StarField};
pub use trigger::{Anchor, RevealPolicy, ToggleAction, ToggleActions, TriggerMode, TriggerPosition};
