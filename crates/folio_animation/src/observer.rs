//! Visibility observers
//!
//! The registry owns every live observation. Each observation is paired with
//! an [`ObserverHandle`] held by its owner; dropping the handle removes the
//! observation, so a region that goes away for any reason (unmount, early
//! return, panic unwind) stops receiving callbacks.
//!
//! [`ObserverRegistry::process`] evaluates all observations against the
//! current viewport and returns crossing events first, then scroll progress
//! updates. An entrance crossing therefore always precedes a parallax update
//! produced by the same scroll position.

use crate::host::{ElementId, LayoutHost};
use crate::trigger::{TriggerMode, TriggerPosition};
use folio_core::{Rect, Viewport};
use slotmap::{new_key_type, SlotMap};
use smallvec::{smallvec, SmallVec};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    pub struct ObservationId;
}

/// Crossing events, named by scroll direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    /// Became active while scrolling down
    Enter,
    /// Passed the end while scrolling down
    Leave,
    /// Became active again while scrolling up
    EnterBack,
    /// Passed back above the start while scrolling up
    LeaveBack,
}

impl Crossing {
    pub fn is_entry(self) -> bool {
        matches!(self, Crossing::Enter | Crossing::EnterBack)
    }
}

/// What an observation watches
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObserveKind {
    /// Entrance trigger
    Trigger(TriggerMode),
    /// Scroll-linked range reporting progress between `start` and `end`
    Scrub {
        start: TriggerPosition,
        end: TriggerPosition,
    },
}

/// Event produced by [`ObserverRegistry::process`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObserverEvent {
    Crossed {
        id: ObservationId,
        element: ElementId,
        crossing: Crossing,
    },
    Progress {
        id: ObservationId,
        element: ElementId,
        progress: f32,
    },
}

impl ObserverEvent {
    pub fn id(&self) -> ObservationId {
        match self {
            ObserverEvent::Crossed { id, .. } | ObserverEvent::Progress { id, .. } => *id,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Unknown,
    Before,
    Active,
    After,
}

struct Observation {
    element: ElementId,
    kind: ObserveKind,
    phase: Phase,
    last_progress: Option<f32>,
}

type Observations = SlotMap<ObservationId, Observation>;

#[derive(Default)]
struct Shared {
    observations: RefCell<Observations>,
    /// Handles dropped while `observations` was borrowed
    released: RefCell<Vec<ObservationId>>,
}

impl Shared {
    fn is_released(&self, id: ObservationId) -> bool {
        self.released.borrow().contains(&id)
    }

    /// Remove observations whose handles were dropped mid-borrow
    fn sweep(&self, observations: &mut Observations) -> Vec<ObservationId> {
        let released = std::mem::take(&mut *self.released.borrow_mut());
        for id in &released {
            if observations.remove(*id).is_some() {
                tracing::trace!(?id, "deferred observer release");
            }
        }
        released
    }
}

/// Shared registry of visibility observations
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    shared: Rc<Shared>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `element`
    pub fn observe(&self, element: ElementId, kind: ObserveKind) -> ObserverHandle {
        let id = self.shared.observations.borrow_mut().insert(Observation {
            element,
            kind,
            phase: Phase::Unknown,
            last_progress: None,
        });
        tracing::trace!(%element, ?kind, "observer registered");
        ObserverHandle {
            id,
            registry: Rc::downgrade(&self.shared),
        }
    }

    /// Number of live observations
    pub fn len(&self) -> usize {
        let pending = self.shared.released.borrow().len();
        self.shared.observations.borrow().len().saturating_sub(pending)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: ObservationId) -> bool {
        self.shared.observations.borrow().contains_key(id) && !self.shared.is_released(id)
    }

    /// Evaluate every observation against `viewport`
    ///
    /// Observations whose element has no usable bounds keep their previous
    /// phase and emit nothing. Nothing is emitted for an observation whose
    /// handle has been dropped, even if the drop happened during this call.
    pub fn process(&self, viewport: &Viewport, host: &dyn LayoutHost) -> Vec<ObserverEvent> {
        let mut crossings = Vec::new();
        let mut progress = Vec::new();

        let mut observations = self.shared.observations.borrow_mut();
        self.shared.sweep(&mut observations);
        for (id, observation) in observations.iter_mut() {
            let Some(bounds) = host.measured_bounds(observation.element) else {
                continue;
            };

            let next = phase_for(&observation.kind, &bounds, viewport);
            let element = observation.element;
            for crossing in crossings_between(observation.phase, next) {
                crossings.push(ObserverEvent::Crossed {
                    id,
                    element,
                    crossing,
                });
            }
            observation.phase = next;

            if let ObserveKind::Scrub { start, end } = observation.kind {
                let value = match next {
                    Phase::Active => scroll_progress(&start, &end, &bounds, viewport),
                    Phase::Before => 0.0,
                    Phase::After => 1.0,
                    Phase::Unknown => continue,
                };
                let seen_before = observation.last_progress.is_some();
                if observation.last_progress != Some(value)
                    && (next == Phase::Active || seen_before)
                {
                    observation.last_progress = Some(value);
                    progress.push(ObserverEvent::Progress {
                        id,
                        element,
                        progress: value,
                    });
                }
            }
        }

        let dropped = self.shared.sweep(&mut observations);
        crossings.extend(progress);
        crossings.retain(|event| !dropped.contains(&event.id()));
        crossings
    }
}

/// RAII registration; dropping it removes the observation
pub struct ObserverHandle {
    id: ObservationId,
    registry: Weak<Shared>,
}

impl ObserverHandle {
    pub fn id(&self) -> ObservationId {
        self.id
    }

    /// Whether the registry still holds this observation
    pub fn is_live(&self) -> bool {
        self.registry.upgrade().is_some_and(|shared| {
            shared.observations.borrow().contains_key(self.id) && !shared.is_released(self.id)
        })
    }
}

impl std::fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverHandle").field("id", &self.id).finish()
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        let Some(shared) = self.registry.upgrade() else {
            return;
        };
        let removed = match shared.observations.try_borrow_mut() {
            Ok(mut observations) => observations.remove(self.id).is_some(),
            Err(_) => {
                // Registry is mid-process; the next sweep removes it
                shared.released.borrow_mut().push(self.id);
                false
            }
        };
        if removed {
            tracing::trace!(id = ?self.id, "observer released");
        }
    }
}

/// Normalized position of the scroll offset between `start` and `end`
///
/// Pure function of geometry: the same scroll offset always yields the same
/// value regardless of how it was reached.
pub fn scroll_progress(
    start: &TriggerPosition,
    end: &TriggerPosition,
    bounds: &Rect,
    viewport: &Viewport,
) -> f32 {
    let from = start.scroll_offset_in(bounds, viewport);
    let to = end.scroll_offset_in(bounds, viewport);
    if to <= from {
        return if viewport.scroll_y >= from { 1.0 } else { 0.0 };
    }
    ((viewport.scroll_y - from) / (to - from)).clamp(0.0, 1.0)
}

fn phase_for(kind: &ObserveKind, bounds: &Rect, viewport: &Viewport) -> Phase {
    match kind {
        ObserveKind::Trigger(TriggerMode::Crossing { start, end }) | ObserveKind::Scrub { start, end } => {
            let from = start.scroll_offset_in(bounds, viewport);
            let to = end.scroll_offset_in(bounds, viewport).max(from);
            if viewport.scroll_y < from {
                Phase::Before
            } else if viewport.scroll_y >= to {
                Phase::After
            } else {
                Phase::Active
            }
        }
        ObserveKind::Trigger(TriggerMode::InView { amount }) => {
            let visible = if *amount <= 0.0 {
                viewport.intersects(bounds)
            } else {
                viewport.visible_fraction(bounds) + f32::EPSILON >= *amount
            };
            if visible {
                Phase::Active
            } else if bounds.top() >= viewport.scroll_y {
                Phase::Before
            } else {
                Phase::After
            }
        }
    }
}

fn crossings_between(from: Phase, to: Phase) -> SmallVec<[Crossing; 2]> {
    use Crossing::*;
    match (from, to) {
        (Phase::Unknown, Phase::Active) | (Phase::Before, Phase::Active) => smallvec![Enter],
        (Phase::Unknown, Phase::After) | (Phase::Before, Phase::After) => smallvec![Enter, Leave],
        (Phase::Active, Phase::After) => smallvec![Leave],
        (Phase::Active, Phase::Before) => smallvec![LeaveBack],
        (Phase::After, Phase::Active) => smallvec![EnterBack],
        (Phase::After, Phase::Before) => smallvec![EnterBack, LeaveBack],
        _ => SmallVec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LayoutMap;

    const VIEW_H: f32 = 1000.0;

    fn setup() -> (ObserverRegistry, LayoutMap) {
        let mut layout = LayoutMap::new();
        layout.set(ElementId(1), Rect::new(0.0, 2000.0, 800.0, 400.0));
        (ObserverRegistry::new(), layout)
    }

    fn at(scroll: f32) -> Viewport {
        Viewport::new(1280.0, VIEW_H).with_scroll(scroll)
    }

    fn crossings(events: &[ObserverEvent]) -> Vec<Crossing> {
        events
            .iter()
            .filter_map(|e| match e {
                ObserverEvent::Crossed { crossing, .. } => Some(*crossing),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn crossing_trigger_reports_direction() {
        let (registry, layout) = setup();
        let _handle = registry.observe(
            ElementId(1),
            ObserveKind::Trigger(TriggerMode::crossing("top 80%".parse().unwrap())),
        );

        assert!(registry.process(&at(0.0), &layout).is_empty());
        assert_eq!(crossings(&registry.process(&at(1250.0), &layout)), vec![Crossing::Enter]);
        assert!(registry.process(&at(1300.0), &layout).is_empty());
        assert_eq!(crossings(&registry.process(&at(2500.0), &layout)), vec![Crossing::Leave]);
        assert_eq!(
            crossings(&registry.process(&at(2000.0), &layout)),
            vec![Crossing::EnterBack]
        );
        assert_eq!(
            crossings(&registry.process(&at(0.0), &layout)),
            vec![Crossing::LeaveBack]
        );
    }

    #[test]
    fn jumping_past_the_range_enters_then_leaves() {
        let (registry, layout) = setup();
        let _handle = registry.observe(ElementId(1), ObserveKind::Trigger(TriggerMode::default()));
        assert_eq!(
            crossings(&registry.process(&at(5000.0), &layout)),
            vec![Crossing::Enter, Crossing::Leave]
        );
    }

    #[test]
    fn in_view_uses_visible_fraction() {
        let (registry, layout) = setup();
        let _handle = registry.observe(
            ElementId(1),
            ObserveKind::Trigger(TriggerMode::in_view(0.5).unwrap()),
        );
        // 100 of 400px visible
        assert!(registry.process(&at(1100.0), &layout).is_empty());
        // 200 of 400px visible
        assert_eq!(crossings(&registry.process(&at(1200.0), &layout)), vec![Crossing::Enter]);
    }

    #[test]
    fn unmeasured_elements_are_skipped() {
        let registry = ObserverRegistry::new();
        let layout = LayoutMap::new();
        let _handle = registry.observe(ElementId(9), ObserveKind::Trigger(TriggerMode::default()));
        assert!(registry.process(&at(5000.0), &layout).is_empty());
    }

    #[test]
    fn dropping_handle_removes_observation() {
        let (registry, layout) = setup();
        let handle = registry.observe(ElementId(1), ObserveKind::Trigger(TriggerMode::default()));
        assert_eq!(registry.len(), 1);
        assert!(handle.is_live());
        drop(handle);
        assert!(registry.is_empty());
        assert!(registry.process(&at(1500.0), &layout).is_empty());
    }

    /// Host that drops a handle the first time it is asked for bounds
    struct DroppingHost {
        layout: LayoutMap,
        doomed: RefCell<Option<ObserverHandle>>,
    }

    impl LayoutHost for DroppingHost {
        fn element_bounds(&self, element: ElementId) -> Option<Rect> {
            drop(self.doomed.borrow_mut().take());
            self.layout.element_bounds(element)
        }
    }

    #[test]
    fn handle_dropped_during_process_is_released_and_silenced() {
        let (registry, mut layout) = setup();
        layout.set(ElementId(2), Rect::new(0.0, 2100.0, 800.0, 400.0));
        let _kept = registry.observe(ElementId(1), ObserveKind::Trigger(TriggerMode::default()));
        let doomed = registry.observe(ElementId(2), ObserveKind::Trigger(TriggerMode::default()));
        let doomed_id = doomed.id();
        let host = DroppingHost {
            layout,
            doomed: RefCell::new(Some(doomed)),
        };

        let events = registry.process(&at(1500.0), &host);
        assert!(events.iter().all(|e| e.id() != doomed_id));
        assert_eq!(crossings(&events), vec![Crossing::Enter]);
        assert!(!registry.contains(doomed_id));
        assert_eq!(registry.len(), 1);

        // Later frames never mention the released observation
        let events = registry.process(&at(0.0), &host);
        assert!(events.iter().all(|e| e.id() != doomed_id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn crossings_precede_progress() {
        let (registry, layout) = setup();
        let _scrub = registry.observe(
            ElementId(1),
            ObserveKind::Scrub {
                start: TriggerPosition::entering(),
                end: TriggerPosition::scrolled_past(),
            },
        );
        let _trigger = registry.observe(ElementId(1), ObserveKind::Trigger(TriggerMode::default()));

        let events = registry.process(&at(1500.0), &layout);
        let first_progress = events
            .iter()
            .position(|e| matches!(e, ObserverEvent::Progress { .. }))
            .unwrap();
        assert!(events[..first_progress]
            .iter()
            .all(|e| matches!(e, ObserverEvent::Crossed { .. })));
        assert_eq!(crossings(&events).len(), 2);
    }

    #[test]
    fn scroll_progress_is_a_pure_function_of_offset() {
        let bounds = Rect::new(0.0, 2000.0, 800.0, 400.0);
        let start = TriggerPosition::entering();
        let end = TriggerPosition::scrolled_past();
        // Range is scroll 1000..2400
        let mid = scroll_progress(&start, &end, &bounds, &at(1700.0));
        assert_eq!(mid, 0.5);

        // Any path to the same offset yields the same value
        for path in [[0.0, 1700.0], [2400.0, 1700.0], [1200.0, 1700.0]] {
            let last = path
                .iter()
                .map(|s| scroll_progress(&start, &end, &bounds, &at(*s)))
                .last()
                .unwrap();
            assert_eq!(last, mid);
        }
        assert_eq!(scroll_progress(&start, &end, &bounds, &at(0.0)), 0.0);
        assert_eq!(scroll_progress(&start, &end, &bounds, &at(9000.0)), 1.0);
    }
}
