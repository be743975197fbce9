//! Viewport reveal regions
//!
//! A region animates an element when it scrolls into view, optionally binds a
//! scroll-linked animation while it intersects the viewport, and releases
//! everything it acquired when it leaves the tree.
//!
//! Lifecycle:
//!
//! ```text
//! Unarmed --Arm--> Armed --Cross--> Fired <--ScrubEnter/ScrubLeave--> Parallaxing
//!                    ^                |                                   |
//!                    +-----Rearm------+-----------------------------------+
//! (any) --Teardown--> TornDown
//! ```
//!
//! The region owns one trigger observation and zero or one scrub
//! observation, both acquired in [`RevealRegion::arm`]. Dropping the region
//! tears it down, so the observer registry and scheduler never hold work for
//! a region that no longer exists.

use crate::error::Result;
use crate::host::{ElementId, LayoutHost};
use crate::keyframe::{KeyframeProperties, MultiKeyframeAnimation};
use crate::observer::{Crossing, ObservationId, ObserveKind, ObserverEvent, ObserverHandle, ObserverRegistry};
use crate::scheduler::{AnimationTarget, SchedulerHandle, TweenId};
use crate::scrub::ScrubBinding;
use crate::stagger::StaggerConfig;
use crate::trigger::{RevealPolicy, ToggleAction, ToggleActions, TriggerMode, TriggerPosition};
use folio_core::fsm::StateMachine;
use smallvec::SmallVec;

/// Lifecycle state of a region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealState {
    Unarmed,
    Armed,
    Fired,
    Parallaxing,
    TornDown,
}

/// Lifecycle signals
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealSignal {
    Arm,
    Cross,
    ScrubEnter,
    ScrubLeave,
    Rearm,
    Teardown,
}

/// Result of [`RevealRegion::arm`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmOutcome {
    /// Observer attached
    Armed,
    /// Already armed; nothing attached
    AlreadyArmed,
    /// Element has no usable geometry yet; retry after the next layout
    Deferred,
    /// Region was torn down and cannot be re-armed
    TornDown,
}

/// Notifications produced by [`RevealRegion::handle`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealEvent {
    Fired {
        element: ElementId,
        fire_count: u32,
        at_ms: u64,
    },
    ParallaxStarted {
        element: ElementId,
    },
    ParallaxUpdated {
        element: ElementId,
        progress: f32,
    },
    ParallaxStopped {
        element: ElementId,
    },
}

/// How a region animates
#[derive(Clone, Debug)]
pub struct RevealDescriptor {
    pub trigger: TriggerMode,
    pub toggle_actions: ToggleActions,
    pub policy: RevealPolicy,
    /// Entrance animation; `None` for scroll-only regions
    pub entrance: Option<MultiKeyframeAnimation>,
    /// Number of sub-elements animated in sequence (0 animates the element)
    pub parts: usize,
    pub stagger: Option<StaggerConfig>,
    pub scrub: Option<ScrubBinding>,
}

impl RevealDescriptor {
    /// Reveal with `entrance` on the default trigger, firing once
    pub fn new(entrance: MultiKeyframeAnimation) -> Self {
        Self {
            trigger: TriggerMode::default(),
            toggle_actions: ToggleActions::play_once(),
            policy: RevealPolicy::Once,
            entrance: Some(entrance),
            parts: 0,
            stagger: None,
            scrub: None,
        }
    }

    /// Region with only a scroll-linked animation
    pub fn scrub_only(binding: ScrubBinding) -> Self {
        Self {
            trigger: TriggerMode::crossing(binding.start),
            toggle_actions: ToggleActions::play_once(),
            policy: RevealPolicy::Once,
            entrance: None,
            parts: 0,
            stagger: None,
            scrub: Some(binding),
        }
    }

    /// Fire when the element crosses `start` (`"top 80%"`)
    pub fn start(mut self, start: &str) -> Result<Self> {
        self.trigger = TriggerMode::crossing(start.parse::<TriggerPosition>()?);
        Ok(self)
    }

    /// Crossing trigger with an explicit end
    pub fn range(mut self, start: &str, end: &str) -> Result<Self> {
        self.trigger = TriggerMode::Crossing {
            start: start.parse()?,
            end: end.parse()?,
        };
        Ok(self)
    }

    /// Fire when `amount` of the element is visible
    pub fn in_view(mut self, amount: f32) -> Result<Self> {
        self.trigger = TriggerMode::in_view(amount)?;
        Ok(self)
    }

    /// Explicit toggle actions (`"play none none none"`); the policy follows
    pub fn toggle_actions(mut self, actions: &str) -> Result<Self> {
        let actions: ToggleActions = actions.parse()?;
        self.policy = actions.policy();
        self.toggle_actions = actions;
        Ok(self)
    }

    /// Fire on every entry (rewinding on exit) or only the first
    pub fn repeatable(mut self, repeatable: bool) -> Self {
        self.toggle_actions = if repeatable {
            ToggleActions::every_entry()
        } else {
            ToggleActions::play_once()
        };
        self.policy = self.toggle_actions.policy();
        self
    }

    /// Animate `parts` sub-elements, offset by the stagger
    pub fn stagger(mut self, parts: usize, stagger: StaggerConfig) -> Self {
        self.parts = parts;
        self.stagger = Some(stagger);
        self
    }

    pub fn scrub(mut self, binding: ScrubBinding) -> Self {
        self.scrub = Some(binding);
        self
    }

    pub fn is_repeatable(&self) -> bool {
        self.policy == RevealPolicy::EveryEntry
    }
}

fn lifecycle() -> StateMachine<RevealState, RevealSignal> {
    use RevealSignal::*;
    use RevealState::*;
    StateMachine::builder(Unarmed)
        .on(Unarmed, Arm, Armed)
        .on(Armed, Cross, Fired)
        .on(Fired, ScrubEnter, Parallaxing)
        .on(Parallaxing, ScrubLeave, Fired)
        .on(Fired, Rearm, Armed)
        .on(Parallaxing, Rearm, Armed)
        .on_any(Teardown, TornDown)
        .build()
}

/// One element's reveal lifecycle
pub struct RevealRegion {
    element: ElementId,
    descriptor: RevealDescriptor,
    fsm: StateMachine<RevealState, RevealSignal>,
    has_fired: bool,
    fire_count: u32,
    last_fired_ms: Option<u64>,
    /// Scrub range currently intersecting (tracked even before the first fire)
    in_scrub_range: bool,
    scrub_progress: Option<f32>,
    trigger: Option<ObserverHandle>,
    scrub: Option<ObserverHandle>,
    scheduler: Option<SchedulerHandle>,
    playbacks: SmallVec<[TweenId; 4]>,
}

impl RevealRegion {
    pub fn new(element: ElementId, descriptor: RevealDescriptor) -> Self {
        Self {
            element,
            descriptor,
            fsm: lifecycle(),
            has_fired: false,
            fire_count: 0,
            last_fired_ms: None,
            in_scrub_range: false,
            scrub_progress: None,
            trigger: None,
            scrub: None,
            scheduler: None,
            playbacks: SmallVec::new(),
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn descriptor(&self) -> &RevealDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> RevealState {
        self.fsm.current_state()
    }

    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    /// Total entrance fires since mount
    pub fn fire_count(&self) -> u32 {
        self.fire_count
    }

    pub fn last_fired_ms(&self) -> Option<u64> {
        self.last_fired_ms
    }

    /// Lifecycle transitions taken so far
    pub fn history(&self) -> &[(RevealState, RevealSignal, RevealState)] {
        self.fsm.history()
    }

    /// Latest scroll progress through the scrub range
    pub fn scrub_progress(&self) -> Option<f32> {
        self.scrub_progress
    }

    /// Scroll-linked properties at the latest progress
    pub fn scrub_value(&self) -> Option<KeyframeProperties> {
        let binding = self.descriptor.scrub.as_ref()?;
        self.scrub_progress.map(|p| binding.sample(p))
    }

    /// Properties shown before the entrance has fired
    pub fn rest_properties(&self) -> KeyframeProperties {
        self.descriptor
            .entrance
            .as_ref()
            .map(MultiKeyframeAnimation::initial)
            .unwrap_or_default()
    }

    /// Targets animated by the entrance, in index order
    pub fn targets(&self) -> Vec<AnimationTarget> {
        if self.descriptor.entrance.is_none() {
            return Vec::new();
        }
        if self.descriptor.parts == 0 {
            vec![AnimationTarget::element(self.element)]
        } else {
            (0..self.descriptor.parts)
                .map(|k| AnimationTarget::part(self.element, k))
                .collect()
        }
    }

    /// Whether an observer event belongs to this region
    pub fn owns(&self, id: ObservationId) -> bool {
        self.trigger.as_ref().is_some_and(|h| h.id() == id)
            || self.scrub.as_ref().is_some_and(|h| h.id() == id)
    }

    /// Attach observers
    ///
    /// Idempotent: an armed region never attaches a second observer. With no
    /// usable geometry the call is a no-op returning [`ArmOutcome::Deferred`].
    pub fn arm(
        &mut self,
        host: &dyn LayoutHost,
        observers: &ObserverRegistry,
        scheduler: SchedulerHandle,
    ) -> ArmOutcome {
        match self.state() {
            RevealState::Unarmed => {}
            RevealState::TornDown => return ArmOutcome::TornDown,
            _ => return ArmOutcome::AlreadyArmed,
        }

        if host.measured_bounds(self.element).is_none() {
            tracing::debug!(element = %self.element, "no geometry yet; arming deferred");
            return ArmOutcome::Deferred;
        }

        if self.descriptor.entrance.is_some() || self.descriptor.scrub.is_none() {
            self.trigger = Some(observers.observe(
                self.element,
                ObserveKind::Trigger(self.descriptor.trigger),
            ));
        }
        if let Some(binding) = &self.descriptor.scrub {
            self.scrub = Some(observers.observe(
                self.element,
                ObserveKind::Scrub {
                    start: binding.start,
                    end: binding.end,
                },
            ));
        }
        self.scheduler = Some(scheduler);
        self.fsm.send(RevealSignal::Arm);
        tracing::debug!(element = %self.element, "region armed");
        ArmOutcome::Armed
    }

    /// React to an observer event routed to this region
    pub fn handle(&mut self, event: &ObserverEvent) -> SmallVec<[RevealEvent; 2]> {
        let mut out = SmallVec::new();
        if matches!(self.state(), RevealState::Unarmed | RevealState::TornDown) {
            return out;
        }

        let id = event.id();
        let is_trigger = self.trigger.as_ref().is_some_and(|h| h.id() == id);
        let is_scrub = self.scrub.as_ref().is_some_and(|h| h.id() == id);

        match *event {
            ObserverEvent::Crossed { crossing, .. } if is_trigger => {
                self.on_trigger_crossing(crossing, &mut out);
            }
            ObserverEvent::Crossed { crossing, .. } if is_scrub => {
                self.on_scrub_crossing(crossing, &mut out);
            }
            ObserverEvent::Progress { progress, .. } if is_scrub => {
                self.scrub_progress = Some(progress);
                if self.has_fired {
                    out.push(RevealEvent::ParallaxUpdated {
                        element: self.element,
                        progress,
                    });
                }
            }
            _ => {}
        }
        out
    }

    fn on_trigger_crossing(&mut self, crossing: Crossing, out: &mut SmallVec<[RevealEvent; 2]>) {
        let action = match crossing {
            Crossing::Enter => self.descriptor.toggle_actions.on_enter,
            Crossing::Leave => self.descriptor.toggle_actions.on_leave,
            Crossing::EnterBack => self.descriptor.toggle_actions.on_enter_back,
            Crossing::LeaveBack => self.descriptor.toggle_actions.on_leave_back,
        };

        if crossing.is_entry() {
            if !self.has_fired {
                self.fire(out);
            } else {
                self.apply_to_playbacks(action);
            }
            return;
        }

        self.apply_to_playbacks(action);
        // Re-arm only when the next entry from this side starts over
        let next_entry = match crossing {
            Crossing::Leave => self.descriptor.toggle_actions.on_enter_back,
            _ => self.descriptor.toggle_actions.on_enter,
        };
        if self.descriptor.policy == RevealPolicy::EveryEntry
            && self.has_fired
            && matches!(next_entry, ToggleAction::Play | ToggleAction::Restart)
        {
            self.has_fired = false;
            self.fsm.send(RevealSignal::Rearm);
            tracing::debug!(element = %self.element, ?crossing, "region re-armed");
        }
    }

    fn on_scrub_crossing(&mut self, crossing: Crossing, out: &mut SmallVec<[RevealEvent; 2]>) {
        if crossing.is_entry() {
            self.in_scrub_range = true;
            // Scroll-only regions count their first entry as the fire
            if self.trigger.is_none() && !self.has_fired {
                self.fire(out);
            } else {
                self.start_parallax(out);
            }
        } else {
            self.in_scrub_range = false;
            if self.state() == RevealState::Parallaxing {
                self.fsm.send(RevealSignal::ScrubLeave);
                out.push(RevealEvent::ParallaxStopped {
                    element: self.element,
                });
            }
        }
    }

    fn fire(&mut self, out: &mut SmallVec<[RevealEvent; 2]>) {
        let element = self.element;
        let previous: SmallVec<[TweenId; 4]> = self.playbacks.drain(..).collect();
        let targets = self.targets();
        let descriptor = &self.descriptor;

        let started = self.scheduler.as_ref().and_then(|handle| {
            handle.with(|scheduler| {
                for id in previous {
                    scheduler.cancel(id);
                }
                let mut ids = SmallVec::<[TweenId; 4]>::new();
                if let Some(entrance) = &descriptor.entrance {
                    let total = targets.len();
                    for (index, target) in targets.iter().enumerate() {
                        let offset = descriptor
                            .stagger
                            .map(|s| s.delay_for_index(index, total))
                            .unwrap_or(0);
                        let animation = entrance.clone().with_extra_delay(offset);
                        ids.push(scheduler.start(element, *target, animation));
                    }
                }
                (scheduler.now_ms(), ids)
            })
        });
        let (at_ms, ids) = started.unwrap_or_default();
        self.playbacks = ids;

        self.has_fired = true;
        self.fire_count += 1;
        self.last_fired_ms = Some(at_ms);
        self.fsm.send(RevealSignal::Cross);
        tracing::debug!(%element, fire_count = self.fire_count, at_ms, "region fired");
        out.push(RevealEvent::Fired {
            element,
            fire_count: self.fire_count,
            at_ms,
        });

        // Parallax that was already in range starts only after the fire
        if self.in_scrub_range {
            self.start_parallax(out);
        }
    }

    fn start_parallax(&mut self, out: &mut SmallVec<[RevealEvent; 2]>) {
        if self.state() == RevealState::Fired {
            self.fsm.send(RevealSignal::ScrubEnter);
            out.push(RevealEvent::ParallaxStarted {
                element: self.element,
            });
        }
    }

    fn apply_to_playbacks(&mut self, action: ToggleAction) {
        if action == ToggleAction::None || self.playbacks.is_empty() {
            return;
        }
        let Some(handle) = &self.scheduler else {
            return;
        };
        let playbacks = &self.playbacks;
        handle.with(|scheduler| {
            for id in playbacks {
                scheduler.apply(*id, action);
            }
        });
    }

    /// Detach observers and cancel every animation this region started
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn teardown(&mut self) {
        if self.state() == RevealState::TornDown {
            return;
        }
        self.trigger = None;
        self.scrub = None;
        if let Some(handle) = self.scheduler.take() {
            let element = self.element;
            handle.with(|scheduler| scheduler.cancel_owner(element));
        }
        self.playbacks.clear();
        self.in_scrub_range = false;
        self.fsm.send(RevealSignal::Teardown);
        tracing::debug!(element = %self.element, "region torn down");
    }
}

impl Drop for RevealRegion {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for RevealRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealRegion")
            .field("element", &self.element)
            .field("state", &self.state())
            .field("fire_count", &self.fire_count)
            .finish()
    }
}
