//! Animation scheduler
//!
//! Owns every running keyframe animation and advances them on logical time.
//! The page calls [`AnimationScheduler::tick`] with a millisecond timestamp;
//! every animation is sampled as a pure function of that timestamp, so a
//! headless run with a fixed tick produces identical frames every time.
//!
//! Each playback is tagged with an owner element. Tearing a region down
//! cancels everything it owns with [`AnimationScheduler::cancel_owner`],
//! including staggered children whose delay has not yet elapsed.

use crate::host::ElementId;
use crate::keyframe::{KeyframeProperties, MultiKeyframeAnimation};
use crate::trigger::ToggleAction;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    pub struct TweenId;
}

/// The animated thing: an element, or one indexed part of it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationTarget {
    pub element: ElementId,
    pub part: Option<usize>,
}

impl AnimationTarget {
    pub fn element(element: ElementId) -> Self {
        Self { element, part: None }
    }

    pub fn part(element: ElementId, index: usize) -> Self {
        Self {
            element,
            part: Some(index),
        }
    }
}

/// Scheduler notifications produced by [`AnimationScheduler::tick`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SchedulerEvent {
    /// Delay elapsed; the animation began moving at `at_ms`
    Started {
        id: TweenId,
        target: AnimationTarget,
        at_ms: u64,
    },
    /// Forward playback reached its end
    Completed { id: TweenId, target: AnimationTarget },
}

struct Playback {
    owner: ElementId,
    target: AnimationTarget,
    animation: MultiKeyframeAnimation,
    /// Logical time the current segment began
    anchor_ms: u64,
    /// Playhead position (ms into the animation) at `anchor_ms`
    anchor_pos: f32,
    reversed: bool,
    paused: bool,
    started: bool,
    completed: bool,
}

impl Playback {
    fn position(&self, now_ms: u64) -> f32 {
        let pos = if self.paused {
            self.anchor_pos
        } else {
            let dt = now_ms.saturating_sub(self.anchor_ms) as f32;
            if self.reversed {
                self.anchor_pos - dt
            } else {
                self.anchor_pos + dt
            }
        };
        let end = self.animation.total_duration_ms().unwrap_or(f32::INFINITY);
        pos.clamp(0.0, end)
    }

    fn rebase(&mut self, now_ms: u64) {
        self.anchor_pos = self.position(now_ms);
        self.anchor_ms = now_ms;
    }

    fn is_running(&self, now_ms: u64) -> bool {
        if self.paused {
            return false;
        }
        let pos = self.position(now_ms);
        if self.reversed {
            pos > 0.0
        } else {
            !self.animation.is_finished_at(pos)
        }
    }

    /// Logical time at which the delay elapses, while still pending
    fn scheduled_start(&self) -> Option<u64> {
        if self.started || self.paused || self.reversed {
            return None;
        }
        let remaining = (self.animation.delay_ms() as f32 - self.anchor_pos).max(0.0);
        Some(self.anchor_ms + remaining.round() as u64)
    }
}

/// The animation scheduler that ticks all active animations
pub struct AnimationScheduler {
    playbacks: SlotMap<TweenId, Playback>,
    values: FxHashMap<AnimationTarget, KeyframeProperties>,
    now_ms: u64,
    reduced_motion: bool,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            playbacks: SlotMap::with_key(),
            values: FxHashMap::default(),
            now_ms: 0,
            reduced_motion: false,
        }
    }

    /// Wrap in shared ownership for [`SchedulerHandle`] users
    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Jump every new animation straight to its end state
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Current logical time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Start `animation` on `target` at the current logical time
    pub fn start(
        &mut self,
        owner: ElementId,
        target: AnimationTarget,
        animation: MultiKeyframeAnimation,
    ) -> TweenId {
        let mut playback = Playback {
            owner,
            target,
            animation,
            anchor_ms: self.now_ms,
            anchor_pos: 0.0,
            reversed: false,
            paused: false,
            started: false,
            completed: false,
        };
        if self.reduced_motion {
            playback.anchor_pos = playback.animation.total_duration_ms().unwrap_or(0.0);
            playback.paused = true;
        }
        let value = playback.animation.sample(playback.position(self.now_ms));
        self.values.insert(target, value);
        let id = self.playbacks.insert(playback);
        tracing::trace!(%owner, ?target, ?id, "animation scheduled");
        id
    }

    /// Apply a playback control action
    pub fn apply(&mut self, id: TweenId, action: ToggleAction) {
        let now = self.now_ms;
        let Some(playback) = self.playbacks.get_mut(id) else {
            return;
        };
        match action {
            ToggleAction::None => return,
            ToggleAction::Play | ToggleAction::Resume => {
                playback.rebase(now);
                playback.paused = false;
                playback.reversed = false;
            }
            ToggleAction::Pause => {
                playback.rebase(now);
                playback.paused = true;
            }
            ToggleAction::Reverse => {
                playback.rebase(now);
                playback.paused = false;
                playback.reversed = true;
                playback.completed = false;
            }
            ToggleAction::Restart => {
                playback.anchor_ms = now;
                playback.anchor_pos = 0.0;
                playback.paused = false;
                playback.reversed = false;
                playback.started = false;
                playback.completed = false;
            }
            ToggleAction::Reset => {
                playback.anchor_ms = now;
                playback.anchor_pos = 0.0;
                playback.paused = true;
                playback.started = false;
                playback.completed = false;
            }
            ToggleAction::Complete => {
                playback.anchor_ms = now;
                playback.anchor_pos = playback.animation.total_duration_ms().unwrap_or(0.0);
                playback.paused = true;
            }
        }
        let value = playback.animation.sample(playback.position(now));
        self.values.insert(playback.target, value);
    }

    /// Cancel one playback; its target keeps its last sampled value
    pub fn cancel(&mut self, id: TweenId) -> bool {
        self.playbacks.remove(id).is_some()
    }

    /// Cancel every playback owned by `owner` and forget their values
    pub fn cancel_owner(&mut self, owner: ElementId) -> usize {
        let before = self.playbacks.len();
        let values = &mut self.values;
        self.playbacks.retain(|_, playback| {
            if playback.owner == owner {
                values.remove(&playback.target);
                false
            } else {
                true
            }
        });
        let cancelled = before - self.playbacks.len();
        if cancelled > 0 {
            tracing::debug!(%owner, cancelled, "cancelled owned animations");
        }
        cancelled
    }

    /// Advance to `now_ms` and resample every playback
    ///
    /// Time never moves backwards; an earlier timestamp is treated as no-op
    /// resampling at the current time.
    pub fn tick(&mut self, now_ms: u64) -> Vec<SchedulerEvent> {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        let mut events = Vec::new();

        for (id, playback) in self.playbacks.iter_mut() {
            if let Some(at_ms) = playback.scheduled_start() {
                if at_ms <= now {
                    playback.started = true;
                    events.push(SchedulerEvent::Started {
                        id,
                        target: playback.target,
                        at_ms,
                    });
                }
            }

            let pos = playback.position(now);
            self.values
                .insert(playback.target, playback.animation.sample(pos));

            if !playback.completed && !playback.reversed && playback.animation.is_finished_at(pos) {
                playback.completed = true;
                events.push(SchedulerEvent::Completed {
                    id,
                    target: playback.target,
                });
            }
        }

        events
    }

    /// Current animated value of `target`
    pub fn value(&self, target: &AnimationTarget) -> Option<KeyframeProperties> {
        self.values.get(target).copied()
    }

    /// Pending start times for `owner`'s playbacks whose delay has not elapsed
    pub fn scheduled_starts(&self, owner: ElementId) -> Vec<(AnimationTarget, u64)> {
        let mut starts: Vec<_> = self
            .playbacks
            .values()
            .filter(|p| p.owner == owner)
            .filter_map(|p| p.scheduled_start().map(|at| (p.target, at)))
            .collect();
        starts.sort();
        starts
    }

    /// Number of playbacks owned by `owner`
    pub fn owned_count(&self, owner: ElementId) -> usize {
        self.playbacks.values().filter(|p| p.owner == owner).count()
    }

    /// Check if any animations are still moving
    pub fn has_active_animations(&self) -> bool {
        self.playbacks
            .values()
            .any(|p| p.is_running(self.now_ms))
    }

    pub fn playback_count(&self) -> usize {
        self.playbacks.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak handle to a shared scheduler
///
/// Holders never keep the scheduler alive; every call is a no-op once the
/// scheduler is gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<AnimationScheduler>>,
}

impl SchedulerHandle {
    pub fn new(scheduler: &Rc<RefCell<AnimationScheduler>>) -> Self {
        Self {
            inner: Rc::downgrade(scheduler),
        }
    }

    /// Run `f` against the scheduler if it is alive and not already borrowed
    pub fn with<R>(&self, f: impl FnOnce(&mut AnimationScheduler) -> R) -> Option<R> {
        let scheduler = self.inner.upgrade()?;
        let mut guard = scheduler.try_borrow_mut().ok()?;
        Some(f(&mut guard))
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
