//! Theme preference state
//!
//! ThemeState owns the persisted light/dark preference. It is created once at
//! startup from storage and handed to consumers explicitly.
//! - Reads never fail; an unreadable or invalid stored value means `light`
//! - Writes go straight to storage; a failing backend downgrades the state to
//!   in-memory for the rest of the session
//! - Every change reasserts the document marker class and notifies subscribers
//! - Palette changes can cross-fade on logical time (see [`ThemeState::tick`])

use crate::palette::{ColorToken, Palette};
use crate::preference::{ThemePreference, STORAGE_KEY};
use crate::storage::{PreferenceStorage, StorageError};
use folio_animation::Easing;
use folio_core::Color;
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;

new_key_type! {
    pub struct SubscriptionId;
}

/// The rendering side's document root
///
/// The marker class (`"light"` / `"dark"`) is the only coupling between the
/// preference and rendering.
pub trait DocumentRoot {
    fn set_marker_class(&mut self, class: &str);
}

/// Class list of the document root element
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RootClassList {
    classes: Vec<String>,
}

impl RootClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl DocumentRoot for RootClassList {
    fn set_marker_class(&mut self, class: &str) {
        self.classes
            .retain(|c| c != ThemePreference::Light.as_str() && c != ThemePreference::Dark.as_str());
        self.classes.push(class.to_string());
    }
}

impl<T: DocumentRoot> DocumentRoot for Rc<RefCell<T>> {
    fn set_marker_class(&mut self, class: &str) {
        self.borrow_mut().set_marker_class(class);
    }
}

type Subscriber = Box<dyn FnMut(ThemePreference)>;

/// Palette cross-fade in progress
struct PaletteTransition {
    from: Palette,
    to: Palette,
    /// Set on the first tick after the change
    started_ms: Option<u64>,
}

/// Default palette cross-fade duration (ms)
pub const DEFAULT_TRANSITION_MS: u32 = 300;

/// Theme preference state
pub struct ThemeState {
    preference: ThemePreference,
    storage: Box<dyn PreferenceStorage>,
    /// False once the backend has failed; the session continues in memory
    persistent: bool,
    root: Box<dyn DocumentRoot>,
    subscribers: SlotMap<SubscriptionId, Subscriber>,
    palette: Palette,
    transition: Option<PaletteTransition>,
    transition_ms: u32,
    needs_repaint: bool,
}

impl ThemeState {
    /// Load the preference from `storage` and apply the marker to `root`
    pub fn init(storage: Box<dyn PreferenceStorage>, root: Box<dyn DocumentRoot>) -> Self {
        let mut persistent = true;
        let preference = match storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err| {
                tracing::debug!(%err, "ignoring stored theme preference");
                ThemePreference::default()
            }),
            Ok(None) => ThemePreference::default(),
            Err(err @ StorageError::Parse { .. }) => {
                tracing::warn!(%err, "unreadable preferences file; it will be rewritten");
                ThemePreference::default()
            }
            Err(err) => {
                tracing::warn!(%err, "theme storage unavailable; using in-memory preference");
                persistent = false;
                ThemePreference::default()
            }
        };

        let mut state = Self {
            preference,
            storage,
            persistent,
            root,
            subscribers: SlotMap::with_key(),
            palette: Palette::for_preference(preference),
            transition: None,
            transition_ms: DEFAULT_TRANSITION_MS,
            needs_repaint: true,
        };
        state.root.set_marker_class(preference.as_str());
        tracing::debug!(%preference, persistent, "theme state initialized");
        state
    }

    /// Current preference
    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    /// Whether changes are reaching durable storage
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Cross-fade duration for palette changes (0 swaps instantly)
    pub fn set_transition_ms(&mut self, ms: u32) {
        self.transition_ms = ms;
    }

    /// Set the preference
    ///
    /// Persists, reasserts the document marker, and notifies subscribers when
    /// the value changed. Setting the current value only reasserts storage and
    /// the marker.
    pub fn set_preference(&mut self, preference: ThemePreference) {
        let changed = preference != self.preference;
        self.preference = preference;
        self.persist();
        self.root.set_marker_class(preference.as_str());

        if !changed {
            return;
        }

        tracing::debug!(%preference, "theme preference changed");
        let target = Palette::for_preference(preference);
        if self.transition_ms == 0 {
            self.palette = target;
            self.transition = None;
        } else {
            self.transition = Some(PaletteTransition {
                from: self.palette,
                to: target,
                started_ms: None,
            });
        }
        self.needs_repaint = true;

        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(preference);
        }
    }

    /// Flip the preference, returning the new value
    pub fn toggle(&mut self) -> ThemePreference {
        let next = self.preference.toggle();
        self.set_preference(next);
        next
    }

    /// Register a change callback
    pub fn subscribe(&mut self, callback: impl FnMut(ThemePreference) + 'static) -> SubscriptionId {
        self.subscribers.insert(Box::new(callback))
    }

    /// Remove a callback. Returns false for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ========== Color Access ==========

    /// Current (possibly mid-transition) palette
    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn color(&self, token: ColorToken) -> Color {
        self.palette.get(token)
    }

    /// Advance the palette cross-fade. Returns true while still animating.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        let started = *transition.started_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(started) as f32;
        let progress = (elapsed / self.transition_ms.max(1) as f32).min(1.0);
        let eased = Easing::EaseInOut.apply(progress);

        self.needs_repaint = true;
        if progress >= 1.0 {
            self.palette = transition.to;
            self.transition = None;
            false
        } else {
            self.palette = Palette::lerp(&transition.from, &transition.to, eased);
            true
        }
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    pub fn clear_repaint(&mut self) {
        self.needs_repaint = false;
    }

    fn persist(&mut self) {
        if !self.persistent {
            return;
        }
        if let Err(err) = self.storage.write(STORAGE_KEY, self.preference.as_str()) {
            tracing::warn!(%err, "failed to persist theme preference; continuing in memory");
            self.persistent = false;
        }
    }
}

impl std::fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeState")
            .field("preference", &self.preference)
            .field("persistent", &self.persistent)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
