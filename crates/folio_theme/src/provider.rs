//! The process-wide UI state provider
//!
//! `ThemeProvider` owns the three pieces of shared interaction state: the
//! theme preference, pointer focus, and expand/collapse flags. It is created
//! once at startup and passed by reference to whatever renders; there is no
//! ambient global.

use crate::palette::Palette;
use crate::preference::ThemePreference;
use crate::state::{DocumentRoot, RootClassList, ThemeState};
use crate::storage::{MemoryStorage, PreferenceStorage};
use folio_core::{ContentItemId, ExpansionRegistry, PointerFocus, PointerTracker};

/// Consistent read of all provider state for one render pass
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderSnapshot {
    pub preference: ThemePreference,
    pub palette: Palette,
    pub pointer: PointerFocus,
    /// Expanded content items, in first-toggled order
    pub expanded: Vec<ContentItemId>,
}

/// Owner of theme, pointer, and expansion state
#[derive(Debug)]
pub struct ThemeProvider {
    theme: ThemeState,
    pointer: PointerTracker,
    expansion: ExpansionRegistry,
}

impl ThemeProvider {
    /// Initialize from storage; the preference is read once here
    pub fn init(storage: Box<dyn PreferenceStorage>, root: Box<dyn DocumentRoot>) -> Self {
        Self {
            theme: ThemeState::init(storage, root),
            pointer: PointerTracker::new(),
            expansion: ExpansionRegistry::new(),
        }
    }

    /// Provider backed by memory storage and a detached root (tests, previews)
    pub fn in_memory() -> Self {
        Self::init(Box::new(MemoryStorage::new()), Box::new(RootClassList::new()))
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeState {
        &mut self.theme
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerTracker {
        &mut self.pointer
    }

    pub fn expansion(&self) -> &ExpansionRegistry {
        &self.expansion
    }

    pub fn expansion_mut(&mut self) -> &mut ExpansionRegistry {
        &mut self.expansion
    }

    /// Copy out the current state
    pub fn snapshot(&self) -> ProviderSnapshot {
        ProviderSnapshot {
            preference: self.theme.preference(),
            palette: self.theme.palette(),
            pointer: self.pointer.focus().clone(),
            expanded: self.expansion.expanded_ids().cloned().collect(),
        }
    }
}
