//! Layout queries supplied by the embedding page

use folio_core::Rect;
use rustc_hash::FxHashMap;
use std::fmt;

/// Identifier of a laid-out element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of element geometry
pub trait LayoutHost {
    /// Bounds of `element` in document coordinates, if it has been laid out
    fn element_bounds(&self, element: ElementId) -> Option<Rect>;

    /// Bounds that are usable for trigger math (present and non-empty)
    fn measured_bounds(&self, element: ElementId) -> Option<Rect> {
        self.element_bounds(element).filter(|rect| !rect.is_empty())
    }
}

/// Layout table filled in by the page after each layout pass
#[derive(Debug, Default, Clone)]
pub struct LayoutMap {
    bounds: FxHashMap<ElementId, Rect>,
}

impl LayoutMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, element: ElementId, bounds: Rect) {
        self.bounds.insert(element, bounds);
    }

    pub fn remove(&mut self, element: ElementId) {
        self.bounds.remove(&element);
    }

    pub fn clear(&mut self) {
        self.bounds.clear();
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl LayoutHost for LayoutMap {
    fn element_bounds(&self, element: ElementId) -> Option<Rect> {
        self.bounds.get(&element).copied()
    }
}
