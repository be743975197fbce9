//! Identifiers for interactive regions and content items

use std::fmt;

/// Identifies an interactive region that can hold pointer focus
///
/// `Global` is the sentinel used by viewport-wide effects (the cursor
/// follower). Its coordinates are raw viewport coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionKey {
    Index(usize),
    Named(String),
    Global,
}

impl RegionKey {
    pub fn index(index: usize) -> Self {
        RegionKey::Index(index)
    }

    pub fn named(name: impl Into<String>) -> Self {
        RegionKey::Named(name.into())
    }

    pub fn is_global(&self) -> bool {
        matches!(self, RegionKey::Global)
    }

    /// Parse the scenario form: `"global"`, a number, or any other name
    pub fn parse(raw: &str) -> Self {
        if raw == "global" {
            return RegionKey::Global;
        }
        match raw.parse::<usize>() {
            Ok(index) => RegionKey::Index(index),
            Err(_) => RegionKey::Named(raw.to_string()),
        }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKey::Index(i) => write!(f, "{i}"),
            RegionKey::Named(name) => f.write_str(name),
            RegionKey::Global => f.write_str("global"),
        }
    }
}

/// Identifies an expandable content item (sequence index or stable key)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContentItemId {
    Index(usize),
    Key(String),
}

impl ContentItemId {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(index) => ContentItemId::Index(index),
            Err(_) => ContentItemId::Key(raw.to_string()),
        }
    }
}

impl From<usize> for ContentItemId {
    fn from(index: usize) -> Self {
        ContentItemId::Index(index)
    }
}

impl From<&str> for ContentItemId {
    fn from(key: &str) -> Self {
        ContentItemId::Key(key.to_string())
    }
}

impl fmt::Display for ContentItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentItemId::Index(i) => write!(f, "{i}"),
            ContentItemId::Key(key) => f.write_str(key),
        }
    }
}
