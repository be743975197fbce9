//! The persisted light/dark preference

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage key the preference lives under
pub const STORAGE_KEY: &str = "theme";

/// Light or dark appearance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// The opposite preference
    pub fn toggle(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemePreference::Dark
    }

    /// Stored value and document marker class
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for stored values other than `light` / `dark`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme preference '{0}'")]
pub struct UnknownPreference(pub String);

impl FromStr for ThemePreference {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(UnknownPreference(other.to_string())),
        }
    }
}
