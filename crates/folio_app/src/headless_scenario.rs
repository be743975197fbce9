//! Scenario definition for headless page runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Sequence of scripted inputs and checks.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    /// Optional label echoed into logs
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("invalid scenario JSON")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("in scenario {}", path.display()))
    }

    /// Whether any step checks state
    pub fn has_assertions(&self) -> bool {
        self.steps.iter().any(ScenarioStep::is_assertion)
    }
}

/// One scripted step.
///
/// Region names are page region names (`"projects.card.0"`), a number for a
/// skill card, or `"global"` for the cursor follower.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    // Input
    Scroll {
        y: f32,
    },
    Resize {
        width: f32,
        height: f32,
    },
    PointerEnter {
        region: String,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    PointerMove {
        region: String,
        x: f32,
        y: f32,
    },
    PointerLeave {
        region: String,
    },
    ToggleExpand {
        id: String,
        #[serde(default)]
        exclusive: bool,
    },
    SetTheme {
        value: String,
    },
    ToggleTheme,
    SubmitContact {
        name: String,
        email: String,
        message: String,
        /// Scripted failure message; the submission fails with a network error
        #[serde(default)]
        fail: Option<String>,
    },

    // Time
    Wait {
        ms: u64,
    },
    Tick {
        frames: u32,
    },

    // Checks
    AssertFired {
        region: String,
        count: u32,
    },
    AssertTheme {
        value: String,
    },
    AssertExpanded {
        id: String,
        expanded: bool,
    },
    AssertActiveRegion {
        #[serde(default)]
        region: Option<String>,
    },
    AssertNotice {
        /// `"success"`, `"error"`, or `"none"`
        value: String,
    },
}

impl ScenarioStep {
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            ScenarioStep::AssertFired { .. }
                | ScenarioStep::AssertTheme { .. }
                | ScenarioStep::AssertExpanded { .. }
                | ScenarioStep::AssertActiveRegion { .. }
                | ScenarioStep::AssertNotice { .. }
        )
    }

    /// Step name as written in the scenario
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioStep::Scroll { .. } => "scroll",
            ScenarioStep::Resize { .. } => "resize",
            ScenarioStep::PointerEnter { .. } => "pointer_enter",
            ScenarioStep::PointerMove { .. } => "pointer_move",
            ScenarioStep::PointerLeave { .. } => "pointer_leave",
            ScenarioStep::ToggleExpand { .. } => "toggle_expand",
            ScenarioStep::SetTheme { .. } => "set_theme",
            ScenarioStep::ToggleTheme => "toggle_theme",
            ScenarioStep::SubmitContact { .. } => "submit_contact",
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::AssertFired { .. } => "assert_fired",
            ScenarioStep::AssertTheme { .. } => "assert_theme",
            ScenarioStep::AssertExpanded { .. } => "assert_expanded",
            ScenarioStep::AssertActiveRegion { .. } => "assert_active_region",
            ScenarioStep::AssertNotice { .. } => "assert_notice",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let scenario = HeadlessScenario::from_json(
            r#"{
                "steps": [
                    {"type": "scroll", "y": 1200},
                    {"type": "pointer_enter", "region": "global"},
                    {"type": "toggle_theme"},
                    {"type": "assert_active_region"},
                    {"type": "assert_fired", "region": "home.heading", "count": 1}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.steps.len(), 5);
        assert!(matches!(
            scenario.steps[1],
            ScenarioStep::PointerEnter { x, .. } if x == 0.0
        ));
        assert!(matches!(
            scenario.steps[3],
            ScenarioStep::AssertActiveRegion { region: None }
        ));
        assert!(scenario.has_assertions());
    }

    #[test]
    fn unknown_step_is_an_error() {
        let err = HeadlessScenario::from_json(r#"{"steps": [{"type": "explode"}]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid scenario"));
    }
}
