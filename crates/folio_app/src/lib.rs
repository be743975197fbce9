//! Folio Application
//!
//! Composes the portfolio page: content records, per-section animation
//! plans, the mounted [`Page`], the contact form, and the [`FolioApp`] shell
//! that ties them to the theme provider. The `headless_*` modules drive a
//! mounted app from JSON scenarios and emit machine-readable reports.
//!
//! # Example
//!
//! ```rust
//! use folio_app::prelude::*;
//!
//! let outcome = run_scenario(
//!     r#"{"steps": [
//!         {"type": "scroll", "y": 100000},
//!         {"type": "assert_fired", "region": "contact.card", "count": 1}
//!     ]}"#,
//!     RunEnvironment::in_memory(),
//! )
//! .unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod app;
pub mod config;
pub mod contact;
pub mod content;
pub mod error;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod page;
pub mod sections;

pub use app::{AppSnapshot, FolioApp};
pub use config::{FolioConfig, CONFIG_FILE};
pub use contact::{
    ContactForm, ContactMessage, ContactSubmitter, FormStatus, HttpSubmitter, LogSubmitter,
    Notice, ScriptedSubmitter,
};
pub use content::Content;
pub use error::{ConfigError, ContentError, PageError, Result, SubmitError};
pub use headless_report::{HeadlessReport, ReportStatus, StepFailure};
pub use headless_runner::{run_loaded_scenario, run_scenario, RunEnvironment, RunOutcome};
pub use headless_scenario::{HeadlessScenario, ScenarioStep};
pub use page::{Page, PageEvent};
pub use sections::{plan_page, plan_section, SectionKind, SectionPlan};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::app::{AppSnapshot, FolioApp};
    pub use crate::config::FolioConfig;
    pub use crate::contact::{ContactMessage, ContactSubmitter};
    pub use crate::content::Content;
    pub use crate::headless_runner::{run_scenario, RunEnvironment, RunOutcome};
    pub use crate::page::Page;

    pub use folio_core::{ContentItemId, Event, RegionKey, Viewport};
    pub use folio_theme::ThemePreference;
}
