//! Folio Theme
//!
//! Theme preference and shared interaction state for the portfolio.
//!
//! # Overview
//!
//! - **Preference**: light or dark, persisted under the `"theme"` key
//! - **Storage**: TOML file on disk, or memory for tests and sandboxed hosts
//! - **State**: [`ThemeState`] with subscribers, a document marker class, and
//!   palette cross-fades on logical time
//! - **Provider**: [`ThemeProvider`] bundles theme, pointer focus, and
//!   expand/collapse state behind one explicitly passed owner
//!
//! # Quick Start
//!
//! ```rust
//! use folio_theme::{MemoryStorage, RootClassList, ThemePreference, ThemeProvider};
//!
//! let mut provider = ThemeProvider::init(
//!     Box::new(MemoryStorage::new()),
//!     Box::new(RootClassList::new()),
//! );
//! assert_eq!(provider.theme().preference(), ThemePreference::Light);
//!
//! provider.theme_mut().toggle();
//! assert!(provider.snapshot().preference.is_dark());
//! ```

pub mod palette;
pub mod preference;
pub mod provider;
pub mod state;
pub mod storage;

pub use palette::{ColorToken, Palette};
pub use preference::{ThemePreference, UnknownPreference, STORAGE_KEY};
pub use provider::{ProviderSnapshot, ThemeProvider};
pub use state::{DocumentRoot, RootClassList, SubscriptionId, ThemeState, DEFAULT_TRANSITION_MS};
pub use storage::{FileStorage, MemoryStorage, PreferenceStorage, StorageError, StorageResult};
