//! The application shell
//!
//! [`FolioApp`] owns the [`ThemeProvider`], the mounted [`Page`], and the
//! contact form. Host events are queued with [`FolioApp::dispatch`] and applied
//! once per frame, so a burst of pointer moves or scrolls produces a single
//! state write.

use crate::config::FolioConfig;
use crate::contact::{ContactForm, ContactMessage, ContactSubmitter, Notice};
use crate::content::Content;
use crate::error::{PageError, Result, SubmitError};
use crate::page::{Page, PageEvent};
use folio_core::events::event_types;
use folio_core::{ContentItemId, Event, EventData, EventQueue, Point, RegionKey, Viewport};
use folio_theme::{
    ColorToken, DocumentRoot, Palette, PreferenceStorage, SubscriptionId, ThemePreference,
    ThemeProvider,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

/// Everything an observer of the app can check, in one consistent read
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub now_ms: u64,
    pub scroll_y: f32,
    pub theme: ThemePreference,
    /// Fire count per region, in page order
    pub fired: IndexMap<String, u32>,
    pub expanded: Vec<String>,
    pub active_region: Option<String>,
    /// Region-relative pointer position while a region is active
    pub pointer: Option<[f32; 2]>,
    /// Cursor follower position; only while the global region is active
    pub cursor: Option<[f32; 2]>,
    pub contact_notice: Option<String>,
    pub star_count: usize,
    pub star_generation: u32,
}

/// A running portfolio page
pub struct FolioApp {
    provider: ThemeProvider,
    page: Page,
    contact: ContactForm,
    submitter: Arc<dyn ContactSubmitter>,
    events: EventQueue,
    theme_changed: Rc<Cell<bool>>,
    subscription: Option<SubscriptionId>,
    now_ms: u64,
}

impl FolioApp {
    /// Initialize theme state from storage and mount the page
    pub fn new(
        config: &FolioConfig,
        content: &Content,
        storage: Box<dyn PreferenceStorage>,
        root: Box<dyn DocumentRoot>,
        submitter: Arc<dyn ContactSubmitter>,
    ) -> Result<Self> {
        let mut provider = ThemeProvider::init(storage, root);
        provider
            .theme_mut()
            .set_transition_ms(config.motion.theme_transition_ms);

        let theme_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&theme_changed);
        let subscription = provider
            .theme_mut()
            .subscribe(move |_| flag.set(true));

        let viewport = Viewport::new(config.viewport.width, config.viewport.height);
        let star_color = Palette::for_preference(provider.theme().preference()).get(ColorToken::Star);
        let page = Page::mount(content, &config.motion, viewport, star_color)?;

        tracing::info!(
            theme = %provider.theme().preference(),
            persistent = provider.theme().is_persistent(),
            "folio app started"
        );

        Ok(Self {
            provider,
            page,
            contact: ContactForm::new(config.contact.confirmation_ms),
            submitter,
            events: EventQueue::new(),
            theme_changed,
            subscription: Some(subscription),
            now_ms: 0,
        })
    }

    pub fn provider(&self) -> &ThemeProvider {
        &self.provider
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    // ========== Input ==========

    /// Queue a host event for the next frame
    pub fn dispatch(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Apply every queued event. Returns how many were applied.
    pub fn pump(&mut self) -> Result<usize> {
        let events = self.events.drain_frame();
        let count = events.len();
        for event in events {
            self.apply(event)?;
        }
        Ok(count)
    }

    fn apply(&mut self, event: Event) -> Result<()> {
        match (event.event_type, event.data) {
            (event_types::SCROLL, EventData::Scroll { scroll_y }) => self.page.scroll_to(scroll_y),
            (event_types::RESIZE, EventData::Resize { width, height }) => {
                self.page.resize(width, height)
            }
            (event_types::UNMOUNT, _) => self.unmount(),
            (kind, EventData::Pointer { client_x, client_y }) => {
                let Some(key) = event.target else {
                    return Ok(());
                };
                self.apply_pointer(kind, key, client_x, client_y)?;
            }
            (kind, _) => tracing::trace!(kind, "ignored event"),
        }
        Ok(())
    }

    fn apply_pointer(&mut self, kind: u32, key: RegionKey, x: f32, y: f32) -> Result<()> {
        let name = self.region_name(&key);
        let bounds = name.as_deref().and_then(|n| self.page.client_bounds(n));
        let hoverable = name
            .as_deref()
            .filter(|n| n.contains(".card.") && self.page.region(n).is_some());
        let pointer = self.provider.pointer_mut();

        match kind {
            event_types::POINTER_ENTER => {
                pointer.on_pointer_enter(key.clone(), bounds);
                pointer.on_pointer_move(key, x, y);
                if let Some(name) = hoverable {
                    self.page.hover(name, true)?;
                }
            }
            event_types::POINTER_MOVE => match bounds {
                Some(bounds) => pointer.on_pointer_move_within(key, bounds, x, y),
                None => pointer.on_pointer_move(key, x, y),
            },
            event_types::POINTER_LEAVE => {
                pointer.on_pointer_leave(&key);
                if let Some(name) = hoverable {
                    self.page.hover(name, false)?;
                }
            }
            other => tracing::trace!(kind = other, "ignored pointer event"),
        }
        Ok(())
    }

    /// Page region a pointer key refers to
    ///
    /// Numeric keys address the skill cards; the global key has no region.
    fn region_name(&self, key: &RegionKey) -> Option<String> {
        match key {
            RegionKey::Index(index) => Some(format!("skills.card.{index}")),
            RegionKey::Named(name) => Some(name.clone()),
            RegionKey::Global => None,
        }
    }

    // ========== Frame ==========

    /// Advance to `now_ms`: apply input, then theme, contact, and page work
    pub fn frame(&mut self, now_ms: u64) -> Result<Vec<PageEvent>> {
        self.now_ms = self.now_ms.max(now_ms);
        self.pump()?;

        let theme = self.provider.theme_mut();
        theme.tick(self.now_ms);
        if self.theme_changed.replace(false) {
            let star = Palette::for_preference(theme.preference()).get(ColorToken::Star);
            self.page.set_star_color(star);
        }

        self.contact.tick(self.now_ms);
        Ok(self.page.update(self.now_ms))
    }

    // ========== Shared state ==========

    pub fn set_theme(&mut self, preference: ThemePreference) {
        self.provider.theme_mut().set_preference(preference);
    }

    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.provider.theme_mut().toggle()
    }

    /// Toggle an expandable item; `exclusive` collapses every other item
    pub fn toggle_expand(&mut self, id: ContentItemId, exclusive: bool) -> bool {
        let expansion = self.provider.expansion_mut();
        if exclusive {
            expansion.toggle_exclusive(id)
        } else {
            expansion.toggle(id)
        }
    }

    /// Cursor follower position in viewport coordinates
    pub fn cursor_follower(&self) -> Option<Point> {
        self.provider
            .pointer()
            .focus()
            .position_in(&RegionKey::Global)
    }

    /// Submit the contact form with `message` as its fields
    pub async fn submit_contact(
        &mut self,
        message: ContactMessage,
    ) -> std::result::Result<(), SubmitError> {
        self.contact.set_draft(message);
        let submitter = Arc::clone(&self.submitter);
        self.contact.submit(submitter.as_ref(), self.now_ms).await
    }

    /// Tear everything down; later frames are no-ops for the page
    pub fn unmount(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.provider.theme_mut().unsubscribe(id);
        }
        self.page.unmount();
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let provider = self.provider.snapshot();
        let star_field = self.page.star_field();
        AppSnapshot {
            now_ms: self.now_ms,
            scroll_y: self.page.viewport().scroll_y,
            theme: provider.preference,
            fired: self.page.fire_counts(),
            expanded: provider.expanded.iter().map(ToString::to_string).collect(),
            active_region: provider.pointer.active_region.as_ref().map(ToString::to_string),
            pointer: provider
                .pointer
                .active_region
                .as_ref()
                .map(|_| [provider.pointer.position.x, provider.pointer.position.y]),
            cursor: self.cursor_follower().map(|p| [p.x, p.y]),
            contact_notice: self.contact.notice().map(|notice| match notice {
                Notice::Success => "success".to_string(),
                Notice::Error(message) => format!("error: {message}"),
            }),
            star_count: star_field.stars().len(),
            star_generation: star_field.generation(),
        }
    }

    /// Fail if the page has been unmounted
    pub fn ensure_mounted(&self) -> Result<()> {
        if self.page.is_mounted() {
            Ok(())
        } else {
            Err(PageError::NotMounted)
        }
    }
}

impl std::fmt::Debug for FolioApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolioApp")
            .field("now_ms", &self.now_ms)
            .field("page", &self.page)
            .finish()
    }
}
