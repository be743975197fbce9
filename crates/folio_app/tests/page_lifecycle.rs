//! Mounted page behavior driven directly through `FolioApp`

use folio_app::contact::ScriptedSubmitter;
use folio_app::{Content, FolioApp, FolioConfig};
use folio_core::Event;
use folio_theme::{MemoryStorage, RootClassList};
use std::sync::Arc;

fn app() -> FolioApp {
    FolioApp::new(
        &FolioConfig::default(),
        &Content::sample(),
        Box::new(MemoryStorage::new()),
        Box::new(RootClassList::new()),
        Arc::new(ScriptedSubmitter::new()),
    )
    .unwrap()
}

fn scroll(app: &mut FolioApp, y: f32, now_ms: u64) {
    app.dispatch(Event::scroll(y, now_ms));
    app.frame(now_ms).unwrap();
}

#[test]
fn unmount_before_crossing_never_fires() {
    let mut app = app();
    app.frame(0).unwrap();
    assert_eq!(app.page().fire_count("contact.card"), Some(0));

    app.unmount();
    scroll(&mut app, 100_000.0, 16);
    app.frame(5000).unwrap();

    assert_eq!(app.page().fire_count("contact.card"), None);
    assert!(app.snapshot().fired.is_empty());
    assert!(!app.page().has_active_animations());
}

#[test]
fn parallax_depends_only_on_scroll_offset() {
    let mut app = app();
    app.frame(0).unwrap();

    scroll(&mut app, 2000.0, 16);
    let first = app.page().properties("education.backdrop").unwrap();

    scroll(&mut app, 2600.0, 32);
    let moved = app.page().properties("education.backdrop").unwrap();
    assert_ne!(first, moved);

    scroll(&mut app, 2000.0, 5000);
    let again = app.page().properties("education.backdrop").unwrap();
    assert_eq!(first, again);
}

#[test]
fn entrance_fires_before_its_parallax_starts() {
    let mut app = app();
    app.frame(0).unwrap();

    app.dispatch(Event::scroll(4700.0, 16));
    let events = app.frame(16).unwrap();
    let image: Vec<_> = events
        .iter()
        .filter(|e| e.region == "projects.image.0")
        .map(|e| e.event)
        .collect();

    let fired = image
        .iter()
        .position(|e| matches!(e, folio_animation::RevealEvent::Fired { .. }));
    let parallax = image
        .iter()
        .position(|e| matches!(e, folio_animation::RevealEvent::ParallaxStarted { .. }));
    assert!(fired.is_some(), "{image:?}");
    if let (Some(fired), Some(parallax)) = (fired, parallax) {
        assert!(fired < parallax);
    }
}

#[test]
fn entrance_animation_settles_in_place() {
    let mut app = app();
    app.frame(0).unwrap();
    app.frame(2000).unwrap();

    let heading = app.page().properties("home.heading").unwrap();
    assert!((heading.resolved_opacity() - 1.0).abs() < 1e-3);
    assert!(heading.resolved_translate().1.abs() < 1e-3);
}
