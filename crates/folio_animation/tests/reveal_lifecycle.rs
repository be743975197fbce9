//! Reveal region lifecycle against a simulated scrolling page

use folio_animation::{
    AnimationPreset, AnimationScheduler, AnimationTarget, ArmOutcome, ElementId, LayoutMap,
    ObserverRegistry, RevealDescriptor, RevealEvent, RevealRegion, RevealState, SchedulerHandle,
    ScrubBinding, StaggerConfig,
};
use folio_core::{Rect, Viewport};
use std::cell::RefCell;
use std::rc::Rc;

const SECTION: ElementId = ElementId(1);

struct Page {
    layout: LayoutMap,
    observers: ObserverRegistry,
    scheduler: Rc<RefCell<AnimationScheduler>>,
}

impl Page {
    fn new() -> Self {
        let mut layout = LayoutMap::new();
        // Section sits 2000px down the document, 400px tall
        layout.set(SECTION, Rect::new(0.0, 2000.0, 1280.0, 400.0));
        Self {
            layout,
            observers: ObserverRegistry::new(),
            scheduler: AnimationScheduler::new().shared(),
        }
    }

    fn handle(&self) -> SchedulerHandle {
        SchedulerHandle::new(&self.scheduler)
    }

    fn arm(&self, region: &mut RevealRegion) -> ArmOutcome {
        region.arm(&self.layout, &self.observers, self.handle())
    }

    fn scroll(&self, region: &mut RevealRegion, scroll_y: f32) -> Vec<RevealEvent> {
        let viewport = Viewport::new(1280.0, 1000.0).with_scroll(scroll_y);
        let owned: Vec<_> = self
            .observers
            .process(&viewport, &self.layout)
            .into_iter()
            .filter(|event| region.owns(event.id()))
            .collect();
        let mut out = Vec::new();
        for event in &owned {
            out.extend(region.handle(event));
        }
        out
    }
}

fn fired(events: &[RevealEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, RevealEvent::Fired { .. }))
        .count()
}

fn enter_exit_reenter(descriptor: RevealDescriptor) -> u32 {
    let page = Page::new();
    let mut region = RevealRegion::new(SECTION, descriptor);
    assert_eq!(page.arm(&mut region), ArmOutcome::Armed);

    page.scroll(&mut region, 0.0);
    page.scroll(&mut region, 1500.0);
    page.scroll(&mut region, 0.0);
    page.scroll(&mut region, 1500.0);
    region.fire_count()
}

#[test]
fn fires_once_by_default() {
    let descriptor = RevealDescriptor::new(AnimationPreset::fade_up(1000, 50.0));
    assert_eq!(enter_exit_reenter(descriptor), 1);
}

#[test]
fn refires_when_repeatable() {
    let descriptor = RevealDescriptor::new(AnimationPreset::fade_up(1000, 50.0)).repeatable(true);
    assert_eq!(enter_exit_reenter(descriptor), 2);
}

#[test]
fn toggle_action_policies() {
    let once = RevealDescriptor::new(AnimationPreset::fade_in(800))
        .toggle_actions("play none none none")
        .unwrap();
    assert_eq!(enter_exit_reenter(once), 1);

    let restart = RevealDescriptor::new(AnimationPreset::fade_in(800))
        .toggle_actions("restart pause resume pause")
        .unwrap();
    assert_eq!(enter_exit_reenter(restart), 2);
}

#[test]
fn enter_back_resumes_a_paused_entrance() {
    let page = Page::new();
    let mut region = RevealRegion::new(
        SECTION,
        RevealDescriptor::new(AnimationPreset::fade_in(800))
            .toggle_actions("restart pause resume pause")
            .unwrap(),
    );
    page.arm(&mut region);
    let target = AnimationTarget::element(SECTION);

    assert_eq!(fired(&page.scroll(&mut region, 1500.0)), 1);
    page.scheduler.borrow_mut().tick(400);
    let halfway = page.scheduler.borrow().value(&target);

    // Past the section: paused where it was
    page.scroll(&mut region, 4000.0);
    page.scheduler.borrow_mut().tick(5_000);
    assert_eq!(page.scheduler.borrow().value(&target), halfway);

    // Back into range: resumed, not restarted
    assert_eq!(fired(&page.scroll(&mut region, 2000.0)), 0);
    assert_eq!(region.fire_count(), 1);
    assert_eq!(page.scheduler.borrow().value(&target), halfway);
    page.scheduler.borrow_mut().tick(5_400);
    assert_ne!(page.scheduler.borrow().value(&target), halfway);

    // Leaving backwards re-arms; the next entry restarts
    page.scroll(&mut region, 0.0);
    assert_eq!(fired(&page.scroll(&mut region, 1500.0)), 1);
    assert_eq!(region.fire_count(), 2);
}

#[test]
fn repeatable_in_view_refires_after_scrolling_past() {
    let page = Page::new();
    let mut region = RevealRegion::new(
        SECTION,
        RevealDescriptor::new(AnimationPreset::fade_right(800, 50.0))
            .in_view(0.3)
            .unwrap()
            .repeatable(true),
    );
    page.arm(&mut region);

    assert_eq!(fired(&page.scroll(&mut region, 1500.0)), 1);
    // Scrolled well past: element above the viewport
    page.scroll(&mut region, 4000.0);
    assert_eq!(region.state(), RevealState::Armed);
    assert_eq!(fired(&page.scroll(&mut region, 1800.0)), 1);
    assert_eq!(region.fire_count(), 2);
}

#[test]
fn arming_is_idempotent() {
    let page = Page::new();
    let mut region = RevealRegion::new(SECTION, RevealDescriptor::new(AnimationPreset::fade_in(500)));
    assert_eq!(page.arm(&mut region), ArmOutcome::Armed);
    assert_eq!(page.arm(&mut region), ArmOutcome::AlreadyArmed);
    assert_eq!(page.observers.len(), 1);

    assert_eq!(fired(&page.scroll(&mut region, 1500.0)), 1);
    assert_eq!(page.scheduler.borrow().owned_count(SECTION), 1);
}

#[test]
fn arming_defers_without_geometry() {
    let mut page = Page::new();
    let card = ElementId(42);
    let mut region = RevealRegion::new(card, RevealDescriptor::new(AnimationPreset::fade_in(500)));

    assert_eq!(page.arm(&mut region), ArmOutcome::Deferred);
    assert_eq!(region.state(), RevealState::Unarmed);
    assert!(page.observers.is_empty());

    // Zero-size boxes are not usable either
    page.layout.set(card, Rect::new(0.0, 900.0, 0.0, 0.0));
    assert_eq!(page.arm(&mut region), ArmOutcome::Deferred);

    page.layout.set(card, Rect::new(0.0, 900.0, 300.0, 200.0));
    assert_eq!(page.arm(&mut region), ArmOutcome::Armed);
}

#[test]
fn teardown_before_crossing_never_fires() {
    let page = Page::new();
    let mut region = RevealRegion::new(SECTION, RevealDescriptor::new(AnimationPreset::fade_in(500)));
    page.arm(&mut region);
    page.scroll(&mut region, 0.0);

    region.teardown();
    assert_eq!(region.state(), RevealState::TornDown);
    assert!(page.observers.is_empty());

    assert!(page.scroll(&mut region, 1500.0).is_empty());
    assert_eq!(region.fire_count(), 0);
    assert_eq!(page.arm(&mut region), ArmOutcome::TornDown);
}

#[test]
fn dropping_a_region_releases_observers_and_animations() {
    let page = Page::new();
    {
        let mut region = RevealRegion::new(
            SECTION,
            RevealDescriptor::new(AnimationPreset::fade_up(1000, 40.0))
                .stagger(5, StaggerConfig::new(100))
                .scrub(ScrubBinding::parallax_y(-80.0)),
        );
        page.arm(&mut region);
        page.scroll(&mut region, 1500.0);
        assert_eq!(page.observers.len(), 2);
        assert_eq!(page.scheduler.borrow().owned_count(SECTION), 5);
    }
    assert!(page.observers.is_empty());
    assert_eq!(page.scheduler.borrow().owned_count(SECTION), 0);
}

#[test]
fn panic_during_render_still_releases() {
    let page = Page::new();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut region = RevealRegion::new(SECTION, RevealDescriptor::new(AnimationPreset::fade_in(500)));
        page.arm(&mut region);
        page.scroll(&mut region, 1500.0);
        panic!("render failed");
    }));
    assert!(result.is_err());
    assert!(page.observers.is_empty());
    assert_eq!(page.scheduler.borrow().owned_count(SECTION), 0);
}

#[test]
fn mount_unmount_churn_leaves_nothing_behind() {
    let page = Page::new();
    for _ in 0..50 {
        let mut region = RevealRegion::new(SECTION, RevealDescriptor::new(AnimationPreset::fade_in(500)));
        page.arm(&mut region);
    }
    assert!(page.observers.is_empty());
    assert_eq!(page.scheduler.borrow().playback_count(), 0);
}

#[test]
fn stagger_offsets_follow_index() {
    let page = Page::new();
    let interval = 100;
    let parts = 6;
    let mut region = RevealRegion::new(
        SECTION,
        RevealDescriptor::new(AnimationPreset::fade_up(600, 30.0))
            .stagger(parts, StaggerConfig::new(interval)),
    );
    page.arm(&mut region);
    page.scheduler.borrow_mut().tick(5_000);

    let events = page.scroll(&mut region, 1500.0);
    let fire_time = match events.first() {
        Some(RevealEvent::Fired { at_ms, .. }) => *at_ms,
        other => panic!("expected fire, got {other:?}"),
    };
    assert_eq!(fire_time, 5_000);

    let starts = page.scheduler.borrow().scheduled_starts(SECTION);
    assert_eq!(starts.len(), parts);
    for (k, (target, at)) in starts.iter().enumerate() {
        assert_eq!(*target, AnimationTarget::part(SECTION, k));
        assert_eq!(*at - fire_time, k as u64 * interval as u64);
    }
}

#[test]
fn teardown_cancels_pending_stagger_children() {
    let page = Page::new();
    let mut region = RevealRegion::new(
        SECTION,
        RevealDescriptor::new(AnimationPreset::fade_up(600, 30.0)).stagger(4, StaggerConfig::new(250)),
    );
    page.arm(&mut region);
    page.scroll(&mut region, 1500.0);
    page.scheduler.borrow_mut().tick(300);

    region.teardown();
    assert_eq!(page.scheduler.borrow().owned_count(SECTION), 0);
    let events = page.scheduler.borrow_mut().tick(2_000);
    assert!(events.is_empty());
}

#[test]
fn entrance_fires_before_parallax() {
    let page = Page::new();
    let mut region = RevealRegion::new(
        SECTION,
        RevealDescriptor::new(AnimationPreset::fade_in(500)).scrub(ScrubBinding::parallax_y(-100.0)),
    );
    page.arm(&mut region);

    // Scrub range (from scroll 1000) starts before the trigger (scroll 1150)
    assert!(page.scroll(&mut region, 1100.0).is_empty());
    assert_eq!(region.state(), RevealState::Armed);

    let events = page.scroll(&mut region, 1200.0);
    assert!(matches!(events[0], RevealEvent::Fired { .. }));
    assert!(matches!(events[1], RevealEvent::ParallaxStarted { .. }));
    assert!(matches!(events[2], RevealEvent::ParallaxUpdated { .. }));
    assert_eq!(region.state(), RevealState::Parallaxing);

    page.scroll(&mut region, 5000.0);
    assert_eq!(region.state(), RevealState::Fired);
    assert_eq!(region.scrub_progress(), Some(1.0));
}

#[test]
fn parallax_value_depends_only_on_scroll_offset() {
    let page = Page::new();
    let mut region = RevealRegion::new(
        SECTION,
        RevealDescriptor::scrub_only(ScrubBinding::parallax_y(-140.0)),
    );
    page.arm(&mut region);

    page.scroll(&mut region, 1700.0);
    let first = region.scrub_value();
    for y in [1200.0, 2300.0, 1010.0, 1999.0] {
        page.scroll(&mut region, y);
    }
    page.scroll(&mut region, 1700.0);
    assert_eq!(region.scrub_value(), first);
    assert_eq!(first.and_then(|v| v.translate_y), Some(-70.0));
}

#[test]
fn scroll_only_region_counts_first_entry_as_fire() {
    let page = Page::new();
    let mut region = RevealRegion::new(
        SECTION,
        RevealDescriptor::scrub_only(ScrubBinding::line_grow(
            "top center".parse().unwrap(),
            "bottom center".parse().unwrap(),
        )),
    );
    page.arm(&mut region);
    assert_eq!(page.observers.len(), 1);

    let events = page.scroll(&mut region, 1700.0);
    assert_eq!(fired(&events), 1);
    assert_eq!(region.state(), RevealState::Parallaxing);
    assert_eq!(region.scrub_value().and_then(|v| v.scale_y), Some(0.5));
}
