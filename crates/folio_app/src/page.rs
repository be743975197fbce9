//! The mounted page
//!
//! Owns the document layout, one [`RevealRegion`] per planned region, the
//! animation scheduler, floating decorations, and the star field. Everything
//! runs on logical time supplied through [`Page::update`].

use crate::config::MotionConfig;
use crate::content::Content;
use crate::error::{PageError, Result};
use crate::sections::{plan_page, SectionKind};
use folio_animation::{
    AnimationPreset, AnimationScheduler, AnimationTarget, ArmOutcome, ElementId,
    KeyframeProperties, LayoutHost, LayoutMap, ObserverEvent, ObserverRegistry, RevealEvent,
    RevealRegion,
    SchedulerHandle, StarField, ToggleAction, TweenId,
};
use folio_core::{Color, Rect, Viewport};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Reveal notification tagged with the region name
#[derive(Clone, Debug, PartialEq)]
pub struct PageEvent {
    pub region: String,
    pub event: RevealEvent,
}

struct MountedRegion {
    section: SectionKind,
    region: RevealRegion,
    armed: bool,
}

struct Decoration {
    element: ElementId,
}

/// A mounted portfolio page
pub struct Page {
    viewport: Viewport,
    layout: LayoutMap,
    observers: ObserverRegistry,
    scheduler: Rc<RefCell<AnimationScheduler>>,
    regions: IndexMap<String, MountedRegion>,
    by_element: FxHashMap<ElementId, String>,
    floats: IndexMap<String, Decoration>,
    hovers: FxHashMap<String, TweenId>,
    sections: IndexMap<SectionKind, Rect>,
    star_field: StarField,
    document_height: f32,
    now_ms: u64,
    mounted: bool,
}

impl Page {
    /// Lay out every section, create its regions, and arm them
    pub fn mount(
        content: &Content,
        motion: &MotionConfig,
        viewport: Viewport,
        star_color: Color,
    ) -> Result<Self> {
        let plans = plan_page(content, motion)?;

        let mut scheduler = AnimationScheduler::new();
        scheduler.set_reduced_motion(motion.reduced_motion);

        let mut page = Self {
            viewport,
            layout: LayoutMap::new(),
            observers: ObserverRegistry::new(),
            scheduler: scheduler.shared(),
            regions: IndexMap::new(),
            by_element: FxHashMap::default(),
            floats: IndexMap::new(),
            hovers: FxHashMap::default(),
            sections: IndexMap::new(),
            star_field: StarField::new(motion.star_seed, viewport.width, star_color),
            document_height: 0.0,
            now_ms: 0,
            mounted: true,
        };

        let mut next_id = 1u64;
        let mut top = 0.0;
        for plan in plans {
            page.sections
                .insert(plan.kind, Rect::new(0.0, top, viewport.width, plan.height));

            for region in plan.regions {
                let element = ElementId(next_id);
                next_id += 1;
                page.layout.set(
                    element,
                    Rect::new(
                        region.x_frac * viewport.width,
                        top + region.offset_y,
                        region.width_frac * viewport.width,
                        region.height,
                    ),
                );
                page.by_element.insert(element, region.name.clone());
                page.regions.insert(
                    region.name,
                    MountedRegion {
                        section: plan.kind,
                        region: RevealRegion::new(element, region.descriptor),
                        armed: false,
                    },
                );
            }

            for float in plan.floats {
                let element = ElementId(next_id);
                next_id += 1;
                page.layout.set(
                    element,
                    Rect::new(
                        float.x_frac * viewport.width,
                        top + float.offset_y,
                        float.width_frac * viewport.width,
                        float.height,
                    ),
                );
                page.scheduler.borrow_mut().start(
                    element,
                    AnimationTarget::element(element),
                    AnimationPreset::float_loop(float.index),
                );
                page.floats.insert(float.name, Decoration { element });
            }

            top += plan.height;
        }
        page.document_height = top;
        page.arm_pending();

        tracing::debug!(
            regions = page.regions.len(),
            floats = page.floats.len(),
            height = page.document_height,
            "page mounted"
        );
        Ok(page)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Scroll to an absolute offset, clamped to the document
    pub fn scroll_to(&mut self, scroll_y: f32) {
        let max = (self.document_height - self.viewport.height).max(0.0);
        self.viewport.scroll_y = scroll_y.clamp(0.0, max);
    }

    /// Viewport resized; the star field redraws after its debounce
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.star_field.on_resize(width, self.now_ms);
        self.scroll_to(self.viewport.scroll_y);
    }

    /// Theme changed: recolor the star field
    pub fn set_star_color(&mut self, color: Color) {
        self.star_field.set_color(color);
    }

    pub fn star_field(&self) -> &StarField {
        &self.star_field
    }

    /// Advance to `now_ms` and react to the current scroll position
    ///
    /// Animations are advanced first so tweens started by this frame's fires
    /// are anchored at `now_ms`.
    pub fn update(&mut self, now_ms: u64) -> Vec<PageEvent> {
        if !self.mounted {
            return Vec::new();
        }
        self.now_ms = self.now_ms.max(now_ms);
        self.scheduler.borrow_mut().tick(self.now_ms);
        self.arm_pending();

        let mut out = Vec::new();
        for event in self.observers.process(&self.viewport, &self.layout) {
            let element = match event {
                ObserverEvent::Crossed { element, .. } | ObserverEvent::Progress { element, .. } => {
                    element
                }
            };
            let Some(name) = self.by_element.get(&element) else {
                continue;
            };
            let Some(mounted) = self.regions.get_mut(name) else {
                continue;
            };
            for reveal in mounted.region.handle(&event) {
                out.push(PageEvent {
                    region: name.clone(),
                    event: reveal,
                });
            }
        }

        if self.star_field.tick(self.now_ms) {
            tracing::trace!(generation = self.star_field.generation(), "star field rebuilt after resize");
        }
        out
    }

    /// Pointer entered or left a hoverable region: lift it or settle back
    pub fn hover(&mut self, name: &str, hovered: bool) -> Result<()> {
        let element = self
            .regions
            .get(name)
            .map(|m| m.region.element())
            .ok_or_else(|| PageError::UnknownRegion(name.to_string()))?;
        let mut scheduler = self.scheduler.borrow_mut();
        match (hovered, self.hovers.get(name)) {
            (true, Some(id)) => scheduler.apply(*id, ToggleAction::Play),
            (true, None) => {
                let id = scheduler.start(
                    element,
                    AnimationTarget::part(element, 0),
                    AnimationPreset::hover_lift(300),
                );
                self.hovers.insert(name.to_string(), id);
            }
            (false, Some(id)) => scheduler.apply(*id, ToggleAction::Reverse),
            (false, None) => {}
        }
        Ok(())
    }

    // ========== Queries ==========

    /// Region names in mount order
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn region(&self, name: &str) -> Option<&RevealRegion> {
        self.regions.get(name).map(|m| &m.region)
    }

    pub fn section_of(&self, name: &str) -> Option<SectionKind> {
        self.regions.get(name).map(|m| m.section)
    }

    pub fn fire_count(&self, name: &str) -> Option<u32> {
        self.region(name).map(RevealRegion::fire_count)
    }

    /// Fire counts of every region, in mount order
    pub fn fire_counts(&self) -> IndexMap<String, u32> {
        self.regions
            .iter()
            .map(|(name, m)| (name.clone(), m.region.fire_count()))
            .collect()
    }

    /// Document-space bounds of a region or decoration
    pub fn bounds(&self, name: &str) -> Option<Rect> {
        let element = self
            .regions
            .get(name)
            .map(|m| m.region.element())
            .or_else(|| self.floats.get(name).map(|d| d.element))?;
        self.layout.element_bounds(element)
    }

    /// Bounds in viewport coordinates, for pointer math
    pub fn client_bounds(&self, name: &str) -> Option<Rect> {
        self.bounds(name)
            .map(|rect| rect.offset(0.0, -self.viewport.scroll_y))
    }

    pub fn section_bounds(&self, kind: SectionKind) -> Option<Rect> {
        self.sections.get(&kind).copied()
    }

    /// Current animated properties of a region
    ///
    /// Scroll-linked values are layered over the entrance tween.
    pub fn properties(&self, name: &str) -> Option<KeyframeProperties> {
        let mounted = self.regions.get(name)?;
        let entrance = mounted
            .region
            .targets()
            .first()
            .and_then(|target| self.scheduler.borrow().value(target))
            .unwrap_or_else(|| mounted.region.rest_properties());
        Some(match mounted.region.scrub_value() {
            Some(scrub) => entrance.overlay(&scrub),
            None => entrance,
        })
    }

    /// Current offset of a floating decoration
    pub fn float_properties(&self, name: &str) -> Option<KeyframeProperties> {
        let decoration = self.floats.get(name)?;
        self.scheduler
            .borrow()
            .value(&AnimationTarget::element(decoration.element))
    }

    pub fn has_active_animations(&self) -> bool {
        self.scheduler.borrow().has_active_animations()
    }

    pub fn live_observers(&self) -> usize {
        self.observers.len()
    }

    /// Regions still waiting for geometry
    pub fn deferred_regions(&self) -> Vec<&str> {
        self.regions
            .iter()
            .filter(|(_, m)| !m.armed)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Replace a region's geometry (content reflow, image load)
    pub fn set_bounds(&mut self, name: &str, bounds: Rect) -> Result<()> {
        let element = self
            .regions
            .get(name)
            .map(|m| m.region.element())
            .ok_or_else(|| PageError::UnknownRegion(name.to_string()))?;
        self.layout.set(element, bounds);
        Ok(())
    }

    /// Tear down every region and decoration
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        for (_, mut mounted) in self.regions.drain(..) {
            mounted.region.teardown();
        }
        {
            let mut scheduler = self.scheduler.borrow_mut();
            for (_, decoration) in self.floats.drain(..) {
                scheduler.cancel_owner(decoration.element);
            }
            for (_, id) in self.hovers.drain() {
                scheduler.cancel(id);
            }
        }
        self.by_element.clear();
        self.mounted = false;
        tracing::debug!("page unmounted");
    }

    fn arm_pending(&mut self) {
        let handle = SchedulerHandle::new(&self.scheduler);
        for (name, mounted) in self.regions.iter_mut().filter(|(_, m)| !m.armed) {
            match mounted
                .region
                .arm(&self.layout, &self.observers, handle.clone())
            {
                ArmOutcome::Armed | ArmOutcome::AlreadyArmed => mounted.armed = true,
                ArmOutcome::Deferred => tracing::trace!(region = %name, "arming deferred"),
                ArmOutcome::TornDown => mounted.armed = true,
            }
        }
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("viewport", &self.viewport)
            .field("regions", &self.regions.len())
            .field("mounted", &self.mounted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::RevealState;

    fn mount() -> Page {
        Page::mount(
            &Content::sample(),
            &MotionConfig::default(),
            Viewport::new(1280.0, 800.0),
            Color::WHITE,
        )
        .unwrap()
    }

    #[test]
    fn hero_fires_on_first_frame() {
        let mut page = mount();
        let events = page.update(0);
        assert_eq!(page.fire_count("home.heading"), Some(1));
        assert!(events
            .iter()
            .any(|e| e.region == "home.heading" && matches!(e.event, RevealEvent::Fired { .. })));
        assert_eq!(page.fire_count("contact.card"), Some(0));
    }

    #[test]
    fn scrolling_to_the_bottom_reveals_contact() {
        let mut page = mount();
        page.update(0);
        page.scroll_to(f32::MAX);
        page.update(16);
        assert_eq!(page.fire_count("contact.card"), Some(1));
        assert_eq!(page.viewport().scroll_y, page.document_height() - 800.0);
    }

    #[test]
    fn floats_run_until_unmount() {
        let mut page = mount();
        page.update(1500);
        let lifted = page.float_properties("skills.float.0").unwrap();
        assert!(lifted.resolved_translate().1 < 0.0);

        page.unmount();
        assert!(!page.has_active_animations());
        assert_eq!(page.live_observers(), 0);
        assert!(page.float_properties("skills.float.0").is_none());
    }

    #[test]
    fn moved_region_triggers_at_its_new_position() {
        let mut page = mount();
        page.update(0);
        assert_eq!(page.fire_count("contact.card"), Some(0));

        page.set_bounds("contact.card", Rect::new(0.0, 200.0, 1280.0, 300.0))
            .unwrap();
        page.update(16);
        assert_eq!(page.fire_count("contact.card"), Some(1));
        assert!(page.deferred_regions().is_empty());
        assert!(page.set_bounds("nope", Rect::ZERO).is_err());
    }

    #[test]
    fn every_region_arms_on_mount() {
        let page = mount();
        assert!(page
            .region_names()
            .all(|name| page.region(name).map(RevealRegion::state) == Some(RevealState::Armed)));
        assert!(page.live_observers() >= page.region_names().count());
    }

    #[test]
    fn hover_lifts_and_settles() {
        let mut page = mount();
        page.update(0);
        page.hover("skills.card.0", true).unwrap();
        page.update(300);
        page.hover("skills.card.0", false).unwrap();
        page.update(600);
        let settled = page.scheduler.borrow().value(&AnimationTarget::part(
            page.region("skills.card.0").unwrap().element(),
            0,
        ));
        assert_eq!(settled.map(|p| p.resolved_translate().1), Some(0.0));
        assert!(page.hover("missing", true).is_err());
    }
}
