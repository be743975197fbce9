//! Page sections and their animation plans
//!
//! Each section is laid out as a vertical stack of named regions. A region
//! carries the reveal descriptor that animates it; overlays (timeline spines,
//! parallax backdrops) span other regions without taking up space.

use crate::config::MotionConfig;
use crate::content::Content;
use crate::error::PageError;
use folio_animation::{
    AnimationError, AnimationPreset, Easing, KeyframeProperties, RevealDescriptor, ScrubBinding,
    StaggerConfig, TriggerPosition,
};
use std::fmt;

const PADDING: f32 = 120.0;
const GAP: f32 = 40.0;
const HEADING_H: f32 = 120.0;
const TEXT_H: f32 = 80.0;
const CARD_H: f32 = 320.0;
const SKILL_H: f32 = 220.0;
const SKILL_COLUMNS: usize = 3;

/// The page's sections, top to bottom
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Home,
    Profile,
    Education,
    Skills,
    Experience,
    Projects,
    Contact,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Home,
        SectionKind::Profile,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Home => "home",
            SectionKind::Profile => "profile",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
            SectionKind::Contact => "contact",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One animated region, positioned relative to its section
#[derive(Clone, Debug)]
pub struct RegionPlan {
    pub name: String,
    pub offset_y: f32,
    pub height: f32,
    /// Horizontal placement as fractions of the viewport width
    pub x_frac: f32,
    pub width_frac: f32,
    pub descriptor: RevealDescriptor,
}

/// A continuously floating decoration (skill cards)
#[derive(Clone, Debug, PartialEq)]
pub struct FloatPlan {
    pub name: String,
    pub offset_y: f32,
    pub height: f32,
    pub x_frac: f32,
    pub width_frac: f32,
    pub index: usize,
}

/// Layout and animation plan for one section
#[derive(Clone, Debug)]
pub struct SectionPlan {
    pub kind: SectionKind,
    pub height: f32,
    pub regions: Vec<RegionPlan>,
    pub floats: Vec<FloatPlan>,
}

impl SectionPlan {
    pub fn region(&self, name: &str) -> Option<&RegionPlan> {
        self.regions.iter().find(|region| region.name == name)
    }
}

/// Stacks regions top to bottom
struct SectionBuilder {
    kind: SectionKind,
    cursor: f32,
    regions: Vec<RegionPlan>,
    floats: Vec<FloatPlan>,
}

impl SectionBuilder {
    fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            cursor: PADDING,
            regions: Vec::new(),
            floats: Vec::new(),
        }
    }

    fn name(&self, suffix: &str) -> String {
        format!("{}.{}", self.kind, suffix)
    }

    /// Append a full-width region and advance the cursor
    fn push(
        &mut self,
        suffix: &str,
        height: f32,
        descriptor: Result<RevealDescriptor, AnimationError>,
    ) -> Result<(f32, f32), PageError> {
        let top = self.cursor;
        self.place(suffix, top, height, 0.0, 1.0, descriptor)?;
        self.cursor += height + GAP;
        Ok((top, height))
    }

    /// Add a region at an explicit position without moving the cursor
    fn place(
        &mut self,
        suffix: &str,
        offset_y: f32,
        height: f32,
        x_frac: f32,
        width_frac: f32,
        descriptor: Result<RevealDescriptor, AnimationError>,
    ) -> Result<(), PageError> {
        let name = self.name(suffix);
        let descriptor = descriptor.map_err(|source| PageError::Animation {
            region: name.clone(),
            source,
        })?;
        self.regions.push(RegionPlan {
            name,
            offset_y,
            height,
            x_frac,
            width_frac,
            descriptor,
        });
        Ok(())
    }

    fn finish(self) -> SectionPlan {
        let height = (self.cursor - GAP + PADDING).max(PADDING * 2.0);
        SectionPlan {
            kind: self.kind,
            height,
            regions: self.regions,
            floats: self.floats,
        }
    }
}

fn position(raw: &str) -> Result<TriggerPosition, AnimationError> {
    raw.parse()
}

/// Timeline spine growing with scroll over a span
fn spine(start: &str, end: &str) -> Result<RevealDescriptor, AnimationError> {
    Ok(RevealDescriptor::scrub_only(ScrubBinding::line_grow(
        position(start)?,
        position(end)?,
    )))
}

/// Timeline milestone fading in as it scrolls through the middle of the screen
fn milestone() -> Result<RevealDescriptor, AnimationError> {
    Ok(RevealDescriptor::scrub_only(ScrubBinding::new(
        position("top 70%")?,
        position("bottom 20%")?,
        KeyframeProperties::opacity(0.0).with_translate(0.0, 50.0),
        KeyframeProperties::opacity(1.0).with_translate(0.0, 0.0),
        Easing::EaseOut,
    )))
}

/// Experience card: entrance, then a slight scale settle while scrolled
fn experience_entry() -> Result<RevealDescriptor, AnimationError> {
    let settle = ScrubBinding::new(
        position("top 70%")?,
        position("bottom 20%")?,
        KeyframeProperties::scale(0.95),
        KeyframeProperties::scale(1.0),
        Easing::Linear,
    );
    Ok(RevealDescriptor::new(AnimationPreset::fade_up(800, 60.0))
        .start("top 80%")?
        .scrub(settle))
}

/// Build the plan for one section
pub fn plan_section(
    kind: SectionKind,
    content: &Content,
    motion: &MotionConfig,
) -> Result<SectionPlan, PageError> {
    let mut section = SectionBuilder::new(kind);
    let stagger = StaggerConfig::new(motion.stagger_ms);

    match kind {
        SectionKind::Home => {
            section.push(
                "heading",
                HEADING_H,
                RevealDescriptor::new(AnimationPreset::heading(1000)).start("top 85%"),
            )?;
            section.push(
                "subtitle",
                TEXT_H,
                RevealDescriptor::new(AnimationPreset::fade_up(1000, 50.0).delay(300))
                    .start("top 85%"),
            )?;
            // Hero fills most of the first screen
            section.cursor = section.cursor.max(700.0);
        }

        SectionKind::Profile => {
            let top = section.cursor;
            section.place(
                "image",
                top,
                400.0,
                0.0,
                0.4,
                RevealDescriptor::new(AnimationPreset::scale_in(1000, 0.8)).start("top 80%"),
            )?;
            section.place(
                "bio",
                top,
                400.0,
                0.45,
                0.55,
                RevealDescriptor::new(AnimationPreset::fade_right(1000, 80.0)).start("top 80%"),
            )?;
            section.cursor += 400.0 + GAP;
        }

        SectionKind::Education => {
            let section_top = section.cursor;
            section.push(
                "title",
                HEADING_H,
                RevealDescriptor::new(AnimationPreset::fade_up(1000, 50.0)).start("top 80%"),
            )?;

            let cards = content.education.len();
            if cards > 0 {
                let top = section.cursor;
                let height = cards as f32 * CARD_H;
                section.place(
                    "cards",
                    top,
                    height,
                    0.1,
                    0.9,
                    RevealDescriptor::new(AnimationPreset::fade_left(800, 80.0))
                        .start("top 85%")
                        .map(|d| d.stagger(cards, stagger)),
                )?;
                section.cursor += height + GAP;
                section.place("line", top, height, 0.05, 0.01, spine("top center", "bottom center"))?;
                section.place(
                    "progress",
                    top,
                    height,
                    0.05,
                    0.01,
                    spine("top center", "bottom bottom"),
                )?;
            }

            for index in 0..content.milestones.len() {
                section.push(&format!("milestone.{index}"), 160.0, milestone())?;
            }

            let span = section.cursor - section_top;
            section.place(
                "backdrop",
                section_top,
                span.max(1.0),
                0.0,
                1.0,
                Ok(RevealDescriptor::scrub_only(ScrubBinding::parallax_y(-100.0))),
            )?;
        }

        SectionKind::Skills => {
            section.push(
                "title",
                HEADING_H,
                RevealDescriptor::new(AnimationPreset::fade_up(1000, 50.0)).start("top 80%"),
            )?;
            let grid_top = section.cursor;
            let width_frac = 1.0 / SKILL_COLUMNS as f32;
            for index in 0..content.skills.len() {
                let row = index / SKILL_COLUMNS;
                let column = index % SKILL_COLUMNS;
                let offset_y = grid_top + row as f32 * (SKILL_H + GAP);
                let x_frac = column as f32 * width_frac;
                section.place(
                    &format!("card.{index}"),
                    offset_y,
                    SKILL_H,
                    x_frac,
                    width_frac,
                    RevealDescriptor::new(AnimationPreset::pop_in(600))
                        .in_view(0.3)
                        .map(|d| d.repeatable(true)),
                )?;
                let name = section.name(&format!("float.{index}"));
                section.floats.push(FloatPlan {
                    name,
                    offset_y,
                    height: SKILL_H,
                    x_frac,
                    width_frac,
                    index,
                });
            }
            let rows = content.skills.len().div_ceil(SKILL_COLUMNS);
            section.cursor = grid_top + rows as f32 * (SKILL_H + GAP);
        }

        SectionKind::Experience => {
            section.push(
                "title",
                HEADING_H,
                RevealDescriptor::new(AnimationPreset::heading(1000)).start("top 80%"),
            )?;
            section.push(
                "subtitle",
                TEXT_H,
                RevealDescriptor::new(AnimationPreset::fade_up(1000, 30.0).delay(200))
                    .start("top 80%"),
            )?;
            for (index, entry) in content.experience.iter().enumerate() {
                let height = CARD_H + entry.description.len() as f32 * 24.0;
                section.push(&format!("entry.{index}"), height, experience_entry())?;
            }
        }

        SectionKind::Projects => {
            section.push(
                "title",
                HEADING_H,
                RevealDescriptor::new(AnimationPreset::heading(1000)).start("top 80%"),
            )?;
            section.push(
                "subtitle",
                TEXT_H,
                RevealDescriptor::new(AnimationPreset::fade_up(1000, 30.0).delay(200))
                    .start("top 80%"),
            )?;

            let list_top = section.cursor;
            for (index, project) in content.projects.iter().enumerate() {
                let (top, height) = section.push(
                    &format!("card.{index}"),
                    CARD_H + 80.0,
                    RevealDescriptor::new(AnimationPreset::fade_up(1000, 50.0)).start("top 80%"),
                )?;
                if !project.technologies.is_empty() {
                    section.place(
                        &format!("tags.{index}"),
                        top + height - 60.0,
                        40.0,
                        0.0,
                        0.5,
                        RevealDescriptor::new(AnimationPreset::pop_in(400))
                            .start("top 85%")
                            .map(|d| {
                                d.stagger(project.technologies.len(), StaggerConfig::new(100))
                            }),
                    )?;
                }
                if project.image.is_some() {
                    section.place(
                        &format!("image.{index}"),
                        top,
                        height,
                        0.5,
                        0.5,
                        RevealDescriptor::new(AnimationPreset::scale_in(1000, 0.9))
                            .start("top 75%")
                            .map(|d| d.scrub(ScrubBinding::parallax_y(-40.0))),
                    )?;
                }
            }
            let list_height = (section.cursor - list_top - GAP).max(1.0);
            if !content.projects.is_empty() {
                section.place("line", list_top, list_height, 0.49, 0.01, spine("top center", "bottom center"))?;
                section.place(
                    "progress",
                    list_top,
                    list_height,
                    0.49,
                    0.01,
                    spine("top center", "bottom bottom"),
                )?;
            }
        }

        SectionKind::Contact => {
            let (top, height) = section.push(
                "card",
                520.0,
                RevealDescriptor::new(AnimationPreset::fade_up(800, 80.0))
                    .in_view(0.3)
                    .map(|d| d.repeatable(true)),
            )?;
            section.place(
                "fields",
                top + 160.0,
                height - 160.0,
                0.1,
                0.8,
                RevealDescriptor::new(AnimationPreset::fade_right(800, 80.0).delay(400))
                    .in_view(0.3)
                    .map(|d| d.repeatable(true)),
            )?;
        }
    }

    let plan = section.finish();
    tracing::trace!(section = %kind, regions = plan.regions.len(), height = plan.height, "section planned");
    Ok(plan)
}

/// Plans for every section in page order
pub fn plan_page(content: &Content, motion: &MotionConfig) -> Result<Vec<SectionPlan>, PageError> {
    SectionKind::ALL
        .iter()
        .map(|kind| plan_section(*kind, content, motion))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::{RevealPolicy, TriggerMode};

    fn plans() -> Vec<SectionPlan> {
        plan_page(&Content::sample(), &MotionConfig::default()).unwrap()
    }

    fn find<'a>(plans: &'a [SectionPlan], name: &str) -> &'a RegionPlan {
        plans
            .iter()
            .find_map(|plan| plan.region(name))
            .unwrap_or_else(|| panic!("no region {name}"))
    }

    #[test]
    fn every_section_is_planned_in_order() {
        let plans = plans();
        let kinds: Vec<SectionKind> = plans.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
        assert!(plans.iter().all(|p| p.height > 0.0));
    }

    #[test]
    fn names_are_unique() {
        let plans = plans();
        let mut names: Vec<&str> = plans
            .iter()
            .flat_map(|p| p.regions.iter().map(|r| r.name.as_str()))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn education_cards_stagger_per_entry() {
        let plans = plans();
        let cards = find(&plans, "education.cards");
        assert_eq!(cards.descriptor.parts, Content::sample().education.len());
        assert_eq!(cards.descriptor.stagger.map(|s| s.interval_ms), Some(200));
        let spine = find(&plans, "education.line");
        assert!(spine.descriptor.entrance.is_none());
        assert!(spine.descriptor.scrub.is_some());
    }

    #[test]
    fn skills_reveal_on_every_entry_and_float() {
        let plans = plans();
        let card = find(&plans, "skills.card.0");
        assert_eq!(card.descriptor.policy, RevealPolicy::EveryEntry);
        assert!(matches!(card.descriptor.trigger, TriggerMode::InView { .. }));

        let skills = plans.iter().find(|p| p.kind == SectionKind::Skills).unwrap();
        assert_eq!(skills.floats.len(), Content::sample().skills.len());
        assert_eq!(skills.floats[4].x_frac, skills.floats[1].x_frac);
    }

    #[test]
    fn project_regions_follow_content() {
        let content = Content::sample();
        let plans = plans();
        for (index, project) in content.projects.iter().enumerate() {
            let image = plans.iter().find_map(|p| p.region(&format!("projects.image.{index}")));
            assert_eq!(image.is_some(), project.image.is_some());
        }
        assert_eq!(find(&plans, "projects.card.0").descriptor.policy, RevealPolicy::Once);
    }

    #[test]
    fn empty_content_still_plans() {
        let plans = plan_page(&Content::default(), &MotionConfig::default()).unwrap();
        assert!(plans.iter().all(|p| p.height >= PADDING * 2.0));
        let names: Vec<&str> = plans
            .iter()
            .flat_map(|p| p.regions.iter().map(|r| r.name.as_str()))
            .collect();
        assert!(!names.iter().any(|name| name.ends_with(".0")), "{names:?}");
        assert!(names.contains(&"contact.card"));
    }
}
