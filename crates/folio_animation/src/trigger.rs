//! Scroll trigger grammar
//!
//! A trigger position pairs an anchor on the element with an anchor on the
//! viewport: `"top 80%"` fires when the element's top edge reaches 80% of the
//! way down the viewport. Both anchors accept `top`, `center`, `bottom`, a
//! percentage or a pixel offset.
//!
//! Toggle actions name what happens on the four crossing events, in order:
//! enter, leave, enter-back, leave-back (`"play none none none"`).

use crate::error::{AnimationError, Result};
use folio_core::{Rect, Viewport};
use std::fmt;
use std::str::FromStr;

/// A point along an element or the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    Top,
    Center,
    Bottom,
    /// Fraction of the height (0.8 for `80%`)
    Fraction(f32),
    /// Absolute offset from the top edge
    Pixels(f32),
}

impl Anchor {
    /// Offset from the top of a box of `extent` height
    pub fn resolve(&self, extent: f32) -> f32 {
        match self {
            Anchor::Top => 0.0,
            Anchor::Center => extent * 0.5,
            Anchor::Bottom => extent,
            Anchor::Fraction(f) => extent * f,
            Anchor::Pixels(px) => *px,
        }
    }

    fn parse(token: &str, input: &str) -> Result<Self> {
        let invalid = |reason| AnimationError::InvalidTriggerPosition {
            input: input.to_string(),
            reason,
        };
        match token {
            "top" => Ok(Anchor::Top),
            "center" => Ok(Anchor::Center),
            "bottom" => Ok(Anchor::Bottom),
            _ => {
                if let Some(pct) = token.strip_suffix('%') {
                    let value: f32 = pct.parse().map_err(|_| invalid("bad percentage"))?;
                    Ok(Anchor::Fraction(value / 100.0))
                } else if let Some(px) = token.strip_suffix("px") {
                    let value: f32 = px.parse().map_err(|_| invalid("bad pixel offset"))?;
                    Ok(Anchor::Pixels(value))
                } else {
                    Err(invalid("expected top, center, bottom, N% or Npx"))
                }
            }
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Top => write!(f, "top"),
            Anchor::Center => write!(f, "center"),
            Anchor::Bottom => write!(f, "bottom"),
            Anchor::Fraction(v) => write!(f, "{}%", v * 100.0),
            Anchor::Pixels(px) => write!(f, "{px}px"),
        }
    }
}

/// Element anchor meeting viewport anchor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerPosition {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl TriggerPosition {
    pub const fn new(element: Anchor, viewport: Anchor) -> Self {
        Self { element, viewport }
    }

    /// `"top 85%"`: the default reveal start
    pub const fn reveal_start() -> Self {
        Self::new(Anchor::Top, Anchor::Fraction(0.85))
    }

    /// `"bottom top"`: element has fully scrolled out above the viewport
    pub const fn scrolled_past() -> Self {
        Self::new(Anchor::Bottom, Anchor::Top)
    }

    /// `"top bottom"`: element's top just entered from below
    pub const fn entering() -> Self {
        Self::new(Anchor::Top, Anchor::Bottom)
    }

    /// Scroll offset at which this position is reached for `bounds`
    pub fn scroll_offset(&self, bounds: &Rect, viewport_height: f32) -> f32 {
        bounds.top() + self.element.resolve(bounds.height()) - self.viewport.resolve(viewport_height)
    }

    /// Convenience for a full viewport
    pub fn scroll_offset_in(&self, bounds: &Rect, viewport: &Viewport) -> f32 {
        self.scroll_offset(bounds, viewport.height)
    }
}

impl Default for TriggerPosition {
    fn default() -> Self {
        Self::reveal_start()
    }
}

impl FromStr for TriggerPosition {
    type Err = AnimationError;

    fn from_str(input: &str) -> Result<Self> {
        let mut tokens = input.split_whitespace();
        let (Some(element), Some(viewport), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(AnimationError::InvalidTriggerPosition {
                input: input.to_string(),
                reason: "expected '<element anchor> <viewport anchor>'",
            });
        };
        Ok(Self {
            element: Anchor::parse(element, input)?,
            viewport: Anchor::parse(viewport, input)?,
        })
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

/// What to do with an entrance animation on a crossing event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    #[default]
    None,
}

impl FromStr for ToggleAction {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        Ok(match s {
            "play" => ToggleAction::Play,
            "pause" => ToggleAction::Pause,
            "resume" => ToggleAction::Resume,
            "reverse" => ToggleAction::Reverse,
            "restart" => ToggleAction::Restart,
            "reset" => ToggleAction::Reset,
            "complete" => ToggleAction::Complete,
            "none" => ToggleAction::None,
            _ => return Err(()),
        })
    }
}

/// Actions for enter, leave, enter-back and leave-back
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl ToggleActions {
    /// `"play none none none"`
    pub const fn play_once() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }

    /// Replay on every entry and rewind when leaving
    pub const fn every_entry() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::Reverse,
            on_enter_back: ToggleAction::Play,
            on_leave_back: ToggleAction::Reverse,
        }
    }

    /// Whether these actions replay the entrance after it has run once
    pub fn policy(&self) -> RevealPolicy {
        let replays = |action: ToggleAction| {
            matches!(
                action,
                ToggleAction::Play | ToggleAction::Restart | ToggleAction::Reverse | ToggleAction::Reset
            )
        };
        if self.on_enter == ToggleAction::Restart
            || replays(self.on_leave)
            || replays(self.on_enter_back)
            || replays(self.on_leave_back)
        {
            RevealPolicy::EveryEntry
        } else {
            RevealPolicy::Once
        }
    }
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self::play_once()
    }
}

impl FromStr for ToggleActions {
    type Err = AnimationError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = || AnimationError::InvalidToggleActions(input.to_string());
        let actions: Vec<ToggleAction> = input
            .split_whitespace()
            .map(|word| word.parse::<ToggleAction>().map_err(|_| invalid()))
            .collect::<Result<_>>()?;
        match actions.as_slice() {
            [on_enter, on_leave, on_enter_back, on_leave_back] => Ok(Self {
                on_enter: *on_enter,
                on_leave: *on_leave,
                on_enter_back: *on_enter_back,
                on_leave_back: *on_leave_back,
            }),
            _ => Err(invalid()),
        }
    }
}

/// Whether a reveal may fire more than once
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealPolicy {
    /// Fire on first entry only
    #[default]
    Once,
    /// Leaving re-arms; every later entry fires again
    EveryEntry,
}

/// How a region decides that it is "in view"
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerMode {
    /// Scroll offset crosses `start`; `end` bounds the active range
    Crossing {
        start: TriggerPosition,
        end: TriggerPosition,
    },
    /// At least `amount` of the element's height is visible
    InView { amount: f32 },
}

impl TriggerMode {
    /// Crossing trigger with the default end (`"bottom top"`)
    pub fn crossing(start: TriggerPosition) -> Self {
        TriggerMode::Crossing {
            start,
            end: TriggerPosition::scrolled_past(),
        }
    }

    /// Visibility-ratio trigger; `amount` must be within 0.0 - 1.0
    pub fn in_view(amount: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&amount) {
            return Err(AnimationError::InvalidAmount(amount));
        }
        Ok(TriggerMode::InView { amount })
    }
}

impl Default for TriggerMode {
    fn default() -> Self {
        Self::crossing(TriggerPosition::reveal_start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positions() {
        let p: TriggerPosition = "top 80%".parse().unwrap();
        assert_eq!(p, TriggerPosition::new(Anchor::Top, Anchor::Fraction(0.8)));

        let p: TriggerPosition = "top center".parse().unwrap();
        assert_eq!(p.viewport, Anchor::Center);

        let p: TriggerPosition = "bottom 20%".parse().unwrap();
        assert_eq!(p.element, Anchor::Bottom);

        let p: TriggerPosition = "center 120px".parse().unwrap();
        assert_eq!(p.viewport, Anchor::Pixels(120.0));
    }

    #[test]
    fn rejects_malformed_positions() {
        assert!("top".parse::<TriggerPosition>().is_err());
        assert!("top 80% extra".parse::<TriggerPosition>().is_err());
        assert!("middle 50%".parse::<TriggerPosition>().is_err());
        assert!("top x%".parse::<TriggerPosition>().is_err());
    }

    #[test]
    fn scroll_offset_matches_anchor_meeting() {
        let bounds = Rect::new(0.0, 2000.0, 800.0, 400.0);
        let p: TriggerPosition = "top 80%".parse().unwrap();
        // Element top (2000) reaches 80% of a 1000px viewport at scroll 1200
        assert_eq!(p.scroll_offset(&bounds, 1000.0), 1200.0);
        assert_eq!(
            TriggerPosition::scrolled_past().scroll_offset(&bounds, 1000.0),
            2400.0
        );
    }

    #[test]
    fn toggle_actions_derive_policy() {
        let once: ToggleActions = "play none none none".parse().unwrap();
        assert_eq!(once.policy(), RevealPolicy::Once);

        let restart: ToggleActions = "restart pause resume pause".parse().unwrap();
        assert_eq!(restart.policy(), RevealPolicy::EveryEntry);

        let back: ToggleActions = "play none restart none".parse().unwrap();
        assert_eq!(back.policy(), RevealPolicy::EveryEntry);

        assert!("play none".parse::<ToggleActions>().is_err());
        assert!("play jump none none".parse::<ToggleActions>().is_err());
    }

    #[test]
    fn in_view_amount_is_bounded() {
        assert!(TriggerMode::in_view(0.3).is_ok());
        assert!(TriggerMode::in_view(1.5).is_err());
    }
}
