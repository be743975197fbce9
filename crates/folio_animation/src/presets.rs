//! Ready-made tweens for section entrances, hover feedback and idle loops.

use crate::easing::Easing;
use crate::keyframe::{KeyframeProperties, MultiKeyframeAnimation};

/// Entrance length when content does not say otherwise
pub const ENTRANCE_MS: u32 = 1000;

/// Opaque, unscaled and in its laid-out position
fn settled() -> KeyframeProperties {
    KeyframeProperties::opacity(1.0).with_translate(0.0, 0.0)
}

fn entrance(duration_ms: u32, from: KeyframeProperties, to: KeyframeProperties, easing: Easing) -> MultiKeyframeAnimation {
    MultiKeyframeAnimation::tween(duration_ms, from, to, easing)
}

pub struct AnimationPreset;

impl AnimationPreset {
    pub fn fade_in(duration_ms: u32) -> MultiKeyframeAnimation {
        entrance(
            duration_ms,
            KeyframeProperties::opacity(0.0),
            KeyframeProperties::opacity(1.0),
            Easing::EaseOut,
        )
    }

    /// Rises into place from `distance` px below
    pub fn fade_up(duration_ms: u32, distance: f32) -> MultiKeyframeAnimation {
        Self::slide_in(duration_ms, 0.0, distance)
    }

    /// Arrives from the left
    pub fn fade_left(duration_ms: u32, distance: f32) -> MultiKeyframeAnimation {
        Self::slide_in(duration_ms, -distance, 0.0)
    }

    pub fn fade_right(duration_ms: u32, distance: f32) -> MultiKeyframeAnimation {
        Self::slide_in(duration_ms, distance, 0.0)
    }

    fn slide_in(duration_ms: u32, dx: f32, dy: f32) -> MultiKeyframeAnimation {
        let hidden = KeyframeProperties::opacity(0.0).with_translate(dx, dy);
        entrance(duration_ms, hidden, settled(), Easing::PowerOut(4))
    }

    /// Section titles rise 30px while an 8px blur clears
    pub fn heading(duration_ms: u32) -> MultiKeyframeAnimation {
        let hidden = KeyframeProperties::opacity(0.0).with_translate(0.0, 30.0).with_blur(8.0);
        entrance(duration_ms, hidden, settled().with_blur(0.0), Easing::PowerOut(4))
    }

    pub fn scale_in(duration_ms: u32, from_scale: f32) -> MultiKeyframeAnimation {
        entrance(
            duration_ms,
            KeyframeProperties::scale(from_scale).with_opacity(0.0),
            KeyframeProperties::scale(1.0).with_opacity(1.0),
            Easing::PowerOut(3),
        )
    }

    /// Grows from nothing and overshoots slightly
    pub fn pop_in(duration_ms: u32) -> MultiKeyframeAnimation {
        entrance(
            duration_ms,
            KeyframeProperties::scale(0.0).with_opacity(0.0),
            KeyframeProperties::scale(1.0).with_opacity(1.0),
            Easing::BackOut(1.2),
        )
    }

    /// Timeline spine drawn top to bottom
    pub fn line_grow(duration_ms: u32) -> MultiKeyframeAnimation {
        entrance(
            duration_ms,
            KeyframeProperties::default().with_scale_y(0.0),
            KeyframeProperties::default().with_scale_y(1.0),
            Easing::Linear,
        )
    }

    /// Card under the pointer: 5% larger, 5px higher
    pub fn hover_lift(duration_ms: u32) -> MultiKeyframeAnimation {
        entrance(
            duration_ms,
            KeyframeProperties::scale(1.0).with_translate(0.0, 0.0),
            KeyframeProperties::scale(1.05).with_translate(0.0, -5.0),
            Easing::BackOut(1.2),
        )
    }

    /// Endless 10px bob. Each later item's period is 300ms longer so
    /// neighbours drift out of phase.
    pub fn float_loop(index: usize) -> MultiKeyframeAnimation {
        let step = u32::try_from(index).unwrap_or(u32::MAX).saturating_mul(300);
        let rest = KeyframeProperties::translate(0.0, 0.0);
        MultiKeyframeAnimation::new(3000_u32.saturating_add(step))
            .keyframe(0.0, rest, Easing::Linear)
            .keyframe(0.5, KeyframeProperties::translate(0.0, -10.0), Easing::EaseInOutSine)
            .keyframe(1.0, rest, Easing::EaseInOutSine)
            .infinite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrances_end_fully_visible_in_place() {
        for anim in [
            AnimationPreset::fade_in(ENTRANCE_MS),
            AnimationPreset::fade_up(ENTRANCE_MS, 50.0),
            AnimationPreset::fade_left(ENTRANCE_MS, 50.0),
            AnimationPreset::fade_right(ENTRANCE_MS, 50.0),
            AnimationPreset::heading(ENTRANCE_MS),
            AnimationPreset::scale_in(ENTRANCE_MS, 0.8),
            AnimationPreset::pop_in(ENTRANCE_MS),
        ] {
            let end = anim.final_properties();
            assert_eq!(end.resolved_opacity(), 1.0);
            assert_eq!(end.resolved_translate(), (0.0, 0.0));
            assert_eq!(end.resolved_scale(), (1.0, 1.0));
        }
    }

    #[test]
    fn fade_left_starts_offscreen_left() {
        let start = AnimationPreset::fade_left(800, 50.0).initial();
        assert_eq!(start.translate_x, Some(-50.0));
        assert_eq!(start.opacity, Some(0.0));
    }

    #[test]
    fn float_periods_grow_with_index() {
        assert_eq!(AnimationPreset::float_loop(0).duration_ms(), 3000);
        assert_eq!(AnimationPreset::float_loop(2).duration_ms(), 3600);
        assert!(AnimationPreset::float_loop(1).is_infinite());
    }
}
