//! Multi-stop tweens over a small set of visual properties.
//!
//! An animation here is a function from elapsed milliseconds to
//! [`KeyframeProperties`]. Start times, pausing and cancellation are tracked
//! by [`AnimationScheduler`](crate::scheduler::AnimationScheduler).

use crate::easing::Easing;
use serde::Serialize;

/// Applies `$op(self.field, other.field)` to every animatable field.
macro_rules! zip_fields {
    ($a:expr, $b:expr, $op:expr) => {
        KeyframeProperties {
            opacity: $op($a.opacity, $b.opacity),
            scale_x: $op($a.scale_x, $b.scale_x),
            scale_y: $op($a.scale_y, $b.scale_y),
            translate_x: $op($a.translate_x, $b.translate_x),
            translate_y: $op($a.translate_y, $b.translate_y),
            blur: $op($a.blur, $b.blur),
        }
    };
}

/// Visual state of one element. `None` means "not driven by this
/// animation"; renderers fall back to the identity value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct KeyframeProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f32>,
    /// Pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<f32>,
    /// Blur radius in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f32>,
}

impl KeyframeProperties {
    pub fn opacity(value: f32) -> Self {
        Self::default().with_opacity(value)
    }

    pub fn scale(value: f32) -> Self {
        Self::default().with_scale(value)
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self::default().with_translate(x, y)
    }

    pub fn with_opacity(self, value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..self
        }
    }

    pub fn with_scale(self, value: f32) -> Self {
        Self {
            scale_x: Some(value),
            ..self.with_scale_y(value)
        }
    }

    /// Vertical scale only, for lines that grow downward
    pub fn with_scale_y(self, value: f32) -> Self {
        Self {
            scale_y: Some(value),
            ..self
        }
    }

    pub fn with_translate(self, x: f32, y: f32) -> Self {
        Self {
            translate_x: Some(x),
            translate_y: Some(y),
            ..self
        }
    }

    pub fn with_blur(self, px: f32) -> Self {
        Self {
            blur: Some(px),
            ..self
        }
    }

    /// Blend toward `other` by `t`. A field set on only one side keeps
    /// that side's value.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        zip_fields!(self, other, |a: Option<f32>, b: Option<f32>| match (a, b) {
            (Some(a), Some(b)) => Some(a + (b - a) * t),
            (a, b) => a.or(b),
        })
    }

    /// Fields set on `top` win; the rest come from `self`
    pub fn overlay(&self, top: &Self) -> Self {
        zip_fields!(self, top, |below: Option<f32>, above: Option<f32>| above.or(below))
    }

    pub fn resolved_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0)
    }

    pub fn resolved_scale(&self) -> (f32, f32) {
        (self.scale_x.unwrap_or(1.0), self.scale_y.unwrap_or(1.0))
    }

    pub fn resolved_translate(&self) -> (f32, f32) {
        (self.translate_x.unwrap_or(0.0), self.translate_y.unwrap_or(0.0))
    }
}

/// One stop of a [`MultiKeyframeAnimation`]
#[derive(Clone, Debug)]
pub struct MultiKeyframe {
    /// Normalized position, 0.0 to 1.0
    pub time: f32,
    pub properties: KeyframeProperties,
    /// Curve for the segment that ends at this stop
    pub easing: Easing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayDirection {
    #[default]
    Forward,
    /// Every second iteration runs backward
    Alternate,
}

#[derive(Clone, Debug)]
pub struct MultiKeyframeAnimation {
    duration_ms: u32,
    /// Always sorted by `time`
    keyframes: Vec<MultiKeyframe>,
    direction: PlayDirection,
    /// `None` repeats forever
    iterations: Option<u32>,
    delay_ms: u32,
}

impl MultiKeyframeAnimation {
    /// Empty single-iteration animation; add stops with [`Self::keyframe`]
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            keyframes: Vec::new(),
            direction: PlayDirection::Forward,
            iterations: Some(1),
            delay_ms: 0,
        }
    }

    pub fn tween(duration_ms: u32, from: KeyframeProperties, to: KeyframeProperties, easing: Easing) -> Self {
        Self::new(duration_ms)
            .keyframe(0.0, from, Easing::Linear)
            .keyframe(1.0, to, easing)
    }

    pub fn keyframe(mut self, time: f32, properties: KeyframeProperties, easing: Easing) -> Self {
        let time = time.clamp(0.0, 1.0);
        let at = self.keyframes.partition_point(|kf| kf.time <= time);
        self.keyframes.insert(
            at,
            MultiKeyframe {
                time,
                properties,
                easing,
            },
        );
        self
    }

    pub fn delay(self, delay_ms: u32) -> Self {
        Self { delay_ms, ..self }
    }

    pub fn with_extra_delay(self, extra_ms: u32) -> Self {
        let delay_ms = self.delay_ms.saturating_add(extra_ms);
        self.delay(delay_ms)
    }

    pub fn infinite(self) -> Self {
        Self {
            iterations: None,
            ..self
        }
    }

    /// Clamped to at least one
    pub fn iterations(self, count: u32) -> Self {
        Self {
            iterations: Some(count.max(1)),
            ..self
        }
    }

    pub fn direction(self, direction: PlayDirection) -> Self {
        Self { direction, ..self }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn is_infinite(&self) -> bool {
        self.iterations.is_none()
    }

    /// Delay plus every iteration, `None` when looping forever
    pub fn total_duration_ms(&self) -> Option<f32> {
        let iterations = self.iterations?;
        Some(self.delay_ms as f32 + self.duration_ms as f32 * iterations as f32)
    }

    /// Value of the first stop, held during the delay
    pub fn initial(&self) -> KeyframeProperties {
        self.keyframes.first().map(|kf| kf.properties).unwrap_or_default()
    }

    /// Resting value once every iteration has played
    pub fn final_properties(&self) -> KeyframeProperties {
        match (self.direction, self.iterations) {
            (PlayDirection::Alternate, Some(n)) if n % 2 == 0 => self.initial(),
            _ => self.at_progress(1.0),
        }
    }

    /// Value `elapsed_ms` after the animation started
    pub fn sample(&self, elapsed_ms: f32) -> KeyframeProperties {
        let local = elapsed_ms - self.delay_ms as f32;
        if local <= 0.0 {
            return self.initial();
        }
        if self.duration_ms == 0 || self.is_finished_at(elapsed_ms) {
            return self.final_properties();
        }

        let duration = self.duration_ms as f32;
        let progress = (local % duration) / duration;
        let backward =
            self.direction == PlayDirection::Alternate && (local / duration) as u64 % 2 == 1;
        self.at_progress(if backward { 1.0 - progress } else { progress })
    }

    pub fn is_finished_at(&self, elapsed_ms: f32) -> bool {
        matches!(self.total_duration_ms(), Some(total) if elapsed_ms >= total)
    }

    /// Value at normalized `progress` within one iteration
    pub fn at_progress(&self, progress: f32) -> KeyframeProperties {
        let progress = progress.clamp(0.0, 1.0);
        // First stop strictly after `progress`; the segment ends there
        let end = self.keyframes.partition_point(|kf| kf.time <= progress);
        match (end.checked_sub(1).map(|i| &self.keyframes[i]), self.keyframes.get(end)) {
            (None, None) => KeyframeProperties::default(),
            (Some(from), None) => from.properties,
            (None, Some(to)) => to.properties,
            (Some(from), Some(to)) => {
                let span = to.time - from.time;
                let local = (progress - from.time) / span;
                from.properties.lerp(&to.properties, to.easing.apply(local))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade() -> MultiKeyframeAnimation {
        MultiKeyframeAnimation::tween(
            1000,
            KeyframeProperties::opacity(0.0),
            KeyframeProperties::opacity(1.0),
            Easing::Linear,
        )
    }

    #[test]
    fn sampling_is_pure() {
        let anim = fade();
        assert_eq!(anim.sample(250.0), anim.sample(250.0));
        assert_eq!(anim.sample(500.0).opacity, Some(0.5));
    }

    #[test]
    fn delay_holds_first_keyframe() {
        let anim = fade().delay(200);
        assert_eq!(anim.sample(100.0).opacity, Some(0.0));
        assert_eq!(anim.sample(700.0).opacity, Some(0.5));
        assert!(!anim.is_finished_at(1100.0));
        assert!(anim.is_finished_at(1200.0));
    }

    #[test]
    fn yoyo_float_loop_returns_to_start() {
        let float = MultiKeyframeAnimation::new(3000)
            .keyframe(0.0, KeyframeProperties::translate(0.0, 0.0), Easing::Linear)
            .keyframe(0.5, KeyframeProperties::translate(0.0, -10.0), Easing::EaseInOutSine)
            .keyframe(1.0, KeyframeProperties::translate(0.0, 0.0), Easing::EaseInOutSine)
            .infinite();

        assert!(float.total_duration_ms().is_none());
        assert_eq!(float.sample(1500.0).translate_y, Some(-10.0));
        assert_eq!(float.sample(3000.0 * 7.0 + 1500.0).translate_y, Some(-10.0));
        assert!(!float.is_finished_at(1.0e9));
    }

    #[test]
    fn alternate_direction_reverses_odd_iterations() {
        let anim = fade().iterations(2).direction(PlayDirection::Alternate);
        assert_eq!(anim.sample(1250.0).opacity, Some(0.75));
        assert_eq!(anim.final_properties().opacity, Some(0.0));
    }

    #[test]
    fn overlay_keeps_unset_properties() {
        let entrance = KeyframeProperties::opacity(0.4).with_translate(0.0, 20.0);
        let scrub = KeyframeProperties::scale(0.95);
        let combined = entrance.overlay(&scrub);
        assert_eq!(combined.opacity, Some(0.4));
        assert_eq!(combined.translate_y, Some(20.0));
        assert_eq!(combined.scale_x, Some(0.95));
    }
}
