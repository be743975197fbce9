//! Decorative star field behind the hero section
//!
//! Star parameters are random but drawn from an injected seed, so two fields
//! built with the same seed and viewport are identical.

use folio_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Viewport width below which the field thins out
pub const NARROW_WIDTH: f32 = 768.0;
/// Quiet period after the last resize before regenerating
pub const RESIZE_DEBOUNCE_MS: u64 = 300;

/// One star
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    /// Horizontal position, percent of the container (0 - 100)
    pub x_pct: f32,
    /// Vertical position, percent of the container (0 - 100)
    pub y_pct: f32,
    pub size_px: f32,
    /// Peak opacity (0.2 - 1.0)
    pub opacity: f32,
    /// Pulse period (2 - 5 s)
    pub pulse_ms: u32,
}

impl Star {
    /// Opacity `t_ms` into the pulse; dims to half of peak mid-cycle
    pub fn opacity_at(&self, t_ms: u64) -> f32 {
        let phase = (t_ms % self.pulse_ms as u64) as f32 / self.pulse_ms as f32;
        let wave = (phase * std::f32::consts::TAU).cos();
        self.opacity * (0.75 + 0.25 * wave)
    }
}

/// Number of stars for a viewport width
pub fn star_count(viewport_width: f32) -> usize {
    if viewport_width < NARROW_WIDTH {
        50
    } else {
        100
    }
}

/// The full field
#[derive(Debug)]
pub struct StarField {
    stars: Vec<Star>,
    color: Color,
    viewport_width: f32,
    rng: SmallRng,
    pending_resize: Option<(f32, u64)>,
    generation: u32,
}

impl StarField {
    pub fn new(seed: u64, viewport_width: f32, color: Color) -> Self {
        let mut field = Self {
            stars: Vec::new(),
            color,
            viewport_width,
            rng: SmallRng::seed_from_u64(seed),
            pending_resize: None,
            generation: 0,
        };
        field.regenerate();
        field
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Times the field has been rebuilt (starts at 1)
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Theme changed: recolor and redraw immediately
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.regenerate();
    }

    /// Viewport resized; the redraw waits for the debounce window
    pub fn on_resize(&mut self, viewport_width: f32, now_ms: u64) {
        self.pending_resize = Some((viewport_width, now_ms + RESIZE_DEBOUNCE_MS));
    }

    /// Apply a due resize. Returns true when the field was rebuilt.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.pending_resize {
            Some((width, due)) if now_ms >= due => {
                self.pending_resize = None;
                self.viewport_width = width;
                self.regenerate();
                true
            }
            _ => false,
        }
    }

    fn regenerate(&mut self) {
        let count = star_count(self.viewport_width);
        let rng = &mut self.rng;
        self.stars = (0..count)
            .map(|_| Star {
                x_pct: rng.gen_range(0.0..100.0),
                y_pct: rng.gen_range(0.0..100.0),
                size_px: rng.gen_range(1.0..3.0),
                opacity: rng.gen_range(0.2..1.0),
                pulse_ms: rng.gen_range(2000..5000),
            })
            .collect();
        self.generation += 1;
        tracing::trace!(count, generation = self.generation, "star field regenerated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_depends_on_width() {
        assert_eq!(StarField::new(1, 500.0, Color::WHITE).stars().len(), 50);
        assert_eq!(StarField::new(1, 1280.0, Color::WHITE).stars().len(), 100);
    }

    #[test]
    fn parameters_stay_in_range() {
        let field = StarField::new(7, 1280.0, Color::WHITE);
        for star in field.stars() {
            assert!((0.0..100.0).contains(&star.x_pct));
            assert!((1.0..3.0).contains(&star.size_px));
            assert!((0.2..1.0).contains(&star.opacity));
            assert!((2000..5000).contains(&star.pulse_ms));
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = StarField::new(99, 1280.0, Color::WHITE);
        let b = StarField::new(99, 1280.0, Color::WHITE);
        assert_eq!(a.stars(), b.stars());
        let star = a.stars()[0];
        assert_eq!(star.opacity_at(1234), b.stars()[0].opacity_at(1234));
    }

    #[test]
    fn resize_is_debounced() {
        let mut field = StarField::new(3, 1280.0, Color::WHITE);
        field.on_resize(600.0, 1000);
        field.on_resize(500.0, 1200);
        assert!(!field.tick(1400));
        assert!(field.tick(1500));
        assert_eq!(field.stars().len(), 50);
        assert_eq!(field.generation(), 2);
    }

    #[test]
    fn recolor_regenerates() {
        let mut field = StarField::new(3, 1280.0, Color::WHITE);
        field.set_color(Color::BLACK);
        assert_eq!(field.color(), Color::BLACK);
        assert_eq!(field.generation(), 2);
    }
}
