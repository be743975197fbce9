//! Document-space geometry and colors.
//!
//! Everything is in logical pixels. The page scrolls vertically only, so a
//! rect's viewport-relative top is `rect.top() - viewport.scroll_y`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    /// No area: either side is zero or negative
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned box, origin at the top-left corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn top(&self) -> f32 {
        self.origin.y
    }

    pub fn bottom(&self) -> f32 {
        self.top() + self.height()
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Edges are inclusive
    pub fn contains(&self, point: Point) -> bool {
        let local = self.to_local(point);
        (0.0..=self.size.width).contains(&local.x) && (0.0..=self.size.height).contains(&local.y)
    }

    /// A rect with no area has not been laid out and is never observed
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// `point` relative to this rect's origin
    pub fn to_local(&self, point: Point) -> Point {
        Point::new(point.x - self.origin.x, point.y - self.origin.y)
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect::new(self.origin.x + dx, self.origin.y + dy, self.size.width, self.size.height)
    }
}

/// The window onto the document
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Viewport {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    pub fn with_scroll(self, scroll_y: f32) -> Self {
        Viewport { scroll_y, ..self }
    }

    fn bottom(&self) -> f32 {
        self.scroll_y + self.height
    }

    /// Share of `rect`'s height on screen, 0.0 to 1.0
    pub fn visible_fraction(&self, rect: &Rect) -> f32 {
        if rect.height() <= 0.0 {
            return 0.0;
        }
        let shown = rect.bottom().min(self.bottom()) - rect.top().max(self.scroll_y);
        (shown / rect.height()).clamp(0.0, 1.0)
    }

    /// Any overlap at all, edges excluded
    pub fn intersects(&self, rect: &Rect) -> bool {
        rect.bottom() > self.scroll_y && rect.top() < self.bottom()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(1280.0, 720.0)
    }
}

/// Linear RGBA, each channel 0.0 to 1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    /// `0xRRGGBB`, fully opaque
    pub fn from_hex(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        let unit = |byte: u8| f32::from(byte) / 255.0;
        Color::rgb(unit(r), unit(g), unit(b))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Color { a, ..self }
    }

    /// Per-channel blend, `t` clamped to 0.0..=1.0
    pub fn lerp(&self, to: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Color {
            r: mix(self.r, to.r),
            g: mix(self.g, to.g),
            b: mix(self.b, to.b),
            a: mix(self.a, to.a),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_visible_rect() {
        // rect covers 500..900, viewport covers 100..700
        let viewport = Viewport::new(800.0, 600.0).with_scroll(100.0);
        let rect = Rect::new(0.0, 500.0, 800.0, 400.0);
        assert!((viewport.visible_fraction(&rect) - 0.5).abs() < 1e-6);
        assert!(viewport.intersects(&rect));
    }

    #[test]
    fn rect_below_the_fold() {
        let viewport = Viewport::new(800.0, 600.0);
        let rect = Rect::new(0.0, 1000.0, 800.0, 200.0);
        assert_eq!(viewport.visible_fraction(&rect), 0.0);
        assert!(!viewport.intersects(&rect));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let viewport = Viewport::new(800.0, 600.0);
        assert!(!viewport.intersects(&Rect::new(0.0, 600.0, 10.0, 10.0)));
    }

    #[test]
    fn local_coordinates_and_containment() {
        let rect = Rect::new(10.0, 20.0, 100.0, 100.0);
        assert_eq!(rect.to_local(Point::new(15.0, 50.0)), Point::new(5.0, 30.0));
        assert!(rect.contains(Point::new(110.0, 120.0)));
        assert!(!rect.contains(Point::new(9.0, 50.0)));
        assert!(Rect::ZERO.is_empty());
    }

    #[test]
    fn hex_colors() {
        let indigo = Color::from_hex(0x4338ca);
        assert!((indigo.r - 67.0 / 255.0).abs() < 1e-6);
        assert!((indigo.b - 202.0 / 255.0).abs() < 1e-6);
        assert_eq!(Color::WHITE.with_alpha(0.8).a, 0.8);
        assert_eq!(Color::BLACK.lerp(&Color::WHITE, 2.0), Color::WHITE);
    }
}
