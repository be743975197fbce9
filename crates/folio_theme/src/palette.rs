//! Named colors for the light and dark appearances.

use crate::preference::ThemePreference;
use folio_core::Color;

/// Role a color plays on the page
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ColorToken {
    Background,
    Surface,
    TextPrimary,
    TextSecondary,
    Border,
    Accent,
    /// Second gradient stop behind headings
    AccentSecondary,
    /// Star field dots
    Star,
    CursorFollower,
}

impl ColorToken {
    pub const ALL: [ColorToken; 9] = [
        ColorToken::Background,
        ColorToken::Surface,
        ColorToken::TextPrimary,
        ColorToken::TextSecondary,
        ColorToken::Border,
        ColorToken::Accent,
        ColorToken::AccentSecondary,
        ColorToken::Star,
        ColorToken::CursorFollower,
    ];

    const fn slot(self) -> usize {
        self as usize
    }
}

const INDIGO: u32 = 0x6366F1;
const PURPLE: u32 = 0xA855F7;

/// One color per [`ColorToken`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    colors: [Color; ColorToken::ALL.len()],
}

impl Palette {
    fn from_fn(mut color: impl FnMut(ColorToken) -> Color) -> Self {
        Palette {
            colors: ColorToken::ALL.map(&mut color),
        }
    }

    pub fn light() -> Self {
        Palette::from_fn(|token| match token {
            ColorToken::Background | ColorToken::Surface => Color::WHITE,
            ColorToken::TextPrimary => Color::BLACK,
            ColorToken::TextSecondary => Color::from_hex(0x1F2937),
            ColorToken::Border => Color::from_hex(0xE5E7EB),
            ColorToken::Accent => Color::from_hex(INDIGO),
            ColorToken::AccentSecondary => Color::from_hex(PURPLE),
            ColorToken::Star => Color::from_hex(0x4338CA),
            ColorToken::CursorFollower => Color::from_hex(INDIGO).with_alpha(0.6),
        })
    }

    pub fn dark() -> Self {
        Palette::from_fn(|token| match token {
            ColorToken::Background => Color::from_hex(0x0A0518),
            ColorToken::Surface => Color::from_hex(0x111827),
            ColorToken::TextPrimary => Color::WHITE,
            ColorToken::TextSecondary => Color::from_hex(0xE5E7EB),
            ColorToken::Border => Color::from_hex(0x1F2937),
            ColorToken::Accent => Color::from_hex(INDIGO),
            ColorToken::AccentSecondary => Color::from_hex(PURPLE),
            ColorToken::Star => Color::WHITE.with_alpha(0.8),
            ColorToken::CursorFollower => Color::WHITE.with_alpha(0.6),
        })
    }

    pub fn for_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Light => Palette::light(),
            ThemePreference::Dark => Palette::dark(),
        }
    }

    pub fn get(&self, token: ColorToken) -> Color {
        self.colors[token.slot()]
    }

    /// Every token blended from `from` toward `to`
    pub fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Palette::from_fn(|token| from.get(token).lerp(&to.get(token), t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_and_dark_differ_where_it_matters() {
        let light = Palette::light();
        let dark = Palette::dark();
        for token in [ColorToken::Background, ColorToken::TextPrimary, ColorToken::Star] {
            assert_ne!(light.get(token), dark.get(token), "{token:?}");
        }
        assert_eq!(light.get(ColorToken::Accent), dark.get(ColorToken::Accent));
    }

    #[test]
    fn tokens_map_to_their_own_slot() {
        for (i, token) in ColorToken::ALL.into_iter().enumerate() {
            assert_eq!(token.slot(), i);
        }
    }

    #[test]
    fn lerp_endpoints() {
        let light = Palette::light();
        let dark = Palette::dark();
        assert_eq!(Palette::lerp(&light, &dark, 0.0), light);
        let end = Palette::lerp(&light, &dark, 1.0);
        for token in ColorToken::ALL {
            let (a, b) = (end.get(token), dark.get(token));
            assert!((a.r - b.r).abs() < 1e-6 && (a.a - b.a).abs() < 1e-6, "{token:?}");
        }
    }
}
