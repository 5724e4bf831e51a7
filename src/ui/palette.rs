use ratatui::style::Color;

use crate::domain::theme::Theme;

/// Colors for one theme: cyan accents in light mode, pink in dark mode.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub muted: Color,
    pub text: Color,
    pub done: Color,
    pub danger: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                accent: Color::Cyan,
                muted: Color::Gray,
                text: Color::Reset,
                done: Color::DarkGray,
                danger: Color::LightRed,
            },
            Theme::Dark => Self {
                accent: Color::LightMagenta,
                muted: Color::DarkGray,
                text: Color::White,
                done: Color::Gray,
                danger: Color::Red,
            },
        }
    }
}
