#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(self) -> Self {
        Self::from_dark(!self.is_dark())
    }

    /// Only the exact string `"dark"` selects the dark theme.
    pub fn from_stored(raw: Option<&str>) -> Self {
        Self::from_dark(raw == Some("dark"))
    }

    pub fn as_stored(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}
