use anyhow::{Context, Result};

use crate::domain::theme::Theme;
use crate::repo::KeyValueStore;

pub const THEME_KEY: &str = "theme";

/// Dark/light flag persisted under [`THEME_KEY`], independent of the todos.
pub struct ThemePreference<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> ThemePreference<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn load(&self) -> Theme {
        match self.kv.get(THEME_KEY) {
            Ok(raw) => Theme::from_stored(raw.as_deref()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read theme; using light");
                Theme::Light
            }
        }
    }

    pub fn set(&self, theme: Theme) -> Result<()> {
        self.kv
            .set(THEME_KEY, theme.as_stored())
            .context("failed to persist theme")?;
        tracing::debug!(?theme, "persisted theme");
        Ok(())
    }

    pub fn toggle(&self) -> Result<Theme> {
        let next = self.load().toggled();
        self.set(next)?;
        Ok(next)
    }
}
