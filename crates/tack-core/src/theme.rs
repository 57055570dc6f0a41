use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

pub const THEME_FILE: &str = "theme.data";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn storage_value(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeProvider {
    path: PathBuf,
}

impl ThemeProvider {
    pub fn new(data_dir: &Path) -> Self {
        let path = data_dir.join(THEME_FILE);
        debug!(path = %path.display(), "initialized theme provider");
        Self { path }
    }

    /// Missing or unrecognized stored content falls back to light.
    #[tracing::instrument(skip(self))]
    pub fn get(&self) -> ThemeMode {
        let stored = fs::read_to_string(&self.path).ok();
        match stored.as_deref().map(str::trim) {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn set(&self, mode: ThemeMode) -> anyhow::Result<()> {
        fs::write(&self.path, mode.storage_value())
            .with_context(|| format!("failed writing {}", self.path.display()))?;
        info!(theme = mode.storage_value(), "theme updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{ThemeMode, ThemeProvider};

    #[test]
    fn defaults_to_light_and_roundtrips() {
        let temp = tempdir().expect("tempdir");
        let themes = ThemeProvider::new(temp.path());
        assert_eq!(themes.get(), ThemeMode::Light);

        themes.set(ThemeMode::Dark).expect("set theme");
        assert_eq!(themes.get(), ThemeMode::Dark);

        themes.set(ThemeMode::Light).expect("set theme");
        assert_eq!(themes.get(), ThemeMode::Light);
    }

    #[test]
    fn garbage_content_falls_back_to_light() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("theme.data"), "sepia\n").expect("write theme file");

        let themes = ThemeProvider::new(temp.path());
        assert_eq!(themes.get(), ThemeMode::Light);
    }
}
