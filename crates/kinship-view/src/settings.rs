use anyhow::Context;
use kinship_core::ViewMode;
use kinship_graph::{CollisionConfig, LayoutConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub layout: LayoutConfig,
    pub collision: CollisionConfig,
    /// Mode used by the default view and after construction.
    pub default_mode: ViewMode,
    /// Generations expanded from the perspective; `None` is unlimited.
    pub max_generations: Option<u32>,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    50
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            collision: CollisionConfig::default(),
            default_mode: ViewMode::Both,
            max_generations: None,
            history_limit: default_history_limit(),
        }
    }
}

impl ViewSettings {
    /// `<config_dir>/kinship/view.json`, if the platform has a config dir.
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kinship").join("view.json"))
    }

    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::info!("No config directory available, using default view settings");
                Self::default()
            }
        }
    }

    /// Read settings from `path`, falling back to defaults on any failure.
    pub fn load_from(path: &Path) -> Self {
        tracing::info!("Loading view settings from {:?}", path);
        if !path.exists() {
            tracing::info!("View settings file not found, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::debug!("View settings loaded: {:?}", settings);
                    settings
                }
                Err(e) => {
                    tracing::error!("Failed to parse view settings: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read view settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::settings_path().context("no config directory available")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("view.json");

        let mut settings = ViewSettings::default();
        settings.default_mode = ViewMode::Descendants;
        settings.max_generations = Some(4);
        settings.layout.spouse_offset = 260.0;
        settings.save_to(&path).unwrap();

        assert_eq!(ViewSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_or_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(ViewSettings::load_from(&missing), ViewSettings::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_eq!(ViewSettings::load_from(&broken), ViewSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");
        std::fs::write(&path, r#"{ "default_mode": "Ancestors", "collision": { "min_gap": 5.0 } }"#)
            .unwrap();

        let settings = ViewSettings::load_from(&path);
        assert_eq!(settings.default_mode, ViewMode::Ancestors);
        assert_eq!(settings.collision.min_gap, 5.0);
        assert_eq!(settings.collision.max_iterations, 5);
        assert_eq!(settings.history_limit, 50);
        assert_eq!(settings.layout, LayoutConfig::default());
    }
}
