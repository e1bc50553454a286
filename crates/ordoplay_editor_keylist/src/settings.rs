// SPDX-License-Identifier: MIT OR Apache-2.0
//! Options controlling how sources are converted into keylists.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Keylist build settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeylistSettings {
    /// Classify keys as local extremes (needs each key's neighbours)
    pub show_extremes: bool,
    /// Only keys inside this frame range are added, plus the nearest key
    /// just outside on either side
    pub range: (f32, f32),
}

impl Default for KeylistSettings {
    fn default() -> Self {
        Self {
            show_extremes: false,
            range: (f32::MIN, f32::MAX),
        }
    }
}

impl KeylistSettings {
    /// Settings with extreme detection enabled
    pub fn with_extremes(mut self, show_extremes: bool) -> Self {
        self.show_extremes = show_extremes;
        self
    }

    /// Restrict the frame range
    pub fn with_range(mut self, start: f32, end: f32) -> Self {
        self.range = (start, end);
        self
    }

    /// Parse settings from RON
    pub fn from_ron(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }

    /// Serialize settings to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&content)?;
        tracing::debug!("Loaded keylist settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = KeylistSettings::default();
        assert!(!settings.show_extremes);
        assert_eq!(settings.range, (f32::MIN, f32::MAX));
    }

    #[test]
    fn test_serialization() {
        let settings = KeylistSettings::default().with_extremes(true).with_range(1.0, 250.0);
        let ron_str = settings.to_ron().unwrap();
        let loaded = KeylistSettings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded = KeylistSettings::from_ron("(show_extremes: true)").unwrap();
        assert!(loaded.show_extremes);
        assert_eq!(loaded.range, (f32::MIN, f32::MAX));
    }

    #[test]
    fn test_invalid_settings() {
        assert!(KeylistSettings::from_ron("(show_extremes: 3)").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("ordoplay_keylist_settings_{}.ron", std::process::id()));
        let settings = KeylistSettings::default().with_extremes(true).with_range(-10.0, 48.0);
        settings.save(&path).unwrap();

        let loaded = KeylistSettings::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file() {
        let result = KeylistSettings::load(Path::new("does/not/exist.ron"));
        assert!(matches!(result, Err(crate::error::KeylistError::Io(_))));
    }
}
