// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dope sheet documents: build settings plus the channels to summarize.

use ordoplay_editor_keylist::{
    channel_to_keylist, summary_to_keylist, AnimKeylist, Channel, KeylistError, KeylistSettings,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Document errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path of the document
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Document is not valid RON
    #[error("Failed to parse dope sheet: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Building a keylist failed
    #[error("Keylist error: {0}")]
    Keylist(#[from] KeylistError),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// A dope sheet to summarize
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DopeSheet {
    /// Keylist build settings
    #[serde(default)]
    pub settings: KeylistSettings,
    /// Channels, top to bottom
    pub channels: Vec<Channel>,
}

impl DopeSheet {
    /// Parse a dope sheet from RON
    pub fn from_ron(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }

    /// Load a dope sheet from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let sheet = Self::from_ron(&content)?;
        tracing::info!("Loaded dope sheet with {} channels from {:?}", sheet.channels.len(), path);
        Ok(sheet)
    }

    /// Replace the document's build settings with a settings file
    pub fn with_settings_file(mut self, path: &Path) -> Result<Self> {
        self.settings = KeylistSettings::load(path)?;
        tracing::info!("Using keylist settings from {:?}", path);
        Ok(self)
    }

    /// Frozen keylist summarizing every channel
    pub fn summary(&self) -> Result<AnimKeylist> {
        let mut keylist = AnimKeylist::new();
        summary_to_keylist(&mut keylist, &self.channels, &self.settings)?;
        keylist.prepare_for_direct_access();
        Ok(keylist)
    }

    /// Frozen keylist of a single channel
    pub fn channel(&self, channel: &Channel) -> Result<AnimKeylist> {
        let mut keylist = AnimKeylist::new();
        channel_to_keylist(&mut keylist, channel, &self.settings)?;
        keylist.prepare_for_direct_access();
        Ok(keylist)
    }
}
