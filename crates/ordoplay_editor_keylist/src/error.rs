// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keylist errors.

use thiserror::Error;

/// Keylist errors
#[derive(Debug, Error)]
pub enum KeylistError {
    /// Columns were added or updated after the keylist was frozen
    #[error("Keylist is frozen, columns can no longer be added or updated")]
    Frozen,

    /// A query ran before the keylist was prepared for direct access
    #[error("Keylist must be prepared for direct access before it can be searched")]
    NotFrozen,

    /// Settings could not be parsed
    #[error("Invalid keylist settings: {0}")]
    Settings(#[from] ron::error::SpannedError),

    /// Settings could not be written
    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),

    /// Settings file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for keylist operations
pub type Result<T> = std::result::Result<T, KeylistError>;
