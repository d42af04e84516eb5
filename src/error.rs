//! Error handling for the lipsync layer generator
//!
//! Every error carries a stable code and, where it makes sense, recovery
//! suggestions the invoking tool can show next to its progress UI.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for lipsync layer operations
pub type Result<T> = std::result::Result<T, LipsyncError>;

/// Main error type for lipsync layer generation
#[derive(Error, Debug)]
pub enum LipsyncError {
    // Configuration-domain errors
    #[error("Viseme index {index} is out of range (expected 0..=14)")]
    VisemeOutOfRange { index: i64 },

    #[error("Viseme tweak table must have {expected} entries, found {actual}")]
    InvalidTweakTable { expected: usize, actual: usize },

    #[error("Invalid lipsync configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid avatar descriptor: {reason}")]
    InvalidAvatar { reason: String },

    #[error("Clip authoring failed for viseme {viseme}: {reason}")]
    ClipAuthoring { viseme: usize, reason: String },

    // External container errors
    #[error("Animator layer operation failed: {reason}")]
    LayerError { reason: String },

    #[error("Asset container operation failed: {reason}")]
    AssetError { reason: String },

    #[error("Asset not found: {id}")]
    AssetNotFound { id: String },

    #[error("Asset '{name}' failed its integrity check")]
    IntegrityMismatch { name: String },

    // File errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LipsyncError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            LipsyncError::VisemeOutOfRange { .. } => "VISEME_OUT_OF_RANGE",
            LipsyncError::InvalidTweakTable { .. } => "INVALID_TWEAK_TABLE",
            LipsyncError::InvalidConfig { .. } => "INVALID_CONFIG",
            LipsyncError::InvalidAvatar { .. } => "INVALID_AVATAR",
            LipsyncError::ClipAuthoring { .. } => "CLIP_AUTHORING",
            LipsyncError::LayerError { .. } => "LAYER_ERROR",
            LipsyncError::AssetError { .. } => "ASSET_ERROR",
            LipsyncError::AssetNotFound { .. } => "ASSET_NOT_FOUND",
            LipsyncError::IntegrityMismatch { .. } => "INTEGRITY_MISMATCH",
            LipsyncError::FileNotFound { .. } => "FILE_NOT_FOUND",
            LipsyncError::FileReadError { .. } => "FILE_READ_ERROR",
            LipsyncError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            LipsyncError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            LipsyncError::Io(_) => "IO_ERROR",
            LipsyncError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the user can fix this error and simply run generation again.
    ///
    /// Contract violations between the generator and its fixed viseme domain
    /// are never recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LipsyncError::InvalidConfig { .. }
                | LipsyncError::InvalidAvatar { .. }
                | LipsyncError::FileNotFound { .. }
                | LipsyncError::IntegrityMismatch { .. }
                | LipsyncError::AssetNotFound { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            LipsyncError::VisemeOutOfRange { .. } | LipsyncError::InvalidTweakTable { .. } => vec![
                "The viseme tweak table must list exactly 15 entries, one per viseme",
                "Regenerate the configuration with 'lipsync-cli init-config'",
            ],
            LipsyncError::InvalidConfig { .. } => vec![
                "Check the lipsync configuration values are finite and non-negative",
                "The analog threshold must lie between 0 and 1",
            ],
            LipsyncError::InvalidAvatar { .. } => vec![
                "The avatar must declare one blendshape per viseme (15 in total)",
                "Check the face mesh path is set",
            ],
            LipsyncError::IntegrityMismatch { .. } => vec![
                "An asset was modified outside the generator",
                "Run generation again to rebuild the generated clips",
            ],
            LipsyncError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            _ => vec![],
        }
    }
}
