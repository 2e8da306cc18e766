use std::io;
use thiserror::Error;

/// Errors that can occur while defining or exporting an app manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse app definition: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Custom type requires either a name or a callback_id")]
    MissingTypeIdentity,

    #[error("Custom type cannot have both name '{name}' and callback_id '{callback_id}'")]
    ConflictingTypeIdentity { name: String, callback_id: String },

    #[error("Custom type '{0}' is already defined")]
    TypeAlreadyDefined(String),

    #[error("Custom type '{0}' was declared but never defined")]
    UndefinedType(String),
}
