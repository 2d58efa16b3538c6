//! Error types for builder assembly and realization

use thiserror::Error;

/// Result type for builder operations
pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors that can occur while assembling or realizing a field descriptor
#[derive(Debug, Error)]
pub enum FieldError {
    /// Type realization requested with no type constructor installed
    #[error("no type set")]
    NoTypeSet,

    /// Child fields and select options are mutually exclusive
    #[error("fields and select options are mutually exclusive")]
    MixedFieldsAndOptions,

    /// A template callback is installed but no provider was registered or
    /// supplied, and templates were not disabled
    #[error("template callback specified but no provider was set")]
    MissingTemplateProvider,

    /// JSON serialization error while snapshotting a configuration
    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failure raised by the collaborating type system, propagated unchanged
    #[error(transparent)]
    External(#[from] anyhow::Error),
}
