//! Error types for the producer device info crate
//!
//! Provides structured error types for descriptor construction, storage
//! sizing, configuration file overrides and validation.

use thiserror::Error;

/// Unified error type for device descriptor operations
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Argument Errors
    // =========================================================================
    #[error("Required argument missing: {0}")]
    NullArgument(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    // =========================================================================
    // Resource Errors
    // =========================================================================
    #[error("Out of memory: failed to reserve {requested} bytes")]
    OutOfMemory { requested: u64 },

    #[error("Internal error: {0}")]
    Internal(String),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    #[error("Invalid storage size: {size} bytes exceeds maximum of {max} bytes")]
    InvalidStorageSize { size: u64, max: u64 },

    #[error("Storage size {size} bytes is below minimum of {min} bytes")]
    StorageSizeTooSmall { size: u64, min: u64 },

    // =========================================================================
    // Descriptor Validation Errors
    // =========================================================================
    #[error("Device name is {len} bytes, maximum is {max}")]
    NameTooLong { len: usize, max: usize },

    #[error("Client id is {len} bytes, maximum is {max}")]
    ClientIdTooLong { len: usize, max: usize },

    #[error("Too many tags: {count} (maximum {max})")]
    TooManyTags { count: usize, max: usize },

    #[error("Invalid tag {name:?}: {reason}")]
    InvalidTag { name: String, reason: String },

    #[error("Invalid stream count {count}: must be between 1 and {max}")]
    InvalidStreamCount { count: u32, max: u32 },

    #[error("Path is {len} bytes, maximum is {max}")]
    PathTooLong { len: usize, max: usize },

    // =========================================================================
    // Configuration File Errors
    // =========================================================================
    #[error("Configuration file is {size} bytes, maximum is {max} bytes")]
    ConfigFileTooLarge { size: u64, max: u64 },

    // =========================================================================
    // Parse / Serialize Errors
    // =========================================================================
    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML serialize error: {0}")]
    YamlSerialize(#[from] serde_yaml::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error category, one per status family reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required reference was missing
    NullArgument,
    /// Allocation failed
    OutOfMemory,
    /// An input was rejected
    InvalidArg,
    /// A storage size was outside the allocation bounds
    InvalidStorageSize,
    /// Malformed input or broken internal state
    Internal,
    /// Underlying file system failure
    Io,
}

impl Error {
    /// Map this error onto its coarse category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NullArgument(_) => ErrorKind::NullArgument,
            Error::OutOfMemory { .. } => ErrorKind::OutOfMemory,

            Error::InvalidStorageSize { .. } | Error::StorageSizeTooSmall { .. } => {
                ErrorKind::InvalidStorageSize
            }

            Error::InvalidArg(_)
            | Error::NameTooLong { .. }
            | Error::ClientIdTooLong { .. }
            | Error::TooManyTags { .. }
            | Error::InvalidTag { .. }
            | Error::InvalidStreamCount { .. }
            | Error::PathTooLong { .. }
            | Error::ConfigFileTooLarge { .. } => ErrorKind::InvalidArg,

            Error::Internal(_) | Error::JsonParse(_) | Error::YamlSerialize(_) => {
                ErrorKind::Internal
            }

            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if retrying the same call could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Io)
    }
}

/// Result type alias for descriptor operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = Error::InvalidStorageSize { size: 11, max: 10 };
        assert_eq!(err.kind(), ErrorKind::InvalidStorageSize);

        let err = Error::NullArgument("slot");
        assert_eq!(err.kind(), ErrorKind::NullArgument);

        let err = Error::ConfigFileTooLarge { size: 2048, max: 1024 };
        assert_eq!(err.kind(), ErrorKind::InvalidArg);

        let err = Error::Internal("bad json".into());
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_retryable() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::Interrupted, "eintr"));
        assert!(io.is_retryable());

        let config_err = Error::InvalidArg("zero bitrate".into());
        assert!(!config_err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidStorageSize { size: 5, max: 4 };
        assert_eq!(
            err.to_string(),
            "Invalid storage size: 5 bytes exceeds maximum of 4 bytes"
        );
    }
}
