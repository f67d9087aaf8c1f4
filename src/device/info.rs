//! Device Descriptor Model
//!
//! The configuration record handed to the producer pipeline before
//! streaming starts, plus the enums and defaults it is built from.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Record Versions
// =============================================================================

/// Current layout revision of [`DeviceInfo`]
pub const DEVICE_INFO_CURRENT_VERSION: u32 = 0;

/// Current layout revision of [`StorageInfo`]
pub const STORAGE_INFO_CURRENT_VERSION: u32 = 0;

/// Current layout revision of [`ClientInfo`]
pub const CLIENT_INFO_CURRENT_VERSION: u32 = 1;

// =============================================================================
// Defaults
// =============================================================================

/// Number of concurrent streams a default device supports
pub const DEFAULT_STREAM_COUNT: u32 = 16;

/// Default content storage size: 128 MB
pub const DEFAULT_DEVICE_STORAGE_SIZE: u64 = 128 * 1024 * 1024;

/// Log level used when no override is supplied
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Warn;

// =============================================================================
// Log Level
// =============================================================================

/// Client logging verbosity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum LogLevel {
    Verbose = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    Error = 5,
    Fatal = 6,
    Silent = 7,
}

impl LogLevel {
    /// Convert a raw level, clamping out-of-range values to the nearest bound
    pub fn from_raw_clamped(raw: u32) -> Self {
        match raw {
            0 | 1 => LogLevel::Verbose,
            2 => LogLevel::Debug,
            3 => LogLevel::Info,
            4 => LogLevel::Warn,
            5 => LogLevel::Error,
            6 => LogLevel::Fatal,
            _ => LogLevel::Silent,
        }
    }

    /// Numeric value of this level
    pub fn as_raw(self) -> u32 {
        self as u32
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        DEFAULT_LOG_LEVEL
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Verbose => write!(f, "verbose"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Fatal => write!(f, "fatal"),
            LogLevel::Silent => write!(f, "silent"),
        }
    }
}

// =============================================================================
// Storage Type
// =============================================================================

/// Backing medium for buffered media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStorageType {
    /// Plain in-memory heap
    #[default]
    InMemory,
    /// In-memory with content-store allocation
    InMemoryContentStore,
    /// Memory backed by files under the root directory
    HybridFile,
}

impl fmt::Display for DeviceStorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStorageType::InMemory => write!(f, "in-memory"),
            DeviceStorageType::InMemoryContentStore => write!(f, "in-memory-content-store"),
            DeviceStorageType::HybridFile => write!(f, "hybrid-file"),
        }
    }
}

// =============================================================================
// Nested Records
// =============================================================================

/// Key/value metadata attached to the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Storage sizing and placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageInfo {
    version: u32,
    /// Backing medium
    pub storage_type: DeviceStorageType,
    /// Total content storage in bytes
    pub storage_size: u64,
    /// Directory for file-backed storage; only meaningful for hybrid storage
    pub root_directory: PathBuf,
    /// Fraction of storage spilled to files (0.0-1.0)
    pub spill_ratio: f64,
}

impl StorageInfo {
    /// Layout revision this record was built with
    pub fn version(&self) -> u32 {
        self.version
    }
}

impl Default for StorageInfo {
    fn default() -> Self {
        Self {
            version: STORAGE_INFO_CURRENT_VERSION,
            storage_type: DeviceStorageType::InMemory,
            storage_size: DEFAULT_DEVICE_STORAGE_SIZE,
            root_directory: PathBuf::new(),
            spill_ratio: 0.0,
        }
    }
}

/// Client behaviour knobs
///
/// Zero timeouts mean "use the pipeline default".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientInfo {
    version: u32,
    pub log_level: LogLevel,
    pub log_metric: bool,
    pub stop_stream_timeout: Duration,
    pub create_client_timeout: Duration,
    pub create_stream_timeout: Duration,
}

impl ClientInfo {
    /// Layout revision this record was built with
    pub fn version(&self) -> u32 {
        self.version
    }
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            version: CLIENT_INFO_CURRENT_VERSION,
            log_level: DEFAULT_LOG_LEVEL,
            log_metric: true,
            stop_stream_timeout: Duration::ZERO,
            create_client_timeout: Duration::ZERO,
            create_stream_timeout: Duration::ZERO,
        }
    }
}

// =============================================================================
// Device Info
// =============================================================================

/// Device descriptor consumed by the producer pipeline
///
/// Owned by a single caller; mutate through `&mut` and hand off or
/// [`release`](crate::device::release) when done.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    version: u32,
    /// Short human-readable identifier
    pub name: String,
    /// Ordered metadata
    pub tags: Vec<Tag>,
    /// Concurrent logical streams; multiplier for storage sizing
    pub stream_count: u32,
    pub storage_info: StorageInfo,
    pub client_id: String,
    pub client_info: ClientInfo,
}

impl DeviceInfo {
    /// Layout revision this record was built with
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Append a tag after checking it against the tag limits
    pub fn add_tag(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> crate::Result<()> {
        let tag = Tag::new(name, value);
        crate::device::validation::validate_tag(&tag)?;
        crate::device::validation::validate_tag_count(self.tags.len() + 1)?;
        self.tags.push(tag);
        Ok(())
    }

    /// Set the file-backed storage directory
    pub fn set_root_directory(&mut self, path: impl Into<PathBuf>) -> crate::Result<()> {
        let path = path.into();
        crate::device::validation::validate_path_len(&path)?;
        self.storage_info.root_directory = path;
        Ok(())
    }

    /// Set the spill ratio, rejecting values outside 0.0-1.0
    pub fn set_spill_ratio(&mut self, ratio: f64) -> crate::Result<()> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(crate::Error::InvalidArg(format!(
                "spill ratio {} outside 0.0-1.0",
                ratio
            )));
        }
        self.storage_info.spill_ratio = ratio;
        Ok(())
    }
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            version: DEVICE_INFO_CURRENT_VERSION,
            name: String::new(),
            tags: Vec::new(),
            stream_count: DEFAULT_STREAM_COUNT,
            storage_info: StorageInfo::default(),
            client_id: String::new(),
            client_info: ClientInfo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_clamp() {
        assert_eq!(LogLevel::from_raw_clamped(0), LogLevel::Verbose);
        assert_eq!(LogLevel::from_raw_clamped(1), LogLevel::Verbose);
        assert_eq!(LogLevel::from_raw_clamped(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_raw_clamped(7), LogLevel::Silent);
        assert_eq!(LogLevel::from_raw_clamped(999), LogLevel::Silent);
        assert!(LogLevel::Verbose < LogLevel::Silent);
    }

    #[test]
    fn test_default_records() {
        let info = DeviceInfo::default();
        assert_eq!(info.version(), DEVICE_INFO_CURRENT_VERSION);
        assert_eq!(info.storage_info.version(), STORAGE_INFO_CURRENT_VERSION);
        assert_eq!(info.client_info.version(), CLIENT_INFO_CURRENT_VERSION);
        assert!(info.tags.is_empty());
        assert_eq!(info.tags.capacity(), 0);
        assert_eq!(info.client_info.stop_stream_timeout, Duration::ZERO);
        assert!(info.client_info.log_metric);
    }

    #[test]
    fn test_spill_ratio_bounds() {
        let mut info = DeviceInfo::default();
        assert!(info.set_spill_ratio(0.5).is_ok());
        assert_eq!(info.storage_info.spill_ratio, 0.5);
        assert!(info.set_spill_ratio(1.5).is_err());
        assert!(info.set_spill_ratio(f64::NAN).is_err());
        assert_eq!(info.storage_info.spill_ratio, 0.5);
    }

    #[test]
    fn test_add_tag() {
        let mut info = DeviceInfo::default();
        info.add_tag("site", "lab-3").unwrap();
        assert_eq!(info.tags, vec![Tag::new("site", "lab-3")]);
        assert!(info.add_tag("", "value").is_err());
        assert_eq!(info.tags.len(), 1);
    }

    #[test]
    fn test_storage_type_serialization() {
        let json = serde_json::to_string(&DeviceStorageType::InMemoryContentStore).unwrap();
        assert_eq!(json, "\"IN_MEMORY_CONTENT_STORE\"");
    }
}
