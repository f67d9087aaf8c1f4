//! Configuration File Overrides
//!
//! Reads a small JSON object from disk and overrides the descriptor's
//! storage type and size from two recognized top-level keys:
//!
//! | Key | Value | Effect |
//! |---|---|---|
//! | `DEFAULT_DEVICE_STORAGE_TYPE` | `"HYBRID_FILE"`, `"CONTENT_STORE"` | storage type |
//! | `DEFAULT_DEVICE_STORAGE_SIZE` | decimal digits | storage size in bytes |
//!
//! Any other storage type value means in-memory. All other keys are
//! ignored. Members are applied in document order, so a repeated key ends
//! with its last valid value.

use crate::device::info::{DeviceInfo, DeviceStorageType};
use crate::device::storage::MAX_STORAGE_ALLOCATION_SIZE;
use crate::device::validation::validate_path_len;
use crate::error::{Error, Result};
use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, warn};

/// Key selecting the storage type
pub const STORAGE_TYPE_KEY: &str = "DEFAULT_DEVICE_STORAGE_TYPE";

/// Key carrying the storage size in bytes
pub const STORAGE_SIZE_KEY: &str = "DEFAULT_DEVICE_STORAGE_SIZE";

/// Largest configuration file read by default: 64 KB
pub const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// Parsed Overrides
// =============================================================================

/// Storage overrides found in a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigOverrides {
    pub storage_type: Option<DeviceStorageType>,
    pub storage_size: Option<u64>,
}

impl ConfigOverrides {
    /// Parse overrides from raw JSON bytes
    ///
    /// Malformed JSON or a non-object root is an [`Error::Internal`].
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| {
            error!("Configuration file parse failed: {}", e);
            Error::Internal(format!("malformed configuration file: {}", e))
        })
    }

    fn apply_member(&mut self, key: &str, value: &Value) {
        match key {
            STORAGE_TYPE_KEY => {
                let storage_type = storage_type_from_value(value);
                debug!("Storage type parsed: {} ({})", value, storage_type);
                self.storage_type = Some(storage_type);
            }
            STORAGE_SIZE_KEY => match storage_size_from_value(value) {
                Some(size) => {
                    debug!("Storage size parsed: {} bytes", size);
                    self.storage_size = Some(size);
                }
                None => warn!("Ignoring unparseable {} value {}", STORAGE_SIZE_KEY, value),
            },
            _ => {}
        }
    }

    /// True when neither key was present
    pub fn is_empty(&self) -> bool {
        self.storage_type.is_none() && self.storage_size.is_none()
    }
}

/// Walks the root object's members in document order, so every occurrence
/// of a repeated key is applied in turn
struct MemberScanner;

impl<'de> Visitor<'de> for MemberScanner {
    type Value = ConfigOverrides;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object of configuration keys")
    }

    fn visit_map<A>(self, mut members: A) -> std::result::Result<ConfigOverrides, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut overrides = ConfigOverrides::default();

        while let Some(key) = members.next_key::<String>()? {
            if key == STORAGE_TYPE_KEY || key == STORAGE_SIZE_KEY {
                let value: Value = members.next_value()?;
                overrides.apply_member(&key, &value);
            } else {
                members.next_value::<IgnoredAny>()?;
            }
        }

        Ok(overrides)
    }
}

impl<'de> Deserialize<'de> for ConfigOverrides {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MemberScanner)
    }
}

/// Map a config value onto a storage type; unknown values fall back to in-memory
pub fn storage_type_from_value(value: &Value) -> DeviceStorageType {
    match value.as_str() {
        Some("HYBRID_FILE") => DeviceStorageType::HybridFile,
        Some("CONTENT_STORE") => DeviceStorageType::InMemoryContentStore,
        _ => DeviceStorageType::InMemory,
    }
}

fn storage_size_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(digits) => digits.parse::<u64>().ok(),
        Value::Number(number) => number.as_u64(),
        _ => None,
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Reads configuration files and applies their overrides to descriptors
#[derive(Debug, Clone)]
pub struct ConfigFileLoader {
    max_file_size: u64,
    validate_storage_size: bool,
}

impl Default for ConfigFileLoader {
    fn default() -> Self {
        Self {
            max_file_size: MAX_CONFIG_FILE_SIZE,
            validate_storage_size: false,
        }
    }
}

impl ConfigFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject files larger than `max_file_size` bytes
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Check the file's storage size against the allocation maximum
    ///
    /// Off by default: a trusted local file may set any size.
    pub fn with_size_validation(mut self, enabled: bool) -> Self {
        self.validate_storage_size = enabled;
        self
    }

    /// Read the whole file: size it first, then fill an exactly sized buffer
    pub fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        if path.as_os_str().is_empty() {
            return Err(Error::NullArgument("config file path"));
        }
        validate_path_len(path)?;

        let file = File::open(path)?;
        let size = file.metadata()?.len();
        if size > self.max_file_size {
            return Err(Error::ConfigFileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(size as usize)
            .map_err(|_| Error::OutOfMemory { requested: size })?;
        file.take(size).read_to_end(&mut buffer)?;

        Ok(buffer)
    }

    /// Read and parse a configuration file without touching any descriptor
    pub fn load(&self, path: &Path) -> Result<ConfigOverrides> {
        let bytes = self.read_file(path)?;
        ConfigOverrides::parse(&bytes)
    }

    /// Apply a configuration file to `info`
    ///
    /// Nothing is written unless the file was read and parsed successfully.
    pub fn apply(&self, info: &mut DeviceInfo, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let overrides = self.load(path)?;
        if overrides.is_empty() {
            debug!("No storage overrides in {}", path.display());
            return Ok(());
        }

        if let (true, Some(size)) = (self.validate_storage_size, overrides.storage_size) {
            if size > MAX_STORAGE_ALLOCATION_SIZE {
                return Err(Error::InvalidStorageSize {
                    size,
                    max: MAX_STORAGE_ALLOCATION_SIZE,
                });
            }
        }

        if let Some(storage_type) = overrides.storage_type {
            info.storage_info.storage_type = storage_type;
        }
        if let Some(size) = overrides.storage_size {
            info.storage_info.storage_size = size;
        }

        Ok(())
    }
}

impl DeviceInfo {
    /// Override storage type and size from a JSON configuration file
    ///
    /// The size is written without the allocation bound check; call
    /// [`DeviceInfo::set_storage_size`] or [`DeviceInfo::validate`] afterwards
    /// when the bound must hold, or use a [`ConfigFileLoader`] with size
    /// validation enabled.
    pub fn apply_config_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        ConfigFileLoader::new().apply(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_both_keys() {
        let json = br#"{
            "DEFAULT_DEVICE_STORAGE_TYPE": "HYBRID_FILE",
            "DEFAULT_DEVICE_STORAGE_SIZE": "2048"
        }"#;
        let overrides = ConfigOverrides::parse(json).unwrap();
        assert_eq!(overrides.storage_type, Some(DeviceStorageType::HybridFile));
        assert_eq!(overrides.storage_size, Some(2048));
    }

    #[test]
    fn test_storage_type_mapping() {
        assert_eq!(
            storage_type_from_value(&Value::from("CONTENT_STORE")),
            DeviceStorageType::InMemoryContentStore
        );
        assert_eq!(
            storage_type_from_value(&Value::from("hybrid_file")),
            DeviceStorageType::InMemory
        );
        assert_eq!(
            storage_type_from_value(&Value::from("UNKNOWN_VALUE")),
            DeviceStorageType::InMemory
        );
        assert_eq!(storage_type_from_value(&Value::Null), DeviceStorageType::InMemory);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let json = br#"{
            "DEFAULT_DEVICE_STORAGE_SIZE": "1",
            "other": true,
            "DEFAULT_DEVICE_STORAGE_SIZE": "4096"
        }"#;
        let overrides = ConfigOverrides::parse(json).unwrap();
        assert_eq!(overrides.storage_size, Some(4096));
        assert_eq!(overrides.storage_type, None);
    }

    #[test]
    fn test_invalid_repeat_keeps_earlier_size() {
        let json = br#"{
            "DEFAULT_DEVICE_STORAGE_SIZE": "2048",
            "DEFAULT_DEVICE_STORAGE_SIZE": "abc"
        }"#;
        let overrides = ConfigOverrides::parse(json).unwrap();
        assert_eq!(overrides.storage_size, Some(2048));
    }

    #[test]
    fn test_repeated_storage_type_applied_in_order() {
        let json = br#"{
            "DEFAULT_DEVICE_STORAGE_TYPE": "HYBRID_FILE",
            "nested": {"DEFAULT_DEVICE_STORAGE_TYPE": "HYBRID_FILE"},
            "DEFAULT_DEVICE_STORAGE_TYPE": "CONTENT_STORE"
        }"#;
        let overrides = ConfigOverrides::parse(json).unwrap();
        assert_eq!(
            overrides.storage_type,
            Some(DeviceStorageType::InMemoryContentStore)
        );
    }

    #[test]
    fn test_numeric_size_accepted() {
        let json = br#"{"DEFAULT_DEVICE_STORAGE_SIZE": 65536}"#;
        let overrides = ConfigOverrides::parse(json).unwrap();
        assert_eq!(overrides.storage_size, Some(65536));
    }

    #[test]
    fn test_unparseable_size_ignored() {
        let overrides =
            ConfigOverrides::parse(br#"{"DEFAULT_DEVICE_STORAGE_SIZE":"12MB"}"#).unwrap();
        assert!(overrides.is_empty());

        let overrides =
            ConfigOverrides::parse(br#"{"DEFAULT_DEVICE_STORAGE_SIZE":"-5"}"#).unwrap();
        assert_eq!(overrides.storage_size, None);
    }

    #[test]
    fn test_unknown_keys_only() {
        let overrides = ConfigOverrides::parse(br#"{"STREAM_NAME":"cam-1"}"#).unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert_matches!(
            ConfigOverrides::parse(br#"{"DEFAULT_DEVICE_STORAGE_TYPE": "#),
            Err(Error::Internal(_))
        );
        assert_matches!(ConfigOverrides::parse(b"[1, 2]"), Err(Error::Internal(_)));
        assert_matches!(ConfigOverrides::parse(b"{} trailing"), Err(Error::Internal(_)));
    }

    #[test]
    fn test_empty_path_is_null_argument() {
        let mut info = DeviceInfo::default();
        assert_matches!(info.apply_config_file(""), Err(Error::NullArgument(_)));
    }
}
