//! Descriptor Validation
//!
//! Limits enforced by the producer pipeline before it accepts a descriptor.

use crate::device::info::{DeviceInfo, DeviceStorageType, Tag};
use crate::device::storage::{MAX_STORAGE_ALLOCATION_SIZE, MIN_STORAGE_ALLOCATION_SIZE};
use crate::error::{Error, Result};
use std::path::Path;

// =============================================================================
// Limits
// =============================================================================

/// Maximum device name length in bytes
pub const MAX_DEVICE_NAME_LEN: usize = 128;

/// Maximum client id length in bytes
pub const MAX_CLIENT_ID_LEN: usize = 256;

/// Maximum number of tags per device
pub const MAX_TAG_COUNT: usize = 50;

/// Maximum tag name length in bytes
pub const MAX_TAG_NAME_LEN: usize = 128;

/// Maximum tag value length in bytes
pub const MAX_TAG_VALUE_LEN: usize = 1024;

/// Maximum number of streams a device may declare
pub const MAX_STREAM_COUNT: u32 = 128 * 1024;

/// Maximum path length in bytes
pub const MAX_PATH_LEN: usize = 4096;

// =============================================================================
// Field Checks
// =============================================================================

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.len() > MAX_DEVICE_NAME_LEN {
        return Err(Error::NameTooLong {
            len: name.len(),
            max: MAX_DEVICE_NAME_LEN,
        });
    }
    Ok(())
}

pub(crate) fn validate_client_id(client_id: &str) -> Result<()> {
    if client_id.len() > MAX_CLIENT_ID_LEN {
        return Err(Error::ClientIdTooLong {
            len: client_id.len(),
            max: MAX_CLIENT_ID_LEN,
        });
    }
    Ok(())
}

pub(crate) fn validate_stream_count(count: u32) -> Result<()> {
    if count == 0 || count > MAX_STREAM_COUNT {
        return Err(Error::InvalidStreamCount {
            count,
            max: MAX_STREAM_COUNT,
        });
    }
    Ok(())
}

pub(crate) fn validate_tag_count(count: usize) -> Result<()> {
    if count > MAX_TAG_COUNT {
        return Err(Error::TooManyTags {
            count,
            max: MAX_TAG_COUNT,
        });
    }
    Ok(())
}

pub(crate) fn validate_tag(tag: &Tag) -> Result<()> {
    let reason = if tag.name.is_empty() {
        "name is empty".to_string()
    } else if tag.name.len() > MAX_TAG_NAME_LEN {
        format!("name exceeds {} bytes", MAX_TAG_NAME_LEN)
    } else if tag.value.len() > MAX_TAG_VALUE_LEN {
        format!("value exceeds {} bytes", MAX_TAG_VALUE_LEN)
    } else {
        return Ok(());
    };

    Err(Error::InvalidTag {
        name: tag.name.clone(),
        reason,
    })
}

pub(crate) fn validate_path_len(path: &Path) -> Result<()> {
    let len = path.as_os_str().len();
    if len > MAX_PATH_LEN {
        return Err(Error::PathTooLong {
            len,
            max: MAX_PATH_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Whole Descriptor
// =============================================================================

impl DeviceInfo {
    /// Check every field against the pipeline limits
    ///
    /// Record versions are not checked: they are private and fixed at
    /// construction. Unlike the config file override, this always enforces
    /// the storage allocation bounds.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_client_id(&self.client_id)?;

        validate_tag_count(self.tags.len())?;
        for tag in &self.tags {
            validate_tag(tag)?;
        }

        validate_stream_count(self.stream_count)?;

        let storage = &self.storage_info;
        if storage.storage_size > MAX_STORAGE_ALLOCATION_SIZE {
            return Err(Error::InvalidStorageSize {
                size: storage.storage_size,
                max: MAX_STORAGE_ALLOCATION_SIZE,
            });
        }
        if storage.storage_size < MIN_STORAGE_ALLOCATION_SIZE {
            return Err(Error::StorageSizeTooSmall {
                size: storage.storage_size,
                min: MIN_STORAGE_ALLOCATION_SIZE,
            });
        }

        if !(0.0..=1.0).contains(&storage.spill_ratio) {
            return Err(Error::InvalidArg(format!(
                "spill ratio {} outside 0.0-1.0",
                storage.spill_ratio
            )));
        }

        validate_path_len(&storage.root_directory)?;
        if storage.storage_type == DeviceStorageType::HybridFile
            && storage.root_directory.as_os_str().is_empty()
        {
            return Err(Error::InvalidArg(
                "hybrid file storage requires a root directory".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_descriptor_is_valid() {
        assert!(DeviceInfo::default().validate().is_ok());
    }

    #[test]
    fn test_name_limits() {
        let mut info = DeviceInfo::default();
        info.name = "n".repeat(MAX_DEVICE_NAME_LEN);
        assert!(info.validate().is_ok());

        info.name.push('x');
        assert_matches!(info.validate(), Err(Error::NameTooLong { .. }));
    }

    #[test]
    fn test_stream_count_limits() {
        let mut info = DeviceInfo::default();
        info.stream_count = 0;
        assert_matches!(info.validate(), Err(Error::InvalidStreamCount { count: 0, .. }));

        info.stream_count = MAX_STREAM_COUNT + 1;
        assert_matches!(info.validate(), Err(Error::InvalidStreamCount { .. }));
    }

    #[test]
    fn test_storage_bounds() {
        let mut info = DeviceInfo::default();
        info.storage_info.storage_size = MAX_STORAGE_ALLOCATION_SIZE + 1;
        assert_matches!(info.validate(), Err(Error::InvalidStorageSize { .. }));

        info.storage_info.storage_size = MIN_STORAGE_ALLOCATION_SIZE - 1;
        assert_matches!(info.validate(), Err(Error::StorageSizeTooSmall { .. }));
    }

    #[test]
    fn test_hybrid_file_requires_root_directory() {
        let mut info = DeviceInfo::default();
        info.storage_info.storage_type = DeviceStorageType::HybridFile;
        assert_matches!(info.validate(), Err(Error::InvalidArg(_)));

        info.set_root_directory("/var/lib/producer").unwrap();
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_tag_limits() {
        let mut info = DeviceInfo::default();
        for i in 0..MAX_TAG_COUNT {
            info.add_tag(format!("tag-{}", i), "v").unwrap();
        }
        assert_matches!(info.add_tag("overflow", "v"), Err(Error::TooManyTags { .. }));

        let long_value = "v".repeat(MAX_TAG_VALUE_LEN + 1);
        let tag = Tag::new("big", long_value);
        assert_matches!(validate_tag(&tag), Err(Error::InvalidTag { .. }));
    }

    #[test]
    fn test_path_limit() {
        let mut info = DeviceInfo::default();
        let long = "a".repeat(MAX_PATH_LEN + 1);
        assert_matches!(info.set_root_directory(long), Err(Error::PathTooLong { .. }));
    }
}
