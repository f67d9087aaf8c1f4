//! Device Descriptor
//!
//! Construction, storage sizing, configuration overrides, validation and
//! release of the descriptor a producer client is configured with.
//!
//! # Usage
//!
//! ```no_run
//! use producer_device_info::device::{release, DeviceInfoFactory};
//! use std::time::Duration;
//!
//! # fn main() -> producer_device_info::Result<()> {
//! let mut info = DeviceInfoFactory::from_env()
//!     .with_name("front-door-cam")
//!     .create_default()?;
//!
//! // 2 Mbps per stream, 30 seconds of buffer
//! info.set_storage_size_from_bitrate(2_000_000, Duration::from_secs(30))?;
//! info.apply_config_file("/etc/producer/device.json")?;
//! info.validate()?;
//!
//! let mut slot = Some(info);
//! release(Some(&mut slot))?;
//! # Ok(())
//! # }
//! ```

pub mod config_file;
pub mod factory;
pub mod info;
pub mod release;
pub mod storage;
pub mod validation;

pub use config_file::{ConfigFileLoader, ConfigOverrides, MAX_CONFIG_FILE_SIZE};
pub use factory::{
    create_default_device_info, resolve_log_level, DeviceInfoFactory, LogLevelResolution,
    DEBUG_LOG_LEVEL_ENV_VAR,
};
pub use info::{
    ClientInfo, DeviceInfo, DeviceStorageType, LogLevel, StorageInfo, Tag,
    DEFAULT_DEVICE_STORAGE_SIZE, DEFAULT_LOG_LEVEL, DEFAULT_STREAM_COUNT,
};
pub use release::release;
pub use storage::{
    estimate_storage_size, MAX_STORAGE_ALLOCATION_SIZE, MIN_STORAGE_ALLOCATION_SIZE,
    STORAGE_ALLOCATION_DEFRAGMENTATION_FACTOR,
};
