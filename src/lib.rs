//! Producer Device Info
//!
//! Builds and validates the device descriptor a media producer client uses
//! to size its local buffering storage before streaming begins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Producer Pipeline                               │
//! │                  (consumes the finished DeviceInfo)                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐   │
//! │  │  Factory         │  │  Storage Sizing  │  │  Config File         │   │
//! │  │  (defaults +     │  │  (bitrate x      │  │  Overrides           │   │
//! │  │   log level)     │  │   duration)      │  │  (JSON, 2 keys)      │   │
//! │  └────────┬─────────┘  └────────┬─────────┘  └──────────┬───────────┘   │
//! │           └─────────────────────┼────────────────────────┘               │
//! │                       ┌─────────┴─────────┐                              │
//! │                       │    DeviceInfo     │── validate ── release        │
//! │                       └───────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`device`]: Descriptor model, factory, sizing, overrides and release
//! - [`error`]: Error types and handling

pub mod device;
pub mod error;

// Re-export commonly used types
pub use device::{
    create_default_device_info, estimate_storage_size, release, ClientInfo, ConfigFileLoader,
    ConfigOverrides, DeviceInfo, DeviceInfoFactory, DeviceStorageType, LogLevel, StorageInfo, Tag,
    DEBUG_LOG_LEVEL_ENV_VAR, MAX_STORAGE_ALLOCATION_SIZE,
};

pub use error::{Error, ErrorKind, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
