//! Default Descriptor Factory
//!
//! Builds a [`DeviceInfo`] populated with safe defaults. The log level
//! override is an explicit input; [`DeviceInfoFactory::from_env`] resolves it
//! from the process environment once, up front.

use crate::device::info::{DeviceInfo, LogLevel, DEFAULT_LOG_LEVEL};
use crate::device::validation::{validate_client_id, validate_name, validate_stream_count};
use crate::error::Result;
use tracing::{debug, warn};

/// Environment variable carrying the numeric client log level
pub const DEBUG_LOG_LEVEL_ENV_VAR: &str = "AWS_KVS_LOG_LEVEL";

// =============================================================================
// Log Level Resolution
// =============================================================================

/// Outcome of resolving a raw log level override
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLevelResolution {
    /// No override supplied
    Default,
    /// Override parsed; `clamped` is set when it fell outside the enum range
    Override { level: LogLevel, clamped: bool },
    /// Override present but not a non-negative integer
    Unparseable(String),
}

impl LogLevelResolution {
    /// Level to use for the descriptor
    pub fn level(&self) -> LogLevel {
        match self {
            LogLevelResolution::Override { level, .. } => *level,
            LogLevelResolution::Default | LogLevelResolution::Unparseable(_) => DEFAULT_LOG_LEVEL,
        }
    }
}

/// Parse and clamp a raw log level string
pub fn resolve_log_level(raw: Option<&str>) -> LogLevelResolution {
    let Some(raw) = raw else {
        return LogLevelResolution::Default;
    };

    match raw.parse::<u32>() {
        Ok(value) => {
            let level = LogLevel::from_raw_clamped(value);
            LogLevelResolution::Override {
                level,
                clamped: level.as_raw() != value,
            }
        }
        Err(_) => LogLevelResolution::Unparseable(raw.to_string()),
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builder for default device descriptors
#[derive(Debug, Clone, Default)]
pub struct DeviceInfoFactory {
    log_level_override: Option<String>,
    name: Option<String>,
    client_id: Option<String>,
    stream_count: Option<u32>,
}

impl DeviceInfoFactory {
    /// Factory with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory whose log level override is read from [`DEBUG_LOG_LEVEL_ENV_VAR`]
    pub fn from_env() -> Self {
        Self::new().with_log_level_override(std::env::var(DEBUG_LOG_LEVEL_ENV_VAR).ok())
    }

    pub fn with_log_level_override(mut self, raw: Option<String>) -> Self {
        self.log_level_override = raw;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_stream_count(mut self, stream_count: u32) -> Self {
        self.stream_count = Some(stream_count);
        self
    }

    /// Build a descriptor with defaults plus the configured overrides
    ///
    /// An unparseable log level override is not an error: the default level
    /// is kept and a warning is logged.
    pub fn create_default(&self) -> Result<DeviceInfo> {
        let mut info = DeviceInfo::default();

        if let Some(name) = &self.name {
            validate_name(name)?;
            info.name = name.clone();
        }
        if let Some(client_id) = &self.client_id {
            validate_client_id(client_id)?;
            info.client_id = client_id.clone();
        }
        if let Some(stream_count) = self.stream_count {
            validate_stream_count(stream_count)?;
            info.stream_count = stream_count;
        }

        let resolution = resolve_log_level(self.log_level_override.as_deref());
        match &resolution {
            LogLevelResolution::Unparseable(raw) => {
                warn!("failed to parse {} value {:?}", DEBUG_LOG_LEVEL_ENV_VAR, raw);
            }
            LogLevelResolution::Override { level, clamped: true } => {
                debug!("{} clamped to {}", DEBUG_LOG_LEVEL_ENV_VAR, level);
            }
            _ => {}
        }
        info.client_info.log_level = resolution.level();

        Ok(info)
    }
}

/// Build a default descriptor, taking the log level override from the
/// process environment
pub fn create_default_device_info() -> Result<DeviceInfo> {
    DeviceInfoFactory::from_env().create_default()
}
