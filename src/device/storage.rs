//! Storage Sizing
//!
//! Bounds-checked storage size assignment and the bitrate based estimate
//! used to size content storage before streaming.

use crate::device::info::DeviceInfo;
use crate::device::validation::validate_stream_count;
use crate::error::{Error, Result};
use std::time::Duration;
use tracing::debug;

// =============================================================================
// Allocation Bounds
// =============================================================================

/// Largest content storage the pipeline will allocate: 10 GB
pub const MAX_STORAGE_ALLOCATION_SIZE: u64 = 10 * 1024 * 1024 * 1024;

/// Smallest content storage the pipeline will accept: 1 MB
pub const MIN_STORAGE_ALLOCATION_SIZE: u64 = 1024 * 1024;

/// Headroom multiplier against allocator fragmentation
pub const STORAGE_ALLOCATION_DEFRAGMENTATION_FACTOR: f64 = 1.2;

/// Durations are measured in 100ns units
pub const HUNDREDS_OF_NANOS_IN_A_SECOND: u64 = 10_000_000;

// =============================================================================
// Estimation
// =============================================================================

/// Convert a duration to 100ns units
pub fn duration_in_hundreds_of_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos() / 100).unwrap_or(u64::MAX)
}

/// Estimate the content storage needed to buffer `buffer_duration` of media
/// at `average_bits_per_second` on each of `stream_count` streams
///
/// The result is truncated to whole bytes; the float to integer conversion
/// saturates at `u64::MAX`.
pub fn estimate_storage_size(
    stream_count: u32,
    average_bits_per_second: u64,
    buffer_duration: Duration,
) -> u64 {
    let bytes_per_second = average_bits_per_second as f64 / 8.0;
    let seconds = duration_in_hundreds_of_nanos(buffer_duration) as f64
        / HUNDREDS_OF_NANOS_IN_A_SECOND as f64;

    let estimated = stream_count as f64
        * (bytes_per_second * seconds)
        * STORAGE_ALLOCATION_DEFRAGMENTATION_FACTOR;

    estimated as u64
}

impl DeviceInfo {
    /// Set the content storage size
    ///
    /// Fails with [`Error::InvalidStorageSize`] above
    /// [`MAX_STORAGE_ALLOCATION_SIZE`]; the descriptor is left unchanged.
    pub fn set_storage_size(&mut self, storage_size: u64) -> Result<()> {
        if storage_size > MAX_STORAGE_ALLOCATION_SIZE {
            return Err(Error::InvalidStorageSize {
                size: storage_size,
                max: MAX_STORAGE_ALLOCATION_SIZE,
            });
        }

        self.storage_info.storage_size = storage_size;
        Ok(())
    }

    /// Size content storage from the expected bitrate and buffer duration
    ///
    /// An estimate above the allocation maximum is rejected, not clamped. A
    /// stream count outside the pipeline limits is rejected before estimating.
    pub fn set_storage_size_from_bitrate(
        &mut self,
        average_bits_per_second: u64,
        buffer_duration: Duration,
    ) -> Result<()> {
        if average_bits_per_second == 0 {
            return Err(Error::InvalidArg("average bitrate must be positive".into()));
        }
        if duration_in_hundreds_of_nanos(buffer_duration) == 0 {
            return Err(Error::InvalidArg("buffer duration must be positive".into()));
        }
        validate_stream_count(self.stream_count)?;

        let estimated =
            estimate_storage_size(self.stream_count, average_bits_per_second, buffer_duration);
        debug!(
            stream_count = self.stream_count,
            average_bits_per_second,
            buffer_duration_ms = buffer_duration.as_millis() as u64,
            estimated,
            "Estimated content storage size"
        );

        self.set_storage_size(estimated)
    }
}
