//! Descriptor Release
//!
//! Explicit teardown through the slot that owns the descriptor. Dropping a
//! [`DeviceInfo`] also frees it; `release` additionally clears the slot so
//! the handle cannot be reused.

use crate::device::info::DeviceInfo;
use crate::error::{Error, Result};
use tracing::debug;

/// Free the descriptor held in `slot` and leave the slot empty
///
/// A missing slot is an [`Error::NullArgument`]; an already empty slot is a
/// successful no-op, so releasing twice through the same slot is harmless.
pub fn release(slot: Option<&mut Option<DeviceInfo>>) -> Result<()> {
    let slot = slot.ok_or(Error::NullArgument("device info slot"))?;

    if let Some(info) = slot.take() {
        debug!(name = %info.name, "Releasing device info");
        drop(info);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_release_clears_slot() {
        let mut slot = Some(DeviceInfo::default());
        release(Some(&mut slot)).unwrap();
        assert!(slot.is_none());
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut slot = Some(DeviceInfo::default());
        assert!(release(Some(&mut slot)).is_ok());
        assert!(release(Some(&mut slot)).is_ok());
        assert!(slot.is_none());
    }

    #[test]
    fn test_missing_slot() {
        assert_matches!(release(None), Err(Error::NullArgument(_)));
    }
}
