//! Driver error taxonomy
//!
//! Success is `Ok(())`. Every failure is reported straight to the caller;
//! nothing is logged or retried on the driver side.

/// Errors returned by driver operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// Operation is not supported by this driver
    NotImplemented,
    /// Argument or current state does not allow the operation
    InvalidParameter,
    /// A transfer is already in flight
    Busy,
    /// The peripheral reported a transfer error
    Io,
}

impl core::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceError::NotImplemented => f.write_str("not implemented"),
            DeviceError::InvalidParameter => f.write_str("invalid parameter"),
            DeviceError::Busy => f.write_str("transfer in flight"),
            DeviceError::Io => f.write_str("transfer error"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn test_display() {
        assert_eq!(DeviceError::NotImplemented.to_string(), "not implemented");
        assert_eq!(DeviceError::Busy.to_string(), "transfer in flight");
    }
}
