use std::fmt;
use thiserror::Error;

/// Errors that can occur when talking to an IOWarrior40.
///
/// Every variant except [`Error::Hid`] corresponds to one value of the
/// [`LastError`] latch kept by a session.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the underlying HID API layer.
    #[error("HID API error: {0}")]
    Hid(#[from] hidapi::HidError),
    /// The transport did not hand out a device.
    #[error("No Device found.")]
    NoDeviceFound,
    /// A device was found, but it is not an IOWarrior40.
    #[error("Invalid IOWarrior device 0x{product_id:04X} (use IOWarrior40).")]
    InvalidDeviceFound {
        /// Product ID reported by the connected device.
        product_id: u16,
    },
    /// The device accepted fewer bytes than a full output report.
    #[error("Failed to write. ({written} of {expected} bytes)")]
    WriteFailed {
        /// Bytes the transport reported as written.
        written: usize,
        /// Size of an output report.
        expected: usize,
    },
    /// The operation needs an opened device.
    #[error("Open the Device First")]
    DeviceNotReady,
    /// The extension board handshake failed.
    #[error("no extension found")]
    NoExtensionFound,
}

impl Error {
    /// Value latched into a session's last error when this error is returned.
    /// Transport errors leave the latch untouched.
    pub fn last_error(&self) -> Option<LastError> {
        match self {
            Error::Hid(_) => None,
            Error::NoDeviceFound => Some(LastError::NoDevice),
            Error::InvalidDeviceFound { .. } => Some(LastError::InvalidDevice),
            Error::WriteFailed { .. } => Some(LastError::WriteError),
            Error::DeviceNotReady => Some(LastError::DeviceNotReady),
            Error::NoExtensionFound => Some(LastError::NoExtension),
        }
    }
}

/// Result type alias for IOWarrior operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of the most recent operation on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastError {
    #[default]
    Ok,
    NoDevice,
    InvalidDevice,
    WriteError,
    DeviceNotReady,
    NoExtension,
}

impl LastError {
    /// Fixed human readable text for this value.
    pub fn as_str(&self) -> &'static str {
        match self {
            LastError::Ok => "No Error Occurred",
            LastError::NoDevice => "No Device Found",
            LastError::InvalidDevice => "Invalid Device Found",
            LastError::WriteError => "Could not Write",
            LastError::DeviceNotReady => "Device is not open",
            LastError::NoExtension => "No Extension Board Found",
        }
    }
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
