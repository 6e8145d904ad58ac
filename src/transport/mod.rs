//! Boundary to the USB HID layer.
//!
//! A session only needs a handful of vendor calls: open the first device, ask
//! for its product id, push and poll IO pin reports, and read a few identity
//! strings. [`IowTransport`] and [`IowHandle`] describe exactly that, so the
//! session logic runs unchanged over [`hid::HidTransport`] (real hardware) or
//! [`mock::MockTransport`] (tests).

use crate::error::Result;

pub mod hid;
pub mod mock;

pub use hid::{HidHandle, HidTransport};
pub use mock::{MockHandle, MockTransport};

/// Source of device handles.
pub trait IowTransport {
    type Handle: IowHandle;

    /// Opens the first IOWarrior found. `Ok(None)` means no device is attached.
    fn open_device(&mut self) -> Result<Option<Self::Handle>>;

    /// Version string of the HID layer.
    fn api_version(&self) -> String;
}

/// An opened IOWarrior, IO pins pipe.
pub trait IowHandle {
    fn product_id(&self) -> u16;

    /// Writes one output report (report ID first). Returns the bytes accepted.
    fn write_report(&self, buf: &[u8]) -> Result<usize>;

    /// Non-blocking read of one input report (report ID first).
    /// Returns 0 when no pin changed since the previous read.
    fn read_report_non_blocking(&self, buf: &mut [u8]) -> Result<usize>;

    fn serial_number(&self) -> Result<Option<String>>;

    /// Firmware revision of the chip.
    fn revision(&self) -> u16;

    /// Releases the device.
    fn close(self);
}
