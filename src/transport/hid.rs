//! `hidapi` backed transport for real hardware.

use super::{IowHandle, IowTransport};
use crate::consts;
use crate::error::Result;
use hidapi::{HidApi, HidDevice};
use log::{debug, trace};

/// Finds IOWarriors through `hidapi`.
pub struct HidTransport {
    api: HidApi,
    vendor_id: u16,
}

impl HidTransport {
    /// Creates a transport looking for the Code Mercenaries vendor ID.
    pub fn new() -> Result<Self> {
        Self::with_vendor_id(consts::IOWARRIOR_VID)
    }

    /// Creates a transport looking for a custom vendor ID.
    pub fn with_vendor_id(vendor_id: u16) -> Result<Self> {
        Ok(Self {
            api: HidApi::new()?,
            vendor_id,
        })
    }
}

impl IowTransport for HidTransport {
    type Handle = HidHandle;

    fn open_device(&mut self) -> Result<Option<HidHandle>> {
        self.api.refresh_devices()?;

        // Any chip of the family is accepted here; the session checks the model.
        let Some(info) = self.api.device_list().find(|info| {
            info.vendor_id() == self.vendor_id
                && info.interface_number() == consts::IO_PINS_INTERFACE
        }) else {
            debug!("No IOWarrior with VID={:04X} attached", self.vendor_id);
            return Ok(None);
        };

        debug!(
            "Opening IOWarrior: VID={:04X}, PID={:04X}, Path={:?}, SN={:?}",
            info.vendor_id(),
            info.product_id(),
            info.path(),
            info.serial_number()
        );
        let product_id = info.product_id();
        let revision = info.release_number();
        let device = info.open_device(&self.api)?;
        device.set_blocking_mode(false)?;

        Ok(Some(HidHandle {
            device,
            product_id,
            revision,
        }))
    }

    fn api_version(&self) -> String {
        format!("hidapi ({} {})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// IO pins interface of an opened IOWarrior.
pub struct HidHandle {
    device: HidDevice,
    product_id: u16,
    revision: u16,
}

impl IowHandle for HidHandle {
    fn product_id(&self) -> u16 {
        self.product_id
    }

    fn write_report(&self, buf: &[u8]) -> Result<usize> {
        trace!("Writing IO report: {:02X?}", buf);
        Ok(self.device.write(buf)?)
    }

    fn read_report_non_blocking(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        // IO reports are unnumbered, hidapi strips the ID byte on input.
        let len = self.device.read_timeout(&mut buf[1..], 0)?;
        if len == 0 {
            return Ok(0);
        }
        buf[0] = consts::REPORT_ID_IO;
        trace!("Read IO report: {:02X?}", &buf[..=len]);
        Ok(len + 1)
    }

    fn serial_number(&self) -> Result<Option<String>> {
        Ok(self.device.get_serial_number_string()?)
    }

    fn revision(&self) -> u16 {
        self.revision
    }

    fn close(self) {
        debug!("Closing IOWarrior PID={:04X}", self.product_id);
        drop(self.device);
    }
}
