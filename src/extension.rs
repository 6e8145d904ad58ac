//! Session for an IOWarrior40 fitted with the extension board.
//!
//! The extension board wires output pin P0.1 back to the button input P0.0 and
//! carries 16 LEDs on ports 1 and 2. Its presence is checked by a pin toggle
//! handshake right after the base device has been opened.

use crate::consts::{self, EXT_DETECT_PIN};
use crate::device::{DeviceInfo, DeviceState, IoWarrior, SessionConfig};
use crate::error::{Error, LastError, Result};
use crate::report::{Port, Report};
use crate::transport::IowTransport;
use log::{debug, trace};
use std::thread;

/// An [`IoWarrior`] session that also drives the extension board.
pub struct IoWarriorExt<T: IowTransport> {
    base: IoWarrior<T>,
}

impl<T: IowTransport> IoWarriorExt<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        Self {
            base: IoWarrior::with_config(transport, config),
        }
    }

    /// The underlying base board session.
    pub fn base(&self) -> &IoWarrior<T> {
        &self.base
    }

    /// Opens the base device and checks for the extension board.
    ///
    /// Does nothing if already READY. If the extension board is missing the
    /// base device is closed again, so a failed open never leaves the device
    /// claimed.
    pub fn open(&mut self) -> Result<()> {
        if self.base.is_ready() {
            return Ok(());
        }
        self.base.open()?;
        if let Err(e) = self.detect() {
            debug!("Extension detection failed ({}), closing device", e);
            self.base.close();
            return Err(e);
        }
        Ok(())
    }

    /// Pin toggle handshake: drive P0.1 low, wait for a fresh input report and
    /// expect the (low active) P0.0 input to follow.
    ///
    /// On success P0.1 is driven high again. On failure it is left low.
    ///
    /// # Errors
    /// * [`Error::DeviceNotReady`] if the base device is not open.
    /// * [`Error::NoExtensionFound`] if P0.0 did not follow.
    /// * [`Error::WriteFailed`] if driving P0.1 failed; the session is closed.
    pub fn detect(&mut self) -> Result<()> {
        let base = &mut self.base;
        base.require_ready()?;
        let settle = base.config().settle_interval;

        // Priming read, drops whatever change is still pending.
        base.read_report_in()?;

        let port0 = base.report_out.byte(Port::P0);
        base.report_out.set_byte(Port::P0, port0 & !EXT_DETECT_PIN);
        base.write_report_out()?;

        thread::sleep(settle);

        if !base.read_report_in()? {
            debug!("No input change after driving P0.1 low");
            return Err(base.fail(Error::NoExtensionFound));
        }
        // Buttons are low active: invert, then the extension shows as a set bit.
        if (!base.report_in.byte(Port::P0) & consts::BTN_1) == 0 {
            debug!(
                "P0.0 did not follow P0.1 (input {:08X})",
                base.report_in.value
            );
            return Err(base.fail(Error::NoExtensionFound));
        }

        let port0 = base.report_out.byte(Port::P0);
        base.report_out.set_byte(Port::P0, port0 | EXT_DETECT_PIN);
        base.write_report_out()?;
        thread::sleep(settle);

        debug!("Extension board detected");
        Ok(())
    }

    /// Returns the extension buttons pressed according to a fresh input
    /// report, filtered by `mask`. Returns 0 if no pin changed since the
    /// previous poll.
    pub fn read_buttons(&mut self, mask: u8) -> Result<u8> {
        self.base.require_ready()?;
        if !self.base.read_report_in()? {
            return Ok(0x00);
        }
        // SW1 and the base board button share P0.0 and P0.1, shifting by one
        // lines the extension buttons up with bit 0.
        let buttons = ((!self.base.report_in.byte(Port::P0)) >> 1) & mask;
        trace!("Buttons {:02X} (mask {:02X})", buttons, mask);
        Ok(buttons)
    }

    /// Shows `value` on the 16 extension LEDs of ports 1 and 2. A set bit
    /// lights its LED. Ports 0 and 3 keep their current output.
    pub fn write_leds(&mut self, value: u16) -> Result<()> {
        self.base.require_ready()?;
        let out = &mut self.base.report_out;
        out.value &= consts::EXT_LED_KEEP_MASK;
        out.value |= u32::from(!value) << consts::EXT_LED_SHIFT;
        trace!("Extension LED pattern {:04X}", value);
        self.base.write_report_out()
    }

    pub fn key_pressed(&mut self) -> Result<bool> {
        self.base.key_pressed()
    }

    pub fn close(&mut self) {
        self.base.close()
    }

    pub fn device_info(&mut self) -> Result<DeviceInfo> {
        self.base.device_info()
    }

    /// Prints the base device info followed by the extension line.
    pub fn print_device_info(&mut self) -> Result<()> {
        self.base.print_device_info()?;
        println!("Extension board: available");
        Ok(())
    }

    pub fn print_state(&self) {
        self.base.print_state()
    }

    pub fn state(&self) -> DeviceState {
        self.base.state()
    }

    pub fn state_str(&self) -> &'static str {
        self.base.state_str()
    }

    pub fn is_ready(&self) -> bool {
        self.base.is_ready()
    }

    pub fn last_error(&self) -> LastError {
        self.base.last_error()
    }

    pub fn last_error_str(&self) -> &'static str {
        self.base.last_error_str()
    }

    pub fn report_out(&self) -> Report {
        self.base.report_out()
    }

    pub fn report_in(&self) -> Report {
        self.base.report_in()
    }
}

impl<T: IowTransport> std::fmt::Debug for IoWarriorExt<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoWarriorExt")
            .field("base", &self.base)
            .finish()
    }
}
