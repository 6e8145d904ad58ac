//! Device session: open/close lifecycle and report I/O for one IOWarrior40.

use crate::consts::{self, REPORT_SIZE};
use crate::error::{Error, LastError, Result};
use crate::report::{Port, Report};
use crate::transport::{IowHandle, IowTransport};
use log::{debug, trace, warn};
use std::fmt;
use std::time::Duration;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceState {
    #[default]
    NotReady,
    Ready,
}

impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::NotReady => "Device is not Ready",
            DeviceState::Ready => "Device is Ready",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables of a session. `Default` targets an IOWarrior40.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Product id the opened device must report.
    pub expected_product_id: u16,
    /// Wait between driving a pin and reading its echo back.
    pub settle_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            expected_product_id: consts::IOW40_PID,
            settle_interval: consts::SETTLE_INTERVAL,
        }
    }
}

/// Identity of an opened device, as reported by the HID layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub serial_number: Option<String>,
    /// Firmware revision (BCD, e.g. `0x1030` is 1.0.3.0).
    pub revision: u16,
    pub api_version: String,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The Serial Number of The Device")?;
        writeln!(f, "{}", self.serial_number.as_deref().unwrap_or("<none>"))?;
        writeln!(f)?;
        writeln!(f, "The Revision of the Firmware of the Device")?;
        writeln!(f, "{:x}", self.revision)?;
        writeln!(f, "The Version of the IOW Device")?;
        write!(f, "{}", self.api_version)
    }
}

/// A session with one IOWarrior40.
///
/// Created NOT_READY. [`open`](Self::open) connects, [`close`](Self::close) (also
/// run on drop) disconnects. Every failed operation latches its cause in
/// [`last_error`](Self::last_error); a failed write also closes the session.
///
/// **Note:** A session is not meant to be shared between threads.
pub struct IoWarrior<T: IowTransport> {
    transport: T,
    handle: Option<T::Handle>,
    pub(crate) report_in: Report,
    pub(crate) report_out: Report,
    state: DeviceState,
    last_error: LastError,
    config: SessionConfig,
}

impl<T: IowTransport> IoWarrior<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            handle: None,
            report_in: Report::default(),
            report_out: Report::default(),
            state: DeviceState::NotReady,
            last_error: LastError::Ok,
            config,
        }
    }

    /// Opens the first IOWarrior and drives all its outputs high.
    ///
    /// Does nothing if the session is already READY. The handle is released
    /// again on every failure path.
    ///
    /// # Errors
    /// * [`Error::NoDeviceFound`] if no device is attached.
    /// * [`Error::InvalidDeviceFound`] if the device is not an IOWarrior40.
    /// * [`Error::WriteFailed`] if the initial output report is not accepted.
    pub fn open(&mut self) -> Result<()> {
        if self.state == DeviceState::Ready {
            return Ok(());
        }

        let handle = match self.transport.open_device() {
            Ok(Some(handle)) => handle,
            Ok(None) => return Err(self.fail(Error::NoDeviceFound)),
            Err(e) => {
                warn!("Opening IOWarrior failed: {}", e);
                self.last_error = LastError::NoDevice;
                return Err(e);
            }
        };

        let product_id = handle.product_id();
        if product_id != self.config.expected_product_id {
            warn!(
                "Found IOWarrior PID={:04X}, expected PID={:04X}",
                product_id, self.config.expected_product_id
            );
            handle.close();
            return Err(self.fail(Error::InvalidDeviceFound { product_id }));
        }
        self.handle = Some(handle);

        self.report_out = Report::new(consts::ALL_PINS_HIGH);
        if let Err(e) = self.push_report_out() {
            // Not READY yet, so close() would skip the release.
            self.release_handle();
            return Err(self.fail(e));
        }

        debug!("IOWarrior PID={:04X} ready", product_id);
        self.state = DeviceState::Ready;
        self.last_error = LastError::Ok;
        Ok(())
    }

    /// Drives all outputs high (best effort) and releases the device.
    /// Does nothing if the session is NOT_READY.
    pub fn close(&mut self) {
        if self.state == DeviceState::NotReady {
            return;
        }
        if let Some(handle) = &self.handle {
            let safe = Report::new(consts::ALL_PINS_HIGH).to_wire();
            match handle.write_report(&safe) {
                Ok(n) if n == REPORT_SIZE => {
                    self.report_out = Report::new(consts::ALL_PINS_HIGH);
                }
                Ok(n) => warn!("Final output report only partially written ({} bytes)", n),
                Err(e) => warn!("Final output report not written: {}", e),
            }
        }
        self.release_handle();
        self.state = DeviceState::NotReady;
        debug!("IOWarrior closed");
    }

    /// Shows `pattern` on the 8 LEDs of port 3. A set bit lights its LED.
    ///
    /// All other pins are driven high.
    pub fn write_leds(&mut self, pattern: u8) -> Result<()> {
        self.require_ready()?;
        self.report_out = Report::new(consts::ALL_PINS_HIGH);
        // LEDs are low active.
        self.report_out.set_byte(Port::P3, !pattern);
        trace!("LED pattern {:02X}", pattern);
        self.write_report_out()
    }

    /// Returns `true` once per press of the base board button.
    ///
    /// The chip only reports on pin changes, so a held button reads `true` on
    /// the press and `false` afterwards.
    pub fn key_pressed(&mut self) -> Result<bool> {
        self.require_ready()?;
        if !self.read_report_in()? {
            return Ok(false);
        }
        if self.report_in.byte(Port::P0) & consts::BTN_1 == 0 {
            // Consume the press.
            self.report_in.set_byte(Port::P0, 0xFF);
            return Ok(true);
        }
        Ok(false)
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn state_str(&self) -> &'static str {
        self.state.as_str()
    }

    pub fn is_ready(&self) -> bool {
        self.state == DeviceState::Ready
    }

    pub fn last_error(&self) -> LastError {
        self.last_error
    }

    pub fn last_error_str(&self) -> &'static str {
        self.last_error.as_str()
    }

    /// The output report most recently built for the device.
    pub fn report_out(&self) -> Report {
        self.report_out
    }

    /// The cached input report.
    pub fn report_in(&self) -> Report {
        self.report_in
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Prints state and last error on stdout.
    pub fn print_state(&self) {
        println!("{}", self.state_str());
        println!("{}", self.last_error_str());
    }

    /// Reads serial number, firmware revision and HID layer version.
    pub fn device_info(&mut self) -> Result<DeviceInfo> {
        self.require_ready()?;
        let handle = self.handle.as_ref().ok_or(Error::DeviceNotReady)?;
        Ok(DeviceInfo {
            serial_number: handle.serial_number()?,
            revision: handle.revision(),
            api_version: self.transport.api_version(),
        })
    }

    /// Prints [`device_info`](Self::device_info) on stdout.
    pub fn print_device_info(&mut self) -> Result<()> {
        let info = self.device_info()?;
        println!("{}", info);
        Ok(())
    }

    // --- Shared report I/O ---

    /// Fails with [`Error::DeviceNotReady`] (latched) unless READY.
    pub(crate) fn require_ready(&mut self) -> Result<()> {
        if self.state != DeviceState::Ready {
            return Err(self.fail(Error::DeviceNotReady));
        }
        Ok(())
    }

    /// Writes `report_out`. A short write latches the error and closes the
    /// session before failing.
    pub(crate) fn write_report_out(&mut self) -> Result<()> {
        if let Err(e) = self.push_report_out() {
            self.last_error = LastError::WriteError;
            self.close();
            return Err(e);
        }
        Ok(())
    }

    /// Polls for a fresh input report. Returns `true` if `report_in` was
    /// refreshed with a full report.
    pub(crate) fn read_report_in(&mut self) -> Result<bool> {
        let handle = self.handle.as_ref().ok_or(Error::DeviceNotReady)?;
        let mut buf = [0u8; REPORT_SIZE];
        let len = handle.read_report_non_blocking(&mut buf)?;
        if len != REPORT_SIZE {
            trace!("No fresh input report ({} bytes)", len);
            return Ok(false);
        }
        match Report::from_wire(&buf) {
            Some(report) => {
                trace!("Input report {:08X}", report.value);
                self.report_in = report;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Latches `err` and hands it back.
    pub(crate) fn fail(&mut self, err: Error) -> Error {
        if let Some(kind) = err.last_error() {
            self.last_error = kind;
        }
        err
    }

    fn push_report_out(&self) -> Result<()> {
        let handle = self.handle.as_ref().ok_or(Error::DeviceNotReady)?;
        let buf = self.report_out.to_wire();
        trace!("Output report {:02X?}", buf);
        let written = match handle.write_report(&buf) {
            Ok(n) => n,
            Err(e) => {
                warn!("Writing output report failed: {}", e);
                0
            }
        };
        if written != REPORT_SIZE {
            warn!(
                "Output report short write: {} of {} bytes",
                written, REPORT_SIZE
            );
            return Err(Error::WriteFailed {
                written,
                expected: REPORT_SIZE,
            });
        }
        Ok(())
    }

    fn release_handle(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.close();
        }
    }
}

impl<T: IowTransport> fmt::Debug for IoWarrior<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoWarrior")
            .field("state", &self.state)
            .field("last_error", &self.last_error)
            .field("report_in", &self.report_in)
            .field("report_out", &self.report_out)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: IowTransport> Drop for IoWarrior<T> {
    fn drop(&mut self) {
        self.close();
    }
}
