//! # iowarrior-hid
//!
//! A Rust crate for driving the LEDs and polling the buttons of a Code
//! Mercenaries IOWarrior40 starter kit via its USB HID interface, with optional
//! support for the extension board (16 more LEDs and extra buttons).
//!
//! This crate uses the `hidapi` crate for cross-platform USB HID communication.
//!
//! ## Features
//!
//! *   Session lifecycle with a simple state machine (`open`, `close`, `state`).
//!     *   `open` connects to the first IOWarrior found and checks it is an IOWarrior40.
//!     *   A failed write closes the session; callers re-open to continue.
//!     *   The last error is latched on the session (`last_error`, `last_error_str`).
//! *   Base board:
//!     *   8 LEDs on port 3 (`write_leds`).
//!     *   Edge-triggered button on P0.0 (`key_pressed`).
//!     *   Device info (`device_info`, `print_device_info`).
//! *   Extension board (`IoWarriorExt`):
//!     *   Detection handshake at open time (`detect`).
//!     *   16 LEDs on ports 1 and 2 (`write_leds`).
//!     *   Button readout (`read_buttons`).
//! *   Pluggable transport (`IowTransport`/`IowHandle`) with a `hidapi` backend and
//!     a scripted mock for tests.
//!
//! ## Reports
//!
//! The IOWarrior40 exchanges 4-byte IO pin reports (ports 0-3, little-endian)
//! preceded by report ID 0. LEDs and buttons are low active. The chip only sends
//! an input report when a pin changed, so button polling is edge triggered and a
//! poll without news is not an error.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use iowarrior_hid::{HidTransport, IoWarrior, Result};
//! use std::{thread, time::Duration};
//!
//! fn main() -> Result<()> {
//!     // Optional: Initialize logging
//!     // env_logger::init();
//!
//!     let mut device = IoWarrior::new(HidTransport::new()?);
//!     if let Err(e) = device.open() {
//!         eprintln!("Error opening device: {}", e);
//!         eprintln!("Ensure device is connected and permissions are set (e.g., udev rules on Linux).");
//!         return Err(e);
//!     }
//!     device.print_device_info()?;
//!
//!     for step in 0..8 {
//!         device.write_leds(1 << step)?;
//!         if device.key_pressed()? {
//!             println!("Button pressed");
//!         }
//!         thread::sleep(Duration::from_millis(200));
//!     }
//!
//!     device.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Hardware Setup Notes
//!
//! *   **Linux udev Rules:** Grant user permission to the HID devices. Create `/etc/udev/rules.d/99-iowarrior.rules`:
//!     ```udev
//!     # Rule for Code Mercenaries IOWarrior40 (VID 07c0, PID 1500)
//!     SUBSYSTEM=="hidraw", ATTRS{idVendor}=="07c0", ATTRS{idProduct}=="1500", MODE="0666", GROUP="plugdev"
//!     ```
//!     *(Adjust `GROUP` if needed)*. Reload: `sudo udevadm control --reload-rules && sudo udevadm trigger`
//! *   **Extension board:** Expected to connect P0.1 to P0.0 while fitted.
//!
//! ## License
//!
//! This project is licensed under the WTFPL.

// Make internal modules private, re-export public types
mod consts;
mod device;
mod error;
mod extension;
pub mod report;
pub mod transport;

pub use device::{DeviceInfo, DeviceState, IoWarrior, SessionConfig};
pub use error::{Error, LastError, Result};
pub use extension::IoWarriorExt;
pub use report::{Port, Report};
pub use transport::{HidTransport, IowHandle, IowTransport, MockTransport};
// Re-export only essential public constants
pub use consts::{
    ALL_PINS_HIGH, IOW24_PID, IOW40_PID, IOWARRIOR_VID, POLL_INTERVAL, REPORT_SIZE,
    SETTLE_INTERVAL,
};
