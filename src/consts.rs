//! Internal constants, USB ids and pin masks.

use std::time::Duration;

// Default Vendor/Product IDs
/// Code Mercenaries vendor ID used by every IOWarrior chip.
pub const IOWARRIOR_VID: u16 = 0x07C0;
/// Product ID of the IOWarrior40.
pub const IOW40_PID: u16 = 0x1500;
/// Product ID of the IOWarrior24 (found on the same kits, but not supported).
pub const IOW24_PID: u16 = 0x1501;

/// HID interface carrying the IO pin reports. Interface 1 is the special mode pipe.
pub const IO_PINS_INTERFACE: i32 = 0;

// --- IO pin reports ---
/// Report ID for plain IO pin reports.
pub const REPORT_ID_IO: u8 = 0x00;
/// Payload bytes of an IO pin report (ports 0-3).
pub const REPORT_DATA_SIZE: usize = 4;
/// Bytes on the wire: report ID + payload.
pub const REPORT_SIZE: usize = 1 + REPORT_DATA_SIZE;

/// Output value that drives every pin high. High pins can also be read as inputs
/// and the low-active LEDs on port 3 are dark.
pub const ALL_PINS_HIGH: u32 = 0xFFFF_FFFF;

// --- Port 0 bits ---
/// Button on the base board (and SW1 of the extension board), low active.
pub const BTN_1: u8 = 1 << 0;
/// Output pin pulled low during extension detection.
pub const EXT_DETECT_PIN: u8 = 1 << 1;

/// Bits kept by the extension LED write (port 0 and port 3).
pub const EXT_LED_KEEP_MASK: u32 = 0xFF00_00FF;
/// Shift placing the extension LED word on ports 1 and 2.
pub const EXT_LED_SHIFT: u32 = 8;

// --- Timing ---
/// The chip samples its input pins roughly every 8 ms.
pub const POLL_INTERVAL: Duration = Duration::from_millis(8);
/// 1.5 poll intervals, enough for one fresh input report.
pub const SETTLE_INTERVAL: Duration = Duration::from_millis(12);
