//! Unit tests for the base board session
//!
//! These tests drive `IoWarrior` over the scripted mock transport, no hardware
//! required.

use iowarrior_hid::{
    DeviceState, Error, IoWarrior, LastError, MockTransport, Port, Report, IOW24_PID,
    REPORT_SIZE,
};

fn open_device() -> (IoWarrior<MockTransport>, MockTransport) {
    let mock = MockTransport::new();
    let mut device = IoWarrior::new(mock.clone());
    device.open().expect("open should succeed on an IOWarrior40");
    (device, mock)
}

#[test]
fn test_new_session_is_not_ready() {
    let mock = MockTransport::new();
    let device = IoWarrior::new(mock.clone());

    assert_eq!(device.state(), DeviceState::NotReady);
    assert_eq!(device.state_str(), "Device is not Ready");
    assert_eq!(device.last_error(), LastError::Ok);
    assert_eq!(device.last_error_str(), "No Error Occurred");
    assert_eq!(mock.opens(), 0);
}

#[test]
fn test_open_drives_all_pins_high() {
    let (device, mock) = open_device();

    assert_eq!(device.state(), DeviceState::Ready);
    assert_eq!(device.state_str(), "Device is Ready");
    assert_eq!(device.last_error(), LastError::Ok);
    assert_eq!(mock.writes(), vec![vec![0x00, 0xFF, 0xFF, 0xFF, 0xFF]]);
    assert_eq!(mock.open_handles(), 1);
}

#[test]
fn test_open_twice_is_idempotent() {
    let (mut device, mock) = open_device();

    device.open().expect("second open should be a no-op");

    assert_eq!(device.state(), DeviceState::Ready);
    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.writes().len(), 1);
}

#[test]
fn test_close_when_not_ready_is_noop() {
    let mock = MockTransport::new();
    let mut device = IoWarrior::new(mock.clone());

    device.close();
    device.close();

    assert_eq!(device.state(), DeviceState::NotReady);
    assert_eq!(mock.closes(), 0);
    assert_eq!(mock.io_count(), 0);
}

#[test]
fn test_close_releases_handle_and_turns_leds_off() {
    let (mut device, mock) = open_device();
    device.write_leds(0xAA).unwrap();

    device.close();

    assert_eq!(device.state(), DeviceState::NotReady);
    assert_eq!(mock.open_handles(), 0);
    assert_eq!(mock.last_written(), Some(Report::new(0xFFFF_FFFF)));

    device.close();
    assert_eq!(mock.closes(), 1, "second close must not touch the handle");
}

#[test]
fn test_open_without_device() {
    let mock = MockTransport::unplugged();
    let mut device = IoWarrior::new(mock.clone());

    assert!(matches!(device.open(), Err(Error::NoDeviceFound)));
    assert_eq!(device.state(), DeviceState::NotReady);
    assert_eq!(device.last_error(), LastError::NoDevice);
    assert_eq!(device.last_error_str(), "No Device Found");
    assert_eq!(mock.io_count(), 0);
}

#[test]
fn test_open_wrong_product_releases_handle() {
    let mock = MockTransport::with_product_id(IOW24_PID);
    let mut device = IoWarrior::new(mock.clone());

    match device.open() {
        Err(Error::InvalidDeviceFound { product_id }) => assert_eq!(product_id, IOW24_PID),
        other => panic!("expected InvalidDeviceFound, got {other:?}"),
    }
    assert_eq!(device.state(), DeviceState::NotReady);
    assert_eq!(device.last_error(), LastError::InvalidDevice);
    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.open_handles(), 0);
    assert!(mock.writes().is_empty());
}

#[test]
fn test_open_short_write_releases_handle() {
    let mock = MockTransport::new();
    mock.queue_write_result(3);
    let mut device = IoWarrior::new(mock.clone());

    match device.open() {
        Err(Error::WriteFailed { written, expected }) => {
            assert_eq!(written, 3);
            assert_eq!(expected, REPORT_SIZE);
        }
        other => panic!("expected WriteFailed, got {other:?}"),
    }
    assert_eq!(device.state(), DeviceState::NotReady);
    assert_eq!(device.last_error(), LastError::WriteError);
    assert_eq!(mock.open_handles(), 0);
}

#[test]
fn test_write_leds_inverts_pattern_on_port3() {
    let (mut device, mock) = open_device();

    for pattern in 0u8..=255 {
        device.write_leds(pattern).unwrap();
        let out = device.report_out();
        assert_eq!(out.id, 0);
        assert_eq!(out.byte(Port::P3), !pattern, "pattern 0x{pattern:02X}");
        assert_eq!(out.byte(Port::P0), 0xFF);
        assert_eq!(out.byte(Port::P1), 0xFF);
        assert_eq!(out.byte(Port::P2), 0xFF);
        assert_eq!(mock.last_written(), Some(out));
    }
    assert_eq!(device.state(), DeviceState::Ready);
}

#[test]
fn test_write_failure_closes_session() {
    let (mut device, mock) = open_device();
    mock.queue_write_result(0);

    assert!(matches!(
        device.write_leds(0x0F),
        Err(Error::WriteFailed { written: 0, .. })
    ));
    assert_eq!(device.state(), DeviceState::NotReady);
    assert_eq!(device.last_error(), LastError::WriteError);
    assert_eq!(mock.open_handles(), 0);

    // No retry on a half-open session.
    assert!(matches!(device.write_leds(0x0F), Err(Error::DeviceNotReady)));

    // Re-opening recovers.
    device.open().unwrap();
    assert_eq!(device.last_error(), LastError::Ok);
    assert_eq!(mock.opens(), 2);
}

#[test]
fn test_gated_operations_need_open_device() {
    let mock = MockTransport::new();
    let mut device = IoWarrior::new(mock.clone());

    assert!(matches!(device.write_leds(0x01), Err(Error::DeviceNotReady)));
    assert_eq!(device.last_error(), LastError::DeviceNotReady);
    assert!(matches!(device.key_pressed(), Err(Error::DeviceNotReady)));
    assert!(matches!(device.device_info(), Err(Error::DeviceNotReady)));
    assert!(matches!(
        device.print_device_info(),
        Err(Error::DeviceNotReady)
    ));

    assert_eq!(device.last_error_str(), "Device is not open");
    assert_eq!(mock.io_count(), 0);
    assert_eq!(mock.opens(), 0);
}

#[test]
fn test_key_pressed_is_edge_triggered() {
    let (mut device, mock) = open_device();

    mock.queue_input_value(0xFFFF_FFFE);
    assert!(device.key_pressed().unwrap());
    assert_eq!(device.report_in().byte(Port::P0), 0xFF, "press is consumed");

    // Held button: no new report.
    assert!(!device.key_pressed().unwrap());

    // Release.
    mock.queue_input_value(0xFFFF_FFFF);
    assert!(!device.key_pressed().unwrap());

    assert_eq!(mock.reads(), 3);
    assert_eq!(device.last_error(), LastError::Ok);
}

#[test]
fn test_key_pressed_ignores_other_pins_and_short_reports() {
    let (mut device, mock) = open_device();

    mock.queue_input_value(0xFFFF_FF01);
    assert!(!device.key_pressed().unwrap());

    mock.queue_input(&[0x00, 0xFE]);
    assert!(!device.key_pressed().unwrap());
}

#[test]
fn test_device_info() {
    let (mut device, _mock) = open_device();

    let info = device.device_info().unwrap();
    assert_eq!(info.serial_number.as_deref(), Some("00001A2B"));
    assert_eq!(info.revision, 0x1030);
    assert_eq!(info.api_version, "mock transport");

    let text = info.to_string();
    assert!(text.contains("00001A2B"));
    assert!(text.contains("1030"));
    assert!(device.print_device_info().is_ok());
}

#[test]
fn test_drop_closes_device() {
    let mock = MockTransport::new();
    {
        let mut device = IoWarrior::new(mock.clone());
        device.open().unwrap();
        device.write_leds(0xFF).unwrap();
        assert_eq!(mock.open_handles(), 1);
    }
    assert_eq!(mock.open_handles(), 0);
    assert_eq!(mock.last_written(), Some(Report::new(0xFFFF_FFFF)));
}
