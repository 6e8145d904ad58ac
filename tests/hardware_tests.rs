// tests/hardware_tests.rs
use iowarrior_hid::{DeviceState, HidTransport, IoWarrior, IoWarriorExt, Result};
use std::{thread, time::Duration};

// Helper to open the first device, panics on failure for test simplicity
fn open_test_device() -> IoWarrior<HidTransport> {
    let transport = HidTransport::new().expect("Failed to create HID API");
    let mut device = IoWarrior::new(transport);
    device
        .open()
        .expect("Failed to open an IOWarrior40. Is it connected and permissions set?");
    device
}

#[test]
#[ignore] // Ignore by default, requires hardware
fn test_led_walk() -> Result<()> {
    let mut device = open_test_device();

    println!("Walking a single LED across port 3");
    for bit in 0..8 {
        device.write_leds(1 << bit)?;
        thread::sleep(Duration::from_millis(100));
    }
    device.write_leds(0x00)?;
    assert_eq!(device.state(), DeviceState::Ready);

    device.close();
    assert_eq!(device.state(), DeviceState::NotReady);
    Ok(())
}

#[test]
#[ignore] // Ignore by default, requires hardware and a person pressing the button
fn test_key_press() -> Result<()> {
    let mut device = open_test_device();

    println!("Press the button on the board within 5 seconds...");
    for _ in 0..500 {
        if device.key_pressed()? {
            println!("Button press detected");
            return Ok(());
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("No button press seen");
}

#[test]
#[ignore] // Ignore by default, requires hardware with the extension board fitted
fn test_extension_detection() -> Result<()> {
    let transport = HidTransport::new()?;
    let mut device = IoWarriorExt::new(transport);
    device.open()?;
    device.print_device_info()?;

    for step in 0..16 {
        device.write_leds(1 << step)?;
        thread::sleep(Duration::from_millis(50));
    }
    device.write_leds(0x0000)?;
    Ok(())
}
