use iowarrior_hid::{HidTransport, IoWarrior, Result};
use std::{thread, time::Duration};

// Poll period for the button, well above the chip's 8 ms sampling interval.
const POLL_MS: u64 = 20;

fn main() -> Result<()> {
    env_logger::init();
    let mut device = IoWarrior::new(HidTransport::new()?);
    println!("Opening first IOWarrior40...");
    if let Err(e) = device.open() {
        device.print_state();
        return Err(e);
    }
    device.print_device_info()?;

    println!("Counting button presses on the LEDs (Press Ctrl+C to stop)");
    let mut count: u8 = 0;
    device.write_leds(count)?;
    loop {
        if device.key_pressed()? {
            count = count.wrapping_add(1);
            println!("Presses: {}", count);
            device.write_leds(count)?;
        }
        thread::sleep(Duration::from_millis(POLL_MS));
    }
    // Note: Loop runs forever, Ctrl+C leaves the LEDs showing the last count
}
