//! Scripted in-memory transport for exercising sessions without hardware.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{IowHandle, IowTransport};
use crate::consts::{self, REPORT_SIZE};
use crate::error::Result;
use crate::report::Report;

#[derive(Debug, Default)]
struct MockState {
    /// Product id of the attached device, `None` when unplugged.
    attached: Option<u16>,
    serial_number: Option<String>,
    revision: u16,
    /// Scripted byte counts for upcoming writes. Empty means "accept everything".
    write_results: VecDeque<usize>,
    /// Input reports handed out by upcoming reads.
    input_queue: VecDeque<Vec<u8>>,
    /// Every buffer passed to a write, in order.
    write_log: Vec<Vec<u8>>,
    reads: usize,
    opens: usize,
    closes: usize,
}

/// Mock transport. Clones share state, so a test keeps one clone for scripting
/// and inspection while the session owns the other.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// A transport with an IOWarrior40 attached.
    pub fn new() -> Self {
        Self::with_product_id(consts::IOW40_PID)
    }

    /// A transport with a device of the given product id attached.
    pub fn with_product_id(product_id: u16) -> Self {
        let mock = Self::default();
        {
            let mut state = mock.lock();
            state.attached = Some(product_id);
            state.serial_number = Some("00001A2B".to_string());
            state.revision = 0x1030;
        }
        mock
    }

    /// A transport with nothing attached.
    pub fn unplugged() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next write report `written` bytes.
    pub fn queue_write_result(&self, written: usize) {
        self.lock().write_results.push_back(written);
    }

    /// Queues a raw buffer returned by the next non-blocking read.
    pub fn queue_input(&self, buf: &[u8]) {
        self.lock().input_queue.push_back(buf.to_vec());
    }

    /// Queues a full input report with the given value.
    pub fn queue_input_value(&self, value: u32) {
        self.queue_input(&Report::new(value).to_wire());
    }

    /// All buffers written so far.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().write_log.clone()
    }

    /// The most recently written report, decoded.
    pub fn last_written(&self) -> Option<Report> {
        self.lock()
            .write_log
            .last()
            .and_then(|buf| Report::from_wire(buf))
    }

    pub fn clear_writes(&self) {
        self.lock().write_log.clear();
    }

    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    pub fn opens(&self) -> usize {
        self.lock().opens
    }

    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    /// Handles opened and not yet closed.
    pub fn open_handles(&self) -> usize {
        let state = self.lock();
        state.opens - state.closes
    }

    /// Number of I/O calls (writes and reads) seen so far.
    pub fn io_count(&self) -> usize {
        let state = self.lock();
        state.write_log.len() + state.reads
    }
}

impl IowTransport for MockTransport {
    type Handle = MockHandle;

    fn open_device(&mut self) -> Result<Option<MockHandle>> {
        let mut state = self.lock();
        let Some(product_id) = state.attached else {
            return Ok(None);
        };
        state.opens += 1;
        Ok(Some(MockHandle {
            product_id,
            shared: self.clone(),
        }))
    }

    fn api_version(&self) -> String {
        "mock transport".to_string()
    }
}

/// Handle handed out by [`MockTransport`].
#[derive(Debug)]
pub struct MockHandle {
    product_id: u16,
    shared: MockTransport,
}

impl IowHandle for MockHandle {
    fn product_id(&self) -> u16 {
        self.product_id
    }

    fn write_report(&self, buf: &[u8]) -> Result<usize> {
        let mut state = self.shared.lock();
        state.write_log.push(buf.to_vec());
        Ok(state.write_results.pop_front().unwrap_or(buf.len()))
    }

    fn read_report_non_blocking(&self, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.shared.lock();
        state.reads += 1;
        match state.input_queue.pop_front() {
            Some(data) => {
                let len = data.len().min(buf.len()).min(REPORT_SIZE);
                buf[..len].copy_from_slice(&data[..len]);
                Ok(len)
            }
            None => Ok(0),
        }
    }

    fn serial_number(&self) -> Result<Option<String>> {
        Ok(self.shared.lock().serial_number.clone())
    }

    fn revision(&self) -> u16 {
        self.shared.lock().revision
    }

    fn close(self) {
        self.shared.lock().closes += 1;
    }
}
