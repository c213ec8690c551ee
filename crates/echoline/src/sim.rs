//! In-memory UART for tests and host loopback.

use std::collections::VecDeque;

use crate::uart::UartDevice;

/// Simulated UART peripheral.
///
/// Bytes are injected into a receive queue and appear one at a time through
/// the data register: reading the register latches the next byte and, while
/// more are queued, re-raises the receive-pending flag. Writing the transmit
/// register completes instantly, so the transmit-pending flag is raised
/// again as soon as a byte is loaded.
pub struct SimUart {
    rx_queue: VecDeque<u8>,
    rx_latch: u8,
    rx_flag: bool,
    tx_flag: bool,
    irq_enabled: bool,
    sent: Vec<u8>,
}

impl SimUart {
    pub fn new() -> Self {
        Self {
            rx_queue: VecDeque::new(),
            rx_latch: 0,
            rx_flag: false,
            tx_flag: false,
            irq_enabled: false,
            sent: Vec::new(),
        }
    }

    /// Deliver bytes from the remote end.
    pub fn inject(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.rx_queue.extend(bytes.iter().copied());
        self.rx_flag = true;
    }

    /// Everything written to the transmit register so far, in order.
    pub fn transmitted(&self) -> &[u8] {
        &self.sent
    }

    /// Drain the transmit log.
    pub fn take_transmitted(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.sent)
    }
}

impl Default for SimUart {
    fn default() -> Self {
        Self::new()
    }
}

impl UartDevice for SimUart {
    fn rx_pending(&self) -> bool {
        self.rx_flag
    }

    fn clear_rx_pending(&mut self) {
        self.rx_flag = false;
    }

    fn read_data(&mut self) -> u8 {
        if let Some(byte) = self.rx_queue.pop_front() {
            self.rx_latch = byte;
            // Next queued byte "arrives" immediately.
            if !self.rx_queue.is_empty() {
                self.rx_flag = true;
            }
        }
        self.rx_latch
    }

    fn tx_pending(&self) -> bool {
        self.tx_flag
    }

    fn clear_tx_pending(&mut self) {
        self.tx_flag = false;
    }

    fn raise_tx_pending(&mut self) {
        self.tx_flag = true;
    }

    fn write_data(&mut self, byte: u8) {
        self.sent.push(byte);
        self.tx_flag = true;
    }

    fn set_interrupt_enabled(&mut self, enabled: bool) {
        self.irq_enabled = enabled;
    }

    fn interrupt_enabled(&self) -> bool {
        self.irq_enabled
    }
}
