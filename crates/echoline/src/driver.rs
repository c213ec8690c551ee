//! Binds an [`EchoService`] to a [`UartDevice`].
//!
//! `on_interrupt` is the combined handler the hardware would invoke; on a
//! host, `run_pending` plays the interrupt controller and `poll` is the body
//! of the foreground idle loop.

use crate::service::{EchoService, EchoStats, LinkState};
use crate::uart::UartDevice;

/// Interrupt-level glue between one service instance and one peripheral.
pub struct EchoDriver<D: UartDevice, const N: usize> {
    device: D,
    service: EchoService<N>,
}

impl<D: UartDevice, const N: usize> EchoDriver<D, N> {
    /// Pair a device with a service. Interrupts stay gated until
    /// [`start`](Self::start) is called.
    pub fn new(device: D, service: EchoService<N>) -> Self {
        Self { device, service }
    }

    /// Open the interrupt gate.
    pub fn start(&mut self) {
        self.device.set_interrupt_enabled(true);
        log::debug!("echo driver started");
    }

    /// Close the interrupt gate. Pending flags are left as they are.
    pub fn stop(&mut self) {
        self.device.set_interrupt_enabled(false);
        log::debug!("echo driver stopped");
    }

    /// The combined interrupt handler: the receive condition is checked
    /// first, then the transmit condition, both within the one invocation.
    /// Runs to completion and never blocks.
    pub fn on_interrupt(&mut self) {
        if self.device.rx_pending() {
            self.device.clear_rx_pending();
            let byte = self.device.read_data();
            self.service.on_byte_received(byte);
        }
        if self.device.tx_pending() {
            self.device.clear_tx_pending();
            if let Some(byte) = self.service.on_transmit_complete() {
                self.device.write_data(byte);
            }
        }
    }

    /// Host-side interrupt controller: dispatch the handler while either
    /// pending flag is raised and the gate is open.
    pub fn run_pending(&mut self) {
        while self.device.interrupt_enabled()
            && (self.device.rx_pending() || self.device.tx_pending())
        {
            self.on_interrupt();
        }
    }

    /// Foreground completion poll. When a terminated line is ready the
    /// transmit-pending flag is raised to kick the drain; returns whether a
    /// reply was started.
    pub fn poll(&mut self) -> bool {
        if self.service.poll_completion() {
            self.device.raise_tx_pending();
            true
        } else {
            false
        }
    }

    /// One foreground cycle: service interrupts, poll, and service the drain
    /// a reply may have started.
    pub fn run_until_idle(&mut self) {
        self.run_pending();
        if self.poll() {
            self.run_pending();
        }
    }

    pub fn state(&self) -> LinkState {
        self.service.state()
    }

    pub fn stats(&self) -> EchoStats {
        self.service.stats()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Tear the pair apart again, for hosts that reuse the device.
    pub fn into_parts(self) -> (D, EchoService<N>) {
        (self.device, self.service)
    }
}
