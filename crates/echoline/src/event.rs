//! Discrete events for the two hardware interrupt sources.
//!
//! The service core never touches registers; the two UART interrupts are
//! modeled as messages so the same logic runs under a real ISR, a host
//! thread, or a test harness.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One hardware event on the serial link.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// A byte arrived in the receive data register.
    ByteReceived(u8),
    /// The transmitter finished shifting out the previous byte.
    TransmitComplete,
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteReceived(byte) => write!(f, "RX({byte:#04x})"),
            Self::TransmitComplete => write!(f, "TX_DONE"),
        }
    }
}
