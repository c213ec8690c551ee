//! UART device abstraction.
//!
//! The echo core consumes exactly what the excluded hardware-setup code
//! provides: a byte-received event with a readable data register and a
//! clearable pending flag, a byte-transmitted event with a writable data
//! register and a clearable/raisable pending flag, and a gate for the
//! interrupt source. Baud-rate dividers, pin routing and clocks stay on the
//! other side of this trait.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// UART data bits.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// UART stop bits.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// UART parity.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// UART flow control.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    None,
    RtsCts,
}

/// Wire configuration of the serial link.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
        }
    }
}

impl SerialConfig {
    /// Common alternative speed used by slower bench setups.
    pub fn at_baud(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

/// Register-level view of one UART peripheral.
///
/// Pending flags follow hardware semantics: the handler clears a flag before
/// touching the matching data register, and the foreground loop may raise
/// the transmit flag in software to start a reply. Reads and writes never
/// block and never fail; a host adapter that fronts a fallible transport
/// buffers internally and reports errors out of band.
pub trait UartDevice: Send {
    /// A received byte is waiting in the data register.
    fn rx_pending(&self) -> bool;

    /// Acknowledge the receive event.
    fn clear_rx_pending(&mut self);

    /// Read the receive data register.
    fn read_data(&mut self) -> u8;

    /// The transmitter has finished the previous byte.
    fn tx_pending(&self) -> bool;

    /// Acknowledge the transmit event.
    fn clear_tx_pending(&mut self);

    /// Software transmit start: make the transmit event fire.
    fn raise_tx_pending(&mut self);

    /// Load the transmit data register.
    fn write_data(&mut self, byte: u8);

    /// Gate the interrupt source for both events.
    fn set_interrupt_enabled(&mut self, enabled: bool);

    /// Current state of the interrupt gate.
    fn interrupt_enabled(&self) -> bool;
}
