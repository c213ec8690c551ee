//! # echoline
//!
//! An interrupt-driven serial line-echo service: received bytes accumulate
//! in a fixed-capacity ring buffer until a terminator arrives, then the line
//! is echoed back case-folded, one byte per transmit-complete event. The
//! pattern comes from classic 8-bit UART bench demos; this crate lifts it
//! out of register-poking code and behind a small device trait so it can be
//! driven by a real ISR, a host thread, or a test.
//!
//! ## Module Overview
//! - [`buffer`]  – Bounded byte FIFO with modular wrap-around.
//! - [`fold`]    – Case-fold policies applied on transmit.
//! - [`event`]   – The two interrupt sources as discrete events.
//! - [`service`] – The pure echo state machine: handlers and completion poll.
//! - [`uart`]    – Wire configuration and the register-level device trait.
//! - [`driver`]  – Combined interrupt handler plus foreground pump.
//! - [`sim`]     – In-memory UART for tests and loopback.
//! - [`sync`]    – Mutex/Arc selection for hosted vs. lock-free builds.
//!
//! The modules stay loosely coupled: `service` never touches a register, and
//! everything above it only speaks [`uart::UartDevice`].

pub mod buffer;
pub mod driver;
pub mod error;
pub mod event;
pub mod fold;
pub mod service;
pub mod sim;
pub mod sync;
pub mod uart;

pub use buffer::LineBuffer;
pub use driver::EchoDriver;
pub use error::LinkError;
pub use event::LinkEvent;
pub use fold::FoldPolicy;
pub use service::{
    parse_terminator, EchoService, EchoStats, LinkState, CARRIAGE_RETURN, LINE_FEED,
};
pub use sim::SimUart;
pub use uart::{DataBits, FlowControl, Parity, SerialConfig, StopBits, UartDevice};

#[cfg(test)]
mod tests;
