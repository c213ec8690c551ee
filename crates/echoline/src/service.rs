//! The echo service state machine.
//!
//! Couples the line buffer to the two interrupt-level handlers and the
//! foreground completion poll. The service is pure state: it reads no
//! registers and performs no I/O, which is what lets the same code run under
//! a real ISR, behind a mutex on a host thread, or directly in a unit test.

use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::buffer::LineBuffer;
use crate::error::LinkError;
use crate::event::LinkEvent;
use crate::fold::FoldPolicy;

/// Default line terminator, carriage return.
pub const CARRIAGE_RETURN: u8 = 0x0D;
/// Line feed, the common alternative terminator.
pub const LINE_FEED: u8 = 0x0A;

/// Parse a terminator name from the command line: `cr`, `lf`, or a hex byte
/// such as `0x0a`.
pub fn parse_terminator(s: &str) -> Result<u8, LinkError> {
    match s {
        "cr" => Ok(CARRIAGE_RETURN),
        "lf" => Ok(LINE_FEED),
        other => other
            .strip_prefix("0x")
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .ok_or_else(|| LinkError::UnknownTerminator(other.to_string())),
    }
}

/// Observable phase of the echo cycle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Transmitter idle, no bytes queued.
    Idle,
    /// Bytes are accumulating; the reply has not started.
    Receiving,
    /// A reply is draining through the transmitter.
    Transmitting,
}

/// Session counters.
///
/// `overruns` counts receive bytes dropped on a full buffer; the drop itself
/// is silent on the wire because the link has no flow control.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EchoStats {
    pub bytes_received: u64,
    pub bytes_transmitted: u64,
    pub lines_echoed: u64,
    pub overruns: u64,
}

/// Line-echo state machine over an `N`-byte buffer.
pub struct EchoService<const N: usize> {
    line: LineBuffer<N>,
    ready: bool,
    last_received: u8,
    terminator: u8,
    fold: FoldPolicy,
    stats: EchoStats,
}

impl<const N: usize> EchoService<N> {
    /// Create an idle service with the default policy: carriage-return
    /// terminated lines echoed in uppercase.
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
            ready: true,
            last_received: 0,
            terminator: CARRIAGE_RETURN,
            fold: FoldPolicy::Upper,
            stats: EchoStats {
                bytes_received: 0,
                bytes_transmitted: 0,
                lines_echoed: 0,
                overruns: 0,
            },
        }
    }

    /// Replace the fold policy.
    pub fn with_fold(mut self, fold: FoldPolicy) -> Self {
        self.fold = fold;
        self
    }

    /// Replace the line terminator byte.
    pub fn with_terminator(mut self, terminator: u8) -> Self {
        self.terminator = terminator;
        self
    }

    /// Receive handler: called when a byte has been read out of the receive
    /// data register.
    ///
    /// Returns `false` when the buffer was full and the byte was dropped.
    pub fn on_byte_received(&mut self, byte: u8) -> bool {
        self.last_received = byte;
        if self.line.try_enqueue(byte) {
            self.stats.bytes_received += 1;
            true
        } else {
            self.stats.overruns += 1;
            log::warn!("line buffer full, dropping byte {byte:#04x}");
            false
        }
    }

    /// Transmit handler: called when the transmitter has finished the
    /// previous byte (or when a reply is being started).
    ///
    /// Returns the next byte to load into the transmit data register, already
    /// case-folded, or `None` once the buffer has drained. Draining sets
    /// `ready` so the completion poll can start the next line.
    pub fn on_transmit_complete(&mut self) -> Option<u8> {
        match self.line.try_dequeue() {
            Some(byte) => {
                let out = self.fold.apply(byte);
                self.stats.bytes_transmitted += 1;
                if self.line.is_empty() {
                    self.ready = true;
                    self.stats.lines_echoed += 1;
                    log::debug!("line drained, {} echoed so far", self.stats.lines_echoed);
                }
                Some(out)
            }
            None => {
                self.ready = true;
                None
            }
        }
    }

    /// Completion poll: true exactly when a terminated line is waiting and
    /// the transmitter is idle.
    ///
    /// On success `ready` is cleared and the caller must start the drain by
    /// raising the transmit-pending flag. Polling again while the condition
    /// is false, including with `ready` still set over an empty buffer, is a
    /// no-op.
    pub fn poll_completion(&mut self) -> bool {
        if self.ready && !self.line.is_empty() && self.last_received == self.terminator {
            self.ready = false;
            true
        } else {
            false
        }
    }

    /// Map a discrete event onto the matching handler.
    pub fn dispatch(&mut self, event: LinkEvent) -> Option<u8> {
        match event {
            LinkEvent::ByteReceived(byte) => {
                self.on_byte_received(byte);
                None
            }
            LinkEvent::TransmitComplete => self.on_transmit_complete(),
        }
    }

    /// Derived phase of the echo cycle.
    pub fn state(&self) -> LinkState {
        if !self.ready {
            LinkState::Transmitting
        } else if self.line.is_empty() {
            LinkState::Idle
        } else {
            LinkState::Receiving
        }
    }

    /// Drop any queued bytes and return to idle.
    pub fn reset(&mut self) {
        self.line.clear();
        self.ready = true;
        self.last_received = 0;
    }

    pub fn stats(&self) -> EchoStats {
        self.stats
    }

    pub fn terminator(&self) -> u8 {
        self.terminator
    }

    pub fn fold(&self) -> FoldPolicy {
        self.fold
    }

    /// Bytes currently queued.
    pub fn queued(&self) -> usize {
        self.line.len()
    }
}

impl<const N: usize> Default for EchoService<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EchoService<N> {
    /// Parse-and-build helper for hosts that take both policies as strings.
    pub fn from_names(fold: &str, terminator: &str) -> Result<Self, LinkError> {
        Ok(Self::new()
            .with_fold(FoldPolicy::from_str(fold)?)
            .with_terminator(parse_terminator(terminator)?))
    }
}
