//! Error types for the echo link.

use thiserror::Error;

/// Errors surfaced by configuration parsing.
///
/// A receive overrun is deliberately not represented here: the physical link
/// has no flow control, so an overflowing byte is dropped and counted in
/// [`EchoStats`](crate::service::EchoStats) instead of failing the handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("unknown fold policy `{0}`, expected upper, lower, swap or preserve")]
    UnknownFoldPolicy(String),
    #[error("unknown line terminator `{0}`, expected cr, lf or a hex byte like 0x0a")]
    UnknownTerminator(String),
}
