//! Error types for crosstalk-core.

use thiserror::Error;

/// Error type for channel operations.
///
/// None of these are fatal. `QueueFull` is the ordinary "message dropped"
/// outcome and carries no heap data so it can be produced on the audio thread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Queue full, message dropped")]
    QueueFull,

    #[error("Payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Unknown message kind: {0}")]
    UnknownKind(u8),

    #[error("Corrupt envelope: payload length {0} exceeds slot size")]
    CorruptEnvelope(usize),

    #[error("Invalid MIDI data: status {status:#04x}, data {data1}, {data2}")]
    InvalidMidi { status: u8, data1: u8, data2: u8 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for the non-fatal "queue was full" outcome.
    #[inline]
    pub fn is_drop(&self) -> bool {
        matches!(self, Error::QueueFull)
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
