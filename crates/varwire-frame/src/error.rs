use std::io::ErrorKind;

use crate::framer::Phase;

/// A payload-layer serialization error, owned by the protocol layer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while framing or unframing messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A negative integer was handed to the varint encoder. Caller bug.
    #[error("negative integer: {value}")]
    NegativeValue { value: i128 },

    /// The integer does not fit the configured bit width. Caller bug.
    #[error("integer too large: {value} (max {max_bits} bits)")]
    ValueTooLarge { value: u128, max_bits: u32 },

    /// A decoded varint exceeded the configured bit width. The stream is
    /// corrupt or hostile and must be abandoned.
    #[error("varint overflowed {max_bits} bits")]
    VarintOverflow { max_bits: u32 },

    /// The peer closed the stream before the expected byte count arrived.
    #[error("expected {expected} bytes, received {received} before end of stream")]
    IncompleteStream { expected: usize, received: usize },

    /// A read phase exceeded its deadline. The stream position is
    /// indeterminate and the stream must be abandoned.
    #[error("timed out waiting for message {phase}")]
    Timeout { phase: Phase },

    /// The payload failed to serialize. No bytes were written.
    #[error("payload failed to serialize: {0}")]
    Encode(#[source] BoxError),

    /// Well-framed bytes failed to deserialize. Framing itself succeeded,
    /// so the stream may remain usable.
    #[error("payload failed to deserialize: {0}")]
    Decode(#[source] BoxError),

    /// An I/O error occurred on the underlying stream.
    #[error("framing I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Attribute an expired receive bound to the read phase it interrupted.
    pub(crate) fn into_phase(self, phase: Phase) -> FrameError {
        match self {
            FrameError::Io(err)
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                FrameError::Timeout { phase }
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
