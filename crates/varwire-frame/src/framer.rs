use std::fmt;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::trace;
use varwire_transport::ByteStream;

use crate::error::{BoxError, FrameError, Result};
use crate::exact::read_exactly;
use crate::varint::{read_uvarint, write_uvarint, DEFAULT_MAX_BITS};

/// Which timed step of a receive was in flight when a deadline expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for, or decoding, the varint length prefix.
    Length,
    /// Accumulating the message body.
    Body,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Length => f.write_str("length"),
            Phase::Body => f.write_str("body"),
        }
    }
}

/// A structured payload the protocol layer can put on the wire.
///
/// The framer treats payloads as bytes in, bytes out; the schema belongs
/// entirely to the implementor. Both directions may fail: serialization
/// when required structure is absent, parsing on malformed bytes.
pub trait WireMessage: Sized {
    /// Serialize to the exact bytes of one frame body.
    fn to_wire(&self) -> std::result::Result<Bytes, BoxError>;

    /// Parse from the exact bytes of one frame body.
    fn from_wire(bytes: &[u8]) -> std::result::Result<Self, BoxError>;
}

/// Configuration for the message framer.
#[derive(Debug, Clone)]
pub struct FramerConfig {
    /// Bit width enforced on length prefixes. Default: 64.
    pub max_bits: u32,
    /// Budget for the length phase of a read. A peer silent before the
    /// first length byte is likely stalled or dead, so this is the shorter
    /// budget. `None` waits forever. Default: 1 s.
    pub length_timeout: Option<Duration>,
    /// Budget for the body phase of a read. Large messages legitimately
    /// take longer to arrive, so this runs independently of the length
    /// budget. `None` waits forever. Default: 2 s.
    pub body_timeout: Option<Duration>,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_bits: DEFAULT_MAX_BITS,
            length_timeout: Some(Duration::from_secs(1)),
            body_timeout: Some(Duration::from_secs(2)),
        }
    }
}

/// Writes and reads length-prefixed messages over a [`ByteStream`].
///
/// Holds configuration only; the stream is handed in per call, and no
/// state persists between calls. The framer takes no locks — one active
/// reader and one active writer per stream is the caller's contract, and
/// both operations consume the stream monotonically.
///
/// After any [`FrameError::Timeout`], [`FrameError::VarintOverflow`], or
/// [`FrameError::IncompleteStream`] the stream position is indeterminate
/// and the stream must be abandoned; there is no resynchronization.
#[derive(Debug, Clone, Default)]
pub struct Framer {
    config: FramerConfig,
}

impl Framer {
    /// Create a framer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a framer with explicit configuration.
    pub fn with_config(config: FramerConfig) -> Self {
        Self { config }
    }

    /// Current framer configuration.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    /// Write one raw message body, varint length prefix first.
    ///
    /// The prefix and the body are two independent sends. If the body send
    /// fails after the prefix went out, the stream is torn and must be
    /// abandoned by the caller; a byte stream offers no rollback.
    pub fn write_bytes<S>(&self, stream: &mut S, body: &[u8]) -> Result<()>
    where
        S: ByteStream + ?Sized,
    {
        write_uvarint(stream, body.len() as u128, self.config.max_bits)?;
        stream.send(body)?;
        trace!(len = body.len(), "frame written");
        Ok(())
    }

    /// Serialize `msg` and write it as one framed message.
    ///
    /// Serialization happens before any bytes go out, so a payload that
    /// fails to serialize leaves the stream untouched. The failure is
    /// surfaced as [`FrameError::Encode`], never reinterpreted.
    pub fn write<S, M>(&self, stream: &mut S, msg: &M) -> Result<()>
    where
        S: ByteStream + ?Sized,
        M: WireMessage,
    {
        let body = msg.to_wire().map_err(FrameError::Encode)?;
        self.write_bytes(stream, &body)
    }

    /// Read one raw message body.
    ///
    /// The length prefix is decoded under the length budget, then exactly
    /// that many body bytes are accumulated under the independent body
    /// budget. Expiry surfaces as [`FrameError::Timeout`] naming the phase
    /// that was in flight.
    pub fn read_bytes<S>(&self, stream: &mut S) -> Result<Bytes>
    where
        S: ByteStream + ?Sized,
    {
        let deadline = self.config.length_timeout.map(|budget| Instant::now() + budget);
        let length = read_uvarint(stream, self.config.max_bits, deadline)
            .map_err(|err| err.into_phase(Phase::Length))?;
        let length = usize::try_from(length).map_err(|_| FrameError::VarintOverflow {
            max_bits: self.config.max_bits,
        })?;

        let deadline = self.config.body_timeout.map(|budget| Instant::now() + budget);
        // The length phase may have armed a receive bound; a body phase
        // with no budget waits forever, so disarm it before reading.
        if deadline.is_none() && self.config.length_timeout.is_some() {
            stream.set_receive_timeout(None)?;
        }
        let body = read_exactly(stream, length, deadline)
            .map_err(|err| err.into_phase(Phase::Body))?;

        // Leave the stream unbounded between messages.
        if self.config.length_timeout.is_some() || self.config.body_timeout.is_some() {
            stream.set_receive_timeout(None)?;
        }

        trace!(len = length, "frame read");
        Ok(body)
    }

    /// Read one framed message and parse it.
    ///
    /// Malformed payload bytes on an otherwise well-framed message surface
    /// as [`FrameError::Decode`]; framing itself succeeded, so the stream
    /// may remain usable.
    pub fn read<S, M>(&self, stream: &mut S) -> Result<M>
    where
        S: ByteStream + ?Sized,
        M: WireMessage,
    {
        let body = self.read_bytes(stream)?;
        M::from_wire(&body).map_err(FrameError::Decode)
    }
}
