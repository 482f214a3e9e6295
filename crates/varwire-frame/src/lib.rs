//! Unsigned-varint length-prefixed message framing.
//!
//! This is the core value-add layer of varwire. Every message is framed as:
//!
//! ```text
//! message := varint(length) body
//! varint  := byte+            -- 7 data bits + 1 continuation bit per byte,
//!                                least-significant chunk first
//! body    := length bytes of serialized payload
//! ```
//!
//! No magic number, no version byte. Reads are split into two
//! independently timed phases: waiting for the length prefix (a silent
//! peer is likely dead, short budget) and accumulating the body (large
//! messages legitimately take longer, longer budget).
//!
//! No partial reads, no buffer management in user code.

pub mod error;
pub mod exact;
pub mod framer;
pub mod json;
pub mod varint;

pub use error::{BoxError, FrameError, Result};
pub use exact::read_exactly;
pub use framer::{Framer, FramerConfig, Phase, WireMessage};
pub use json::Json;
pub use varint::{read_uvarint, write_uvarint, write_uvarint_signed, DEFAULT_MAX_BITS};

#[cfg(test)]
pub(crate) mod testutil;
