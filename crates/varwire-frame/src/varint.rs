use std::time::Instant;

use varwire_transport::ByteStream;

use crate::error::{FrameError, Result};
use crate::exact::read_exactly;

/// Default bit width for protocol-level integers.
///
/// The width is always an explicit parameter; 64 is merely what the wire
/// protocol uses for message lengths.
pub const DEFAULT_MAX_BITS: u32 = 64;

/// Encode `value` as an unsigned varint and send it on `stream`.
///
/// Emits the unique minimal LEB128 encoding: 7 value bits per byte,
/// least-significant chunk first, bit 7 set on every byte except the last.
/// Each byte is sent as it is produced, so a tap on the stream observes
/// the encoding incrementally.
///
/// Fails with [`FrameError::ValueTooLarge`] when `value >= 2^max_bits`.
pub fn write_uvarint<S>(stream: &mut S, value: u128, max_bits: u32) -> Result<()>
where
    S: ByteStream + ?Sized,
{
    if max_bits < 128 && value >= 1u128 << max_bits {
        return Err(FrameError::ValueTooLarge { value, max_bits });
    }
    let mut rest = value;
    loop {
        let mut byte = (rest & 0x7f) as u8;
        rest >>= 7;
        if rest != 0 {
            byte |= 0x80;
        }
        stream.send(&[byte])?;
        if rest == 0 {
            return Ok(());
        }
    }
}

/// Encode a possibly-signed count as an unsigned varint.
///
/// The entry point for callers whose arithmetic can go negative; fails
/// with [`FrameError::NegativeValue`] rather than wrapping.
pub fn write_uvarint_signed<S>(stream: &mut S, value: i128, max_bits: u32) -> Result<()>
where
    S: ByteStream + ?Sized,
{
    if value < 0 {
        return Err(FrameError::NegativeValue { value });
    }
    write_uvarint(stream, value as u128, max_bits)
}

/// Decode an unsigned varint from `stream`, one byte at a time.
///
/// Overflow is checked after every byte is folded in, before the
/// continuation bit is inspected, so a corrupt or hostile encoding is
/// rejected after bounded consumption and without unbounded allocation.
///
/// Fails with [`FrameError::VarintOverflow`] when the accumulated value
/// reaches `2^max_bits`, and with [`FrameError::IncompleteStream`] when
/// the stream ends mid-sequence.
pub fn read_uvarint<S>(stream: &mut S, max_bits: u32, deadline: Option<Instant>) -> Result<u128>
where
    S: ByteStream + ?Sized,
{
    let mut result: u128 = 0;
    let mut shift: u32 = 0;
    loop {
        let byte = read_exactly(stream, 1, deadline)?[0];
        let chunk = u128::from(byte & 0x7f);

        if shift >= 128 {
            return Err(FrameError::VarintOverflow { max_bits });
        }
        let shifted = chunk << shift;
        if shifted >> shift != chunk {
            return Err(FrameError::VarintOverflow { max_bits });
        }
        result |= shifted;
        shift += 7;

        if max_bits < 128 && result >= 1u128 << max_bits {
            return Err(FrameError::VarintOverflow { max_bits });
        }

        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
}
