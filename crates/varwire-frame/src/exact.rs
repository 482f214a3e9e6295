use std::io::{self, ErrorKind};
use std::time::Instant;

use bytes::{Bytes, BytesMut};
use varwire_transport::ByteStream;

use crate::error::{FrameError, Result};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Read exactly `n` bytes from `stream`.
///
/// A [`ByteStream`] receive may return fewer bytes than requested, so this
/// loops until the full count has accumulated. Fails with
/// [`FrameError::IncompleteStream`] (carrying the count actually received)
/// the instant a receive returns zero bytes with a shortfall outstanding —
/// the only signal that a peer closed mid-message.
///
/// When `deadline` is set, the stream's receive bound is re-armed with the
/// remaining budget before every receive; expiry surfaces as a `TimedOut`
/// I/O error for the caller to attribute to its phase.
pub fn read_exactly<S>(stream: &mut S, n: usize, deadline: Option<Instant>) -> Result<Bytes>
where
    S: ByteStream + ?Sized,
{
    let mut buf = BytesMut::with_capacity(n.min(READ_CHUNK_SIZE));
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    while buf.len() < n {
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(FrameError::Io(io::Error::from(ErrorKind::TimedOut)));
            }
            stream.set_receive_timeout(Some(remaining))?;
        }

        // Never request more than the shortfall: the stream has no notion
        // of message boundaries, and surplus bytes would belong to the
        // next frame.
        let want = (n - buf.len()).min(READ_CHUNK_SIZE);
        let read = match stream.receive(&mut chunk[..want]) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        };

        if read == 0 {
            return Err(FrameError::IncompleteStream {
                expected: n,
                received: buf.len(),
            });
        }

        buf.extend_from_slice(&chunk[..read]);
    }

    Ok(buf.freeze())
}
