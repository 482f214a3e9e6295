use std::io;
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::stream::ByteStream;

/// Direction of bytes crossing a tapped stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Send,
    Receive,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Send => f.write_str("send"),
            Direction::Receive => f.write_str("receive"),
        }
    }
}

/// Hook invoked after each primitive stream operation.
pub type TapFn = dyn Fn(Direction, &[u8]) + Send + Sync;

/// A [`ByteStream`] decorator that observes raw bytes.
///
/// Fine-grained byte logging lives here, not inside the codec: wrap a
/// stream once and every primitive send/receive is reported to the hook
/// after it completes.
pub struct Tapped<S> {
    inner: S,
    tap: Arc<TapFn>,
}

impl<S> Tapped<S> {
    /// Wrap `inner`, reporting each operation to `tap`.
    pub fn new(inner: S, tap: Arc<TapFn>) -> Self {
        Self { inner, tap }
    }

    /// Wrap `inner` with a hook that logs hex dumps at `trace` level.
    pub fn traced(inner: S) -> Self {
        Self::new(
            inner,
            Arc::new(|direction, bytes| {
                trace!(%direction, len = bytes.len(), data = %hex(bytes), "wire bytes");
            }),
        )
    }

    /// Consume the decorator and return the inner stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteStream> ByteStream for Tapped<S> {
    fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.send(buf)?;
        (self.tap)(Direction::Send, buf);
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.receive(buf)?;
        (self.tap)(Direction::Receive, &buf[..n]);
        Ok(n)
    }

    fn set_receive_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.inner.set_receive_timeout(timeout)
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}
