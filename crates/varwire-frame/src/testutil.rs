//! In-memory stream doubles shared by the unit tests.

use std::io::{self, ErrorKind};
use std::time::Duration;

use varwire_transport::ByteStream;

/// A scripted in-memory [`ByteStream`].
///
/// Serves a fixed byte sequence to `receive`, optionally in bounded
/// chunks, and records everything sent plus every receive request size.
pub struct MemoryStream {
    input: Vec<u8>,
    pos: usize,
    written: Vec<u8>,
    requests: Vec<usize>,
    chunk: Option<usize>,
    interrupt_next: bool,
    last_timeout: Option<Duration>,
    timeout_calls: usize,
}

impl MemoryStream {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.to_vec(),
            pos: 0,
            written: Vec::new(),
            requests: Vec::new(),
            chunk: None,
            interrupt_next: false,
            last_timeout: None,
            timeout_calls: 0,
        }
    }

    /// Deliver at most `n` bytes per receive, regardless of request size.
    pub fn chunked(mut self, n: usize) -> Self {
        self.chunk = Some(n);
        self
    }

    /// Fail the next receive with `Interrupted`, then behave normally.
    pub fn interrupt_first(mut self) -> Self {
        self.interrupt_next = true;
        self
    }

    /// Everything sent on this stream, in order.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// The `buf.len()` of every receive call, in order.
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }

    /// The receive bound most recently armed, if any.
    pub fn last_timeout(&self) -> Option<Duration> {
        self.last_timeout
    }

    /// How many times the receive bound was updated.
    pub fn timeout_calls(&self) -> usize {
        self.timeout_calls
    }
}

impl ByteStream for MemoryStream {
    fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(buf);
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.requests.push(buf.len());
        if self.interrupt_next {
            self.interrupt_next = false;
            return Err(io::Error::from(ErrorKind::Interrupted));
        }
        if self.pos >= self.input.len() {
            return Ok(0);
        }
        let available = self.input.len() - self.pos;
        let n = buf
            .len()
            .min(available)
            .min(self.chunk.unwrap_or(usize::MAX));
        buf[..n].copy_from_slice(&self.input[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn set_receive_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.last_timeout = timeout;
        self.timeout_calls += 1;
        Ok(())
    }
}

/// A stream that serves its ready bytes, then reports an expired receive
/// bound forever — a peer that went silent mid-conversation.
pub struct StallingStream {
    ready: Vec<u8>,
    pos: usize,
}

impl StallingStream {
    pub fn new(ready: &[u8]) -> Self {
        Self {
            ready: ready.to_vec(),
            pos: 0,
        }
    }
}

impl ByteStream for StallingStream {
    fn send(&mut self, _buf: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.ready.len() {
            return Err(io::Error::from(ErrorKind::TimedOut));
        }
        let available = self.ready.len() - self.pos;
        let n = buf.len().min(available);
        buf[..n].copy_from_slice(&self.ready[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn set_receive_timeout(&mut self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }
}
