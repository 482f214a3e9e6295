use std::io::{self, Read, Write};
use std::net::TcpStream;
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::time::Duration;

use crate::error::Result;

/// An ordered, reliable byte channel that may return short reads.
///
/// This is the capability the framing layer is written against. Whether a
/// stream supports bounded reads is decided here, at the type level, rather
/// than probed at runtime on each call.
pub trait ByteStream {
    /// Send the whole buffer.
    ///
    /// Short writes are retried internally; a stream that refuses to accept
    /// any bytes surfaces an error. The buffer is never truncated.
    fn send(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Receive at most `buf.len()` bytes into `buf`.
    ///
    /// Returns the number of bytes received. Returns `0` only at true
    /// end-of-stream.
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Bound how long subsequent `receive` calls may block.
    ///
    /// `None` blocks indefinitely. An expired bound surfaces from `receive`
    /// as a `WouldBlock` or `TimedOut` I/O error.
    fn set_receive_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

/// A connected socket stream — the concrete [`ByteStream`] over OS sockets.
///
/// Wraps either a Unix domain socket stream or a TCP stream, the two
/// transports a local control socket is reachable over.
pub struct SocketStream {
    inner: SocketStreamInner,
}

enum SocketStreamInner {
    #[cfg(unix)]
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl ByteStream for SocketStream {
    fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        match &mut self.inner {
            #[cfg(unix)]
            SocketStreamInner::Unix(stream) => stream.write_all(buf),
            SocketStreamInner::Tcp(stream) => stream.write_all(buf),
        }
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            SocketStreamInner::Unix(stream) => stream.read(buf),
            SocketStreamInner::Tcp(stream) => stream.read(buf),
        }
    }

    fn set_receive_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        match &self.inner {
            #[cfg(unix)]
            SocketStreamInner::Unix(stream) => stream.set_read_timeout(timeout),
            SocketStreamInner::Tcp(stream) => stream.set_read_timeout(timeout),
        }
    }
}

impl SocketStream {
    /// Try to clone this stream (creates a new file descriptor).
    ///
    /// A full-duplex caller clones once and hands one handle to its reader
    /// and one to its writer.
    pub fn try_clone(&self) -> Result<Self> {
        let inner = match &self.inner {
            #[cfg(unix)]
            SocketStreamInner::Unix(stream) => SocketStreamInner::Unix(stream.try_clone()?),
            SocketStreamInner::Tcp(stream) => SocketStreamInner::Tcp(stream.try_clone()?),
        };
        Ok(Self { inner })
    }

    /// Shut down both directions of the underlying socket.
    pub fn shutdown(&self) -> io::Result<()> {
        match &self.inner {
            #[cfg(unix)]
            SocketStreamInner::Unix(stream) => stream.shutdown(std::net::Shutdown::Both),
            SocketStreamInner::Tcp(stream) => stream.shutdown(std::net::Shutdown::Both),
        }
    }
}

#[cfg(unix)]
impl From<UnixStream> for SocketStream {
    fn from(stream: UnixStream) -> Self {
        Self {
            inner: SocketStreamInner::Unix(stream),
        }
    }
}

impl From<TcpStream> for SocketStream {
    fn from(stream: TcpStream) -> Self {
        Self {
            inner: SocketStreamInner::Tcp(stream),
        }
    }
}

impl std::fmt::Debug for SocketStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.inner {
            #[cfg(unix)]
            SocketStreamInner::Unix(_) => "unix",
            SocketStreamInner::Tcp(_) => "tcp",
        };
        f.debug_struct("SocketStream").field("type", &kind).finish()
    }
}
