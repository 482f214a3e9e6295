//! Socket transport layer for varint message framing.
//!
//! Provides the [`ByteStream`] capability the framing core is written
//! against, plus concrete stream types over the two local transports a
//! daemon control socket typically uses:
//! - Unix domain sockets
//! - Loopback TCP
//!
//! This is the lowest layer of varwire. Everything else builds on top of
//! the [`ByteStream`] trait provided here.

pub mod error;
pub mod stream;
pub mod tap;
pub mod tcp;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use stream::{ByteStream, SocketStream};
pub use tap::{Direction, Tapped};
pub use tcp::{unused_tcp_port, TcpEndpoint};

#[cfg(unix)]
pub use uds::UdsEndpoint;
