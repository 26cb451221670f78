//! Byte transport to a hub.
//!
//! The hub's control protocol has no framing: one read is one record, and
//! the only way to know a wedged hub has finished talking is a read timing
//! out. [`Transport`] captures exactly those three operations so the
//! protocol logic can run against a real socket or a scripted hub.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use qsync_protocol::bytes_to_hex;
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::{QsyncError, Result};

/// A connection to one hub, closed when dropped.
pub trait Transport {
    /// Write one request.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Perform exactly one read and return what it produced.
    ///
    /// A timeout or a closed connection is a [`QsyncError::Connection`].
    fn recv(&mut self) -> Result<Vec<u8>>;

    /// Discard incoming data until no read completes within `quiet`, or the
    /// hub closes the connection. Returns the number of bytes discarded.
    fn drain(&mut self, quiet: Duration) -> Result<usize>;
}

/// Opens transports to hubs.
pub trait Connector {
    /// Transport produced by this connector.
    type Transport: Transport;

    /// Open a fresh connection to `host`.
    fn connect(&self, host: &str) -> Result<Self::Transport>;
}

/// Connects to a hub's TCP control port.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    port: u16,
    timeout: Duration,
    read_buffer_size: usize,
}

impl TcpConnector {
    /// Create a connector using the port, timeout and buffer size in `config`.
    pub fn new(config: &ClientConfig) -> Self {
        TcpConnector {
            port: config.tcp_port,
            timeout: config.timeout(),
            read_buffer_size: config.read_buffer_size,
        }
    }

    fn connect_any(&self, host: &str) -> io::Result<(TcpStream, SocketAddr)> {
        let mut last_err = None;
        for addr in (host, self.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok((stream, addr)),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
        }))
    }
}

impl Connector for TcpConnector {
    type Transport = TcpTransport;

    fn connect(&self, host: &str) -> Result<TcpTransport> {
        debug!("Qsync: connect host [{}], port [{}]", host, self.port);

        let context = || {
            format!(
                "could not connect to qsync host [{}], port [{}]",
                host, self.port
            )
        };

        let (stream, peer) = self
            .connect_any(host)
            .map_err(|e| QsyncError::connection(context(), e))?;
        stream
            .set_read_timeout(Some(self.timeout))
            .and_then(|_| stream.set_write_timeout(Some(self.timeout)))
            .and_then(|_| stream.set_nodelay(true))
            .map_err(|e| QsyncError::connection(context(), e))?;

        Ok(TcpTransport {
            stream,
            peer,
            timeout: self.timeout,
            buffer: vec![0u8; self.read_buffer_size],
        })
    }
}

/// A TCP connection to a hub's control port.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
    peer: SocketAddr,
    timeout: Duration,
    buffer: Vec<u8>,
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

impl Transport for TcpTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.stream
            .write_all(data)
            .map_err(|e| QsyncError::connection(format!("send to qsync [{}] failed", self.peer), e))
    }

    fn recv(&mut self) -> Result<Vec<u8>> {
        match self.stream.read(&mut self.buffer) {
            Ok(0) => Err(QsyncError::connection(
                format!("qsync [{}] closed the connection", self.peer),
                io::Error::from(io::ErrorKind::UnexpectedEof),
            )),
            Ok(n) => Ok(self.buffer[..n].to_vec()),
            Err(e) if is_timeout(&e) => Err(QsyncError::connection(
                format!("timed out waiting for qsync [{}]", self.peer),
                e,
            )),
            Err(e) => Err(QsyncError::connection(
                format!("receive from qsync [{}] failed", self.peer),
                e,
            )),
        }
    }

    fn drain(&mut self, quiet: Duration) -> Result<usize> {
        let context = || format!("draining qsync [{}] failed", self.peer);
        self.stream
            .set_read_timeout(Some(quiet))
            .map_err(|e| QsyncError::connection(context(), e))?;

        let mut discarded = 0;
        let outcome = loop {
            match self.stream.read(&mut self.buffer) {
                Ok(0) => break Ok(()),
                Ok(n) => {
                    trace!("Qsync: clear socket [{}]", bytes_to_hex(&self.buffer[..n]));
                    discarded += n;
                }
                // The only way to know the hub is done
                Err(e) if is_timeout(&e) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        outcome.map_err(|e| QsyncError::connection(context(), e))?;

        self.stream
            .set_read_timeout(Some(self.timeout))
            .map_err(|e| QsyncError::connection(context(), e))?;
        Ok(discarded)
    }
}
