//! Connection
//!
//! One duplex byte stream to one cache node, with per-call deadlines.
//!
//! A connection lives for exactly one client operation: dial, write the
//! request, read the response, drop. There is no reconnection or keep-alive;
//! a connection that errors is discarded by the caller.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::{McError, Result};
use crate::protocol::{encode_request, Request};

/// A single connection to one cache node
pub struct Connection {
    /// TCP stream reader (buffered; the codec reads lines off this)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: SocketAddr,
}

impl Connection {
    /// Dial `addr` within `timeout` and apply the same deadline to reads
    /// and writes.
    pub fn connect(addr: SocketAddr, timeout: Duration) -> Result<Self> {
        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|e| {
            match e.kind() {
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                    McError::Timeout(format!("connect to {}: {}", addr, e))
                }
                _ => McError::Connection(format!("connect to {}: {}", addr, e)),
            }
        })?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        tracing::debug!("Connected to {}", addr);

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr: addr,
        })
    }

    /// Encode and send one request, flushing the write buffer
    pub fn send(&mut self, request: &Request) -> Result<()> {
        let bytes = encode_request(request);
        self.writer
            .write_all(&bytes)
            .and_then(|_| self.writer.flush())
            .map_err(|e| McError::from_io(e, &format!("write request to {}", self.peer_addr)))
    }

    /// Buffered reader handle for the codec's response decoders
    pub fn reader(&mut self) -> &mut impl BufRead {
        &mut self.reader
    }
}
