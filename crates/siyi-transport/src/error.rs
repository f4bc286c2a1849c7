use std::net::SocketAddr;

/// Errors that can occur in UDP transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind the local endpoint.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// The kernel rejected a datagram addressed to the peer.
    #[error("failed to send to {addr}: {source}")]
    Send {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Receiving a pending datagram failed.
    #[error("failed to receive datagram: {0}")]
    Receive(std::io::Error),

    /// The datagram was only partially written.
    #[error("short datagram write ({written} of {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },

    /// An I/O error occurred on the socket.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No socket is bound.
    #[error("transport not connected")]
    NotConnected,
}

impl TransportError {
    /// The underlying I/O error kind, if this error wraps one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            TransportError::Bind { source, .. } | TransportError::Send { source, .. } => {
                Some(source.kind())
            }
            TransportError::Receive(err) | TransportError::Io(err) => Some(err.kind()),
            TransportError::ShortWrite { .. } | TransportError::NotConnected => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
