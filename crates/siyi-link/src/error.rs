/// Errors that can occur in link operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] siyi_transport::TransportError),

    /// The datagram did not parse as a frame.
    #[error("frame error: {0}")]
    Frame(#[from] siyi_frame::FrameError),

    /// The frame parsed but its payload did not decode.
    #[error("message error: {0}")]
    Message(#[from] siyi_message::MessageError),

    /// The endpoint failed to bind; nothing can be sent until a rebind succeeds.
    #[error("not connected to camera")]
    NotConnected,

    /// The worker has stopped.
    #[error("link worker has shut down")]
    Shutdown,

    /// The worker thread or its runtime could not be started.
    #[error("failed to start link worker: {0}")]
    Spawn(std::io::Error),
}

impl LinkError {
    /// True when the error concerns one bad datagram and later traffic is unaffected.
    pub fn is_datagram_error(&self) -> bool {
        matches!(self, LinkError::Frame(_) | LinkError::Message(_))
    }
}

pub type Result<T> = std::result::Result<T, LinkError>;
