/// Errors that can occur while decoding an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The datagram is shorter than the smallest possible frame.
    #[error("frame too short ({len} bytes, min {min})")]
    TooShort { len: usize, min: usize },

    /// The declared payload length overruns the datagram.
    #[error("declared payload length {declared} inconsistent with {len}-byte frame")]
    LengthMismatch { declared: u16, len: usize },

    /// The trailing CRC16 does not match the frame contents.
    #[error("checksum mismatch (received 0x{received:04x}, computed 0x{computed:04x})")]
    ChecksumMismatch { received: u16, computed: u16 },
}

impl FrameError {
    /// True for structural failures, false for integrity failures.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            FrameError::TooShort { .. } | FrameError::LengthMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
