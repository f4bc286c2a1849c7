use siyi_frame::Command;

/// Errors that can occur while turning a payload into a typed response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// The frame parsed, but no decoder is registered for its command.
    #[error("no decoder registered for command {0}")]
    NoDecoder(Command),

    /// The payload ends before the decoder's fixed fields do.
    #[error("payload for {command} too short ({actual} bytes, need {needed})")]
    PayloadTooShort {
        command: Command,
        needed: usize,
        actual: usize,
    },
}

impl MessageError {
    /// True when the payload itself was bad, false when nothing could decode it.
    pub fn is_malformed(&self) -> bool {
        matches!(self, MessageError::PayloadTooShort { .. })
    }
}

pub type Result<T> = std::result::Result<T, MessageError>;
