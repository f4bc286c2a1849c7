use std::fmt;
use std::io;

use siyi::frame::FrameError;
use siyi::link::LinkError;
use siyi::message::MessageError;
use siyi::transport::TransportError;
use siyi::CameraError;

// Exit codes follow the sysexits-style table shared across our CLIs.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::AddrInUse
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::PermissionDenied => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn message_error(context: &str, err: MessageError) -> CliError {
    match err {
        MessageError::NoDecoder(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        MessageError::PayloadTooShort { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::Transport(err) => transport_error(context, err),
        LinkError::Frame(err) => frame_error(context, err),
        LinkError::Message(err) => message_error(context, err),
        LinkError::NotConnected => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
        LinkError::Spawn(source) => io_error(context, source),
        LinkError::Shutdown => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn camera_error(context: &str, err: CameraError) -> CliError {
    match err {
        CameraError::Link(err) => link_error(context, err),
        CameraError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        CameraError::UnsupportedMode(_) | CameraError::UndefinedMotionMode => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_connected_maps_to_transport_code() {
        let err = camera_error("send failed", CameraError::Link(LinkError::NotConnected));
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert_eq!(err.to_string(), "send failed: not connected to camera");
    }

    #[test]
    fn init_timeout_maps_to_124() {
        let err = camera_error(
            "camera did not respond",
            CameraError::Timeout(std::time::Duration::from_secs(3)),
        );
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn bad_frames_are_data_invalid() {
        let err = frame_error("decode failed", FrameError::TooShort { len: 3, min: 10 });
        assert_eq!(err.code, DATA_INVALID);
    }
}
