//! Control SIYI pan-tilt camera gimbals over UDP.
//!
//! The protocol is split into layers, each its own crate and re-exported
//! here:
//!
//! - [`transport`]: The UDP endpoint
//! - [`frame`]: Wire framing, CRC16, sequence numbers and typed requests
//! - [`message`]: Typed responses and the decoder registry
//! - [`link`]: The worker that owns the socket and dispatches responses
//!   (behind the `camera` feature)
//! - [`camera`]: A polling facade that caches the latest camera state
//!   (behind the `camera` feature)

/// Re-export transport types.
pub mod transport {
    pub use siyi_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use siyi_frame::*;
}

/// Re-export message types.
pub mod message {
    pub use siyi_message::*;
}

/// Re-export link types (requires `camera` feature).
#[cfg(feature = "camera")]
pub mod link {
    pub use siyi_link::*;
}

#[cfg(feature = "camera")]
pub mod camera;

#[cfg(feature = "camera")]
pub use camera::{Camera, CameraConfig, CameraError, CameraSnapshot};
