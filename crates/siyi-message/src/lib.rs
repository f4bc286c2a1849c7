//! Typed responses for the SIYI gimbal protocol.
//!
//! After a frame passes the codec, its command id selects a decode function
//! from the [`DecoderRegistry`], which turns the raw payload into a
//! [`Response`] value. Each decoder reads fixed little-endian fields at fixed
//! offsets; a payload shorter than the decoder needs is an error for that
//! frame, never a panic.

pub mod decode;
pub mod error;
pub mod message;
pub mod model;
pub mod registry;

pub use decode::DecodeFn;
pub use error::{MessageError, Result};
pub use message::{
    AbsoluteZoom, AutoFocus, CameraStatus, FeedbackState, FirmwareVersion, FunctionFeedback,
    GimbalAttitude, GimbalCenterAck, GimbalControlAngle, GimbalRotationAck, HardwareId,
    ManualFocus, ManualZoom, MotionMode, Mounting, RecordingStatus, Response,
};
pub use model::CameraModel;
pub use registry::DecoderRegistry;
