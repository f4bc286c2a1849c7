//! Typed requests and their payload encodings.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::command::Command;

/// Sub-codes multiplexed on [`Command::PhotoVideo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PhotoVideoAction {
    TakePhoto = 0,
    ToggleHdr = 1,
    ToggleRecording = 2,
    MotionLock = 3,
    MotionFollow = 4,
    MotionFpv = 5,
    VideoOutputHdmi = 6,
    VideoOutputCvbs = 7,
}

impl PhotoVideoAction {
    /// The payload byte for this action.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a payload byte back to an action.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::TakePhoto),
            1 => Some(Self::ToggleHdr),
            2 => Some(Self::ToggleRecording),
            3 => Some(Self::MotionLock),
            4 => Some(Self::MotionFollow),
            5 => Some(Self::MotionFpv),
            6 => Some(Self::VideoOutputHdmi),
            7 => Some(Self::VideoOutputCvbs),
            _ => None,
        }
    }
}

/// A request the host can send to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    AcquireFirmwareVersion,
    AcquireHardwareId,
    AutoFocus,
    /// -1 zoom out, 0 stop, 1 zoom in. Values outside are clamped.
    ManualZoom { direction: i8 },
    AbsoluteZoom { level: u8 },
    /// -1 far, 0 stop, 1 near. Values outside are clamped.
    ManualFocus { direction: i8 },
    /// Speeds in -100..=100; sign selects direction, 0 stops.
    GimbalRotation { yaw_speed: i8, pitch_speed: i8 },
    GimbalCenter,
    /// Target angles in tenths of a degree.
    GimbalControlAngle { yaw_tenths: i16, pitch_tenths: i16 },
    AcquireGimbalAttitude,
    PhotoVideo(PhotoVideoAction),
    AcquireGimbalInfo,
}

impl Request {
    /// Absolute gimbal target from angles in degrees.
    ///
    /// Angles are multiplied by 10 and truncated toward zero, saturating at
    /// the `i16` range.
    pub fn control_angle(yaw_deg: f32, pitch_deg: f32) -> Self {
        Request::GimbalControlAngle {
            yaw_tenths: (yaw_deg * 10.0) as i16,
            pitch_tenths: (pitch_deg * 10.0) as i16,
        }
    }

    /// Gimbal rotation from floating-point rates, truncated into `i8`.
    pub fn rotation(yaw_rate: f32, pitch_rate: f32) -> Self {
        Request::GimbalRotation {
            yaw_speed: yaw_rate as i8,
            pitch_speed: pitch_rate as i8,
        }
    }

    /// The command id this request is framed with.
    pub fn command(&self) -> Command {
        match self {
            Request::AcquireFirmwareVersion => Command::AcquireFirmwareVersion,
            Request::AcquireHardwareId => Command::AcquireHardwareId,
            Request::AutoFocus => Command::AutoFocus,
            Request::ManualZoom { .. } => Command::ManualZoom,
            Request::AbsoluteZoom { .. } => Command::AbsoluteZoom,
            Request::ManualFocus { .. } => Command::ManualFocus,
            Request::GimbalRotation { .. } => Command::GimbalRotation,
            Request::GimbalCenter => Command::GimbalCenter,
            Request::GimbalControlAngle { .. } => Command::GimbalControlAngle,
            Request::AcquireGimbalAttitude => Command::AcquireGimbalAttitude,
            Request::PhotoVideo(_) => Command::PhotoVideo,
            Request::AcquireGimbalInfo => Command::AcquireGimbalInfo,
        }
    }

    /// Append the request payload to `dst`.
    pub fn put_payload(&self, dst: &mut impl BufMut) {
        match *self {
            Request::AcquireFirmwareVersion
            | Request::AcquireHardwareId
            | Request::AcquireGimbalAttitude
            | Request::AcquireGimbalInfo => {}
            Request::AutoFocus | Request::GimbalCenter => dst.put_u8(1),
            Request::ManualZoom { direction } | Request::ManualFocus { direction } => {
                dst.put_i8(direction.clamp(-1, 1));
            }
            Request::AbsoluteZoom { level } => dst.put_u8(level),
            Request::GimbalRotation {
                yaw_speed,
                pitch_speed,
            } => {
                dst.put_i8(yaw_speed);
                dst.put_i8(pitch_speed);
            }
            Request::GimbalControlAngle {
                yaw_tenths,
                pitch_tenths,
            } => {
                dst.put_i16_le(yaw_tenths);
                dst.put_i16_le(pitch_tenths);
            }
            Request::PhotoVideo(action) => dst.put_u8(action.code()),
        }
    }

    /// The request payload as owned bytes.
    pub fn payload(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(4);
        self.put_payload(&mut buf);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_requests_have_empty_payloads() {
        for request in [
            Request::AcquireFirmwareVersion,
            Request::AcquireHardwareId,
            Request::AcquireGimbalAttitude,
            Request::AcquireGimbalInfo,
        ] {
            assert!(request.payload().is_empty(), "{request:?}");
        }
    }

    #[test]
    fn manual_zoom_and_focus_are_clamped() {
        assert_eq!(Request::ManualZoom { direction: 5 }.payload().as_ref(), &[0x01]);
        assert_eq!(
            Request::ManualZoom { direction: -128 }.payload().as_ref(),
            &[0xFF]
        );
        assert_eq!(Request::ManualZoom { direction: 0 }.payload().as_ref(), &[0x00]);
        assert_eq!(
            Request::ManualFocus { direction: 100 }.payload().as_ref(),
            &[0x01]
        );
        assert_eq!(
            Request::ManualFocus { direction: -2 }.payload().as_ref(),
            &[0xFF]
        );
    }

    #[test]
    fn absolute_zoom_is_one_unsigned_byte() {
        assert_eq!(Request::AbsoluteZoom { level: 200 }.payload().as_ref(), &[200]);
    }

    #[test]
    fn gimbal_center_sends_one() {
        assert_eq!(Request::GimbalCenter.payload().as_ref(), &[1]);
        assert_eq!(Request::GimbalCenter.command(), Command::GimbalCenter);
    }

    #[test]
    fn rotation_speeds_are_signed_bytes() {
        let request = Request::GimbalRotation {
            yaw_speed: -100,
            pitch_speed: 50,
        };
        assert_eq!(request.payload().as_ref(), &[0x9C, 0x32]);
    }

    #[test]
    fn rotation_from_rates_saturates() {
        assert_eq!(
            Request::rotation(500.0, -12.7),
            Request::GimbalRotation {
                yaw_speed: 127,
                pitch_speed: -12
            }
        );
    }

    #[test]
    fn control_angle_is_tenths_little_endian() {
        let request = Request::control_angle(12.34, -9.0);
        assert_eq!(
            request,
            Request::GimbalControlAngle {
                yaw_tenths: 123,
                pitch_tenths: -90
            }
        );
        assert_eq!(request.payload().as_ref(), &[0x7B, 0x00, 0xA6, 0xFF]);
    }

    #[test]
    fn control_angle_saturates_at_i16() {
        assert_eq!(
            Request::control_angle(1.0e6, -1.0e6),
            Request::GimbalControlAngle {
                yaw_tenths: i16::MAX,
                pitch_tenths: i16::MIN
            }
        );
    }

    #[test]
    fn photo_video_sub_codes() {
        let expected = [
            (PhotoVideoAction::TakePhoto, 0),
            (PhotoVideoAction::ToggleHdr, 1),
            (PhotoVideoAction::ToggleRecording, 2),
            (PhotoVideoAction::MotionLock, 3),
            (PhotoVideoAction::MotionFollow, 4),
            (PhotoVideoAction::MotionFpv, 5),
            (PhotoVideoAction::VideoOutputHdmi, 6),
            (PhotoVideoAction::VideoOutputCvbs, 7),
        ];
        for (action, code) in expected {
            let request = Request::PhotoVideo(action);
            assert_eq!(request.command(), Command::PhotoVideo);
            assert_eq!(request.payload().as_ref(), &[code]);
            assert_eq!(PhotoVideoAction::from_code(code), Some(action));
        }
        assert_eq!(PhotoVideoAction::from_code(8), None);
    }
}
