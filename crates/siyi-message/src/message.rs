//! Response values.
//!
//! One struct per response kind. Values are plain snapshots: every decode
//! produces a fresh value. Angles are carried as the raw fixed-point tenths
//! of a degree the camera sends, with `*_deg` accessors for floating point.

use serde::Serialize;
use siyi_frame::Command;

use crate::model::CameraModel;

fn tenths(raw: i16) -> f32 {
    f32::from(raw) / 10.0
}

/// Firmware versions of the three boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FirmwareVersion {
    pub board: u32,
    pub gimbal: u32,
    pub zoom: u32,
}

impl FirmwareVersion {
    /// Render a raw version word as `major.minor.patch`.
    ///
    /// The camera packs the version little-endian in the low three bytes;
    /// the top byte is ignored.
    pub fn format(raw: u32) -> String {
        let [patch, minor, major, _] = raw.to_le_bytes();
        format!("{major}.{minor}.{patch}")
    }
}

/// Hardware identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardwareId {
    /// Lower-case hex of the whole payload.
    pub hardware_id: String,
    /// Little-endian id from the first two payload bytes.
    pub model_id: u16,
}

impl HardwareId {
    /// The product the model id refers to.
    pub fn model(&self) -> CameraModel {
        CameraModel::from_model_id(self.model_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutoFocus {
    pub success: bool,
}

/// Zoom level reported after a manual zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManualZoom {
    /// Zoom factor in tenths.
    pub zoom_level: u16,
}

impl ManualZoom {
    pub fn zoom(&self) -> f32 {
        f32::from(self.zoom_level) / 10.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbsoluteZoom {
    pub ack: u8,
}

/// 1 success, 0 failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManualFocus {
    pub state: u8,
}

impl ManualFocus {
    pub fn succeeded(&self) -> bool {
        self.state == 1
    }
}

/// 1 success, 0 failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GimbalRotationAck {
    pub state: u8,
}

/// 1 success, 0 failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GimbalCenterAck {
    pub state: u8,
}

/// Outcome codes pushed on [`Command::FunctionFeedback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackState {
    PhotoOk,
    /// Usually a missing TF card.
    PhotoFailed,
    HdrOn,
    HdrOff,
    /// Usually a missing TF card.
    RecordingFailed,
    Other(u8),
}

impl FeedbackState {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => FeedbackState::PhotoOk,
            1 => FeedbackState::PhotoFailed,
            2 => FeedbackState::HdrOn,
            3 => FeedbackState::HdrOff,
            4 => FeedbackState::RecordingFailed,
            other => FeedbackState::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FunctionFeedback {
    pub state: FeedbackState,
}

/// Gimbal attitude and angular velocity, tenths of a degree (per second).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GimbalAttitude {
    pub pitch: i16,
    pub roll: i16,
    pub yaw: i16,
    pub pitch_velocity: i16,
    pub roll_velocity: i16,
    pub yaw_velocity: i16,
}

impl GimbalAttitude {
    pub fn yaw_deg(&self) -> f32 {
        tenths(self.yaw)
    }

    pub fn pitch_deg(&self) -> f32 {
        tenths(self.pitch)
    }

    pub fn roll_deg(&self) -> f32 {
        tenths(self.roll)
    }

    pub fn yaw_velocity_deg(&self) -> f32 {
        tenths(self.yaw_velocity)
    }

    pub fn pitch_velocity_deg(&self) -> f32 {
        tenths(self.pitch_velocity)
    }

    pub fn roll_velocity_deg(&self) -> f32 {
        tenths(self.roll_velocity)
    }
}

/// Angles echoed after an absolute angle command, tenths of a degree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GimbalControlAngle {
    pub pitch: i16,
    pub roll: i16,
    pub yaw: i16,
}

impl GimbalControlAngle {
    pub fn yaw_deg(&self) -> f32 {
        tenths(self.yaw)
    }

    pub fn pitch_deg(&self) -> f32 {
        tenths(self.pitch)
    }

    pub fn roll_deg(&self) -> f32 {
        tenths(self.roll)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingStatus {
    RecordingOn,
    RecordingOff,
    TfCardSlotEmpty,
    DataLoss,
    Undefined,
}

impl RecordingStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => RecordingStatus::RecordingOn,
            1 => RecordingStatus::RecordingOff,
            2 => RecordingStatus::TfCardSlotEmpty,
            3 => RecordingStatus::DataLoss,
            _ => RecordingStatus::Undefined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    Lock,
    Follow,
    Fpv,
    Undefined,
}

impl MotionMode {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => MotionMode::Lock,
            1 => MotionMode::Follow,
            2 => MotionMode::Fpv,
            _ => MotionMode::Undefined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mounting {
    Reserved,
    Normal,
    UpsideDown,
    Undefined,
}

impl Mounting {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Mounting::Reserved,
            1 => Mounting::Normal,
            2 => Mounting::UpsideDown,
            _ => Mounting::Undefined,
        }
    }
}

/// Camera and gimbal status from [`Command::AcquireGimbalInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CameraStatus {
    pub hdr_on: bool,
    pub recording: RecordingStatus,
    pub motion_mode: MotionMode,
    pub mounting: Mounting,
    /// True when HDMI output is on (and CVBS off).
    pub hdmi_output: bool,
}

/// Any decoded response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    FirmwareVersion(FirmwareVersion),
    HardwareId(HardwareId),
    AutoFocus(AutoFocus),
    ManualZoom(ManualZoom),
    AbsoluteZoom(AbsoluteZoom),
    ManualFocus(ManualFocus),
    GimbalRotationAck(GimbalRotationAck),
    GimbalCenterAck(GimbalCenterAck),
    FunctionFeedback(FunctionFeedback),
    GimbalAttitude(GimbalAttitude),
    GimbalControlAngle(GimbalControlAngle),
    CameraStatus(CameraStatus),
}

impl Response {
    /// The command id this response arrives on.
    pub fn command(&self) -> Command {
        match self {
            Response::FirmwareVersion(_) => Command::AcquireFirmwareVersion,
            Response::HardwareId(_) => Command::AcquireHardwareId,
            Response::AutoFocus(_) => Command::AutoFocus,
            Response::ManualZoom(_) => Command::ManualZoom,
            Response::AbsoluteZoom(_) => Command::AbsoluteZoom,
            Response::ManualFocus(_) => Command::ManualFocus,
            Response::GimbalRotationAck(_) => Command::GimbalRotation,
            Response::GimbalCenterAck(_) => Command::GimbalCenter,
            Response::FunctionFeedback(_) => Command::FunctionFeedback,
            Response::GimbalAttitude(_) => Command::AcquireGimbalAttitude,
            Response::GimbalControlAngle(_) => Command::GimbalControlAngle,
            Response::CameraStatus(_) => Command::AcquireGimbalInfo,
        }
    }

    /// One-line human summary for logs and the CLI.
    pub fn summary(&self) -> String {
        match self {
            Response::FirmwareVersion(v) => format!(
                "board={} gimbal={} zoom={}",
                FirmwareVersion::format(v.board),
                FirmwareVersion::format(v.gimbal),
                FirmwareVersion::format(v.zoom)
            ),
            Response::HardwareId(id) => {
                format!("hardware_id={} model={}", id.hardware_id, id.model())
            }
            Response::AutoFocus(af) => format!("success={}", af.success),
            Response::ManualZoom(z) => format!("zoom={:.1}x", z.zoom()),
            Response::AbsoluteZoom(z) => format!("ack={}", z.ack),
            Response::ManualFocus(f) => format!("state={}", f.state),
            Response::GimbalRotationAck(a) => format!("state={}", a.state),
            Response::GimbalCenterAck(a) => format!("state={}", a.state),
            Response::FunctionFeedback(fb) => format!("state={:?}", fb.state),
            Response::GimbalAttitude(a) => format!(
                "yaw={:.1} pitch={:.1} roll={:.1} yaw_vel={:.1} pitch_vel={:.1} roll_vel={:.1}",
                a.yaw_deg(),
                a.pitch_deg(),
                a.roll_deg(),
                a.yaw_velocity_deg(),
                a.pitch_velocity_deg(),
                a.roll_velocity_deg()
            ),
            Response::GimbalControlAngle(a) => format!(
                "yaw={:.1} pitch={:.1} roll={:.1}",
                a.yaw_deg(),
                a.pitch_deg(),
                a.roll_deg()
            ),
            Response::CameraStatus(s) => format!(
                "hdr_on={} recording={:?} motion={:?} mounting={:?} hdmi={}",
                s.hdr_on, s.recording, s.motion_mode, s.mounting, s.hdmi_output
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attitude_degrees_divide_by_ten() {
        let attitude = GimbalAttitude {
            pitch: 100,
            roll: -5,
            yaw: -1800,
            ..GimbalAttitude::default()
        };
        assert_eq!(attitude.pitch_deg(), 10.0);
        assert_eq!(attitude.roll_deg(), -0.5);
        assert_eq!(attitude.yaw_deg(), -180.0);
        assert_eq!(attitude.yaw_velocity_deg(), 0.0);
    }

    #[test]
    fn firmware_format_uses_low_three_bytes() {
        assert_eq!(FirmwareVersion::format(0x6E03_0203), "3.2.3");
        assert_eq!(FirmwareVersion::format(0), "0.0.0");
    }

    #[test]
    fn feedback_codes() {
        assert_eq!(FeedbackState::from_code(0), FeedbackState::PhotoOk);
        assert_eq!(FeedbackState::from_code(4), FeedbackState::RecordingFailed);
        assert_eq!(FeedbackState::from_code(9), FeedbackState::Other(9));
    }

    #[test]
    fn status_enums_fall_back_to_undefined() {
        assert_eq!(RecordingStatus::from_code(7), RecordingStatus::Undefined);
        assert_eq!(MotionMode::from_code(2), MotionMode::Fpv);
        assert_eq!(MotionMode::from_code(3), MotionMode::Undefined);
        assert_eq!(Mounting::from_code(2), Mounting::UpsideDown);
        assert_eq!(Mounting::from_code(200), Mounting::Undefined);
    }

    #[test]
    fn response_command_mapping() {
        let ack = Response::GimbalCenterAck(GimbalCenterAck { state: 1 });
        assert_eq!(ack.command(), Command::GimbalCenter);
        let status = Response::CameraStatus(CameraStatus {
            hdr_on: false,
            recording: RecordingStatus::RecordingOff,
            motion_mode: MotionMode::Follow,
            mounting: Mounting::Normal,
            hdmi_output: true,
        });
        assert_eq!(status.command(), Command::AcquireGimbalInfo);
    }

    #[test]
    fn response_serializes_with_type_tag() {
        let response = Response::ManualZoom(ManualZoom { zoom_level: 25 });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "manual_zoom");
        assert_eq!(json["zoom_level"], 25);
    }

    #[test]
    fn hardware_id_summary_names_model() {
        let response = Response::HardwareId(HardwareId {
            hardware_id: "7800".to_string(),
            model_id: 0x78,
        });
        assert_eq!(response.summary(), "hardware_id=7800 model=ZR30");
    }
}
