//! Command identifiers.
//!
//! One byte on the wire selects the operation a frame carries. Requests and
//! their responses share the same id. Bytes the camera sends that are not in
//! this table decode to [`Command::Unknown`] instead of failing.

use serde::Serialize;

/// Protocol operation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Command {
    /// Any byte not listed below.
    Unknown = 0x00,
    /// Board, gimbal and zoom firmware versions.
    AcquireFirmwareVersion = 0x01,
    /// Hardware id string and model id.
    AcquireHardwareId = 0x02,
    /// Trigger a single auto-focus.
    AutoFocus = 0x04,
    /// Continuous zoom in/out/stop.
    ManualZoom = 0x05,
    /// Continuous focus near/far/stop.
    ManualFocus = 0x06,
    /// Gimbal speed control; the response is the rotation ack.
    GimbalRotation = 0x07,
    /// Re-center the gimbal; the response is the center ack.
    GimbalCenter = 0x08,
    /// Camera and gimbal status flags.
    AcquireGimbalInfo = 0x0A,
    /// Asynchronous photo/record/HDR feedback pushed by the camera.
    FunctionFeedback = 0x0B,
    /// Photo, HDR, record, motion mode and video output, selected by sub-code.
    PhotoVideo = 0x0C,
    /// Gimbal attitude and angular velocity.
    AcquireGimbalAttitude = 0x0D,
    /// Absolute gimbal yaw/pitch target.
    GimbalControlAngle = 0x0E,
    /// Absolute zoom level.
    AbsoluteZoom = 0x0F,
}

impl Command {
    /// Every known command, in wire-id order.
    pub const ALL: [Command; 13] = [
        Command::AcquireFirmwareVersion,
        Command::AcquireHardwareId,
        Command::AutoFocus,
        Command::ManualZoom,
        Command::ManualFocus,
        Command::GimbalRotation,
        Command::GimbalCenter,
        Command::AcquireGimbalInfo,
        Command::FunctionFeedback,
        Command::PhotoVideo,
        Command::AcquireGimbalAttitude,
        Command::GimbalControlAngle,
        Command::AbsoluteZoom,
    ];

    /// Map a wire byte to a command. Unlisted bytes map to `Unknown`.
    pub fn from_u8(id: u8) -> Self {
        match id {
            0x01 => Command::AcquireFirmwareVersion,
            0x02 => Command::AcquireHardwareId,
            0x04 => Command::AutoFocus,
            0x05 => Command::ManualZoom,
            0x06 => Command::ManualFocus,
            0x07 => Command::GimbalRotation,
            0x08 => Command::GimbalCenter,
            0x0A => Command::AcquireGimbalInfo,
            0x0B => Command::FunctionFeedback,
            0x0C => Command::PhotoVideo,
            0x0D => Command::AcquireGimbalAttitude,
            0x0E => Command::GimbalControlAngle,
            0x0F => Command::AbsoluteZoom,
            _ => Command::Unknown,
        }
    }

    /// The wire byte for this command.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Stable snake_case name for logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Command::Unknown => "unknown",
            Command::AcquireFirmwareVersion => "acquire_firmware_version",
            Command::AcquireHardwareId => "acquire_hardware_id",
            Command::AutoFocus => "auto_focus",
            Command::ManualZoom => "manual_zoom",
            Command::ManualFocus => "manual_focus",
            Command::GimbalRotation => "gimbal_rotation",
            Command::GimbalCenter => "gimbal_center",
            Command::AcquireGimbalInfo => "acquire_gimbal_info",
            Command::FunctionFeedback => "function_feedback",
            Command::PhotoVideo => "photo_video",
            Command::AcquireGimbalAttitude => "acquire_gimbal_attitude",
            Command::GimbalControlAngle => "gimbal_control_angle",
            Command::AbsoluteZoom => "absolute_zoom",
        }
    }

    /// Look a command up by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    /// True for every command except `Unknown`.
    pub fn is_known(self) -> bool {
        self != Command::Unknown
    }
}

impl From<u8> for Command {
    fn from(id: u8) -> Self {
        Command::from_u8(id)
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd.id()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_roundtrip() {
        for cmd in Command::ALL {
            assert_eq!(Command::from_u8(cmd.id()), cmd);
            assert!(cmd.is_known());
        }
    }

    #[test]
    fn unlisted_ids_map_to_unknown() {
        for id in [0x00, 0x03, 0x09, 0x10, 0x42, 0xFF] {
            assert_eq!(Command::from_u8(id), Command::Unknown);
        }
        assert!(!Command::Unknown.is_known());
    }

    #[test]
    fn stable_wire_values() {
        assert_eq!(Command::AcquireGimbalAttitude.id(), 0x0D);
        assert_eq!(Command::AbsoluteZoom.id(), 0x0F);
        assert_eq!(Command::PhotoVideo.id(), 0x0C);
        assert_eq!(u8::from(Command::GimbalCenter), 0x08);
    }

    #[test]
    fn names_resolve_back() {
        for cmd in Command::ALL {
            assert_eq!(Command::from_name(cmd.name()), Some(cmd));
        }
        assert_eq!(Command::from_name("warp_drive"), None);
    }

    #[test]
    fn display_includes_hex_id() {
        assert_eq!(
            Command::GimbalControlAngle.to_string(),
            "gimbal_control_angle (0x0e)"
        );
    }
}
