//! Per-command payload decoders.
//!
//! Every decoder checks the payload length up front and then reads its fixed
//! fields in wire order. Trailing bytes past the last field are ignored.

use bytes::Buf;
use siyi_frame::Command;
use tracing::trace;

use crate::error::{MessageError, Result};
use crate::message::{
    AbsoluteZoom, AutoFocus, CameraStatus, FeedbackState, FirmwareVersion, FunctionFeedback,
    GimbalAttitude, GimbalCenterAck, GimbalControlAngle, GimbalRotationAck, HardwareId,
    ManualFocus, ManualZoom, MotionMode, Mounting, RecordingStatus, Response,
};

/// Turns a payload into a typed response.
pub type DecodeFn = fn(&[u8]) -> Result<Response>;

/// Attitude payload carrying only the three angles.
const ATTITUDE_ANGLES_LEN: usize = 6;
/// Attitude payload carrying angles and angular velocities.
const ATTITUDE_FULL_LEN: usize = 12;
const CAMERA_STATUS_LEN: usize = 7;

fn require(command: Command, payload: &[u8], needed: usize) -> Result<()> {
    if payload.len() < needed {
        return Err(MessageError::PayloadTooShort {
            command,
            needed,
            actual: payload.len(),
        });
    }
    trace!(
        command = command.name(),
        payload = %hex::encode(payload),
        "decoding payload"
    );
    Ok(())
}

fn single_byte(command: Command, payload: &[u8]) -> Result<u8> {
    require(command, payload, 1)?;
    Ok(payload[0])
}

pub fn firmware_version(mut payload: &[u8]) -> Result<Response> {
    require(Command::AcquireFirmwareVersion, payload, 12)?;
    Ok(Response::FirmwareVersion(FirmwareVersion {
        board: payload.get_u32_le(),
        gimbal: payload.get_u32_le(),
        zoom: payload.get_u32_le(),
    }))
}

pub fn hardware_id(payload: &[u8]) -> Result<Response> {
    require(Command::AcquireHardwareId, payload, 2)?;
    let model_id = u16::from_le_bytes([payload[0], payload[1]]);
    Ok(Response::HardwareId(HardwareId {
        hardware_id: hex::encode(payload),
        model_id,
    }))
}

pub fn auto_focus(payload: &[u8]) -> Result<Response> {
    let success = single_byte(Command::AutoFocus, payload)? != 0;
    Ok(Response::AutoFocus(AutoFocus { success }))
}

pub fn manual_zoom(mut payload: &[u8]) -> Result<Response> {
    require(Command::ManualZoom, payload, 2)?;
    Ok(Response::ManualZoom(ManualZoom {
        zoom_level: payload.get_u16_le(),
    }))
}

pub fn absolute_zoom(payload: &[u8]) -> Result<Response> {
    let ack = single_byte(Command::AbsoluteZoom, payload)?;
    Ok(Response::AbsoluteZoom(AbsoluteZoom { ack }))
}

pub fn manual_focus(payload: &[u8]) -> Result<Response> {
    let state = single_byte(Command::ManualFocus, payload)?;
    Ok(Response::ManualFocus(ManualFocus { state }))
}

pub fn gimbal_rotation_ack(payload: &[u8]) -> Result<Response> {
    let state = single_byte(Command::GimbalRotation, payload)?;
    Ok(Response::GimbalRotationAck(GimbalRotationAck { state }))
}

pub fn gimbal_center_ack(payload: &[u8]) -> Result<Response> {
    let state = single_byte(Command::GimbalCenter, payload)?;
    Ok(Response::GimbalCenterAck(GimbalCenterAck { state }))
}

pub fn function_feedback(payload: &[u8]) -> Result<Response> {
    let code = single_byte(Command::FunctionFeedback, payload)?;
    Ok(Response::FunctionFeedback(FunctionFeedback {
        state: FeedbackState::from_code(code),
    }))
}

/// Angles are required; velocities are read only when the full payload is
/// present and are zero otherwise.
pub fn gimbal_attitude(mut payload: &[u8]) -> Result<Response> {
    require(Command::AcquireGimbalAttitude, payload, ATTITUDE_ANGLES_LEN)?;
    let has_velocity = payload.len() >= ATTITUDE_FULL_LEN;
    let mut attitude = GimbalAttitude {
        pitch: payload.get_i16_le(),
        roll: payload.get_i16_le(),
        yaw: payload.get_i16_le(),
        ..GimbalAttitude::default()
    };
    if has_velocity {
        attitude.pitch_velocity = payload.get_i16_le();
        attitude.roll_velocity = payload.get_i16_le();
        attitude.yaw_velocity = payload.get_i16_le();
    }
    Ok(Response::GimbalAttitude(attitude))
}

pub fn gimbal_control_angle(mut payload: &[u8]) -> Result<Response> {
    require(Command::GimbalControlAngle, payload, 6)?;
    Ok(Response::GimbalControlAngle(GimbalControlAngle {
        pitch: payload.get_i16_le(),
        roll: payload.get_i16_le(),
        yaw: payload.get_i16_le(),
    }))
}

pub fn camera_status(mut payload: &[u8]) -> Result<Response> {
    require(Command::AcquireGimbalInfo, payload, CAMERA_STATUS_LEN)?;
    payload.advance(1);
    let hdr_on = payload.get_u8() == 1;
    payload.advance(1);
    let recording = RecordingStatus::from_code(payload.get_u8());
    let motion_mode = MotionMode::from_code(payload.get_u8());
    let mounting = Mounting::from_code(payload.get_u8());
    let hdmi_output = payload.get_u8() == 0;
    Ok(Response::CameraStatus(CameraStatus {
        hdr_on,
        recording,
        motion_mode,
        mounting,
        hdmi_output,
    }))
}
