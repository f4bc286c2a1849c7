use serde::Serialize;
use siyi::message::{HardwareId, MotionMode};
use siyi::{Camera, CameraError};

use crate::cmd::{
    connect_initialized, AnglesArgs, ConnectArgs, ModeArgs, ModeValue, RotateArgs, ZoomArgs,
    ZoomDirection, ZoomToArgs,
};
use crate::exit::{camera_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

#[derive(Serialize)]
struct SentOutput<'a> {
    action: &'a str,
    sequence: u16,
    model: &'static str,
    hardware_id: &'a str,
}

/// Wait for the camera, run one operation, report what was sent.
fn run_one<F>(connect: &ConnectArgs, format: OutputFormat, action: &str, op: F) -> CliResult<i32>
where
    F: FnOnce(&Camera) -> Result<u16, CameraError>,
{
    let (camera, id) = connect_initialized(connect)?;
    let sequence = op(&camera).map_err(|err| camera_error(&format!("{action} failed"), err))?;
    report(action, sequence, &id, format);
    camera.shutdown();
    Ok(SUCCESS)
}

fn report(action: &str, sequence: u16, id: &HardwareId, format: OutputFormat) {
    let model = id.model();
    let out = SentOutput {
        action,
        sequence,
        model: model.name(),
        hardware_id: &id.hardware_id,
    };
    let rows = [
        ("action", action.to_string()),
        ("sequence", sequence.to_string()),
        ("model", model.to_string()),
    ];
    print_report(&out, &rows, format);
}

pub fn photo(connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    run_one(connect, format, "photo", Camera::take_photo)
}

pub fn record(connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    run_one(connect, format, "record", Camera::toggle_recording)
}

pub fn center(connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    run_one(connect, format, "center", Camera::center)
}

pub fn zoom(args: ZoomArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let (action, direction) = match args.direction {
        ZoomDirection::In => ("zoom in", 1),
        ZoomDirection::Out => ("zoom out", -1),
        ZoomDirection::Stop => ("zoom stop", 0),
    };
    run_one(connect, format, action, |camera| {
        camera.zoom_direction(direction)
    })
}

pub fn zoom_to(args: ZoomToArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    run_one(connect, format, "zoom to", |camera| camera.zoom_to(args.level))
}

pub fn angles(args: AnglesArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    run_one(connect, format, "angles", |camera| {
        camera.set_angles(args.yaw, args.pitch)
    })
}

pub fn rotate(args: RotateArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    run_one(connect, format, "rotate", |camera| {
        camera.set_rates(f32::from(args.yaw_speed), f32::from(args.pitch_speed))
    })
}

pub fn mode(args: ModeArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mode = match args.mode {
        ModeValue::Lock => MotionMode::Lock,
        ModeValue::Follow => MotionMode::Follow,
        ModeValue::Fpv => MotionMode::Fpv,
    };
    run_one(connect, format, "mode", |camera| camera.set_motion_mode(mode))
}
