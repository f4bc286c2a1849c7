use serde::Serialize;
use siyi::message::{CameraStatus, FirmwareVersion};

use crate::cmd::{connect_initialized, ConnectArgs};
use crate::exit::{camera_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

#[derive(Serialize)]
struct InfoOutput {
    camera: String,
    local_addr: Option<String>,
    hardware_id: String,
    model_id: u16,
    model: &'static str,
    firmware: Option<FirmwareOutput>,
    status: Option<CameraStatus>,
}

#[derive(Serialize)]
struct FirmwareOutput {
    board: String,
    gimbal: String,
    zoom: String,
}

impl From<FirmwareVersion> for FirmwareOutput {
    fn from(version: FirmwareVersion) -> Self {
        Self {
            board: FirmwareVersion::format(version.board),
            gimbal: FirmwareVersion::format(version.gimbal),
            zoom: FirmwareVersion::format(version.zoom),
        }
    }
}

pub fn run(connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let (camera, id) = connect_initialized(connect)?;
    let timeout = camera.config().init_timeout;

    camera
        .request_firmware()
        .map_err(|err| camera_error("firmware request failed", err))?;
    camera
        .request_gimbal_info()
        .map_err(|err| camera_error("gimbal info request failed", err))?;

    // Firmware and status are best effort; older firmware may not answer both.
    let snapshot = camera
        .wait_for(timeout, |s| s.firmware.is_some() && s.status.is_some())
        .unwrap_or_else(|| camera.snapshot());

    let model = id.model();
    let out = InfoOutput {
        camera: camera.config().link.peer_addr.to_string(),
        local_addr: camera.local_addr().map(|addr| addr.to_string()),
        hardware_id: id.hardware_id.clone(),
        model_id: id.model_id,
        model: model.name(),
        firmware: snapshot.firmware.map(FirmwareOutput::from),
        status: snapshot.status,
    };

    let unavailable = || "unavailable".to_string();
    let mut rows = vec![
        ("camera", out.camera.clone()),
        ("hardware id", out.hardware_id.clone()),
        ("model", format!("{model} (0x{:04x})", out.model_id)),
    ];
    match &out.firmware {
        Some(fw) => {
            rows.push(("board version", fw.board.clone()));
            rows.push(("gimbal firmware", fw.gimbal.clone()));
            rows.push(("zoom firmware", fw.zoom.clone()));
        }
        None => rows.push(("firmware", unavailable())),
    }
    match &out.status {
        Some(status) => {
            rows.push(("hdr", status.hdr_on.to_string()));
            rows.push(("recording", format!("{:?}", status.recording)));
            rows.push(("motion mode", format!("{:?}", status.motion_mode)));
            rows.push(("mounting", format!("{:?}", status.mounting)));
            rows.push((
                "video output",
                if status.hdmi_output { "HDMI" } else { "CVBS" }.to_string(),
            ));
        }
        None => rows.push(("status", unavailable())),
    }

    print_report(&out, &rows, format);
    camera.shutdown();
    Ok(SUCCESS)
}
