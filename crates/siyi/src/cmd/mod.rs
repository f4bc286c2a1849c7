use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use siyi::link::LinkConfig;
use siyi::message::HardwareId;
use siyi::transport::{DEFAULT_CAMERA_ADDR, DEFAULT_PORT};
use siyi::{Camera, CameraConfig};

use crate::exit::{camera_error, CliError, CliResult, TRANSPORT_ERROR, USAGE};
use crate::output::OutputFormat;

pub mod codec;
pub mod control;
pub mod info;
pub mod monitor;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Wait for the camera and print its identity and firmware.
    Info,
    /// Take a photo.
    Photo,
    /// Start or stop video recording.
    Record,
    /// Center the gimbal.
    Center,
    /// Start or stop manual zoom.
    Zoom(ZoomArgs),
    /// Zoom to an absolute level.
    ZoomTo(ZoomToArgs),
    /// Point the gimbal at absolute angles.
    Angles(AnglesArgs),
    /// Rotate the gimbal at a constant speed.
    Rotate(RotateArgs),
    /// Select the gimbal motion mode.
    Mode(ModeArgs),
    /// Print decoded responses as they arrive.
    Monitor(MonitorArgs),
    /// Build a frame offline and print it as hex.
    Encode(EncodeArgs),
    /// Parse a hex frame offline.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Info => info::run(connect, format),
        Command::Photo => control::photo(connect, format),
        Command::Record => control::record(connect, format),
        Command::Center => control::center(connect, format),
        Command::Zoom(args) => control::zoom(args, connect, format),
        Command::ZoomTo(args) => control::zoom_to(args, connect, format),
        Command::Angles(args) => control::angles(args, connect, format),
        Command::Rotate(args) => control::rotate(args, connect, format),
        Command::Mode(args) => control::mode(args, connect, format),
        Command::Monitor(args) => monitor::run(args, connect, format),
        Command::Encode(args) => codec::encode(args, format),
        Command::Decode(args) => codec::decode(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Camera IP address.
    #[arg(long, env = "SIYI_CAMERA", default_value_t = DEFAULT_CAMERA_ADDR, global = true)]
    pub camera: IpAddr,
    /// Camera UDP port.
    #[arg(long, env = "SIYI_PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,
    /// Local UDP port to bind (0 picks a free port).
    #[arg(long, env = "SIYI_LOCAL_PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub local_port: u16,
    /// How long to wait for the camera to answer (e.g. 3s, 500ms).
    #[arg(long, default_value = "3s", global = true)]
    pub timeout: String,
}

impl ConnectArgs {
    pub fn camera_config(&self) -> CliResult<CameraConfig> {
        let init_timeout = parse_duration(&self.timeout)?;
        let link = LinkConfig::new(SocketAddr::new(self.camera, self.port))
            .with_local_addr(SocketAddr::new(
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                self.local_port,
            ));
        Ok(CameraConfig::default()
            .with_link(link)
            .with_init_timeout(init_timeout))
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ZoomDirection {
    In,
    Out,
    Stop,
}

#[derive(Args, Debug)]
pub struct ZoomArgs {
    pub direction: ZoomDirection,
}

#[derive(Args, Debug)]
pub struct ZoomToArgs {
    /// Target zoom level.
    pub level: u8,
}

#[derive(Args, Debug)]
pub struct AnglesArgs {
    /// Yaw in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub yaw: f32,
    /// Pitch in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub pitch: f32,
}

#[derive(Args, Debug)]
pub struct RotateArgs {
    /// Yaw speed, -100..=100.
    #[arg(long, allow_negative_numbers = true, default_value_t = 0)]
    pub yaw_speed: i8,
    /// Pitch speed, -100..=100.
    #[arg(long, allow_negative_numbers = true, default_value_t = 0)]
    pub pitch_speed: i8,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ModeValue {
    Lock,
    Follow,
    Fpv,
}

#[derive(Args, Debug)]
pub struct ModeArgs {
    pub mode: ModeValue,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Exit after printing N responses.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Command name (e.g. gimbal_center) or id (e.g. 0x08).
    pub command: String,
    /// Payload as hex.
    #[arg(default_value = "")]
    pub payload: String,
    /// Sequence number to stamp.
    #[arg(long, default_value_t = 0)]
    pub sequence: u16,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame as hex. Whitespace is ignored.
    pub frame: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Start the camera and fail with a transport error if the bind failed.
pub fn connect(args: &ConnectArgs) -> CliResult<Camera> {
    let config = args.camera_config()?;
    let local = config.link.local_addr;
    let camera =
        Camera::start(config).map_err(|err| camera_error("failed to start camera link", err))?;
    if !camera.is_connected() {
        return Err(CliError::new(
            TRANSPORT_ERROR,
            format!("failed to bind {local}"),
        ));
    }
    Ok(camera)
}

/// Start the camera and wait for its hardware id.
pub fn connect_initialized(args: &ConnectArgs) -> CliResult<(Camera, HardwareId)> {
    let camera = connect(args)?;
    let timeout = camera.config().init_timeout;
    let id = camera
        .wait_initialized(timeout)
        .map_err(|err| camera_error("camera did not respond", err))?;
    Ok((camera, id))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
