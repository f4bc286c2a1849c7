//! High-level camera facade.
//!
//! [`Camera`] owns a [`Link`], keeps the most recent value of every response
//! it cares about, and polls the gimbal attitude once the camera has
//! identified itself. Control operations are fire-and-forget: they return
//! the sequence number of the queued request, not the camera's answer.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::Serialize;
use siyi_frame::{PhotoVideoAction, Request};
use siyi_link::{Link, LinkConfig, LinkError, LinkEvent, LinkState};
use siyi_message::{
    CameraModel, CameraStatus, DecoderRegistry, FirmwareVersion, FunctionFeedback,
    GimbalAttitude, GimbalControlAngle, HardwareId, ManualFocus, ManualZoom, MotionMode, Response,
};
use tracing::{debug, info, warn};

/// Attitude poll period once the camera is initialized.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long [`Camera::wait_initialized`] waits by default.
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraConfig {
    pub link: LinkConfig,
    pub poll_interval: Duration,
    pub init_timeout: Duration,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            init_timeout: DEFAULT_INIT_TIMEOUT,
        }
    }
}

impl CameraConfig {
    pub fn new(peer_addr: SocketAddr) -> Self {
        Self {
            link: LinkConfig::new(peer_addr),
            ..Self::default()
        }
    }

    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }

    /// Clamped to at least one millisecond.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error(transparent)]
    Link(#[from] LinkError),

    /// The camera did not answer the hardware-id request in time.
    #[error("camera not initialized after {0:?}")]
    Timeout(Duration),

    #[error("unsupported camera mode {0}")]
    UnsupportedMode(u8),

    #[error("motion mode must be lock, follow or fpv")]
    UndefinedMotionMode,
}

pub type Result<T> = std::result::Result<T, CameraError>;

/// Latest value received for each response kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CameraSnapshot {
    pub firmware: Option<FirmwareVersion>,
    pub hardware_id: Option<HardwareId>,
    pub zoom: Option<ManualZoom>,
    pub attitude: Option<GimbalAttitude>,
    pub control_angle: Option<GimbalControlAngle>,
    pub focus: Option<ManualFocus>,
    pub status: Option<CameraStatus>,
    pub feedback: Option<FunctionFeedback>,
}

impl CameraSnapshot {
    /// The camera counts as initialized once it has reported its hardware id.
    pub fn initialized(&self) -> bool {
        self.hardware_id.is_some()
    }

    pub fn model(&self) -> CameraModel {
        self.hardware_id
            .as_ref()
            .map_or(CameraModel::Unknown, HardwareId::model)
    }

    /// Fold a response into the snapshot. Returns false for responses that
    /// carry nothing worth caching (plain acks).
    pub fn apply(&mut self, response: &Response) -> bool {
        match response {
            Response::FirmwareVersion(v) => self.firmware = Some(*v),
            Response::HardwareId(id) => self.hardware_id = Some(id.clone()),
            Response::ManualZoom(z) => self.zoom = Some(*z),
            Response::GimbalAttitude(a) => self.attitude = Some(*a),
            Response::GimbalControlAngle(a) => self.control_angle = Some(*a),
            Response::ManualFocus(f) => self.focus = Some(*f),
            Response::CameraStatus(s) => self.status = Some(*s),
            Response::FunctionFeedback(f) => self.feedback = Some(*f),
            Response::AutoFocus(_)
            | Response::AbsoluteZoom(_)
            | Response::GimbalRotationAck(_)
            | Response::GimbalCenterAck(_) => return false,
        }
        true
    }
}

struct Shared {
    snapshot: Mutex<CameraSnapshot>,
    changed: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, CameraSnapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, response: &Response) {
        let mut snapshot = self.lock();
        let was_initialized = snapshot.initialized();
        if snapshot.apply(response) {
            if !was_initialized && snapshot.initialized() {
                info!(model = %snapshot.model(), "camera initialized");
            }
            self.changed.notify_all();
        }
    }
}

/// A connected camera.
///
/// Dropping the camera stops polling and shuts the link down.
pub struct Camera {
    link: Arc<Link>,
    shared: Arc<Shared>,
    running: Arc<AtomicBool>,
    observer: Option<JoinHandle<()>>,
    config: CameraConfig,
}

impl Camera {
    /// Start the link, begin observing responses and ask for the hardware id.
    ///
    /// A failed bind does not fail this call; check [`is_connected`](Self::is_connected).
    pub fn start(config: CameraConfig) -> Result<Self> {
        let link = Arc::new(Link::spawn(
            config.link.clone(),
            DecoderRegistry::with_defaults(),
        )?);
        let events = link.subscribe()?;

        let shared = Arc::new(Shared {
            snapshot: Mutex::new(CameraSnapshot::default()),
            changed: Condvar::new(),
        });
        let running = Arc::new(AtomicBool::new(true));

        let observer = {
            let link = Arc::clone(&link);
            let shared = Arc::clone(&shared);
            let running = Arc::clone(&running);
            let poll_interval = config.poll_interval;
            std::thread::Builder::new()
                .name("siyi-camera".to_string())
                .spawn(move || observe(&link, &events, &shared, &running, poll_interval))
                .map_err(LinkError::Spawn)?
        };

        let camera = Self {
            link,
            shared,
            running,
            observer: Some(observer),
            config,
        };

        if let Err(err) = camera.request_hardware_id() {
            debug!(error = %err, "initial hardware id request not sent");
        }
        Ok(camera)
    }

    /// Block until the camera has reported its hardware id.
    pub fn wait_initialized(&self, timeout: Duration) -> Result<HardwareId> {
        let guard = self.shared.lock();
        let (guard, _) = self
            .shared
            .changed
            .wait_timeout_while(guard, timeout, |snapshot| !snapshot.initialized())
            .unwrap_or_else(PoisonError::into_inner);
        guard.hardware_id.clone().ok_or(CameraError::Timeout(timeout))
    }

    /// Block until the snapshot satisfies `ready` or `timeout` passes.
    pub fn wait_for<F>(&self, timeout: Duration, mut ready: F) -> Option<CameraSnapshot>
    where
        F: FnMut(&CameraSnapshot) -> bool,
    {
        let guard = self.shared.lock();
        let (guard, _) = self
            .shared
            .changed
            .wait_timeout_while(guard, timeout, |snapshot| !ready(snapshot))
            .unwrap_or_else(PoisonError::into_inner);
        if ready(&guard) {
            Some(guard.clone())
        } else {
            None
        }
    }

    /// Absolute gimbal angles in degrees.
    pub fn set_angles(&self, yaw_deg: f32, pitch_deg: f32) -> Result<u16> {
        self.send(Request::control_angle(yaw_deg, pitch_deg))
    }

    /// Gimbal rotation speeds in -100..=100; 0 stops.
    pub fn set_rates(&self, yaw_rate: f32, pitch_rate: f32) -> Result<u16> {
        self.send(Request::rotation(yaw_rate, pitch_rate))
    }

    pub fn center(&self) -> Result<u16> {
        self.send(Request::GimbalCenter)
    }

    pub fn take_photo(&self) -> Result<u16> {
        self.photo_video(PhotoVideoAction::TakePhoto)
    }

    pub fn toggle_recording(&self) -> Result<u16> {
        self.photo_video(PhotoVideoAction::ToggleRecording)
    }

    pub fn toggle_hdr(&self) -> Result<u16> {
        self.photo_video(PhotoVideoAction::ToggleHdr)
    }

    pub fn set_motion_mode(&self, mode: MotionMode) -> Result<u16> {
        let action = match mode {
            MotionMode::Lock => PhotoVideoAction::MotionLock,
            MotionMode::Follow => PhotoVideoAction::MotionFollow,
            MotionMode::Fpv => PhotoVideoAction::MotionFpv,
            MotionMode::Undefined => return Err(CameraError::UndefinedMotionMode),
        };
        self.photo_video(action)
    }

    /// Select a camera mode by its photo/video sub-code.
    ///
    /// Accepts photo (0), record (2), lock (3), follow (4) and FPV (5).
    pub fn set_camera_mode(&self, code: u8) -> Result<u16> {
        match PhotoVideoAction::from_code(code) {
            Some(
                action @ (PhotoVideoAction::TakePhoto
                | PhotoVideoAction::ToggleRecording
                | PhotoVideoAction::MotionLock
                | PhotoVideoAction::MotionFollow
                | PhotoVideoAction::MotionFpv),
            ) => self.photo_video(action),
            _ => Err(CameraError::UnsupportedMode(code)),
        }
    }

    /// Route video to HDMI (`true`) or CVBS (`false`).
    pub fn set_video_output(&self, hdmi: bool) -> Result<u16> {
        if hdmi {
            self.photo_video(PhotoVideoAction::VideoOutputHdmi)
        } else {
            self.photo_video(PhotoVideoAction::VideoOutputCvbs)
        }
    }

    pub fn zoom_to(&self, level: u8) -> Result<u16> {
        self.send(Request::AbsoluteZoom { level })
    }

    /// -1 zoom out, 0 stop, 1 zoom in.
    pub fn zoom_direction(&self, direction: i8) -> Result<u16> {
        self.send(Request::ManualZoom { direction })
    }

    /// -1 far, 0 stop, 1 near.
    pub fn manual_focus(&self, direction: i8) -> Result<u16> {
        self.send(Request::ManualFocus { direction })
    }

    pub fn auto_focus(&self) -> Result<u16> {
        self.send(Request::AutoFocus)
    }

    pub fn request_firmware(&self) -> Result<u16> {
        self.send(Request::AcquireFirmwareVersion)
    }

    pub fn request_hardware_id(&self) -> Result<u16> {
        self.send(Request::AcquireHardwareId)
    }

    pub fn request_gimbal_info(&self) -> Result<u16> {
        self.send(Request::AcquireGimbalInfo)
    }

    pub fn request_attitude(&self) -> Result<u16> {
        self.send(Request::AcquireGimbalAttitude)
    }

    /// Copy of everything cached so far.
    pub fn snapshot(&self) -> CameraSnapshot {
        self.shared.lock().clone()
    }

    pub fn attitude(&self) -> Option<GimbalAttitude> {
        self.shared.lock().attitude
    }

    pub fn firmware(&self) -> Option<FirmwareVersion> {
        self.shared.lock().firmware
    }

    pub fn status(&self) -> Option<CameraStatus> {
        self.shared.lock().status
    }

    pub fn model(&self) -> CameraModel {
        self.shared.lock().model()
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.lock().initialized()
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.link.local_addr()
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Raw response stream, in addition to the cached snapshot.
    pub fn subscribe(&self) -> Result<Receiver<LinkEvent>> {
        Ok(self.link.subscribe()?)
    }

    /// Stop polling and close the link.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn photo_video(&self, action: PhotoVideoAction) -> Result<u16> {
        self.send(Request::PhotoVideo(action))
    }

    fn send(&self, request: Request) -> Result<u16> {
        Ok(self.link.send(&request)?)
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.observer.take() {
            if handle.join().is_err() {
                warn!("camera observer panicked");
            }
        }
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("link", &self.link)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Apply incoming events and poll the attitude every `poll_interval` once
/// the camera is initialized.
fn observe(
    link: &Link,
    events: &Receiver<LinkEvent>,
    shared: &Shared,
    running: &AtomicBool,
    poll_interval: Duration,
) {
    let mut next_poll = Instant::now() + poll_interval;
    while running.load(Ordering::Acquire) {
        let wait = next_poll.saturating_duration_since(Instant::now());
        match events.recv_timeout(wait) {
            Ok(event) => shared.apply(&event.response),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let now = Instant::now();
        if now >= next_poll {
            next_poll = now + poll_interval;
            if link.is_connected() && shared.lock().initialized() {
                if let Err(err) = link.send(&Request::AcquireGimbalAttitude) {
                    debug!(error = %err, "attitude poll not sent");
                }
            }
        }
    }
}
