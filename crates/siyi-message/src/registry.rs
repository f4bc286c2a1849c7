use std::collections::HashMap;

use siyi_frame::{Command, Frame};

use crate::decode::{self, DecodeFn};
use crate::error::{MessageError, Result};
use crate::message::Response;

/// Command-keyed table of payload decoders.
///
/// Filled once before the link starts receiving and read-only afterwards.
/// Registering a second decoder for the same command replaces the first.
#[derive(Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<Command, DecodeFn>,
}

impl DecoderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry with a decoder for every response the camera sends.
    ///
    /// [`Command::PhotoVideo`] has no decoder: the camera answers it on
    /// [`Command::FunctionFeedback`] instead.
    pub fn with_defaults() -> Self {
        Self::from_entries([
            (
                Command::AcquireFirmwareVersion,
                decode::firmware_version as DecodeFn,
            ),
            (Command::AcquireHardwareId, decode::hardware_id),
            (Command::AutoFocus, decode::auto_focus),
            (Command::ManualZoom, decode::manual_zoom),
            (Command::AbsoluteZoom, decode::absolute_zoom),
            (Command::ManualFocus, decode::manual_focus),
            (Command::GimbalRotation, decode::gimbal_rotation_ack),
            (Command::GimbalCenter, decode::gimbal_center_ack),
            (Command::FunctionFeedback, decode::function_feedback),
            (Command::AcquireGimbalAttitude, decode::gimbal_attitude),
            (Command::GimbalControlAngle, decode::gimbal_control_angle),
            (Command::AcquireGimbalInfo, decode::camera_status),
        ])
    }

    /// Build a registry from `(command, decoder)` pairs. Later pairs win.
    pub fn from_entries(entries: impl IntoIterator<Item = (Command, DecodeFn)>) -> Self {
        let mut registry = Self::new();
        for (command, decoder) in entries {
            registry.register(command, decoder);
        }
        registry
    }

    /// Register a decoder, returning the one it replaced.
    pub fn register(&mut self, command: Command, decoder: DecodeFn) -> Option<DecodeFn> {
        self.decoders.insert(command, decoder)
    }

    pub fn lookup(&self, command: Command) -> Option<DecodeFn> {
        self.decoders.get(&command).copied()
    }

    pub fn has_decoder(&self, command: Command) -> bool {
        self.decoders.contains_key(&command)
    }

    /// Decode a payload with the decoder registered for `command`.
    pub fn decode(&self, command: Command, payload: &[u8]) -> Result<Response> {
        let decoder = self
            .lookup(command)
            .ok_or(MessageError::NoDecoder(command))?;
        decoder(payload)
    }

    /// Decode the payload of a frame that already passed the codec.
    pub fn decode_frame(&self, frame: &Frame) -> Result<Response> {
        self.decode(frame.command, &frame.payload)
    }

    /// Registered commands in id order.
    pub fn commands(&self) -> Vec<Command> {
        let mut commands: Vec<Command> = self.decoders.keys().copied().collect();
        commands.sort();
        commands
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("commands", &self.commands())
            .finish()
    }
}
