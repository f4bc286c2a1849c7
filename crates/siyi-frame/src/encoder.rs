use bytes::{Bytes, BytesMut};

use crate::codec::{encode_frame, MIN_FRAME_SIZE};
use crate::command::Command;
use crate::request::Request;
use crate::sequence::SequenceCounter;

/// Builds outbound frames and stamps them with its own sequence counter.
///
/// Takes `&self` everywhere so one encoder can be shared between threads;
/// every frame it produces carries a distinct sequence number until the
/// counter wraps.
#[derive(Debug, Default)]
pub struct FrameEncoder {
    sequence: SequenceCounter,
}

impl FrameEncoder {
    /// Encoder whose first frame carries sequence 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder whose first frame carries `start`.
    pub fn starting_at(start: u16) -> Self {
        Self {
            sequence: SequenceCounter::starting_at(start),
        }
    }

    /// Encode a typed request.
    pub fn encode(&self, request: &Request) -> Bytes {
        let payload = request.payload();
        self.encode_command(request.command(), &payload)
    }

    /// Encode a command with a raw payload.
    pub fn encode_command(&self, command: Command, payload: &[u8]) -> Bytes {
        let mut buf = BytesMut::with_capacity(MIN_FRAME_SIZE + payload.len());
        self.encode_into(command, payload, &mut buf);
        buf.freeze()
    }

    /// Append a frame to `dst` and return the sequence number it carries.
    pub fn encode_into(&self, command: Command, payload: &[u8], dst: &mut BytesMut) -> u16 {
        let sequence = self.sequence.next();
        encode_frame(command, sequence, payload, dst);
        sequence
    }

    /// The sequence number the next frame will carry.
    pub fn next_sequence(&self) -> u16 {
        self.sequence.peek()
    }
}
