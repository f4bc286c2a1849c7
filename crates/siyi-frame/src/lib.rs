//! Binary framing for the SIYI gimbal control protocol.
//!
//! Every request and response travels in one UDP datagram framed as:
//! - A 2-byte magic (`0x6655`, little-endian on the wire)
//! - A 1-byte control value
//! - A 2-byte little-endian payload length
//! - A 2-byte little-endian sequence number
//! - A 1-byte command id
//! - The payload
//! - A 2-byte little-endian CRC16 over everything before it
//!
//! [`FrameEncoder`] stamps sequence numbers and builds frames from typed
//! [`Request`]s; [`decode_frame`] validates and splits inbound datagrams.

pub mod codec;
pub mod command;
pub mod crc;
pub mod encoder;
pub mod error;
pub mod request;
pub mod sequence;

pub use codec::{
    decode_frame, decode_or_empty, encode_frame, encode_frame_raw, Frame, CHECKSUM_SIZE,
    CONTROL_NEED_ACK, HEADER_SIZE, MAGIC, MIN_FRAME_SIZE,
};
pub use command::Command;
pub use crc::{crc16, Crc16Digest};
pub use encoder::FrameEncoder;
pub use error::{FrameError, Result};
pub use request::{PhotoVideoAction, Request};
pub use sequence::SequenceCounter;
