//! UDP datagram transport for the SIYI gimbal control protocol.
//!
//! The camera speaks a connectionless request/response protocol over a
//! single UDP socket. This crate owns that socket: binding a local port,
//! waiting for readability, draining datagrams without blocking, and
//! best-effort sends to one fixed peer.
//!
//! This is the lowest layer of the stack. Framing and checksums live in
//! `siyi-frame`; the receive/dispatch worker lives in `siyi-link`.

pub mod endpoint;
pub mod error;

pub use endpoint::{BindOptions, UdpEndpoint, DEFAULT_CAMERA_ADDR, DEFAULT_PORT};
pub use error::{Result, TransportError};
