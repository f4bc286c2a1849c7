use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::Serialize;
use siyi_transport::{BindOptions, DEFAULT_CAMERA_ADDR, DEFAULT_PORT};

/// Receive buffer size. Camera responses are a few dozen bytes; anything
/// longer than this is truncated by the OS and then fails the checksum.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 4096;

/// Configuration for a [`Link`](crate::Link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkConfig {
    /// Local address to bind. Defaults to all interfaces on the camera port.
    pub local_addr: SocketAddr,
    /// The camera.
    pub peer_addr: SocketAddr,
    pub max_datagram_size: usize,
    /// Requested `SO_RCVBUF`. `None` keeps the OS default.
    pub recv_buffer_size: Option<usize>,
    pub reuse_address: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            local_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            peer_addr: SocketAddr::new(DEFAULT_CAMERA_ADDR, DEFAULT_PORT),
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
            recv_buffer_size: None,
            reuse_address: false,
        }
    }
}

impl LinkConfig {
    /// Default config pointed at `peer_addr`.
    pub fn new(peer_addr: SocketAddr) -> Self {
        Self {
            peer_addr,
            ..Self::default()
        }
    }

    pub fn with_local_addr(mut self, local_addr: SocketAddr) -> Self {
        self.local_addr = local_addr;
        self
    }

    pub fn with_peer_addr(mut self, peer_addr: SocketAddr) -> Self {
        self.peer_addr = peer_addr;
        self
    }

    /// Bind all interfaces on `port`.
    pub fn with_local_port(mut self, port: u16) -> Self {
        self.local_addr.set_port(port);
        self
    }

    /// Clamped to at least one byte.
    pub fn with_max_datagram_size(mut self, size: usize) -> Self {
        self.max_datagram_size = size.max(1);
        self
    }

    pub fn with_recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = Some(size);
        self
    }

    pub fn with_reuse_address(mut self, reuse: bool) -> Self {
        self.reuse_address = reuse;
        self
    }

    pub(crate) fn bind_options(&self) -> BindOptions {
        BindOptions {
            recv_buffer_size: self.recv_buffer_size,
            reuse_address: self.reuse_address,
        }
    }
}
