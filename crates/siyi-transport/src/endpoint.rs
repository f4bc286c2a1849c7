use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{debug, info, trace};

use crate::error::{Result, TransportError};

/// Factory address of the camera on its Ethernet link.
pub const DEFAULT_CAMERA_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 144, 25));

/// UDP port the camera listens on, and the port we bind locally by default.
pub const DEFAULT_PORT: u16 = 37260;

/// Socket options applied before binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindOptions {
    /// Requested `SO_RCVBUF` size. `None` keeps the OS default.
    pub recv_buffer_size: Option<usize>,
    /// Set `SO_REUSEADDR` before binding.
    pub reuse_address: bool,
}

/// A bound UDP socket paired with the single peer it talks to.
///
/// The socket is non-blocking and registered with the tokio reactor of the
/// runtime that called [`UdpEndpoint::bind`]; it must only be used from that
/// runtime.
pub struct UdpEndpoint {
    socket: UdpSocket,
    local_addr: SocketAddr,
    peer_addr: SocketAddr,
}

impl UdpEndpoint {
    /// Bind `local` and target `peer` with default socket options.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(local: SocketAddr, peer: SocketAddr) -> Result<Self> {
        Self::bind_with_options(local, peer, &BindOptions::default())
    }

    /// Bind `local` and target `peer` with explicit socket options.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind_with_options(
        local: SocketAddr,
        peer: SocketAddr,
        options: &BindOptions,
    ) -> Result<Self> {
        let bind_err = |source: std::io::Error| TransportError::Bind {
            addr: local,
            source,
        };

        let socket = Socket::new(Domain::for_address(local), Type::DGRAM, Some(Protocol::UDP))
            .map_err(bind_err)?;
        if options.reuse_address {
            socket.set_reuse_address(true).map_err(bind_err)?;
        }
        if let Some(size) = options.recv_buffer_size {
            socket.set_recv_buffer_size(size).map_err(bind_err)?;
        }
        socket.set_nonblocking(true).map_err(bind_err)?;
        socket.bind(&local.into()).map_err(bind_err)?;

        let std_socket: std::net::UdpSocket = socket.into();
        let socket = UdpSocket::from_std(std_socket).map_err(bind_err)?;
        let local_addr = socket.local_addr().map_err(bind_err)?;

        info!(%local_addr, %peer, "bound udp endpoint");

        Ok(Self {
            socket,
            local_addr,
            peer_addr: peer,
        })
    }

    /// Wait until at least one datagram may be pending.
    ///
    /// Readiness can be spurious; [`try_recv`](Self::try_recv) then returns `None`.
    pub async fn readable(&self) -> Result<()> {
        self.socket.readable().await.map_err(TransportError::Receive)
    }

    /// Receive one pending datagram without blocking.
    ///
    /// Returns `Ok(None)` when the receive queue is empty. Datagrams longer
    /// than `buf` are truncated by the OS.
    pub fn try_recv(&self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>> {
        match self.socket.try_recv_from(buf) {
            Ok((len, from)) => {
                trace!(len, %from, "received datagram");
                Ok(Some((len, from)))
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(err) if err.kind() == ErrorKind::Interrupted => Ok(None),
            Err(err) => Err(TransportError::Receive(err)),
        }
    }

    /// Send one datagram to the peer.
    pub async fn send(&self, datagram: &[u8]) -> Result<usize> {
        let written = self
            .socket
            .send_to(datagram, self.peer_addr)
            .await
            .map_err(|source| TransportError::Send {
                addr: self.peer_addr,
                source,
            })?;

        if written != datagram.len() {
            return Err(TransportError::ShortWrite {
                written,
                expected: datagram.len(),
            });
        }

        debug!(len = written, peer = %self.peer_addr, "sent datagram");
        Ok(written)
    }

    /// The locally bound address (with the OS-assigned port resolved).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The peer every datagram is sent to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "udp"
    }
}

impl std::fmt::Debug for UdpEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpEndpoint")
            .field("local_addr", &self.local_addr)
            .field("peer_addr", &self.peer_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn loopback(port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    #[test]
    fn send_reaches_peer() {
        let rt = runtime();
        let peer = std::net::UdpSocket::bind(loopback(0)).unwrap();
        peer.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let peer_addr = peer.local_addr().unwrap();

        rt.block_on(async {
            let endpoint = UdpEndpoint::bind(loopback(0), peer_addr).unwrap();
            let written = endpoint.send(b"hello").await.unwrap();
            assert_eq!(written, 5);
        });

        let mut buf = [0u8; 16];
        let (len, _) = peer.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"hello");
    }

    #[test]
    fn try_recv_empty_queue_returns_none() {
        let rt = runtime();
        rt.block_on(async {
            let endpoint = UdpEndpoint::bind(loopback(0), loopback(9)).unwrap();
            let mut buf = [0u8; 16];
            assert!(endpoint.try_recv(&mut buf).unwrap().is_none());
        });
    }

    #[test]
    fn readable_then_drain_all_pending() {
        let rt = runtime();
        rt.block_on(async {
            let endpoint = UdpEndpoint::bind(loopback(0), loopback(9)).unwrap();
            let sender = std::net::UdpSocket::bind(loopback(0)).unwrap();
            for i in 0..3u8 {
                sender.send_to(&[i], endpoint.local_addr()).unwrap();
            }

            tokio::time::timeout(Duration::from_secs(2), endpoint.readable())
                .await
                .expect("socket should become readable")
                .unwrap();

            // Give the remaining datagrams time to land in the queue.
            tokio::time::sleep(Duration::from_millis(50)).await;

            let mut buf = [0u8; 16];
            let mut seen = Vec::new();
            while let Some((len, _)) = endpoint.try_recv(&mut buf).unwrap() {
                seen.push(buf[..len].to_vec());
            }
            assert_eq!(seen, vec![vec![0], vec![1], vec![2]]);
        });
    }

    #[test]
    fn bind_conflict_reports_address() {
        let rt = runtime();
        rt.block_on(async {
            let first = UdpEndpoint::bind(loopback(0), loopback(9)).unwrap();
            let taken = first.local_addr();
            let err = UdpEndpoint::bind(taken, loopback(9)).unwrap_err();
            match err {
                TransportError::Bind { addr, .. } => assert_eq!(addr, taken),
                other => panic!("unexpected error: {other}"),
            }
        });
    }

    #[test]
    fn recv_buffer_option_is_applied() {
        let rt = runtime();
        rt.block_on(async {
            let options = BindOptions {
                recv_buffer_size: Some(256 * 1024),
                reuse_address: true,
            };
            let endpoint =
                UdpEndpoint::bind_with_options(loopback(0), loopback(9), &options).unwrap();
            assert_ne!(endpoint.local_addr().port(), 0);
            assert_eq!(endpoint.peer_addr(), loopback(9));
        });
    }
}
