use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread::JoinHandle;

use bytes::{Bytes, BytesMut};
use siyi_frame::{Command, FrameEncoder, Request, MIN_FRAME_SIZE};
use siyi_message::DecoderRegistry;
use siyi_transport::UdpEndpoint;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::config::LinkConfig;
use crate::dispatch::{Dispatcher, LinkEvent};
use crate::error::{LinkError, Result};

/// Bind state of the link endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LinkState {
    /// The worker has not attempted a bind yet.
    Unbound = 0,
    /// The endpoint is bound and receiving.
    Bound = 1,
    /// The last bind attempt failed. Sends report [`LinkError::NotConnected`].
    Failed = 2,
}

impl LinkState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => LinkState::Bound,
            2 => LinkState::Failed,
            _ => LinkState::Unbound,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LinkState::Unbound => "unbound",
            LinkState::Bound => "bound",
            LinkState::Failed => "failed",
        }
    }
}

type BindReply = std::result::Result<SocketAddr, LinkError>;

enum WorkerCommand {
    Send(Bytes),
    Subscribe(std_mpsc::Sender<LinkEvent>),
    Rebind(oneshot::Sender<BindReply>),
    Shutdown,
}

/// Handle to the link worker.
///
/// Cheap to call from any thread: encoding happens on the caller, and the
/// finished frame is queued to the worker. Dropping the handle shuts the
/// worker down and closes the socket.
pub struct Link {
    commands: mpsc::UnboundedSender<WorkerCommand>,
    state: Arc<AtomicU8>,
    encoder: FrameEncoder,
    config: LinkConfig,
    local_addr: Option<SocketAddr>,
    worker: Option<JoinHandle<()>>,
}

impl Link {
    /// Start the worker thread and bind the endpoint.
    ///
    /// Returns once the first bind attempt has finished. A failed bind is not
    /// an error here: the link comes up in [`LinkState::Failed`] and logs a
    /// warning. Only failing to start the worker itself is an error.
    pub fn spawn(config: LinkConfig, registry: DecoderRegistry) -> Result<Self> {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);
        let state = Arc::new(AtomicU8::new(LinkState::Unbound as u8));

        let worker = Worker {
            config: config.clone(),
            endpoint: None,
            dispatcher: Dispatcher::new(registry),
            state: Arc::clone(&state),
            buf: vec![0u8; config.max_datagram_size],
        };

        let handle = std::thread::Builder::new()
            .name("siyi-link".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_io()
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        worker.set_state(LinkState::Failed);
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                runtime.block_on(worker.run(commands_rx, ready_tx));
            })
            .map_err(LinkError::Spawn)?;

        let local_addr = match ready_rx.recv() {
            Ok(Ok(local_addr)) => local_addr,
            Ok(Err(err)) => {
                let _ = handle.join();
                return Err(LinkError::Spawn(err));
            }
            Err(_) => {
                let _ = handle.join();
                return Err(LinkError::Shutdown);
            }
        };

        Ok(Self {
            commands: commands_tx,
            state,
            encoder: FrameEncoder::new(),
            config,
            local_addr,
            worker: Some(handle),
        })
    }

    /// Encode `request` with the next sequence number and queue it.
    ///
    /// Returns the sequence number the frame carries. Delivery is best
    /// effort: a send that fails on the socket is logged by the worker and
    /// not reported here.
    pub fn send(&self, request: &Request) -> Result<u16> {
        self.ensure_connected(request.command())?;
        let payload = request.payload();
        let mut buf = BytesMut::with_capacity(MIN_FRAME_SIZE + payload.len());
        let sequence = self
            .encoder
            .encode_into(request.command(), &payload, &mut buf);
        trace!(
            command = request.command().name(),
            sequence,
            "queueing request"
        );
        self.submit(WorkerCommand::Send(buf.freeze()))?;
        Ok(sequence)
    }

    /// Queue an already encoded frame.
    pub fn send_frame(&self, frame: Bytes) -> Result<()> {
        self.ensure_connected(Command::Unknown)?;
        self.submit(WorkerCommand::Send(frame))
    }

    /// Receive every response decoded from now on.
    pub fn subscribe(&self) -> Result<std_mpsc::Receiver<LinkEvent>> {
        let (tx, rx) = std_mpsc::channel();
        self.submit(WorkerCommand::Subscribe(tx))?;
        Ok(rx)
    }

    /// Drop the current endpoint and bind again.
    ///
    /// Blocks until the worker has tried. Must not be called from inside a
    /// tokio runtime.
    pub fn rebind(&mut self) -> Result<SocketAddr> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.submit(WorkerCommand::Rebind(reply_tx))?;
        let reply = reply_rx.blocking_recv().map_err(|_| LinkError::Shutdown)?;
        self.local_addr = reply.as_ref().ok().copied();
        reply
    }

    pub fn state(&self) -> LinkState {
        LinkState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_connected(&self) -> bool {
        self.state() == LinkState::Bound
    }

    /// The bound local address, `None` when the bind failed.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.config.peer_addr
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// The sequence number the next request will carry.
    pub fn next_sequence(&self) -> u16 {
        self.encoder.next_sequence()
    }

    /// Stop the worker and close the socket.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = self.commands.send(WorkerCommand::Shutdown);
            if handle.join().is_err() {
                warn!("link worker panicked");
            }
        }
    }

    fn ensure_connected(&self, command: Command) -> Result<()> {
        if self.state() == LinkState::Failed {
            warn!(
                command = command.name(),
                peer = %self.config.peer_addr,
                "not connected to camera, dropping request"
            );
            return Err(LinkError::NotConnected);
        }
        Ok(())
    }

    fn submit(&self, command: WorkerCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| LinkError::Shutdown)
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("state", &self.state())
            .field("local_addr", &self.local_addr)
            .field("peer_addr", &self.config.peer_addr)
            .finish()
    }
}

enum Wake {
    Command(Option<WorkerCommand>),
    Readable(siyi_transport::Result<()>),
}

struct Worker {
    config: LinkConfig,
    endpoint: Option<UdpEndpoint>,
    dispatcher: Dispatcher,
    state: Arc<AtomicU8>,
    buf: Vec<u8>,
}

impl Worker {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<WorkerCommand>,
        ready: std_mpsc::SyncSender<std::io::Result<Option<SocketAddr>>>,
    ) {
        let _ = ready.send(Ok(self.bind().ok()));

        loop {
            let wake = match &self.endpoint {
                Some(endpoint) => tokio::select! {
                    command = commands.recv() => Wake::Command(command),
                    readable = endpoint.readable() => Wake::Readable(readable),
                },
                None => Wake::Command(commands.recv().await),
            };

            match wake {
                Wake::Readable(Ok(())) => self.drain(),
                Wake::Readable(Err(err)) => {
                    warn!(error = %err, "waiting for datagrams failed");
                }
                Wake::Command(Some(WorkerCommand::Send(frame))) => self.send(&frame).await,
                Wake::Command(Some(WorkerCommand::Subscribe(subscriber))) => {
                    self.dispatcher.subscribe(subscriber);
                }
                Wake::Command(Some(WorkerCommand::Rebind(reply))) => {
                    self.endpoint = None;
                    let _ = reply.send(self.bind());
                }
                Wake::Command(Some(WorkerCommand::Shutdown)) | Wake::Command(None) => break,
            }
        }

        self.endpoint = None;
        info!(peer = %self.config.peer_addr, "link worker stopped");
    }

    fn bind(&mut self) -> BindReply {
        match UdpEndpoint::bind_with_options(
            self.config.local_addr,
            self.config.peer_addr,
            &self.config.bind_options(),
        ) {
            Ok(endpoint) => {
                let local_addr = endpoint.local_addr();
                self.endpoint = Some(endpoint);
                self.set_state(LinkState::Bound);
                Ok(local_addr)
            }
            Err(err) => {
                warn!(
                    local = %self.config.local_addr,
                    error = %err,
                    "failed to bind camera link"
                );
                self.set_state(LinkState::Failed);
                Err(err.into())
            }
        }
    }

    /// Handle every datagram currently queued on the socket.
    fn drain(&mut self) {
        let Some(endpoint) = self.endpoint.as_ref() else {
            return;
        };

        let mut handled = 0usize;
        loop {
            match endpoint.try_recv(&mut self.buf) {
                Ok(Some((len, from))) => {
                    handled += 1;
                    if from != self.config.peer_addr {
                        trace!(%from, "datagram from unexpected sender");
                    }
                    let _ = self.dispatcher.handle_datagram(&self.buf[..len]);
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "receive failed");
                    break;
                }
            }
        }
        if handled > 0 {
            trace!(handled, "drained pending datagrams");
        }
    }

    async fn send(&self, frame: &[u8]) {
        match &self.endpoint {
            Some(endpoint) => {
                if let Err(err) = endpoint.send(frame).await {
                    warn!(error = %err, len = frame.len(), "failed to send datagram");
                }
            }
            None => {
                debug!(len = frame.len(), "dropping queued frame, endpoint not bound");
            }
        }
    }

    fn set_state(&self, state: LinkState) {
        self.state.store(state as u8, Ordering::Release);
    }
}
