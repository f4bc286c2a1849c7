use std::sync::mpsc::Sender;

use serde::Serialize;
use siyi_frame::{decode_frame, Command, FrameError};
use siyi_message::{DecoderRegistry, MessageError, Response};
use tracing::{debug, trace, warn};

use crate::error::{LinkError, Result};

/// A decoded response delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkEvent {
    pub response: Response,
    pub command: Command,
    /// Sequence number the camera stamped on the response frame.
    pub sequence: u16,
}

/// Decodes datagrams and fans the results out to subscribers.
///
/// Runs synchronously on the link worker: a slow subscriber delays the
/// datagrams behind it in the same drain pass. Subscribers whose receiver
/// has been dropped are pruned on the next delivery.
pub struct Dispatcher {
    registry: DecoderRegistry,
    subscribers: Vec<Sender<LinkEvent>>,
}

impl Dispatcher {
    pub fn new(registry: DecoderRegistry) -> Self {
        Self {
            registry,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: Sender<LinkEvent>) {
        self.subscribers.push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    /// Decode one datagram into an event without delivering it.
    pub fn decode(&self, datagram: &[u8]) -> Result<LinkEvent> {
        let frame = decode_frame(datagram)?;
        let response = self.registry.decode_frame(&frame)?;
        Ok(LinkEvent {
            response,
            command: frame.command,
            sequence: frame.sequence,
        })
    }

    /// Decode one datagram and deliver it to every live subscriber.
    ///
    /// Returns the number of subscribers reached. Failures are logged here,
    /// one message per failure class, and returned for the caller to drop.
    pub fn handle_datagram(&mut self, datagram: &[u8]) -> Result<usize> {
        let event = match self.decode(datagram) {
            Ok(event) => event,
            Err(err) => {
                log_dropped(datagram, &err);
                return Err(err);
            }
        };

        debug!(
            command = event.command.name(),
            sequence = event.sequence,
            "decoded response"
        );

        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
        Ok(self.subscribers.len())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

fn log_dropped(datagram: &[u8], err: &LinkError) {
    trace!(datagram = %hex::encode(datagram), "dropped datagram contents");
    match err {
        LinkError::Frame(FrameError::ChecksumMismatch { received, computed }) => warn!(
            received = format_args!("0x{received:04x}"),
            computed = format_args!("0x{computed:04x}"),
            len = datagram.len(),
            "dropping datagram: checksum mismatch"
        ),
        LinkError::Frame(err) => {
            warn!(len = datagram.len(), error = %err, "dropping malformed datagram")
        }
        LinkError::Message(MessageError::NoDecoder(command)) => warn!(
            command = command.name(),
            command_id = format_args!("0x{:02x}", datagram.get(7).copied().unwrap_or(0)),
            "dropping frame: no decoder registered"
        ),
        LinkError::Message(err) => {
            warn!(error = %err, "dropping frame: payload did not decode")
        }
        other => debug!(error = %other, "dropping datagram"),
    }
}
