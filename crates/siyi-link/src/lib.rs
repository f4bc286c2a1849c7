//! Worker-owned link to a SIYI gimbal.
//!
//! [`Link::spawn`] starts one worker thread that binds the UDP endpoint and
//! owns it for its whole life. Callers on any thread encode requests through
//! the link and hand the frames to the worker; the worker drains every
//! pending datagram on each readable wakeup, decodes it through the
//! [`DecoderRegistry`](siyi_message::DecoderRegistry) and fans the result
//! out to subscribers as [`LinkEvent`]s.
//!
//! Nothing here is fatal. Bad datagrams are logged and dropped, send
//! failures are logged and swallowed, and a failed bind leaves the link in
//! [`LinkState::Failed`] where sends report [`LinkError::NotConnected`]
//! until [`Link::rebind`] succeeds.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod link;

pub use config::{LinkConfig, DEFAULT_MAX_DATAGRAM_SIZE};
pub use dispatch::{Dispatcher, LinkEvent};
pub use error::{LinkError, Result};
pub use link::{Link, LinkState};
