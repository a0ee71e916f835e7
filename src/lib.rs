//! Length-prepended message framing for non-blocking socket clients.
//!
//! `lenframe` turns an arbitrarily chunked inbound byte stream into
//! discrete messages and turns outgoing payloads into a length-prefixed
//! byte stream, sharing one working buffer per connection. The wire format
//! is `<varint length><payload>` repeated; no delimiter, checksum, or
//! version byte beyond the prefix.
//!
//! The reactor that owns the socket performs all actual I/O and calls into
//! this layer at two points: it fills [`FrameReader::writable`] and reports
//! received bytes through [`FrameReader::on_readable`], and it drains
//! [`SendQueue::poll`] to transmit what writers queued. Faults the reactor
//! observes are classified by [`ConnectionFault`]; lifecycle decisions stay
//! with the reactor.

pub mod buffer;
pub mod config;
pub mod error;
pub mod fault;
pub mod hooks;
pub mod metrics;
pub mod queue;
pub mod reader;
pub mod varint;
pub mod writer;

pub use buffer::ReadBuffer;
pub use config::FramingConfig;
pub use error::FramingError;
pub use fault::{ConnectionFault, FaultDisposition};
pub use hooks::FrameHandler;
pub use queue::{SendError, SendHandle, SendQueue, bounded};
pub use reader::FrameReader;
pub use varint::MAX_VARINT_LEN;
pub use writer::FrameWriter;
