//! Error types for the framing layer.
//!
//! Running out of bytes is never an error here: the reader signals "wait
//! for more" through its return value and the writer signals backpressure
//! through [`SendError::QueueFull`](crate::queue::SendError::QueueFull). A
//! [`FramingError`] means the inbound stream can no longer be trusted and
//! the caller should tear the connection down.

use std::io;

use thiserror::Error;

use crate::varint::MalformedVarint;

/// Fatal errors surfaced while decoding the inbound byte stream.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// The length prefix exceeded the maximum varint width without
    /// terminating.
    ///
    /// Framing state is unrecoverable after this: the stream offset of the
    /// next message is unknowable.
    #[error("malformed length prefix: {0}")]
    MalformedLength(#[from] MalformedVarint),
}

impl From<FramingError> for io::Error {
    fn from(err: FramingError) -> Self { io::Error::new(io::ErrorKind::InvalidData, err) }
}
