//! Classification of socket-level faults observed by the reactor.
//!
//! The framing layer never decides to disconnect or retry by itself: it
//! classifies what the reactor saw and hands the verdict back. Lifecycle
//! decisions stay with the reactor and whatever retry policy sits above
//! it.

use std::io;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::error::FramingError;

/// A low-level failure the reactor surfaced for one connection.
#[derive(Debug, Error)]
pub enum ConnectionFault {
    /// The connection attempt itself failed.
    #[error("connection attempt failed: {0}")]
    Connect(#[source] io::Error),

    /// An I/O failure on an established connection.
    #[error("i/o failure on established connection: {0}")]
    Io(#[source] io::Error),

    /// The inbound stream violated the framing protocol.
    #[error("protocol failure: {0}")]
    Protocol(#[from] FramingError),
}

/// Outcome of classifying a [`ConnectionFault`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultDisposition {
    /// Log and carry on; connection state is untouched and a higher-level
    /// retry policy decides what happens next.
    Recoverable,
    /// Ask the reactor to tear this connection down.
    Disconnect,
    /// Propagate immediately: a programming error or unrecoverable
    /// condition, not a transient network fault.
    Escalate,
}

impl ConnectionFault {
    /// Map this fault to the action the reactor should take.
    ///
    /// | Fault | Disposition |
    /// |-------|-------------|
    /// | `Connect` | `Recoverable` |
    /// | `Io` | `Disconnect` |
    /// | `Protocol` | `Escalate` |
    #[must_use]
    pub fn disposition(&self) -> FaultDisposition {
        match self {
            Self::Connect(_) => FaultDisposition::Recoverable,
            Self::Io(_) => FaultDisposition::Disconnect,
            Self::Protocol(_) => FaultDisposition::Escalate,
        }
    }

    /// Whether the reactor should tear the connection down.
    #[must_use]
    pub fn should_disconnect(&self) -> bool {
        self.disposition() == FaultDisposition::Disconnect
    }

    /// Category label for logging and metrics.
    #[must_use]
    pub fn fault_type(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::Io(_) => "io",
            Self::Protocol(_) => "protocol",
        }
    }

    /// Log this fault at a severity matching its disposition and return
    /// the disposition.
    ///
    /// Connect failures are routine enough for a warning, disconnects are
    /// expected churn logged at debug, and escalations are errors.
    pub fn report(&self) -> FaultDisposition {
        let disposition = self.disposition();
        match disposition {
            FaultDisposition::Recoverable => warn!(fault = %self, "connection attempt failed"),
            FaultDisposition::Disconnect => debug!(fault = %self, "disconnect-worthy fault"),
            FaultDisposition::Escalate => error!(fault = %self, "unrecoverable fault"),
        }
        disposition
    }
}
