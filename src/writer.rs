//! Frame writer: length-prepends outgoing payloads onto the outbound
//! queue.
//!
//! Payloads are never copied: each enqueued segment is a [`Bytes`] view of
//! the caller's data. Only the length prefix itself is materialised, into a
//! scratch buffer recycled across calls so steady-state writes amortise one
//! allocation over roughly a thousand frames.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::{
    metrics::{self, Direction},
    queue::{SendError, SendHandle},
    varint::{self, MAX_VARINT_LEN},
};

/// Capacity of the recycled length-prefix scratch buffer in bytes.
pub const PREFIX_SCRATCH_CAPACITY: usize = 4096;

/// Per-connection writer producing the `<varint length><payload>` wire
/// stream.
///
/// May be used from producer threads concurrently with the reactor
/// draining the queue; each writer owns its scratch buffer, so clone the
/// [`SendHandle`] and build one writer per producer.
pub struct FrameWriter {
    handle: SendHandle,
    scratch: BytesMut,
}

impl FrameWriter {
    /// Build a writer that enqueues onto `handle`'s queue.
    #[must_use]
    pub fn new(handle: SendHandle) -> Self {
        Self {
            handle,
            scratch: BytesMut::with_capacity(PREFIX_SCRATCH_CAPACITY),
        }
    }

    /// Frame `payload` and enqueue it: length prefix first, payload view
    /// second.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::QueueFull`] when the queue cannot take both
    /// segments (retry the identical call after the reactor drains; no
    /// state changed), [`SendError::Closed`] when the consumer half is
    /// gone, and [`SendError::FrameTooLarge`] for payloads beyond the
    /// `u32` range.
    pub fn write(&mut self, payload: Bytes) -> Result<(), SendError> {
        let prefix = self.admit_and_encode(payload.len(), 2)?;
        self.handle.offer_all([prefix, payload])?;
        metrics::inc_messages(Direction::Outbound);
        Ok(())
    }

    /// Frame the `len`-byte view of `payload` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` is out of range for `payload`, like
    /// [`Bytes::slice`].
    pub fn write_range(
        &mut self,
        payload: &Bytes,
        offset: usize,
        len: usize,
    ) -> Result<(), SendError> {
        self.write(payload.slice(offset..offset + len))
    }

    /// Frame `first` and `second` as one message: a single length prefix
    /// covering both, then the two payload views in call order.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write), with the queue needing room for
    /// three segments.
    pub fn write_pair(&mut self, first: Bytes, second: Bytes) -> Result<(), SendError> {
        let Some(total) = first.len().checked_add(second.len()) else {
            return Err(SendError::FrameTooLarge { len: usize::MAX });
        };
        let prefix = self.admit_and_encode(total, 3)?;
        self.handle.offer_all([prefix, first, second])?;
        metrics::inc_messages(Direction::Outbound);
        Ok(())
    }

    /// Check queue admission for `segment_count` segments, then encode the
    /// length prefix into the scratch buffer.
    ///
    /// The admission probe runs before anything is encoded so a rejected
    /// write leaves the scratch cursor untouched.
    fn admit_and_encode(&mut self, len: usize, segment_count: usize) -> Result<Bytes, SendError> {
        let Ok(len) = u32::try_from(len) else {
            return Err(SendError::FrameTooLarge { len });
        };
        if let Err(err) = self.handle.can_admit(segment_count) {
            if err == SendError::QueueFull {
                debug!(
                    len,
                    queued = self.handle.len(),
                    capacity = self.handle.capacity(),
                    "outbound queue full, rejecting frame"
                );
                metrics::inc_rejections();
            }
            return Err(err);
        }
        if self.scratch.capacity() < MAX_VARINT_LEN {
            self.scratch = BytesMut::with_capacity(PREFIX_SCRATCH_CAPACITY);
        }
        varint::encode_u32(len, &mut self.scratch);
        Ok(self.scratch.split().freeze())
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
