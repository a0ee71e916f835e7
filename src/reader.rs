//! Frame reader: turns the reactor's chunked byte stream into discrete
//! messages.
//!
//! The reactor fills [`FrameReader::writable`] with freshly received bytes
//! and reports the count through [`FrameReader::on_readable`]; the reader
//! decodes length prefixes incrementally, dispatches every complete message
//! to the handler, and arranges buffer space for whatever is still in
//! flight. Growth only happens when a message provably cannot fit even
//! after compaction, so steady-state memory stays bounded by the configured
//! capacity.

use crate::{
    buffer::ReadBuffer,
    error::FramingError,
    hooks::FrameHandler,
    metrics::{self, Direction},
    varint::{self, MAX_VARINT_LEN},
};

/// Per-connection inbound framing state.
///
/// Owned by the reactor thread; nothing here is shared or locked. The
/// state lives for the whole connection and is discarded wholesale on
/// disconnect.
pub struct FrameReader {
    buffer: ReadBuffer,
    /// Body length of the message currently awaited; zero while awaiting
    /// the next length prefix.
    pending: usize,
}

impl FrameReader {
    /// Build a reader with a working buffer of `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: ReadBuffer::with_capacity(capacity),
            pending: 0,
        }
    }

    /// Live region for the reactor to fill with received bytes.
    ///
    /// Never empty after [`on_readable`](Self::on_readable) returns: the
    /// reader compacts or grows before yielding control whenever the
    /// buffer would otherwise be exhausted.
    pub fn writable(&mut self) -> &mut [u8] { self.buffer.writable() }

    /// The underlying working buffer, for capacity and offset inspection.
    #[must_use]
    pub fn buffer(&self) -> &ReadBuffer { &self.buffer }

    /// Process `len` bytes the reactor just placed at the write offset.
    ///
    /// Fires `begin_batch` once, dispatches every message completed by the
    /// new bytes (possibly none, possibly several), fires `end_batch` on
    /// every return path, and returns the number of messages dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::MalformedLength`] when a length prefix runs
    /// past the maximum varint width; the stream offset of the next
    /// message is unknowable after that, so the caller should tear the
    /// connection down.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the writable region the reactor was given.
    pub fn on_readable<H>(&mut self, len: usize, handler: &mut H) -> Result<usize, FramingError>
    where
        H: FrameHandler,
    {
        self.buffer.advance_write(len);
        handler.begin_batch();

        let mut dispatched = 0;
        loop {
            while self.pending == 0 {
                match varint::decode_u32(self.buffer.unread()) {
                    Ok(Some((size, consumed))) => {
                        self.buffer.advance_read(consumed);
                        if size == 0 {
                            handler.on_message(&[]);
                            metrics::inc_messages(Direction::Inbound);
                            dispatched += 1;
                            continue;
                        }
                        self.pending = size as usize;
                    }
                    Ok(None) => {
                        // A length prefix may be straddling the physical
                        // end of a full buffer; compacting is enough to
                        // make progress, growth would be wasted.
                        if self.buffer.is_full()
                            && self.buffer.read_offset() > self.buffer.capacity() - MAX_VARINT_LEN
                        {
                            self.buffer.compact();
                        }
                        handler.end_batch();
                        return Ok(dispatched);
                    }
                    Err(err) => {
                        handler.end_batch();
                        return Err(FramingError::from(err));
                    }
                }
            }

            if self.buffer.unread_len() >= self.pending {
                handler.on_message(&self.buffer.unread()[..self.pending]);
                metrics::inc_messages(Direction::Inbound);
                self.buffer.advance_read(self.pending);
                self.pending = 0;
                dispatched += 1;
            } else if self.buffer.is_full() {
                if self.pending > self.buffer.capacity() {
                    self.buffer.grow(self.pending);
                } else {
                    self.buffer.compact();
                }
                handler.end_batch();
                return Ok(dispatched);
            } else {
                // Not full, just short on bytes: wait for the next read.
                handler.end_batch();
                return Ok(dispatched);
            }
        }
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
