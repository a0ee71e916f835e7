//! Connection-level framing configuration.
//!
//! One [`FramingConfig`] describes the working-buffer and outbound-queue
//! sizing for a connection; [`FramingConfig::build`] assembles the
//! connected reader/writer/queue triple the reactor wires to its socket.

use crate::{
    queue::{self, SendQueue},
    reader::FrameReader,
    writer::FrameWriter,
};

/// Default read buffer capacity (64 KiB).
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 64 * 1024;
/// Default initial outbound queue capacity in segments.
pub const DEFAULT_SEND_QUEUE_CAPACITY: usize = 1024;
/// Default maximum outbound queue capacity in segments.
pub const DEFAULT_SEND_QUEUE_MAX_CAPACITY: usize = 32 * 1024;

/// Sizing knobs for one connection's framing state.
///
/// # Examples
///
/// ```
/// use lenframe::FramingConfig;
///
/// let (reader, writer, queue) = FramingConfig::new()
///     .with_read_buffer_capacity(16 * 1024)
///     .with_send_queue_capacity(64)
///     .build();
/// # let _ = (reader, writer, queue);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FramingConfig {
    read_buffer_capacity: usize,
    send_queue_capacity: usize,
    send_queue_max_capacity: usize,
}

impl FramingConfig {
    /// Configuration with the default capacities.
    #[must_use]
    pub fn new() -> Self {
        Self {
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
            send_queue_capacity: DEFAULT_SEND_QUEUE_CAPACITY,
            send_queue_max_capacity: DEFAULT_SEND_QUEUE_MAX_CAPACITY,
        }
    }

    /// Set the working buffer capacity in bytes (clamped to a small
    /// minimum by the buffer itself).
    #[must_use]
    pub fn with_read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.read_buffer_capacity = capacity;
        self
    }

    /// Set the initial outbound queue capacity in segments.
    #[must_use]
    pub fn with_send_queue_capacity(mut self, capacity: usize) -> Self {
        self.send_queue_capacity = capacity;
        self
    }

    /// Set the maximum outbound queue capacity in segments.
    #[must_use]
    pub fn with_send_queue_max_capacity(mut self, capacity: usize) -> Self {
        self.send_queue_max_capacity = capacity;
        self
    }

    /// Configured working buffer capacity in bytes.
    #[must_use]
    pub fn read_buffer_capacity(&self) -> usize { self.read_buffer_capacity }

    /// Configured initial outbound queue capacity in segments.
    #[must_use]
    pub fn send_queue_capacity(&self) -> usize { self.send_queue_capacity }

    /// Configured maximum outbound queue capacity in segments.
    #[must_use]
    pub fn send_queue_max_capacity(&self) -> usize { self.send_queue_max_capacity }

    /// Assemble a reader, a writer, and the queue connecting the writer to
    /// the reactor.
    #[must_use]
    pub fn build(&self) -> (FrameReader, FrameWriter, SendQueue) {
        let (queue, handle) = queue::bounded(self.send_queue_capacity, self.send_queue_max_capacity);
        (
            FrameReader::with_capacity(self.read_buffer_capacity),
            FrameWriter::new(handle),
            queue,
        )
    }
}

impl Default for FramingConfig {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::{
        DEFAULT_READ_BUFFER_CAPACITY,
        DEFAULT_SEND_QUEUE_CAPACITY,
        DEFAULT_SEND_QUEUE_MAX_CAPACITY,
        FramingConfig,
    };

    #[test]
    fn defaults_match_documented_capacities() {
        let config = FramingConfig::default();
        assert_eq!(config.read_buffer_capacity(), DEFAULT_READ_BUFFER_CAPACITY);
        assert_eq!(config.send_queue_capacity(), DEFAULT_SEND_QUEUE_CAPACITY);
        assert_eq!(
            config.send_queue_max_capacity(),
            DEFAULT_SEND_QUEUE_MAX_CAPACITY
        );
    }

    #[test]
    fn build_wires_writer_to_queue() {
        let (reader, mut writer, mut queue) = FramingConfig::new()
            .with_read_buffer_capacity(128)
            .build();
        assert_eq!(reader.buffer().capacity(), 128);

        writer.write(Bytes::from_static(b"hi")).unwrap();
        assert_eq!(queue.poll(), Some(Bytes::from_static(&[0x02])));
        assert_eq!(queue.poll(), Some(Bytes::from_static(b"hi")));
    }
}
