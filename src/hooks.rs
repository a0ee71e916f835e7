//! Callbacks invoked by the frame reader while draining a reactor read.
//!
//! [`FrameHandler`] is the capability a connection type implements to
//! receive framed messages. The batch hooks bracket each reactor read so
//! implementations can amortise per-batch work (flush a collector, publish
//! a window of messages) without tracking reads themselves.

/// Per-connection callbacks invoked by [`FrameReader`](crate::FrameReader).
pub trait FrameHandler {
    /// Called synchronously once per fully framed message.
    ///
    /// `payload` borrows the reader's working buffer and is only valid for
    /// the duration of the call; implementations that need the bytes later
    /// must copy them.
    fn on_message(&mut self, payload: &[u8]);

    /// Called exactly once at the start of each reactor read batch, before
    /// any parsing.
    fn begin_batch(&mut self) {}

    /// Called exactly once when the batch is drained, on every return path
    /// including the fatal ones.
    fn end_batch(&mut self) {}
}

/// Closures work as handlers when the batch hooks are not needed.
impl<F> FrameHandler for F
where
    F: FnMut(&[u8]),
{
    fn on_message(&mut self, payload: &[u8]) { self(payload); }
}
