//! Helpers for feeding wire bytes through the framing layer in tests.

use lenframe::{FrameHandler, FrameReader, FramingError};

/// Handler recording every dispatched message plus batch hook firings.
#[derive(Debug, Default)]
pub struct CollectingHandler {
    /// Dispatched message payloads, in order.
    pub messages: Vec<Vec<u8>>,
    /// Number of `begin_batch` invocations.
    pub batches_begun: usize,
    /// Number of `end_batch` invocations.
    pub batches_ended: usize,
}

impl FrameHandler for CollectingHandler {
    fn on_message(&mut self, payload: &[u8]) { self.messages.push(payload.to_vec()); }

    fn begin_batch(&mut self) { self.batches_begun += 1; }

    fn end_batch(&mut self) { self.batches_ended += 1; }
}

/// Encode one length-prefixed frame for `payload`.
///
/// # Panics
///
/// Panics if the payload length exceeds the `u32` range.
#[must_use]
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut wire = Vec::with_capacity(payload.len() + lenframe::MAX_VARINT_LEN);
    let len = u32::try_from(payload.len()).expect("test payload fits a u32 length");
    lenframe::varint::encode_u32(len, &mut wire);
    wire.extend_from_slice(payload);
    wire
}

/// Concatenate the frames for `payloads` into one wire stream.
#[must_use]
pub fn wire_stream(payloads: &[Vec<u8>]) -> Vec<u8> {
    let mut wire = Vec::new();
    for payload in payloads {
        wire.extend_from_slice(&encode_frame(payload));
    }
    wire
}

/// Deliver `stream` to `reader` split into the given chunk sizes.
///
/// Each planned chunk becomes at least one reactor read; a chunk larger
/// than the reader's current writable region is delivered in several reads,
/// as a real reactor would when its receive window outruns the buffer. A
/// zero in the plan is treated as one byte, and once the plan is exhausted
/// the rest of the stream is delivered in one go. Returns the total number
/// of messages dispatched.
///
/// # Errors
///
/// Propagates any [`FramingError`] the reader reports.
///
/// # Panics
///
/// Panics if the reader ever leaves no writable room while bytes remain,
/// which would violate its forward-progress guarantee.
pub fn deliver_chunks<H: FrameHandler>(
    reader: &mut FrameReader,
    handler: &mut H,
    stream: &[u8],
    chunks: &[usize],
) -> Result<usize, FramingError> {
    let mut dispatched = 0;
    let mut rest = stream;
    let mut plan = chunks.iter().copied();
    while !rest.is_empty() {
        let wanted = plan.next().unwrap_or(rest.len()).clamp(1, rest.len());
        let mut offered = 0;
        while offered < wanted {
            let writable = reader.writable();
            assert!(
                !writable.is_empty(),
                "reader made no room for further bytes"
            );
            let step = writable.len().min(wanted - offered);
            writable[..step].copy_from_slice(&rest[offered..offered + step]);
            dispatched += reader.on_readable(step, handler)?;
            offered += step;
        }
        rest = &rest[offered..];
    }
    Ok(dispatched)
}

/// Deliver the whole stream, split only where the buffer requires it.
///
/// # Errors
///
/// Propagates any [`FramingError`] the reader reports.
pub fn deliver<H: FrameHandler>(
    reader: &mut FrameReader,
    handler: &mut H,
    stream: &[u8],
) -> Result<usize, FramingError> {
    deliver_chunks(reader, handler, stream, &[])
}
