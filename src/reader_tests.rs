//! Unit tests for the frame reader dispatch loop.

use rstest::rstest;

use super::FrameReader;
use crate::{error::FramingError, hooks::FrameHandler};

#[derive(Default)]
struct Collector {
    messages: Vec<Vec<u8>>,
    batches_begun: usize,
    batches_ended: usize,
}

impl FrameHandler for Collector {
    fn on_message(&mut self, payload: &[u8]) { self.messages.push(payload.to_vec()); }

    fn begin_batch(&mut self) { self.batches_begun += 1; }

    fn end_batch(&mut self) { self.batches_ended += 1; }
}

/// Copy `bytes` into the live buffer and report them as one reactor read.
fn feed(
    reader: &mut FrameReader,
    handler: &mut Collector,
    bytes: &[u8],
) -> Result<usize, FramingError> {
    let writable = reader.writable();
    assert!(
        writable.len() >= bytes.len(),
        "test chunk exceeds buffer room"
    );
    writable[..bytes.len()].copy_from_slice(bytes);
    reader.on_readable(bytes.len(), handler)
}

#[test]
fn message_split_across_two_reads_dispatches_once() {
    let mut reader = FrameReader::with_capacity(64);
    let mut handler = Collector::default();

    assert_eq!(feed(&mut reader, &mut handler, &[0x02, b'a']).unwrap(), 0);
    assert!(handler.messages.is_empty());

    assert_eq!(feed(&mut reader, &mut handler, &[b'b']).unwrap(), 1);
    assert_eq!(handler.messages, vec![b"ab".to_vec()]);
    assert_eq!(handler.batches_begun, 2);
    assert_eq!(handler.batches_ended, 2);
}

#[test]
fn drains_every_complete_message_in_one_read() {
    let mut reader = FrameReader::with_capacity(64);
    let mut handler = Collector::default();

    let wire = [0x01, b'x', 0x02, b'y', b'z', 0x00];
    assert_eq!(feed(&mut reader, &mut handler, &wire).unwrap(), 3);
    assert_eq!(
        handler.messages,
        vec![b"x".to_vec(), b"yz".to_vec(), Vec::new()]
    );
    assert_eq!(handler.batches_begun, 1);
    assert_eq!(handler.batches_ended, 1);
}

#[test]
fn five_byte_prefix_delivered_byte_by_byte() {
    let mut reader = FrameReader::with_capacity(64);
    let mut handler = Collector::default();

    // Non-canonical zero spelled in the full five-byte form.
    for byte in [0x80, 0x80, 0x80, 0x80] {
        assert_eq!(feed(&mut reader, &mut handler, &[byte]).unwrap(), 0);
    }
    assert_eq!(feed(&mut reader, &mut handler, &[0x00]).unwrap(), 1);
    assert_eq!(handler.messages, vec![Vec::new()]);
}

#[test]
fn prefix_straddling_buffer_end_compacts_instead_of_stalling() {
    let mut reader = FrameReader::with_capacity(64);
    let mut handler = Collector::default();

    // Fill and consume 61 bytes so the unconsumed tail sits at the end.
    let mut first = vec![0x3c];
    first.extend_from_slice(&[b'f'; 60]);
    assert_eq!(feed(&mut reader, &mut handler, &first).unwrap(), 1);
    assert_eq!(reader.buffer().read_offset(), 61);

    // Three bytes of an unfinished prefix exhaust the buffer; the reader
    // must compact so the remaining prefix bytes have room to arrive.
    assert_eq!(feed(&mut reader, &mut handler, &[0x85, 0x80, 0x80]).unwrap(), 0);
    assert_eq!(reader.buffer().capacity(), 64);
    assert_eq!(reader.buffer().read_offset(), 0);
    assert_eq!(reader.buffer().write_offset(), 3);

    let mut rest = vec![0x00];
    rest.extend_from_slice(b"hello");
    assert_eq!(feed(&mut reader, &mut handler, &rest).unwrap(), 1);
    assert_eq!(handler.messages[1], b"hello".to_vec());
}

#[rstest]
#[case(100, 128)]
#[case(129, 256)]
fn grows_for_bodies_larger_than_the_buffer(#[case] body_len: usize, #[case] expected: usize) {
    let mut reader = FrameReader::with_capacity(64);
    let mut handler = Collector::default();

    let mut wire = Vec::new();
    crate::varint::encode_u32(u32::try_from(body_len).unwrap(), &mut wire);
    wire.extend_from_slice(&vec![0xaa; body_len]);

    assert_eq!(feed(&mut reader, &mut handler, &wire[..64]).unwrap(), 0);
    assert_eq!(reader.buffer().capacity(), expected);
    assert_eq!(reader.buffer().read_offset(), 0);

    assert_eq!(feed(&mut reader, &mut handler, &wire[64..]).unwrap(), 1);
    assert_eq!(handler.messages, vec![vec![0xaa; body_len]]);
}

#[test]
fn compacts_when_body_fits_current_capacity() {
    let mut reader = FrameReader::with_capacity(64);
    let mut handler = Collector::default();

    // 64-byte body: one byte short after the prefix fills the buffer.
    let mut wire = vec![0x40];
    wire.extend_from_slice(&[b'q'; 64]);
    assert_eq!(feed(&mut reader, &mut handler, &wire[..64]).unwrap(), 0);
    assert_eq!(reader.buffer().capacity(), 64);
    assert_eq!(reader.buffer().write_offset(), 63);

    assert_eq!(feed(&mut reader, &mut handler, &wire[64..]).unwrap(), 1);
    assert_eq!(handler.messages, vec![vec![b'q'; 64]]);
}

#[test]
fn short_body_waits_for_more_bytes() {
    let mut reader = FrameReader::with_capacity(64);
    let mut handler = Collector::default();

    assert_eq!(feed(&mut reader, &mut handler, &[0x05, b'a']).unwrap(), 0);
    assert!(handler.messages.is_empty());
    assert_eq!(handler.batches_begun, 1);
    assert_eq!(handler.batches_ended, 1);
}

#[test]
fn unterminated_prefix_is_fatal_and_still_ends_the_batch() {
    let mut reader = FrameReader::with_capacity(64);
    let mut handler = Collector::default();

    let err = feed(&mut reader, &mut handler, &[0x80; 5]).unwrap_err();
    assert!(matches!(err, FramingError::MalformedLength(_)));
    assert_eq!(handler.batches_begun, 1);
    assert_eq!(handler.batches_ended, 1);
}

#[test]
fn closures_work_as_handlers() {
    let mut reader = FrameReader::with_capacity(64);
    let mut seen = Vec::new();
    let mut handler = |payload: &[u8]| seen.push(payload.to_vec());

    let writable = reader.writable();
    writable[..3].copy_from_slice(&[0x02, b'h', b'i']);
    assert_eq!(reader.on_readable(3, &mut handler).unwrap(), 1);
    assert_eq!(seen, vec![b"hi".to_vec()]);
}
