//! Little-endian base-128 varint encoding for frame lengths.
//!
//! Each byte carries seven value bits with the high bit as a continuation
//! flag, so a `u32` length occupies at most [`MAX_VARINT_LEN`] bytes on the
//! wire. Decoding is incremental: when the available bytes end before a
//! terminating byte, nothing is consumed and the caller retries once more
//! data arrives.

use bytes::BufMut;
use thiserror::Error;

/// Maximum number of bytes a `u32` varint may occupy on the wire.
///
/// This bound is load-bearing for the reader's boundary handling: an
/// undecodable length prefix can only straddle the end of a full buffer
/// when the unconsumed tail is shorter than this.
pub const MAX_VARINT_LEN: usize = 5;

/// A length prefix whose fifth byte still has the continuation bit set.
///
/// Five bytes cover the full 32-bit range, so a fifth continuation byte can
/// only mean the stream is corrupt.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("varint not terminated after {MAX_VARINT_LEN} bytes: {bytes:02x?}")]
pub struct MalformedVarint {
    /// The offending prefix bytes, kept for diagnostics.
    pub bytes: [u8; MAX_VARINT_LEN],
}

/// Attempt to decode a `u32` from the front of `src`.
///
/// Returns `Ok(Some((value, consumed)))` on success and `Ok(None)` when
/// `src` ends before a terminating byte; in the latter case nothing is
/// consumed, so the call is idempotent and safe to retry.
///
/// Non-canonical encodings (a value padded with redundant continuation
/// bytes) decode to their value.
///
/// # Errors
///
/// Returns [`MalformedVarint`] if the encoding exceeds [`MAX_VARINT_LEN`]
/// bytes without terminating.
pub fn decode_u32(src: &[u8]) -> Result<Option<(u32, usize)>, MalformedVarint> {
    let mut value: u32 = 0;
    for (index, &byte) in src.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= u32::from(byte & 0x7f) << (7 * index);
        if byte & 0x80 == 0 {
            return Ok(Some((value, index + 1)));
        }
    }
    if src.len() < MAX_VARINT_LEN {
        return Ok(None);
    }
    let mut bytes = [0u8; MAX_VARINT_LEN];
    bytes.copy_from_slice(&src[..MAX_VARINT_LEN]);
    Err(MalformedVarint { bytes })
}

/// Append the varint encoding of `value` to `dst`.
///
/// Returns the number of bytes written (1 through [`MAX_VARINT_LEN`]).
pub fn encode_u32(mut value: u32, dst: &mut impl BufMut) -> usize {
    let mut written = 0;
    loop {
        written += 1;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "masked to seven bits before the cast"
        )]
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            dst.put_u8(byte);
            return written;
        }
        dst.put_u8(byte | 0x80);
    }
}

/// Number of bytes [`encode_u32`] writes for `value`.
#[must_use]
pub fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x001f_ffff => 3,
        0x0020_0000..=0x0fff_ffff => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    //! Boundary and corruption tests for the varint codec.

    use rstest::rstest;

    use super::{MAX_VARINT_LEN, decode_u32, encode_u32, encoded_len};

    #[rstest]
    #[case(0, vec![0x00])]
    #[case(1, vec![0x01])]
    #[case(127, vec![0x7f])]
    #[case(128, vec![0x80, 0x01])]
    #[case(16_383, vec![0xff, 0x7f])]
    #[case(16_384, vec![0x80, 0x80, 0x01])]
    #[case(2_097_151, vec![0xff, 0xff, 0x7f])]
    #[case(2_097_152, vec![0x80, 0x80, 0x80, 0x01])]
    #[case(268_435_455, vec![0xff, 0xff, 0xff, 0x7f])]
    #[case(268_435_456, vec![0x80, 0x80, 0x80, 0x80, 0x01])]
    #[case(u32::MAX, vec![0xff, 0xff, 0xff, 0xff, 0x0f])]
    fn encodes_boundary_values(#[case] value: u32, #[case] expected: Vec<u8>) {
        let mut wire = Vec::new();
        let written = encode_u32(value, &mut wire);
        assert_eq!(wire, expected);
        assert_eq!(written, expected.len());
        assert_eq!(encoded_len(value), expected.len());
    }

    #[rstest]
    #[case(vec![0x00], 0)]
    #[case(vec![0x7f], 127)]
    #[case(vec![0x80, 0x01], 128)]
    #[case(vec![0xff, 0xff, 0xff, 0xff, 0x0f], u32::MAX)]
    fn decodes_boundary_values(#[case] wire: Vec<u8>, #[case] expected: u32) {
        let decoded = decode_u32(&wire).expect("well-formed varint");
        assert_eq!(decoded, Some((expected, wire.len())));
    }

    #[test]
    fn round_trips_every_width() {
        for value in [0, 1, 127, 128, 16_384, 2_097_152, 268_435_456, u32::MAX] {
            let mut wire = Vec::new();
            encode_u32(value, &mut wire);
            assert_eq!(decode_u32(&wire).unwrap(), Some((value, wire.len())));
        }
    }

    #[test]
    fn incomplete_prefixes_consume_nothing() {
        let mut wire = Vec::new();
        encode_u32(268_435_456, &mut wire);
        for cut in 0..wire.len() {
            assert_eq!(decode_u32(&wire[..cut]).unwrap(), None, "cut at {cut}");
        }
    }

    #[test]
    fn non_canonical_zero_decodes() {
        let wire = [0x80, 0x80, 0x80, 0x80, 0x00];
        assert_eq!(decode_u32(&wire).unwrap(), Some((0, MAX_VARINT_LEN)));
    }

    #[test]
    fn fifth_continuation_byte_is_malformed() {
        let wire = [0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let err = decode_u32(&wire).unwrap_err();
        assert_eq!(err.bytes, [0x80, 0x80, 0x80, 0x80, 0x80]);
    }

    #[test]
    fn trailing_bytes_are_left_alone() {
        let wire = [0x02, b'a', b'b'];
        assert_eq!(decode_u32(&wire).unwrap(), Some((2, 1)));
    }
}
