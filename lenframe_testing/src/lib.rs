//! Utilities for driving a [`FrameReader`](lenframe::FrameReader) with
//! arbitrarily chunked byte streams during tests.
//!
//! These helpers honour the reactor contract (bytes are copied into the
//! reader's live writable region and reported through `on_readable`, never
//! past the physical end of the buffer), so tests can split a wire stream
//! at any byte boundary and still exercise the real delivery path.
//!
//! ```rust
//! use lenframe::FrameReader;
//! use lenframe_testing::{CollectingHandler, deliver, wire_stream};
//!
//! let mut reader = FrameReader::with_capacity(64);
//! let mut handler = CollectingHandler::default();
//! let wire = wire_stream(&[b"hello".to_vec()]);
//! deliver(&mut reader, &mut handler, &wire).unwrap();
//! assert_eq!(handler.messages, vec![b"hello".to_vec()]);
//! ```

pub mod helpers;
pub mod logging;

pub use helpers::{CollectingHandler, deliver, deliver_chunks, encode_frame, wire_stream};
pub use logging::{LoggerHandle, logger};
