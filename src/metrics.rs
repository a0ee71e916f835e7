//! Metric helpers for `lenframe`.
//!
//! This module defines metric names and simple helper functions wrapping
//! the [`metrics`](https://docs.rs/metrics) crate. Without the `metrics`
//! feature every helper compiles to a no-op so call sites stay
//! unconditional.

/// Name of the counter tracking framed messages by direction.
pub const MESSAGES_TOTAL: &str = "lenframe_messages_total";
/// Name of the counter tracking writes rejected by backpressure.
pub const BACKPRESSURE_REJECTIONS_TOTAL: &str = "lenframe_backpressure_rejections_total";
/// Name of the counter tracking read-buffer reallocations by kind.
pub const BUFFER_REALLOCATIONS_TOTAL: &str = "lenframe_buffer_reallocations_total";

/// Direction of message flow.
#[derive(Clone, Copy, Debug)]
pub enum Direction {
    /// Messages decoded from the inbound stream.
    Inbound,
    /// Messages framed for transmission.
    Outbound,
}

impl Direction {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Kind of read-buffer reallocation.
#[derive(Clone, Copy, Debug)]
pub enum Reallocation {
    /// Same-capacity reallocation reclaiming consumed space.
    Compact,
    /// Capacity increase for a message larger than the buffer.
    Grow,
}

impl Reallocation {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Reallocation::Compact => "compact",
            Reallocation::Grow => "grow",
        }
    }
}

/// Record a framed message for the given direction.
#[cfg(feature = "metrics")]
pub fn inc_messages(direction: Direction) {
    metrics::counter!(MESSAGES_TOTAL, "direction" => direction.as_str()).increment(1);
}

/// Record a framed message for the given direction.
#[cfg(not(feature = "metrics"))]
pub fn inc_messages(_direction: Direction) {}

/// Record a write rejected because the outbound queue was full.
#[cfg(feature = "metrics")]
pub fn inc_rejections() { metrics::counter!(BACKPRESSURE_REJECTIONS_TOTAL).increment(1); }

/// Record a write rejected because the outbound queue was full.
#[cfg(not(feature = "metrics"))]
pub fn inc_rejections() {}

/// Record a read-buffer reallocation of the given kind.
#[cfg(feature = "metrics")]
pub fn inc_reallocations(kind: Reallocation) {
    metrics::counter!(BUFFER_REALLOCATIONS_TOTAL, "kind" => kind.as_str()).increment(1);
}

/// Record a read-buffer reallocation of the given kind.
#[cfg(not(feature = "metrics"))]
pub fn inc_reallocations(_kind: Reallocation) {}
