//! Bounded outbound segment queue connecting frame writers to the reactor.
//!
//! This queue is the only structure in the framing layer shared across
//! threads: any number of producers offer segments through a cloneable
//! [`SendHandle`] while the reactor drains FIFO through [`SendQueue`].
//! Admission is offer-style: it never blocks and fails fast when the queue
//! cannot accept more segments. Below the configured maximum the queue
//! grows on demand, doubling each time; admission is only refused once
//! growth is exhausted.
//!
//! Segments are [`Bytes`] views, so enqueueing a payload shares it rather
//! than copying it.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use bytes::Bytes;
use thiserror::Error;

/// Errors surfaced to producers offering segments.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The queue is full at its maximum capacity.
    ///
    /// This is a flow-control signal, not a failure: nothing was enqueued,
    /// no writer state changed, and the identical call succeeds once the
    /// reactor drains the queue.
    #[error("outbound queue full")]
    QueueFull,

    /// The reactor dropped or closed the consumer half.
    #[error("outbound queue closed")]
    Closed,

    /// The payload length cannot be expressed as a `u32` length prefix.
    #[error("payload of {len} bytes exceeds the framable range")]
    FrameTooLarge {
        /// Requested payload length.
        len: usize,
    },
}

struct Inner {
    segments: VecDeque<Bytes>,
    capacity: usize,
    closed: bool,
}

impl Inner {
    /// Make room for `additional` segments, doubling the capacity up to
    /// `max_capacity`. Returns whether the queue can admit them.
    fn make_room(&mut self, additional: usize, max_capacity: usize) -> bool {
        let needed = self.segments.len().saturating_add(additional);
        while self.capacity < needed && self.capacity < max_capacity {
            self.capacity = self.capacity.saturating_mul(2).min(max_capacity);
        }
        needed <= self.capacity
    }
}

struct Shared {
    inner: Mutex<Inner>,
    max_capacity: usize,
}

impl Shared {
    // A poisoned lock only means another producer panicked mid-offer; the
    // deque itself is still structurally sound, so keep serving.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Create a connected queue pair with `capacity` initial and
/// `max_capacity` maximum segment slots.
///
/// `capacity` is clamped to at least one slot and `max_capacity` to at
/// least `capacity`.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
///
/// let (mut queue, handle) = lenframe::queue::bounded(4, 8);
/// handle.offer(Bytes::from_static(b"hi")).unwrap();
/// assert_eq!(queue.poll(), Some(Bytes::from_static(b"hi")));
/// assert_eq!(queue.poll(), None);
/// ```
#[must_use]
pub fn bounded(capacity: usize, max_capacity: usize) -> (SendQueue, SendHandle) {
    let capacity = capacity.max(1);
    let shared = Arc::new(Shared {
        inner: Mutex::new(Inner {
            segments: VecDeque::with_capacity(capacity),
            capacity,
            closed: false,
        }),
        max_capacity: max_capacity.max(capacity),
    });
    (
        SendQueue {
            shared: Arc::clone(&shared),
        },
        SendHandle { shared },
    )
}

/// Cloneable producer half of the outbound queue.
#[derive(Clone)]
pub struct SendHandle {
    shared: Arc<Shared>,
}

impl SendHandle {
    /// Offer one segment, growing the queue on demand below its maximum.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::QueueFull`] when the queue is full at maximum
    /// capacity and [`SendError::Closed`] when the consumer half is gone.
    pub fn offer(&self, segment: Bytes) -> Result<(), SendError> {
        self.offer_all([segment])
    }

    /// Offer several segments as one all-or-nothing unit, in order.
    ///
    /// Either every segment is admitted, adjacent and in call order, or
    /// none is. This is what keeps a frame's length prefix glued to its
    /// body even with concurrent producers.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::QueueFull`] when the queue cannot admit all
    /// `N` segments and [`SendError::Closed`] when the consumer half is
    /// gone.
    pub fn offer_all<const N: usize>(&self, segments: [Bytes; N]) -> Result<(), SendError> {
        let mut inner = self.shared.lock();
        if inner.closed {
            return Err(SendError::Closed);
        }
        if !inner.make_room(N, self.shared.max_capacity) {
            return Err(SendError::QueueFull);
        }
        inner.segments.extend(segments);
        Ok(())
    }

    /// Fail-fast admission probe for `additional` segments.
    ///
    /// Used by writers to reject a frame before encoding anything. A
    /// successful probe is not a reservation: a concurrent producer can
    /// still win the remaining slots, in which case the subsequent
    /// [`offer_all`](Self::offer_all) reports [`SendError::QueueFull`].
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`offer_all`](Self::offer_all), without
    /// enqueueing anything.
    pub fn can_admit(&self, additional: usize) -> Result<(), SendError> {
        let inner = self.shared.lock();
        if inner.closed {
            return Err(SendError::Closed);
        }
        if inner.segments.len().saturating_add(additional) > self.shared.max_capacity {
            return Err(SendError::QueueFull);
        }
        Ok(())
    }

    /// Number of queued segments.
    #[must_use]
    pub fn len(&self) -> usize { self.shared.lock().segments.len() }

    /// Whether the queue is currently empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Current capacity in segments; grows on demand up to
    /// [`max_capacity`](Self::max_capacity).
    #[must_use]
    pub fn capacity(&self) -> usize { self.shared.lock().capacity }

    /// Fixed maximum capacity in segments.
    #[must_use]
    pub fn max_capacity(&self) -> usize { self.shared.max_capacity }

    /// Free slots at the current capacity.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        let inner = self.shared.lock();
        inner.capacity - inner.segments.len()
    }
}

/// Consumer half of the outbound queue, owned by the reactor.
///
/// The reactor drains segments FIFO and performs the actual transmission,
/// including partial-write retry at the socket layer. Dropping the queue
/// closes it; buffered segments are discarded with the connection.
pub struct SendQueue {
    shared: Arc<Shared>,
}

impl SendQueue {
    /// Take the oldest queued segment, if any.
    pub fn poll(&mut self) -> Option<Bytes> { self.shared.lock().segments.pop_front() }

    /// Number of queued segments.
    #[must_use]
    pub fn len(&self) -> usize { self.shared.lock().segments.len() }

    /// Whether the queue is currently empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Stop accepting offers; already-queued segments remain drainable.
    pub fn close(&mut self) { self.shared.lock().closed = true; }
}

impl Drop for SendQueue {
    fn drop(&mut self) { self.close(); }
}
