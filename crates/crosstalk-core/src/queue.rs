//! Lock-free SPSC message queue.
//!
//! One queue per direction. Both ends are wait-free: pushing into a full queue
//! drops the message and bumps a counter, popping from an empty queue returns
//! `None`. The only allocation happens in [`message_queue`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};

use crate::envelope::Envelope;
use crate::message::Message;
use crate::{Error, Result};

/// Default slots per direction.
pub const DEFAULT_CAPACITY: usize = 128;

/// Counters shared by both ends of a queue.
#[derive(Debug, Default)]
pub struct QueueStats {
    pushed: AtomicU64,
    dropped: AtomicU64,
    popped: AtomicU64,
}

impl QueueStats {
    /// Messages accepted by the queue.
    #[inline]
    pub fn pushed(&self) -> u64 {
        self.pushed.load(Ordering::Relaxed)
    }

    /// Messages discarded because the queue was full.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn popped(&self) -> u64 {
        self.popped.load(Ordering::Relaxed)
    }

    /// Push attempts, accepted or not.
    #[inline]
    pub fn attempted(&self) -> u64 {
        self.pushed() + self.dropped()
    }
}

/// Producer half. Owned by exactly one thread.
pub struct MessageProducer {
    inner: HeapProd<Envelope>,
    stats: Arc<QueueStats>,
}

impl MessageProducer {
    /// Copy `envelope` into a free slot.
    ///
    /// Returns false (and counts a drop) if the queue is full.
    #[inline]
    pub fn try_push(&mut self, envelope: Envelope) -> bool {
        match self.inner.try_push(envelope) {
            Ok(()) => {
                self.stats.pushed.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Encode and push a message.
    ///
    /// Fails with `PayloadTooLarge` before touching the queue, or `QueueFull`
    /// if the message was dropped.
    #[inline]
    pub fn push(&mut self, message: &Message<'_>) -> Result<()> {
        let envelope = Envelope::encode(message)?;
        if self.try_push(envelope) {
            Ok(())
        } else {
            Err(Error::QueueFull)
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    #[inline]
    pub fn free_slots(&self) -> usize {
        self.inner.vacant_len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity().get()
    }

    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }
}

/// Consumer half. Owned by exactly one thread.
pub struct MessageConsumer {
    inner: HeapCons<Envelope>,
    stats: Arc<QueueStats>,
}

impl MessageConsumer {
    /// Copy out the oldest envelope, or `None` if the queue is empty.
    #[inline]
    pub fn try_pop(&mut self) -> Option<Envelope> {
        let envelope = self.inner.try_pop()?;
        self.stats.popped.fetch_add(1, Ordering::Relaxed);
        Some(envelope)
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.inner.occupied_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Discard everything currently queued. Returns the number discarded.
    pub fn clear(&mut self) -> usize {
        let mut count = 0;
        while self.try_pop().is_some() {
            count += 1;
        }
        count
    }

    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }
}

/// Create a queue with `capacity` slots. Capacity must be a non-zero power of two.
pub fn message_queue(capacity: usize) -> Result<(MessageProducer, MessageConsumer)> {
    if capacity == 0 || !capacity.is_power_of_two() {
        return Err(Error::InvalidConfig(format!(
            "queue capacity {capacity} must be a non-zero power of two"
        )));
    }

    let rb = HeapRb::<Envelope>::new(capacity);
    let (producer, consumer) = rb.split();
    let stats = Arc::new(QueueStats::default());

    Ok((
        MessageProducer {
            inner: producer,
            stats: Arc::clone(&stats),
        },
        MessageConsumer {
            inner: consumer,
            stats,
        },
    ))
}
