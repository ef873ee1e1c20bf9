//! service/queue.rs
//! Bounded blocking FIFO connecting producers to exactly one worker.
//!
//! Built on a crossbeam bounded channel: `push` blocks while the queue is
//! full, `pop` blocks while it is empty. Shutdown travels through the queue
//! as its own variant, so no payload value can be mistaken for it.
use std::fmt;

use crossbeam::channel::{bounded, Receiver, Sender};

/// Element type carried by a work queue.
#[derive(Debug)]
pub enum QueueMessage<T> {
    Payload(T),
    Shutdown,
}

/// Returned by `push` once the consumer has exited; hands the payload back.
pub struct QueueClosed<T>(pub T);

impl<T> fmt::Debug for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QueueClosed(..)")
    }
}

impl<T> fmt::Display for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("work queue consumer has exited")
    }
}

/// Create a queue with a fixed `capacity` (at least 1).
pub fn work_queue<T>(capacity: usize) -> (QueueProducer<T>, QueueConsumer<T>) {
    let capacity = capacity.max(1);
    let (tx, rx) = bounded(capacity);
    (QueueProducer { tx, capacity }, QueueConsumer { rx })
}

/// Push side. Clone it for every producing thread.
#[derive(Debug)]
pub struct QueueProducer<T> {
    tx: Sender<QueueMessage<T>>,
    capacity: usize,
}

impl<T> Clone for QueueProducer<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone(), capacity: self.capacity }
    }
}

impl<T> QueueProducer<T> {
    /// Insert at the tail, blocking while the queue is full.
    pub fn push(&self, item: T) -> Result<(), QueueClosed<T>> {
        self.tx.send(QueueMessage::Payload(item)).map_err(|e| match e.into_inner() {
            QueueMessage::Payload(item) => QueueClosed(item),
            QueueMessage::Shutdown => unreachable!("payload send returned a shutdown marker"),
        })
    }

    /// Ask the consumer to exit once it reaches this marker.
    /// Returns `false` if the consumer is already gone.
    pub fn push_shutdown(&self) -> bool {
        self.tx.send(QueueMessage::Shutdown).is_ok()
    }

    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tx.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Pop side, owned by the single worker thread.
pub struct QueueConsumer<T> {
    rx: Receiver<QueueMessage<T>>,
}

impl<T> QueueConsumer<T> {
    /// Remove the head, blocking while the queue is empty.
    /// Every producer being dropped reads as `Shutdown`.
    pub fn pop(&self) -> QueueMessage<T> {
        self.rx.recv().unwrap_or(QueueMessage::Shutdown)
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
