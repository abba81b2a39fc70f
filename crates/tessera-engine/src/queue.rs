//! Unbounded multi-producer queue used at every thread crossing.
//!
//! Order is preserved per producer thread; there is no global order across
//! producers. There is no capacity limit and no backpressure: a producer that
//! outpaces the consumer grows the queue until memory runs out.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Concurrent queue with a non-blocking pop.
///
/// Both channel halves live in the same value, so the channel can never become
/// disconnected and `push` cannot fail.
#[derive(Debug)]
pub struct ConcurrentQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> ConcurrentQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Appends `item`. Never blocks.
    pub fn push(&self, item: T) {
        if self.tx.send(item).is_err() {
            // Unreachable: `self.rx` keeps the channel connected.
            log::error!("concurrent queue disconnected; item dropped");
        }
    }

    /// Removes and returns one item, or `None` when the queue is empty.
    pub fn try_pop(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Snapshot of the number of queued items.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn empty_pop_returns_none() {
        let q: ConcurrentQueue<u32> = ConcurrentQueue::new();
        assert_eq!(q.try_pop(), None);
        assert!(q.is_empty());
        // No side effects on empty.
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn single_producer_is_fifo() {
        let q = ConcurrentQueue::new();
        for i in 0..10 {
            q.push(i);
        }
        assert_eq!(q.len(), 10);
        let drained: Vec<_> = std::iter::from_fn(|| q.try_pop()).collect();
        assert_eq!(drained, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn per_producer_order_survives_interleaving() {
        let q = Arc::new(ConcurrentQueue::new());
        let producers: Vec<_> = (0..4u32)
            .map(|p| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    for i in 0..500u32 {
                        q.push((p, i));
                    }
                })
            })
            .collect();
        for h in producers {
            h.join().unwrap();
        }

        let mut next = [0u32; 4];
        while let Some((p, i)) = q.try_pop() {
            assert_eq!(i, next[p as usize], "producer {p} out of order");
            next[p as usize] += 1;
        }
        assert_eq!(next, [500; 4]);
    }
}
