use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// What a blocking [`ResponseQueue::pop`] hands back.
#[derive(Debug, PartialEq, Eq)]
pub enum Dequeued<T> {
    Item(T),
    /// Stop signal: the worker that receives it must exit its loop.
    Shutdown,
}

/// FIFO shared by every dispatch worker.
///
/// Each pushed item is handed to exactly one `pop` caller. Shutdown markers
/// queue behind pending items, so closing the queue lets workers drain what
/// was already enqueued before they stop.
pub struct ResponseQueue<T> {
    slots: Mutex<VecDeque<Dequeued<T>>>,
    available: Condvar,
}

impl<T> ResponseQueue<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Dequeued<T>>> {
        // A panicking pusher cannot leave the deque half-modified.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, item: T) {
        self.lock().push_back(Dequeued::Item(item));
        self.available.notify_one();
    }

    /// Queue one stop signal, ending exactly one worker.
    pub fn push_shutdown(&self) {
        self.lock().push_back(Dequeued::Shutdown);
        self.available.notify_one();
    }

    /// Queue one stop signal per worker.
    pub fn close(&self, workers: usize) {
        {
            let mut slots = self.lock();
            slots.extend((0..workers).map(|_| Dequeued::Shutdown));
        }
        self.available.notify_all();
    }

    /// Block until an item or a stop signal is available.
    pub fn pop(&self) -> Dequeued<T> {
        let mut slots = self.lock();
        loop {
            if let Some(slot) = slots.pop_front() {
                return slot;
            }
            slots = self
                .available
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    #[cfg(test)]
    pub(crate) fn try_pop(&self) -> Option<Dequeued<T>> {
        self.lock().pop_front()
    }

    /// Pending items and stop signals.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T> Default for ResponseQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn single_consumer_sees_fifo_order() {
        let queue = ResponseQueue::new();
        for i in 0..5 {
            queue.push(i);
        }
        queue.push_shutdown();
        let mut seen = Vec::new();
        while let Dequeued::Item(i) = queue.pop() {
            seen.push(i);
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn pop_blocks_until_push() {
        let queue = Arc::new(ResponseQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop())
        };
        thread::sleep(Duration::from_millis(20));
        queue.push("late");
        assert_eq!(consumer.join().expect("consumer"), Dequeued::Item("late"));
    }

    #[test]
    fn close_wakes_every_waiter() {
        let queue: Arc<ResponseQueue<u8>> = Arc::new(ResponseQueue::new());
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.pop())
            })
            .collect();
        queue.close(3);
        for waiter in waiters {
            assert_eq!(waiter.join().expect("waiter"), Dequeued::Shutdown);
        }
    }

    #[test]
    fn shutdown_queues_behind_pending_items() {
        let queue = ResponseQueue::new();
        queue.push(1);
        queue.close(1);
        queue.push(2);
        assert_eq!(queue.try_pop(), Some(Dequeued::Item(1)));
        assert_eq!(queue.try_pop(), Some(Dequeued::Shutdown));
        assert_eq!(queue.len(), 1);
    }
}
