use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Thread-safe sample buffer shared by the decoder and the audio output.
/// Pushes never block; the oldest samples are dropped when full.
pub struct CircularBuffer<T> {
    inner: Mutex<VecDeque<T>>,
    capacity: usize,
}

impl<T> CircularBuffer<T> {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        })
    }

    pub fn push_slice(&self, items: &[T])
    where
        T: Clone,
    {
        let mut buf = self.inner.lock();
        for item in items {
            if buf.len() >= self.capacity {
                buf.pop_front();
            }
            buf.push_back(item.clone());
        }
    }

    pub fn try_pop(&self) -> Option<T> {
        self.inner.lock().pop_front()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrites_oldest_when_full() {
        let buffer = CircularBuffer::new(3);
        buffer.push_slice(&[1, 2, 3, 4, 5]);
        assert_eq!(buffer.try_pop(), Some(3));
        assert_eq!(buffer.try_pop(), Some(4));
        assert_eq!(buffer.try_pop(), Some(5));
        assert_eq!(buffer.try_pop(), None);
    }

    #[test]
    fn test_clear() {
        let buffer = CircularBuffer::new(4);
        buffer.push_slice(&[1.0f32, 2.0]);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
