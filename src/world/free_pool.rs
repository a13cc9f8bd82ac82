//! Pool of cell indices that were free when they were queued.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// Internally synchronized queue of candidate free cells.
///
/// The pool never holds the same index twice. Entries may go stale when a
/// cell is occupied after being queued; the grid skips those on pull.
#[derive(Debug)]
pub(crate) struct FreePool {
    state: Mutex<PoolState>,
}

#[derive(Debug)]
struct PoolState {
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl FreePool {
    /// Build a pool holding every index in `order`, for a grid of `cells` cells.
    pub(crate) fn new(order: Vec<usize>, cells: usize) -> Self {
        let mut queued = vec![false; cells];
        for &index in &order {
            queued[index] = true;
        }
        Self {
            state: Mutex::new(PoolState {
                queue: order.into(),
                queued,
            }),
        }
    }

    /// Queue an index unless it is already queued.
    ///
    /// Returns `true` if the index was added.
    pub(crate) fn offer(&self, index: usize) -> bool {
        let mut state = self.state.lock();
        if state.queued[index] {
            return false;
        }
        state.queued[index] = true;
        state.queue.push_back(index);
        true
    }

    /// Pop the oldest queued index.
    pub(crate) fn poll(&self) -> Option<usize> {
        let mut state = self.state.lock();
        let index = state.queue.pop_front()?;
        state.queued[index] = false;
        Some(index)
    }

    /// Number of queued indices, stale ones included.
    pub(crate) fn len(&self) -> usize {
        self.state.lock().queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_in_queue_order() {
        let pool = FreePool::new(vec![2, 0, 1], 3);
        assert_eq!(pool.poll(), Some(2));
        assert_eq!(pool.poll(), Some(0));
        assert_eq!(pool.poll(), Some(1));
        assert_eq!(pool.poll(), None);
    }

    #[test]
    fn test_offer_deduplicates() {
        let pool = FreePool::new(vec![0], 4);
        assert!(!pool.offer(0));
        assert!(pool.offer(3));
        assert!(!pool.offer(3));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_polled_index_can_be_offered_again() {
        let pool = FreePool::new(vec![1], 2);
        assert_eq!(pool.poll(), Some(1));
        assert!(pool.offer(1));
        assert_eq!(pool.len(), 1);
    }
}
