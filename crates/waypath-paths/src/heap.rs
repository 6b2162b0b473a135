//! Indexable binary heap used as the A* open set.
//!
//! Unlike [`std::collections::BinaryHeap`], every key knows its own slot in
//! the heap array. That makes membership an O(1) identity check and lets a
//! key be re-sifted in place after its priority changed, which is what A*
//! relaxation needs.

use std::cmp::Ordering;

use thiserror::Error;

/// Per-key bookkeeping the heap relies on.
///
/// The heap only stores keys; the slot index and the priority of each key
/// live with the caller (for A*, in the graph's score table).
pub trait HeapStore<K> {
    /// Current slot of `item` in the heap array.
    fn heap_index(&self, item: K) -> usize;

    /// Record that `item` now sits at `index`.
    fn set_heap_index(&mut self, item: K, index: usize);

    /// Compare two keys. `Greater` means `a` belongs closer to the root.
    fn compare(&self, a: K, b: K) -> Ordering;
}

/// Errors reported by [`PriorityQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// An item was added to a queue that already holds `capacity` items.
    #[error("priority queue is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    /// `remove_first` was called on an empty queue.
    #[error("cannot remove the first item of an empty priority queue")]
    Empty,
}

/// A capacity-bounded max-heap over keys of type `K`.
///
/// Ordering and heap indices are supplied by a [`HeapStore`] passed to every
/// operation. Storage grows on demand but never past the capacity given to
/// [`with_capacity`](Self::with_capacity).
#[derive(Debug, Clone)]
pub struct PriorityQueue<K> {
    items: Vec<K>,
    capacity: usize,
}

impl<K: Copy + Eq> PriorityQueue<K> {
    /// Create an empty queue that accepts at most `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Number of items in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of items the queue accepts.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The items in heap-array order. The root is at index 0.
    #[inline]
    pub fn as_slice(&self) -> &[K] {
        &self.items
    }

    /// Remove every item. Stored heap indices of removed keys become stale.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Add `item` and sift it up to its place.
    pub fn add<S: HeapStore<K>>(&mut self, store: &mut S, item: K) -> Result<(), HeapError> {
        if self.items.len() >= self.capacity {
            return Err(HeapError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let index = self.items.len();
        store.set_heap_index(item, index);
        self.items.push(item);
        self.sort_up(store, item);
        debug_assert!(self.contains(&*store, item), "heap index out of sync after add");
        Ok(())
    }

    /// Remove and return the highest-priority item.
    pub fn remove_first<S: HeapStore<K>>(&mut self, store: &mut S) -> Result<K, HeapError> {
        let last = self.items.pop().ok_or(HeapError::Empty)?;
        if self.items.is_empty() {
            return Ok(last);
        }
        let first = std::mem::replace(&mut self.items[0], last);
        store.set_heap_index(last, 0);
        self.sort_down(store, last);
        Ok(first)
    }

    /// Whether `item` currently sits in this queue.
    ///
    /// This is an identity check on the slot recorded for `item`, so it is
    /// only meaningful for keys that were added to this queue at some point.
    #[inline]
    pub fn contains<S: HeapStore<K>>(&self, store: &S, item: K) -> bool {
        self.items.get(store.heap_index(item)) == Some(&item)
    }

    /// Restore heap order after the priority of `item` changed.
    pub fn update_item<S: HeapStore<K>>(&mut self, store: &mut S, item: K) {
        debug_assert!(self.contains(&*store, item), "update_item on a foreign key");
        self.sort_up(store, item);
        self.sort_down(store, item);
    }

    /// Check both the heap order and the heap index of every item.
    pub fn is_valid<S: HeapStore<K>>(&self, store: &S) -> bool {
        self.items.iter().enumerate().all(|(i, &item)| {
            let ordered = [2 * i + 1, 2 * i + 2]
                .into_iter()
                .filter_map(|child| self.items.get(child))
                .all(|&child| store.compare(item, child) != Ordering::Less);
            ordered && store.heap_index(item) == i
        })
    }

    fn sort_up<S: HeapStore<K>>(&mut self, store: &mut S, item: K) {
        let mut index = store.heap_index(item);
        while index > 0 {
            let parent = (index - 1) / 2;
            if store.compare(item, self.items[parent]) != Ordering::Greater {
                break;
            }
            self.swap(store, index, parent);
            index = parent;
        }
    }

    fn sort_down<S: HeapStore<K>>(&mut self, store: &mut S, item: K) {
        let len = self.items.len();
        let mut index = store.heap_index(item);
        loop {
            let left = index * 2 + 1;
            let right = left + 1;
            if left >= len {
                return;
            }
            let mut child = left;
            if right < len && store.compare(self.items[left], self.items[right]) == Ordering::Less {
                child = right;
            }
            if store.compare(item, self.items[child]) != Ordering::Less {
                return;
            }
            self.swap(store, index, child);
            index = child;
        }
    }

    fn swap<S: HeapStore<K>>(&mut self, store: &mut S, a: usize, b: usize) {
        self.items.swap(a, b);
        store.set_heap_index(self.items[a], a);
        store.set_heap_index(self.items[b], b);
    }
}
