//! Addressable Priority Queue
//!
//! A binary min-heap over `f64` priorities whose elements can be addressed after
//! insertion through a stable [`Locator`]. The cache uses it to find the next
//! eviction victim and to raise the priority of a touched key in `O(log n)`.
//!
//! # Layout
//!
//! ```text
//!   slots (arena, indexed by Locator.index)        heap (binary tree in a Vec)
//!   ┌───────┬────────────┬──────────┐              ┌─────┬─────┬─────┬─────┐
//!   │ index │ generation │ position │              │  0  │  1  │  2  │  3  │
//!   ├───────┼────────────┼──────────┤              ├─────┼─────┼─────┼─────┤
//!   │   0   │     0      │ Some(2)  │ ───────────▶ │ k3  │ k1  │ k0  │ k2  │
//!   │   1   │     0      │ Some(1)  │              │ 1.0 │ 1.0 │ 2.0 │ 3.0 │
//!   │   2   │     1      │ Some(3)  │              └─────┴─────┴─────┴─────┘
//!   │   3   │     0      │ Some(0)  │
//!   │   4   │     2      │ None     │ ◀── free list
//!   └───────┴────────────┴──────────┘
//! ```
//!
//! Heap elements own their key, priority and a sequence number; the arena only
//! records where each element currently sits. Moving elements during a sift
//! rewrites the arena positions, so a [`Locator`] never points at memory and
//! stays valid however the heap reorganizes.
//!
//! A slot's generation is bumped whenever its element leaves the queue. A
//! locator whose generation no longer matches is stale and every operation
//! given one is a no-op.
//!
//! # Ordering
//!
//! Elements are ordered by priority, then by sequence number. The sequence
//! number is drawn from a monotonic counter on [`insert`](PriorityQueue::insert)
//! and again on every successful [`update`](PriorityQueue::update), so among
//! equal priorities the element whose priority was assigned earliest is the
//! minimum. With constant priorities this is exactly FIFO order.
//!
//! # Complexity
//!
//! | Operation  | Cost     |
//! |------------|----------|
//! | `insert`   | O(log n) |
//! | `peek_min` | O(1)     |
//! | `pop_min`  | O(log n) |
//! | `remove`   | O(log n) |
//! | `update`   | O(log n) |
//! | `priority` | O(1)     |

extern crate alloc;

use alloc::vec::Vec;
use core::cmp::Ordering;

/// Stable handle to an element of a [`PriorityQueue`].
///
/// Returned by [`PriorityQueue::insert`]. It remains valid until the element is
/// removed (by `pop_min`, `remove` or `clear`); afterwards it is stale and
/// never resolves to another element, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Element<K> {
    key: K,
    priority: f64,
    seq: u64,
    slot: usize,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    /// Index into `heap` while the slot is occupied.
    position: Option<usize>,
}

/// Min-heap of keys by `f64` priority with locator-based access.
///
/// Priorities must not be NaN. Updates may raise or keep a priority, never
/// lower it; see [`update`](Self::update).
///
/// # Examples
///
/// ```
/// use fifocache::heap::PriorityQueue;
///
/// let mut queue = PriorityQueue::new();
/// let a = queue.insert("a", 1.0);
/// queue.insert("b", 1.0);
///
/// // "a" was inserted first, so it wins the tie.
/// assert_eq!(queue.peek_min(), Some((&"a", 1.0)));
///
/// // Raising "a" makes "b" the minimum.
/// assert!(queue.update(a, 2.0));
/// assert_eq!(queue.pop_min(), Some(("b", 1.0)));
/// assert_eq!(queue.pop_min(), Some(("a", 2.0)));
/// assert_eq!(queue.pop_min(), None);
/// ```
#[derive(Debug)]
pub struct PriorityQueue<K> {
    heap: Vec<Element<K>>,
    slots: Vec<Slot>,
    free: Vec<usize>,
    seq: u64,
}

impl<K> Default for PriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> PriorityQueue<K> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty queue with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        PriorityQueue {
            heap: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            seq: 0,
        }
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the queue holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Inserts `key` with `priority` and returns its locator.
    pub fn insert(&mut self, key: K, priority: f64) -> Locator {
        debug_assert!(!priority.is_nan(), "priority must not be NaN");

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    position: None,
                });
                self.slots.len() - 1
            }
        };

        let position = self.heap.len();
        let seq = self.next_seq();
        self.heap.push(Element {
            key,
            priority,
            seq,
            slot: index,
        });
        self.slots[index].position = Some(position);
        self.sift_up(position);

        Locator {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Returns the minimum element without removing it.
    #[inline]
    pub fn peek_min(&self) -> Option<(&K, f64)> {
        self.heap.first().map(|e| (&e.key, e.priority))
    }

    /// Removes and returns the minimum element.
    pub fn pop_min(&mut self) -> Option<(K, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        self.remove_at(0).map(|e| (e.key, e.priority))
    }

    /// Removes the element addressed by `locator`.
    ///
    /// Returns `None` when the locator is stale.
    pub fn remove(&mut self, locator: Locator) -> Option<(K, f64)> {
        let position = self.resolve(locator)?;
        self.remove_at(position).map(|e| (e.key, e.priority))
    }

    /// Raises the priority of the element addressed by `locator`.
    ///
    /// Returns `true` if the update was applied. Decreases, NaN priorities and
    /// stale locators are ignored and return `false`. An applied update, even
    /// one that keeps the priority, moves the element behind every other
    /// element of equal priority.
    pub fn update(&mut self, locator: Locator, priority: f64) -> bool {
        let Some(position) = self.resolve(locator) else {
            return false;
        };
        // Written so that NaN fails the comparison too.
        if !(priority >= self.heap[position].priority) {
            return false;
        }

        let seq = self.next_seq();
        let element = &mut self.heap[position];
        element.priority = priority;
        element.seq = seq;
        self.sift_down(position);
        true
    }

    /// Returns the current priority of the element addressed by `locator`.
    #[inline]
    pub fn priority(&self, locator: Locator) -> Option<f64> {
        self.resolve(locator).map(|p| self.heap[p].priority)
    }

    /// Returns the key of the element addressed by `locator`.
    #[inline]
    pub fn key(&self, locator: Locator) -> Option<&K> {
        self.resolve(locator).map(|p| &self.heap[p].key)
    }

    /// Returns `true` if `locator` addresses a live element.
    #[inline]
    pub fn contains(&self, locator: Locator) -> bool {
        self.resolve(locator).is_some()
    }

    /// Iterates over all live elements in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        self.heap.iter().map(|e| (&e.key, e.priority))
    }

    /// Removes every element. All previously issued locators become stale.
    pub fn clear(&mut self) {
        for element in self.heap.drain(..) {
            let slot = &mut self.slots[element.slot];
            slot.position = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(element.slot);
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        seq
    }

    fn resolve(&self, locator: Locator) -> Option<usize> {
        let slot = self.slots.get(locator.index)?;
        if slot.generation != locator.generation {
            return None;
        }
        slot.position
    }

    fn remove_at(&mut self, position: usize) -> Option<Element<K>> {
        let last = self.heap.len().checked_sub(1)?;
        if position != last {
            self.swap(position, last);
        }
        let element = self.heap.pop()?;

        let slot = &mut self.slots[element.slot];
        slot.position = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(element.slot);

        if position < self.heap.len() {
            let settled = self.sift_up(position);
            if settled == position {
                self.sift_down(position);
            }
        }
        Some(element)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        let (a, b) = (&self.heap[a], &self.heap[b]);
        a.priority
            .total_cmp(&b.priority)
            .then(a.seq.cmp(&b.seq))
            == Ordering::Less
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots[self.heap[a].slot].position = Some(a);
        self.slots[self.heap[b].slot].position = Some(b);
    }

    fn sift_up(&mut self, mut position: usize) -> usize {
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.less(position, parent) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
        position
    }

    fn sift_down(&mut self, mut position: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * position + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, position) {
                break;
            }
            self.swap(child, position);
            position = child;
        }
    }
}
