//! Fixed-capacity binary max-heap.
//!
//! [`BoundedHeap`] never holds more than its capacity. Once full, inserting a
//! value evicts the current maximum if the new value is smaller and is a no-op
//! otherwise, so after any sequence of inserts the heap holds the `capacity`
//! smallest values seen.

/// Strict ordering used by [`BoundedHeap`].
pub trait HeapOrder<T> {
    /// True if `a` orders strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;
}

/// Orders values with [`PartialOrd`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<T: PartialOrd> HeapOrder<T> for NaturalOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Array-backed max-heap restricted to `capacity` elements.
#[derive(Clone, Debug)]
pub struct BoundedHeap<T, O = NaturalOrder> {
    data: Vec<T>,
    max_size: usize,
    order: O,
}

impl<T: PartialOrd> BoundedHeap<T> {
    /// Creates an empty heap ordered by [`PartialOrd`].
    pub fn new(max_size: usize) -> Self {
        Self::with_order(max_size, NaturalOrder)
    }
}

impl<T, O: HeapOrder<T>> BoundedHeap<T, O> {
    /// Creates an empty heap with a custom order.
    pub fn with_order(max_size: usize, order: O) -> Self {
        Self {
            data: Vec::with_capacity(max_size),
            max_size,
            order,
        }
    }

    /// Maximum number of elements the heap keeps.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Number of elements currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the heap holds nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True if the next insert has to compete with the maximum.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.max_size
    }

    /// The maximum element, without removing it.
    #[inline]
    pub fn top(&self) -> Option<&T> {
        self.data.first()
    }

    /// Backing storage in heap order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consumes the heap, returning its elements in heap order.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Consumes the heap, returning its elements in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Some(value) = self.pop() {
            sorted.push(value);
        }
        sorted.reverse();
        sorted
    }

    /// Inserts `value`, evicting the maximum if the heap is full.
    ///
    /// At capacity a value that is not strictly smaller than the current
    /// maximum is dropped.
    pub fn insert(&mut self, value: T) {
        if self.is_full() {
            match self.data.first() {
                Some(top) if self.order.less(&value, top) => {}
                _ => return,
            }
            let _evicted = self.pop();
        }
        self.sift_up(value);
    }

    /// Removes and returns the maximum element.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.data.pop()?;
        if self.data.is_empty() {
            return Some(last);
        }
        let top = std::mem::replace(&mut self.data[0], last);
        self.sift_down(0);
        Some(top)
    }

    fn sift_up(&mut self, value: T) {
        let mut index = self.data.len();
        self.data.push(value);
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.order.less(&self.data[index], &self.data[parent]) {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = index * 2 + 1;
            if left >= len {
                return;
            }
            let right = left + 1;
            let larger = if right < len && self.order.less(&self.data[left], &self.data[right]) {
                right
            } else {
                left
            };
            if !self.order.less(&self.data[index], &self.data[larger]) {
                return;
            }
            self.data.swap(index, larger);
            index = larger;
        }
    }
}

impl<T, O: HeapOrder<T>> Extend<T> for BoundedHeap<T, O> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
