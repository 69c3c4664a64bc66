//! Best-K candidate tracking for nearest-neighbor searches.
//!
//! [`Candidates`] keeps the `max_count` closest entries offered during one
//! query. While it is filling up, entries go into a plain `Vec` and only the
//! index of the current worst entry is tracked. The moment it becomes full it
//! switches, once and for good, to a [`BoundedHeap`] so that every later insert
//! costs `O(log max_count)`.

use std::cmp::Ordering;

use crate::error::{KdTreeError, Result};
use crate::heap::{BoundedHeap, HeapOrder};

/// An item paired with its distance to a query position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor<T, D> {
    /// The matched item.
    pub item: T,
    /// Its distance (squared Euclidean unless a filter supplied it).
    pub distance: D,
}

/// Orders neighbors by distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByDistance;

impl<T, D: PartialOrd> HeapOrder<Neighbor<T, D>> for ByDistance {
    #[inline]
    fn less(&self, a: &Neighbor<T, D>, b: &Neighbor<T, D>) -> bool {
        a.distance < b.distance
    }
}

#[derive(Clone, Debug)]
enum State<T, D> {
    Collecting {
        entries: Vec<Neighbor<T, D>>,
        worst: Option<usize>,
    },
    Full(BoundedHeap<Neighbor<T, D>, ByDistance>),
}

/// Accumulates the `max_count` smallest-distance entries seen so far.
///
/// Only set membership is guaranteed; use [`sort_by_distance`] on the result
/// when order matters.
#[derive(Clone, Debug)]
pub struct Candidates<T, D> {
    max_count: usize,
    state: State<T, D>,
}

impl<T, D: PartialOrd + Copy> Candidates<T, D> {
    /// Creates an empty accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`KdTreeError::InvalidMaxCount`] if `max_count` is zero.
    pub fn new(max_count: usize) -> Result<Self> {
        if max_count == 0 {
            return Err(KdTreeError::InvalidMaxCount);
        }
        Ok(Self {
            max_count,
            state: State::Collecting {
                entries: Vec::new(),
                worst: None,
            },
        })
    }

    /// Capacity of the accumulator.
    #[inline]
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Number of entries currently held.
    #[inline]
    pub fn len(&self) -> usize {
        match &self.state {
            State::Collecting { entries, .. } => entries.len(),
            State::Full(heap) => heap.len(),
        }
    }

    /// True if nothing has been accepted yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once `max_count` entries have been accepted.
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self.state, State::Full(_))
    }

    /// Offers an entry.
    pub fn insert(&mut self, item: T, distance: D) {
        let entry = Neighbor { item, distance };
        let (entries, worst) = match &mut self.state {
            State::Full(heap) => {
                heap.insert(entry);
                return;
            }
            State::Collecting { entries, worst } => (entries, worst),
        };

        let replaces_worst = worst.is_none_or(|index| !(distance < entries[index].distance));
        if replaces_worst {
            *worst = Some(entries.len());
        }
        entries.push(entry);

        if entries.len() == self.max_count {
            let mut heap = BoundedHeap::with_order(self.max_count, ByDistance);
            heap.extend(std::mem::take(entries));
            self.state = State::Full(heap);
        }
    }

    /// The entry with the largest distance held so far.
    pub fn worst(&self) -> Option<&Neighbor<T, D>> {
        match &self.state {
            State::Collecting { entries, worst } => worst.map(|index| &entries[index]),
            State::Full(heap) => heap.top(),
        }
    }

    /// Largest distance held so far.
    #[inline]
    pub fn worst_distance(&self) -> Option<D> {
        self.worst().map(|entry| entry.distance)
    }

    /// Current entries, unordered.
    pub fn as_slice(&self) -> &[Neighbor<T, D>] {
        match &self.state {
            State::Collecting { entries, .. } => entries,
            State::Full(heap) => heap.as_slice(),
        }
    }

    /// Consumes the accumulator, returning its entries unordered.
    pub fn into_vec(self) -> Vec<Neighbor<T, D>> {
        match self.state {
            State::Collecting { entries, .. } => entries,
            State::Full(heap) => heap.into_vec(),
        }
    }
}

/// Sorts neighbors by ascending distance. Incomparable distances compare equal.
pub fn sort_by_distance<T, D: PartialOrd>(neighbors: &mut [Neighbor<T, D>]) {
    neighbors.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
}
