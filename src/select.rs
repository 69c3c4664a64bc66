//! Order-statistic selection.
//!
//! [`select`] moves the rank-`kth` element of a slice into position `kth`
//! without sorting the rest. Elements before it compare less than or equal,
//! elements after it compare greater than or equal.
//!
//! The partition loop is Floyd-Rivest: the pivot is parked at one end of the
//! active range so both scans have a sentinel, and wide ranges are first
//! narrowed by recursing into a sampled window around the target rank.

use std::cmp::Ordering;

use crate::error::{KdTreeError, Result};

/// Ranges wider than this are narrowed by sampling before partitioning.
pub const SELECT_SAMPLE_THRESHOLD: usize = 600;

/// Places the rank-`kth` element of `slice` at index `kth` and returns it.
///
/// `compare` is a three-way comparison; it does not have to be strict, equal
/// elements may end up on either side of `kth`.
///
/// # Errors
///
/// Returns [`KdTreeError::SelectIndexOutOfRange`] if `kth >= slice.len()`.
///
/// # Examples
///
/// ```
/// use kdtree::select::select;
///
/// let mut values = [9, 1, 8, 2, 7, 3];
/// let median = *select(&mut values, 3, |a, b| a.cmp(b)).unwrap();
/// assert_eq!(median, 7);
/// assert!(values[..3].iter().all(|&v| v <= 7));
/// ```
pub fn select<T, F>(slice: &mut [T], kth: usize, mut compare: F) -> Result<&T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if kth >= slice.len() {
        return Err(KdTreeError::SelectIndexOutOfRange {
            kth,
            len: slice.len(),
        });
    }
    select_range(slice, kth, 0, slice.len() - 1, &mut compare);
    Ok(&slice[kth])
}

fn select_range<T, F>(slice: &mut [T], kth: usize, mut left: usize, mut right: usize, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    while right > left {
        if right - left > SELECT_SAMPLE_THRESHOLD {
            let (sample_left, sample_right) = sample_window(kth, left, right);
            select_range(slice, kth, sample_left, sample_right, compare);
        }

        // Park the candidate at one end so it stays put while the scans run.
        slice.swap(left, kth);
        let pivot = if compare(&slice[left], &slice[right]) == Ordering::Less {
            left
        } else {
            slice.swap(left, right);
            right
        };

        let mut i = left + 1;
        let mut j = right - 1;
        while compare(&slice[i], &slice[pivot]) == Ordering::Less {
            i += 1;
        }
        while compare(&slice[j], &slice[pivot]) == Ordering::Greater {
            j -= 1;
        }
        while i < j {
            slice.swap(i, j);
            i += 1;
            j -= 1;
            while compare(&slice[i], &slice[pivot]) == Ordering::Less {
                i += 1;
            }
            while compare(&slice[j], &slice[pivot]) == Ordering::Greater {
                j -= 1;
            }
        }

        let split = if pivot == left {
            slice.swap(left, j);
            j
        } else {
            slice.swap(right, j + 1);
            j + 1
        };

        if split <= kth {
            left = split + 1;
        }
        if kth <= split {
            right = split.saturating_sub(1);
        }
    }
}

/// Window expected to contain rank `kth` after a partial pass.
fn sample_window(kth: usize, left: usize, right: usize) -> (usize, usize) {
    let n = (right - left + 1) as f64;
    let i = (kth - left + 1) as f64;
    let k = kth as f64;
    let z = n.ln();
    let s = 0.5 * (2.0 * z / 3.0).exp();
    let sign = if i - n / 2.0 < 0.0 { -1.0 } else { 1.0 };
    let sd = 0.5 * (z * s * (n - s) / n).sqrt() * sign;

    let new_left = ((k - i * s / n + sd).max(0.0) as usize).max(left).min(kth);
    let new_right = ((k + (n - i) * s / n + sd).max(0.0) as usize).min(right).max(kth);
    (new_left, new_right)
}
