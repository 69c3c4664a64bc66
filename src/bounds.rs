//! Axis-aligned bounding boxes.

use num_traits::{Float, Zero};

use crate::geometry::{Axis, Mask, Point, Vector};

/// Axis-aligned box given by its two corners.
///
/// A fresh box is empty: its minimum corner sits at `+inf` and its maximum at
/// `-inf`, so the first [`merge`](Self::merge) snaps both corners onto the
/// merged point. Merging only ever grows the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox<P> {
    min: P,
    max: P,
}

impl<P: Point> BoundingBox<P> {
    /// Creates an empty box.
    pub fn empty() -> Self {
        Self {
            min: P::splat(P::Scalar::infinity()),
            max: P::splat(P::Scalar::neg_infinity()),
        }
    }

    /// Smallest box containing every point.
    pub fn from_points<I: IntoIterator<Item = P>>(points: I) -> Self {
        points.into_iter().fold(Self::empty(), Self::merge)
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> P {
        self.min
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> P {
        self.max
    }

    /// True if no point has been merged.
    pub fn is_empty(&self) -> bool {
        self.min.gt_elements(self.max).any()
    }

    /// Extends the box to include `point`.
    #[inline]
    #[must_use]
    pub fn merge(self, point: P) -> Self {
        Self {
            min: self.min.min_elements(point),
            max: self.max.max_elements(point),
        }
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min_elements(other.min),
            max: self.max.max_elements(other.max),
        }
    }

    /// Width of the box along `axis`.
    #[inline]
    pub fn extent(&self, axis: P::Axis) -> P::Scalar {
        self.max.coord(axis) - self.min.coord(axis)
    }

    /// The axis along which the box is widest. Ties go to the earlier axis.
    pub fn max_axis(&self) -> P::Axis {
        let mut best = P::Axis::PRIMARY;
        let mut best_extent = self.extent(best);
        for &axis in P::Axis::ALL {
            let extent = self.extent(axis);
            if extent > best_extent {
                best = axis;
                best_extent = extent;
            }
        }
        best
    }

    /// True if `point` lies inside the box, boundary included.
    #[inline]
    pub fn contains(&self, point: P) -> bool {
        self.reaches(point, P::Scalar::zero())
    }

    /// True if `point` lies inside the box grown by `reach` on every side.
    #[inline]
    pub fn reaches(&self, point: P, reach: P::Scalar) -> bool {
        let pad = P::Vector::broadcast(reach);
        let min = self.min.offset_back(pad);
        let max = self.max.offset(pad);
        !(point.lt_elements(min).any() || point.gt_elements(max).any())
    }
}

impl<P: Point> Default for BoundingBox<P> {
    fn default() -> Self {
        Self::empty()
    }
}
