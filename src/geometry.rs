//! Geometric capability set consumed by the tree.
//!
//! The index never does arithmetic on concrete vector types. Everything it
//! needs from a coordinate system is expressed by the [`Point`], [`Vector`],
//! [`Axis`] and [`Mask`] traits below. Implementations are provided for the
//! `glam` types [`Vec2`], [`Vec3`], [`DVec2`] and [`DVec3`].
//!
//! Points and vectors are distinct roles even when they share a concrete type:
//! a point is a location, a vector is the difference between two locations.

use std::fmt;

use glam::{BVec2, BVec3, DVec2, DVec3, Vec2, Vec3};
use num_traits::Float;

/// A finite, enumerable set of per-dimension identifiers.
pub trait Axis: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every axis of the coordinate system, in order.
    const ALL: &'static [Self];

    /// The axis reported when every extent is equal.
    const PRIMARY: Self;
}

/// Per-axis boolean produced by elementwise comparisons.
pub trait Mask: Copy {
    /// True if any axis is set.
    fn any(self) -> bool;

    /// True if every axis is set.
    fn all(self) -> bool;
}

/// Displacement between two points.
pub trait Vector: Copy + fmt::Debug + Send + Sync {
    /// Coordinate scalar.
    type Scalar: Float + fmt::Debug + Send + Sync;
    /// Axis identifier.
    type Axis: Axis;

    /// Builds a vector with every component set to `value`.
    fn broadcast(value: Self::Scalar) -> Self;

    /// Returns the component along `axis`.
    fn component(self, axis: Self::Axis) -> Self::Scalar;

    /// Returns the squared Euclidean length.
    fn squared_length(self) -> Self::Scalar;
}

/// A location in N-dimensional space.
pub trait Point: Copy + fmt::Debug + Send + Sync {
    /// Coordinate scalar, shared with [`Point::Vector`].
    type Scalar: Float + fmt::Debug + Send + Sync;
    /// Difference type of two points.
    type Vector: Vector<Scalar = Self::Scalar, Axis = Self::Axis>;
    /// Axis identifier.
    type Axis: Axis;
    /// Result of elementwise comparisons.
    type Mask: Mask;

    /// Builds a point with every coordinate set to `value`.
    fn splat(value: Self::Scalar) -> Self;

    /// Returns the coordinate along `axis`.
    fn coord(self, axis: Self::Axis) -> Self::Scalar;

    /// `self - other`.
    fn difference(self, other: Self) -> Self::Vector;

    /// `self + by`.
    fn offset(self, by: Self::Vector) -> Self;

    /// `self - by`.
    fn offset_back(self, by: Self::Vector) -> Self;

    /// Elementwise minimum.
    #[must_use]
    fn min_elements(self, other: Self) -> Self;

    /// Elementwise maximum.
    #[must_use]
    fn max_elements(self, other: Self) -> Self;

    /// Elementwise `self < other`.
    fn lt_elements(self, other: Self) -> Self::Mask;

    /// Elementwise `self > other`.
    fn gt_elements(self, other: Self) -> Self::Mask;

    /// True if every coordinate is finite.
    fn is_finite(self) -> bool {
        Self::Axis::ALL
            .iter()
            .all(|&axis| self.coord(axis).is_finite())
    }
}

/// Anything that occupies a position in space and can be indexed.
pub trait PositionedEntity {
    /// Coordinate system of the entity.
    type Point: Point;

    /// Returns the entity's position.
    fn position(&self) -> Self::Point;
}

/// A point carrying an arbitrary payload, e.g. `(Vec2, u32)`.
impl<P: Point, V> PositionedEntity for (P, V) {
    type Point = P;

    #[inline]
    fn position(&self) -> P {
        self.0
    }
}

/// Axes of a two-dimensional space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis2 {
    /// First axis.
    X,
    /// Second axis.
    Y,
}

impl Axis for Axis2 {
    const ALL: &'static [Self] = &[Self::X, Self::Y];
    const PRIMARY: Self = Self::X;
}

/// Axes of a three-dimensional space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis3 {
    /// First axis.
    X,
    /// Second axis.
    Y,
    /// Third axis.
    Z,
}

impl Axis for Axis3 {
    const ALL: &'static [Self] = &[Self::X, Self::Y, Self::Z];
    const PRIMARY: Self = Self::X;
}

impl Mask for BVec2 {
    #[inline]
    fn any(self) -> bool {
        Self::any(self)
    }

    #[inline]
    fn all(self) -> bool {
        Self::all(self)
    }
}

impl Mask for BVec3 {
    #[inline]
    fn any(self) -> bool {
        Self::any(self)
    }

    #[inline]
    fn all(self) -> bool {
        Self::all(self)
    }
}

macro_rules! impl_glam_point {
    ($point:ident, $scalar:ty, $mask:ident, $axis:ident, [$($variant:ident => $field:ident),+]) => {
        impl Vector for $point {
            type Scalar = $scalar;
            type Axis = $axis;

            #[inline]
            fn broadcast(value: $scalar) -> Self {
                $point::splat(value)
            }

            #[inline]
            fn component(self, axis: $axis) -> $scalar {
                match axis {
                    $($axis::$variant => self.$field,)+
                }
            }

            #[inline]
            fn squared_length(self) -> $scalar {
                self.length_squared()
            }
        }

        impl Point for $point {
            type Scalar = $scalar;
            type Vector = $point;
            type Axis = $axis;
            type Mask = $mask;

            #[inline]
            fn splat(value: $scalar) -> Self {
                $point::splat(value)
            }

            #[inline]
            fn coord(self, axis: $axis) -> $scalar {
                match axis {
                    $($axis::$variant => self.$field,)+
                }
            }

            #[inline]
            fn difference(self, other: Self) -> $point {
                self - other
            }

            #[inline]
            fn offset(self, by: $point) -> Self {
                self + by
            }

            #[inline]
            fn offset_back(self, by: $point) -> Self {
                self - by
            }

            #[inline]
            fn min_elements(self, other: Self) -> Self {
                self.min(other)
            }

            #[inline]
            fn max_elements(self, other: Self) -> Self {
                self.max(other)
            }

            #[inline]
            fn lt_elements(self, other: Self) -> $mask {
                self.cmplt(other)
            }

            #[inline]
            fn gt_elements(self, other: Self) -> $mask {
                self.cmpgt(other)
            }

            #[inline]
            fn is_finite(self) -> bool {
                $point::is_finite(self)
            }
        }

        impl PositionedEntity for $point {
            type Point = $point;

            #[inline]
            fn position(&self) -> $point {
                *self
            }
        }
    };
}

impl_glam_point!(Vec2, f32, BVec2, Axis2, [X => x, Y => y]);
impl_glam_point!(DVec2, f64, BVec2, Axis2, [X => x, Y => y]);
impl_glam_point!(Vec3, f32, BVec3, Axis3, [X => x, Y => y, Z => z]);
impl_glam_point!(DVec3, f64, BVec3, Axis3, [X => x, Y => y, Z => z]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_follows_axis() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Point::coord(p, Axis3::X), 1.0);
        assert_eq!(Point::coord(p, Axis3::Y), 2.0);
        assert_eq!(Point::coord(p, Axis3::Z), 3.0);
    }

    #[test]
    fn test_difference_and_squared_length() {
        let a = DVec2::new(4.0, 6.0);
        let b = DVec2::new(1.0, 2.0);
        let d = Point::difference(a, b);
        assert_eq!(Vector::squared_length(d), 25.0);
        assert_eq!(Vector::squared_length(Vec2::new(1.0, 1.0)), 2.0);
    }

    #[test]
    fn test_offsets_round_trip() {
        let p = Vec2::new(1.0, -1.0);
        let v = <Vec2 as Vector>::broadcast(0.5);
        assert_eq!(Point::offset(p, v), Vec2::new(1.5, -0.5));
        assert_eq!(Point::offset_back(p, v), Vec2::new(0.5, -1.5));
    }

    #[test]
    fn test_elementwise_masks() {
        let a = Vec2::new(0.0, 5.0);
        let b = Vec2::new(1.0, 1.0);
        assert!(Mask::any(Point::lt_elements(a, b)), "x is below");
        assert!(!Mask::all(Point::lt_elements(a, b)), "y is above");
        assert!(Mask::any(Point::gt_elements(a, b)), "y is above");
        assert_eq!(Point::min_elements(a, b), Vec2::new(0.0, 1.0));
        assert_eq!(Point::max_elements(a, b), Vec2::new(1.0, 5.0));
    }

    #[test]
    fn test_is_finite() {
        assert!(Point::is_finite(DVec3::new(1.0, 2.0, 3.0)));
        assert!(!Point::is_finite(DVec3::new(1.0, f64::NAN, 3.0)));
        assert!(!Point::is_finite(Vec2::new(f32::INFINITY, 0.0)));
    }

    #[test]
    fn test_tuple_entity_position() {
        let entity = (Vec2::new(3.0, 4.0), "payload");
        assert_eq!(entity.position(), Vec2::new(3.0, 4.0));
        assert_eq!(Vec2::new(1.0, 2.0).position(), Vec2::new(1.0, 2.0));
    }
}
