//! Scalar and vector abstraction for contact computations.
//!
//! All contact code is written against [`Real`] and its associated
//! [`Vector3`] so the same pipeline can run in single precision (backed by
//! [`glam::Vec3`]), double precision (backed by [`glam::DVec3`]), or any
//! downstream scalar type (e.g. a dual number used for sensitivities) that
//! implements both traits.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Real-valued scalar used throughout the contact pipeline.
pub trait Real:
    Copy
    + Debug
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// World-frame 3-vector paired with this scalar.
    type Vector: Vector3<Scalar = Self>;

    const ZERO: Self;
    const ONE: Self;

    /// Converts a configuration constant into this scalar type.
    fn from_f64(value: f64) -> Self;

    /// Converts to `f64` for diagnostics and logging.
    fn to_f64(self) -> f64;

    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn max(self, other: Self) -> Self;
    fn min(self, other: Self) -> Self;
    fn is_finite(self) -> bool;

    /// Clamps `self` into `[lo, hi]`. Assumes `lo <= hi`.
    #[inline]
    fn clamp_to(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }
}

/// Three-component vector expressed in the world frame.
pub trait Vector3:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
{
    type Scalar: Real<Vector = Self>;

    const ZERO: Self;

    fn new(x: Self::Scalar, y: Self::Scalar, z: Self::Scalar) -> Self;
    fn x(self) -> Self::Scalar;
    fn y(self) -> Self::Scalar;
    fn z(self) -> Self::Scalar;
    fn dot(self, rhs: Self) -> Self::Scalar;
    fn cross(self, rhs: Self) -> Self;
    fn scale(self, factor: Self::Scalar) -> Self;
    fn length(self) -> Self::Scalar;
    fn length_squared(self) -> Self::Scalar;
    fn is_finite(self) -> bool;

    #[inline]
    fn to_array(self) -> [Self::Scalar; 3] {
        [self.x(), self.y(), self.z()]
    }
}

macro_rules! impl_real {
    ($scalar:ty, $vector:ty) => {
        impl Real for $scalar {
            type Vector = $vector;

            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $scalar
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn sqrt(self) -> Self {
                <$scalar>::sqrt(self)
            }

            #[inline]
            fn abs(self) -> Self {
                <$scalar>::abs(self)
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                <$scalar>::max(self, other)
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                <$scalar>::min(self, other)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$scalar>::is_finite(self)
            }
        }

        impl Vector3 for $vector {
            type Scalar = $scalar;

            const ZERO: Self = <$vector>::ZERO;

            #[inline]
            fn new(x: $scalar, y: $scalar, z: $scalar) -> Self {
                <$vector>::new(x, y, z)
            }

            #[inline]
            fn x(self) -> $scalar {
                self.x
            }

            #[inline]
            fn y(self) -> $scalar {
                self.y
            }

            #[inline]
            fn z(self) -> $scalar {
                self.z
            }

            #[inline]
            fn dot(self, rhs: Self) -> $scalar {
                <$vector>::dot(self, rhs)
            }

            #[inline]
            fn cross(self, rhs: Self) -> Self {
                <$vector>::cross(self, rhs)
            }

            #[inline]
            fn scale(self, factor: $scalar) -> Self {
                self * factor
            }

            #[inline]
            fn length(self) -> $scalar {
                <$vector>::length(self)
            }

            #[inline]
            fn length_squared(self) -> $scalar {
                <$vector>::length_squared(self)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$vector>::is_finite(self)
            }
        }
    };
}

impl_real!(f32, glam::Vec3);
impl_real!(f64, glam::DVec3);

/// Largest absolute component of `v`.
#[inline]
fn max_abs_component<V: Vector3>(v: V) -> V::Scalar {
    v.x().abs().max(v.y().abs()).max(v.z().abs())
}

/// Divides every component of a nonzero `v` by its largest absolute
/// component, returning the rescaled vector and that component.
#[inline]
fn prescale<V: Vector3>(v: V) -> Option<(V, V::Scalar)> {
    let scale = max_abs_component(v);
    if !v.is_finite() || !(scale > V::Scalar::ZERO) {
        return None;
    }
    Some((V::new(v.x() / scale, v.y() / scale, v.z() / scale), scale))
}

/// Euclidean length of `v` without intermediate overflow.
///
/// Finite vectors whose squared components exceed the scalar range still
/// get a finite length as long as the length itself is representable.
/// Non-finite input yields a non-finite result.
#[inline]
pub fn stable_length<V: Vector3>(v: V) -> V::Scalar {
    match prescale(v) {
        Some((unit, scale)) => unit.length() * scale,
        None => v.length(),
    }
}

/// Returns `v / |v|`, or `None` when `v` is non-finite or `|v| <= min_length`.
///
/// Never divides by a length at or below `min_length`. Large finite vectors
/// normalize without overflowing.
#[inline]
pub fn try_normalize<V: Vector3>(v: V, min_length: V::Scalar) -> Option<V> {
    let (unit, scale) = prescale(v)?;
    // |unit| lies in [1, sqrt(3)].
    let unit_length = unit.length();
    if unit_length * scale <= min_length {
        return None;
    }
    Some(unit.scale(V::Scalar::ONE / unit_length))
}
