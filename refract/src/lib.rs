pub use nalgebra;

use nalgebra::{Rotation2, SVector, Unit, Vector2};

mod interface;
mod snell;

pub use interface::*;
pub use snell::*;

pub type Float = f64;

/// A light ray, represented as a half-line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray<const D: usize> {
    /// The starting point of the half-line
    pub origin: SVector<Float, D>,
    /// the direction of the half-line
    pub direction: Unit<SVector<Float, D>>,
}

impl<const D: usize> Ray<D> {
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<SVector<Float, D>>, direction: Unit<SVector<Float, D>>) -> Self {
        Self {
            origin: origin.into(),
            direction,
        }
    }

    /// Returns `None` if `direction` is (approximately) zero
    #[inline]
    #[must_use]
    pub fn try_new_normalize(
        origin: impl Into<SVector<Float, D>>,
        direction: impl Into<SVector<Float, D>>,
    ) -> Option<Self> {
        Unit::try_new(direction.into(), Float::EPSILON).map(|dir| Self::new(origin, dir))
    }

    /// Move the ray's position forward (or backward if t < 0.0) by `t`
    #[inline]
    pub fn advance(&mut self, t: Float) {
        self.origin += t * self.direction.as_ref();
    }

    /// Get the point at distance `t` (can be negative) from the ray's origin
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> SVector<Float, D> {
        self.origin + self.direction.as_ref() * t
    }
}

impl Ray<2> {
    /// A ray starting at `origin`, heading `angle` degrees counterclockwise from the x axis.
    #[inline]
    #[must_use]
    pub fn from_angle(origin: impl Into<Vector2<Float>>, angle: Float) -> Self {
        Self::new(origin, direction_from_angle(angle))
    }

    /// The angle, in degrees, between the x axis and this ray's direction, in `]-180, 180]`
    #[inline]
    #[must_use]
    pub fn angle(&self) -> Float {
        angle_of(&self.direction)
    }
}

/// The unit vector `angle` degrees counterclockwise from the x axis.
#[inline]
#[must_use]
pub fn direction_from_angle(angle: Float) -> Unit<Vector2<Float>> {
    let (sin, cos) = angle.to_radians().sin_cos();
    // SAFETY: sin² + cos² = 1
    Unit::new_unchecked(Vector2::new(cos, sin))
}

/// The angle, in degrees, between the x axis and `v`
#[inline]
#[must_use]
pub fn angle_of(v: &Vector2<Float>) -> Float {
    v.y.atan2(v.x).to_degrees()
}

/// Rotate `v` by `angle` degrees, counterclockwise.
#[inline]
#[must_use]
pub fn rotate(v: &Unit<Vector2<Float>>, angle: Float) -> Unit<Vector2<Float>> {
    // rotations preserve euclidean norms
    Unit::new_unchecked(Rotation2::new(angle.to_radians()) * v.as_ref())
}
