use super::*;

/// A closed interval of allowed values for a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Float,
    pub max: Float,
}

impl Bounds {
    #[inline]
    #[must_use]
    pub const fn new(min: Float, max: Float) -> Self {
        Self { min, max }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, value: Float) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// `value` moved into the bounds. NaNs are sent to `min`.
    #[inline]
    #[must_use]
    pub fn clamp(&self, value: Float) -> Float {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    #[inline]
    #[must_use]
    pub fn span(&self) -> Float {
        self.max - self.min
    }

    /// Checks that `value`, the value of the parameter called `name`, is in these bounds.
    pub fn check(&self, name: &'static str, value: Float) -> Result<Float, ParamError> {
        if !value.is_finite() {
            Err(ParamError::NotFinite { name, value })
        } else if !self.contains(value) {
            Err(ParamError::OutOfBounds {
                name,
                value,
                min: self.min,
                max: self.max,
            })
        } else {
            Ok(value)
        }
    }
}

/// Refractive index of the medium surrounding the prism
pub const N1_BOUNDS: Bounds = Bounds::new(1.0, 3.0);
/// Refractive index of the prism's walls
pub const N2_BOUNDS: Bounds = Bounds::new(1.0, 3.0);
/// Refractive index of the medium filling the prism's core
pub const N3_BOUNDS: Bounds = Bounds::new(0.5, 3.0);
/// Thickness of the prism's walls
pub const THICKNESS_BOUNDS: Bounds = Bounds::new(0.01, 0.2);
/// Incidence angle, in degrees, on the prism's first face
pub const THETA1_BOUNDS: Bounds = Bounds::new(0.1, 89.99);

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: Float },
    #[error("{name} = {value} is out of bounds, expected a value in [{min}, {max}]")]
    OutOfBounds {
        name: &'static str,
        value: Float,
        min: Float,
        max: Float,
    },
}

/// Everything needed to trace a ray through a hollow prism.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrismParams {
    /// Refractive index outside the prism
    pub n1: Float,
    /// Refractive index of the walls
    pub n2: Float,
    /// Refractive index of the hollow core
    pub n3: Float,
    /// Wall thickness
    pub l: Float,
    /// Incidence angle in degrees
    pub theta1: Float,
}

impl Default for PrismParams {
    /// Air around a glass prism filled with water, hit at 45°
    fn default() -> Self {
        Self {
            n1: 1.0,
            n2: 1.5,
            n3: 1.33,
            l: 0.1,
            theta1: 45.0,
        }
    }
}

impl PrismParams {
    /// Name, value, and bounds of every parameter, in slider order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, Float, Bounds); 5] {
        [
            ("n1", self.n1, N1_BOUNDS),
            ("n2", self.n2, N2_BOUNDS),
            ("n3", self.n3, N3_BOUNDS),
            ("l", self.l, THICKNESS_BOUNDS),
            ("theta1", self.theta1, THETA1_BOUNDS),
        ]
    }

    /// Fails on the first parameter that is not finite or out of its bounds.
    pub fn validate(&self) -> Result<(), ParamError> {
        self.fields()
            .into_iter()
            .try_for_each(|(name, value, bounds)| bounds.check(name, value).map(drop))
    }

    /// Every parameter moved into its bounds.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            n1: N1_BOUNDS.clamp(self.n1),
            n2: N2_BOUNDS.clamp(self.n2),
            n3: N3_BOUNDS.clamp(self.n3),
            l: THICKNESS_BOUNDS.clamp(self.l),
            theta1: THETA1_BOUNDS.clamp(self.theta1),
        }
    }
}
