//! Per-geometry contact material parameters and pairwise combination.

use crate::math::Real;

/// Static and dynamic Coulomb friction coefficients.
///
/// Valid coefficients are finite, non-negative, and satisfy
/// `static_friction >= dynamic_friction`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CoulombFriction<T> {
    pub static_friction: T,
    pub dynamic_friction: T,
}

impl<T: Real> CoulombFriction<T> {
    pub fn new(static_friction: T, dynamic_friction: T) -> Self {
        Self {
            static_friction,
            dynamic_friction,
        }
    }

    /// Frictionless surface.
    pub fn frictionless() -> Self {
        Self::new(T::ZERO, T::ZERO)
    }

    /// Checks the coefficient invariants, returning a description of the first violation.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.static_friction.is_finite() || !self.dynamic_friction.is_finite() {
            return Err("friction coefficients must be finite");
        }
        if self.static_friction < T::ZERO || self.dynamic_friction < T::ZERO {
            return Err("friction coefficients must be non-negative");
        }
        if self.dynamic_friction > self.static_friction {
            return Err("dynamic friction must not exceed static friction");
        }
        Ok(())
    }

    /// Combines the friction of two surfaces in contact.
    ///
    /// Each coefficient is combined as `2 μa μb / (μa + μb)`, which is zero if
    /// either surface is frictionless and preserves `static >= dynamic`.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            static_friction: harmonic_combine(self.static_friction, other.static_friction),
            dynamic_friction: harmonic_combine(self.dynamic_friction, other.dynamic_friction),
        }
    }
}

fn harmonic_combine<T: Real>(a: T, b: T) -> T {
    let sum = a + b;
    if sum <= T::ZERO {
        return T::ZERO;
    }
    (T::from_f64(2.0) * a * b) / sum
}

/// Compliant contact parameters attached to one geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ContactMaterial<T> {
    /// Penetration stiffness (N/m).
    pub stiffness: T,
    /// Hunt-Crossley dissipation (s/m).
    pub dissipation: T,
    pub friction: CoulombFriction<T>,
}

impl<T: Real> ContactMaterial<T> {
    pub fn new(stiffness: T, dissipation: T, friction: CoulombFriction<T>) -> Self {
        Self {
            stiffness,
            dissipation,
            friction,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.stiffness.is_finite() || self.stiffness < T::ZERO {
            return Err("stiffness must be finite and non-negative");
        }
        if !self.dissipation.is_finite() || self.dissipation < T::ZERO {
            return Err("dissipation must be finite and non-negative");
        }
        self.friction.validate()
    }

    /// Effective parameters for a contact between `self` (geometry A) and `other` (geometry B).
    ///
    /// Stiffnesses act as springs in series. Dissipation is weighted by the
    /// opposite stiffness so the softer surface dominates.
    pub fn combine(&self, other: &Self) -> CombinedMaterial<T> {
        let k_sum = self.stiffness + other.stiffness;
        let (stiffness, dissipation) = if k_sum <= T::ZERO {
            (T::ZERO, T::ZERO)
        } else {
            (
                self.stiffness * other.stiffness / k_sum,
                (other.stiffness * self.dissipation + self.stiffness * other.dissipation) / k_sum,
            )
        };
        CombinedMaterial {
            stiffness,
            dissipation,
            friction: self.friction.combine(&other.friction),
        }
    }
}

impl<T: Real> Default for ContactMaterial<T> {
    fn default() -> Self {
        Self {
            stiffness: T::from_f64(1.0e5),
            dissipation: T::from_f64(2.0),
            friction: CoulombFriction::new(T::from_f64(0.6), T::from_f64(0.5)),
        }
    }
}

/// Parameters effective for a single contact pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedMaterial<T> {
    pub stiffness: T,
    pub dissipation: T,
    pub friction: CoulombFriction<T>,
}
