//! Compliant contact force model.
//!
//! The contact law itself is pluggable through [`ContactLaw`]. Whatever law
//! is used, [`compute_force`] enforces the boundary conditions:
//!
//! - no overlap (`depth >= 0`) means no normal force,
//! - the normal force is never negative (contacts only push),
//! - friction opposes slip and never exceeds `μ_static · fn`,
//! - without a slip direction there is no friction force.

use crate::material::{CombinedMaterial, CoulombFriction};
use crate::math::{Real, Vector3};

use super::kinematics::ContactKinematics;
use super::point_pair::PointPair;

/// A compliant normal-force law paired with a velocity-dependent friction law.
pub trait ContactLaw<T: Real>: Send + Sync {
    /// Normal force magnitude for a penetration `x > 0` and separation speed `vn`.
    ///
    /// Negative results are clamped to zero by the caller.
    fn normal_force(&self, penetration: T, separation_speed: T, material: &CombinedMaterial<T>)
        -> T;

    /// Effective friction coefficient at the given slip speed.
    ///
    /// Results are clamped into `[0, static_friction]` by the caller.
    fn friction_coefficient(&self, slip_speed: T, friction: &CoulombFriction<T>) -> T;
}

/// Hunt-Crossley normal force with a Stribeck friction curve.
///
/// Normal force is `fn = k x (1 - d vn)` where `x` is penetration and `vn`
/// the separation speed. Friction ramps from zero at rest up to the static
/// coefficient at `stiction_tolerance`, then settles to the dynamic
/// coefficient at three times that speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HuntCrossley<T> {
    /// Slip speed (m/s) at which the static coefficient is reached.
    pub stiction_tolerance: T,
}

impl<T: Real> HuntCrossley<T> {
    pub fn new(stiction_tolerance: T) -> Self {
        Self { stiction_tolerance }
    }
}

impl<T: Real> ContactLaw<T> for HuntCrossley<T> {
    fn normal_force(
        &self,
        penetration: T,
        separation_speed: T,
        material: &CombinedMaterial<T>,
    ) -> T {
        let damping = T::ONE - material.dissipation * separation_speed;
        material.stiffness * penetration * damping.max(T::ZERO)
    }

    fn friction_coefficient(&self, slip_speed: T, friction: &CoulombFriction<T>) -> T {
        if self.stiction_tolerance <= T::ZERO {
            return friction.dynamic_friction;
        }
        let s = slip_speed / self.stiction_tolerance;
        let one = T::ONE;
        let three = T::from_f64(3.0);
        if s >= three {
            friction.dynamic_friction
        } else if s >= one {
            let t = (s - one) / T::from_f64(2.0);
            friction.static_friction
                - (friction.static_friction - friction.dynamic_friction) * smoothstep5(t)
        } else {
            friction.static_friction * smoothstep5(s)
        }
    }
}

/// Quintic smoothstep on `[0, 1]` with flat first and second derivatives at both ends.
fn smoothstep5<T: Real>(x: T) -> T {
    let x = x.clamp_to(T::ZERO, T::ONE);
    x * x * x * (T::from_f64(10.0) + x * (T::from_f64(6.0) * x - T::from_f64(15.0)))
}

/// Force on body B at the contact point, world frame, with its decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactForce<T: Real> {
    /// Normal force magnitude, never negative.
    pub normal_magnitude: T,
    /// `normal_magnitude · n̂`.
    pub normal: T::Vector,
    /// Friction force, perpendicular to `n̂`.
    pub tangential: T::Vector,
}

impl<T: Real> ContactForce<T> {
    pub fn zero() -> Self {
        Self {
            normal_magnitude: T::ZERO,
            normal: <T::Vector as Vector3>::ZERO,
            tangential: <T::Vector as Vector3>::ZERO,
        }
    }

    /// Net force on body B.
    pub fn total(&self) -> T::Vector {
        self.normal + self.tangential
    }

    pub fn is_finite(&self) -> bool {
        self.normal_magnitude.is_finite() && self.normal.is_finite() && self.tangential.is_finite()
    }
}

/// Compute the contact force on body B for one pair.
pub fn compute_force<T: Real, L: ContactLaw<T> + ?Sized>(
    law: &L,
    pair: &PointPair<T>,
    kinematics: &ContactKinematics<T>,
    material: &CombinedMaterial<T>,
) -> ContactForce<T> {
    if pair.depth() >= T::ZERO {
        return ContactForce::zero();
    }

    let penetration = -pair.depth();
    let normal_magnitude = law
        .normal_force(penetration, kinematics.separation_speed, material)
        .max(T::ZERO);
    let normal = pair.normal().scale(normal_magnitude);

    let tangential = match kinematics.slip_direction {
        Some(direction) if normal_magnitude > T::ZERO => {
            let mu = law
                .friction_coefficient(kinematics.slip_speed, &material.friction)
                .clamp_to(T::ZERO, material.friction.static_friction);
            direction.scale(-(mu * normal_magnitude))
        }
        _ => <T::Vector as Vector3>::ZERO,
    };

    ContactForce {
        normal_magnitude,
        normal,
        tangential,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::kinematics;
    use crate::contact::point_pair::{resolve, RawPointPair};
    use crate::material::ContactMaterial;
    use crate::model::{BodyState, ContactModel, GeometryId};
    use glam::DVec3;

    const K: f64 = 1.0e4;
    const D: f64 = 0.5;

    fn material() -> CombinedMaterial<f64> {
        CombinedMaterial {
            stiffness: K,
            dissipation: D,
            friction: CoulombFriction::new(0.6, 0.4),
        }
    }

    fn pair(depth: f64) -> PointPair<f64> {
        let mut model = ContactModel::<f64>::new();
        let a = model.add_body("a");
        let b = model.add_body("b");
        model
            .add_geometry(GeometryId::new(1), a, ContactMaterial::default())
            .unwrap();
        model
            .add_geometry(GeometryId::new(2), b, ContactMaterial::default())
            .unwrap();
        let raw = RawPointPair {
            id_a: GeometryId::new(1),
            id_b: GeometryId::new(2),
            normal: DVec3::X,
            depth,
            witness_a: DVec3::new(1.0, 0.0, 0.0),
            witness_b: DVec3::new(1.0 + depth, 0.0, 0.0),
        };
        resolve(&model, &raw, 1e-10).unwrap().pair
    }

    fn kinematics_for(pair: &PointPair<f64>, velocity_b: DVec3) -> ContactKinematics<f64> {
        let a = BodyState::at_rest(DVec3::ZERO);
        let b = BodyState::at_rest(DVec3::new(2.0, 0.0, 0.0)).with_linear_velocity(velocity_b);
        kinematics::evaluate(pair, &a, &b, 1e-9)
    }

    #[test]
    fn test_no_overlap_no_force() {
        let law = HuntCrossley::new(1e-4);
        for depth in [0.0, 0.001, 1.0] {
            let p = pair(depth);
            let k = kinematics_for(&p, DVec3::new(-5.0, 2.0, 0.0));
            let f = compute_force(&law, &p, &k, &material());
            assert_eq!(f.total(), DVec3::ZERO, "depth {depth} produced force");
            assert_eq!(f.normal_magnitude, 0.0);
        }
    }

    #[test]
    fn test_head_on_normal_force() {
        let law = HuntCrossley::new(1e-4);
        let p = pair(-0.01);
        let k = kinematics_for(&p, DVec3::NEG_X);
        let f = compute_force(&law, &p, &k, &material());
        // fn = k x (1 - d vn) = 1e4 * 0.01 * (1 + 0.5)
        assert!((f.normal_magnitude - 150.0).abs() < 1e-9);
        assert!(f.normal.x > 0.0);
        assert_eq!(f.tangential, DVec3::ZERO);
    }

    #[test]
    fn test_fast_separation_clamps_to_zero() {
        let law = HuntCrossley::new(1e-4);
        let p = pair(-0.01);
        // 1 - d vn < 0 when vn > 2 m/s.
        let k = kinematics_for(&p, DVec3::new(5.0, 0.0, 0.0));
        let f = compute_force(&law, &p, &k, &material());
        assert_eq!(f.normal_magnitude, 0.0);
        assert_eq!(f.total(), DVec3::ZERO);
    }

    #[test]
    fn test_normal_force_monotone_in_penetration() {
        let law = HuntCrossley::new(1e-4);
        let mut previous = 0.0;
        for i in 1..20 {
            let p = pair(-0.001 * i as f64);
            let k = kinematics_for(&p, DVec3::new(-0.1, 0.0, 0.0));
            let f = compute_force(&law, &p, &k, &material());
            assert!(f.normal_magnitude > previous);
            previous = f.normal_magnitude;
        }
    }

    #[test]
    fn test_friction_opposes_slip_and_is_bounded() {
        let law = HuntCrossley::new(1e-4);
        let p = pair(-0.01);
        for slip in [1e-5, 1e-4, 2e-4, 1.0, 100.0] {
            let k = kinematics_for(&p, DVec3::new(0.0, slip, 0.0));
            let f = compute_force(&law, &p, &k, &material());
            assert!(f.tangential.y <= 0.0, "friction must oppose slip");
            assert!(f.tangential.dot(DVec3::X).abs() < 1e-12);
            let bound = 0.6 * f.normal_magnitude;
            assert!(f.tangential.length() <= bound + 1e-9);
        }
    }

    #[test]
    fn test_zero_slip_zero_friction() {
        let law = HuntCrossley::new(1e-4);
        let p = pair(-0.01);
        let k = kinematics_for(&p, DVec3::ZERO);
        assert_eq!(k.slip_speed, 0.0);
        let f = compute_force(&law, &p, &k, &material());
        assert_eq!(f.tangential, DVec3::ZERO);
        assert!(f.is_finite());
    }

    #[test]
    fn test_stribeck_curve() {
        let law = HuntCrossley::new(1.0);
        let friction = CoulombFriction::new(0.8, 0.5);
        assert_eq!(law.friction_coefficient(0.0, &friction), 0.0);
        assert!((law.friction_coefficient(1.0, &friction) - 0.8).abs() < 1e-12);
        assert!((law.friction_coefficient(3.0, &friction) - 0.5).abs() < 1e-12);
        assert!((law.friction_coefficient(50.0, &friction) - 0.5).abs() < 1e-12);
        let mid = law.friction_coefficient(2.0, &friction);
        assert!(mid < 0.8 && mid > 0.5);
    }

    #[test]
    fn test_zero_stiction_tolerance_uses_dynamic() {
        let law = HuntCrossley::new(0.0f64);
        let friction = CoulombFriction::new(0.8, 0.5);
        assert_eq!(law.friction_coefficient(0.3, &friction), 0.5);
    }

    #[test]
    fn test_single_precision() {
        let law = HuntCrossley::new(1e-4f32);
        let material = CombinedMaterial {
            stiffness: 1.0e4f32,
            dissipation: 0.0,
            friction: CoulombFriction::frictionless(),
        };
        let n = law.normal_force(0.01, -1.0, &material);
        assert!((n - 100.0).abs() < 1e-3);
    }
}
