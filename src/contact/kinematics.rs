//! Relative velocity at the contact point, split into separation and slip.

use crate::math::{stable_length, try_normalize, Real, Vector3};
use crate::model::BodyState;

use super::point_pair::PointPair;

/// Contact-point kinematics for one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactKinematics<T: Real> {
    /// `v_B(C) - v_A(C)` in the world frame.
    pub relative_velocity: T::Vector,
    /// `v_rel · n̂`; positive when the bodies move apart.
    pub separation_speed: T,
    /// Tangential part of `relative_velocity`; zero below the slip tolerance.
    pub tangential_velocity: T::Vector,
    /// `|tangential_velocity|`, never negative.
    pub slip_speed: T,
    /// Unit slip direction, `None` when slip is below the tolerance.
    pub slip_direction: Option<T::Vector>,
}

/// Evaluate contact kinematics for `pair` between `body_a` and `body_b`.
///
/// Slip at or below `slip_tolerance` is reported as exactly zero with no
/// direction, so nothing downstream ever divides by a vanishing norm. A slip
/// whose norm is not finite is reported as is with no direction.
pub fn evaluate<T: Real>(
    pair: &PointPair<T>,
    body_a: &BodyState<T::Vector>,
    body_b: &BodyState<T::Vector>,
    slip_tolerance: T,
) -> ContactKinematics<T> {
    let contact_point = pair.contact_point();
    let normal = pair.normal();

    let relative_velocity =
        body_b.point_velocity(contact_point) - body_a.point_velocity(contact_point);
    let separation_speed = relative_velocity.dot(normal);
    let tangential = relative_velocity - normal.scale(separation_speed);

    let slip = stable_length(tangential);
    let (tangential_velocity, slip_speed, slip_direction) =
        if slip.is_finite() && slip <= slip_tolerance {
            (<T::Vector as Vector3>::ZERO, T::ZERO, None)
        } else {
            // Non-finite slip passes through for the caller to reject.
            (tangential, slip, try_normalize(tangential, T::ZERO))
        };

    ContactKinematics {
        relative_velocity,
        separation_speed,
        tangential_velocity,
        slip_speed,
        slip_direction,
    }
}
