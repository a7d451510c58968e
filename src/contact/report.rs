//! Per-pair contact reports and the per-timestep contact set.

use crate::error::ContactError;
use crate::math::{Real, Vector3};
use crate::model::{BodyIndex, ContactModel, SimulationState};

use super::point_pair::PointPair;

/// Contact response between two bodies for one timestep.
///
/// Immutable once assembled. Body order matters: `contact_force` acts on
/// body B, and the normal of `point_pair` points from A toward B. The
/// reaction on body A is `-contact_force` and is not stored.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        rename_all = "camelCase",
        bound(serialize = "T: serde::Serialize, T::Vector: serde::Serialize")
    )
)]
pub struct ContactReport<T: Real> {
    body_a: BodyIndex,
    body_b: BodyIndex,
    force: T::Vector,
    contact_point: T::Vector,
    separation_speed: T,
    slip_speed: T,
    point_pair: PointPair<T>,
    #[cfg_attr(feature = "serde", serde(skip))]
    normal_force: T::Vector,
}

impl<T: Real> ContactReport<T> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        body_a: BodyIndex,
        body_b: BodyIndex,
        force: T::Vector,
        normal_force: T::Vector,
        contact_point: T::Vector,
        separation_speed: T,
        slip_speed: T,
        point_pair: PointPair<T>,
    ) -> Self {
        Self {
            body_a,
            body_b,
            force,
            contact_point,
            separation_speed,
            slip_speed,
            point_pair,
            normal_force,
        }
    }

    pub fn body_a(&self) -> BodyIndex {
        self.body_a
    }

    pub fn body_b(&self) -> BodyIndex {
        self.body_b
    }

    /// Force on body B applied at the contact point, world frame.
    pub fn contact_force(&self) -> T::Vector {
        self.force
    }

    /// Force on body A at the contact point, world frame.
    pub fn reaction_on_a(&self) -> T::Vector {
        -self.force
    }

    /// Normal component of [`contact_force`](Self::contact_force).
    pub fn normal_force(&self) -> T::Vector {
        self.normal_force
    }

    /// Friction component of [`contact_force`](Self::contact_force).
    pub fn tangential_force(&self) -> T::Vector {
        self.force - self.normal_force
    }

    /// World-frame point where the force is applied.
    pub fn contact_point(&self) -> T::Vector {
        self.contact_point
    }

    /// Rate of change of signed distance; positive when separating.
    pub fn separation_speed(&self) -> T {
        self.separation_speed
    }

    /// Magnitude of tangential relative velocity; never negative.
    pub fn slip_speed(&self) -> T {
        self.slip_speed
    }

    pub fn point_pair(&self) -> &PointPair<T> {
        &self.point_pair
    }
}

/// A point pair dropped from a non-strict step.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPair {
    /// Position of the pair in the input sequence.
    pub index: usize,
    pub error: ContactError,
}

/// Net contact force and torque acting on one body.
///
/// Torque is taken about the body origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyWrench<V> {
    pub body: BodyIndex,
    pub force: V,
    pub torque: V,
}

/// All contact reports produced by one timestep, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactResults<T: Real> {
    reports: Vec<ContactReport<T>>,
    skipped: Vec<SkippedPair>,
}

impl<T: Real> Default for ContactResults<T> {
    fn default() -> Self {
        Self {
            reports: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T: Real> ContactResults<T> {
    pub(crate) fn new(reports: Vec<ContactReport<T>>, skipped: Vec<SkippedPair>) -> Self {
        Self { reports, skipped }
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ContactReport<T>> {
        self.reports.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContactReport<T>> {
        self.reports.iter()
    }

    pub fn reports(&self) -> &[ContactReport<T>] {
        &self.reports
    }

    /// Pairs dropped because of a recoverable validation error.
    pub fn skipped(&self) -> &[SkippedPair] {
        &self.skipped
    }

    /// Net contact wrench on every body of `model`, in body index order.
    ///
    /// Each report applies its force to body B and the opposite force to
    /// body A, both at the contact point.
    pub fn body_wrenches(
        &self,
        model: &ContactModel<T>,
        state: &SimulationState<T>,
    ) -> Result<Vec<BodyWrench<T::Vector>>, ContactError> {
        if state.model() != model.id() {
            return Err(ContactError::ForeignState {
                found: state.model(),
                expected: model.id(),
            });
        }

        let zero = <T::Vector as Vector3>::ZERO;
        let mut wrenches: Vec<BodyWrench<T::Vector>> = model
            .bodies()
            .map(|body| BodyWrench {
                body,
                force: zero,
                torque: zero,
            })
            .collect();

        for report in &self.reports {
            for (body, force) in [
                (report.body_a, report.reaction_on_a()),
                (report.body_b, report.force),
            ] {
                model.check_body(body)?;
                let origin = state.body(body)?.position;
                let wrench = &mut wrenches[body.index()];
                wrench.force = wrench.force + force;
                wrench.torque = wrench.torque + (report.contact_point - origin).cross(force);
            }
        }

        Ok(wrenches)
    }
}

impl<'a, T: Real> IntoIterator for &'a ContactResults<T> {
    type Item = &'a ContactReport<T>;
    type IntoIter = std::slice::Iter<'a, ContactReport<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::point_pair::{resolve, RawPointPair};
    use crate::material::ContactMaterial;
    use crate::model::{BodyState, GeometryId};
    use glam::DVec3;

    #[test]
    fn test_wrenches_balance() {
        let mut model = ContactModel::<f64>::new();
        let a = model.add_body("a");
        let b = model.add_body("b");
        model
            .add_geometry(GeometryId::new(1), a, ContactMaterial::default())
            .unwrap();
        model
            .add_geometry(GeometryId::new(2), b, ContactMaterial::default())
            .unwrap();
        let mut state = model.new_state();
        state
            .set_body(b, BodyState::at_rest(DVec3::new(2.0, 0.0, 0.0)))
            .unwrap();

        let raw = RawPointPair {
            id_a: GeometryId::new(1),
            id_b: GeometryId::new(2),
            normal: DVec3::X,
            depth: -0.1,
            witness_a: DVec3::new(1.0, 0.5, 0.0),
            witness_b: DVec3::new(0.9, 0.5, 0.0),
        };
        let pair = resolve(&model, &raw, 1e-10).unwrap().pair;
        let force = DVec3::new(10.0, -2.0, 0.0);
        let report = ContactReport::new(
            a,
            b,
            force,
            DVec3::new(10.0, 0.0, 0.0),
            pair.contact_point(),
            -1.0,
            2.0,
            pair,
        );
        assert_eq!(report.reaction_on_a(), -force);
        assert_eq!(report.tangential_force(), DVec3::new(0.0, -2.0, 0.0));

        let results = ContactResults::new(vec![report], Vec::new());
        let wrenches = results.body_wrenches(&model, &state).unwrap();
        assert_eq!(wrenches.len(), 2);
        assert_eq!(wrenches[0].force + wrenches[1].force, DVec3::ZERO);

        // Angular momentum about the world origin is conserved too.
        let total_torque_world = wrenches[0].torque
            + wrenches[1].torque
            + DVec3::ZERO.cross(wrenches[0].force)
            + DVec3::new(2.0, 0.0, 0.0).cross(wrenches[1].force);
        assert!(total_torque_world.length() < 1e-12);
    }

    #[test]
    fn test_foreign_state_rejected() {
        let model = ContactModel::<f64>::new();
        let other = ContactModel::<f64>::new();
        let results = ContactResults::<f64>::default();
        let err = results
            .body_wrenches(&model, &other.new_state())
            .unwrap_err();
        assert!(matches!(err, ContactError::ForeignState { .. }));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_report_wire_shape() -> anyhow::Result<()> {
        let mut model = ContactModel::<f64>::new();
        let a = model.add_body("a");
        let b = model.add_body("b");
        model.add_geometry(GeometryId::new(3), a, ContactMaterial::default())?;
        model.add_geometry(GeometryId::new(4), b, ContactMaterial::default())?;
        let raw = RawPointPair {
            id_a: GeometryId::new(3),
            id_b: GeometryId::new(4),
            normal: DVec3::X,
            depth: -0.5,
            witness_a: DVec3::new(1.0, 0.0, 0.0),
            witness_b: DVec3::new(0.5, 0.0, 0.0),
        };
        let pair = resolve(&model, &raw, 1e-10)?.pair;
        let report = ContactReport::new(
            a,
            b,
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
            pair.contact_point(),
            -1.0,
            0.0,
            pair,
        );

        let json = serde_json::to_value(report)?;
        assert_eq!(json["bodyA"], 0);
        assert_eq!(json["bodyB"], 1);
        assert_eq!(json["force"], serde_json::json!([4.0, 0.0, 0.0]));
        assert_eq!(json["contactPoint"], serde_json::json!([0.75, 0.0, 0.0]));
        assert_eq!(json["separationSpeed"], -1.0);
        assert_eq!(json["slipSpeed"], 0.0);
        assert_eq!(json["pointPair"]["idA"], 3);
        assert_eq!(json["pointPair"]["depth"], -0.5);
        assert!(json.get("normalForce").is_none());
        Ok(())
    }

    #[test]
    fn test_empty_results() {
        let results = ContactResults::<f32>::default();
        assert!(results.is_empty());
        assert_eq!(results.len(), 0);
        assert!(results.get(0).is_none());
        assert_eq!(results.iter().count(), 0);
    }
}
