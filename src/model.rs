//! Contact model: bodies, geometries, and per-step simulation state.
//!
//! Every [`BodyIndex`] is stamped with the [`ModelId`] of the model that
//! issued it. Handles from one model are rejected by any other model or by
//! state created for another model, so cross-model mixing is a checked
//! error rather than a silent mismatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ContactError;
use crate::material::ContactMaterial;
use crate::math::{Real, Vector3};

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a [`ContactModel`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(u64);

impl ModelId {
    fn next() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a rigid body within one [`ContactModel`].
///
/// Only [`ContactModel::add_body`] creates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyIndex {
    model: ModelId,
    index: u32,
}

impl BodyIndex {
    /// Position of the body in its model's body list.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn model(self) -> ModelId {
        self.model
    }
}

impl fmt::Display for BodyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.index)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BodyIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.index)
    }
}

/// Identifier assigned to a collision geometry by the collision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GeometryId(u64);

impl GeometryId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GeometryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geom#{}", self.0)
    }
}

/// A geometry registered with the model.
#[derive(Debug, Clone, Copy)]
pub struct GeometryInfo<T> {
    pub id: GeometryId,
    pub body: BodyIndex,
    pub material: ContactMaterial<T>,
}

/// Static description of the bodies and geometries taking part in contact.
#[derive(Debug, Clone)]
pub struct ContactModel<T> {
    id: ModelId,
    body_names: Vec<String>,
    geometries: HashMap<GeometryId, GeometryInfo<T>>,
}

impl<T: Real> Default for ContactModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Real> ContactModel<T> {
    pub fn new() -> Self {
        Self {
            id: ModelId::next(),
            body_names: Vec::new(),
            geometries: HashMap::new(),
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Register a new body and return its handle.
    pub fn add_body(&mut self, name: impl Into<String>) -> BodyIndex {
        let index = self.body_names.len() as u32;
        self.body_names.push(name.into());
        BodyIndex {
            model: self.id,
            index,
        }
    }

    /// Attach a collision geometry with its material to `body`.
    pub fn add_geometry(
        &mut self,
        id: GeometryId,
        body: BodyIndex,
        material: ContactMaterial<T>,
    ) -> Result<(), ContactError> {
        self.check_body(body)?;
        material
            .validate()
            .map_err(|reason| ContactError::InvalidMaterial {
                geometry: id,
                reason,
            })?;
        if self.geometries.contains_key(&id) {
            return Err(ContactError::DuplicateGeometry(id));
        }
        self.geometries.insert(
            id,
            GeometryInfo {
                id,
                body,
                material,
            },
        );
        Ok(())
    }

    pub fn num_bodies(&self) -> usize {
        self.body_names.len()
    }

    pub fn num_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn body_name(&self, body: BodyIndex) -> Option<&str> {
        if body.model != self.id {
            return None;
        }
        self.body_names.get(body.index()).map(String::as_str)
    }

    /// All body handles in index order.
    pub fn bodies(&self) -> impl Iterator<Item = BodyIndex> + '_ {
        (0..self.body_names.len() as u32).map(move |index| BodyIndex {
            model: self.id,
            index,
        })
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&GeometryInfo<T>> {
        self.geometries.get(&id)
    }

    /// Create a state for this model with every body at rest at the origin.
    pub fn new_state(&self) -> SimulationState<T> {
        SimulationState {
            model: self.id,
            bodies: vec![BodyState::at_rest(<T::Vector as Vector3>::ZERO); self.num_bodies()],
        }
    }

    pub(crate) fn check_body(&self, body: BodyIndex) -> Result<(), ContactError> {
        if body.model != self.id || body.index() >= self.body_names.len() {
            return Err(ContactError::ForeignBody {
                body,
                expected: self.id,
            });
        }
        Ok(())
    }
}

/// World-frame kinematic state of one body.
///
/// `position` is the body origin; velocities are the origin's linear velocity
/// and the body's angular velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState<V> {
    pub position: V,
    pub linear_velocity: V,
    pub angular_velocity: V,
}

impl<V: Vector3> BodyState<V> {
    pub fn at_rest(position: V) -> Self {
        Self {
            position,
            linear_velocity: V::ZERO,
            angular_velocity: V::ZERO,
        }
    }

    pub fn with_linear_velocity(mut self, velocity: V) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, velocity: V) -> Self {
        self.angular_velocity = velocity;
        self
    }

    /// Velocity of the material point of this body coincident with `point`.
    #[inline]
    pub fn point_velocity(&self, point: V) -> V {
        self.linear_velocity + self.angular_velocity.cross(point - self.position)
    }
}

/// Poses and velocities of all bodies of one model for a single timestep.
///
/// Read-only while contacts are resolved.
#[derive(Debug, Clone)]
pub struct SimulationState<T: Real> {
    model: ModelId,
    bodies: Vec<BodyState<T::Vector>>,
}

impl<T: Real> SimulationState<T> {
    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn body(&self, body: BodyIndex) -> Result<&BodyState<T::Vector>, ContactError> {
        self.check_body(body)?;
        Ok(&self.bodies[body.index()])
    }

    pub fn set_body(
        &mut self,
        body: BodyIndex,
        state: BodyState<T::Vector>,
    ) -> Result<(), ContactError> {
        self.check_body(body)?;
        self.bodies[body.index()] = state;
        Ok(())
    }

    fn check_body(&self, body: BodyIndex) -> Result<(), ContactError> {
        if body.model != self.model {
            return Err(ContactError::ForeignBody {
                body,
                expected: self.model,
            });
        }
        if body.index() >= self.bodies.len() {
            return Err(ContactError::StaleState {
                body,
                bodies: self.bodies.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::CoulombFriction;
    use glam::DVec3;

    fn material() -> ContactMaterial<f64> {
        ContactMaterial::new(1.0e4, 1.0, CoulombFriction::new(0.5, 0.5))
    }

    #[test]
    fn test_body_indices_are_sequential() {
        let mut model = ContactModel::<f64>::new();
        let a = model.add_body("ground");
        let b = model.add_body("ball");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(model.body_name(b), Some("ball"));
        assert_eq!(model.bodies().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_foreign_body_rejected() {
        let mut model_a = ContactModel::<f64>::new();
        let mut model_b = ContactModel::<f64>::new();
        let _ = model_a.add_body("a0");
        let foreign = model_b.add_body("b0");

        assert_ne!(model_a.id(), model_b.id());
        let err = model_a
            .add_geometry(GeometryId::new(1), foreign, material())
            .unwrap_err();
        assert!(matches!(err, ContactError::ForeignBody { .. }));

        let mut state = model_a.new_state();
        assert!(state.body(foreign).is_err());
        assert!(state
            .set_body(foreign, BodyState::at_rest(DVec3::ZERO))
            .is_err());
        assert_eq!(model_a.body_name(foreign), None);
    }

    #[test]
    fn test_state_created_before_add_body_is_stale() {
        let mut model = ContactModel::<f64>::new();
        let _ = model.add_body("ground");
        let mut state = model.new_state();
        let late = model.add_body("late");

        let err = state.body(late).unwrap_err();
        assert_eq!(
            err,
            ContactError::StaleState {
                body: late,
                bodies: 1
            }
        );
        assert!(err.to_string().contains("added to the model after"));
        assert!(matches!(
            state.set_body(late, BodyState::at_rest(DVec3::ZERO)),
            Err(ContactError::StaleState { .. })
        ));

        let fresh = model.new_state();
        assert!(fresh.body(late).is_ok());
    }

    #[test]
    fn test_duplicate_geometry_rejected() {
        let mut model = ContactModel::<f64>::new();
        let body = model.add_body("box");
        model
            .add_geometry(GeometryId::new(5), body, material())
            .unwrap();
        let err = model
            .add_geometry(GeometryId::new(5), body, material())
            .unwrap_err();
        assert_eq!(err, ContactError::DuplicateGeometry(GeometryId::new(5)));
        assert_eq!(model.num_geometries(), 1);
    }

    #[test]
    fn test_invalid_material_rejected() {
        let mut model = ContactModel::<f64>::new();
        let body = model.add_body("box");
        let bad = ContactMaterial::new(1.0, 1.0, CoulombFriction::new(0.1, 0.9));
        let err = model
            .add_geometry(GeometryId::new(1), body, bad)
            .unwrap_err();
        assert!(matches!(err, ContactError::InvalidMaterial { .. }));
    }

    #[test]
    fn test_point_velocity_includes_rotation() {
        let state = BodyState::at_rest(DVec3::new(1.0, 0.0, 0.0))
            .with_linear_velocity(DVec3::new(0.0, 0.0, 1.0))
            .with_angular_velocity(DVec3::new(0.0, 0.0, 2.0));
        // r = (1, 0, 0) from the origin at x = 1; w x r = (0, 2, 0).
        let v = state.point_velocity(DVec3::new(2.0, 0.0, 0.0));
        assert!((v - DVec3::new(0.0, 2.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_state_roundtrip() {
        let mut model = ContactModel::<f64>::new();
        let body = model.add_body("ball");
        let mut state = model.new_state();
        let moving = BodyState::at_rest(DVec3::X).with_linear_velocity(DVec3::NEG_X);
        state.set_body(body, moving).unwrap();
        assert_eq!(*state.body(body).unwrap(), moving);
        assert_eq!(state.model(), model.id());
    }
}
