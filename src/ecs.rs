//! hecs bridge: snapshot ECS bodies into a contact model and feed the
//! resolved contact wrenches back into per-entity force accumulators.

use std::collections::HashMap;

use glam::Vec3;

use crate::contact::ContactResults;
use crate::error::ContactError;
use crate::material::ContactMaterial;
use crate::model::{BodyIndex, BodyState, ContactModel, GeometryId, SimulationState};

/// World-frame motion of a body entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMotion {
    pub position: Vec3,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl BodyMotion {
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }
}

/// Collision geometry attached to a body entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    pub id: GeometryId,
    pub material: ContactMaterial<f32>,
}

/// Force and torque accumulated on a body entity this step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceAccumulator {
    pub force: Vec3,
    pub torque: Vec3,
}

/// Contact model and state built from the entities of a [`hecs::World`].
pub struct EcsContactScene {
    pub model: ContactModel<f32>,
    pub state: SimulationState<f32>,
    entities: Vec<hecs::Entity>,
    bodies: HashMap<hecs::Entity, BodyIndex>,
}

impl EcsContactScene {
    /// Snapshot every entity with both [`BodyMotion`] and [`ContactGeometry`].
    ///
    /// Entities are ordered by id so body indices are reproducible.
    pub fn from_world(world: &hecs::World) -> Result<Self, ContactError> {
        let mut entries: Vec<(hecs::Entity, BodyMotion, ContactGeometry)> = world
            .query::<(&BodyMotion, &ContactGeometry)>()
            .iter()
            .map(|(entity, (motion, geometry))| (entity, *motion, *geometry))
            .collect();
        entries.sort_by_key(|(entity, _, _)| entity.id());

        let mut model = ContactModel::new();
        let mut entities = Vec::with_capacity(entries.len());
        let mut bodies = HashMap::with_capacity(entries.len());
        for (entity, _, geometry) in &entries {
            let body = model.add_body(format!("{entity:?}"));
            model.add_geometry(geometry.id, body, geometry.material)?;
            entities.push(*entity);
            bodies.insert(*entity, body);
        }

        let mut state = model.new_state();
        for (entity, motion, _) in &entries {
            state.set_body(
                bodies[entity],
                BodyState {
                    position: motion.position,
                    linear_velocity: motion.linear_velocity,
                    angular_velocity: motion.angular_velocity,
                },
            )?;
        }

        tracing::debug!(bodies = entities.len(), "contact scene snapshot");

        Ok(Self {
            model,
            state,
            entities,
            bodies,
        })
    }

    pub fn body(&self, entity: hecs::Entity) -> Option<BodyIndex> {
        self.bodies.get(&entity).copied()
    }

    pub fn entity(&self, body: BodyIndex) -> Option<hecs::Entity> {
        if body.model() != self.model.id() {
            return None;
        }
        self.entities.get(body.index()).copied()
    }

    /// Add each body's net contact wrench to its [`ForceAccumulator`].
    ///
    /// Entities without an accumulator are skipped.
    pub fn apply_forces(
        &self,
        world: &mut hecs::World,
        results: &ContactResults<f32>,
    ) -> Result<(), ContactError> {
        for wrench in results.body_wrenches(&self.model, &self.state)? {
            let Some(entity) = self.entity(wrench.body) else {
                continue;
            };
            if let Ok(mut acc) = world.get::<&mut ForceAccumulator>(entity) {
                acc.force += wrench.force;
                acc.torque += wrench.torque;
            }
        }
        Ok(())
    }
}
