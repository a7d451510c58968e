//! Contact pipeline error types.

use thiserror::Error;

use crate::model::{BodyIndex, GeometryId, ModelId};

/// Why a raw point pair was rejected by the query adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PairDefect {
    /// The geometry is not registered with the contact model.
    #[error("geometry {0} is not registered with the model")]
    UnknownGeometry(GeometryId),

    /// Normal, depth, or a witness point is NaN or infinite.
    #[error("non-finite geometric data")]
    NonFinite,

    /// Both geometries belong to the same body.
    #[error("both geometries are attached to the same body")]
    SameBody,
}

/// Errors produced while building a contact model or resolving a timestep.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContactError {
    /// A point pair referenced unknown geometry or carried malformed data.
    #[error("invalid geometry pair ({id_a}, {id_b}): {defect}")]
    InvalidGeometryPair {
        id_a: GeometryId,
        id_b: GeometryId,
        defect: PairDefect,
    },

    /// The contact normal has (near) zero length and cannot be normalized.
    #[error("degenerate contact normal for geometry pair ({id_a}, {id_b})")]
    DegenerateNormal { id_a: GeometryId, id_b: GeometryId },

    /// The force law produced NaN or infinity from validated inputs.
    #[error("non-finite contact force for geometry pair ({id_a}, {id_b})")]
    NonFiniteForce { id_a: GeometryId, id_b: GeometryId },

    /// A per-pair failure aborted contact resolution for the whole timestep.
    #[error("contact step aborted at pair {pair}: {source}")]
    StepAborted {
        /// Position of the failing pair in the input sequence.
        pair: usize,
        #[source]
        source: Box<ContactError>,
    },

    /// A body handle issued by a different model was used.
    #[error("body {body:?} does not belong to model {expected:?}")]
    ForeignBody { body: BodyIndex, expected: ModelId },

    /// The state predates a body added to its model afterwards.
    #[error("simulation state holds {bodies} bodies; {body} was added to the model after it was created")]
    StaleState { body: BodyIndex, bodies: usize },

    /// Simulation state was created for a different model.
    #[error("simulation state belongs to model {found:?}, expected {expected:?}")]
    ForeignState { found: ModelId, expected: ModelId },

    /// The geometry id was already registered.
    #[error("geometry {0} is already registered")]
    DuplicateGeometry(GeometryId),

    /// Material parameters are negative, non-finite, or inconsistent.
    #[error("invalid contact material for geometry {geometry}: {reason}")]
    InvalidMaterial {
        geometry: GeometryId,
        reason: &'static str,
    },
}

impl ContactError {
    /// Whether a non-strict step may drop the offending pair and continue.
    pub fn is_pair_local(&self) -> bool {
        matches!(
            self,
            ContactError::InvalidGeometryPair { .. } | ContactError::DegenerateNormal { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_local_classification() {
        let a = GeometryId::new(1);
        let b = GeometryId::new(2);
        assert!(ContactError::DegenerateNormal { id_a: a, id_b: b }.is_pair_local());
        assert!(ContactError::InvalidGeometryPair {
            id_a: a,
            id_b: b,
            defect: PairDefect::NonFinite,
        }
        .is_pair_local());
        assert!(!ContactError::NonFiniteForce { id_a: a, id_b: b }.is_pair_local());
        assert!(!ContactError::DuplicateGeometry(a).is_pair_local());
    }

    #[test]
    fn test_step_aborted_message_includes_source() {
        let err = ContactError::StepAborted {
            pair: 3,
            source: Box::new(ContactError::DegenerateNormal {
                id_a: GeometryId::new(7),
                id_b: GeometryId::new(9),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("pair 3"), "unexpected message: {msg}");
        assert!(msg.contains("degenerate contact normal"), "unexpected message: {msg}");
    }
}
