//! Point-pair query adapter.
//!
//! Validates the collision engine's raw penetration records against the
//! contact model before any force or kinematics work is done.

use crate::error::{ContactError, PairDefect};
use crate::math::{try_normalize, Real, Vector3};
use crate::model::{ContactModel, GeometryId, GeometryInfo};

/// Raw penetration record for one candidate contact, as produced by the
/// collision engine. May be malformed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointPair<T: Real> {
    pub id_a: GeometryId,
    pub id_b: GeometryId,
    /// Contact normal pointing from A's geometry toward B's. Need not be unit length.
    pub normal: T::Vector,
    /// Signed distance between the geometries; negative when overlapping.
    pub depth: T,
    /// Point on A's surface deepest inside B.
    pub witness_a: T::Vector,
    /// Point on B's surface deepest inside A.
    pub witness_b: T::Vector,
}

/// Validated geometric witness of one contact.
///
/// `normal` is unit length and points from body A's geometry toward body B's.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        rename_all = "camelCase",
        bound(serialize = "T: serde::Serialize, T::Vector: serde::Serialize")
    )
)]
pub struct PointPair<T: Real> {
    id_a: GeometryId,
    id_b: GeometryId,
    normal: T::Vector,
    depth: T,
    witness_a: T::Vector,
    witness_b: T::Vector,
}

impl<T: Real> PointPair<T> {
    pub fn id_a(&self) -> GeometryId {
        self.id_a
    }

    pub fn id_b(&self) -> GeometryId {
        self.id_b
    }

    /// Unit normal from A toward B, world frame.
    pub fn normal(&self) -> T::Vector {
        self.normal
    }

    /// Signed distance; negative means the geometries overlap.
    pub fn depth(&self) -> T {
        self.depth
    }

    /// Overlap depth, zero for separated or touching geometries.
    pub fn penetration(&self) -> T {
        (-self.depth).max(T::ZERO)
    }

    pub fn witness_a(&self) -> T::Vector {
        self.witness_a
    }

    pub fn witness_b(&self) -> T::Vector {
        self.witness_b
    }

    /// Midpoint between the two witness points.
    pub fn contact_point(&self) -> T::Vector {
        (self.witness_a + self.witness_b).scale(T::from_f64(0.5))
    }
}

/// A validated pair together with the model geometry it refers to.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedPair<'m, T: Real> {
    pub pair: PointPair<T>,
    pub geometry_a: &'m GeometryInfo<T>,
    pub geometry_b: &'m GeometryInfo<T>,
}

/// Validate one raw record against `model`.
///
/// Fails with [`ContactError::InvalidGeometryPair`] for unknown geometry,
/// non-finite data, or self-contact, and with
/// [`ContactError::DegenerateNormal`] when the normal is not longer than
/// `min_normal_length`. The sign of `depth` is preserved.
pub fn resolve<'m, T: Real>(
    model: &'m ContactModel<T>,
    raw: &RawPointPair<T>,
    min_normal_length: T,
) -> Result<ResolvedPair<'m, T>, ContactError> {
    let invalid = |defect| ContactError::InvalidGeometryPair {
        id_a: raw.id_a,
        id_b: raw.id_b,
        defect,
    };

    let geometry_a = model
        .geometry(raw.id_a)
        .ok_or_else(|| invalid(PairDefect::UnknownGeometry(raw.id_a)))?;
    let geometry_b = model
        .geometry(raw.id_b)
        .ok_or_else(|| invalid(PairDefect::UnknownGeometry(raw.id_b)))?;

    if geometry_a.body == geometry_b.body {
        return Err(invalid(PairDefect::SameBody));
    }

    if !raw.normal.is_finite()
        || !raw.depth.is_finite()
        || !raw.witness_a.is_finite()
        || !raw.witness_b.is_finite()
    {
        return Err(invalid(PairDefect::NonFinite));
    }

    let normal =
        try_normalize(raw.normal, min_normal_length).ok_or(ContactError::DegenerateNormal {
            id_a: raw.id_a,
            id_b: raw.id_b,
        })?;

    Ok(ResolvedPair {
        pair: PointPair {
            id_a: raw.id_a,
            id_b: raw.id_b,
            normal,
            depth: raw.depth,
            witness_a: raw.witness_a,
            witness_b: raw.witness_b,
        },
        geometry_a,
        geometry_b,
    })
}
