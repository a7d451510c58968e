//! Contact force resolution and reporting.
//!
//! # Pipeline
//!
//! Each timestep turns the collision engine's raw point pairs into an ordered
//! [`ContactResults`]. Every pair runs through the same stages on its own:
//!
//! 1. Validate the raw record against the model ([`point_pair::resolve`])
//! 2. Evaluate relative velocity at the contact point ([`kinematics::evaluate`])
//! 3. Compute the contact force on body B ([`force::compute_force`])
//! 4. Assemble an immutable [`ContactReport`]
//!
//! Pairs share only read-only model and state data, so with the `parallel`
//! feature large steps are evaluated on the rayon thread pool. Reports are
//! always emitted in input order.

pub mod force;
pub mod kinematics;
pub mod point_pair;
pub mod report;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::ContactError;
use crate::math::Real;
use crate::model::{ContactModel, SimulationState};

pub use self::force::{ContactForce, ContactLaw, HuntCrossley};
pub use self::kinematics::ContactKinematics;
pub use self::point_pair::{PointPair, RawPointPair};
pub use self::report::{BodyWrench, ContactReport, ContactResults, SkippedPair};

/// Pair count at which evaluation moves onto the rayon pool. Default: 64.
pub const PARALLEL_PAIR_THRESHOLD: usize = 64;

/// Configuration for contact resolution.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Abort the whole step on any per-pair error. Default: false.
    pub strict: bool,
    /// Normals at or below this length are degenerate. Default: 1e-10.
    pub min_normal_length: f64,
    /// Slip speeds at or below this are treated as zero (m/s). Default: 1e-9.
    pub slip_tolerance: f64,
    /// Stribeck transition speed of the default contact law (m/s). Default: 1e-4.
    pub stiction_tolerance: f64,
    /// Evaluate in parallel once a step has this many pairs. Default: 64.
    /// Requires the `parallel` feature.
    pub parallel_threshold: usize,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            strict: false,
            min_normal_length: 1.0e-10,
            slip_tolerance: 1.0e-9,
            stiction_tolerance: 1.0e-4,
            parallel_threshold: PARALLEL_PAIR_THRESHOLD,
        }
    }
}

/// Resolves contact forces for a timestep.
pub struct ContactPipeline<T: Real, L: ContactLaw<T> = HuntCrossley<T>> {
    config: ContactConfig,
    law: L,
    _scalar: std::marker::PhantomData<fn() -> T>,
}

impl<T: Real> ContactPipeline<T> {
    /// Create a pipeline using the default Hunt-Crossley law.
    pub fn new(config: ContactConfig) -> Self {
        let law = HuntCrossley::new(T::from_f64(config.stiction_tolerance));
        Self::with_law(config, law)
    }
}

impl<T: Real, L: ContactLaw<T>> ContactPipeline<T, L> {
    /// Create a pipeline with a custom contact law.
    pub fn with_law(config: ContactConfig, law: L) -> Self {
        Self {
            config,
            law,
            _scalar: std::marker::PhantomData,
        }
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    pub fn law(&self) -> &L {
        &self.law
    }

    /// Whether a step with `pair_count` pairs runs on the rayon pool.
    pub fn should_parallelize(&self, pair_count: usize) -> bool {
        cfg!(feature = "parallel") && pair_count >= self.config.parallel_threshold
    }

    /// Resolve every point pair of one timestep.
    ///
    /// In non-strict mode, pairs failing validation are skipped with a
    /// warning and recorded in [`ContactResults::skipped`]. Any other error,
    /// or any error in strict mode, aborts the step with
    /// [`ContactError::StepAborted`].
    pub fn resolve(
        &self,
        model: &ContactModel<T>,
        state: &SimulationState<T>,
        pairs: &[RawPointPair<T>],
    ) -> Result<ContactResults<T>, ContactError> {
        if state.model() != model.id() {
            return Err(ContactError::ForeignState {
                found: state.model(),
                expected: model.id(),
            });
        }

        let outcomes = self.evaluate_all(model, state, pairs);

        let mut reports = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(report) => reports.push(report),
                Err(error) if error.is_pair_local() && !self.config.strict => {
                    tracing::warn!(pair = index, %error, "skipping contact pair");
                    skipped.push(SkippedPair { index, error });
                }
                Err(error) => {
                    tracing::error!(pair = index, %error, "contact step aborted");
                    return Err(ContactError::StepAborted {
                        pair: index,
                        source: Box::new(error),
                    });
                }
            }
        }

        tracing::debug!(
            pairs = pairs.len(),
            contacts = reports.len(),
            skipped = skipped.len(),
            "contact step resolved"
        );

        Ok(ContactResults::new(reports, skipped))
    }

    /// Evaluate all pairs, returning one outcome per input pair in input order.
    fn evaluate_all(
        &self,
        model: &ContactModel<T>,
        state: &SimulationState<T>,
        pairs: &[RawPointPair<T>],
    ) -> Vec<Result<ContactReport<T>, ContactError>> {
        #[cfg(feature = "parallel")]
        {
            if self.should_parallelize(pairs.len()) {
                // Indexed collect keeps input order regardless of completion order.
                return pairs
                    .par_iter()
                    .map(|raw| self.evaluate_pair(model, state, raw))
                    .collect();
            }
        }

        pairs
            .iter()
            .map(|raw| self.evaluate_pair(model, state, raw))
            .collect()
    }

    /// Run one pair through validation, kinematics, force, and assembly.
    pub fn evaluate_pair(
        &self,
        model: &ContactModel<T>,
        state: &SimulationState<T>,
        raw: &RawPointPair<T>,
    ) -> Result<ContactReport<T>, ContactError> {
        let resolved =
            point_pair::resolve(model, raw, T::from_f64(self.config.min_normal_length))?;
        let pair = resolved.pair;
        let body_a = resolved.geometry_a.body;
        let body_b = resolved.geometry_b.body;

        let kinematics = kinematics::evaluate(
            &pair,
            state.body(body_a)?,
            state.body(body_b)?,
            T::from_f64(self.config.slip_tolerance),
        );

        let material = resolved
            .geometry_a
            .material
            .combine(&resolved.geometry_b.material);
        let force = force::compute_force(&self.law, &pair, &kinematics, &material);

        if !force.is_finite()
            || !kinematics.separation_speed.is_finite()
            || !kinematics.slip_speed.is_finite()
        {
            tracing::error!(
                id_a = %pair.id_a(),
                id_b = %pair.id_b(),
                ?force,
                separation_speed = ?kinematics.separation_speed,
                slip_speed = ?kinematics.slip_speed,
                "non-finite contact force from validated inputs"
            );
            return Err(ContactError::NonFiniteForce {
                id_a: pair.id_a(),
                id_b: pair.id_b(),
            });
        }

        Ok(ContactReport::new(
            body_a,
            body_b,
            force.total(),
            force.normal,
            pair.contact_point(),
            kinematics.separation_speed,
            kinematics.slip_speed,
            pair,
        ))
    }
}
