//! Scene setup shared by the contact benchmarks.

use contact_report::{
    BodyState, ContactMaterial, ContactModel, GeometryId, RawPointPair, SimulationState,
};
use glam::DVec3;

/// A row of `n` unit spheres resting on a ground body, each slightly sunk
/// into the ground and sliding along x. Returns one point pair per sphere.
pub fn setup_sphere_row(
    n: usize,
) -> (ContactModel<f64>, SimulationState<f64>, Vec<RawPointPair<f64>>) {
    let mut model = ContactModel::new();
    let ground = model.add_body("ground");
    let ground_geom = GeometryId::new(0);
    model
        .add_geometry(ground_geom, ground, ContactMaterial::default())
        .expect("ground geometry");

    let mut spheres = Vec::with_capacity(n);
    for i in 0..n {
        let body = model.add_body(format!("sphere_{i}"));
        let geom = GeometryId::new(i as u64 + 1);
        model
            .add_geometry(geom, body, ContactMaterial::default())
            .expect("sphere geometry");
        spheres.push((body, geom));
    }

    let mut state = model.new_state();
    let mut pairs = Vec::with_capacity(n);
    for (i, (body, geom)) in spheres.into_iter().enumerate() {
        let x = i as f64 * 3.0;
        let depth = -0.001 * (1 + i % 7) as f64;
        state
            .set_body(
                body,
                BodyState::at_rest(DVec3::new(x, 1.0 + depth, 0.0))
                    .with_linear_velocity(DVec3::new(0.5, -0.2, 0.0))
                    .with_angular_velocity(DVec3::new(0.0, 0.0, 1.0)),
            )
            .expect("sphere state");
        pairs.push(RawPointPair {
            id_a: ground_geom,
            id_b: geom,
            normal: DVec3::Y,
            depth,
            witness_a: DVec3::new(x, 0.0, 0.0),
            witness_b: DVec3::new(x, depth, 0.0),
        });
    }

    (model, state, pairs)
}
