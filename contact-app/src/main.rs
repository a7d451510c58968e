//! Resolves contacts for a two-sphere collision and prints the contact set as JSON.
//!
//! Run:    cargo run --manifest-path contact-app/Cargo.toml -- --overlap 0.01 --speed 1
//! Logs:   RUST_LOG=contact_report=debug cargo run --manifest-path contact-app/Cargo.toml

use clap::Parser;
use contact_report::{
    BodyState, ContactConfig, ContactMaterial, ContactModel, ContactPipeline, CoulombFriction,
    GeometryId, RawPointPair,
};
use glam::DVec3;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Overlap between the spheres along x, in meters. Zero means touching.
    #[arg(short, long, default_value_t = 0.01)]
    overlap: f64,

    /// Approach speed of sphere B toward the static sphere A, in m/s.
    #[arg(short, long, default_value_t = 1.0)]
    speed: f64,

    /// Lateral (y) speed of sphere B, in m/s.
    #[arg(short, long, default_value_t = 0.0)]
    lateral: f64,

    /// Surface stiffness of both spheres, in N/m.
    #[arg(long, default_value_t = 1.0e5)]
    stiffness: f64,

    /// Also submit a malformed pair with a zero-length normal.
    #[arg(long)]
    with_degenerate: bool,

    /// Abort the step on any per-pair error.
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let material = ContactMaterial::new(args.stiffness, 2.0, CoulombFriction::new(0.6, 0.5));
    let mut model = ContactModel::<f64>::new();
    let sphere_a = model.add_body("sphere_a");
    let sphere_b = model.add_body("sphere_b");
    let geom_a = GeometryId::new(1);
    let geom_b = GeometryId::new(2);
    model.add_geometry(geom_a, sphere_a, material)?;
    model.add_geometry(geom_b, sphere_b, material)?;

    // Unit spheres: A rests at the origin, B sits along +x.
    let depth = -args.overlap;
    let mut state = model.new_state();
    state.set_body(
        sphere_b,
        BodyState::at_rest(DVec3::new(2.0 + depth, 0.0, 0.0))
            .with_linear_velocity(DVec3::new(-args.speed, args.lateral, 0.0)),
    )?;

    let mut pairs = vec![RawPointPair {
        id_a: geom_a,
        id_b: geom_b,
        normal: DVec3::X,
        depth,
        witness_a: DVec3::new(1.0, 0.0, 0.0),
        witness_b: DVec3::new(1.0 + depth, 0.0, 0.0),
    }];
    if args.with_degenerate {
        let degenerate = RawPointPair {
            normal: DVec3::ZERO,
            ..pairs[0]
        };
        pairs.push(degenerate);
    }

    let pipeline = ContactPipeline::new(ContactConfig {
        strict: args.strict,
        ..Default::default()
    });
    let results = pipeline.resolve(&model, &state, &pairs)?;

    for skipped in results.skipped() {
        tracing::info!(pair = skipped.index, error = %skipped.error, "pair skipped");
    }
    println!("{}", serde_json::to_string_pretty(results.reports())?);

    for wrench in results.body_wrenches(&model, &state)? {
        tracing::info!(
            body = %wrench.body,
            force = ?wrench.force,
            torque = ?wrench.torque,
            "net contact wrench"
        );
    }

    Ok(())
}
