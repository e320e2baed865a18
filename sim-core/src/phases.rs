//! Per-frame simulation phases for the cloth lattice.
//!
//! The update loop looks like:
//! 1. [`force_phase`] — recompute every particle's external force
//!    (gravity plus the optional wind).
//! 2. [`integration_phase`] — advance positions and velocities by one
//!    fixed timestep.
//! 3. [`relaxation_phase`] — run the configured number of
//!    [`relaxation_pass`]es to pull the lattice back toward its rest
//!    lengths and re-pin anchored particles.
//!
//! Publishing the result for rendering is handled by
//! [`crate::output::OutputBuffer::sync`].

use crate::{
    config::{Config, Controls},
    constraint::{Correction, anchor_constraint, distance_constraint},
    force::{external_force, wind_force},
    lattice::Lattice,
    particle::ParticleStore,
};

/// Counters gathered over a relaxation phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelaxStats {
    pub passes: u32,
    /// Distance constraints skipped because both particles coincided.
    pub degenerate_pairs: usize,
}

/// Overwrites every particle's force with gravity and, if enabled, wind.
///
/// ### Parameters
/// - `store` - Particles whose `force` fields are replaced.
/// - `cfg` - Provides gravity and the wind constants.
/// - `controls` - Wind toggle and level for this step.
/// - `elapsed_secs` - Host wall-clock time, driving the wind phase.
pub fn force_phase(
    store: &mut ParticleStore,
    cfg: &Config,
    controls: &Controls,
    elapsed_secs: f64,
) {
    let wind = wind_force(cfg, controls, elapsed_secs);
    for p in &mut store.particles {
        p.force = external_force(cfg, p.mass, wind);
    }
}

/// Advances every particle by `dt` under its accumulated force.
///
/// For each particle, with `a = force / mass`:
///
/// ```text
/// new_position = position + velocity * dt + a * dt² / 2
/// velocity     = velocity * dt + a * dt³ / 2
/// previous     = position
/// position     = new_position
/// ```
///
/// Constraint corrections do not feed back into velocity, so the carried
/// velocity is rescaled by `dt` every step to stay bounded.
pub fn integration_phase(store: &mut ParticleStore, dt: f32) {
    for p in &mut store.particles {
        let accel = p.force / p.mass;
        let new_position = p.position + p.velocity * dt + accel * (dt * dt * 0.5);
        p.velocity = p.velocity * dt + accel * (dt * dt * dt * 0.5);
        p.previous = p.position;
        p.position = new_position;
    }
}

/// One Gauss-Seidel sweep over the lattice in row-major order.
///
/// Per cell, in order:
/// 1. distance constraint to the left neighbour, unless the link is cut
///    by tear mode (see [`Lattice::horizontal_link_active`]);
/// 2. distance constraint to the neighbour above;
/// 3. anchor constraint for pinned top-row cells.
///
/// Corrections are applied in place, so later cells see positions already
/// moved earlier in the same sweep.
///
/// ### Returns
/// The number of distance constraints skipped as degenerate.
pub fn relaxation_pass(store: &mut ParticleStore, lattice: &Lattice, controls: &Controls) -> usize {
    let horizontal_rest = lattice.horizontal_rest_length();
    let vertical_rest = lattice.vertical_rest_length();
    let mut degenerate = 0;

    for cell in lattice.cells() {
        let id = lattice.index(cell.row, cell.col);

        if lattice.horizontal_link_active(cell, controls.cloth_tear)
            && let Some(left) = lattice.left(cell)
        {
            let (a, b) = store.pair_mut(id, lattice.index(left.row, left.col));
            if distance_constraint(a, b, horizontal_rest) == Correction::Degenerate {
                degenerate += 1;
            }
        }

        if let Some(above) = lattice.above(cell) {
            let (a, b) = store.pair_mut(id, lattice.index(above.row, above.col));
            if distance_constraint(a, b, vertical_rest) == Correction::Degenerate {
                degenerate += 1;
            }
        }

        if lattice.is_anchored(cell, controls.point_attached) {
            anchor_constraint(store.get_mut(id));
        }
    }

    degenerate
}

/// Runs `iterations` relaxation passes. More passes give a stiffer cloth.
pub fn relaxation_phase(
    store: &mut ParticleStore,
    lattice: &Lattice,
    controls: &Controls,
    iterations: u32,
) -> RelaxStats {
    let mut stats = RelaxStats::default();
    for _ in 0..iterations {
        stats.degenerate_pairs += relaxation_pass(store, lattice, controls);
        stats.passes += 1;
    }
    stats
}

/// Largest amount by which any enforced link exceeds its rest length.
///
/// Links cut by tear mode are ignored. Returns `0.0` for a lattice with
/// every link at or below rest length.
pub fn max_link_excess(store: &ParticleStore, lattice: &Lattice, controls: &Controls) -> f32 {
    let horizontal_rest = lattice.horizontal_rest_length();
    let vertical_rest = lattice.vertical_rest_length();
    let mut worst = 0.0_f32;

    for cell in lattice.cells() {
        let p = store.get(lattice.index(cell.row, cell.col)).position;

        if lattice.horizontal_link_active(cell, controls.cloth_tear)
            && let Some(left) = lattice.left(cell)
        {
            let q = store.get(lattice.index(left.row, left.col)).position;
            worst = worst.max(p.distance(q) - horizontal_rest);
        }
        if let Some(above) = lattice.above(cell) {
            let q = store.get(lattice.index(above.row, above.col)).position;
            worst = worst.max(p.distance(q) - vertical_rest);
        }
    }

    worst
}

/// Largest distance of any currently anchored particle from its rest pose.
pub fn max_anchor_drift(store: &ParticleStore, lattice: &Lattice, controls: &Controls) -> f32 {
    lattice
        .cells()
        .filter(|&cell| lattice.is_anchored(cell, controls.point_attached))
        .map(|cell| {
            let p = store.get(lattice.index(cell.row, cell.col));
            p.position.distance(p.original)
        })
        .fold(0.0, f32::max)
}
