//! The owned simulation context a host drives once per frame.
//!
//! [`Simulation`] bundles the particle store, lattice, live controls and
//! output buffers. A host calls [`Simulation::step`] from its frame
//! callback, then reads [`Simulation::output`].

use crate::{
    config::{Config, Controls, MAX_WIND_LEVEL},
    error::ConfigError,
    lattice::{Lattice, MeshBuffers},
    output::OutputBuffer,
    particle::ParticleStore,
    phases,
};
use tracing::{debug, info, trace, warn};

/// The two time sources a step consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepClock {
    /// Integration step in seconds.
    pub dt: f32,
    /// Host wall-clock seconds, used only for the wind phase.
    pub elapsed_secs: f64,
}

/// Summary of one completed step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// 1-based number of this step since construction or the last reset.
    pub step: u64,
    pub degenerate_pairs: usize,
}

pub struct Simulation {
    cfg: Config,
    controls: Controls,
    lattice: Lattice,
    store: ParticleStore,
    output: OutputBuffer,
    mesh: MeshBuffers,
    steps: u64,
}

impl Simulation {
    /// Builds the lattice in its rest pose and publishes it once.
    pub fn new(cfg: Config, controls: Controls) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let lattice = Lattice::new(cfg.columns, cfg.rows, cfg.width, cfg.height);
        let store = ParticleStore::from_positions(lattice.rest_positions(), cfg.particle_mass);
        let output = OutputBuffer::from_store(&store);
        let mesh = lattice.mesh_buffers();

        debug!(
            particles = store.len(),
            triangles = mesh.indices.len() / 3,
            iterations = cfg.constraint_iterations,
            "simulation ready"
        );

        let mut sim = Self {
            cfg,
            controls,
            lattice,
            store,
            output,
            mesh,
            steps: 0,
        };
        sim.set_wind_level(u32::from(controls.wind_level));
        Ok(sim)
    }

    /// Advances one frame using the configured fixed timestep.
    pub fn step(&mut self, elapsed_secs: f64) -> StepReport {
        self.step_with(StepClock {
            dt: self.cfg.time_step,
            elapsed_secs,
        })
    }

    /// Advances one frame: forces, integration, relaxation, then output sync.
    ///
    /// Always runs to completion; degenerate constraint pairs are skipped
    /// and counted in the report.
    pub fn step_with(&mut self, clock: StepClock) -> StepReport {
        phases::force_phase(&mut self.store, &self.cfg, &self.controls, clock.elapsed_secs);
        phases::integration_phase(&mut self.store, clock.dt);
        let stats = phases::relaxation_phase(
            &mut self.store,
            &self.lattice,
            &self.controls,
            self.cfg.constraint_iterations,
        );
        self.output.sync(&self.store);

        self.steps += 1;
        trace!(
            step = self.steps,
            dt = clock.dt,
            elapsed = clock.elapsed_secs,
            degenerate = stats.degenerate_pairs,
            "stepped cloth"
        );

        StepReport {
            step: self.steps,
            degenerate_pairs: stats.degenerate_pairs,
        }
    }

    /// Rebuilds the lattice in its rest pose, keeping config and controls.
    pub fn reset(&mut self) {
        self.store =
            ParticleStore::from_positions(self.lattice.rest_positions(), self.cfg.particle_mass);
        self.output.sync(&self.store);
        self.steps = 0;
        info!("cloth reset");
    }

    pub fn set_wind_enabled(&mut self, enabled: bool) {
        if self.controls.wind_enabled != enabled {
            info!(enabled, "wind toggled");
        }
        self.controls.wind_enabled = enabled;
    }

    pub fn set_point_attached(&mut self, attached: bool) {
        if self.controls.point_attached != attached {
            info!(attached, "attachment mode changed");
        }
        self.controls.point_attached = attached;
    }

    pub fn set_cloth_tear(&mut self, tear: bool) {
        if self.controls.cloth_tear != tear {
            info!(tear, "tear mode changed");
        }
        self.controls.cloth_tear = tear;
    }

    pub fn toggle_tear(&mut self) {
        self.set_cloth_tear(!self.controls.cloth_tear);
    }

    /// Sets the wind level, clamping anything above 100.
    pub fn set_wind_level(&mut self, level: u32) {
        let clamped = level.min(MAX_WIND_LEVEL as u32) as u8;
        if clamped as u32 != level {
            warn!(requested = level, applied = clamped, "wind level clamped");
        }
        self.controls.wind_level = clamped;
    }

    pub fn set_controls(&mut self, controls: Controls) {
        self.set_wind_enabled(controls.wind_enabled);
        self.set_point_attached(controls.point_attached);
        self.set_cloth_tear(controls.cloth_tear);
        self.set_wind_level(controls.wind_level as u32);
    }

    #[inline]
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    #[inline]
    pub fn particles(&self) -> &ParticleStore {
        &self.store
    }

    #[inline]
    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    #[inline]
    pub fn output_mut(&mut self) -> &mut OutputBuffer {
        &mut self.output
    }

    #[inline]
    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    #[inline]
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    /// Largest stretch of any enforced link beyond its rest length.
    pub fn max_link_excess(&self) -> f32 {
        phases::max_link_excess(&self.store, &self.lattice, &self.controls)
    }

    /// How far the currently anchored particles sit from their rest pose.
    pub fn max_anchor_drift(&self) -> f32 {
        phases::max_anchor_drift(&self.store, &self.lattice, &self.controls)
    }
}
