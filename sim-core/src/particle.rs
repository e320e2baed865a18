use crate::types::ParticleId;
use glam::Vec3;

#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    /// Position before the last integration step. Written by the
    /// integrator and the anchor constraint, read by nothing.
    pub previous: Vec3,
    /// Rest pose; anchored particles snap back to it.
    pub original: Vec3,
    pub velocity: Vec3,
    /// Recomputed every step.
    pub force: Vec3,
    pub mass: f32,
}

impl Particle {
    pub fn new(position: Vec3, mass: f32) -> Self {
        Self {
            position,
            previous: position,
            original: position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass,
        }
    }
}

/// Owns the kinematic state of every particle, indexed by [`ParticleId`].
#[derive(Clone, Debug)]
pub struct ParticleStore {
    pub particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn from_positions(positions: Vec<Vec3>, mass: f32) -> Self {
        let particles = positions
            .into_iter()
            .map(|pos| Particle::new(pos, mass))
            .collect();

        Self { particles }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn get(&self, id: ParticleId) -> &Particle {
        &self.particles[id]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ParticleId) -> &mut Particle {
        &mut self.particles[id]
    }

    /// Mutable access to two distinct particles at once.
    ///
    /// ### Panics
    /// Panics if `a == b` or either id is out of bounds.
    pub fn pair_mut(&mut self, a: ParticleId, b: ParticleId) -> (&mut Particle, &mut Particle) {
        assert_ne!(a, b, "a particle cannot be constrained to itself");
        if a < b {
            let (lo, hi) = self.particles.split_at_mut(b);
            (&mut lo[a], &mut hi[0])
        } else {
            let (lo, hi) = self.particles.split_at_mut(a);
            (&mut hi[0], &mut lo[b])
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }
}
