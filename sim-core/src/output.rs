use crate::particle::ParticleStore;

/// Flat `[x0, y0, z0, x1, y1, z1, ...]` position buffer read by the renderer.
///
/// [`OutputBuffer::sync`] copies the latest particle positions in and
/// raises an update flag; the renderer consumes the flag with
/// [`OutputBuffer::take_update`] before re-uploading.
#[derive(Clone, Debug)]
pub struct OutputBuffer {
    positions: Vec<f32>,
    needs_update: bool,
}

impl OutputBuffer {
    /// Creates a buffer already holding the store's current positions.
    pub fn from_store(store: &ParticleStore) -> Self {
        let mut out = Self {
            positions: vec![0.0; store.len() * 3],
            needs_update: false,
        };
        out.sync(store);
        out
    }

    /// Copies every particle's position to offset `3 * index`.
    ///
    /// ### Panics
    /// Panics if the store does not have the length the buffer was built for.
    pub fn sync(&mut self, store: &ParticleStore) {
        assert_eq!(self.positions.len(), store.len() * 3);
        for (dst, p) in self.positions.chunks_exact_mut(3).zip(&store.particles) {
            dst.copy_from_slice(&p.position.to_array());
        }
        self.needs_update = true;
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Returns whether new data arrived since the last call, clearing the flag.
    #[inline]
    pub fn take_update(&mut self) -> bool {
        std::mem::replace(&mut self.needs_update, false)
    }
}
