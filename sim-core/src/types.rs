/// Identifier for a particle in a [`crate::particle::ParticleStore`].
///
/// This is the row-major lattice index, and is only meaningful within
/// the lifetime of a given `Lattice` instance.
pub type ParticleId = usize;

/// A (row, column) coordinate in the lattice. Row 0 is the top edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}
