//! Rectangular particle lattice.
//!
//! Cells are addressed row-major: `index(row, col) = row * columns + col`,
//! with row 0 along the top edge. Neighbour links are derived from index
//! arithmetic instead of being stored, so tearing is expressed as a
//! predicate ([`Lattice::horizontal_link_active`]) rather than by removing
//! edges from a graph.

use crate::types::{Cell, ParticleId};
use glam::Vec3;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lattice {
    columns: usize,
    rows: usize,
    width: f32,
    height: f32,
}

/// Static render data, produced once and never touched by the solver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
    /// Two texture coordinates per particle, in particle order.
    pub uvs: Vec<f32>,
}

impl Lattice {
    /// Creates a `columns` x `rows` lattice spanning `width` x `height`.
    ///
    /// Callers are expected to pass at least two columns and two rows;
    /// see [`crate::config::Config::validate`].
    pub fn new(columns: usize, rows: usize, width: f32, height: f32) -> Self {
        let lattice = Self {
            columns,
            rows,
            width,
            height,
        };
        debug!(
            columns,
            rows,
            horizontal_rest = lattice.horizontal_rest_length(),
            vertical_rest = lattice.vertical_rest_length(),
            "built cloth lattice"
        );
        lattice
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> ParticleId {
        row * self.columns + col
    }

    #[inline]
    pub fn cell(&self, id: ParticleId) -> Cell {
        Cell::new(id / self.columns, id % self.columns)
    }

    /// Iterates cells in solver order: all columns of row 0, then row 1, ...
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |col| Cell::new(row, col)))
    }

    /// The cell to the left of `cell`, if any.
    #[inline]
    pub fn left(&self, cell: Cell) -> Option<Cell> {
        (cell.col > 0).then(|| Cell::new(cell.row, cell.col - 1))
    }

    /// The cell above `cell`, if any.
    #[inline]
    pub fn above(&self, cell: Cell) -> Option<Cell> {
        (cell.row > 0).then(|| Cell::new(cell.row - 1, cell.col))
    }

    #[inline]
    pub fn is_top_row(&self, cell: Cell) -> bool {
        cell.row == 0
    }

    /// Whether `cell` is the first or last cell of its row.
    #[inline]
    pub fn is_row_extreme(&self, cell: Cell) -> bool {
        cell.col == 0 || cell.col + 1 == self.columns
    }

    /// Column whose link to its left neighbour is cut in tear mode.
    #[inline]
    pub fn tear_column(&self) -> usize {
        self.columns / 2
    }

    /// Whether the link from `cell` to its left neighbour is enforced.
    ///
    /// Returns `false` for the first column, and for [`Lattice::tear_column`]
    /// while `tear` is set.
    #[inline]
    pub fn horizontal_link_active(&self, cell: Cell, tear: bool) -> bool {
        cell.col > 0 && !(tear && cell.col == self.tear_column())
    }

    /// Whether `cell` is pinned to its rest pose.
    ///
    /// Only the top row is ever anchored: all of it, or just its two ends
    /// when `point_attached` is set.
    #[inline]
    pub fn is_anchored(&self, cell: Cell, point_attached: bool) -> bool {
        self.is_top_row(cell) && (!point_attached || self.is_row_extreme(cell))
    }

    #[inline]
    pub fn horizontal_rest_length(&self) -> f32 {
        self.width / (self.columns - 1) as f32
    }

    #[inline]
    pub fn vertical_rest_length(&self) -> f32 {
        self.height / (self.rows - 1) as f32
    }

    /// Rest-pose position of a cell: a flat sheet in the z = 0 plane,
    /// centred on the origin, top row at `y = height / 2`.
    pub fn rest_position(&self, cell: Cell) -> Vec3 {
        let x = cell.col as f32 * self.horizontal_rest_length() - self.width / 2.0;
        let y = self.height / 2.0 - cell.row as f32 * self.vertical_rest_length();
        Vec3::new(x, y, 0.0)
    }

    /// Rest-pose positions for every particle, in index order.
    pub fn rest_positions(&self) -> Vec<Vec3> {
        self.cells().map(|c| self.rest_position(c)).collect()
    }

    /// Builds the triangle index list and texture coordinates.
    ///
    /// Every cell not on the last row or column contributes the quad it
    /// forms with its right and lower neighbours, split into
    /// `(top-left, bottom-left, top-right)` and
    /// `(bottom-left, bottom-right, top-right)`.
    pub fn mesh_buffers(&self) -> MeshBuffers {
        let quads = (self.columns - 1) * (self.rows - 1);
        let mut indices = Vec::with_capacity(quads * 6);
        let mut uvs = Vec::with_capacity(self.len() * 2);

        for cell in self.cells() {
            let Cell { row, col } = cell;
            if row + 1 < self.rows && col + 1 < self.columns {
                let tl = self.index(row, col) as u32;
                let tr = self.index(row, col + 1) as u32;
                let bl = self.index(row + 1, col) as u32;
                let br = self.index(row + 1, col + 1) as u32;
                indices.extend_from_slice(&[tl, bl, tr, bl, br, tr]);
            }

            uvs.push(row as f32 / self.rows as f32);
            uvs.push(col as f32 / self.columns as f32);
        }

        MeshBuffers { indices, uvs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn index_is_row_major() {
        let lattice = Lattice::new(5, 3, 4.0, 2.0);
        assert_eq!(lattice.len(), 15);
        assert_eq!(lattice.index(0, 0), 0);
        assert_eq!(lattice.index(0, 4), 4);
        assert_eq!(lattice.index(1, 0), 5);
        assert_eq!(lattice.index(2, 3), 13);
        assert_eq!(lattice.cell(13), Cell::new(2, 3));

        let order: Vec<ParticleId> = lattice
            .cells()
            .map(|c| lattice.index(c.row, c.col))
            .collect();
        assert_eq!(order, (0..15).collect::<Vec<_>>());
    }

    #[test]
    fn neighbours_exist_only_inside_the_lattice() {
        let lattice = Lattice::new(4, 4, 1.0, 1.0);

        assert_eq!(lattice.left(Cell::new(0, 0)), None);
        assert_eq!(lattice.above(Cell::new(0, 0)), None);
        assert_eq!(lattice.left(Cell::new(2, 3)), Some(Cell::new(2, 2)));
        assert_eq!(lattice.above(Cell::new(2, 3)), Some(Cell::new(1, 3)));
    }

    #[test]
    fn top_row_and_extremes() {
        let lattice = Lattice::new(4, 3, 1.0, 1.0);

        assert!(lattice.is_top_row(Cell::new(0, 2)));
        assert!(!lattice.is_top_row(Cell::new(1, 2)));
        assert!(lattice.is_row_extreme(Cell::new(1, 0)));
        assert!(lattice.is_row_extreme(Cell::new(1, 3)));
        assert!(!lattice.is_row_extreme(Cell::new(1, 1)));
    }

    #[test]
    fn anchoring_depends_on_attachment_mode() {
        let lattice = Lattice::new(4, 3, 1.0, 1.0);

        let pinned_corners: Vec<usize> = (0..4)
            .filter(|&c| lattice.is_anchored(Cell::new(0, c), true))
            .collect();
        assert_eq!(pinned_corners, vec![0, 3]);

        assert!((0..4).all(|c| lattice.is_anchored(Cell::new(0, c), false)));
        assert!(!lattice.is_anchored(Cell::new(1, 0), false));
        assert!(!lattice.is_anchored(Cell::new(2, 3), true));
    }

    #[test]
    fn tear_cuts_only_the_middle_column() {
        let lattice = Lattice::new(6, 2, 1.0, 1.0);
        assert_eq!(lattice.tear_column(), 3);

        for col in 0..6 {
            let cell = Cell::new(1, col);
            assert_eq!(lattice.horizontal_link_active(cell, false), col > 0);
            assert_eq!(lattice.horizontal_link_active(cell, true), col > 0 && col != 3);
        }
    }

    #[test]
    fn odd_width_tears_at_floor_middle() {
        let lattice = Lattice::new(5, 2, 1.0, 1.0);
        assert_eq!(lattice.tear_column(), 2);
        assert!(!lattice.horizontal_link_active(Cell::new(0, 2), true));
    }

    #[test]
    fn rest_pose_is_centred_flat_sheet() {
        let lattice = Lattice::new(3, 5, 10.0, 8.0);

        assert!(approx(lattice.horizontal_rest_length(), 5.0));
        assert!(approx(lattice.vertical_rest_length(), 2.0));

        let positions = lattice.rest_positions();
        assert_eq!(positions.len(), 15);
        assert_eq!(positions[lattice.index(0, 0)], Vec3::new(-5.0, 4.0, 0.0));
        assert_eq!(positions[lattice.index(0, 2)], Vec3::new(5.0, 4.0, 0.0));
        assert_eq!(positions[lattice.index(4, 0)], Vec3::new(-5.0, -4.0, 0.0));
        assert!(positions.iter().all(|p| p.z == 0.0));

        let centroid = positions.iter().copied().sum::<Vec3>() / positions.len() as f32;
        assert!(centroid.length() < 1e-5);
    }

    #[test]
    fn mesh_buffers_cover_every_quad() {
        let lattice = Lattice::new(3, 3, 1.0, 1.0);
        let mesh = lattice.mesh_buffers();

        // 2x2 quads, two triangles each.
        assert_eq!(mesh.indices.len(), 2 * 2 * 6);
        assert_eq!(&mesh.indices[..6], &[0, 3, 1, 3, 4, 1]);
        assert_eq!(&mesh.indices[18..], &[4, 7, 5, 7, 8, 5]);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < lattice.len()));

        assert_eq!(mesh.uvs.len(), 2 * lattice.len());
        let id = lattice.index(2, 1);
        assert!(approx(mesh.uvs[2 * id], 2.0 / 3.0));
        assert!(approx(mesh.uvs[2 * id + 1], 1.0 / 3.0));
    }
}
