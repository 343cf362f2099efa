//! Conventional connectivity arrays derived from the half-edges,
//! for code that would rather work with those than walk half-edges.

use fixedbitset as fb;
use itertools::Itertools;
use nalgebra_sparse as nas;

use super::{HalfEdge, HalfEdgeStore};
use crate::mesh::FaceCells;

impl HalfEdgeStore {
    /// The cells on either side of every face.
    ///
    /// The left cell is the one bounded by the face's seed half-edge
    /// (see [`halfedge_of_face`][Self::halfedge_of_face]),
    /// unless that half-edge is on the outside of the mesh.
    pub fn face_to_cell(&self) -> Vec<FaceCells> {
        (0..self.face_count())
            .map(|face| {
                let seed = self.halfedge(self.halfedge_of_face(face));
                let twin = self.halfedge(seed.dual_cross_face);
                match (seed.cell_index(), twin.cell_index()) {
                    (Some(left), right) => FaceCells { left, right },
                    (None, Some(left)) => FaceCells { left, right: None },
                    // rejected by validate
                    (None, None) => unreachable!("face {face} has no cell on either side"),
                }
            })
            .collect()
    }

    /// Matrix where rows correspond to cells, columns to faces,
    /// and the values of -1 or 1 to the relative orientation of the face:
    /// 1 if the face's seed half-edge is on the cell's side, -1 otherwise.
    pub fn cell_to_face(&self) -> nas::CsrMatrix<i8> {
        let mut coo = nas::CooMatrix::new(self.cell_count(), self.face_count());
        for face in 0..self.face_count() {
            let seed = self.halfedge(self.halfedge_of_face(face));
            let twin = self.halfedge(seed.dual_cross_face);
            if let Some(cell) = seed.cell_index() {
                coo.push(cell, face, 1);
            }
            if let Some(cell) = twin.cell_index() {
                coo.push(cell, face, -1);
            }
        }
        nas::CsrMatrix::from(&coo)
    }

    /// Sorted node indices of every cell.
    pub fn cell_to_node(&self) -> Vec<Vec<usize>> {
        self.collect_per_cell(|_, he| he.node)
    }

    /// Sorted edge indices of every cell.
    pub fn cell_to_edge(&self) -> Vec<Vec<usize>> {
        self.collect_per_cell(|he_idx, _| self.edge_of(he_idx))
    }

    /// Gather a sorted, deduplicated list of values over the half-edges of each cell.
    fn collect_per_cell(&self, value: impl Fn(usize, &HalfEdge) -> usize) -> Vec<Vec<usize>> {
        let mut per_cell: Vec<Vec<usize>> = vec![Vec::new(); self.cell_count()];
        for (he_idx, he) in self.halfedges().iter().enumerate() {
            if let Some(cell) = he.cell_index() {
                per_cell[cell].push(value(he_idx, he));
            }
        }
        per_cell
            .into_iter()
            .map(|values| values.into_iter().sorted_unstable().dedup().collect())
            .collect()
    }

    /// Get the set of faces on the mesh boundary.
    pub fn boundary_faces(&self) -> fb::FixedBitSet {
        self.boundary_bits(self.face_count(), |_, he| he.face)
    }

    /// Get the set of edges on the mesh boundary.
    pub fn boundary_edges(&self) -> fb::FixedBitSet {
        self.boundary_bits(self.edge_count(), |he_idx, _| self.edge_of(he_idx))
    }

    /// Get the set of nodes on the mesh boundary.
    pub fn boundary_nodes(&self) -> fb::FixedBitSet {
        self.boundary_bits(self.node_count(), |_, he| he.node)
    }

    /// Every entity touched by a half-edge outside of the mesh is on the boundary.
    fn boundary_bits(
        &self,
        len: usize,
        entity: impl Fn(usize, &HalfEdge) -> usize,
    ) -> fb::FixedBitSet {
        let mut bits = fb::FixedBitSet::with_capacity(len);
        for (he_idx, he) in self.halfedges().iter().enumerate() {
            if he.is_boundary() {
                bits.insert(entity(he_idx, he));
            }
        }
        bits
    }
}
