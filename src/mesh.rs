//! Conventional cell-vertex meshes, the input half-edge meshes are built from.
//!
//! Half-edge construction only needs a handful of things from a mesh
//! (node and entity counts, the nodes of each face,
//! and which cells lie on either side of each face),
//! which are described by the [`ConventionalMesh`] trait.
//! [`PolyMesh3d`] is a minimal implementation of it
//! for meshes made of a single kind of polyhedral cell.

/// Low-level mesh construction and corresponding tests.
mod mesh_construction;
/// re-export the testing meshes for use in other modules' tests
/// and in doctests
#[doc(hidden)]
pub use mesh_construction::{box_hexes, box_tets, single_tet, two_tets};

//

use fixedbitset as fb;

use crate::Vec3;

/// Error in constructing a conventional mesh.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// The mesh has no nodes.
    #[error("Invalid mesh: no nodes")]
    MissingNodes,
    /// The mesh has no cells.
    #[error("Invalid mesh: no cells")]
    MissingCells,
    /// The flat cell index array doesn't divide evenly into cells.
    #[error("Cell index array of length {len} is not divisible into cells of {cell_size} nodes")]
    IndexCount {
        /// Length of the given index array.
        len: usize,
        /// Nodes per cell for the cell kind.
        cell_size: usize,
    },
    /// A cell refers to a node that doesn't exist.
    #[error("Cell {cell} refers to node {node}, but the mesh only has {node_count} nodes")]
    NodeOutOfRange {
        /// Index of the offending cell.
        cell: usize,
        /// The node index that was out of range.
        node: usize,
        /// Number of nodes in the mesh.
        node_count: usize,
    },
    /// A face is on the boundary of more than two cells.
    #[error("Face with nodes {nodes:?} is shared by more than two cells")]
    NonManifoldFace {
        /// Sorted node indices of the face.
        nodes: Vec<usize>,
    },
    /// Subdomain tags were given for the wrong number of cells.
    #[error("Expected {expected} subdomain tags (one per cell), got {actual}")]
    SubdomainCount {
        /// Number of cells in the mesh.
        expected: usize,
        /// Number of tags given.
        actual: usize,
    },
}

/// The kind of polyhedron every cell of a [`PolyMesh3d`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Four nodes, four triangular faces.
    Tetrahedron,
    /// Eight nodes, six quadrilateral faces.
    ///
    /// Nodes are ordered counterclockwise around the bottom face
    /// followed by the same around the top face.
    Hexahedron,
}

impl CellKind {
    /// Number of nodes in one cell.
    #[inline]
    pub fn node_count(self) -> usize {
        match self {
            CellKind::Tetrahedron => 4,
            CellKind::Hexahedron => 8,
        }
    }

    /// Number of faces bounding one cell.
    #[inline]
    pub fn face_count(self) -> usize {
        self.local_faces().len()
    }

    /// Number of edges (equivalently, nodes) on each face of the cell.
    #[inline]
    pub fn face_edge_count(self) -> usize {
        match self {
            CellKind::Tetrahedron => 3,
            CellKind::Hexahedron => 4,
        }
    }

    /// Local node indices of each face of the cell.
    ///
    /// Faces are ordered counterclockwise when seen from outside the cell,
    /// assuming the cell itself is positively oriented.
    pub fn local_faces(self) -> &'static [&'static [usize]] {
        match self {
            CellKind::Tetrahedron => &[&[1, 2, 3], &[0, 3, 2], &[0, 1, 3], &[0, 2, 1]],
            CellKind::Hexahedron => &[
                &[0, 3, 2, 1],
                &[4, 5, 6, 7],
                &[0, 1, 5, 4],
                &[1, 2, 6, 5],
                &[2, 3, 7, 6],
                &[3, 0, 4, 7],
            ],
        }
    }
}

/// The cells on either side of a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceCells {
    /// The cell the face's node ordering is counterclockwise for
    /// when looking from outside of it.
    pub left: usize,
    /// The cell on the other side, if the face isn't on the mesh boundary.
    pub right: Option<usize>,
}

/// The information about a conventional mesh
/// needed to build a half-edge mesh from it.
///
/// Every face of the mesh must have the same number of edges.
pub trait ConventionalMesh {
    /// Coordinates of the mesh nodes.
    fn nodes(&self) -> &[Vec3];

    /// Number of nodes in the mesh.
    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Number of edges in the mesh.
    fn edge_count(&self) -> usize;

    /// Number of faces in the mesh.
    fn face_count(&self) -> usize;

    /// Number of cells in the mesh.
    fn cell_count(&self) -> usize;

    /// Node indices of a face, in counterclockwise order
    /// when seen from outside its left cell.
    fn face_nodes(&self, face: usize) -> &[usize];

    /// The cells on either side of every face.
    ///
    /// Returns None if the mesh doesn't know its face-to-cell adjacency,
    /// in which case a half-edge mesh can't be built from it.
    fn face_to_cell(&self) -> Option<&[FaceCells]>;

    /// Whether a face lies on the boundary of the mesh.
    fn is_boundary_face(&self, face: usize) -> bool {
        match self.face_to_cell() {
            Some(f2c) => f2c[face].right.is_none(),
            None => false,
        }
    }

    /// Subdomain tag of each cell, if the mesh has them.
    fn subdomains(&self) -> Option<&[usize]> {
        None
    }
}

/// A 3D mesh made of cells of one [`CellKind`].
///
/// Faces and edges are inferred from the cells on construction.
#[derive(Clone, Debug)]
pub struct PolyMesh3d {
    pub(crate) nodes: Vec<Vec3>,
    pub(crate) kind: CellKind,
    /// cell node indices in a flat Vec, `kind.node_count()` per cell
    pub(crate) cells: Vec<usize>,
    /// face node indices in a flat Vec, `kind.face_edge_count()` per face
    pub(crate) faces: Vec<usize>,
    /// edge node indices in a flat Vec, 2 per edge, lower index first
    pub(crate) edges: Vec<usize>,
    pub(crate) face_to_cell: Vec<FaceCells>,
    pub(crate) subdomains: Option<Vec<usize>>,
}

impl PolyMesh3d {
    /// Construct a mesh from nodes and a flat array of cell node indices,
    /// where every `kind.node_count()` indices correspond to one cell.
    #[inline]
    pub fn new(nodes: Vec<Vec3>, kind: CellKind, cells: Vec<usize>) -> Result<Self, MeshError> {
        mesh_construction::build_mesh(nodes, kind, cells)
    }

    /// Attach a subdomain tag to every cell.
    pub fn with_subdomains(mut self, tags: Vec<usize>) -> Result<Self, MeshError> {
        if tags.len() != self.cell_count() {
            return Err(MeshError::SubdomainCount {
                expected: self.cell_count(),
                actual: tags.len(),
            });
        }
        self.subdomains = Some(tags);
        Ok(self)
    }

    /// The kind of cell this mesh is made of.
    #[inline]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Node indices of each cell, as chunks of `kind().node_count()`.
    #[inline]
    pub fn cells(&self) -> std::slice::ChunksExact<'_, usize> {
        self.cells.chunks_exact(self.kind.node_count())
    }

    /// Node indices of each face, as chunks of `kind().face_edge_count()`.
    #[inline]
    pub fn faces(&self) -> std::slice::ChunksExact<'_, usize> {
        self.faces.chunks_exact(self.kind.face_edge_count())
    }

    /// Node indices of each edge, lower index first.
    #[inline]
    pub fn edges(&self) -> std::slice::ChunksExact<'_, usize> {
        self.edges.chunks_exact(2)
    }

    /// Get the set of faces on the mesh boundary.
    pub fn boundary_faces(&self) -> fb::FixedBitSet {
        let mut bits = fb::FixedBitSet::with_capacity(self.face_count());
        for (face_idx, adj) in self.face_to_cell.iter().enumerate() {
            bits.set(face_idx, adj.right.is_none());
        }
        bits
    }
}

impl ConventionalMesh for PolyMesh3d {
    #[inline]
    fn nodes(&self) -> &[Vec3] {
        &self.nodes
    }

    #[inline]
    fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.face_to_cell.len()
    }

    #[inline]
    fn cell_count(&self) -> usize {
        self.cells.len() / self.kind.node_count()
    }

    #[inline]
    fn face_nodes(&self, face: usize) -> &[usize] {
        let size = self.kind.face_edge_count();
        &self.faces[face * size..(face + 1) * size]
    }

    #[inline]
    fn face_to_cell(&self) -> Option<&[FaceCells]> {
        Some(&self.face_to_cell)
    }

    #[inline]
    fn subdomains(&self) -> Option<&[usize]> {
        self.subdomains.as_deref()
    }
}
