//! The half-edge mesh and its underlying storage.
//!
//! A half-edge is one directed traversal of one side of a mesh edge,
//! bounding one face within one cell.
//! Every face of the mesh has two sides (one per adjacent cell,
//! with the outside of the mesh counting as a cell on the boundary),
//! and every side has one half-edge per edge of the face.
//! Half-edges are linked to
//! - the `next` and `prev` half-edges around the same side of the face,
//! - their twin on the other side of the face (`dual_cross_face`),
//! - the half-edge on the same edge in the same cell,
//!   bordering the other face of the cell that meets at the edge (`dual_same_cell`).
//!
//! All links are indices into a flat array owned by a [`HalfEdgeStore`].

mod data;
pub use data::{AttributeData, DataTable};

mod level;
pub use level::{NodeDof, DOF, LEVEL};

mod store;
pub use store::{HalfEdge, HalfEdgeStore, StoreOptions};

mod topology;

mod views;
pub use views::{FaceLoop, HalfEdgeView};

#[cfg(test)]
mod tests;

//

use itertools::izip;

use crate::{mesh::ConventionalMesh, Vec3};

/// A kind of mesh entity, for error messages and attribute tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A mesh node.
    Node,
    /// An edge between two nodes.
    Edge,
    /// A face bounding one or two cells.
    Face,
    /// A polyhedral cell.
    Cell,
    /// A half-edge.
    HalfEdge,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Node => "node",
            EntityKind::Edge => "edge",
            EntityKind::Face => "face",
            EntityKind::Cell => "cell",
            EntityKind::HalfEdge => "half-edge",
        };
        f.write_str(name)
    }
}

/// Error in building or modifying a half-edge mesh.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum HalfEdgeError {
    /// The input has no faces, cells or half-edges.
    #[error("Cannot build a half-edge mesh without faces and cells")]
    EmptyMesh,
    /// The conventional mesh doesn't know which cells are adjacent to its faces.
    #[error("The mesh does not provide face-to-cell adjacency")]
    MissingFaceToCell,
    /// A face has fewer than three edges.
    #[error("Face {face} has only {edge_count} edges")]
    DegenerateFace {
        /// Index of the face.
        face: usize,
        /// Its number of edges.
        edge_count: usize,
    },
    /// Not all faces have the same number of edges.
    #[error("Face {face} has {actual} edges, but other faces have {expected}")]
    FaceEdgeCountMismatch {
        /// Index of the offending face.
        face: usize,
        /// Edge count of the rest of the faces.
        expected: usize,
        /// Edge count of the offending face.
        actual: usize,
    },
    /// An edge of a cell doesn't have exactly two half-edges in the cell,
    /// i.e. the cell isn't a manifold polyhedron.
    #[error("Edge {nodes:?} has {count} half-edges in cell {cell} (0 is outside), expected 2")]
    NonManifoldEdge {
        /// Node indices of the edge.
        nodes: [usize; 2],
        /// The cell, as stored in [`HalfEdge::cell`].
        cell: usize,
        /// Number of half-edges found.
        count: usize,
    },
    /// `next` and `prev` are not inverses of each other.
    #[error("next and prev links are not inverses at half-edge {halfedge}")]
    InconsistentNextPrev {
        /// The half-edge where the mismatch was found.
        halfedge: usize,
    },
    /// A face loop doesn't close after the expected number of steps.
    #[error("The face loop of half-edge {halfedge} does not close after {face_edge_count} steps")]
    OpenFaceLoop {
        /// The half-edge the loop started from.
        halfedge: usize,
        /// The expected loop length.
        face_edge_count: usize,
    },
    /// `dual_cross_face` isn't an involution between distinct half-edges of one face,
    /// or both sides of a face are outside of the mesh.
    #[error("Invalid dual across the face at half-edge {halfedge}")]
    InvalidCrossFaceDual {
        /// The offending half-edge.
        halfedge: usize,
    },
    /// `dual_same_cell` isn't an involution between distinct half-edges
    /// of one edge in one cell.
    #[error("Invalid dual within the cell at half-edge {halfedge}")]
    InvalidSameCellDual {
        /// The offending half-edge.
        halfedge: usize,
    },
    /// The half-edges describe a different number of edges than expected.
    #[error("Expected {expected} edges, but the half-edges describe {actual}")]
    EdgeCountMismatch {
        /// Edge count reported by the input.
        expected: usize,
        /// Edge count derived from the half-edges.
        actual: usize,
    },
    /// Some per-entity input has the wrong length.
    #[error("Expected {expected} {entity}s, got {actual}")]
    CountMismatch {
        /// The kind of entity counted.
        entity: EntityKind,
        /// The expected count.
        expected: usize,
        /// The count given.
        actual: usize,
    },
    /// An entity index is out of range.
    #[error("{entity} index {index} is out of range for {count} {entity}s")]
    IndexOutOfRange {
        /// The kind of entity indexed.
        entity: EntityKind,
        /// The index.
        index: usize,
        /// The number of entities.
        count: usize,
    },
    /// An entity has no half-edges referring to it.
    #[error("No half-edge refers to {entity} {index}")]
    MissingHalfEdge {
        /// The kind of entity.
        entity: EntityKind,
        /// Its index.
        index: usize,
    },
    /// An attribute array doesn't have one value per entity of its table.
    #[error("Attribute '{name}' has length {actual}, expected one of {expected:?}")]
    AttributeLength {
        /// Name of the attribute.
        name: String,
        /// Lengths the table accepts.
        expected: Vec<usize>,
        /// Length of the array.
        actual: usize,
    },
}

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox {
    /// The minimum corner of the box.
    pub min: Vec3,
    /// The maximum corner of the box.
    pub max: Vec3,
}

/// A 3D polyhedral mesh with half-edge connectivity.
///
/// Besides the nodes and the [`HalfEdgeStore`],
/// the mesh carries tables of named attribute arrays
/// for nodes, edges and faces, cells, half-edges, and the mesh as a whole.
/// Edges and faces share one table:
/// [`edge_data`][Self::edge_data] and [`face_data`][Self::face_data]
/// are two names for the same thing.
///
/// The node attribute `"dof"` ([`NodeDof`] codes)
/// and the node, cell and half-edge attributes `"level"`
/// are created on construction and recreated on [`reinit`][Self::reinit].
#[derive(Clone, Debug)]
pub struct HalfEdgeMesh {
    nodes: Vec<Vec3>,
    store: HalfEdgeStore,
    node_data: DataTable,
    /// shared by edges and faces
    edge_face_data: DataTable,
    cell_data: DataTable,
    halfedge_data: DataTable,
    mesh_data: DataTable,
}

impl HalfEdgeMesh {
    /// Build a half-edge mesh from a conventional mesh.
    pub fn from_mesh(mesh: &impl ConventionalMesh) -> Result<Self, HalfEdgeError> {
        let store = HalfEdgeStore::from_mesh(mesh)?;
        Ok(Self::from_parts(mesh.nodes().to_vec(), store))
    }

    /// Build a half-edge mesh from nodes, raw half-edge records and subdomain tags
    /// (see [`HalfEdgeStore::new`]).
    ///
    /// The node count is taken from `nodes` unless `options` says otherwise,
    /// in which case the two must agree.
    pub fn new(
        nodes: Vec<Vec3>,
        halfedges: Vec<HalfEdge>,
        subdomain: Vec<usize>,
        options: StoreOptions,
    ) -> Result<Self, HalfEdgeError> {
        let store = Self::build_store(&nodes, halfedges, subdomain, options)?;
        Ok(Self::from_parts(nodes, store))
    }

    fn build_store(
        nodes: &[Vec3],
        halfedges: Vec<HalfEdge>,
        subdomain: Vec<usize>,
        options: StoreOptions,
    ) -> Result<HalfEdgeStore, HalfEdgeError> {
        if let Some(count) = options.node_count {
            if count != nodes.len() {
                return Err(HalfEdgeError::CountMismatch {
                    entity: EntityKind::Node,
                    expected: count,
                    actual: nodes.len(),
                });
            }
        }
        HalfEdgeStore::new(
            halfedges,
            subdomain,
            StoreOptions {
                node_count: Some(nodes.len()),
                ..options
            },
        )
    }

    fn from_parts(nodes: Vec<Vec3>, store: HalfEdgeStore) -> Self {
        let mut mesh = Self {
            nodes,
            node_data: DataTable::aligned(vec![store.node_count()]),
            edge_face_data: DataTable::aligned(vec![store.edge_count(), store.face_count()]),
            cell_data: DataTable::aligned(vec![store.cell_count()]),
            halfedge_data: DataTable::aligned(vec![store.halfedge_count()]),
            mesh_data: DataTable::unaligned(),
            store,
        };
        mesh.init_level_info(&[]);
        mesh
    }

    /// Replace the topology of the mesh, e.g. after refinement.
    ///
    /// The new store is fully built before anything is replaced,
    /// so on error the mesh is left as it was.
    /// Attribute arrays that no longer have one value per entity are dropped,
    /// and the `"dof"` and `"level"` attributes are recreated
    /// (nodes marked fixed stay fixed).
    pub fn reinit(
        &mut self,
        nodes: Vec<Vec3>,
        halfedges: Vec<HalfEdge>,
        subdomain: Vec<usize>,
        options: StoreOptions,
    ) -> Result<(), HalfEdgeError> {
        let store = Self::build_store(&nodes, halfedges, subdomain, options)?;
        let fixed = self.fixed_nodes();

        self.nodes = nodes;
        self.store = store;
        self.node_data.realign(vec![self.store.node_count()]);
        self.edge_face_data
            .realign(vec![self.store.edge_count(), self.store.face_count()]);
        self.cell_data.realign(vec![self.store.cell_count()]);
        self.halfedge_data
            .realign(vec![self.store.halfedge_count()]);
        self.init_level_info(&fixed);

        log::debug!(
            "reinitialized half-edge mesh with {} half-edges",
            self.store.halfedge_count()
        );
        Ok(())
    }

    /// Name of this kind of mesh.
    #[inline]
    pub fn meshtype(&self) -> &'static str {
        "halfedge3d"
    }

    /// Get the underlying half-edge store.
    #[inline]
    pub fn store(&self) -> &HalfEdgeStore {
        &self.store
    }

    /// Get a slice of all nodes in the mesh.
    #[inline]
    pub fn nodes(&self) -> &[Vec3] {
        &self.nodes
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// Number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.store.face_count()
    }

    /// Number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.store.cell_count()
    }

    //
    // attribute tables
    //

    /// Attributes with one value per node.
    #[inline]
    pub fn node_data(&self) -> &DataTable {
        &self.node_data
    }

    /// Mutable access to [`node_data`][Self::node_data].
    #[inline]
    pub fn node_data_mut(&mut self) -> &mut DataTable {
        &mut self.node_data
    }

    /// Attributes with one value per edge or per face.
    /// This is the same table as [`face_data`][Self::face_data].
    #[inline]
    pub fn edge_data(&self) -> &DataTable {
        &self.edge_face_data
    }

    /// Mutable access to [`edge_data`][Self::edge_data].
    #[inline]
    pub fn edge_data_mut(&mut self) -> &mut DataTable {
        &mut self.edge_face_data
    }

    /// Attributes with one value per face or per edge.
    /// This is the same table as [`edge_data`][Self::edge_data].
    #[inline]
    pub fn face_data(&self) -> &DataTable {
        &self.edge_face_data
    }

    /// Mutable access to [`face_data`][Self::face_data].
    #[inline]
    pub fn face_data_mut(&mut self) -> &mut DataTable {
        &mut self.edge_face_data
    }

    /// Attributes with one value per cell.
    #[inline]
    pub fn cell_data(&self) -> &DataTable {
        &self.cell_data
    }

    /// Mutable access to [`cell_data`][Self::cell_data].
    #[inline]
    pub fn cell_data_mut(&mut self) -> &mut DataTable {
        &mut self.cell_data
    }

    /// Attributes with one value per half-edge.
    #[inline]
    pub fn halfedge_data(&self) -> &DataTable {
        &self.halfedge_data
    }

    /// Mutable access to [`halfedge_data`][Self::halfedge_data].
    #[inline]
    pub fn halfedge_data_mut(&mut self) -> &mut DataTable {
        &mut self.halfedge_data
    }

    /// Attributes of the mesh as a whole, of any length.
    #[inline]
    pub fn mesh_data(&self) -> &DataTable {
        &self.mesh_data
    }

    /// Mutable access to [`mesh_data`][Self::mesh_data].
    #[inline]
    pub fn mesh_data_mut(&mut self) -> &mut DataTable {
        &mut self.mesh_data
    }

    //
    // geometry
    //

    /// Get a bounding box enclosing the entire mesh.
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox {
            min: Vec3::from_element(f64::MAX),
            max: Vec3::from_element(f64::MIN),
        };
        for node in &self.nodes {
            for (coord, min, max) in izip!(
                node.iter(),
                bounds.min.iter_mut(),
                bounds.max.iter_mut()
            ) {
                *min = min.min(*coord);
                *max = max.max(*coord);
            }
        }
        bounds
    }

    /// Barycenters (averages of the nodes) of every edge.
    pub fn edge_barycenters(&self) -> Vec<Vec3> {
        self.store
            .edges()
            .iter()
            .map(|&[a, b]| 0.5 * (self.nodes[a] + self.nodes[b]))
            .collect()
    }

    /// Barycenters (averages of the nodes) of every face.
    pub fn face_barycenters(&self) -> Vec<Vec3> {
        let fe = self.store.face_edge_count() as f64;
        (0..self.face_count())
            .map(|face| {
                self.store
                    .face_loop(self.store.halfedge_of_face(face))
                    .nodes()
                    .fold(Vec3::zeros(), |acc, n| acc + self.nodes[n])
                    / fe
            })
            .collect()
    }

    /// Barycenters (averages of the nodes) of every cell.
    pub fn cell_barycenters(&self) -> Vec<Vec3> {
        self.store
            .cell_to_node()
            .iter()
            .map(|cell_nodes| {
                cell_nodes
                    .iter()
                    .fold(Vec3::zeros(), |acc, &n| acc + self.nodes[n])
                    / cell_nodes.len() as f64
            })
            .collect()
    }
}
