//! Half-edge topology for 3D polyhedral meshes.
//!
//! A [`HalfEdgeMesh`] is built once from a conventional mesh
//! (anything implementing [`ConventionalMesh`], e.g. a [`PolyMesh3d`])
//! and afterwards answers topological questions
//! (the next half-edge around a face, the neighboring cell across a face,
//! the other half-edge of an edge in the same cell)
//! with plain array lookups.
//! These are what finite element assembly needs
//! to map local degrees of freedom to global ones.
//!
//! ```
//! # use hemesh::{mesh::two_tets, HalfEdgeMesh};
//! let mesh = HalfEdgeMesh::from_mesh(&two_tets()).expect("valid mesh");
//! let store = mesh.store();
//! // two half-edges per face edge
//! assert_eq!(store.halfedge_count(), 2 * 7 * 3);
//! // walk around the face a half-edge borders
//! for he in store.face_loop(store.halfedge_of_cell(0)) {
//!     let twin = store.dual_cross_face(he);
//!     assert_eq!(store.halfedge(twin).face, store.halfedge(he).face);
//! }
//! ```

#![warn(missing_docs)]

pub mod mesh;
#[doc(inline)]
pub use mesh::{CellKind, ConventionalMesh, FaceCells, MeshError, PolyMesh3d};

pub mod halfedge;
#[doc(inline)]
pub use halfedge::{
    AttributeData, BoundingBox, DataTable, EntityKind, FaceLoop, HalfEdge, HalfEdgeError,
    HalfEdgeMesh, HalfEdgeStore, HalfEdgeView, NodeDof, StoreOptions,
};

// nalgebra re-exports of common types for convenience

pub use nalgebra as na;
/// Type alias for a 3D `nalgebra` vector.
pub type Vec3 = na::Vector3<f64>;
