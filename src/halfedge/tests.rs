use approx::assert_relative_eq;
use itertools::Itertools;
use proptest::prelude::*;

use super::*;
use crate::mesh::{box_hexes, box_tets, single_tet, two_tets, FaceCells, PolyMesh3d};

/// Check the properties every correctly built store should have.
fn check_structure(mesh: &PolyMesh3d, store: &HalfEdgeStore) {
    let fe = store.face_edge_count();
    assert_eq!(fe, mesh.kind().face_edge_count());
    assert_eq!(store.halfedge_count(), 2 * fe * mesh.face_count());
    assert_eq!(store.node_count(), mesh.node_count());
    assert_eq!(store.edge_count(), mesh.edge_count());
    assert_eq!(store.face_count(), mesh.face_count());
    assert_eq!(store.cell_count(), mesh.cell_count());
    store.validate().unwrap();

    for he_idx in 0..store.halfedge_count() {
        let he = store.view(he_idx);
        assert_eq!(he.next().prev(), he);
        assert_eq!(he.prev().next(), he);

        let twin = he.dual_cross_face();
        assert_ne!(twin, he);
        assert_eq!(twin.dual_cross_face(), he);
        assert_eq!(twin.face(), he.face());
        assert_ne!(twin.cell(), he.cell());
        // the twin runs the other way along the same edge
        assert_eq!(twin.edge(), he.edge());
        assert_eq!(twin.node(), he.origin());

        let partner = he.dual_same_cell();
        assert_ne!(partner, he);
        assert_eq!(partner.dual_same_cell(), he);
        assert_eq!(partner.cell(), he.cell());
        assert_eq!(partner.edge(), he.edge());
        assert_ne!(partner.face(), he.face());
        // faces are consistently oriented, so the two sides of an edge in a cell
        // are traversed in opposite directions
        assert_eq!(partner.node(), he.origin());

        let face_loop = he.face_loop().collect_vec();
        assert_eq!(face_loop.len(), fe);
        assert_eq!(face_loop[0], he_idx);
        for other in face_loop {
            assert_eq!(store.halfedge(other).face, he.face());
            assert_eq!(store.halfedge(other).cell, he.record().cell);
        }
    }

    // every cell is bounded by FE half-edges on each of its faces
    let halfedges_per_cell = mesh.kind().face_count() * fe;
    let cell_counts = store
        .halfedges()
        .iter()
        .filter_map(HalfEdge::cell_index)
        .counts();
    for cell in 0..store.cell_count() {
        assert_eq!(cell_counts[&cell], halfedges_per_cell);
    }
    assert_eq!(
        store.halfedges().iter().filter(|he| he.is_boundary()).count(),
        fe * mesh.boundary_faces().count_ones(..),
    );
}

#[test]
fn single_tet_halfedges() {
    let mesh = single_tet();
    let store = HalfEdgeStore::from_mesh(&mesh).unwrap();
    check_structure(&mesh, &store);

    assert_eq!(store.halfedge_count(), 24);
    for he in store.halfedges() {
        assert!(matches!(he.cell, 0 | 1));
    }
    // everything in the cell has its twin outside
    for (he_idx, he) in store.halfedges().iter().enumerate() {
        let twin = store.halfedge(store.dual_cross_face(he_idx));
        if he.cell == 1 {
            assert_eq!(twin.cell, HalfEdge::OUTSIDE);
        } else {
            assert_eq!(twin.cell, 1);
        }
    }
    // the cell side of each face loops through the face's nodes in order
    for face in 0..mesh.face_count() {
        let forward = 2 * face * 3;
        itertools::assert_equal(
            store.face_loop(forward).nodes(),
            mesh.face_nodes(face).iter().copied(),
        );
    }
    assert_eq!(store.halfedge_of_cell(0), 0);
    assert_eq!(store.subdomain(0), 0);
}

#[test]
fn two_tets_share_a_face() {
    let mesh = two_tets();
    let store = HalfEdgeStore::from_mesh(&mesh).unwrap();
    check_structure(&mesh, &store);

    let shared: Vec<usize> = (0..store.face_count())
        .filter(|&face| {
            let seed = store.view(store.halfedge_of_face(face));
            seed.cell().is_some() && seed.dual_cross_face().cell().is_some()
        })
        .collect();
    let expected = mesh
        .face_to_cell()
        .unwrap()
        .iter()
        .positions(|fc| fc.right.is_some())
        .collect_vec();
    assert_eq!(shared, expected);

    let seed = store.view(store.halfedge_of_face(shared[0]));
    assert_eq!(seed.cell(), Some(0));
    assert_eq!(seed.dual_cross_face().cell(), Some(1));
    itertools::assert_equal(
        seed.face_loop().nodes().sorted(),
        [0_usize, 1, 2],
    );
    assert_eq!(store.cell_count(), 2);
}

#[test]
fn box_meshes_are_valid() {
    for mesh in [
        box_tets(1, 1, 1),
        box_tets(2, 3, 1),
        box_hexes(1, 1, 1),
        box_hexes(3, 2, 2),
    ] {
        let store = HalfEdgeStore::from_mesh(&mesh).unwrap();
        check_structure(&mesh, &store);
    }
}

#[test]
fn edges_match_conventional_mesh() {
    let mesh = box_tets(2, 2, 2);
    let store = HalfEdgeStore::from_mesh(&mesh).unwrap();
    itertools::assert_equal(
        store.edges().iter().copied(),
        mesh.edges().map(|e| [e[0], e[1]]),
    );
    for edge in 0..store.edge_count() {
        let he = store.view(store.halfedge_of_edge(edge));
        assert_eq!(he.edge(), edge);
        let mut nodes = [he.origin(), he.node()];
        nodes.sort_unstable();
        assert_eq!(nodes, store.edge_nodes(edge));
    }
}

#[test]
fn seeds_are_lowest_indices() {
    let store = HalfEdgeStore::from_mesh(&box_hexes(2, 1, 1)).unwrap();
    for face in 0..store.face_count() {
        let seed = store.halfedge_of_face(face);
        assert_eq!(store.halfedge(seed).face, face);
        assert!(store.halfedges()[..seed].iter().all(|he| he.face != face));
    }
    for cell in 0..store.cell_count() {
        let seed = store.halfedge_of_cell(cell);
        assert_eq!(store.halfedge(seed).cell_index(), Some(cell));
        assert!(store.halfedges()[..seed]
            .iter()
            .all(|he| he.cell_index() != Some(cell)));
    }
}

#[test]
fn face_loop_restarts() {
    let store = HalfEdgeStore::from_mesh(&box_hexes(1, 1, 1)).unwrap();
    let mut face_loop = store.face_loop(5);
    assert_eq!(face_loop.seed(), 5);
    let first_pass = face_loop.by_ref().collect_vec();
    assert_eq!(first_pass.len(), 4);
    assert_eq!(face_loop.next(), None);
    face_loop.restart();
    itertools::assert_equal(face_loop, first_pass);
}

#[test]
#[should_panic]
fn view_out_of_range_panics() {
    let store = HalfEdgeStore::from_mesh(&single_tet()).unwrap();
    store.view(store.halfedge_count());
}

#[test]
fn subdomains_are_carried_over() {
    let mesh = box_hexes(2, 1, 1).with_subdomains(vec![3, 7]).unwrap();
    let store = HalfEdgeStore::from_mesh(&mesh).unwrap();
    assert_eq!(store.subdomain(0), 3);
    assert_eq!(store.subdomain(1), 7);
    assert_eq!(store.subdomains(), &[0, 3, 7]);
}

//
// construction from raw records
//

#[test]
fn rebuild_from_records() {
    let original = HalfEdgeStore::from_mesh(&box_tets(1, 1, 1)).unwrap();
    let rebuilt = HalfEdgeStore::new(
        original.halfedges().to_vec(),
        original.subdomains().to_vec(),
        StoreOptions::default(),
    )
    .unwrap();

    assert_eq!(rebuilt.halfedges(), original.halfedges());
    assert_eq!(rebuilt.edges(), original.edges());
    assert_eq!(rebuilt.face_edge_count(), 3);
    assert_eq!(rebuilt.node_count(), original.node_count());
    assert_eq!(rebuilt.face_count(), original.face_count());
    assert_eq!(rebuilt.cell_count(), original.cell_count());
    for cell in 0..rebuilt.cell_count() {
        assert_eq!(rebuilt.halfedge_of_cell(cell), original.halfedge_of_cell(cell));
    }
}

#[test]
fn corrupt_records_are_rejected() {
    let store = HalfEdgeStore::from_mesh(&single_tet()).unwrap();
    let subdomain = store.subdomains().to_vec();

    // first half-edge of the second face loops back on itself
    let mut records = store.halfedges().to_vec();
    records[6].next = records[6].prev;
    assert_eq!(
        HalfEdgeStore::new(records.clone(), subdomain.clone(), StoreOptions::default())
            .unwrap_err(),
        HalfEdgeError::InconsistentNextPrev { halfedge: 6 }
    );
    // unless validation is skipped
    assert!(HalfEdgeStore::new(
        records,
        subdomain.clone(),
        StoreOptions {
            validate: false,
            ..Default::default()
        }
    )
    .is_ok());

    // caught at the other half of the broken pair, which comes first
    let mut records = store.halfedges().to_vec();
    records[3].dual_cross_face = 3;
    assert_eq!(
        HalfEdgeStore::new(records, subdomain.clone(), StoreOptions::default()).unwrap_err(),
        HalfEdgeError::InvalidCrossFaceDual { halfedge: 2 }
    );

    let mut records = store.halfedges().to_vec();
    records[0].next = records.len();
    assert_eq!(
        HalfEdgeStore::new(records, subdomain.clone(), StoreOptions::default()).unwrap_err(),
        HalfEdgeError::IndexOutOfRange {
            entity: EntityKind::HalfEdge,
            index: 24,
            count: 24,
        }
    );

    assert_eq!(
        HalfEdgeStore::new(
            store.halfedges().to_vec(),
            subdomain.clone(),
            StoreOptions {
                edge_count: Some(5),
                ..Default::default()
            }
        )
        .unwrap_err(),
        HalfEdgeError::EdgeCountMismatch {
            expected: 5,
            actual: 6
        }
    );

    assert_eq!(
        HalfEdgeStore::new(Vec::new(), subdomain, StoreOptions::default()).unwrap_err(),
        HalfEdgeError::EmptyMesh
    );
}

#[test]
fn face_outside_on_both_sides_is_rejected() {
    // two disjoint copies of a single tet, the second relabeled as outside
    let tet = HalfEdgeStore::from_mesh(&single_tet()).unwrap();
    let offset = tet.halfedge_count();
    let mut records = tet.halfedges().to_vec();
    records.extend(tet.halfedges().iter().map(|he| HalfEdge {
        node: he.node + tet.node_count(),
        face: he.face + tet.face_count(),
        cell: HalfEdge::OUTSIDE,
        next: he.next + offset,
        prev: he.prev + offset,
        dual_cross_face: he.dual_cross_face + offset,
        dual_same_cell: he.dual_same_cell + offset,
    }));

    assert_eq!(
        HalfEdgeStore::new(records.clone(), vec![0, 0], StoreOptions::default()).unwrap_err(),
        HalfEdgeError::InvalidCrossFaceDual { halfedge: offset }
    );

    // with the second tet's cell intact the same records are fine
    for (he, original) in records[offset..].iter_mut().zip(tet.halfedges()) {
        if !original.is_boundary() {
            he.cell = 2;
        }
    }
    let store = HalfEdgeStore::new(records, vec![0, 0, 0], StoreOptions::default()).unwrap();
    assert!(store
        .face_to_cell()
        .iter()
        .all(|fc| fc.right.is_none()));
}

//
// invalid conventional meshes
//

/// A conventional mesh given directly as a list of faces,
/// for building inputs `PolyMesh3d` wouldn't accept.
struct FaceList {
    nodes: Vec<Vec3>,
    faces: Vec<Vec<usize>>,
    face_to_cell: Option<Vec<FaceCells>>,
    edge_count: usize,
    cell_count: usize,
}

impl FaceList {
    /// The faces of `single_tet` plus some extra faces, all boundary faces of cell 0.
    fn tet_with(extra_faces: &[&[usize]]) -> Self {
        let tet = single_tet();
        let mut nodes = tet.nodes().to_vec();
        nodes.push(Vec3::new(1.0, 1.0, 1.0));
        let faces = tet
            .faces()
            .map(|f| f.to_vec())
            .chain(extra_faces.iter().map(|f| f.to_vec()))
            .collect_vec();
        let face_to_cell = vec![
            FaceCells {
                left: 0,
                right: None
            };
            faces.len()
        ];
        Self {
            nodes,
            faces,
            face_to_cell: Some(face_to_cell),
            edge_count: tet.edge_count(),
            cell_count: 1,
        }
    }
}

impl ConventionalMesh for FaceList {
    fn nodes(&self) -> &[Vec3] {
        &self.nodes
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn cell_count(&self) -> usize {
        self.cell_count
    }

    fn face_nodes(&self, face: usize) -> &[usize] {
        &self.faces[face]
    }

    fn face_to_cell(&self) -> Option<&[FaceCells]> {
        self.face_to_cell.as_deref()
    }
}

#[test]
fn non_manifold_edge_is_rejected() {
    // a third face on the edge (0, 1), both inside the cell and outside of it
    let mesh = FaceList::tet_with(&[&[0, 1, 4]]);
    assert_eq!(
        HalfEdgeStore::from_mesh(&mesh).unwrap_err(),
        HalfEdgeError::NonManifoldEdge {
            nodes: [0, 1],
            cell: HalfEdge::OUTSIDE,
            count: 3,
        }
    );
}

#[test]
fn non_manifold_edge_inside_a_cell_is_rejected() {
    // the extra face separates cell 0 from a second cell,
    // so the outside stays manifold but cell 0 gets three half-edges on (0, 1)
    let mut mesh = FaceList::tet_with(&[&[0, 1, 4]]);
    mesh.cell_count = 2;
    if let Some(face_to_cell) = mesh.face_to_cell.as_mut() {
        face_to_cell[4] = FaceCells {
            left: 0,
            right: Some(1),
        };
    }
    assert_eq!(
        HalfEdgeStore::from_mesh(&mesh).unwrap_err(),
        HalfEdgeError::NonManifoldEdge {
            nodes: [0, 1],
            cell: 1,
            count: 3,
        }
    );
}

#[test]
fn inconsistent_faces_are_rejected() {
    let mesh = FaceList::tet_with(&[&[0, 1, 2, 4]]);
    assert_eq!(
        HalfEdgeStore::from_mesh(&mesh).unwrap_err(),
        HalfEdgeError::FaceEdgeCountMismatch {
            face: 4,
            expected: 3,
            actual: 4,
        }
    );

    let mut mesh = FaceList::tet_with(&[]);
    mesh.face_to_cell = None;
    assert_eq!(
        HalfEdgeStore::from_mesh(&mesh).unwrap_err(),
        HalfEdgeError::MissingFaceToCell
    );

    let mut mesh = FaceList::tet_with(&[]);
    mesh.edge_count = 7;
    assert_eq!(
        HalfEdgeStore::from_mesh(&mesh).unwrap_err(),
        HalfEdgeError::EdgeCountMismatch {
            expected: 7,
            actual: 6
        }
    );

    let mut mesh = FaceList::tet_with(&[]);
    mesh.faces[2][1] = 9;
    assert_eq!(
        HalfEdgeStore::from_mesh(&mesh).unwrap_err(),
        HalfEdgeError::IndexOutOfRange {
            entity: EntityKind::Node,
            index: 9,
            count: 5,
        }
    );

    let mut mesh = FaceList::tet_with(&[]);
    mesh.faces.clear();
    mesh.face_to_cell = Some(Vec::new());
    assert_eq!(
        HalfEdgeStore::from_mesh(&mesh).unwrap_err(),
        HalfEdgeError::EmptyMesh
    );
}

//
// the mesh façade
//

#[test]
fn mesh_basics() {
    let conventional = two_tets();
    let mesh = HalfEdgeMesh::from_mesh(&conventional).unwrap();
    assert_eq!(mesh.meshtype(), "halfedge3d");
    assert_eq!(mesh.node_count(), 5);
    assert_eq!(mesh.edge_count(), 9);
    assert_eq!(mesh.face_count(), 7);
    assert_eq!(mesh.cell_count(), 2);
    assert_eq!(mesh.nodes(), conventional.nodes());

    let bounds = mesh.bounds();
    assert_relative_eq!(bounds.min, Vec3::new(0.0, 0.0, -1.0));
    assert_relative_eq!(bounds.max, Vec3::new(1.0, 1.0, 1.0));
}

#[test]
fn barycenters() {
    let mesh = HalfEdgeMesh::from_mesh(&box_hexes(2, 1, 1)).unwrap();

    let cells = mesh.cell_barycenters();
    assert_eq!(cells.len(), 2);
    assert_relative_eq!(cells[0], Vec3::new(0.25, 0.5, 0.5));
    assert_relative_eq!(cells[1], Vec3::new(0.75, 0.5, 0.5));

    let faces = mesh.face_barycenters();
    assert_eq!(faces.len(), mesh.face_count());
    let shared = (0..mesh.face_count())
        .find(|&face| !mesh.store().boundary_faces().contains(face))
        .unwrap();
    assert_relative_eq!(faces[shared], Vec3::new(0.5, 0.5, 0.5));

    let edges = mesh.edge_barycenters();
    for (center, [a, b]) in edges.iter().zip(mesh.store().edges()) {
        assert_relative_eq!(*center, 0.5 * (mesh.nodes()[*a] + mesh.nodes()[*b]));
    }
}

#[test]
fn edge_and_face_data_are_shared() {
    let mut mesh = HalfEdgeMesh::from_mesh(&two_tets()).unwrap();
    mesh.edge_data_mut()
        .insert("edge_marker", vec![1_i64; 9])
        .unwrap();
    mesh.face_data_mut()
        .insert("face_error", vec![0.5; 7])
        .unwrap();

    assert!(mesh.face_data().contains("edge_marker"));
    assert!(mesh.edge_data().contains("face_error"));
    assert!(mesh.face_data_mut().remove("edge_marker").is_some());
    assert!(!mesh.edge_data().contains("edge_marker"));

    // neither edge nor face count
    assert!(matches!(
        mesh.edge_data_mut().insert("bad", vec![0.0; 8]),
        Err(HalfEdgeError::AttributeLength { actual: 8, .. })
    ));
    // only the mesh-global table takes any length
    mesh.mesh_data_mut().insert("anything", vec![0.0; 8]).unwrap();
    assert!(mesh.cell_data_mut().insert("bad", vec![0.0; 8]).is_err());
}

#[test]
fn dof_and_levels() {
    let mut mesh = HalfEdgeMesh::from_mesh(&box_hexes(2, 2, 2)).unwrap();
    // the center node of the grid
    let center = 13;
    for node in 0..mesh.node_count() {
        let expected = if node == center {
            NodeDof::Interior
        } else {
            NodeDof::Boundary
        };
        assert_eq!(mesh.node_dof(node), Some(expected));
        assert_eq!(mesh.node_level(node), Some(0));
    }
    assert_eq!(mesh.cell_level(7), Some(0));
    assert_eq!(mesh.cell_level(8), None);
    assert_eq!(
        mesh.halfedge_data().get(LEVEL).map(AttributeData::len),
        Some(mesh.store().halfedge_count())
    );

    mesh.fix_nodes([0, center, 1000]);
    assert_eq!(mesh.node_dof(0), Some(NodeDof::Fixed));
    assert_eq!(mesh.node_dof(center), Some(NodeDof::Fixed));
    assert_eq!(mesh.node_dof(1), Some(NodeDof::Boundary));

    // fixing nodes brings back a removed dof attribute
    mesh.node_data_mut().remove(DOF);
    assert_eq!(mesh.node_dof(0), None);
    mesh.fix_nodes([1]);
    assert_eq!(mesh.node_dof(1), Some(NodeDof::Fixed));
    assert_eq!(mesh.node_dof(center), Some(NodeDof::Interior));
}

#[test]
fn fixing_nodes_keeps_levels() {
    let mut mesh = HalfEdgeMesh::from_mesh(&box_hexes(2, 1, 1)).unwrap();
    mesh.node_data_mut().integer_mut(LEVEL).unwrap()[3] = 2;
    mesh.cell_data_mut().integer_mut(LEVEL).unwrap()[1] = 1;
    mesh.halfedge_data_mut().integer_mut(LEVEL).unwrap()[0] = 1;

    // a dof array of the right length but the wrong type is rebuilt
    // without touching the levels
    let node_count = mesh.node_count();
    mesh.node_data_mut()
        .insert(DOF, vec![0.0; node_count])
        .unwrap();
    assert_eq!(mesh.node_dof(0), None);
    mesh.fix_nodes([4]);
    assert_eq!(mesh.node_dof(4), Some(NodeDof::Fixed));
    assert_eq!(mesh.node_dof(0), Some(NodeDof::Boundary));
    assert_eq!(mesh.node_level(3), Some(2));
    assert_eq!(mesh.cell_level(1), Some(1));
    assert_eq!(
        mesh.halfedge_data()
            .get(LEVEL)
            .and_then(AttributeData::as_integer)
            .map(|levels| levels[0]),
        Some(1)
    );

    // in-place edits can't change the length of the dof array
    mesh.node_data_mut().integer_mut(DOF).unwrap()[5] = NodeDof::Interior.code();
    mesh.fix_nodes([node_count - 1]);
    assert_eq!(mesh.node_dof(node_count - 1), Some(NodeDof::Fixed));
    assert_eq!(mesh.node_dof(5), Some(NodeDof::Interior));
}

#[test]
fn reinit_replaces_topology() {
    let mut mesh = HalfEdgeMesh::from_mesh(&single_tet()).unwrap();
    mesh.fix_nodes([2]);
    mesh.node_data_mut().insert("weight", vec![1.0; 4]).unwrap();
    mesh.cell_data_mut().insert("marker", vec![1_i64]).unwrap();
    mesh.mesh_data_mut().insert("time", vec![0.25]).unwrap();

    let target = two_tets();
    let target_store = HalfEdgeStore::from_mesh(&target).unwrap();
    mesh.reinit(
        target.nodes().to_vec(),
        target_store.halfedges().to_vec(),
        target_store.subdomains().to_vec(),
        StoreOptions::default(),
    )
    .unwrap();

    assert_eq!(mesh.node_count(), 5);
    assert_eq!(mesh.cell_count(), 2);
    assert_eq!(mesh.store().halfedges(), target_store.halfedges());
    // arrays of the old sizes are gone, unaligned ones stay
    assert!(!mesh.node_data().contains("weight"));
    assert!(!mesh.cell_data().contains("marker"));
    assert!(mesh.mesh_data().contains("time"));
    // level info is rebuilt for the new topology
    assert_eq!(mesh.node_dof(2), Some(NodeDof::Fixed));
    assert_eq!(mesh.node_dof(4), Some(NodeDof::Boundary));
    assert_eq!(mesh.cell_level(1), Some(0));
}

#[test]
fn failed_reinit_keeps_mesh() {
    let mut mesh = HalfEdgeMesh::from_mesh(&single_tet()).unwrap();
    let records = mesh.store().halfedges().to_vec();
    let subdomain = mesh.store().subdomains().to_vec();

    // one node too few for the records
    let err = mesh
        .reinit(
            mesh.nodes()[..3].to_vec(),
            records.clone(),
            subdomain.clone(),
            StoreOptions::default(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        HalfEdgeError::IndexOutOfRange {
            entity: EntityKind::Node,
            index: 3,
            count: 3,
        }
    );

    let err = mesh
        .reinit(
            mesh.nodes().to_vec(),
            records,
            subdomain,
            StoreOptions {
                node_count: Some(7),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        HalfEdgeError::CountMismatch {
            entity: EntityKind::Node,
            expected: 7,
            actual: 4,
        }
    );

    assert_eq!(mesh.node_count(), 4);
    assert_eq!(mesh.store().halfedge_count(), 24);
    assert!(mesh.node_data().contains(DOF));
}

//
// property tests
//

proptest! {
    #[test]
    fn prop_tet_boxes(nx in 1usize..4, ny in 1usize..4, nz in 1usize..4) {
        let mesh = box_tets(nx, ny, nz);
        let store = HalfEdgeStore::from_mesh(&mesh).unwrap();
        check_structure(&mesh, &store);
    }

    #[test]
    fn prop_hex_boxes(nx in 1usize..4, ny in 1usize..4, nz in 1usize..4) {
        let mesh = box_hexes(nx, ny, nz);
        let store = HalfEdgeStore::from_mesh(&mesh).unwrap();
        check_structure(&mesh, &store);
        // every interior face has a cell on both sides
        let interior = store
            .face_to_cell()
            .iter()
            .filter(|fc| fc.right.is_some())
            .count();
        prop_assert_eq!(
            interior,
            (nx - 1) * ny * nz + nx * (ny - 1) * nz + nx * ny * (nz - 1)
        );
    }
}
