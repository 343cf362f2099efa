use itertools::Itertools;

use super::{CellKind, FaceCells, MeshError, PolyMesh3d};
use crate::Vec3;

/// Construct a mesh from nodes and a flat array of cell node indices.
///
/// Faces are identified by their sorted node indices.
/// The first cell (in index order) to reference a face becomes its left cell,
/// and the face keeps the node ordering that cell gave it.
pub fn build_mesh(
    nodes: Vec<Vec3>,
    kind: CellKind,
    cells: Vec<usize>,
) -> Result<PolyMesh3d, MeshError> {
    if nodes.is_empty() {
        return Err(MeshError::MissingNodes);
    }
    let cell_size = kind.node_count();
    if cells.len() % cell_size != 0 {
        return Err(MeshError::IndexCount {
            len: cells.len(),
            cell_size,
        });
    }
    if cells.is_empty() {
        return Err(MeshError::MissingCells);
    }
    for (cell_idx, cell) in cells.chunks_exact(cell_size).enumerate() {
        if let Some(&node) = cell.iter().find(|&&n| n >= nodes.len()) {
            return Err(MeshError::NodeOutOfRange {
                cell: cell_idx,
                node,
                node_count: nodes.len(),
            });
        }
    }

    //
    // faces
    //

    let face_size = kind.face_edge_count();
    let local_faces = kind.local_faces();
    let candidate_count = (cells.len() / cell_size) * local_faces.len();

    // every local face of every cell, with its orientation as given by the cell,
    // plus a sorted copy of its nodes for identifying duplicates
    // and the cell it came from
    let mut candidate_nodes: Vec<usize> = Vec::with_capacity(candidate_count * face_size);
    let mut candidate_keys: Vec<usize> = Vec::with_capacity(candidate_count * face_size);
    let mut candidate_cells: Vec<usize> = Vec::with_capacity(candidate_count);

    for (cell_idx, cell) in cells.chunks_exact(cell_size).enumerate() {
        for local_face in local_faces {
            let start = candidate_keys.len();
            for &local_idx in local_face.iter() {
                candidate_nodes.push(cell[local_idx]);
                candidate_keys.push(cell[local_idx]);
            }
            candidate_keys[start..].sort_unstable();
            candidate_cells.push(cell_idx);
        }
    }

    let key_of = |i: usize| &candidate_keys[i * face_size..(i + 1) * face_size];
    let nodes_of = |i: usize| &candidate_nodes[i * face_size..(i + 1) * face_size];

    // sort in lexicographic order by key to bring duplicates next to each other.
    // the sort is stable so that within a group the lowest cell index comes first
    let sorted_candidates: Vec<usize> = (0..candidate_count).sorted_by_key(|&i| key_of(i)).collect();

    let mut faces: Vec<usize> = Vec::with_capacity(candidate_count * face_size);
    let mut face_to_cell: Vec<FaceCells> = Vec::with_capacity(candidate_count);

    let mut candidate_iter = sorted_candidates.iter().copied().peekable();
    while let Some(first) = candidate_iter.next() {
        let key = key_of(first);
        let mut adjacency = FaceCells {
            left: candidate_cells[first],
            right: None,
        };
        if let Some(second) = candidate_iter.next_if(|&next| key_of(next) == key) {
            adjacency.right = Some(candidate_cells[second]);
        }
        if matches!(candidate_iter.peek(), Some(&third) if key_of(third) == key) {
            return Err(MeshError::NonManifoldFace {
                nodes: key.to_vec(),
            });
        }

        faces.extend_from_slice(nodes_of(first));
        face_to_cell.push(adjacency);
    }

    //
    // edges
    //

    // every pair of consecutive nodes on a face is an edge.
    // dedup after a sort gives them in lexicographic order
    let edges: Vec<usize> = faces
        .chunks_exact(face_size)
        .flat_map(|face| {
            (0..face_size).map(move |j| {
                let (a, b) = (face[(j + face_size - 1) % face_size], face[j]);
                [a.min(b), a.max(b)]
            })
        })
        .sorted_unstable()
        .dedup()
        .flatten()
        .collect();

    log::debug!(
        "built {kind:?} mesh with {} nodes, {} edges, {} faces, {} cells",
        nodes.len(),
        edges.len() / 2,
        face_to_cell.len(),
        cells.len() / cell_size,
    );

    Ok(PolyMesh3d {
        nodes,
        kind,
        cells,
        faces,
        edges,
        face_to_cell,
        subdomains: None,
    })
}

//
// test meshes
//

/// A mesh consisting of a single tetrahedron
/// with its right-angled corner at the origin.
///
/// This is public for visibility in doctests, which frequently need an instance of a mesh.
/// It is not meant to be used by users and thus hidden from docs.
#[doc(hidden)]
pub fn single_tet() -> PolyMesh3d {
    let nodes = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    ];
    let cells = vec![0, 1, 2, 3];
    PolyMesh3d::new(nodes, CellKind::Tetrahedron, cells).expect("valid test mesh")
}

/// Two tetrahedra sharing the face (0, 1, 2),
/// one above and one below the x,y plane.
#[doc(hidden)]
pub fn two_tets() -> PolyMesh3d {
    let nodes = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.3, 0.3, -1.0),
    ];
    #[rustfmt::skip]
    let cells = vec![
        0, 1, 2, 3,
        0, 2, 1, 4,
    ];
    PolyMesh3d::new(nodes, CellKind::Tetrahedron, cells).expect("valid test mesh")
}

/// Index of the node at grid position `(i, j, k)` in a box mesh.
fn grid_node(i: usize, j: usize, k: usize, nx: usize, ny: usize) -> usize {
    i + j * (nx + 1) + k * (nx + 1) * (ny + 1)
}

/// Regular grid of `(nx + 1) * (ny + 1) * (nz + 1)` nodes on the unit cube.
fn grid_nodes(nx: usize, ny: usize, nz: usize) -> Vec<Vec3> {
    let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                nodes.push(Vec3::new(
                    i as f64 / nx as f64,
                    j as f64 / ny as f64,
                    k as f64 / nz as f64,
                ));
            }
        }
    }
    nodes
}

/// The unit cube split into `nx * ny * nz` boxes,
/// each of which is split into six tetrahedra.
///
/// Every box is split the same way (along paths from its lowest to its highest corner),
/// which makes the tetrahedra match up across box faces.
#[doc(hidden)]
pub fn box_tets(nx: usize, ny: usize, nz: usize) -> PolyMesh3d {
    assert!(nx > 0 && ny > 0 && nz > 0, "box mesh needs at least one box");

    // axis orderings of the paths through each box
    // and the sign of the corresponding permutation
    const PATHS: [([usize; 3], bool); 6] = [
        ([0, 1, 2], true),
        ([0, 2, 1], false),
        ([1, 0, 2], false),
        ([1, 2, 0], true),
        ([2, 0, 1], true),
        ([2, 1, 0], false),
    ];

    let mut cells = Vec::with_capacity(nx * ny * nz * 6 * 4);
    for (k, j, i) in itertools::iproduct!(0..nz, 0..ny, 0..nx) {
        for (axes, positive) in PATHS {
            let mut corner = [i, j, k];
            let mut tet = [0; 4];
            tet[0] = grid_node(corner[0], corner[1], corner[2], nx, ny);
            for (step, axis) in axes.into_iter().enumerate() {
                corner[axis] += 1;
                tet[step + 1] = grid_node(corner[0], corner[1], corner[2], nx, ny);
            }
            // odd permutations give negatively oriented tets, flip those
            if !positive {
                tet.swap(2, 3);
            }
            cells.extend_from_slice(&tet);
        }
    }

    PolyMesh3d::new(grid_nodes(nx, ny, nz), CellKind::Tetrahedron, cells)
        .expect("valid test mesh")
}

/// The unit cube split into `nx * ny * nz` hexahedra.
#[doc(hidden)]
pub fn box_hexes(nx: usize, ny: usize, nz: usize) -> PolyMesh3d {
    assert!(nx > 0 && ny > 0 && nz > 0, "box mesh needs at least one box");

    let mut cells = Vec::with_capacity(nx * ny * nz * 8);
    for (k, j, i) in itertools::iproduct!(0..nz, 0..ny, 0..nx) {
        for dk in 0..2 {
            cells.extend_from_slice(&[
                grid_node(i, j, k + dk, nx, ny),
                grid_node(i + 1, j, k + dk, nx, ny),
                grid_node(i + 1, j + 1, k + dk, nx, ny),
                grid_node(i, j + 1, k + dk, nx, ny),
            ]);
        }
    }

    PolyMesh3d::new(grid_nodes(nx, ny, nz), CellKind::Hexahedron, cells)
        .expect("valid test mesh")
}
