use itertools::Itertools;

use super::{EntityKind, FaceLoop, HalfEdgeError, HalfEdgeView};
use crate::mesh::ConventionalMesh;

/// One directed half-edge, bounding one face within one cell.
///
/// All links to other half-edges are indices into the owning [`HalfEdgeStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HalfEdge {
    /// The node this half-edge points to.
    pub node: usize,
    /// The face this half-edge borders.
    pub face: usize,
    /// The cell this half-edge bounds, offset by one
    /// so that [`HalfEdge::OUTSIDE`] can stand for the region outside the mesh.
    pub cell: usize,
    /// The following half-edge around the face, within the same cell.
    pub next: usize,
    /// The preceding half-edge around the face, within the same cell.
    pub prev: usize,
    /// The twin of this half-edge on the other side of its face,
    /// in the neighboring cell.
    pub dual_cross_face: usize,
    /// The half-edge on the same geometric edge in the same cell,
    /// bordering the other face of the cell that meets at the edge.
    pub dual_same_cell: usize,
}

impl HalfEdge {
    /// Value of [`cell`][Self::cell] for half-edges on the outside of the mesh boundary.
    pub const OUTSIDE: usize = 0;

    /// The 0-based index of the cell this half-edge bounds,
    /// or None if it's on the outside of the mesh.
    #[inline]
    pub fn cell_index(&self) -> Option<usize> {
        self.cell.checked_sub(1)
    }

    /// Whether this half-edge is on the outside of the mesh boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.cell == Self::OUTSIDE
    }
}

/// Options for building a [`HalfEdgeStore`] from raw half-edge records.
///
/// Counts that aren't given are inferred from the records.
/// ```
/// # use hemesh::StoreOptions;
/// let options = StoreOptions {
///     edge_count: Some(6),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    /// Number of nodes. Inferred as one past the largest node index if None.
    pub node_count: Option<usize>,
    /// Number of edges. Inferred from the distinct node pairs if None.
    pub edge_count: Option<usize>,
    /// Number of faces. Inferred as one past the largest face index if None.
    pub face_count: Option<usize>,
    /// Whether to check the structural invariants after construction.
    pub validate: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            node_count: None,
            edge_count: None,
            face_count: None,
            validate: true,
        }
    }
}

/// Connectivity of a polyhedral mesh stored as an array of half-edges.
///
/// For every face of the mesh, each of its two sides
/// (one per adjacent cell, or the outside of the mesh on the boundary)
/// gets one half-edge per face edge.
/// All faces must have the same number of edges.
#[derive(Clone, Debug)]
pub struct HalfEdgeStore {
    halfedges: Vec<HalfEdge>,
    /// subdomain of each cell, with index 0 reserved for the outside
    subdomain: Vec<usize>,
    face_edge_count: usize,
    node_count: usize,
    face_count: usize,
    /// edge index of each half-edge
    halfedge_edge: Vec<usize>,
    /// node indices of each edge, lower index first
    edge_nodes: Vec<[usize; 2]>,
    /// one half-edge of each (real) cell
    hcell: Vec<usize>,
    /// one half-edge of each face
    hface: Vec<usize>,
    /// one half-edge of each edge
    hedge: Vec<usize>,
}

impl HalfEdgeStore {
    /// Build a store from a conventional mesh.
    ///
    /// Every face `f` with nodes `n_0..n_{FE-1}` produces the half-edges
    /// `2 * (f * FE + j)` (pointing to `n_j`, in the face's left cell)
    /// and `2 * (f * FE + j) + 1` (pointing to `n_{j-1}`, in the right cell
    /// or outside of the mesh), so each pair is the two sides of one face edge.
    pub fn from_mesh(mesh: &impl ConventionalMesh) -> Result<Self, HalfEdgeError> {
        let node_count = mesh.node_count();
        let face_count = mesh.face_count();
        let cell_count = mesh.cell_count();

        if face_count == 0 || cell_count == 0 {
            return Err(HalfEdgeError::EmptyMesh);
        }
        let face_to_cell = mesh
            .face_to_cell()
            .ok_or(HalfEdgeError::MissingFaceToCell)?;
        if face_to_cell.len() != face_count {
            return Err(HalfEdgeError::CountMismatch {
                entity: EntityKind::Face,
                expected: face_count,
                actual: face_to_cell.len(),
            });
        }

        let fe = mesh.face_nodes(0).len();
        if fe < 3 {
            return Err(HalfEdgeError::DegenerateFace {
                face: 0,
                edge_count: fe,
            });
        }
        let halfedge_count = 2 * face_count * fe;
        let mut halfedges = vec![HalfEdge::default(); halfedge_count];

        //
        // destinations, faces, cells and duals across faces
        //

        let check_cell = |cell: usize| {
            if cell >= cell_count {
                Err(HalfEdgeError::IndexOutOfRange {
                    entity: EntityKind::Cell,
                    index: cell,
                    count: cell_count,
                })
            } else {
                Ok(cell + 1)
            }
        };

        for (face_idx, adjacency) in face_to_cell.iter().enumerate() {
            let face = mesh.face_nodes(face_idx);
            if face.len() != fe {
                return Err(HalfEdgeError::FaceEdgeCountMismatch {
                    face: face_idx,
                    expected: fe,
                    actual: face.len(),
                });
            }
            if let Some(&node) = face.iter().find(|&&n| n >= node_count) {
                return Err(HalfEdgeError::IndexOutOfRange {
                    entity: EntityKind::Node,
                    index: node,
                    count: node_count,
                });
            }

            let left_cell = check_cell(adjacency.left)?;
            let right_cell = match adjacency.right {
                Some(right) if !mesh.is_boundary_face(face_idx) => check_cell(right)?,
                _ => HalfEdge::OUTSIDE,
            };

            for j in 0..fe {
                let forward = 2 * (face_idx * fe + j);
                let backward = forward + 1;
                halfedges[forward] = HalfEdge {
                    node: face[j],
                    face: face_idx,
                    cell: left_cell,
                    dual_cross_face: backward,
                    ..Default::default()
                };
                // the backward side runs in reverse,
                // so it points to the node the forward half-edge starts from
                halfedges[backward] = HalfEdge {
                    node: face[(j + fe - 1) % fe],
                    face: face_idx,
                    cell: right_cell,
                    dual_cross_face: forward,
                    ..Default::default()
                };
            }
        }

        //
        // next and prev
        //

        // shift the twin indices of each face-side by one slot.
        // the forward side continues to the following slot around the face
        // and the backward side to the preceding one,
        // which keeps each loop on its own side of the face
        for slot in 0..face_count * fe {
            let face_start = slot - slot % fe;
            let j = slot % fe;
            let following = face_start + (j + 1) % fe;
            let preceding = face_start + (j + fe - 1) % fe;
            halfedges[2 * slot].next = halfedges[2 * following + 1].dual_cross_face;
            halfedges[2 * slot + 1].next = halfedges[2 * preceding].dual_cross_face;
        }
        scatter_prev(&mut halfedges);

        //
        // duals within the same cell
        //

        pair_same_cell(&mut halfedges)?;

        //
        // subdomains
        //

        let mut subdomain = vec![0; cell_count + 1];
        if let Some(tags) = mesh.subdomains() {
            if tags.len() != cell_count {
                return Err(HalfEdgeError::CountMismatch {
                    entity: EntityKind::Cell,
                    expected: cell_count,
                    actual: tags.len(),
                });
            }
            subdomain[1..].copy_from_slice(tags);
        }

        let store = Self::assemble(
            halfedges,
            subdomain,
            fe,
            node_count,
            face_count,
            Some(mesh.edge_count()),
            true,
        )?;

        log::debug!(
            "built half-edge store: {} half-edges, {} nodes, {} edges, {} faces, {} cells",
            store.halfedge_count(),
            store.node_count(),
            store.edge_count(),
            store.face_count(),
            store.cell_count(),
        );

        Ok(store)
    }

    /// Build a store from raw half-edge records and subdomain tags.
    ///
    /// `subdomain` has one entry per cell plus one for the outside at index 0,
    /// so its length determines the cell count.
    /// The `next`, `prev` and dual links of the records are used as they are;
    /// edges are numbered by sorting their node pairs.
    pub fn new(
        halfedges: Vec<HalfEdge>,
        subdomain: Vec<usize>,
        options: StoreOptions,
    ) -> Result<Self, HalfEdgeError> {
        if halfedges.is_empty() || subdomain.len() < 2 {
            return Err(HalfEdgeError::EmptyMesh);
        }
        let halfedge_count = halfedges.len();
        let cell_count = subdomain.len() - 1;

        let max_node = halfedges.iter().map(|he| he.node).max().unwrap_or(0);
        let node_count = options.node_count.unwrap_or(max_node + 1);
        let max_face = halfedges.iter().map(|he| he.face).max().unwrap_or(0);
        let face_count = options.face_count.unwrap_or(max_face + 1);

        for he in &halfedges {
            let checks = [
                (EntityKind::Node, he.node, node_count),
                (EntityKind::Face, he.face, face_count),
                (EntityKind::Cell, he.cell, cell_count + 1),
                (EntityKind::HalfEdge, he.next, halfedge_count),
                (EntityKind::HalfEdge, he.prev, halfedge_count),
                (EntityKind::HalfEdge, he.dual_cross_face, halfedge_count),
                (EntityKind::HalfEdge, he.dual_same_cell, halfedge_count),
            ];
            if let Some((entity, index, count)) = checks.into_iter().find(|(_, i, c)| i >= c) {
                return Err(HalfEdgeError::IndexOutOfRange {
                    entity,
                    index,
                    count,
                });
            }
        }

        // the face loop of the first half-edge gives the edges per face.
        // validation checks the rest of the loops agree
        let mut fe = 1;
        let mut curr = halfedges[0].next;
        while curr != 0 && fe <= halfedge_count {
            curr = halfedges[curr].next;
            fe += 1;
        }
        if fe > halfedge_count {
            return Err(HalfEdgeError::OpenFaceLoop {
                halfedge: 0,
                face_edge_count: fe,
            });
        }
        if fe < 3 {
            return Err(HalfEdgeError::DegenerateFace {
                face: halfedges[0].face,
                edge_count: fe,
            });
        }

        Self::assemble(
            halfedges,
            subdomain,
            fe,
            node_count,
            face_count,
            options.edge_count,
            options.validate,
        )
    }

    /// Finish construction: number the edges, pick seed half-edges
    /// and optionally validate.
    fn assemble(
        halfedges: Vec<HalfEdge>,
        subdomain: Vec<usize>,
        face_edge_count: usize,
        node_count: usize,
        face_count: usize,
        expected_edge_count: Option<usize>,
        validate: bool,
    ) -> Result<Self, HalfEdgeError> {
        let (halfedge_edge, edge_nodes) = number_edges(&halfedges);
        if let Some(expected) = expected_edge_count {
            if expected != edge_nodes.len() {
                return Err(HalfEdgeError::EdgeCountMismatch {
                    expected,
                    actual: edge_nodes.len(),
                });
            }
        }

        let mut store = Self {
            halfedges,
            subdomain,
            face_edge_count,
            node_count,
            face_count,
            halfedge_edge,
            edge_nodes,
            hcell: Vec::new(),
            hface: Vec::new(),
            hedge: Vec::new(),
        };
        store.reseed()?;
        if validate {
            store.validate()?;
        }
        Ok(store)
    }

    /// Pick a representative half-edge for every cell, face and edge.
    ///
    /// The lowest-indexed half-edge referring to each entity is chosen.
    /// Fails if some entity has no half-edges referring to it.
    pub fn reseed(&mut self) -> Result<(), HalfEdgeError> {
        const UNSET: usize = usize::MAX;
        let mut hcell = vec![UNSET; self.cell_count()];
        let mut hface = vec![UNSET; self.face_count];
        let mut hedge = vec![UNSET; self.edge_nodes.len()];

        // iterate in reverse so the lowest index is the one left standing
        for (he_idx, (he, &edge)) in self
            .halfedges
            .iter()
            .zip(&self.halfedge_edge)
            .enumerate()
            .rev()
        {
            if let Some(cell) = he.cell_index() {
                hcell[cell] = he_idx;
            }
            hface[he.face] = he_idx;
            hedge[edge] = he_idx;
        }

        for (entity, seeds) in [
            (EntityKind::Cell, &hcell),
            (EntityKind::Face, &hface),
            (EntityKind::Edge, &hedge),
        ] {
            if let Some(index) = seeds.iter().position(|&s| s == UNSET) {
                return Err(HalfEdgeError::MissingHalfEdge { entity, index });
            }
        }

        self.hcell = hcell;
        self.hface = hface;
        self.hedge = hedge;
        Ok(())
    }

    /// Check the structural invariants of the store:
    /// - `next` and `prev` are inverses of each other,
    /// - every face loop closes after exactly `face_edge_count` steps
    ///   without leaving its face and cell,
    /// - `dual_cross_face` pairs up distinct half-edges on the same face,
    ///   at least one of which is inside the mesh,
    /// - `dual_same_cell` pairs up distinct half-edges on the same edge in the same cell.
    pub fn validate(&self) -> Result<(), HalfEdgeError> {
        let fe = self.face_edge_count;
        let mut same_direction_pairs = 0;

        for (he_idx, he) in self.halfedges.iter().enumerate() {
            if self.halfedges[he.next].prev != he_idx || self.halfedges[he.prev].next != he_idx {
                return Err(HalfEdgeError::InconsistentNextPrev { halfedge: he_idx });
            }

            let mut curr = he.next;
            let mut steps = 1;
            while curr != he_idx && steps <= fe {
                let curr_he = &self.halfedges[curr];
                if curr_he.face != he.face || curr_he.cell != he.cell {
                    break;
                }
                curr = curr_he.next;
                steps += 1;
            }
            if curr != he_idx || steps != fe {
                return Err(HalfEdgeError::OpenFaceLoop {
                    halfedge: he_idx,
                    face_edge_count: fe,
                });
            }

            let twin_idx = he.dual_cross_face;
            let twin = &self.halfedges[twin_idx];
            if twin_idx == he_idx
                || twin.dual_cross_face != he_idx
                || twin.face != he.face
                || (he.is_boundary() && twin.is_boundary())
            {
                return Err(HalfEdgeError::InvalidCrossFaceDual { halfedge: he_idx });
            }

            let partner_idx = he.dual_same_cell;
            let partner = &self.halfedges[partner_idx];
            if partner_idx == he_idx
                || partner.dual_same_cell != he_idx
                || partner.cell != he.cell
                || self.halfedge_edge[partner_idx] != self.halfedge_edge[he_idx]
            {
                return Err(HalfEdgeError::InvalidSameCellDual { halfedge: he_idx });
            }
            if partner.node == he.node {
                same_direction_pairs += 1;
            }
        }

        if same_direction_pairs > 0 {
            // not fatal for the topology, but it means the input faces
            // weren't oriented consistently with their cells
            log::warn!(
                "{} half-edges run in the same direction as their same-cell dual",
                same_direction_pairs
            );
        }

        Ok(())
    }

    //
    // counts
    //

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_nodes.len()
    }

    /// Number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Number of cells, not counting the outside of the mesh.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.subdomain.len() - 1
    }

    /// Number of half-edges.
    #[inline]
    pub fn halfedge_count(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of edges on every face.
    #[inline]
    pub fn face_edge_count(&self) -> usize {
        self.face_edge_count
    }

    //
    // lookups
    //

    /// Get the record of a half-edge.
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn halfedge(&self, idx: usize) -> &HalfEdge {
        &self.halfedges[idx]
    }

    /// Get a slice of all half-edge records.
    #[inline]
    pub fn halfedges(&self) -> &[HalfEdge] {
        &self.halfedges
    }

    /// Get a navigable view of a half-edge.
    #[inline]
    pub fn view(&self, idx: usize) -> HalfEdgeView<'_> {
        assert!(
            idx < self.halfedges.len(),
            "half-edge {idx} out of range for {} half-edges",
            self.halfedges.len()
        );
        HalfEdgeView {
            store: self,
            index: idx,
        }
    }

    /// The following half-edge around the face of `idx`.
    #[inline]
    pub fn next(&self, idx: usize) -> usize {
        self.halfedges[idx].next
    }

    /// The preceding half-edge around the face of `idx`.
    #[inline]
    pub fn prev(&self, idx: usize) -> usize {
        self.halfedges[idx].prev
    }

    /// The twin of `idx` on the other side of its face.
    #[inline]
    pub fn dual_cross_face(&self, idx: usize) -> usize {
        self.halfedges[idx].dual_cross_face
    }

    /// The half-edge on the same edge and in the same cell as `idx`.
    #[inline]
    pub fn dual_same_cell(&self, idx: usize) -> usize {
        self.halfedges[idx].dual_same_cell
    }

    /// The edge a half-edge lies on.
    #[inline]
    pub fn edge_of(&self, idx: usize) -> usize {
        self.halfedge_edge[idx]
    }

    /// The node indices of an edge, lower index first.
    #[inline]
    pub fn edge_nodes(&self, edge: usize) -> [usize; 2] {
        self.edge_nodes[edge]
    }

    /// Node indices of every edge, lower index first.
    #[inline]
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edge_nodes
    }

    /// Subdomain tag of a cell (0-based, not counting the outside).
    #[inline]
    pub fn subdomain(&self, cell: usize) -> usize {
        self.subdomain[cell + 1]
    }

    /// Subdomain tags indexed like [`HalfEdge::cell`],
    /// i.e. with the outside of the mesh at index 0.
    #[inline]
    pub fn subdomains(&self) -> &[usize] {
        &self.subdomain
    }

    /// A half-edge bounding the given cell.
    #[inline]
    pub fn halfedge_of_cell(&self, cell: usize) -> usize {
        self.hcell[cell]
    }

    /// A half-edge bordering the given face.
    #[inline]
    pub fn halfedge_of_face(&self, face: usize) -> usize {
        self.hface[face]
    }

    /// A half-edge lying on the given edge.
    #[inline]
    pub fn halfedge_of_edge(&self, edge: usize) -> usize {
        self.hedge[edge]
    }

    /// Iterate over the half-edges around a face within a cell,
    /// starting from `seed`.
    #[inline]
    pub fn face_loop(&self, seed: usize) -> FaceLoop<'_> {
        FaceLoop::new(self, seed)
    }
}

/// Set `prev` of every half-edge from the `next` links.
fn scatter_prev(halfedges: &mut [HalfEdge]) {
    for he_idx in 0..halfedges.len() {
        let next = halfedges[he_idx].next;
        halfedges[next].prev = he_idx;
    }
}

/// Find the `dual_same_cell` partner of every half-edge.
///
/// Each half-edge is identified by its (sorted) end nodes and its cell.
/// After one sort by that key, the two half-edges of an edge in a cell
/// are next to each other; any other group size means the cell isn't a manifold.
fn pair_same_cell(halfedges: &mut [HalfEdge]) -> Result<(), HalfEdgeError> {
    let keys: Vec<(usize, usize, usize)> = halfedges
        .iter()
        .map(|he| {
            let (head, tail) = (he.node, halfedges[he.prev].node);
            (head.min(tail), head.max(tail), he.cell)
        })
        .collect();

    let sorted: Vec<usize> = (0..halfedges.len()).sorted_by_key(|&i| keys[i]).collect();
    log::trace!("sorted {} half-edges by edge and cell", sorted.len());

    let groups = sorted.iter().group_by(|&&i| keys[i]);
    for ((a, b, cell), group) in &groups {
        let members: Vec<usize> = group.copied().collect();
        let &[first, second] = members.as_slice() else {
            return Err(HalfEdgeError::NonManifoldEdge {
                nodes: [a, b],
                cell,
                count: members.len(),
            });
        };
        halfedges[first].dual_same_cell = second;
        halfedges[second].dual_same_cell = first;
    }

    Ok(())
}

/// Number the edges described by a set of half-edges.
///
/// Returns the edge index of each half-edge
/// and the node indices of each edge, in lexicographic order.
fn number_edges(halfedges: &[HalfEdge]) -> (Vec<usize>, Vec<[usize; 2]>) {
    let keys: Vec<[usize; 2]> = halfedges
        .iter()
        .map(|he| {
            let (head, tail) = (he.node, halfedges[he.prev].node);
            [head.min(tail), head.max(tail)]
        })
        .collect();

    let mut halfedge_edge = vec![0; halfedges.len()];
    let mut edge_nodes: Vec<[usize; 2]> = Vec::new();
    for he_idx in (0..halfedges.len()).sorted_unstable_by_key(|&i| keys[i]) {
        if edge_nodes.last() != Some(&keys[he_idx]) {
            edge_nodes.push(keys[he_idx]);
        }
        halfedge_edge[he_idx] = edge_nodes.len() - 1;
    }

    (halfedge_edge, edge_nodes)
}
