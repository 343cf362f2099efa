use super::{HalfEdge, HalfEdgeStore};

/// A view into a single half-edge,
/// for following links without juggling raw indices.
///
/// ```
/// # use hemesh::{mesh::single_tet, HalfEdgeStore};
/// let store = HalfEdgeStore::from_mesh(&single_tet()).unwrap();
/// let he = store.view(0);
/// assert_eq!(he.next().prev(), he);
/// assert_eq!(he.dual_cross_face().dual_cross_face(), he);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct HalfEdgeView<'a> {
    pub(super) store: &'a HalfEdgeStore,
    pub(super) index: usize,
}

impl<'a> PartialEq for HalfEdgeView<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.store, other.store) && self.index == other.index
    }
}
impl<'a> Eq for HalfEdgeView<'a> {}

impl<'a> HalfEdgeView<'a> {
    /// Index of this half-edge in the store.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The underlying record.
    #[inline]
    pub fn record(&self) -> &'a HalfEdge {
        self.store.halfedge(self.index)
    }

    /// The node this half-edge points to.
    #[inline]
    pub fn node(&self) -> usize {
        self.record().node
    }

    /// The node this half-edge starts from.
    #[inline]
    pub fn origin(&self) -> usize {
        self.prev().node()
    }

    /// The face this half-edge borders.
    #[inline]
    pub fn face(&self) -> usize {
        self.record().face
    }

    /// The edge this half-edge lies on.
    #[inline]
    pub fn edge(&self) -> usize {
        self.store.edge_of(self.index)
    }

    /// The 0-based cell this half-edge bounds,
    /// or None if it's on the outside of the mesh.
    #[inline]
    pub fn cell(&self) -> Option<usize> {
        self.record().cell_index()
    }

    #[inline]
    fn jump(&self, index: usize) -> Self {
        Self {
            store: self.store,
            index,
        }
    }

    /// The following half-edge around the face.
    #[inline]
    pub fn next(&self) -> Self {
        self.jump(self.record().next)
    }

    /// The preceding half-edge around the face.
    #[inline]
    pub fn prev(&self) -> Self {
        self.jump(self.record().prev)
    }

    /// The twin half-edge on the other side of the face.
    #[inline]
    pub fn dual_cross_face(&self) -> Self {
        self.jump(self.record().dual_cross_face)
    }

    /// The other half-edge of the same edge in the same cell.
    #[inline]
    pub fn dual_same_cell(&self) -> Self {
        self.jump(self.record().dual_same_cell)
    }

    /// Iterate around the face loop starting from this half-edge.
    #[inline]
    pub fn face_loop(&self) -> FaceLoop<'a> {
        FaceLoop::new(self.store, self.index)
    }
}

/// Iterator over the half-edges bounding a face within a cell,
/// following `next` links from a seed until it comes around again.
///
/// The seed is yielded first.
/// The iterator can be cloned or [`restart`][Self::restart]ed
/// to walk the same loop again.
#[derive(Clone, Debug)]
pub struct FaceLoop<'a> {
    store: &'a HalfEdgeStore,
    seed: usize,
    current: Option<usize>,
    /// guard against unvalidated stores whose loops never close
    remaining: usize,
}

impl<'a> FaceLoop<'a> {
    pub(super) fn new(store: &'a HalfEdgeStore, seed: usize) -> Self {
        assert!(
            seed < store.halfedge_count(),
            "seed half-edge {seed} out of range for {} half-edges",
            store.halfedge_count()
        );
        Self {
            store,
            seed,
            current: Some(seed),
            remaining: store.halfedge_count(),
        }
    }

    /// The half-edge the loop starts from.
    #[inline]
    pub fn seed(&self) -> usize {
        self.seed
    }

    /// Go back to the start of the loop.
    #[inline]
    pub fn restart(&mut self) {
        self.current = Some(self.seed);
        self.remaining = self.store.halfedge_count();
    }

    /// Iterate over the nodes the half-edges of the loop point to.
    pub fn nodes(self) -> impl 'a + Iterator<Item = usize> {
        let store = self.store;
        self.map(move |he| store.halfedge(he).node)
    }
}

impl<'a> Iterator for FaceLoop<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.current?;
        self.remaining = self.remaining.checked_sub(1)?;
        let next = self.store.next(curr);
        self.current = (next != self.seed).then_some(next);
        Some(curr)
    }
}
