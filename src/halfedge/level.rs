//! Node degree-of-freedom classification and refinement levels,
//! the bookkeeping adaptive refinement reads and writes.

use super::{AttributeData, HalfEdgeMesh};

/// Name of the node attribute holding [`NodeDof`] codes.
pub const DOF: &str = "dof";
/// Name of the node, cell and half-edge attributes holding refinement levels.
pub const LEVEL: &str = "level";

/// How a node may move when the mesh is smoothed or refined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeDof {
    /// The node must stay where it is.
    Fixed = 0,
    /// The node may only move along the mesh boundary.
    Boundary = 1,
    /// The node may move freely.
    Interior = 2,
}

impl NodeDof {
    /// The integer code stored in the `"dof"` node attribute.
    #[inline]
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Interpret a code from the `"dof"` node attribute.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(NodeDof::Fixed),
            1 => Some(NodeDof::Boundary),
            2 => Some(NodeDof::Interior),
            _ => None,
        }
    }
}

impl HalfEdgeMesh {
    /// (Re)create the `"dof"` and `"level"` attributes
    /// to match the current topology.
    ///
    /// Nodes are classified as in [`node_dofs`][Self::node_dofs].
    /// All levels start at 0.
    pub(super) fn init_level_info(&mut self, fixed: &[usize]) {
        let dof = self.node_dofs(fixed);
        self.node_data.insert_unchecked(DOF, dof);
        self.node_data
            .insert_unchecked(LEVEL, vec![0_i64; self.node_count()]);
        self.cell_data
            .insert_unchecked(LEVEL, vec![0_i64; self.cell_count()]);
        self.halfedge_data
            .insert_unchecked(LEVEL, vec![0_i64; self.store.halfedge_count()]);
    }

    /// [`NodeDof`] codes for every node.
    ///
    /// Nodes on the boundary are classified as [`NodeDof::Boundary`]
    /// and the rest as [`NodeDof::Interior`],
    /// except that nodes in `fixed` get [`NodeDof::Fixed`].
    fn node_dofs(&self, fixed: &[usize]) -> Vec<i64> {
        let boundary = self.store.boundary_nodes();
        let node_count = self.node_count();
        let mut dof: Vec<i64> = (0..node_count)
            .map(|node| {
                if boundary.contains(node) {
                    NodeDof::Boundary.code()
                } else {
                    NodeDof::Interior.code()
                }
            })
            .collect();
        for &node in fixed.iter().filter(|&&n| n < node_count) {
            dof[node] = NodeDof::Fixed.code();
        }
        dof
    }

    /// Indices of the nodes currently marked [`NodeDof::Fixed`].
    pub(super) fn fixed_nodes(&self) -> Vec<usize> {
        self.node_data
            .get(DOF)
            .and_then(AttributeData::as_integer)
            .map(|codes| {
                codes
                    .iter()
                    .enumerate()
                    .filter(|(_, code)| **code == NodeDof::Fixed.code())
                    .map(|(node, _)| node)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The degree-of-freedom classification of a node.
    ///
    /// Returns None if the `"dof"` attribute was removed or replaced
    /// with something that isn't a valid classification.
    pub fn node_dof(&self, node: usize) -> Option<NodeDof> {
        let codes = self.node_data.get(DOF)?.as_integer()?;
        NodeDof::from_code(*codes.get(node)?)
    }

    /// Mark nodes as [`NodeDof::Fixed`].
    ///
    /// Fixed nodes stay fixed through [`reinit`][Self::reinit]
    /// as long as their index still exists.
    /// If the `"dof"` attribute was removed or replaced with a non-integer array,
    /// it is recreated with the default classification first.
    /// Levels are left as they are.
    pub fn fix_nodes(&mut self, nodes: impl IntoIterator<Item = usize>) {
        let node_count = self.node_count();
        let mut fixed = self.fixed_nodes();
        fixed.extend(nodes.into_iter().filter(|&n| n < node_count));
        match self.node_data.integer_mut(DOF) {
            Some(codes) => {
                for node in fixed {
                    codes[node] = NodeDof::Fixed.code();
                }
            }
            None => {
                let dof = self.node_dofs(&fixed);
                self.node_data.insert_unchecked(DOF, dof);
            }
        }
    }

    /// The refinement level of a cell.
    pub fn cell_level(&self, cell: usize) -> Option<i64> {
        self.cell_data.get(LEVEL)?.as_integer()?.get(cell).copied()
    }

    /// The refinement level of a node.
    pub fn node_level(&self, node: usize) -> Option<i64> {
        self.node_data.get(LEVEL)?.as_integer()?.get(node).copied()
    }
}
