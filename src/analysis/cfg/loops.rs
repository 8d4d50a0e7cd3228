//! Natural loop identification via dominance-based back edge detection.
//!
//! An edge `(u, v)` is a back edge when `v` dominates `u` (self-loops
//! included). Every back edge `(s, h)` induces one natural loop: the smallest
//! node set containing the header `h` and the source `s` that is closed under
//! predecessor traversal up to, but not past, the header.
//!
//! Multiple back edges into the same header yield distinct loops; callers
//! that want a merged view must union the bodies themselves.

use crate::analysis::cfg::{CfgEdge, ControlFlowGraph, NodeId};

/// A natural loop induced by a single back edge.
///
/// # Examples
///
/// ```rust
/// use tacscope::{CfgBuilder, Instruction, MethodBody};
///
/// let body = MethodBody::new(vec![
///     Instruction::assignment("L0", "i", ["i"]),
///     Instruction::conditional_branch("L1", "L3"),
///     Instruction::unconditional_branch("L2", "L0"),
///     Instruction::assignment("L3", "r", ["i"]),
/// ]);
///
/// let mut cfg = CfgBuilder::build(&body)?;
/// cfg.identify_loops();
///
/// let looped = &cfg.loops()[0];
/// assert!(looped.contains(looped.header()));
/// # Ok::<(), tacscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgLoop {
    header: NodeId,
    back_edge: CfgEdge,
    body: Vec<NodeId>,
}

impl CfgLoop {
    /// Returns the loop header (the back edge target).
    #[must_use]
    pub fn header(&self) -> NodeId {
        self.header
    }

    /// Returns the back edge that induced this loop.
    #[must_use]
    pub fn back_edge(&self) -> CfgEdge {
        self.back_edge
    }

    /// Returns the loop body in ascending id order. Always contains the header.
    #[must_use]
    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    /// Returns `true` if `node` belongs to this loop's body.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.body.binary_search(&node).is_ok()
    }

    /// Returns the number of nodes in the loop body, including the header.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns `false`: a loop body always contains at least its header.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl ControlFlowGraph {
    /// Returns all back edges of the graph, in source id order.
    ///
    /// Computes the dominators lazily if needed.
    pub fn back_edges(&mut self) -> Vec<CfgEdge> {
        if !self.dominators_computed {
            self.compute_dominators();
        }

        let mut edges = Vec::new();
        for id in 0..self.node_count() {
            let source = NodeId::new(id as u32);
            for &target in self.node(source).successors() {
                if self.dominates(target, source) {
                    edges.push(CfgEdge::new(source, target));
                }
            }
        }
        edges
    }

    /// Identifies the natural loops of the graph and stores them on it.
    ///
    /// One [`CfgLoop`] is produced per back edge; the result is available
    /// through [`loops`](Self::loops), ordered by header id and then back
    /// edge source id. Computes the dominators lazily if needed.
    pub fn identify_loops(&mut self) {
        let back_edges = self.back_edges();

        let mut loops: Vec<CfgLoop> = back_edges
            .into_iter()
            .map(|edge| self.natural_loop(edge))
            .collect();
        loops.sort_by_key(|l| (l.header(), l.back_edge().source));

        self.loops = loops;
    }

    /// Computes the natural loop of the back edge `(s, h)`.
    ///
    /// Worklist expansion: starting from the source, predecessors are added
    /// until the traversal is stopped by the header.
    fn natural_loop(&self, back_edge: CfgEdge) -> CfgLoop {
        let header = back_edge.target;
        let mut body = vec![header];
        let mut worklist = vec![back_edge.source];

        while let Some(node) = worklist.pop() {
            if body.contains(&node) {
                continue;
            }
            body.push(node);
            for &pred in self.node(node).predecessors() {
                // Unreachable predecessors can branch into the body but are
                // not dominated by the header, so they stay outside the loop.
                if self.node(pred).forward_index() < 0 {
                    continue;
                }
                if !body.contains(&pred) {
                    worklist.push(pred);
                }
            }
        }

        body.sort_unstable();
        CfgLoop {
            header,
            back_edge,
            body,
        }
    }
}
