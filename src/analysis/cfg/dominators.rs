//! Dominance information: immediate dominators, dominator tree, dominance
//! frontiers.
//!
//! Immediate dominators are computed with the iterative Cooper-Harvey-Kennedy
//! algorithm over the forward reverse-post-order: each node's dominator is
//! repeatedly intersected with the dominators of its processed predecessors
//! until a whole pass makes no change. The dominator tree and the Cytron et
//! al. dominance frontiers derive from the immediate dominators.
//!
//! All passes are idempotent: they reset the metadata they own before
//! recomputing it, and each computes its prerequisites lazily.
//!
//! # Examples
//!
//! ```rust
//! use tacscope::{CfgBuilder, Instruction, MethodBody, NodeId};
//!
//! let body = MethodBody::new(vec![
//!     Instruction::assignment("a", "x", ["p"]),
//!     Instruction::conditional_branch("b", "d"),
//!     Instruction::assignment("c", "y", ["x"]),
//!     Instruction::assignment("d", "z", ["x"]),
//! ]);
//!
//! let mut cfg = CfgBuilder::build(&body)?;
//! cfg.compute_dominators();
//!
//! // The merge block is immediately dominated by the branch block.
//! let branch = NodeId::new(2);
//! let merge = NodeId::new(3);
//! assert_eq!(cfg.node(merge).immediate_dominator(), Some(branch));
//! # Ok::<(), tacscope::Error>(())
//! ```

use crate::analysis::cfg::{ControlFlowGraph, NodeId};

impl ControlFlowGraph {
    /// Computes the immediate dominator of every node reachable from the entry.
    ///
    /// On completion `immediate_dominator` is set for every reachable node
    /// except the entry (whose slot is reset to `None`); unreachable nodes
    /// keep `None`. The forward ordering is computed lazily if missing.
    ///
    /// Running the pass twice yields identical results.
    pub fn compute_dominators(&mut self) {
        let order = self.forward_order().to_vec();
        debug_assert_eq!(order.first(), Some(&self.entry()));

        for id in 0..self.node_count() {
            self.node_mut(NodeId::new(id as u32)).immediate_dominator = None;
        }

        // The entry temporarily dominates itself so that intersection chains
        // terminate there.
        let entry = self.entry();
        self.node_mut(entry).immediate_dominator = Some(entry);

        let mut changed = true;
        while changed {
            changed = false;

            for &node in order.iter().skip(1) {
                let predecessors = self.node(node).predecessors().to_vec();

                let mut new_idom: Option<NodeId> = None;
                for &pred in &predecessors {
                    if self.node(pred).immediate_dominator().is_none() {
                        continue;
                    }
                    new_idom = Some(match new_idom {
                        None => pred,
                        Some(current) => self.intersect(pred, current),
                    });
                }

                let new_idom =
                    new_idom.expect("reachable node has no predecessor with a known dominator");
                if self.node(node).immediate_dominator() != Some(new_idom) {
                    self.node_mut(node).immediate_dominator = Some(new_idom);
                    changed = true;
                }
            }
        }

        self.node_mut(entry).immediate_dominator = None;
        self.dominators_computed = true;
    }

    /// Walks the two candidates up their immediate dominator chains until
    /// they meet, returning the common ancestor.
    ///
    /// The node with the higher forward index is always the one advanced,
    /// so both fingers converge toward the entry.
    fn intersect(&self, a: NodeId, b: NodeId) -> NodeId {
        let mut finger_a = a;
        let mut finger_b = b;

        while finger_a != finger_b {
            while self.node(finger_a).forward_index() > self.node(finger_b).forward_index() {
                finger_a = self
                    .node(finger_a)
                    .immediate_dominator()
                    .expect("missing immediate dominator during intersection");
            }
            while self.node(finger_b).forward_index() > self.node(finger_a).forward_index() {
                finger_b = self
                    .node(finger_b)
                    .immediate_dominator()
                    .expect("missing immediate dominator during intersection");
            }
        }

        finger_a
    }

    /// Materialises the dominator tree into the per-node `children` sets.
    ///
    /// Every node with a known immediate dominator becomes a child of that
    /// dominator. Existing children are cleared first, so the pass is safe to
    /// re-run. Computes the dominators lazily if needed.
    pub fn compute_dominator_tree(&mut self) {
        if !self.dominators_computed {
            self.compute_dominators();
        }

        for id in 0..self.node_count() {
            self.node_mut(NodeId::new(id as u32)).children.clear();
        }

        for id in 0..self.node_count() {
            let node = NodeId::new(id as u32);
            if let Some(idom) = self.node(node).immediate_dominator() {
                let children = &mut self.node_mut(idom).children;
                if !children.contains(&node) {
                    children.push(node);
                }
            }
        }
    }

    /// Computes the dominance frontier of every node (Cytron et al.).
    ///
    /// For each join point (a node with two or more predecessors), each
    /// predecessor's dominator chain is walked up to, but not including, the
    /// join point's immediate dominator; every node on the walk gains the
    /// join point in its frontier. Existing frontiers are cleared first, so
    /// the pass is safe to re-run. Computes the dominators lazily if needed.
    pub fn compute_dominance_frontiers(&mut self) {
        if !self.dominators_computed {
            self.compute_dominators();
        }

        for id in 0..self.node_count() {
            self.node_mut(NodeId::new(id as u32)).dominance_frontier.clear();
        }

        for id in 0..self.node_count() {
            let node = NodeId::new(id as u32);
            let predecessors = self.node(node).predecessors().to_vec();
            if predecessors.len() < 2 {
                continue;
            }
            let Some(idom) = self.node(node).immediate_dominator() else {
                continue;
            };

            for &pred in &predecessors {
                if self.node(pred).forward_index() < 0 {
                    continue;
                }
                let mut runner = pred;
                while runner != idom {
                    let frontier = &mut self.node_mut(runner).dominance_frontier;
                    if !frontier.contains(&node) {
                        frontier.push(node);
                    }
                    runner = self
                        .node(runner)
                        .immediate_dominator()
                        .expect("dominator chain ended before the join point's dominator");
                }
            }
        }
    }
}
