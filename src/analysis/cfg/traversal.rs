//! Forward and backward topological orderings.
//!
//! Both orderings are reverse post-orders computed by an iterative
//! depth-first search with an explicit two-state stack: the forward ordering
//! starts at the entry and follows successors, the backward ordering starts
//! at the exit and follows predecessors. Each ordering is cached on the graph
//! and assigns the corresponding per-node index (`forward_index` /
//! `backward_index`); nodes outside the ordering keep `-1`.
//!
//! Reverse post-order guarantees that for every non-back edge `(u, v)` the
//! source is numbered before the target, which is what the iterative
//! dominator computation and the forward dataflow engine rely on.

use crate::analysis::cfg::{ControlFlowGraph, NodeId};

/// Traversal direction for the shared DFS.
#[derive(Clone, Copy)]
enum Direction {
    Successors,
    Predecessors,
}

impl ControlFlowGraph {
    /// Returns the forward reverse-post-order, computing and caching it on
    /// first use.
    ///
    /// The entry node sits at index 0. Only nodes reachable from the entry
    /// appear; their `forward_index` reflects the position in the returned
    /// slice, all other nodes keep `-1`.
    pub fn forward_order(&mut self) -> &[NodeId] {
        if self.forward_order.is_none() {
            let order = self.reverse_post_order(self.entry(), Direction::Successors);
            for (position, &id) in order.iter().enumerate() {
                self.node_mut(id).forward_index =
                    i32::try_from(position).expect("ordering position exceeds i32");
            }
            self.forward_order = Some(order);
        }
        self.forward_order.as_deref().expect("just computed")
    }

    /// Returns the backward reverse-post-order over the predecessor graph,
    /// computing and caching it on first use.
    ///
    /// The exit node sits at index 0. Only nodes that reach the exit appear;
    /// their `backward_index` reflects the position in the returned slice,
    /// all other nodes keep `-1`.
    pub fn backward_order(&mut self) -> &[NodeId] {
        if self.backward_order.is_none() {
            let order = self.reverse_post_order(self.exit(), Direction::Predecessors);
            for (position, &id) in order.iter().enumerate() {
                self.node_mut(id).backward_index =
                    i32::try_from(position).expect("ordering position exceeds i32");
            }
            self.backward_order = Some(order);
        }
        self.backward_order.as_deref().expect("just computed")
    }

    /// Iterative post-order DFS, reversed.
    ///
    /// A node is pushed twice: once to expand its unvisited neighbours and a
    /// second time, after all descendants are finalised, to take the next
    /// post-order slot.
    fn reverse_post_order(&self, start: NodeId, direction: Direction) -> Vec<NodeId> {
        let mut visited = vec![false; self.node_count()];
        let mut postorder = Vec::with_capacity(self.node_count());
        let mut stack = vec![(start, false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                postorder.push(node);
                continue;
            }
            if visited[node.index()] {
                continue;
            }
            visited[node.index()] = true;
            stack.push((node, true));

            let neighbours = match direction {
                Direction::Successors => self.node(node).successors(),
                Direction::Predecessors => self.node(node).predecessors(),
            };
            // Reverse push order so neighbours are expanded in set order.
            for &next in neighbours.iter().rev() {
                if !visited[next.index()] {
                    stack.push((next, false));
                }
            }
        }

        postorder.reverse();
        postorder
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        analysis::cfg::{CfgBuilder, NodeId},
        model::{Instruction, MethodBody},
    };

    fn build(instructions: Vec<Instruction>) -> crate::ControlFlowGraph {
        CfgBuilder::build(&MethodBody::new(instructions)).expect("build should succeed")
    }

    #[test]
    fn test_forward_order_of_straight_line() {
        let mut cfg = build(vec![
            Instruction::assignment("L0", "a", ["x"]),
            Instruction::ret("L1"),
        ]);

        let order = cfg.forward_order().to_vec();
        assert_eq!(order, vec![cfg.entry(), NodeId::new(2), cfg.exit()]);
        assert_eq!(cfg.node(cfg.entry()).forward_index(), 0);
        assert_eq!(cfg.node(NodeId::new(2)).forward_index(), 1);
        assert_eq!(cfg.node(cfg.exit()).forward_index(), 2);
    }

    #[test]
    fn test_forward_order_respects_edges_in_diamond() {
        let mut cfg = build(vec![
            Instruction::assignment("a", "x", ["p"]),
            Instruction::conditional_branch("b", "d"),
            Instruction::assignment("c", "y", ["x"]),
            Instruction::assignment("d", "z", ["x"]),
        ]);

        cfg.forward_order();
        // For every non-back edge (u, v): forward_index(u) < forward_index(v).
        for node in cfg.nodes() {
            for &succ in node.successors() {
                assert!(
                    node.forward_index() < cfg.node(succ).forward_index(),
                    "edge {} -> {} violates reverse post-order",
                    node.id(),
                    succ
                );
            }
        }
    }

    #[test]
    fn test_backward_order_starts_at_exit() {
        let mut cfg = build(vec![
            Instruction::assignment("L0", "a", ["x"]),
            Instruction::ret("L1"),
        ]);

        let order = cfg.backward_order().to_vec();
        assert_eq!(order[0], cfg.exit());
        assert_eq!(cfg.node(cfg.exit()).backward_index(), 0);
        assert_eq!(cfg.node(cfg.entry()).backward_index(), 2);
    }

    #[test]
    fn test_unreachable_block_is_excluded_from_forward_order() {
        let mut cfg = build(vec![
            Instruction::assignment("L0", "x", ["a"]),
            Instruction::unconditional_branch("L1", "L3"),
            Instruction::assignment("L2", "dead", ["x"]),
            Instruction::assignment("L3", "y", ["x"]),
        ]);

        let dead = NodeId::new(4);
        let order = cfg.forward_order().to_vec();
        assert!(!order.contains(&dead));
        assert_eq!(cfg.node(dead).forward_index(), -1);
        // Reachable nodes are contiguous from index 0.
        for (position, &id) in order.iter().enumerate() {
            assert_eq!(cfg.node(id).forward_index() as usize, position);
        }
    }

    #[test]
    fn test_orders_are_cached() {
        let mut cfg = build(vec![
            Instruction::assignment("L0", "a", ["x"]),
            Instruction::ret("L1"),
        ]);

        let first = cfg.forward_order().to_vec();
        let second = cfg.forward_order().to_vec();
        assert_eq!(first, second);
    }
}
