//! Control flow graph container.
//!
//! This module provides the main [`ControlFlowGraph`] structure: an arena of
//! [`CfgNode`]s addressed by [`NodeId`], together with the query surface shared
//! by the analysis passes (dominator chains, dominance queries, loop access,
//! DOT output).

use std::fmt::Write;

use crate::analysis::cfg::{CfgLoop, CfgNode, CfgNodeKind, NodeId};

/// A control flow graph over three-address basic blocks.
///
/// Every graph has exactly one entry node (id 0) and one exit node (id 1),
/// present even when disconnected; basic blocks are numbered from 2 in
/// creation order. Nodes are never removed.
///
/// # Construction and Passes
///
/// Graphs are produced by [`CfgBuilder`](crate::CfgBuilder). The analysis
/// passes then fill in the per-node metadata slots:
///
/// 1. [`forward_order`](Self::forward_order) / [`backward_order`](Self::backward_order)
///    assign the topological indices (computed lazily by later passes).
/// 2. [`compute_dominators`](Self::compute_dominators) fills
///    `immediate_dominator`.
/// 3. [`compute_dominator_tree`](Self::compute_dominator_tree),
///    [`compute_dominance_frontiers`](Self::compute_dominance_frontiers), and
///    [`identify_loops`](Self::identify_loops) each consume the dominators.
///
/// The graph is not designed for mutation after construction; the cached
/// orderings assume a frozen edge set.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    nodes: Vec<CfgNode>,
    entry: NodeId,
    exit: NodeId,
    pub(crate) forward_order: Option<Vec<NodeId>>,
    pub(crate) backward_order: Option<Vec<NodeId>>,
    pub(crate) dominators_computed: bool,
    pub(crate) loops: Vec<CfgLoop>,
}

impl ControlFlowGraph {
    /// Creates a graph containing only the entry and exit nodes.
    pub(crate) fn new() -> Self {
        let entry = NodeId::ENTRY;
        let exit = NodeId::EXIT;
        Self {
            nodes: vec![
                CfgNode::new(entry, CfgNodeKind::Entry),
                CfgNode::new(exit, CfgNodeKind::Exit),
            ],
            entry,
            exit,
            forward_order: None,
            backward_order: None,
            dominators_computed: false,
            loops: Vec::new(),
        }
    }

    /// Adds a fresh basic block and returns its id.
    pub(crate) fn add_block(&mut self) -> NodeId {
        let id = NodeId::new(u32::try_from(self.nodes.len()).expect("node count exceeds u32"));
        self.nodes.push(CfgNode::new(id, CfgNodeKind::BasicBlock));
        id
    }

    /// Inserts the edge `source -> target`, updating both adjacency sets.
    ///
    /// Insertion is idempotent: a duplicate edge leaves the graph unchanged.
    pub(crate) fn connect(&mut self, source: NodeId, target: NodeId) {
        let succs = &mut self.nodes[source.index()].successors;
        if !succs.contains(&target) {
            succs.push(target);
        }
        let preds = &mut self.nodes[target.index()].predecessors;
        if !preds.contains(&source) {
            preds.push(source);
        }
    }

    /// Returns the entry node id.
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the exit node id.
    #[must_use]
    pub fn exit(&self) -> NodeId {
        self.exit
    }

    /// Returns the total number of nodes, including entry and exit.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &CfgNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut CfgNode {
        &mut self.nodes[id.index()]
    }

    /// Iterates over all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &CfgNode> {
        self.nodes.iter()
    }

    /// Iterates over all node ids in id order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId::new(i as u32))
    }

    /// Iterates over the basic block nodes in id order, skipping entry and exit.
    pub fn basic_blocks(&self) -> impl Iterator<Item = &CfgNode> {
        self.nodes
            .iter()
            .filter(|n| n.kind() == CfgNodeKind::BasicBlock)
    }

    /// Returns an iterator over the dominators of `node`: the node itself,
    /// then its immediate dominator chain up to (and including) the entry.
    ///
    /// The chain is materialised lazily from the `immediate_dominator` slots;
    /// before [`compute_dominators`](Self::compute_dominators) has run it
    /// consists of the node alone.
    #[must_use]
    pub fn dominators(&self, node: NodeId) -> DominatorIterator<'_> {
        DominatorIterator {
            graph: self,
            current: Some(node),
        }
    }

    /// Checks whether `a` dominates `b`.
    ///
    /// A node dominates itself. Requires
    /// [`compute_dominators`](Self::compute_dominators) to have run for
    /// non-trivial answers.
    #[must_use]
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.dominators(b).any(|d| d == a)
    }

    /// Checks whether `a` strictly dominates `b` (dominates and `a != b`).
    #[must_use]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns the natural loops found by
    /// [`identify_loops`](Self::identify_loops).
    ///
    /// One loop per back edge; multiple back edges to the same header yield
    /// distinct loops.
    #[must_use]
    pub fn loops(&self) -> &[CfgLoop] {
        &self.loops
    }

    /// Generates a DOT format representation of this control flow graph.
    ///
    /// The generated DOT can be rendered using Graphviz tools like `dot`.
    /// The entry node is highlighted in green, the exit node in red.
    ///
    /// # Arguments
    ///
    /// * `title` - Optional title for the graph (e.g., method name)
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"CFG: {}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n\n");

        for node in &self.nodes {
            let mut label = match node.kind() {
                CfgNodeKind::Entry => "entry".to_string(),
                CfgNodeKind::Exit => "exit".to_string(),
                CfgNodeKind::BasicBlock => format!("{}", node.id()),
            };
            label.push_str("\\l");
            for instr in node.instructions() {
                let _ = write!(label, "{}", escape_dot(&instr.to_string()));
                label.push_str("\\l");
            }

            let style = match node.kind() {
                CfgNodeKind::Entry => ", style=filled, fillcolor=lightgreen",
                CfgNodeKind::Exit => ", style=filled, fillcolor=lightcoral",
                CfgNodeKind::BasicBlock => "",
            };

            let _ = writeln!(dot, "    {} [label=\"{label}\"{style}];", node.id());
        }

        dot.push('\n');
        for node in &self.nodes {
            for &succ in node.successors() {
                let _ = writeln!(dot, "    {} -> {};", node.id(), succ);
            }
        }

        dot.push_str("}\n");
        dot
    }
}

/// Escapes a string for embedding in a DOT label.
fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Iterator over the dominators of a node, from the node up to the entry.
pub struct DominatorIterator<'a> {
    graph: &'a ControlFlowGraph,
    current: Option<NodeId>,
}

impl Iterator for DominatorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = if current == self.graph.entry() {
            None
        } else {
            self.graph.node(current).immediate_dominator()
        };
        Some(current)
    }
}
