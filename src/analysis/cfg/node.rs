//! Node identifier and node representation for control flow graphs.
//!
//! Nodes live in an arena owned by the graph and reference each other through
//! [`NodeId`] indices, which keeps the bidirectional predecessor/successor
//! relationships free of ownership cycles.

use std::fmt;

use crate::model::Instruction;

/// A strongly-typed identifier for nodes within a control flow graph.
///
/// `NodeId` wraps a `u32` index assigned at node creation: the entry node is
/// always id 0, the exit node id 1, and basic blocks are numbered from 2 in
/// creation order. The id doubles as the index into per-node result arrays
/// such as dataflow states.
///
/// # Thread Safety
///
/// `NodeId` is [`Copy`], [`Send`], and [`Sync`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The entry node id of every graph.
    pub const ENTRY: NodeId = NodeId(0);

    /// The exit node id of every graph.
    pub const EXIT: NodeId = NodeId(1);

    /// Creates a `NodeId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Returns the raw index, usable to address per-node result arrays.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Classification of control flow graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfgNodeKind {
    /// The unique synthetic entry node. Holds no instructions.
    Entry,
    /// The unique synthetic exit node. Holds no instructions.
    Exit,
    /// A basic block holding a maximal straight-line instruction sequence.
    BasicBlock,
}

/// A node in a control flow graph.
///
/// Besides its adjacency, every node carries slots for the metadata the
/// analysis passes fill in: topological indices, the immediate dominator,
/// dominator tree children, and the dominance frontier. The slots start out
/// empty (`-1` for indices, `None`/empty for the rest) and are only
/// meaningful after the corresponding pass has run.
///
/// Predecessor and successor sets are deduplicated and iterate in insertion
/// order, which keeps traversals deterministic without requiring callers to
/// sort.
#[derive(Debug, Clone)]
pub struct CfgNode {
    id: NodeId,
    kind: CfgNodeKind,
    pub(crate) predecessors: Vec<NodeId>,
    pub(crate) successors: Vec<NodeId>,
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) forward_index: i32,
    pub(crate) backward_index: i32,
    pub(crate) immediate_dominator: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) dominance_frontier: Vec<NodeId>,
}

impl CfgNode {
    pub(crate) fn new(id: NodeId, kind: CfgNodeKind) -> Self {
        Self {
            id,
            kind,
            predecessors: Vec::new(),
            successors: Vec::new(),
            instructions: Vec::new(),
            forward_index: -1,
            backward_index: -1,
            immediate_dominator: None,
            children: Vec::new(),
            dominance_frontier: Vec::new(),
        }
    }

    /// Returns this node's id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns this node's kind.
    #[must_use]
    pub fn kind(&self) -> CfgNodeKind {
        self.kind
    }

    /// Returns the predecessor set in insertion order.
    #[must_use]
    pub fn predecessors(&self) -> &[NodeId] {
        &self.predecessors
    }

    /// Returns the successor set in insertion order.
    #[must_use]
    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }

    /// Returns the instructions of this block in program order.
    ///
    /// Entry and exit nodes hold no instructions.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns this node's position in the forward topological ordering,
    /// or `-1` if the ordering has not been computed or the node is not
    /// reachable from the entry.
    #[must_use]
    pub fn forward_index(&self) -> i32 {
        self.forward_index
    }

    /// Returns this node's position in the backward topological ordering,
    /// or `-1` if the ordering has not been computed or the node cannot
    /// reach the exit.
    #[must_use]
    pub fn backward_index(&self) -> i32 {
        self.backward_index
    }

    /// Returns the immediate dominator computed by
    /// [`compute_dominators`](crate::ControlFlowGraph::compute_dominators),
    /// or `None` for the entry node and unreachable nodes.
    #[must_use]
    pub fn immediate_dominator(&self) -> Option<NodeId> {
        self.immediate_dominator
    }

    /// Returns this node's children in the dominator tree.
    ///
    /// Empty until
    /// [`compute_dominator_tree`](crate::ControlFlowGraph::compute_dominator_tree)
    /// has run.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns this node's dominance frontier.
    ///
    /// Empty until
    /// [`compute_dominance_frontiers`](crate::ControlFlowGraph::compute_dominance_frontiers)
    /// has run.
    #[must_use]
    pub fn dominance_frontier(&self) -> &[NodeId] {
        &self.dominance_frontier
    }
}
