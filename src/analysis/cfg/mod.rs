//! Control flow graph construction and analysis.
//!
//! This module provides the graph abstraction over three-address basic blocks
//! together with the passes that annotate it: topological orderings, dominance
//! information, and natural loop identification.
//!
//! # Key Components
//!
//! - [`ControlFlowGraph`] - The arena-based graph container
//! - [`CfgBuilder`] - Two-pass construction from a method body
//! - [`CfgNode`] / [`CfgNodeKind`] - Nodes with slots for analysis metadata
//! - [`CfgEdge`] - Edge value type used in back edge sets
//! - [`CfgLoop`] - A natural loop induced by a single back edge
//!
//! # Pass Layering
//!
//! Passes depend on one another in a fixed order: the builder produces the
//! graph, [`forward_order`](ControlFlowGraph::forward_order) numbers it,
//! [`compute_dominators`](ControlFlowGraph::compute_dominators) consumes the
//! numbering, and the dominator tree, dominance frontier, and loop passes
//! consume the dominators. Each pass computes missing prerequisites lazily, so
//! any entry point can be called directly after the build.
//!
//! # Examples
//!
//! ```rust
//! use tacscope::{CfgBuilder, Instruction, MethodBody};
//!
//! let body = MethodBody::new(vec![
//!     Instruction::assignment("L0", "i", ["i"]),
//!     Instruction::conditional_branch("L1", "L3"),
//!     Instruction::unconditional_branch("L2", "L0"),
//!     Instruction::assignment("L3", "r", ["i"]),
//! ]);
//!
//! let mut cfg = CfgBuilder::build(&body)?;
//! cfg.identify_loops();
//!
//! assert_eq!(cfg.loops().len(), 1);
//! # Ok::<(), tacscope::Error>(())
//! ```

mod builder;
mod dominators;
mod edge;
mod graph;
mod loops;
mod node;
mod traversal;

pub use builder::CfgBuilder;
pub use edge::CfgEdge;
pub use graph::{ControlFlowGraph, DominatorIterator};
pub use loops::CfgLoop;
pub use node::{CfgNode, CfgNodeKind, NodeId};
