//! Program analysis infrastructure over three-address method bodies.
//!
//! This module contains the analytical core: control flow graph construction
//! and the analyses that layer on top of it.
//!
//! # Architecture
//!
//! The analysis module is organized into focused sub-modules:
//!
//! - [`cfg`] - Control flow graph construction, topological orderings,
//!   dominance information, and natural loop identification
//! - [`dataflow`] - Generic iterative dataflow framework with forward and
//!   backward solvers
//!
//! # Usage
//!
//! ```rust
//! use tacscope::{CfgBuilder, Instruction, MethodBody};
//!
//! let body = MethodBody::new(vec![
//!     Instruction::assignment("L0", "x", ["a"]),
//!     Instruction::ret("L1"),
//! ]);
//!
//! let mut cfg = CfgBuilder::build(&body)?;
//! cfg.compute_dominators();
//! assert!(cfg.dominates(cfg.entry(), cfg.exit()));
//! # Ok::<(), tacscope::Error>(())
//! ```

pub mod cfg;
pub mod dataflow;

pub use cfg::{
    CfgBuilder, CfgEdge, CfgLoop, CfgNode, CfgNodeKind, ControlFlowGraph, DominatorIterator,
    NodeId,
};
pub use dataflow::{
    AnalysisResults, DataFlowAnalysis, DataFlowSolver, DefinitionSite, LiveVariables,
    LivenessResult, MeetSemiLattice, ReachingDefinitions, ReachingDefsResult,
};
