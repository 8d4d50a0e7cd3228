//! Generic iterative dataflow analysis framework.
//!
//! This module provides the machinery for computing properties that propagate
//! along control flow edges. It is built around three abstractions:
//!
//! - **Lattice** ([`MeetSemiLattice`]) - the domain of abstract values with a
//!   meet operation used at control flow joins
//! - **Analysis** ([`DataFlowAnalysis`]) - boundary values, starting values,
//!   and the transfer function of a specific analysis
//! - **Solver** ([`DataFlowSolver`]) - the fixed-point iteration, with
//!   forward and backward entry points
//!
//! # Analyses Provided
//!
//! - [`ReachingDefinitions`] - which assignments may reach each program point
//! - [`LiveVariables`] - which variables may still be read at each program point
//!
//! # Example
//!
//! ```rust
//! use tacscope::{
//!     CfgBuilder, DataFlowSolver, Instruction, MethodBody, NodeId, ReachingDefinitions,
//! };
//!
//! let body = MethodBody::new(vec![
//!     Instruction::assignment("L0", "x", ["a"]),
//!     Instruction::conditional_branch("L1", "L3"),
//!     Instruction::assignment("L2", "x", ["b"]),
//!     Instruction::assignment("L3", "y", ["x"]),
//! ]);
//! let mut cfg = CfgBuilder::build(&body)?;
//!
//! let analysis = ReachingDefinitions::new(&cfg);
//! let results = DataFlowSolver::new(analysis).solve_forward(&mut cfg);
//! # Ok::<(), tacscope::Error>(())
//! ```

mod framework;
mod lattice;
mod liveness;
mod reaching;
mod solver;

pub use framework::{AnalysisResults, DataFlowAnalysis};
pub use lattice::MeetSemiLattice;
pub use liveness::{LiveVariables, LivenessResult};
pub use reaching::{DefinitionSite, ReachingDefinitions, ReachingDefsResult};
pub use solver::DataFlowSolver;
