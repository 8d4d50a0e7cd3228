// Copyright 2025-2026 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! `tacscope` is a program analysis library for bytecode lifted to three-address code.
//!
//! The crate provides the analytical core that downstream analyses build on:
//! control flow graph construction from a linear instruction sequence, dominance
//! information (immediate dominators, dominator tree, dominance frontiers),
//! natural loop identification, and a generic iterative dataflow engine in
//! forward and backward variants.
//!
//! # Architecture
//!
//! The crate is organized into two layers:
//!
//! - [`model`] - The instruction and type models consumed from the lifter and
//!   the metadata extractor. The core only inspects instruction labels and kind
//!   discriminants; operands and type references pass through untouched.
//! - [`analysis`] - The analytical core: [`ControlFlowGraph`] with its passes,
//!   and the [`analysis::dataflow`] framework.
//!
//! # Pass Ordering
//!
//! Analyses layer on top of each other: the builder produces the graph, the
//! topological orderings number it, dominator analysis consumes the forward
//! ordering, and the dominator tree, dominance frontiers, and loop passes
//! consume the dominators. Each pass computes its prerequisites lazily, so
//! callers may simply invoke the pass they need:
//!
//! ```rust
//! use tacscope::{CfgBuilder, Instruction, MethodBody};
//!
//! let body = MethodBody::new(vec![
//!     Instruction::assignment("L0", "x", ["a"]),
//!     Instruction::conditional_branch("L1", "L3"),
//!     Instruction::assignment("L2", "y", ["x"]),
//!     Instruction::assignment("L3", "z", ["x"]),
//! ]);
//!
//! let mut cfg = CfgBuilder::build(&body)?;
//! cfg.compute_dominators();
//! cfg.compute_dominance_frontiers();
//! cfg.identify_loops();
//!
//! assert!(cfg.loops().is_empty());
//! # Ok::<(), tacscope::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! The core is single-threaded and synchronous. A [`ControlFlowGraph`] is
//! [`Send`], so independent methods can be analyzed on separate threads, but a
//! single graph must not be shared across threads while passes mutate it.

pub mod analysis;
pub mod model;

mod error;

/// `tacscope` Error type.
///
/// The main error type for all operations in this crate. See [`error::Error`]
/// for the full taxonomy.
pub use error::Error;

/// Convenience `Result` alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

pub use analysis::{
    AnalysisResults, CfgBuilder, CfgEdge, CfgLoop, CfgNode, CfgNodeKind, ControlFlowGraph,
    DataFlowAnalysis, DataFlowSolver, DefinitionSite, LiveVariables, LivenessResult,
    MeetSemiLattice, NodeId, ReachingDefinitions, ReachingDefsResult,
};
pub use model::{
    ClassDef, EnumDef, FieldDef, Instruction, InstructionKind, InterfaceDef, MethodBody,
    MethodDef, Parameter, StructDef, TacType, TypeDefinition, TypeRegistry,
};
