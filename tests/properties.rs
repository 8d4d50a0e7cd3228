//! Property-based tests over randomly generated method bodies.
//!
//! Each property encodes a universal invariant of the analytical core: graph
//! well-formedness, reverse post-order numbering, dominance, frontier and
//! loop correctness, and dataflow fixed-point behaviour.

use proptest::prelude::*;
use tacscope::{
    CfgBuilder, ControlFlowGraph, DataFlowAnalysis, DataFlowSolver, Instruction, LiveVariables,
    MeetSemiLattice, MethodBody, NodeId, ReachingDefinitions,
};

/// The control flow shape of one generated instruction; targets are indices
/// into the body so every branch stays well-formed.
#[derive(Debug, Clone)]
enum Shape {
    Assign(u8, u8),
    Cond(usize),
    Uncond(usize),
    Ret,
    Try,
    Other,
}

fn variable(index: u8) -> String {
    format!("v{}", index % 6)
}

fn materialize(shapes: Vec<Shape>) -> MethodBody {
    let instructions = shapes
        .into_iter()
        .enumerate()
        .map(|(i, shape)| {
            let label = format!("L{i}");
            match shape {
                Shape::Assign(result, operand) => {
                    Instruction::assignment(label, variable(result), [variable(operand)])
                }
                Shape::Cond(target) => Instruction::conditional_branch(label, format!("L{target}")),
                Shape::Uncond(target) => {
                    Instruction::unconditional_branch(label, format!("L{target}"))
                }
                Shape::Ret => Instruction::ret(label),
                Shape::Try => Instruction::new(label, tacscope::InstructionKind::Try),
                Shape::Other => Instruction::other(label),
            }
        })
        .collect();
    MethodBody::new(instructions)
}

fn arb_body() -> impl Strategy<Value = MethodBody> {
    (1usize..32).prop_flat_map(|len| {
        let shape = prop_oneof![
            5 => (any::<u8>(), any::<u8>()).prop_map(|(r, o)| Shape::Assign(r, o)),
            3 => (0..len).prop_map(Shape::Cond),
            2 => (0..len).prop_map(Shape::Uncond),
            1 => Just(Shape::Ret),
            1 => Just(Shape::Try),
            1 => Just(Shape::Other),
        ];
        proptest::collection::vec(shape, len).prop_map(materialize)
    })
}

fn reachable(cfg: &ControlFlowGraph, node: NodeId) -> bool {
    cfg.node(node).forward_index() >= 0
}

proptest! {
    #[test]
    fn edge_symmetry(body in arb_body()) {
        let cfg = CfgBuilder::build(&body).unwrap();
        for u in cfg.node_ids() {
            for &v in cfg.node(u).successors() {
                prop_assert!(cfg.node(v).predecessors().contains(&u));
            }
            for &p in cfg.node(u).predecessors() {
                prop_assert!(cfg.node(p).successors().contains(&u));
            }
        }
    }

    #[test]
    fn entry_and_exit_are_unique_boundaries(body in arb_body()) {
        let cfg = CfgBuilder::build(&body).unwrap();
        let entries = cfg
            .nodes()
            .filter(|n| n.kind() == tacscope::CfgNodeKind::Entry)
            .count();
        let exits = cfg
            .nodes()
            .filter(|n| n.kind() == tacscope::CfgNodeKind::Exit)
            .count();
        prop_assert_eq!(entries, 1);
        prop_assert_eq!(exits, 1);
        prop_assert!(cfg.node(cfg.entry()).predecessors().is_empty());
        prop_assert!(cfg.node(cfg.exit()).successors().is_empty());
        prop_assert!(cfg.node(cfg.entry()).instructions().is_empty());
        prop_assert!(cfg.node(cfg.exit()).instructions().is_empty());
    }

    #[test]
    fn reverse_post_order_numbers_non_back_edges(body in arb_body()) {
        let mut cfg = CfgBuilder::build(&body).unwrap();
        cfg.compute_dominators();
        for u in cfg.node_ids() {
            if !reachable(&cfg, u) {
                continue;
            }
            for &v in cfg.node(u).successors() {
                if cfg.dominates(v, u) {
                    continue; // back edge
                }
                prop_assert!(
                    cfg.node(u).forward_index() < cfg.node(v).forward_index(),
                    "edge {} -> {} violates reverse post-order", u, v
                );
            }
        }
    }

    #[test]
    fn forward_order_is_contiguous_from_entry(body in arb_body()) {
        let mut cfg = CfgBuilder::build(&body).unwrap();
        let order = cfg.forward_order().to_vec();
        prop_assert_eq!(order[0], cfg.entry());
        for (position, &id) in order.iter().enumerate() {
            prop_assert_eq!(cfg.node(id).forward_index(), i32::try_from(position).unwrap());
        }
    }

    #[test]
    fn dominator_analysis_is_idempotent(body in arb_body()) {
        let mut cfg = CfgBuilder::build(&body).unwrap();
        cfg.compute_dominators();
        let first: Vec<_> = cfg.nodes().map(|n| n.immediate_dominator()).collect();
        cfg.compute_dominators();
        let second: Vec<_> = cfg.nodes().map(|n| n.immediate_dominator()).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn dominator_chains_end_at_entry(body in arb_body()) {
        let mut cfg = CfgBuilder::build(&body).unwrap();
        cfg.compute_dominators();
        for id in cfg.node_ids() {
            if !reachable(&cfg, id) {
                continue;
            }
            let chain: Vec<NodeId> = cfg.dominators(id).collect();
            prop_assert_eq!(*chain.first().unwrap(), id);
            prop_assert_eq!(*chain.last().unwrap(), cfg.entry());
        }
    }

    #[test]
    fn frontier_matches_the_quadratic_definition(body in arb_body()) {
        let mut cfg = CfgBuilder::build(&body).unwrap();
        cfg.compute_dominance_frontiers();

        // v is in DF(u) iff u dominates a predecessor of v but does not
        // strictly dominate v, over the entry-reachable subgraph.
        for u in cfg.node_ids() {
            if !reachable(&cfg, u) {
                continue;
            }
            for v in cfg.node_ids() {
                if !reachable(&cfg, v) {
                    continue;
                }
                let expected = cfg
                    .node(v)
                    .predecessors()
                    .iter()
                    .any(|&p| reachable(&cfg, p) && cfg.dominates(u, p))
                    && !cfg.strictly_dominates(u, v);
                let actual = cfg.node(u).dominance_frontier().contains(&v);
                prop_assert_eq!(
                    actual, expected,
                    "frontier mismatch for u={}, v={}", u, v
                );
            }
        }
    }

    #[test]
    fn loop_headers_dominate_their_bodies(body in arb_body()) {
        let mut cfg = CfgBuilder::build(&body).unwrap();
        cfg.identify_loops();
        for looped in cfg.loops() {
            prop_assert!(looped.contains(looped.header()));
            for &node in looped.body() {
                prop_assert!(
                    cfg.dominates(looped.header(), node),
                    "{} does not dominate loop member {}", looped.header(), node
                );
            }
        }
    }

    #[test]
    fn every_back_edge_target_is_a_loop_header(body in arb_body()) {
        let mut cfg = CfgBuilder::build(&body).unwrap();
        cfg.identify_loops();
        let back_edges = cfg.back_edges();
        prop_assert_eq!(back_edges.len(), cfg.loops().len());
        for edge in back_edges {
            prop_assert!(cfg
                .loops()
                .iter()
                .any(|l| l.header() == edge.target && l.back_edge() == edge));
        }
    }

    #[test]
    fn reaching_definitions_reaches_a_stable_fixed_point(body in arb_body()) {
        let mut cfg = CfgBuilder::build(&body).unwrap();
        let solver = DataFlowSolver::new(ReachingDefinitions::new(&cfg));

        let first = solver.solve_forward(&mut cfg);
        let second = solver.solve_forward(&mut cfg);

        for id in cfg.node_ids() {
            prop_assert_eq!(first.input(id), second.input(id));
            prop_assert_eq!(first.output(id), second.output(id));
        }

        // At the fixed point every visited node satisfies the dataflow
        // equations: in = meet of predecessor outs, out = transfer(in).
        let order = cfg.forward_order().to_vec();
        for &id in order.iter().skip(1) {
            let mut expected: Option<tacscope::ReachingDefsResult> = None;
            for &pred in cfg.node(id).predecessors() {
                let pred_out = first.output(pred);
                expected = Some(match expected {
                    None => pred_out.clone(),
                    Some(merged) => merged.meet(pred_out),
                });
            }
            prop_assert_eq!(first.input(id), &expected.unwrap());
        }
    }

    #[test]
    fn liveness_reaches_a_stable_fixed_point(body in arb_body()) {
        let mut cfg = CfgBuilder::build(&body).unwrap();
        let solver = DataFlowSolver::new(LiveVariables::new(&cfg));

        let first = solver.solve_backward(&mut cfg);
        let second = solver.solve_backward(&mut cfg);

        for id in cfg.node_ids() {
            prop_assert_eq!(first.input(id), second.input(id));
            prop_assert_eq!(first.output(id), second.output(id));
        }
    }

    #[test]
    fn dataflow_outputs_only_grow_during_iteration(body in arb_body()) {
        // With a union meet and a gen/kill transfer, later iterations only add
        // to a node's output: the fixed point must contain the first-sweep
        // approximation, which is the transfer of the starting value.
        let mut cfg = CfgBuilder::build(&body).unwrap();
        let solver = DataFlowSolver::new(ReachingDefinitions::new(&cfg));
        let results = solver.solve_forward(&mut cfg);

        let order = cfg.forward_order().to_vec();
        for &id in order.iter().skip(1) {
            let node = cfg.node(id);
            let first_sweep = solver.analysis().transfer(node, &solver.analysis().initial(node));
            for site in first_sweep.iter() {
                prop_assert!(
                    results.output(id).contains(site),
                    "fixed point lost a definition generated by {}", id
                );
            }
        }
    }
}
