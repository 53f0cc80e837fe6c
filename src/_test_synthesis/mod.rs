//! Complex test scenarios exercising the whole synthesis procedure, from specification
//! text to the extracted strategy automaton.

mod _test_invariants;
mod _test_scenarios;

use crate::automaton::StrategyAutomaton;
use crate::encoding::compile::{GameBdds, compile_specification};
use crate::encoding::symbolic_context::GameContext;
use crate::preprocessing::specification::parse_specification;
use crate::synthesis::InitMode;
use crate::synthesis::fixpoint::{WinningStructure, compute_winning_structure, realizable};
use crate::synthesis::strategy::extract_strategy;

use biodivine_lib_bdd::{Bdd, BddValuation};

/// A fully solved game, keeping every intermediate product for inspection.
pub(super) struct SolvedGame {
    pub ctx: GameContext,
    pub bdds: GameBdds,
    pub structure: WinningStructure,
    /// `None` when the specification is unrealizable under the chosen mode.
    pub strategy: Option<StrategyAutomaton>,
}

/// Run the whole pipeline on the given specification text.
pub(super) fn solve(text: &str, mode: InitMode) -> SolvedGame {
    let spec = parse_specification(text).unwrap();
    let ctx = GameContext::new(&spec.env_vars, &spec.sys_vars).unwrap();
    let bdds = compile_specification(&ctx, &spec).unwrap();
    let structure = compute_winning_structure(&ctx, &bdds);
    let strategy = if realizable(&ctx, &bdds, &structure.winning, mode) {
        Some(extract_strategy(&ctx, &bdds, &structure, mode).unwrap())
    } else {
        None
    };
    SolvedGame {
        ctx,
        bdds,
        structure,
        strategy,
    }
}

/// Evaluate a transition relation BDD on a concrete step: current values from `from`,
/// next-step values from `to`.
pub(super) fn eval_transition(ctx: &GameContext, relation: &Bdd, from: &[bool], to: &[bool]) -> bool {
    let mut values = vec![false; 2 * ctx.num_state_vars()];
    for (k, bit) in from.iter().enumerate() {
        values[2 * k] = *bit;
    }
    for (k, bit) in to.iter().enumerate() {
        values[2 * k + 1] = *bit;
    }
    relation.eval_in(&BddValuation::new(values))
}

/// Enumerate the simple cycles of a strategy automaton (each cycle reported once,
/// rooted at its smallest node id). Only intended for the small test automata.
pub(super) fn simple_cycles(automaton: &StrategyAutomaton) -> Vec<Vec<usize>> {
    fn dfs(
        automaton: &StrategyAutomaton,
        start: usize,
        current: usize,
        path: &mut Vec<usize>,
        cycles: &mut Vec<Vec<usize>>,
    ) {
        for successor in &automaton.node(current).successors {
            if *successor == start {
                cycles.push(path.clone());
            } else if *successor > start && !path.contains(successor) {
                path.push(*successor);
                dfs(automaton, start, *successor, path, cycles);
                path.pop();
            }
        }
    }

    let mut cycles = Vec::new();
    for start in 0..automaton.node_count() {
        let mut path = vec![start];
        dfs(automaton, start, start, &mut path, &mut cycles);
    }
    cycles
}
