//! Structural invariants that every extracted strategy automaton must satisfy.

use crate::_test_synthesis::{SolvedGame, eval_transition, solve};
use crate::synthesis::InitMode;

const SCENARIOS: [&str; 4] = [
    "SYS: x; SYSINIT: x; SYSGOAL: []<> x;",
    "SYS: p q; SYSINIT: !p & !q; SYSGOAL: []<> p & []<> q;",
    "ENV: req; SYS: ack; SYSTRANS: [](ack' <-> req); ENVGOAL: []<> !req; SYSGOAL: []<> !ack;",
    "SYS: x y; SYSTRANS: [](x' <-> !x); SYSGOAL: []<> x & []<> !x;",
];

fn solved_scenarios() -> Vec<SolvedGame> {
    SCENARIOS
        .iter()
        .map(|text| solve(text, InitMode::AllEnvExistsSysInit))
        .collect()
}

#[test]
/// Every edge of the automaton is an admissible game step into the winning set, and
/// every node is winning to begin with.
fn extractor_closure() {
    for solved in solved_scenarios() {
        let automaton = solved.strategy.as_ref().unwrap();
        for (_, node) in automaton.iter() {
            assert!(solved.ctx.eval_state(&solved.structure.winning, &node.state));
            for successor_id in &node.successors {
                let successor = automaton.node(*successor_id);
                assert!(eval_transition(
                    &solved.ctx,
                    &solved.bdds.env_trans,
                    &node.state,
                    &successor.state
                ));
                assert!(eval_transition(
                    &solved.ctx,
                    &solved.bdds.sys_trans,
                    &node.state,
                    &successor.state
                ));
                assert!(
                    solved
                        .ctx
                        .eval_state(&solved.structure.winning, &successor.state)
                );
            }
        }
    }
}

#[test]
/// No dead ends: in these games the environment always has an admissible move, so every
/// node must answer at least one of them.
fn strategy_totality() {
    for solved in solved_scenarios() {
        let automaton = solved.strategy.as_ref().unwrap();
        assert!(!automaton.is_empty());
        for (_, node) in automaton.iter() {
            assert!(!node.successors.is_empty());
        }
    }
}

#[test]
/// The goal index advances exactly at nodes satisfying the pursued goal, and while the
/// goal is not satisfied, the rank never increases along same-mode edges.
fn mode_and_rank_discipline() {
    for solved in solved_scenarios() {
        let automaton = solved.strategy.as_ref().unwrap();
        let goal_count = solved.bdds.sys_goals.len();
        for (_, node) in automaton.iter() {
            let goal_sat = solved
                .ctx
                .eval_state(&solved.bdds.sys_goals[node.mode], &node.state);
            let expected_mode = if goal_sat {
                (node.mode + 1) % goal_count
            } else {
                node.mode
            };
            for successor_id in &node.successors {
                let successor = automaton.node(*successor_id);
                assert_eq!(successor.mode, expected_mode);
                if !goal_sat {
                    assert!(successor.rank <= node.rank);
                }
            }
        }
    }
}

#[test]
/// Extraction is deterministic: solving the same game twice yields identical automata.
fn extraction_deterministic() {
    for text in SCENARIOS {
        let first = solve(text, InitMode::AllEnvExistsSysInit);
        let second = solve(text, InitMode::AllEnvExistsSysInit);

        let mut first_dump = Vec::new();
        let mut second_dump = Vec::new();
        first.strategy.unwrap().dump_text(&mut first_dump).unwrap();
        second.strategy.unwrap().dump_text(&mut second_dump).unwrap();
        assert_eq!(first_dump, second_dump);
    }
}
