//! End-to-end scenarios with known realizability verdicts and strategy shapes.

use crate::_test_synthesis::{simple_cycles, solve};
use crate::synthesis::InitMode;

#[test]
/// A single system variable with goal `x`: realizable, and the automaton is one node
/// with `x = 1` looping on itself.
fn trivially_realizable() {
    let solved = solve(
        "SYS: x; SYSINIT: x; SYSGOAL: []<> x;",
        InitMode::AllEnvExistsSysInit,
    );
    assert!(solved.structure.winning.is_true());

    let automaton = solved.strategy.unwrap();
    assert_eq!(automaton.node_count(), 1);
    let node = automaton.node(0);
    assert_eq!(node.state, vec![true]);
    assert_eq!(node.mode, 0);
    assert_eq!(node.successors, vec![0]);
}

#[test]
/// The environment can hold `a` high forever, which forces `x` high forever through
/// `x' <-> a`, so the goal `!x` is unreachable: unrealizable.
fn trivially_unrealizable() {
    let solved = solve(
        "ENV: a; SYS: x; SYSTRANS: [](x' <-> a); SYSGOAL: []<> !x;",
        InitMode::AllEnvExistsSysInit,
    );
    assert!(solved.structure.winning.is_false());
    assert!(solved.strategy.is_none());
}

#[test]
/// Two rotating goals over free transitions: realizable, and every strategy cycle
/// visits both a `p = 1` state and a `q = 1` state.
fn goal_rotation() {
    let solved = solve(
        "SYS: p q; SYSINIT: !p & !q; SYSGOAL: []<> p & []<> q;",
        InitMode::AllEnvExistsSysInit,
    );
    let automaton = solved.strategy.unwrap();

    let cycles = simple_cycles(&automaton);
    assert!(!cycles.is_empty());
    for cycle in cycles {
        assert!(cycle.iter().any(|id| automaton.node(*id).state[0]));
        assert!(cycle.iter().any(|id| automaton.node(*id).state[1]));
    }
}

#[test]
/// The acknowledge output must mirror the request input, and the goal wants it low; the
/// environment assumption that requests drop infinitely often makes this winnable.
fn environment_assumption_required() {
    let solved = solve(
        "ENV: req; SYS: ack; SYSTRANS: [](ack' <-> req); \
         ENVGOAL: []<> !req; SYSGOAL: []<> !ack;",
        InitMode::AllEnvExistsSysInit,
    );
    assert!(solved.structure.winning.is_true());
    let automaton = solved.strategy.unwrap();
    assert!(!automaton.is_empty());
}

#[test]
/// The same game without the environment assumption is unrealizable.
fn liveness_failure_without_assumption() {
    let solved = solve(
        "ENV: req; SYS: ack; SYSTRANS: [](ack' <-> req); SYSGOAL: []<> !ack;",
        InitMode::AllEnvExistsSysInit,
    );
    assert!(solved.structure.winning.is_false());
    assert!(solved.strategy.is_none());
}

#[test]
/// Two conflicting goals forced by `x' <-> !x`: realizable, the strategy oscillates,
/// and the pursued goal alternates along every cycle.
fn conflicting_goals_oscillate() {
    let solved = solve(
        "SYS: x y; SYSTRANS: [](x' <-> !x); SYSGOAL: []<> x & []<> !x;",
        InitMode::AllEnvExistsSysInit,
    );
    let automaton = solved.strategy.unwrap();

    for (_, node) in automaton.iter() {
        // `x` is forced to flip on every step
        for successor in &node.successors {
            assert_eq!(automaton.node(*successor).state[0], !node.state[0]);
        }
    }
    let cycles = simple_cycles(&automaton);
    assert!(!cycles.is_empty());
    for cycle in cycles {
        let modes: Vec<usize> = cycle.iter().map(|id| automaton.node(*id).mode).collect();
        assert!(modes.contains(&0));
        assert!(modes.contains(&1));
    }
}

#[test]
/// The one-sided initial mode accepts a specification whose system initial condition
/// cannot answer every environment start, while the forall-exists mode rejects it.
fn init_mode_parameter() {
    let text = "ENV: a; SYS: x; SYSINIT: x & !a; SYSGOAL: []<> 1;";

    let solved = solve(text, InitMode::OneSidedSysInit);
    let automaton = solved.strategy.unwrap();
    // seeds are exactly the winning initial states, here the single `!a & x`
    assert!(automaton.find(&[false, true], 0).is_some());

    let solved = solve(text, InitMode::AllEnvExistsSysInit);
    assert!(solved.strategy.is_none());
}
