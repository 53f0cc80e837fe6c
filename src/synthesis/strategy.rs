//! Contains the strategy extraction pass: walking the winning states reachable from the
//! initial conditions and materializing an automaton whose moves preserve the winning
//! invariant and make progress toward the pursued system goal.

use crate::automaton::{StrategyAutomaton, bits_to_string};
use crate::encoding::compile::GameBdds;
use crate::encoding::symbolic_context::GameContext;
use crate::errors::SynthesisError;
use crate::synthesis::InitMode;
use crate::synthesis::fixpoint::WinningStructure;

use biodivine_lib_bdd::Bdd;
use std::collections::VecDeque;

/// Build a strategy automaton from the winning structure.
///
/// The caller must have established realizability first; a winning state without an
/// admissible move (or an initial environment choice without a winning completion under
/// the forall-exists mode) is an internal consistency error, not a legitimate outcome.
///
/// Nodes are keyed by `(state, goal index)`. At a node whose state satisfies the pursued
/// goal the index advances cyclically; otherwise the chosen move strictly decreases the
/// state's rank, or, when the rank cannot decrease, stays inside the recorded region of
/// some environment goal that is currently violated. Ties are broken toward the smallest
/// reachable rank and then toward the lexicographically smallest successor state, which
/// makes the construction deterministic.
pub fn extract_strategy(
    ctx: &GameContext,
    bdds: &GameBdds,
    structure: &WinningStructure,
    mode: InitMode,
) -> Result<StrategyAutomaton, SynthesisError> {
    let q = bdds.sys_goals.len();

    // primed rank tables constrain successor choices below
    let layers_primed: Vec<Vec<Bdd>> = structure
        .y_layers
        .iter()
        .map(|layers| layers.iter().map(|layer| ctx.prime(layer)).collect())
        .collect();

    let mut automaton = StrategyAutomaton::new();
    let mut worklist: VecDeque<usize> = VecDeque::new();

    for state in seed_states(ctx, bdds, structure, mode)? {
        if automaton.find(&state, 0).is_none() {
            let rank = rank_of(ctx, structure, 0, &state)?;
            let id = automaton.new_node(state, 0, rank);
            worklist.push_back(id);
        }
    }

    while let Some(id) = worklist.pop_front() {
        let (state, mode_j) = {
            let node = automaton.node(id);
            (node.state.clone(), node.mode)
        };
        let goal_sat = ctx.eval_state(&bdds.sys_goals[mode_j], &state);
        let next_mode = if goal_sat { (mode_j + 1) % q } else { mode_j };
        let state_cube = ctx.state_to_cube(&state);

        // every environment move allowed from this state must be answered
        let env_moves =
            ctx.sat_assignments(&bdds.env_trans.and(&state_cube), ctx.next_env_vars());
        for env_bits in env_moves {
            let candidates = bdds
                .sys_trans
                .and(&state_cube)
                .and(&ctx.env_to_cube_primed(&env_bits));
            let sys_bits = choose_move(
                ctx,
                bdds,
                structure,
                &layers_primed,
                &state,
                mode_j,
                next_mode,
                goal_sat,
                &candidates,
            )?;

            let mut successor = env_bits;
            successor.extend(sys_bits);
            let successor_id = match automaton.find(&successor, next_mode) {
                Some(existing) => existing,
                None => {
                    let rank = rank_of(ctx, structure, next_mode, &successor)?;
                    let new_id = automaton.new_node(successor, next_mode, rank);
                    worklist.push_back(new_id);
                    new_id
                }
            };
            automaton.add_edge(id, successor_id);
        }
    }

    Ok(automaton)
}

/// The initial `(state, 0)` keys of the automaton.
///
/// Under [InitMode::OneSidedSysInit] these are all states satisfying both initial
/// conditions inside the winning set. Under [InitMode::AllEnvExistsSysInit] there is one
/// seed per initial environment choice, completed by the lexicographically smallest
/// winning system choice.
fn seed_states(
    ctx: &GameContext,
    bdds: &GameBdds,
    structure: &WinningStructure,
    mode: InitMode,
) -> Result<Vec<Vec<bool>>, SynthesisError> {
    let init_win = bdds.env_init.and(&bdds.sys_init).and(&structure.winning);
    match mode {
        InitMode::OneSidedSysInit => Ok(ctx.sat_assignments(&init_win, ctx.curr_state_vars())),
        InitMode::AllEnvExistsSysInit => {
            let mut seeds = Vec::new();
            for env_bits in ctx.sat_assignments(&bdds.env_init, ctx.curr_env_vars()) {
                let restricted = init_win.and(&ctx.env_to_cube(&env_bits));
                let Some(sys_bits) = ctx.first_sat_assignment(&restricted, ctx.curr_sys_vars())
                else {
                    return Err(SynthesisError::Extract {
                        state: bits_to_string(&env_bits),
                        mode: 0,
                    });
                };
                let mut seed = env_bits;
                seed.extend(sys_bits);
                seeds.push(seed);
            }
            Ok(seeds)
        }
    }
}

/// The rank of a winning state: the first fixpoint layer of its mode that contains it.
fn rank_of(
    ctx: &GameContext,
    structure: &WinningStructure,
    mode: usize,
    state: &[bool],
) -> Result<usize, SynthesisError> {
    structure.y_layers[mode]
        .iter()
        .position(|layer| ctx.eval_state(layer, state))
        .ok_or_else(|| SynthesisError::Extract {
            state: bits_to_string(state),
            mode,
        })
}

/// Choose the system's next values for one environment move, following the
/// rank-then-lexicographic tie-breaking rule.
#[allow(clippy::too_many_arguments)]
fn choose_move(
    ctx: &GameContext,
    bdds: &GameBdds,
    structure: &WinningStructure,
    layers_primed: &[Vec<Bdd>],
    state: &[bool],
    mode_j: usize,
    next_mode: usize,
    goal_sat: bool,
    candidates: &Bdd,
) -> Result<Vec<bool>, SynthesisError> {
    if goal_sat {
        // the pursued goal holds here; any successor winning for the next goal works,
        // preferring the smallest rank
        for layer in &layers_primed[next_mode] {
            if let Some(bits) =
                ctx.first_sat_assignment(&candidates.and(layer), ctx.next_sys_vars())
            {
                return Ok(bits);
            }
        }
    } else {
        let rank = rank_of(ctx, structure, mode_j, state)?;

        // first preference: strictly decrease the rank
        for layer in &layers_primed[mode_j][..rank] {
            if let Some(bits) =
                ctx.first_sat_assignment(&candidates.and(layer), ctx.next_sys_vars())
            {
                return Ok(bits);
            }
        }

        // otherwise the state sits in the region of some violated environment goal;
        // staying inside that region is safe until the environment releases it
        for (i, env_goal) in bdds.env_goals.iter().enumerate() {
            if ctx.eval_state(env_goal, state) {
                continue;
            }
            let region = &structure.x_sets[mode_j][rank][i];
            if !ctx.eval_state(region, state) {
                continue;
            }
            if let Some(bits) = ctx
                .first_sat_assignment(&candidates.and(&ctx.prime(region)), ctx.next_sys_vars())
            {
                return Ok(bits);
            }
        }
    }

    Err(SynthesisError::Extract {
        state: bits_to_string(state),
        mode: mode_j,
    })
}
