//! Contains the nested-fixpoint computation deciding from which states the system can
//! win the GR(1) game.
//!
//! The computation follows the standard three-level structure: a greatest fixpoint over
//! the vector of system goals, a least fixpoint accumulating states that reach the
//! current goal, and an innermost greatest fixpoint per environment goal collecting
//! states that may stall while that goal is blocked. The intermediate iterates are
//! recorded, because the strategy extractor consumes them as rank tables.

use crate::encoding::compile::GameBdds;
use crate::encoding::symbolic_context::GameContext;
use crate::synthesis::InitMode;

use biodivine_lib_bdd::Bdd;

/// The winning set of the system together with the per-iteration characteristic sets
/// recorded while computing it.
///
/// For system goal `j`, `y_layers[j][k]` is the cumulative `k`-th iterate of the least
/// fixpoint; the *rank* of a winning state is the first `k` at which it appears. For
/// each layer `k` and environment goal `i`, `x_sets[j][k][i]` is the converged innermost
/// fixpoint: states that can stay there while goal `i` stays violated. All tables come
/// from the final (stable) outer round, so their unions equal the winning set.
pub struct WinningStructure {
    pub winning: Bdd,
    pub y_layers: Vec<Vec<Bdd>>,
    pub x_sets: Vec<Vec<Vec<Bdd>>>,
}

/// The controllable predecessor operator of the system.
///
/// A state belongs to the result when for every environment move allowed by `env_trans`
/// the system has a response allowed by `sys_trans` that lands in `target`. The
/// environment moves first; the system observes the environment's next values before
/// choosing its own.
pub fn cpre_sys(ctx: &GameContext, env_trans: &Bdd, sys_trans: &Bdd, target: &Bdd) -> Bdd {
    let target_next = ctx.prime(target);
    let sys_can_reach = ctx.exists_next_sys(&sys_trans.and(&target_next));
    ctx.forall_next_env(&env_trans.imp(&sys_can_reach))
}

/// Compute the winning set of the system and the rank tables of the computation.
///
/// The outer fixpoint cycles through the system goals, updating a single running
/// approximation `z`; it terminates when a full round leaves `z` unchanged. An empty
/// winning set is the unrealizability verdict for the whole game, not an error.
pub fn compute_winning_structure(ctx: &GameContext, bdds: &GameBdds) -> WinningStructure {
    let q = bdds.sys_goals.len();
    let mut z = ctx.bdd_vars().mk_true();
    let mut y_layers: Vec<Vec<Bdd>> = vec![Vec::new(); q];
    let mut x_sets: Vec<Vec<Vec<Bdd>>> = vec![Vec::new(); q];

    loop {
        let z_at_round_start = z.clone();
        for j in 0..q {
            // states where goal j holds now and the system can continue toward the next goal
            let goal_step = bdds.sys_goals[j].and(&cpre_sys(ctx, &bdds.env_trans, &bdds.sys_trans, &z));

            let mut y = ctx.bdd_vars().mk_false();
            let mut layers: Vec<Bdd> = Vec::new();
            let mut layer_x_sets: Vec<Vec<Bdd>> = Vec::new();
            loop {
                let start = goal_step.or(&cpre_sys(ctx, &bdds.env_trans, &bdds.sys_trans, &y));
                let mut y_next = ctx.bdd_vars().mk_false();
                let mut row: Vec<Bdd> = Vec::with_capacity(bdds.env_goals.len());
                for env_goal in &bdds.env_goals {
                    let blocked = env_goal.not();
                    // greatest fixpoint: stay while the environment goal is blocked
                    let mut x = ctx.bdd_vars().mk_true();
                    loop {
                        let x_next =
                            start.or(&blocked.and(&cpre_sys(ctx, &bdds.env_trans, &bdds.sys_trans, &x)));
                        if x_next == x {
                            break;
                        }
                        x = x_next;
                    }
                    y_next = y_next.or(&x);
                    row.push(x);
                }
                if y_next == y {
                    break;
                }
                y = y_next;
                layers.push(y.clone());
                layer_x_sets.push(row);
            }
            z = y;
            y_layers[j] = layers;
            x_sets[j] = layer_x_sets;
        }
        if z == z_at_round_start {
            break;
        }
    }

    WinningStructure {
        winning: z,
        y_layers,
        x_sets,
    }
}

/// Decide realizability from the winning set and the initial conditions, under the
/// given interpretation of initial conditions.
pub fn realizable(ctx: &GameContext, bdds: &GameBdds, winning: &Bdd, mode: InitMode) -> bool {
    let init_win = bdds.env_init.and(&bdds.sys_init).and(winning);
    match mode {
        InitMode::OneSidedSysInit => !init_win.is_false(),
        InitMode::AllEnvExistsSysInit => {
            let env_can_start = ctx.exists_curr_sys(&bdds.env_init);
            let sys_can_answer = ctx.exists_curr_sys(&init_win);
            ctx.forall_curr_env(&env_can_start.imp(&sys_can_answer))
                .is_true()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::encoding::compile::compile_specification;
    use crate::encoding::symbolic_context::GameContext;
    use crate::preprocessing::specification::parse_specification;
    use crate::synthesis::InitMode;
    use crate::synthesis::fixpoint::{compute_winning_structure, cpre_sys, realizable};

    fn request_ack_game() -> (GameContext, crate::encoding::compile::GameBdds) {
        let spec = parse_specification(
            "ENV: req; SYS: ack; SYSTRANS: [](ack' <-> req); \
             ENVGOAL: []<> !req; SYSGOAL: []<> !ack;",
        )
        .unwrap();
        let ctx = GameContext::new(&spec.env_vars, &spec.sys_vars).unwrap();
        let bdds = compile_specification(&ctx, &spec).unwrap();
        (ctx, bdds)
    }

    #[test]
    /// Test the controllable predecessor operator on the request/acknowledge game.
    fn cpre_request_ack() {
        let (ctx, bdds) = request_ack_game();
        let vars = ctx.bdd_vars();

        // the system's next acknowledge value is forced to the current request value,
        // so `!ack` is enforceable in one step exactly where the request is low
        let not_ack = vars.mk_var(ctx.curr_var(1)).not();
        let not_req = vars.mk_var(ctx.curr_var(0)).not();
        assert_eq!(
            cpre_sys(&ctx, &bdds.env_trans, &bdds.sys_trans, &not_ack),
            not_req
        );

        // the whole state space is enforceable from everywhere
        assert!(cpre_sys(&ctx, &bdds.env_trans, &bdds.sys_trans, &vars.mk_true()).is_true());
        // the empty target is enforceable from nowhere
        assert!(cpre_sys(&ctx, &bdds.env_trans, &bdds.sys_trans, &vars.mk_false()).is_false());
    }

    #[test]
    /// Test that the environment assumption makes the request/acknowledge game winnable
    /// from every state.
    fn winning_with_environment_assumption() {
        let (ctx, bdds) = request_ack_game();
        let structure = compute_winning_structure(&ctx, &bdds);
        assert!(structure.winning.is_true());
        assert!(realizable(&ctx, &bdds, &structure.winning, InitMode::AllEnvExistsSysInit));
        assert!(realizable(&ctx, &bdds, &structure.winning, InitMode::OneSidedSysInit));

        // the rank tables cover the winning set: the last layer is everything
        assert_eq!(structure.y_layers[0].last().unwrap(), &structure.winning);
    }

    #[test]
    /// Test that dropping the environment assumption makes the same game unwinnable.
    fn unrealizable_without_environment_assumption() {
        let spec = parse_specification(
            "ENV: req; SYS: ack; SYSTRANS: [](ack' <-> req); SYSGOAL: []<> !ack;",
        )
        .unwrap();
        let ctx = GameContext::new(&spec.env_vars, &spec.sys_vars).unwrap();
        let bdds = compile_specification(&ctx, &spec).unwrap();

        let structure = compute_winning_structure(&ctx, &bdds);
        assert!(structure.winning.is_false());
        assert!(!realizable(&ctx, &bdds, &structure.winning, InitMode::AllEnvExistsSysInit));
        assert!(!realizable(&ctx, &bdds, &structure.winning, InitMode::OneSidedSysInit));
    }

    #[test]
    /// Test that the two initial-condition modes can disagree.
    fn init_modes_disagree() {
        // the system can only start in `x & !a`, which answers the environment's
        // initial choice `a = 0` but not `a = 1`
        let spec = parse_specification("ENV: a; SYS: x; SYSINIT: x & !a; SYSGOAL: []<> 1;").unwrap();
        let ctx = GameContext::new(&spec.env_vars, &spec.sys_vars).unwrap();
        let bdds = compile_specification(&ctx, &spec).unwrap();

        let structure = compute_winning_structure(&ctx, &bdds);
        assert!(structure.winning.is_true());
        assert!(realizable(&ctx, &bdds, &structure.winning, InitMode::OneSidedSysInit));
        assert!(!realizable(&ctx, &bdds, &structure.winning, InitMode::AllEnvExistsSysInit));
    }
}
