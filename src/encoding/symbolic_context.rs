//! The symbolic context of a game: BDD variables for both players in an interleaved
//! ordering, and the low-level operations the fixpoint engine and the strategy extractor
//! need to touch underlying BDDs directly.

use crate::errors::SynthesisError;

use biodivine_lib_bdd::{
    Bdd, BddPartialValuation, BddValuation, BddVariable, BddVariableSet, BddVariableSetBuilder,
};

/// Symbolic encoding of the state space of a GR(1) game.
///
/// For `m` environment variables and `n` system variables, the context allocates exactly
/// `2(m+n)` BDD variables, once, in the interleaved order
/// `e0, e0', e1, e1', ..., s0, s0', ...`: each current-step variable is immediately
/// followed by its next-step (primed) copy, and environment variables precede system
/// variables. Primed variables carry the name of their current-step original with a `'`
/// suffix.
///
/// State sets are BDDs over current-step variables only; transition relations also use
/// the primed variables.
pub struct GameContext {
    vars: BddVariableSet,
    env_names: Vec<String>,
    sys_names: Vec<String>,
    curr_vars: Vec<BddVariable>,
    next_vars: Vec<BddVariable>,
    /// The relation `/\_k (v_k <-> v_k')`, used to move sets between the two steps.
    step_comparator: Bdd,
}

impl GameContext {
    /// Allocate the BDD variables for the given (already validated) variable names.
    ///
    /// Fails with [SynthesisError::Engine] when the BDD collaborator cannot hold
    /// `2(m+n)` variables.
    pub fn new(env_names: &[String], sys_names: &[String]) -> Result<GameContext, SynthesisError> {
        let state_vars = env_names.len() + sys_names.len();
        if 2 * state_vars > usize::from(u16::MAX) {
            return Err(SynthesisError::Engine(format!(
                "Cannot allocate {} BDD variables.",
                2 * state_vars
            )));
        }

        let mut builder = BddVariableSetBuilder::new();
        let mut curr_vars = Vec::with_capacity(state_vars);
        let mut next_vars = Vec::with_capacity(state_vars);
        for name in env_names.iter().chain(sys_names.iter()) {
            curr_vars.push(builder.make_variable(name.as_str()));
            next_vars.push(builder.make_variable(format!("{name}'").as_str()));
        }
        let vars = builder.build();

        let mut step_comparator = vars.mk_true();
        for (curr, next) in curr_vars.iter().zip(next_vars.iter()) {
            let pair = vars.mk_var(*curr).iff(&vars.mk_var(*next));
            step_comparator = step_comparator.and(&pair);
        }

        Ok(GameContext {
            vars,
            env_names: env_names.to_vec(),
            sys_names: sys_names.to_vec(),
            curr_vars,
            next_vars,
            step_comparator,
        })
    }

    /// The number of environment-owned state variables.
    pub fn num_env(&self) -> usize {
        self.env_names.len()
    }

    /// The number of system-owned state variables.
    pub fn num_sys(&self) -> usize {
        self.sys_names.len()
    }

    /// The number of state variables of both players combined.
    pub fn num_state_vars(&self) -> usize {
        self.curr_vars.len()
    }

    /// The underlying BDD variable universe.
    pub fn bdd_vars(&self) -> &BddVariableSet {
        &self.vars
    }

    /// Position of a declared variable in the combined environment-then-system ordering.
    pub fn var_index(&self, name: &str) -> Option<usize> {
        self.env_names
            .iter()
            .position(|n| n == name)
            .or_else(|| {
                self.sys_names
                    .iter()
                    .position(|n| n == name)
                    .map(|i| i + self.num_env())
            })
    }

    /// The current-step BDD variable at the given state index.
    pub fn curr_var(&self, index: usize) -> BddVariable {
        self.curr_vars[index]
    }

    /// The next-step BDD variable at the given state index.
    pub fn next_var(&self, index: usize) -> BddVariable {
        self.next_vars[index]
    }

    /// All current-step BDD variables (environment first).
    pub fn curr_state_vars(&self) -> &[BddVariable] {
        &self.curr_vars
    }

    /// All next-step BDD variables (environment first).
    pub fn next_state_vars(&self) -> &[BddVariable] {
        &self.next_vars
    }

    /// Current-step BDD variables of the environment.
    pub fn curr_env_vars(&self) -> &[BddVariable] {
        &self.curr_vars[..self.num_env()]
    }

    /// Current-step BDD variables of the system.
    pub fn curr_sys_vars(&self) -> &[BddVariable] {
        &self.curr_vars[self.num_env()..]
    }

    /// Next-step BDD variables of the environment.
    pub fn next_env_vars(&self) -> &[BddVariable] {
        &self.next_vars[..self.num_env()]
    }

    /// Next-step BDD variables of the system.
    pub fn next_sys_vars(&self) -> &[BddVariable] {
        &self.next_vars[self.num_env()..]
    }

    /// Rename every current-step variable in `set` to its next-step copy.
    ///
    /// The `set` must not depend on any next-step variable. Implemented by conjoining
    /// with the step comparator and projecting the current-step variables out.
    pub fn prime(&self, set: &Bdd) -> Bdd {
        set.and(&self.step_comparator).exists(&self.curr_vars)
    }

    /// Rename every next-step variable in `set` to its current-step copy.
    ///
    /// The `set` must not depend on any current-step variable.
    pub fn unprime(&self, set: &Bdd) -> Bdd {
        set.and(&self.step_comparator).exists(&self.next_vars)
    }

    /// Existentially quantify the next-step environment variables.
    pub fn exists_next_env(&self, relation: &Bdd) -> Bdd {
        relation.exists(self.next_env_vars())
    }

    /// Existentially quantify the next-step system variables.
    pub fn exists_next_sys(&self, relation: &Bdd) -> Bdd {
        relation.exists(self.next_sys_vars())
    }

    /// Universally quantify the next-step environment variables.
    pub fn forall_next_env(&self, relation: &Bdd) -> Bdd {
        relation.for_all(self.next_env_vars())
    }

    /// Existentially quantify the current-step system variables.
    pub fn exists_curr_sys(&self, set: &Bdd) -> Bdd {
        set.exists(self.curr_sys_vars())
    }

    /// Universally quantify the current-step environment variables.
    pub fn forall_curr_env(&self, set: &Bdd) -> Bdd {
        set.for_all(self.curr_env_vars())
    }

    /// A conjunctive cube fixing the listed variables to the given bit values.
    fn mk_cube(&self, variables: &[BddVariable], bits: &[bool]) -> Bdd {
        let mut valuation = BddPartialValuation::empty();
        for (var, bit) in variables.iter().zip(bits.iter()) {
            valuation.set_value(*var, *bit);
        }
        self.vars.mk_conjunctive_clause(&valuation)
    }

    /// Turn an `(m+n)`-bit state vector into a cube over current-step variables.
    pub fn state_to_cube(&self, state: &[bool]) -> Bdd {
        self.mk_cube(&self.curr_vars, state)
    }

    /// Turn an `(m+n)`-bit state vector into a cube over next-step variables.
    pub fn state_to_cube_primed(&self, state: &[bool]) -> Bdd {
        self.mk_cube(&self.next_vars, state)
    }

    /// Turn an `m`-bit environment vector into a cube over current-step environment
    /// variables.
    pub fn env_to_cube(&self, env_bits: &[bool]) -> Bdd {
        self.mk_cube(self.curr_env_vars(), env_bits)
    }

    /// Turn an `m`-bit environment vector into a cube over next-step environment
    /// variables.
    pub fn env_to_cube_primed(&self, env_bits: &[bool]) -> Bdd {
        self.mk_cube(self.next_env_vars(), env_bits)
    }

    /// Read the `(m+n)`-bit state vector of a total valuation (current-step values).
    pub fn cube_to_state(&self, valuation: &BddValuation) -> Vec<bool> {
        self.curr_vars.iter().map(|v| valuation.value(*v)).collect()
    }

    /// Evaluate a state-set BDD in the given state.
    ///
    /// The `set` must not depend on any next-step variable (those are filled with `0`).
    pub fn eval_state(&self, set: &Bdd, state: &[bool]) -> bool {
        let mut values = vec![false; 2 * self.num_state_vars()];
        for (k, bit) in state.iter().enumerate() {
            values[2 * k] = *bit;
        }
        set.eval_in(&BddValuation::new(values))
    }

    /// All assignments of the listed variables that can be extended to a satisfying
    /// valuation of `set`, in lexicographic order (`0 < 1`, first variable most
    /// significant).
    pub fn sat_assignments(&self, set: &Bdd, over: &[BddVariable]) -> Vec<Vec<bool>> {
        let mut results = Vec::new();
        let projected = self.project_to(set, over);
        let mut prefix = Vec::with_capacity(over.len());
        self.sat_assignments_rec(&projected, over, &mut prefix, &mut |bits| {
            results.push(bits.to_vec());
            true
        });
        results
    }

    /// The lexicographically smallest assignment of the listed variables extendable to a
    /// satisfying valuation of `set`, if any.
    pub fn first_sat_assignment(&self, set: &Bdd, over: &[BddVariable]) -> Option<Vec<bool>> {
        let mut result = None;
        let projected = self.project_to(set, over);
        let mut prefix = Vec::with_capacity(over.len());
        self.sat_assignments_rec(&projected, over, &mut prefix, &mut |bits| {
            result = Some(bits.to_vec());
            false
        });
        result
    }

    /// Existentially quantify everything except the listed variables.
    fn project_to(&self, set: &Bdd, over: &[BddVariable]) -> Bdd {
        let others: Vec<BddVariable> = self
            .vars
            .variables()
            .into_iter()
            .filter(|v| !over.contains(v))
            .collect();
        set.exists(&others)
    }

    /// Recursive branch-and-fix enumeration; the `emit` callback returns `false` to stop.
    fn sat_assignments_rec(
        &self,
        set: &Bdd,
        remaining: &[BddVariable],
        prefix: &mut Vec<bool>,
        emit: &mut impl FnMut(&[bool]) -> bool,
    ) -> bool {
        if set.is_false() {
            return true;
        }
        let Some((var, rest)) = remaining.split_first() else {
            return emit(prefix);
        };
        for value in [false, true] {
            let fixed = set.and(&self.vars.mk_literal(*var, value));
            prefix.push(value);
            let keep_going = self.sat_assignments_rec(&fixed, rest, prefix, emit);
            prefix.pop();
            if !keep_going {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::encoding::symbolic_context::GameContext;
    use biodivine_lib_bdd::BddValuation;

    fn request_grant_context() -> GameContext {
        GameContext::new(
            &["r1".to_string(), "r2".to_string()],
            &["g1".to_string()],
        )
        .unwrap()
    }

    #[test]
    /// Test that variables are allocated in the interleaved order of the encoding.
    fn interleaved_variable_order() {
        let ctx = request_grant_context();
        let vars = ctx.bdd_vars();

        assert_eq!(vars.num_vars(), 6);
        let all = vars.variables();
        assert_eq!(all[0], ctx.curr_var(0)); // r1
        assert_eq!(all[1], ctx.next_var(0)); // r1'
        assert_eq!(all[2], ctx.curr_var(1)); // r2
        assert_eq!(all[3], ctx.next_var(1)); // r2'
        assert_eq!(all[4], ctx.curr_var(2)); // g1
        assert_eq!(all[5], ctx.next_var(2)); // g1'

        assert_eq!(ctx.var_index("r1"), Some(0));
        assert_eq!(ctx.var_index("r2"), Some(1));
        assert_eq!(ctx.var_index("g1"), Some(2));
        assert_eq!(ctx.var_index("unknown"), None);

        assert_eq!(ctx.curr_env_vars().len(), 2);
        assert_eq!(ctx.next_sys_vars().len(), 1);
    }

    #[test]
    /// Test that `unprime(prime(b)) = b` for sets over current-step variables.
    fn prime_unprime_involution() {
        let ctx = request_grant_context();
        let vars = ctx.bdd_vars();

        let r1 = vars.mk_var(ctx.curr_var(0));
        let r2 = vars.mk_var(ctx.curr_var(1));
        let g1 = vars.mk_var(ctx.curr_var(2));
        let set = r1.xor(&r2).or(&g1.not());

        let primed = ctx.prime(&set);
        assert_ne!(primed, set);
        assert_eq!(ctx.unprime(&primed), set);
    }

    #[test]
    /// Test that converting a state to a cube and back is the identity.
    fn state_cube_round_trip() {
        let ctx = request_grant_context();

        for state in [
            vec![false, false, false],
            vec![true, false, true],
            vec![true, true, true],
        ] {
            let cube = ctx.state_to_cube(&state);
            // the cube fixes all current-step variables, so its witness is unique there
            let valuation: BddValuation = cube.sat_witness().unwrap();
            assert_eq!(ctx.cube_to_state(&valuation), state);
            assert!(ctx.eval_state(&cube, &state));
        }
    }

    #[test]
    /// Test the lexicographic enumeration of satisfying assignments.
    fn assignment_enumeration() {
        let ctx = request_grant_context();
        let vars = ctx.bdd_vars();

        // r1 | r2, enumerated over the current environment variables
        let set = vars.mk_var(ctx.curr_var(0)).or(&vars.mk_var(ctx.curr_var(1)));
        let assignments = ctx.sat_assignments(&set, ctx.curr_env_vars());
        assert_eq!(
            assignments,
            vec![
                vec![false, true],
                vec![true, false],
                vec![true, true],
            ]
        );
        assert_eq!(
            ctx.first_sat_assignment(&set, ctx.curr_env_vars()),
            Some(vec![false, true])
        );
        assert_eq!(ctx.first_sat_assignment(&vars.mk_false(), ctx.curr_env_vars()), None);
    }

    #[test]
    /// Test that quantifier helpers behave as expected on a simple relation.
    fn quantifier_helpers() {
        let ctx = request_grant_context();
        let vars = ctx.bdd_vars();

        // relation: g1' <-> r1; some g1' always works
        let relation = vars.mk_var(ctx.next_var(2)).iff(&vars.mk_var(ctx.curr_var(0)));
        assert!(ctx.exists_next_sys(&relation).is_true());

        // r1' | g1 holds for every environment move only where g1 already holds
        let set = vars.mk_var(ctx.next_var(0)).or(&vars.mk_var(ctx.curr_var(2)));
        assert_eq!(ctx.forall_next_env(&set), vars.mk_var(ctx.curr_var(2)));
    }
}
