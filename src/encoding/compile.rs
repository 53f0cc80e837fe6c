//! Compilation of formula syntax trees into BDDs over the interleaved game encoding.

use crate::encoding::symbolic_context::GameContext;
use crate::errors::SpecificationError;
use crate::preprocessing::gr1_tree::{Gr1TreeNode, NodeType};
use crate::preprocessing::operator_enums::{Atomic, BinaryOp, UnaryOp};
use crate::preprocessing::specification::Specification;

use biodivine_lib_bdd::Bdd;

/// The compiled BDDs of a specification, ready for the fixpoint engine.
///
/// The transition conjunct lists are already folded into single relations, and an empty
/// goal list of either player is normalized to the single trivially-true goal, so the
/// engine always sees `p >= 1` and `q >= 1`.
pub struct GameBdds {
    pub env_init: Bdd,
    pub sys_init: Bdd,
    pub env_trans: Bdd,
    pub sys_trans: Bdd,
    pub env_goals: Vec<Bdd>,
    pub sys_goals: Vec<Bdd>,
}

/// Recursively compile the formula represented by the sub-tree `node` into a BDD.
///
/// Current-step variables map to even BDD variable indices and next-step variables to
/// the odd ones; connectives map to the corresponding BDD primitives. An unknown
/// variable name is a specification error (the validation pass makes this unreachable
/// for formulas that went through [crate::preprocessing::specification]).
pub fn compile_formula(
    ctx: &GameContext,
    node: &Gr1TreeNode,
) -> Result<Bdd, SpecificationError> {
    let result = match &node.node_type {
        NodeType::Terminal(atom) => match atom {
            Atomic::True => ctx.bdd_vars().mk_true(),
            Atomic::False => ctx.bdd_vars().mk_false(),
            Atomic::Var(name) => {
                let index = ctx
                    .var_index(name)
                    .ok_or_else(|| SpecificationError::UnknownVariable(name.clone()))?;
                ctx.bdd_vars().mk_var(ctx.curr_var(index))
            }
            Atomic::NextVar(name) => {
                let index = ctx
                    .var_index(name)
                    .ok_or_else(|| SpecificationError::UnknownVariable(name.clone()))?;
                ctx.bdd_vars().mk_var(ctx.next_var(index))
            }
        },
        NodeType::Unary(UnaryOp::Not, child) => compile_formula(ctx, child)?.not(),
        NodeType::Binary(op, left, right) => {
            let left = compile_formula(ctx, left)?;
            let right = compile_formula(ctx, right)?;
            match op {
                BinaryOp::And => left.and(&right),
                BinaryOp::Or => left.or(&right),
                BinaryOp::Imp => left.imp(&right),
                BinaryOp::Iff => left.iff(&right),
            }
        }
    };
    Ok(result)
}

/// Compile a whole specification into the BDDs consumed by the fixpoint engine.
///
/// Transition conjunct lists are folded with [Gr1TreeNode::mk_conjunction] before
/// compilation (an empty list is the constant `1`). An empty environment goal list is
/// replaced by the single trivially-true goal; the same normalization keeps an empty
/// system goal list meaningful for synthesis.
pub fn compile_specification(
    ctx: &GameContext,
    spec: &Specification,
) -> Result<GameBdds, SpecificationError> {
    let env_trans = Gr1TreeNode::mk_conjunction(spec.env_trans.clone());
    let sys_trans = Gr1TreeNode::mk_conjunction(spec.sys_trans.clone());

    let mut env_goals = Vec::with_capacity(spec.env_goals.len().max(1));
    for goal in &spec.env_goals {
        env_goals.push(compile_formula(ctx, goal)?);
    }
    if env_goals.is_empty() {
        env_goals.push(ctx.bdd_vars().mk_true());
    }
    let mut sys_goals = Vec::with_capacity(spec.sys_goals.len().max(1));
    for goal in &spec.sys_goals {
        sys_goals.push(compile_formula(ctx, goal)?);
    }
    if sys_goals.is_empty() {
        sys_goals.push(ctx.bdd_vars().mk_true());
    }

    Ok(GameBdds {
        env_init: compile_formula(ctx, &spec.env_init)?,
        sys_init: compile_formula(ctx, &spec.sys_init)?,
        env_trans: compile_formula(ctx, &env_trans)?,
        sys_trans: compile_formula(ctx, &sys_trans)?,
        env_goals,
        sys_goals,
    })
}
