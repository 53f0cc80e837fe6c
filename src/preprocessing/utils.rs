//! Contains functionality mostly regarding validation of variable names and their usage
//! in the individual formulas of a specification.

use crate::errors::SpecificationError;
use crate::preprocessing::gr1_tree::{Gr1TreeNode, NodeType};
use crate::preprocessing::operator_enums::Atomic;
use crate::preprocessing::specification::Specification;

use std::collections::HashSet;

/// Check that a parsed [Specification] is internally consistent:
///  - variable names are unique across both players,
///  - every atom in every formula resolves against a declared variable,
///  - initial conditions and goals only talk about the current step,
///  - environment transitions only prime environment variables (the environment moves
///    first and cannot observe the system's next move).
pub fn validate_specification(spec: &Specification) -> Result<(), SpecificationError> {
    let mut declared: HashSet<&str> = HashSet::new();
    for name in spec.env_vars.iter().chain(spec.sys_vars.iter()) {
        if !declared.insert(name.as_str()) {
            return Err(SpecificationError::DuplicateVariable(name.clone()));
        }
    }
    let env_declared: HashSet<&str> = spec.env_vars.iter().map(String::as_str).collect();

    validate_formula(&spec.env_init, &declared, "initial condition", None)?;
    validate_formula(&spec.sys_init, &declared, "initial condition", None)?;
    for tree in &spec.env_trans {
        validate_formula(tree, &declared, "environment transition", Some(&env_declared))?;
    }
    for tree in &spec.sys_trans {
        // the system observes the environment's move, so it may prime either side
        validate_formula(tree, &declared, "system transition", Some(&declared))?;
    }
    for tree in spec.env_goals.iter().chain(spec.sys_goals.iter()) {
        validate_formula(tree, &declared, "goal", None)?;
    }
    Ok(())
}

/// Check the atoms of a single formula tree through an in-order traversal.
///
/// `allow_next_of` lists the variables that may appear primed; `None` forbids next-step
/// atoms altogether.
fn validate_formula(
    tree: &Gr1TreeNode,
    declared: &HashSet<&str>,
    context: &'static str,
    allow_next_of: Option<&HashSet<&str>>,
) -> Result<(), SpecificationError> {
    tree.traverse(&mut |node| {
        let NodeType::Terminal(atom) = &node.node_type else {
            return Ok(());
        };
        match atom {
            Atomic::Var(name) => {
                if !declared.contains(name.as_str()) {
                    return Err(SpecificationError::UnknownVariable(name.clone()));
                }
                Ok(())
            }
            Atomic::NextVar(name) => {
                if !declared.contains(name.as_str()) {
                    return Err(SpecificationError::UnknownVariable(name.clone()));
                }
                match allow_next_of {
                    Some(allowed) if allowed.contains(name.as_str()) => Ok(()),
                    _ => Err(SpecificationError::UnexpectedNextVariable {
                        name: name.clone(),
                        context,
                    }),
                }
            }
            Atomic::True | Atomic::False => Ok(()),
        }
    })
}
