//! The specification value assembled from the sections of a GR(1) input file.
//!
//! A specification file consists of `;`-terminated sections. `ENV:` and `SYS:` declare
//! the variables owned by the environment and the system. `ENVINIT:`/`SYSINIT:` hold a
//! single propositional formula each. `ENVTRANS:`/`SYSTRANS:` hold `&`-joined safety
//! conjuncts, each introduced by the `[]` marker. `ENVGOAL:`/`SYSGOAL:` hold `&`-joined
//! liveness conjuncts, each introduced by the `[]<>` marker. The `#` character starts a
//! comment running to the end of the line.

use crate::errors::SpecificationError;
use crate::preprocessing::gr1_tree::Gr1TreeNode;
use crate::preprocessing::operator_enums::{Atomic, BinaryOp};
use crate::preprocessing::parser::parse_gr1_tokens;
use crate::preprocessing::tokenizer::{Gr1Token, try_tokenize_formula};
use crate::preprocessing::utils::validate_specification;

/// A complete GR(1) specification: the variables of both players, their initial
/// conditions, their safety conjuncts, and their Büchi goals.
///
/// Initial conditions are already defaulted to the constant `1` when the corresponding
/// section is missing or empty (no restriction). Transition and goal conjuncts are kept
/// as separate trees; [Gr1TreeNode::mk_conjunction] folds them when a single formula is
/// needed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Specification {
    pub env_vars: Vec<String>,
    pub sys_vars: Vec<String>,
    pub env_init: Gr1TreeNode,
    pub sys_init: Gr1TreeNode,
    pub env_trans: Vec<Gr1TreeNode>,
    pub sys_trans: Vec<Gr1TreeNode>,
    pub env_goals: Vec<Gr1TreeNode>,
    pub sys_goals: Vec<Gr1TreeNode>,
}

/// The recognized section keywords, in the order they conventionally appear.
const SECTION_NAMES: [&str; 8] = [
    "ENV", "SYS", "ENVINIT", "SYSINIT", "ENVTRANS", "SYSTRANS", "ENVGOAL", "SYSGOAL",
];

/// Parse the text of a specification file into a validated [Specification] value.
///
/// This is a pure function; all parser state lives on the stack of this call.
pub fn parse_specification(text: &str) -> Result<Specification, SpecificationError> {
    let text = strip_comments(text);

    let mut env_vars: Option<Vec<String>> = None;
    let mut sys_vars: Option<Vec<String>> = None;
    let mut env_init: Option<Gr1TreeNode> = None;
    let mut sys_init: Option<Gr1TreeNode> = None;
    let mut env_trans: Vec<Gr1TreeNode> = Vec::new();
    let mut sys_trans: Vec<Gr1TreeNode> = Vec::new();
    let mut env_goals: Vec<Gr1TreeNode> = Vec::new();
    let mut sys_goals: Vec<Gr1TreeNode> = Vec::new();

    for chunk in text.split(';') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let Some((header, body)) = chunk.split_once(':') else {
            return Err(SpecificationError::Syntax(format!(
                "Expected a section header in \"{chunk}\"."
            )));
        };
        let header = header.trim();
        if !SECTION_NAMES.contains(&header) {
            return Err(SpecificationError::Syntax(format!(
                "Unknown section \"{header}\"."
            )));
        }

        match header {
            "ENV" => set_once(&mut env_vars, parse_var_list(body)?, header)?,
            "SYS" => set_once(&mut sys_vars, parse_var_list(body)?, header)?,
            "ENVINIT" => set_once(&mut env_init, parse_init_formula(body)?, header)?,
            "SYSINIT" => set_once(&mut sys_init, parse_init_formula(body)?, header)?,
            "ENVTRANS" => env_trans.extend(parse_conjunct_list(body, Gr1Token::Always)?),
            "SYSTRANS" => sys_trans.extend(parse_conjunct_list(body, Gr1Token::Always)?),
            "ENVGOAL" => env_goals.extend(parse_conjunct_list(body, Gr1Token::AlwaysEventually)?),
            "SYSGOAL" => sys_goals.extend(parse_conjunct_list(body, Gr1Token::AlwaysEventually)?),
            _ => unreachable!(), // we already made sure that this is a known section
        }
    }

    let spec = Specification {
        env_vars: env_vars.unwrap_or_default(),
        sys_vars: sys_vars.unwrap_or_default(),
        env_init: env_init.unwrap_or_else(|| Gr1TreeNode::mk_constant(true)),
        sys_init: sys_init.unwrap_or_else(|| Gr1TreeNode::mk_constant(true)),
        env_trans,
        sys_trans,
        env_goals,
        sys_goals,
    };
    validate_specification(&spec)?;
    Ok(spec)
}

/// Remove `#` comments (running to the end of the line) from the specification text.
fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Store a section value, rejecting a repeated declaration of the same section.
fn set_once<T>(slot: &mut Option<T>, value: T, header: &str) -> Result<(), SpecificationError> {
    if slot.is_some() {
        return Err(SpecificationError::Syntax(format!(
            "Section \"{header}\" is declared more than once."
        )));
    }
    *slot = Some(value);
    Ok(())
}

/// Parse a whitespace-separated list of variable names.
fn parse_var_list(body: &str) -> Result<Vec<String>, SpecificationError> {
    let mut names = Vec::new();
    for name in body.split_whitespace() {
        // reuse the tokenizer so that name syntax has a single definition
        let tokens = try_tokenize_formula(name.to_string())?;
        match tokens.as_slice() {
            [Gr1Token::Atom(Atomic::Var(name))] => {
                names.push(name.clone());
            }
            _ => {
                return Err(SpecificationError::Syntax(format!(
                    "Invalid variable name \"{name}\"."
                )));
            }
        }
    }
    Ok(names)
}

/// Parse the body of an `ENVINIT:`/`SYSINIT:` section. An empty body is the constant `1`.
fn parse_init_formula(body: &str) -> Result<Gr1TreeNode, SpecificationError> {
    if body.trim().is_empty() {
        return Ok(Gr1TreeNode::mk_constant(true));
    }
    let tokens = try_tokenize_formula(body.to_string())?;
    parse_gr1_tokens(&tokens)
}

/// Parse the body of a transition or goal section into its list of conjunct trees.
///
/// The body is a sequence of formulas, each introduced by the given `marker` token
/// (`[]` for safety, `[]<>` for liveness) and separated by a top-level `&`. An empty
/// body yields an empty list.
fn parse_conjunct_list(
    body: &str,
    marker: Gr1Token,
) -> Result<Vec<Gr1TreeNode>, SpecificationError> {
    let tokens = try_tokenize_formula(body.to_string())?;
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    if tokens[0] != marker {
        return Err(SpecificationError::Syntax(format!(
            "Expected \"{marker}\" at the start of a conjunct."
        )));
    }

    // every further occurrence of the marker must be preceded by a top-level '&',
    // which acts as the conjunct separator
    let mut conjuncts = Vec::new();
    let mut conjunct_start = 1;
    for i in 1..tokens.len() {
        if tokens[i] != marker {
            continue;
        }
        if i < 2 || tokens[i - 1] != Gr1Token::Binary(BinaryOp::And) {
            return Err(SpecificationError::Syntax(format!(
                "Conjuncts must be separated by '&' before \"{marker}\"."
            )));
        }
        conjuncts.push(parse_gr1_tokens(&tokens[conjunct_start..i - 1])?);
        conjunct_start = i + 1;
    }
    conjuncts.push(parse_gr1_tokens(&tokens[conjunct_start..])?);
    Ok(conjuncts)
}

#[cfg(test)]
mod tests {
    use crate::preprocessing::specification::parse_specification;

    #[test]
    /// Test parsing of a complete well-formed specification.
    fn parse_full_specification() {
        let text = r"
            # a request/acknowledge interface
            ENV: req;
            SYS: ack;

            ENVINIT: !req;
            SYSINIT: !ack;
            ENVTRANS: ;  # no restriction
            SYSTRANS: [](ack' <-> req);
            ENVGOAL: []<> !req;
            SYSGOAL: []<> !ack & []<> 1;
        ";
        let spec = parse_specification(text).unwrap();

        assert_eq!(spec.env_vars, vec!["req".to_string()]);
        assert_eq!(spec.sys_vars, vec!["ack".to_string()]);
        assert_eq!(spec.env_init.to_string(), "(!req)");
        assert_eq!(spec.sys_init.to_string(), "(!ack)");
        assert!(spec.env_trans.is_empty());
        assert_eq!(spec.sys_trans.len(), 1);
        assert_eq!(spec.sys_trans[0].to_string(), "(ack' <-> req)");
        assert_eq!(spec.env_goals.len(), 1);
        assert_eq!(spec.env_goals[0].to_string(), "(!req)");
        assert_eq!(spec.sys_goals.len(), 2);
        assert_eq!(spec.sys_goals[0].to_string(), "(!ack)");
        assert_eq!(spec.sys_goals[1].to_string(), "1");
    }

    #[test]
    /// Test that missing sections default to "no restriction" (or to empty lists).
    fn parse_minimal_specification() {
        let spec = parse_specification("SYS: x; SYSGOAL: []<> x;").unwrap();
        assert!(spec.env_vars.is_empty());
        assert_eq!(spec.env_init.to_string(), "1");
        assert_eq!(spec.sys_init.to_string(), "1");
        assert!(spec.env_trans.is_empty());
        assert!(spec.sys_trans.is_empty());
        assert!(spec.env_goals.is_empty());
        assert_eq!(spec.sys_goals.len(), 1);
    }

    #[test]
    /// Test rejection of malformed specifications.
    fn parse_invalid_specifications() {
        let invalid = vec![
            "FOO: x;",                          // unknown section
            "SYS: x; SYS: y; SYSGOAL: []<> x;", // repeated section
            "SYS: x x'; SYSGOAL: []<> x;",      // invalid variable name
            "SYS: x; SYSGOAL: x;",              // goal without the `[]<>` marker
            "SYS: x; SYSGOAL: []<> x []<> x;",  // missing '&' between conjuncts
            "SYS x; SYSGOAL: []<> x;",          // missing ':' after the section name
        ];
        for text in invalid {
            assert!(parse_specification(text).is_err(), "accepted: {text}");
        }
    }
}
