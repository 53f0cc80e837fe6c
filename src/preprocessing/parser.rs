//! Contains functionality regarding parsing formula tokens into a syntax tree.
//!
//! The operator precedence is following (the lower, the stronger):
//!  - unary negation: 1
//!  - boolean binary operators: and=2, or=3, imp=4, iff=5
//!
//! Implication is right-associative, as is customary.

use crate::errors::SpecificationError;
use crate::preprocessing::gr1_tree::*;
use crate::preprocessing::operator_enums::*;
use crate::preprocessing::tokenizer::{Gr1Token, try_tokenize_formula};

/// Parse a GR(1) formula string representation into an actual formula tree.
/// Basically a wrapper for tokenize+parse (used often for testing/debug purposes).
///
/// The temporal markers `[]` and `[]<>` are not valid inside a plain formula; they are
/// consumed earlier, during the sectioning of the specification file.
pub fn parse_gr1_formula(formula: &str) -> Result<Gr1TreeNode, SpecificationError> {
    let tokens = try_tokenize_formula(formula.to_string())?;
    let tree = parse_gr1_tokens(&tokens)?;
    Ok(tree)
}

/// Utility method to find the first occurrence of a specific token in the token tree.
fn index_of_first(tokens: &[Gr1Token], token: Gr1Token) -> Option<usize> {
    tokens.iter().position(|t| *t == token)
}

/// Utility method to find the first occurrence of an unary operator in the token tree.
fn index_of_first_unary(tokens: &[Gr1Token]) -> Option<usize> {
    tokens.iter().position(|t| matches!(t, Gr1Token::Unary(_)))
}

/// Parse `tokens` of a GR(1) formula into an abstract syntax tree using recursive steps.
pub fn parse_gr1_tokens(tokens: &[Gr1Token]) -> Result<Gr1TreeNode, SpecificationError> {
    parse_1_iff(tokens)
}

/// Recursive parsing step 1: extract `<->` operators.
fn parse_1_iff(tokens: &[Gr1Token]) -> Result<Gr1TreeNode, SpecificationError> {
    let iff_token = index_of_first(tokens, Gr1Token::Binary(BinaryOp::Iff));
    Ok(if let Some(i) = iff_token {
        Gr1TreeNode::mk_binary(
            parse_2_imp(&tokens[..i])?,
            parse_1_iff(&tokens[(i + 1)..])?,
            BinaryOp::Iff,
        )
    } else {
        parse_2_imp(tokens)?
    })
}

/// Recursive parsing step 2: extract `->` operators.
fn parse_2_imp(tokens: &[Gr1Token]) -> Result<Gr1TreeNode, SpecificationError> {
    let imp_token = index_of_first(tokens, Gr1Token::Binary(BinaryOp::Imp));
    Ok(if let Some(i) = imp_token {
        Gr1TreeNode::mk_binary(
            parse_3_or(&tokens[..i])?,
            parse_2_imp(&tokens[(i + 1)..])?,
            BinaryOp::Imp,
        )
    } else {
        parse_3_or(tokens)?
    })
}

/// Recursive parsing step 3: extract `|` operators.
fn parse_3_or(tokens: &[Gr1Token]) -> Result<Gr1TreeNode, SpecificationError> {
    let or_token = index_of_first(tokens, Gr1Token::Binary(BinaryOp::Or));
    Ok(if let Some(i) = or_token {
        Gr1TreeNode::mk_binary(
            parse_4_and(&tokens[..i])?,
            parse_3_or(&tokens[(i + 1)..])?,
            BinaryOp::Or,
        )
    } else {
        parse_4_and(tokens)?
    })
}

/// Recursive parsing step 4: extract `&` operators.
fn parse_4_and(tokens: &[Gr1Token]) -> Result<Gr1TreeNode, SpecificationError> {
    let and_token = index_of_first(tokens, Gr1Token::Binary(BinaryOp::And));
    Ok(if let Some(i) = and_token {
        Gr1TreeNode::mk_binary(
            parse_5_unary(&tokens[..i])?,
            parse_4_and(&tokens[(i + 1)..])?,
            BinaryOp::And,
        )
    } else {
        parse_5_unary(tokens)?
    })
}

/// Recursive parsing step 5: extract negations.
fn parse_5_unary(tokens: &[Gr1Token]) -> Result<Gr1TreeNode, SpecificationError> {
    let unary_token = index_of_first_unary(tokens);
    Ok(if let Some(i) = unary_token {
        // perform check that unary operator is not directly preceded by some atomic sub-formula
        if i > 0 && matches!(&tokens[i - 1], Gr1Token::Atom(..)) {
            return Err(SpecificationError::Syntax(format!(
                "Unary operator can't be directly preceded by {}.",
                &tokens[i - 1]
            )));
        }

        match &tokens[i] {
            Gr1Token::Unary(op) => {
                Gr1TreeNode::mk_unary(parse_5_unary(&tokens[(i + 1)..])?, op.clone())
            }
            _ => unreachable!(), // we already made sure that this is indeed an unary token
        }
    } else {
        parse_6_terminal_and_parentheses(tokens)?
    })
}

/// Recursive parsing step 6: extract terminals and recursively solve sub-formulae in
/// parentheses.
fn parse_6_terminal_and_parentheses(
    tokens: &[Gr1Token],
) -> Result<Gr1TreeNode, SpecificationError> {
    if tokens.is_empty() {
        return Err(SpecificationError::Syntax(
            "Expected formula, found nothing.".to_string(),
        ));
    }
    if tokens.len() > 1 {
        return Err(SpecificationError::Syntax(format!(
            "Unexpected token \"{}\".",
            tokens[1]
        )));
    }
    match &tokens[0] {
        Gr1Token::Atom(atom) => Ok(match atom {
            Atomic::Var(name) => Gr1TreeNode::mk_variable(name),
            Atomic::NextVar(name) => Gr1TreeNode::mk_next_variable(name),
            Atomic::True => Gr1TreeNode::mk_constant(true),
            Atomic::False => Gr1TreeNode::mk_constant(false),
        }),
        Gr1Token::Tokens(inner_tokens) => parse_gr1_tokens(inner_tokens),
        token => Err(SpecificationError::Syntax(format!(
            "Unexpected token \"{token}\"."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::SpecificationError;
    use crate::preprocessing::parser::parse_gr1_formula;

    #[test]
    /// Test whether several valid formulae are parsed with the expected precedence.
    fn parse_valid_formulae() {
        let tree = parse_gr1_formula("a & b | c").unwrap();
        assert_eq!(tree.to_string(), "((a & b) | c)");

        let tree = parse_gr1_formula("!a & b").unwrap();
        assert_eq!(tree.to_string(), "((!a) & b)");

        let tree = parse_gr1_formula("a -> b -> c").unwrap();
        assert_eq!(tree.to_string(), "(a -> (b -> c))");

        let tree = parse_gr1_formula("a <-> b -> c & d'").unwrap();
        assert_eq!(tree.to_string(), "(a <-> (b -> (c & d')))");

        let tree = parse_gr1_formula("(a | 0) & (1 -> b')").unwrap();
        assert_eq!(tree.to_string(), "((a | 0) & (1 -> b'))");
    }

    #[test]
    /// Test parsing of several invalid formulae.
    fn parse_invalid_formulae() {
        let invalid = vec![
            "a &",
            "& a",
            "a b",
            "a ! b",
            "a & & b",
            "()",
            "",
            "a -> [] b",
        ];
        for formula in invalid {
            assert!(parse_gr1_formula(formula).is_err());
        }
    }

    #[test]
    /// Test that error for an invalid constant propagates from the tokenizer.
    fn parse_invalid_constant() {
        let result = parse_gr1_formula("a & 42");
        assert_eq!(
            result.err().unwrap(),
            SpecificationError::InvalidConstant("42".to_string())
        );
    }
}
