//! Contains functionality regarding the tokenizing of GR(1) formula strings.

use crate::errors::SpecificationError;
use crate::preprocessing::operator_enums::*;

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Enum of all possible tokens occurring in a GR(1) specification formula string.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Gr1Token {
    /// Unary operator: '!'.
    Unary(UnaryOp),
    /// Binary operators: '&', '|', '->', '<->'.
    Binary(BinaryOp),
    /// Variable, primed variable, or '0'/'1' constant.
    Atom(Atomic),
    /// The temporal safety marker '[]' introducing a transition conjunct.
    Always,
    /// The temporal liveness marker '[]<>' introducing a goal conjunct.
    AlwaysEventually,
    /// A block of tokens inside parentheses.
    Tokens(Vec<Gr1Token>),
}

/// Try to tokenize given GR(1) formula string.
///
/// This is a wrapper for the (more general) recursive [try_tokenize_recursive] function.
pub fn try_tokenize_formula(formula: String) -> Result<Vec<Gr1Token>, SpecificationError> {
    try_tokenize_recursive(&mut formula.chars().peekable(), true)
}

/// Process a peekable iterator of characters into a vector of [Gr1Token]s.
fn try_tokenize_recursive(
    input_chars: &mut Peekable<Chars>,
    top_level: bool,
) -> Result<Vec<Gr1Token>, SpecificationError> {
    let mut output = Vec::new();

    while let Some(c) = input_chars.next() {
        match c {
            c if c.is_whitespace() => {} // skip whitespace
            '!' => output.push(Gr1Token::Unary(UnaryOp::Not)),
            '&' => output.push(Gr1Token::Binary(BinaryOp::And)),
            '|' => output.push(Gr1Token::Binary(BinaryOp::Or)),
            '-' => {
                if Some('>') == input_chars.next() {
                    output.push(Gr1Token::Binary(BinaryOp::Imp));
                } else {
                    return Err(syntax("Expected '>' after '-'."));
                }
            }
            '<' => {
                if Some('-') == input_chars.next() {
                    if Some('>') == input_chars.next() {
                        output.push(Gr1Token::Binary(BinaryOp::Iff));
                    } else {
                        return Err(syntax("Expected '>' after '<-'."));
                    }
                } else {
                    return Err(syntax("Expected '-' after '<'."));
                }
            }
            // '>' is invalid as a start of a token
            '>' => return Err(syntax("Unexpected '>'.")),
            '[' => {
                if Some(']') != input_chars.next() {
                    return Err(syntax("Expected ']' after '['."));
                }
                // a '[]' directly followed by '<>' is the liveness marker
                if input_chars.peek() == Some(&'<') {
                    input_chars.next();
                    if Some('>') != input_chars.next() {
                        return Err(syntax("Expected '>' after '[]<'."));
                    }
                    output.push(Gr1Token::AlwaysEventually);
                } else {
                    output.push(Gr1Token::Always);
                }
            }
            ')' => {
                return if !top_level {
                    Ok(output)
                } else {
                    Err(syntax("Unexpected ')'."))
                };
            }
            '(' => {
                // start a nested token group
                let token_group = try_tokenize_recursive(input_chars, false)?;
                output.push(Gr1Token::Tokens(token_group));
            }
            c if c.is_ascii_digit() => {
                let number = collect_number(input_chars, c);
                match number.as_str() {
                    "0" => output.push(Gr1Token::Atom(Atomic::False)),
                    "1" => output.push(Gr1Token::Atom(Atomic::True)),
                    _ => return Err(SpecificationError::InvalidConstant(number)),
                }
            }
            c if is_valid_start_of_name(c) => {
                let name = collect_name(input_chars, c);
                // a trailing prime turns the name into a next-step variable
                if input_chars.peek() == Some(&'\'') {
                    input_chars.next();
                    output.push(Gr1Token::Atom(Atomic::NextVar(name)));
                } else {
                    output.push(Gr1Token::Atom(Atomic::Var(name)));
                }
            }
            _ => return Err(syntax(&format!("Unexpected character '{c}'."))),
        }
    }

    if top_level {
        Ok(output)
    } else {
        Err(syntax("Expected ')' to previously encountered '('."))
    }
}

fn syntax(message: &str) -> SpecificationError {
    SpecificationError::Syntax(message.to_string())
}

/// Check if given char can appear at the start of a variable name.
fn is_valid_start_of_name(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Check if given char can appear inside a variable name.
fn is_valid_in_name(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Collect a variable name from the input characters, starting with `first`.
fn collect_name(input_chars: &mut Peekable<Chars>, first: char) -> String {
    let mut name = String::from(first);
    while let Some(c) = input_chars.peek() {
        if !is_valid_in_name(*c) {
            break;
        }
        name.push(*c);
        input_chars.next();
    }
    name
}

/// Collect a sequence of digits from the input characters, starting with `first`.
fn collect_number(input_chars: &mut Peekable<Chars>, first: char) -> String {
    let mut number = String::from(first);
    while let Some(c) = input_chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        number.push(*c);
        input_chars.next();
    }
    number
}

impl fmt::Display for Gr1Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Gr1Token::Unary(op) => write!(f, "{op}"),
            Gr1Token::Binary(op) => write!(f, "{op}"),
            Gr1Token::Atom(atom) => write!(f, "{atom}"),
            Gr1Token::Always => write!(f, "[]"),
            Gr1Token::AlwaysEventually => write!(f, "[]<>"),
            Gr1Token::Tokens(_) => write!(f, "(...)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::SpecificationError;
    use crate::preprocessing::operator_enums::*;
    use crate::preprocessing::tokenizer::{Gr1Token, try_tokenize_formula};

    #[test]
    /// Test tokenization of a well-formed formula with all operators and atoms.
    fn tokenize_valid_formula() {
        let formula = "(a & b') -> !(c | 0) <-> 1".to_string();
        let tokens = try_tokenize_formula(formula).unwrap();
        let expected = vec![
            Gr1Token::Tokens(vec![
                Gr1Token::Atom(Atomic::Var("a".to_string())),
                Gr1Token::Binary(BinaryOp::And),
                Gr1Token::Atom(Atomic::NextVar("b".to_string())),
            ]),
            Gr1Token::Binary(BinaryOp::Imp),
            Gr1Token::Unary(UnaryOp::Not),
            Gr1Token::Tokens(vec![
                Gr1Token::Atom(Atomic::Var("c".to_string())),
                Gr1Token::Binary(BinaryOp::Or),
                Gr1Token::Atom(Atomic::False),
            ]),
            Gr1Token::Binary(BinaryOp::Iff),
            Gr1Token::Atom(Atomic::True),
        ];
        assert_eq!(tokens, expected);
    }

    #[test]
    /// Test tokenization of the temporal markers used at conjunct heads.
    fn tokenize_temporal_markers() {
        let tokens = try_tokenize_formula("[] x & []<> y'".to_string()).unwrap();
        let expected = vec![
            Gr1Token::Always,
            Gr1Token::Atom(Atomic::Var("x".to_string())),
            Gr1Token::Binary(BinaryOp::And),
            Gr1Token::AlwaysEventually,
            Gr1Token::Atom(Atomic::NextVar("y".to_string())),
        ];
        assert_eq!(tokens, expected);
    }

    #[test]
    /// Test that invalid tokens are rejected with sensible errors.
    fn tokenize_invalid_formulae() {
        let invalid = vec!["a - b", "a <> b", "a > b", "(a & b", "a ) b", "a @ b", "[x"];
        for formula in invalid {
            assert!(try_tokenize_formula(formula.to_string()).is_err());
        }

        // constants other than 0/1 are a specification error of their own kind
        let result = try_tokenize_formula("a & 2".to_string());
        assert_eq!(
            result.err().unwrap(),
            SpecificationError::InvalidConstant("2".to_string())
        );
    }
}
