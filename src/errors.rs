//! Typed error values shared across the whole synthesis pipeline.
//!
//! Unrealizability is deliberately *not* represented here. It is a legitimate outcome of
//! the game computation and is reported through an empty winning set (or a `None`
//! strategy), never through an error value.

use std::fmt;

/// Errors caused by the input specification itself: syntax problems, unknown or duplicate
/// variable names, or atoms used in a place where they are not allowed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SpecificationError {
    /// The input text does not follow the specification grammar.
    Syntax(String),
    /// A formula refers to a name that no `ENV:`/`SYS:` section declares.
    UnknownVariable(String),
    /// The same name is declared for both players, or twice for one of them.
    DuplicateVariable(String),
    /// A primed atom appears in a formula class restricted to the current step.
    UnexpectedNextVariable { name: String, context: &'static str },
    /// An integer constant other than `0` or `1`.
    InvalidConstant(String),
}

impl fmt::Display for SpecificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecificationError::Syntax(message) => write!(f, "Syntax error: {message}"),
            SpecificationError::UnknownVariable(name) => {
                write!(f, "There is no declared variable named {name}.")
            }
            SpecificationError::DuplicateVariable(name) => {
                write!(f, "Variable {name} is declared more than once.")
            }
            SpecificationError::UnexpectedNextVariable { name, context } => write!(
                f,
                "Next-step variable {name}' is not allowed in {context} formulas."
            ),
            SpecificationError::InvalidConstant(value) => {
                write!(f, "Constant {value} is outside {{0, 1}}.")
            }
        }
    }
}

impl std::error::Error for SpecificationError {}

/// Errors raised while solving the game or extracting a strategy.
///
/// `Engine` covers failures of the BDD collaborator (the only non-logical failure mode of
/// the fixpoint computation). `Extract` signals a violated internal invariant during
/// strategy extraction, which indicates a bug rather than a problem with the
/// specification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SynthesisError {
    /// The specification was rejected before or during encoding.
    Specification(SpecificationError),
    /// The BDD collaborator cannot carry out the computation.
    Engine(String),
    /// Strategy extraction found a winning state without an admissible move.
    Extract { state: String, mode: usize },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::Specification(error) => write!(f, "{error}"),
            SynthesisError::Engine(message) => {
                write!(f, "BDD collaborator failure: {message}")
            }
            SynthesisError::Extract { state, mode } => write!(
                f,
                "No admissible move for winning state {state} in mode {mode}; this is a bug."
            ),
        }
    }
}

impl std::error::Error for SynthesisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthesisError::Specification(error) => Some(error),
            _ => None,
        }
    }
}

impl From<SpecificationError> for SynthesisError {
    fn from(error: SpecificationError) -> Self {
        SynthesisError::Specification(error)
    }
}
