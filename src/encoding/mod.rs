//! Symbolic encoding of the two-player game: BDD variable allocation, the formula
//! compiler, and low-level helpers for moving between states and BDD cubes.

/// Compilation of formula trees (and whole specifications) into BDDs.
pub mod compile;
/// The symbolic context holding the interleaved BDD variable ordering.
pub mod symbolic_context;
