//! Components responsible for tokenizing and parsing GR(1) specifications, and for
//! manipulating the propositional syntax trees they are made of.

/// **(internal)** Utilities for searching and validating variable names in syntax trees.
pub mod utils;

/// Syntax trees of propositional formulas over current and next-step variables.
pub mod gr1_tree;
/// Enums for the operators and atoms that may appear in a formula.
pub mod operator_enums;
/// Parser turning token lists into syntax trees.
pub mod parser;
/// Loading of specification text from files or standard input.
pub mod read_inputs;
/// The specification value assembled from the individual sections of an input file.
pub mod specification;
/// Tokenizer turning formula strings into token lists.
pub mod tokenizer;
