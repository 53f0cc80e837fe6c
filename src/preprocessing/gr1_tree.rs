//! A syntax tree struct for GR(1) propositional formulas and functionality for its
//! manipulation.

use crate::errors::SpecificationError;
use crate::preprocessing::operator_enums::*;
use crate::preprocessing::parser::parse_gr1_tokens;
use crate::preprocessing::tokenizer::Gr1Token;

use rand::prelude::StdRng;
use rand::{RngCore, SeedableRng};
use std::cmp;
use std::fmt;

/// Enum of possible node data types in a formula syntax tree.
///
/// In particular, a node type can be:
///     - A "terminal" node, containing a single atomic value (variable, constant, ...).
///     - A "unary" node, with a `UnaryOp` and a sub-formula.
///     - A "binary" node, with a `BinaryOp` and two sub-formulae.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum NodeType {
    Terminal(Atomic),
    Unary(UnaryOp, Box<Gr1TreeNode>),
    Binary(BinaryOp, Box<Gr1TreeNode>, Box<Gr1TreeNode>),
}

/// A single node in a syntax tree of a GR(1) formula.
///
/// Each node tracks its:
///     - `formula_str`; A canonical string representation of the formula, used for
///       display and for equality-insensitive debugging output.
///     - `height`; A positive integer starting from 0 (for atomic values).
///     - `node_type`; A collection of node data represented through `NodeType`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Gr1TreeNode {
    pub formula_str: String,
    pub height: u32,
    pub node_type: NodeType,
}

impl Gr1TreeNode {
    /// "Parse" a new [Gr1TreeNode] from a list of [Gr1Token] objects.
    ///
    /// Note that this is a very "low-level" function. Unless you know what you are doing,
    /// you should probably use some of the functions in [crate::preprocessing::parser]
    /// instead.
    pub fn from_tokens(tokens: &[Gr1Token]) -> Result<Gr1TreeNode, SpecificationError> {
        parse_gr1_tokens(tokens)
    }

    /// Create a "unary" [Gr1TreeNode] from the given arguments.
    ///
    /// See also [NodeType::Unary].
    pub fn mk_unary(child: Gr1TreeNode, op: UnaryOp) -> Gr1TreeNode {
        Gr1TreeNode {
            formula_str: format!("({op}{child})"),
            height: child.height + 1,
            node_type: NodeType::Unary(op, Box::new(child)),
        }
    }

    /// Create a "binary" [Gr1TreeNode] from the given arguments.
    ///
    /// See also [NodeType::Binary].
    pub fn mk_binary(left: Gr1TreeNode, right: Gr1TreeNode, op: BinaryOp) -> Gr1TreeNode {
        Gr1TreeNode {
            formula_str: format!("({left} {op} {right})"),
            height: cmp::max(left.height, right.height) + 1,
            node_type: NodeType::Binary(op, Box::new(left), Box::new(right)),
        }
    }

    /// Create a [Gr1TreeNode] representing a Boolean constant.
    ///
    /// See also [NodeType::Terminal] and [Atomic::True] / [Atomic::False].
    pub fn mk_constant(constant_val: bool) -> Gr1TreeNode {
        Self::mk_atom(Atomic::from(constant_val))
    }

    /// Create a [Gr1TreeNode] representing a current-step variable.
    ///
    /// See also [NodeType::Terminal] and [Atomic::Var].
    pub fn mk_variable(var_name: &str) -> Gr1TreeNode {
        Self::mk_atom(Atomic::Var(var_name.to_string()))
    }

    /// Create a [Gr1TreeNode] representing a next-step variable.
    ///
    /// See also [NodeType::Terminal] and [Atomic::NextVar].
    pub fn mk_next_variable(var_name: &str) -> Gr1TreeNode {
        Self::mk_atom(Atomic::NextVar(var_name.to_string()))
    }

    /// A helper function which creates a new [Gr1TreeNode] for the given [Atomic] value.
    fn mk_atom(atom: Atomic) -> Gr1TreeNode {
        Gr1TreeNode {
            formula_str: atom.to_string(),
            height: 0,
            node_type: NodeType::Terminal(atom),
        }
    }

    /// Fold a list of formulas into a single conjunction tree.
    ///
    /// An empty list becomes the constant `1`, which is the "no restriction" formula.
    pub fn mk_conjunction(conjuncts: Vec<Gr1TreeNode>) -> Gr1TreeNode {
        let mut iter = conjuncts.into_iter();
        let Some(first) = iter.next() else {
            return Self::mk_constant(true);
        };
        iter.fold(first, |acc, right| {
            Self::mk_binary(acc, right, BinaryOp::And)
        })
    }

    /// The number of nodes in this syntax tree.
    pub fn size(&self) -> usize {
        match &self.node_type {
            NodeType::Terminal(_) => 1,
            NodeType::Unary(_, child) => 1 + child.size(),
            NodeType::Binary(_, left, right) => 1 + left.size() + right.size(),
        }
    }

    /// In-order traversal of the tree, calling `visit` at every node. The traversal
    /// stops at the first error the visitor returns.
    pub fn traverse<E>(
        &self,
        visit: &mut impl FnMut(&Gr1TreeNode) -> Result<(), E>,
    ) -> Result<(), E> {
        match &self.node_type {
            NodeType::Terminal(_) => visit(self),
            NodeType::Unary(_, child) => {
                child.traverse(visit)?;
                visit(self)
            }
            NodeType::Binary(_, left, right) => {
                left.traverse(visit)?;
                visit(self)?;
                right.traverse(visit)
            }
        }
    }

    /// Create a new random tree containing Boolean operations and variables. The
    /// `tree_height` is the number of levels in the tree (not counting random negation
    /// nodes between each "level"). The number of leaves will be `2^tree_height`.
    pub fn new_random_boolean(
        tree_height: u8,
        variables: &Vec<String>,
        seed: u64,
    ) -> Gr1TreeNode {
        let num_vars = variables.len() as u32;
        let mut rand = StdRng::seed_from_u64(seed);

        if tree_height == 1 {
            let var_index = rand.next_u32() % num_vars;
            let var = variables.get(var_index as usize).unwrap();
            return Gr1TreeNode::mk_variable(var);
        }

        let binary_op = match rand.next_u32() % 4 {
            0 => BinaryOp::And,
            1 => BinaryOp::Or,
            2 => BinaryOp::Imp,
            _ => BinaryOp::Iff,
        };

        let binary_node = Gr1TreeNode::mk_binary(
            Gr1TreeNode::new_random_boolean(tree_height - 1, variables, rand.next_u64()),
            Gr1TreeNode::new_random_boolean(tree_height - 1, variables, rand.next_u64()),
            binary_op,
        );

        let negate = rand.next_u32() % 2 == 0;
        if negate {
            Gr1TreeNode::mk_unary(binary_node, UnaryOp::Not)
        } else {
            binary_node
        }
    }
}

impl Gr1TreeNode {
    pub fn as_str(&self) -> &str {
        self.formula_str.as_str()
    }
}

impl fmt::Display for Gr1TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.formula_str)
    }
}

#[cfg(test)]
mod tests {
    use crate::preprocessing::gr1_tree::Gr1TreeNode;
    use crate::preprocessing::operator_enums::BinaryOp;
    use crate::preprocessing::tokenizer::try_tokenize_formula;

    #[test]
    /// Test creation, size computation, and display of formula tree nodes.
    fn tree_generating() {
        // formula containing all kinds of operators and terminals
        let formula1 = "(a & !b') | (1 -> (c <-> 0))".to_string();
        // much shorter formula to generate shallower tree
        let formula2 = "!x -> y'".to_string();

        // Test that generating trees from token lists works:
        let tokens1 = try_tokenize_formula(formula1).unwrap();
        let tokens2 = try_tokenize_formula(formula2).unwrap();
        let node1 = Gr1TreeNode::from_tokens(&tokens1).unwrap();
        let node2 = Gr1TreeNode::from_tokens(&tokens2).unwrap();

        // Test display:
        let node1_str = "((a & (!b')) | (1 -> (c <-> 0)))";
        let node2_str = "((!x) -> y')";
        assert_eq!(node1.to_string(), node1_str.to_string());
        assert_eq!(node2.to_string(), node2_str.to_string());

        assert_eq!(node1.size(), 10);
        assert_eq!(node2.size(), 4);

        // an in-order traversal visits every node exactly once
        let mut visited = 0;
        let result: Result<(), ()> = node1.traverse(&mut |_| {
            visited += 1;
            Ok(())
        });
        result.unwrap();
        assert_eq!(visited, node1.size());

        // Check that display output can be parsed back to an equal tree (tokens could
        // differ due to extra parentheses).
        let tokens11 = try_tokenize_formula(node1.to_string()).unwrap();
        let tokens22 = try_tokenize_formula(node2.to_string()).unwrap();
        let node11 = Gr1TreeNode::from_tokens(&tokens11).unwrap();
        let node22 = Gr1TreeNode::from_tokens(&tokens22).unwrap();
        assert_eq!(node1, node11);
        assert_eq!(node2, node22);
    }

    #[test]
    /// Test folding lists of safety conjuncts into a single tree.
    fn conjunction_folding() {
        let a = Gr1TreeNode::mk_variable("a");
        let b = Gr1TreeNode::mk_variable("b");
        let c = Gr1TreeNode::mk_variable("c");

        let merged = Gr1TreeNode::mk_conjunction(vec![a.clone(), b.clone(), c]);
        assert_eq!(merged.to_string(), "((a & b) & c)");

        let single = Gr1TreeNode::mk_conjunction(vec![a.clone()]);
        assert_eq!(single, a);

        // An empty conjunct list means "no restriction".
        let empty = Gr1TreeNode::mk_conjunction(Vec::new());
        assert_eq!(empty, Gr1TreeNode::mk_constant(true));
    }

    #[test]
    /// Test that the seeded random tree generator is deterministic.
    fn random_tree_deterministic() {
        let vars = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let tree1 = Gr1TreeNode::new_random_boolean(4, &vars, 13);
        let tree2 = Gr1TreeNode::new_random_boolean(4, &vars, 13);
        assert_eq!(tree1, tree2);

        let conjunction = Gr1TreeNode::mk_binary(tree1.clone(), tree2, BinaryOp::And);
        assert_eq!(conjunction.height, tree1.height + 1);

        // A different seed must (for this configuration) give a different tree.
        let tree3 = Gr1TreeNode::new_random_boolean(4, &vars, 14);
        assert_ne!(tree1, tree3);
    }
}
