//! The strategy automaton: a flat collection of nodes addressed by integer id, each
//! labeled with a state assignment, the system goal currently pursued, and the rank the
//! state had in the fixpoint computation.

use std::collections::HashMap;
use std::io::{self, Write};

/// Render a bit vector as a compact `0`/`1` string.
pub fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

/// A single node of a strategy automaton.
///
/// The `state` vector holds the values of all declared variables, environment first.
/// The `mode` is the index of the system goal currently pursued; it increments (mod the
/// number of goals) exactly at nodes whose state satisfies the pursued goal. The `rank`
/// is the fixpoint iteration at which the state first became winning for its mode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyNode {
    pub state: Vec<bool>,
    pub mode: usize,
    pub rank: usize,
    pub successors: Vec<usize>,
}

/// A directed graph of [StrategyNode]s, addressed by insertion-order ids.
///
/// Nodes are keyed by their `(state, mode)` pair; the pair is unique across the
/// automaton and [StrategyAutomaton::find] recovers the id of an existing node.
#[derive(Clone, Debug, Default)]
pub struct StrategyAutomaton {
    nodes: Vec<StrategyNode>,
    index: HashMap<(Vec<bool>, usize), usize>,
}

impl StrategyAutomaton {
    pub fn new() -> StrategyAutomaton {
        StrategyAutomaton::default()
    }

    /// The number of nodes in the automaton.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a new node and return its id. Panics when a node with the same
    /// `(state, mode)` key already exists; use [StrategyAutomaton::find] first.
    pub fn new_node(&mut self, state: Vec<bool>, mode: usize, rank: usize) -> usize {
        let id = self.nodes.len();
        let previous = self.index.insert((state.clone(), mode), id);
        assert!(previous.is_none(), "duplicate automaton node");
        self.nodes.push(StrategyNode {
            state,
            mode,
            rank,
            successors: Vec::new(),
        });
        id
    }

    /// Append an edge between two existing nodes. Duplicate edges are suppressed; the
    /// successor order is otherwise the insertion order.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        let successors = &mut self.nodes[from].successors;
        if !successors.contains(&to) {
            successors.push(to);
        }
    }

    /// Find the id of the node with the given `(state, mode)` key.
    pub fn find(&self, state: &[bool], mode: usize) -> Option<usize> {
        self.index.get(&(state.to_vec(), mode)).copied()
    }

    /// Access a node by id.
    pub fn node(&self, id: usize) -> &StrategyNode {
        &self.nodes[id]
    }

    /// Iterate over `(id, node)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &StrategyNode)> {
        self.nodes.iter().enumerate()
    }

    /// Dump the automaton in the plain text format: one node per line, as
    /// `id state_bits mode rank -> successor_ids`.
    pub fn dump_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (id, node) in self.iter() {
            write!(
                out,
                "{} {} {} {}",
                id,
                bits_to_string(&node.state),
                node.mode,
                node.rank
            )?;
            write!(out, " ->")?;
            for successor in &node.successors {
                write!(out, " {successor}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Dump the automaton in the Tulip-style labeled format: the state of each node is
    /// expanded into `name:value` pairs using the declared variable names, environment
    /// variables first.
    pub fn dump_labeled<W: Write>(
        &self,
        out: &mut W,
        env_vars: &[String],
        sys_vars: &[String],
    ) -> io::Result<()> {
        for (id, node) in self.iter() {
            write!(out, "{id}")?;
            for (name, bit) in env_vars.iter().chain(sys_vars.iter()).zip(node.state.iter()) {
                write!(out, " {}:{}", name, u8::from(*bit))?;
            }
            write!(out, " {} {}", node.mode, node.rank)?;
            write!(out, " ->")?;
            for successor in &node.successors {
                write!(out, " {successor}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::{StrategyAutomaton, bits_to_string};

    fn two_node_automaton() -> StrategyAutomaton {
        let mut automaton = StrategyAutomaton::new();
        let n0 = automaton.new_node(vec![false, true], 0, 1);
        let n1 = automaton.new_node(vec![true, true], 1, 0);
        automaton.add_edge(n0, n1);
        automaton.add_edge(n0, n1); // duplicate, must be suppressed
        automaton.add_edge(n1, n0);
        automaton.add_edge(n1, n1);
        automaton
    }

    #[test]
    /// Test node creation, lookup, and duplicate edge suppression.
    fn build_and_find() {
        let automaton = two_node_automaton();
        assert_eq!(automaton.node_count(), 2);
        assert_eq!(automaton.find(&[false, true], 0), Some(0));
        // the same state under a different mode is a different node
        assert_eq!(automaton.find(&[false, true], 1), None);
        assert_eq!(automaton.node(0).successors, vec![1]);
        assert_eq!(automaton.node(1).successors, vec![0, 1]);
    }

    #[test]
    /// Test the plain text dump format.
    fn text_dump() {
        let automaton = two_node_automaton();
        let mut out = Vec::new();
        automaton.dump_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "0 01 0 1 -> 1\n1 11 1 0 -> 0 1\n");
    }

    #[test]
    /// Test the labeled Tulip-style dump format.
    fn labeled_dump() {
        let automaton = two_node_automaton();
        let mut out = Vec::new();
        automaton
            .dump_labeled(&mut out, &["req".to_string()], &["ack".to_string()])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "0 req:0 ack:1 0 1 -> 1\n1 req:1 ack:1 1 0 -> 0 1\n");
    }

    #[test]
    fn bit_strings() {
        assert_eq!(bits_to_string(&[true, false, true]), "101");
        assert_eq!(bits_to_string(&[]), "");
    }
}
