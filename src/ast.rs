//! Abstract syntax tree for a parsed pattern.
//!
//! Nodes don't own their children directly; they hold integer indices into
//! two arenas owned by [`Ast`]. This keeps the tree acyclic-by-construction
//! and lets the whole thing be dropped in one shot once the compiler is
//! done with it.

/// A single AST node. Dispatch throughout the compiler is a match on this
/// tag, never virtual calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The whole pattern; payload is the index of the top-level node list.
    Regex(usize),
    /// A single literal byte.
    Literal(u8),
    /// `\d` / `\D`.
    Digit { negate: bool },
    /// `\s` / `\S`.
    Whitespace { negate: bool },
    /// `\w` / `\W`.
    Word { negate: bool },
    /// `.`
    Wildcard,
    /// `a-b` inside a class, `a <= b`.
    Range { start: u8, end: u8 },
    /// `[...]` or `[^...]`; payload is the node-list index holding the
    /// class members (only `Literal`/`Digit`/`Whitespace`/`Word`/`Range`
    /// are legal members) and whether the class is negated.
    List { nodes: usize, negate: bool },
    /// `a|b`; payloads are node-list indices for each branch.
    Alternation { left: usize, right: usize },
    /// `(...)`; payload is the node-list index of the group body and its
    /// dense, zero-based capture index.
    Group { nodes: usize, group_index: usize },
    /// `x?`
    ZeroOrOne { greedy: bool, orphan: usize },
    /// `x*`
    ZeroOrMore { greedy: bool, orphan: usize },
    /// `x+`
    OneOrMore { greedy: bool, orphan: usize },
    /// `$`
    EndOfInput,
}

/// The parsed tree: a root node plus the two arenas it and its descendants
/// index into.
#[derive(Debug, Clone)]
pub struct Ast {
    /// The root of the tree, always `Node::Regex(_)`.
    pub root: Node,
    /// Ordered sibling sequences, indexed by `Node::{Regex,List,Alternation,Group}`
    /// payloads.
    pub node_lists: Vec<Vec<Node>>,
    /// Nodes that are the sole child of a quantifier, indexed by
    /// `Node::{ZeroOrOne,ZeroOrMore,OneOrMore}::orphan`.
    pub orphan_nodes: Vec<Node>,
}

impl Ast {
    pub fn node_list(&self, idx: usize) -> &[Node] {
        &self.node_lists[idx]
    }

    pub fn orphan(&self, idx: usize) -> &Node {
        &self.orphan_nodes[idx]
    }

    /// The node-list index the root points at.
    pub fn root_list(&self) -> usize {
        match self.root {
            Node::Regex(idx) => idx,
            _ => unreachable!("Ast::root is always Node::Regex"),
        }
    }

    /// Dump the arenas in `{:3}: {:?}` form.
    pub(crate) fn debug_print(&self) {
        println!("root: {:?}", self.root);
        for (i, list) in self.node_lists.iter().enumerate() {
            println!("node_lists[{:3}]: {:?}", i, list);
        }
        for (i, node) in self.orphan_nodes.iter().enumerate() {
            println!("orphan_nodes[{:3}]: {:?}", i, node);
        }
    }
}
