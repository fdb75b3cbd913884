//! Lowers an [`Ast`] into a graph of instruction blocks.
//!
//! Compilation is a recursive post-order walk: each lowering rule returns
//! the index of the block where control flow continues after the
//! construct it just emitted ("the next block"), the same shape the VM
//! later walks at match time.

use std::collections::HashMap;

use crate::ast::{Ast, Node};

/// A single VM instruction. Block targets are indices into [`Program::blocks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Char(u8),
    Wildcard,
    Whitespace { negate: bool },
    Word { negate: bool },
    Digit { negate: bool },
    Range(u8, u8),
    List { idx: usize, negate: bool },
    EndOfInput,
    StartOfInput,
    StartCapture(usize),
    EndCapture(usize),
    Jump(usize),
    Split(usize, usize),
    Progress(usize),
    End,
}

/// A single member of a compiled character class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Char(u8),
    Range(u8, u8),
    Whitespace { negate: bool },
    Word { negate: bool },
    Digit { negate: bool },
}

/// A basic block: a straight-line sequence of ops, referenced by index
/// from `Jump`/`Split` targets elsewhere in the graph.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub ops: Vec<Op>,
}

/// The compiled form of a pattern: a block graph plus the character-class
/// arena the `List` op indexes into. Entry point is always block `0`.
#[derive(Debug, Clone)]
pub struct Program {
    pub blocks: Vec<Block>,
    pub lists: Vec<Vec<ListItem>>,
    pub num_groups: usize,
}

impl Program {
    /// Dump blocks in `{:3}: {:?}` form.
    pub(crate) fn debug_print(&self) {
        for (i, block) in self.blocks.iter().enumerate() {
            println!("block {:3}:", i);
            for (j, op) in block.ops.iter().enumerate() {
                println!("  {:3}: {:?}", j, op);
            }
        }
        for (i, list) in self.lists.iter().enumerate() {
            println!("list {:3}: {:?}", i, list);
        }
    }
}

struct Compiler {
    blocks: Vec<Block>,
    lists: Vec<Vec<ListItem>>,
    num_groups: usize,
    progress_counter: usize,
}

impl Compiler {
    fn new() -> Self {
        Compiler {
            blocks: Vec::new(),
            lists: Vec::new(),
            num_groups: 0,
            progress_counter: 0,
        }
    }

    fn create_block(&mut self) -> usize {
        self.blocks.push(Block::default());
        self.blocks.len() - 1
    }

    fn push(&mut self, block: usize, op: Op) {
        self.blocks[block].ops.push(op);
    }

    fn next_progress_id(&mut self) -> usize {
        let id = self.progress_counter;
        self.progress_counter += 1;
        id
    }

    /// Compile every node of a node-list in order, threading the "current
    /// block" through the sequence.
    fn compile_sequence(&mut self, ast: &Ast, list_idx: usize, mut current: usize) -> usize {
        for node in ast.node_list(list_idx) {
            current = self.compile_node(ast, node, current);
        }
        current
    }

    fn list_item(&self, ast: &Ast, node: &Node) -> ListItem {
        match *node {
            Node::Literal(b) => ListItem::Char(b),
            Node::Range { start, end } => ListItem::Range(start, end),
            Node::Whitespace { negate } => ListItem::Whitespace { negate },
            Node::Word { negate } => ListItem::Word { negate },
            Node::Digit { negate } => ListItem::Digit { negate },
            ref other => {
                let _ = ast;
                panic!("illegal character class member in AST: {:?}", other)
            }
        }
    }

    fn compile_node(&mut self, ast: &Ast, node: &Node, current: usize) -> usize {
        match *node {
            Node::Literal(b) => {
                self.push(current, Op::Char(b));
                current
            }
            Node::Digit { negate } => {
                self.push(current, Op::Digit { negate });
                current
            }
            Node::Whitespace { negate } => {
                self.push(current, Op::Whitespace { negate });
                current
            }
            Node::Word { negate } => {
                self.push(current, Op::Word { negate });
                current
            }
            Node::Wildcard => {
                self.push(current, Op::Wildcard);
                current
            }
            Node::Range { start, end } => {
                self.push(current, Op::Range(start, end));
                current
            }
            Node::EndOfInput => {
                self.push(current, Op::EndOfInput);
                current
            }
            Node::List { nodes, negate } => {
                let items: Vec<ListItem> = ast
                    .node_list(nodes)
                    .iter()
                    .map(|n| self.list_item(ast, n))
                    .collect();
                self.lists.push(items);
                let idx = self.lists.len() - 1;
                let next = self.create_block();
                self.push(current, Op::List { idx, negate });
                self.push(current, Op::Jump(next));
                next
            }
            Node::Group { nodes, group_index } => {
                self.num_groups = self.num_groups.max(group_index + 1);
                let content = self.create_block();
                let end_cap = self.create_block();
                let next = self.create_block();
                self.push(current, Op::StartCapture(group_index));
                self.push(current, Op::Jump(content));
                let term = self.compile_sequence(ast, nodes, content);
                self.push(term, Op::Jump(end_cap));
                self.push(end_cap, Op::EndCapture(group_index));
                self.push(end_cap, Op::Jump(next));
                next
            }
            Node::Alternation { left, right } => {
                let next = self.create_block();
                let left_blk = self.create_block();
                let right_blk = self.create_block();
                let lterm = self.compile_sequence(ast, left, left_blk);
                self.push(lterm, Op::Jump(next));
                let rterm = self.compile_sequence(ast, right, right_blk);
                self.push(rterm, Op::Jump(next));
                self.push(current, Op::Split(left_blk, right_blk));
                next
            }
            Node::OneOrMore { greedy, orphan } => {
                let content = self.create_block();
                let child = ast.orphan(orphan).clone();
                let child_term = self.compile_node(ast, &child, content);
                self.push(current, Op::Jump(content));
                let loop_blk = self.create_block();
                self.push(child_term, Op::Jump(loop_blk));
                let next = self.create_block();
                if greedy {
                    self.push(loop_blk, Op::Split(content, next));
                } else {
                    self.push(loop_blk, Op::Split(next, content));
                }
                next
            }
            Node::ZeroOrOne { greedy, orphan } => {
                let q = self.create_block();
                let content = self.create_block();
                let next = self.create_block();
                self.push(current, Op::Jump(q));
                if greedy {
                    self.push(q, Op::Split(content, next));
                } else {
                    self.push(q, Op::Split(next, content));
                }
                let child = ast.orphan(orphan).clone();
                let term = self.compile_node(ast, &child, content);
                self.push(term, Op::Jump(next));
                next
            }
            Node::ZeroOrMore { greedy, orphan } => {
                let q = self.create_block();
                let content = self.create_block();
                let next = self.create_block();
                self.push(current, Op::Jump(q));
                let child = ast.orphan(orphan).clone();
                let term = self.compile_node(ast, &child, content);
                self.push(term, Op::Jump(q));
                let id = self.next_progress_id();
                self.push(q, Op::Progress(id));
                if greedy {
                    self.push(q, Op::Split(content, next));
                } else {
                    self.push(q, Op::Split(next, content));
                }
                next
            }
            Node::Regex(_) => unreachable!("Regex node only ever appears as the AST root"),
        }
    }
}

/// Chase a chain of single-`Jump` blocks to its ultimate target, guarding
/// against cycles (an empty `x*` loop body can produce one).
fn chase(map: &HashMap<usize, usize>, start: usize) -> usize {
    let mut x = start;
    let mut hops = 0;
    while let Some(&t) = map.get(&x) {
        x = t;
        hops += 1;
        if hops > map.len() + 1 {
            break;
        }
    }
    x
}

/// Rewrite every `Jump`/`Split` target that points at a block consisting
/// of nothing but a single `Jump`, so the VM never has to pay for the
/// extra hop. Dead blocks are left in the vector, not compacted.
fn coalesce_jumps(blocks: &mut [Block]) {
    loop {
        let mut single_jump = HashMap::new();
        for (i, b) in blocks.iter().enumerate() {
            if let [Op::Jump(t)] = b.ops.as_slice() {
                single_jump.insert(i, *t);
            }
        }
        if single_jump.is_empty() {
            return;
        }
        let mut changed = false;
        for b in blocks.iter_mut() {
            for op in b.ops.iter_mut() {
                match op {
                    Op::Jump(t) => {
                        let nt = chase(&single_jump, *t);
                        if nt != *t {
                            *t = nt;
                            changed = true;
                        }
                    }
                    Op::Split(a, c) => {
                        let na = chase(&single_jump, *a);
                        let nc = chase(&single_jump, *c);
                        if na != *a || nc != *c {
                            *a = na;
                            *c = nc;
                            changed = true;
                        }
                    }
                    _ => {}
                }
            }
        }
        if !changed {
            return;
        }
    }
}

/// Compile an AST into a `Program`. Block `0` is always the entry point.
pub fn compile(ast: &Ast) -> Program {
    let mut c = Compiler::new();
    let entry = c.create_block();
    debug_assert_eq!(entry, 0);
    let root_list = ast.root_list();
    let terminal = c.compile_sequence(ast, root_list, entry);
    c.push(terminal, Op::End);
    coalesce_jumps(&mut c.blocks);
    Program {
        blocks: c.blocks,
        lists: c.lists,
        num_groups: c.num_groups,
    }
}
