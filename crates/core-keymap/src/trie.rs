// -------------------------------------------------------------------------------------------------
// Trie Representation
// -------------------------------------------------------------------------------------------------
//
// Arena of nodes addressed by `NodeId`. Each mapping mode owns one root branch.
// A branch stores its outgoing edges inline (most branches have a handful of
// children) and an optional argument descriptor that answers for any key that
// is not an explicit child.

use std::collections::BTreeSet;

use core_events::KeyEvent;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::{ActionId, ArgumentKind, CommandSpec, MappingMode, MappingSpec};

/// Position inside a [`KeyTrie`]. Only meaningful for the trie that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Edge {
    key: KeyEvent,
    next: NodeId,
}

#[derive(Debug, Clone)]
enum Node {
    Branch {
        edges: SmallVec<[Edge; 4]>,
        argument: Option<CommandSpec>,
    },
    Command(CommandSpec),
}

impl Node {
    fn branch() -> Self {
        Node::Branch {
            edges: SmallVec::new(),
            argument: None,
        }
    }
}

/// Result of one lookup step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Strict prefix of longer sequences; continue from this node.
    Branch(NodeId),
    /// Complete command without an argument.
    Command(&'a CommandSpec),
    /// Complete command that still needs an argument of `spec.argument` kind.
    /// The key that produced this result belongs to the argument.
    Argument(&'a CommandSpec),
}

#[derive(Debug)]
pub struct KeyTrie {
    nodes: Vec<Node>,
    roots: [NodeId; 4],
}

impl Default for KeyTrie {
    fn default() -> Self {
        Self::empty()
    }
}

impl KeyTrie {
    /// A trie with one empty root per mapping mode.
    pub fn empty() -> Self {
        let nodes = (0..MappingMode::ALL.len()).map(|_| Node::branch()).collect();
        Self {
            nodes,
            roots: [NodeId(0), NodeId(1), NodeId(2), NodeId(3)],
        }
    }

    /// Build from mapping specs in order; later specs override earlier ones.
    pub fn build(specs: Vec<MappingSpec>) -> Self {
        let mut trie = Self::empty();
        for (idx, spec) in specs.into_iter().enumerate() {
            trie.insert(idx, spec);
        }
        debug!(target: "input.map", nodes = trie.nodes.len(), "trie_built");
        trie
    }

    pub fn root(&self, mode: MappingMode) -> NodeId {
        self.roots[mode.index()]
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.roots.contains(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve `key` below `cursor`.
    pub fn lookup(&self, cursor: NodeId, key: &KeyEvent) -> Option<Lookup<'_>> {
        let Some(Node::Branch { edges, argument }) = self.nodes.get(cursor.0) else {
            return None;
        };
        match edges.iter().find(|e| e.key == *key) {
            Some(edge) => {
                trace!(target: "input.map", key = %key, node = edge.next.0, "advance");
                match &self.nodes[edge.next.0] {
                    Node::Branch { .. } => Some(Lookup::Branch(edge.next)),
                    Node::Command(spec) => Some(Lookup::Command(spec)),
                }
            }
            None => {
                let found = argument.as_ref().map(Lookup::Argument);
                trace!(target: "input.map", key = %key, node = cursor.0, argument = found.is_some(), "no_edge");
                found
            }
        }
    }

    /// Every action id reachable through the trie.
    pub fn actions(&self) -> BTreeSet<ActionId> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Command(spec) => spec.action.clone(),
                Node::Branch { argument, .. } => {
                    argument.as_ref().and_then(|spec| spec.action.clone())
                }
            })
            .collect()
    }

    fn insert(&mut self, idx: usize, spec: MappingSpec) {
        let Some((last, prefix)) = spec.sequence.split_last() else {
            warn!(target: "input.map", mapping_index = idx, "empty_sequence_skipped");
            return;
        };
        let mut cur = self.root(spec.mode);
        for key in prefix {
            cur = self.child_branch(idx, cur, *key);
        }
        match spec.argument {
            None => self.insert_leaf(idx, cur, *last, spec.command),
            Some(kind) => {
                let branch = self.child_branch(idx, cur, *last);
                self.attach_argument(idx, branch, spec.command, kind);
            }
        }
    }

    fn find_edge(&self, from: NodeId, key: &KeyEvent) -> Option<NodeId> {
        match &self.nodes[from.0] {
            Node::Branch { edges, .. } => edges.iter().find(|e| e.key == *key).map(|e| e.next),
            Node::Command(_) => None,
        }
    }

    fn push_child(&mut self, from: NodeId, key: KeyEvent, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        if let Node::Branch { edges, .. } = &mut self.nodes[from.0] {
            edges.push(Edge { key, next: id });
        }
        id
    }

    /// Follow (or create) the branch under `from` for `key`.
    fn child_branch(&mut self, idx: usize, from: NodeId, key: KeyEvent) -> NodeId {
        let Some(next) = self.find_edge(from, &key) else {
            return self.push_child(from, key, Node::branch());
        };
        if let Node::Command(spec) = &self.nodes[next.0] {
            warn!(
                target: "input.map",
                mapping_index = idx,
                key = %key,
                shadowed = ?spec.action,
                "leaf_shadowed"
            );
            self.nodes[next.0] = Node::branch();
        }
        next
    }

    fn insert_leaf(&mut self, idx: usize, from: NodeId, key: KeyEvent, command: CommandSpec) {
        let Some(next) = self.find_edge(from, &key) else {
            self.push_child(from, key, Node::Command(command));
            return;
        };
        match &mut self.nodes[next.0] {
            Node::Command(existing) => {
                trace!(target: "input.map", mapping_index = idx, node = next.0, "terminal_override");
                *existing = command;
            }
            Node::Branch { .. } => {
                warn!(
                    target: "input.map",
                    mapping_index = idx,
                    key = %key,
                    action = ?command.action,
                    "mapping_shadowed_by_prefix"
                );
            }
        }
    }

    fn attach_argument(
        &mut self,
        idx: usize,
        branch: NodeId,
        mut command: CommandSpec,
        kind: ArgumentKind,
    ) {
        command.argument = kind;
        if let Node::Branch { argument, .. } = &mut self.nodes[branch.0] {
            if argument.is_some() {
                trace!(target: "input.map", mapping_index = idx, node = branch.0, "argument_override");
            }
            *argument = Some(command);
        }
    }
}
