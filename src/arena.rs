//! Node storage for the prefix index.
//!
//! All nodes live in a single append-only arena and are addressed by
//! 32-bit [`NodeRef`] indices instead of pointers. This keeps the
//! parent/child/cache graph free of aliasing hazards:
//! - children are owned slots in a fixed 27-wide table,
//! - `parent` and `best_terminal` are plain indices with no ownership,
//! - nodes are never freed, so every `NodeRef` stays valid for the
//!   lifetime of the trie.

use crate::alphabet::{symbol_of, SIGMA};

/// Sentinel priority for nodes that have not been ranked yet.
pub const UNSET_PRIORITY: i64 = -1;

/// A 32-bit reference to a node in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct NodeRef(u32);

impl NodeRef {
    /// The absent-node sentinel (empty child slot, missing parent).
    pub const NULL: NodeRef = NodeRef(u32::MAX);

    /// Whether this reference is the [`NULL`](Self::NULL) sentinel.
    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub(crate) fn new(idx: usize) -> Self {
        debug_assert!(idx < u32::MAX as usize);
        NodeRef(idx as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single trie node.
///
/// `priority` starts at [`UNSET_PRIORITY`] and becomes meaningful only on
/// terminal nodes. The `best_terminal`/`best_priority` pair caches the
/// highest-ranked terminal anywhere in this node's subtree and is kept
/// consistent by the trie after every mutation.
pub struct Node {
    pub(crate) parent: NodeRef,
    pub(crate) children: [NodeRef; SIGMA],
    pub(crate) priority: i64,
    pub(crate) word: Option<Box<str>>,
    pub(crate) best_terminal: NodeRef,
    pub(crate) best_priority: i64,
}

impl Node {
    fn new(parent: NodeRef) -> Self {
        Node {
            parent,
            children: [NodeRef::NULL; SIGMA],
            priority: UNSET_PRIORITY,
            word: None,
            best_terminal: NodeRef::NULL,
            best_priority: UNSET_PRIORITY,
        }
    }

    /// The parent node, or `NULL` for the root.
    #[inline]
    pub fn parent(&self) -> NodeRef {
        self.parent
    }

    /// The child in slot `index`, or `NULL` if the transition is absent.
    #[inline]
    pub fn child(&self, index: usize) -> NodeRef {
        self.children[index]
    }

    /// This node's own rank. [`UNSET_PRIORITY`] on non-terminal nodes.
    #[inline]
    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// The stored word (terminator included) if this is a terminal node.
    #[inline]
    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// Whether this node ends a complete stored word.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.word.is_some()
    }

    /// The cached best-ranked terminal of this subtree, or `NULL` while
    /// the subtree holds no terminal.
    #[inline]
    pub fn best_terminal(&self) -> NodeRef {
        self.best_terminal
    }

    /// The cached maximum terminal priority of this subtree, or
    /// [`UNSET_PRIORITY`] while the subtree holds no terminal.
    #[inline]
    pub fn best_priority(&self) -> i64 {
        self.best_priority
    }

    /// All present children as `(symbol, child)` pairs, in slot order.
    pub fn present_children(&self) -> Vec<(char, NodeRef)> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_null())
            .map(|(i, &c)| (symbol_of(i), c))
            .collect()
    }
}

/// Append-only arena owning every node of a trie.
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an arena sized for roughly `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a fresh node linked to `parent` and return its reference.
    ///
    /// All other fields start at their defaults: empty child table,
    /// unset priority, no payload, unset cache.
    #[inline]
    pub fn alloc(&mut self, parent: NodeRef) -> NodeRef {
        let idx = self.nodes.len();
        self.nodes.push(Node::new(parent));
        NodeRef::new(idx)
    }

    /// Borrow a node. Panics on `NULL`; internal callers never hold one.
    #[inline]
    pub(crate) fn node(&self, r: NodeRef) -> &Node {
        &self.nodes[r.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, r: NodeRef) -> &mut Node {
        &mut self.nodes[r.index()]
    }

    /// Borrow a node, treating `NULL` as absent.
    #[inline]
    pub fn get(&self, r: NodeRef) -> Option<&Node> {
        if r.is_null() {
            None
        } else {
            self.nodes.get(r.index())
        }
    }

    /// Total number of nodes ever allocated. Monotonic; nodes are never
    /// freed.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been allocated yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bytes reserved for node storage.
    pub fn capacity_bytes(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>()
    }
}
