//! The priority index: a 27-ary trie where every node caches the
//! best-ranked completion of its subtree.
//!
//! Lookups ([`PriorityTrie::autocomplete`]) read the cache in O(1).
//! Mutations ([`PriorityTrie::insert`], [`PriorityTrie::update_priority`])
//! repair the cache along the root path in O(depth): propagation walks
//! parent links and stops at the first ancestor whose cached maximum
//! already dominates. The short-circuit is sound because priorities never
//! decrease over a node's lifetime.

use smallvec::SmallVec;

use crate::alphabet::{self, InvalidSymbol, TERMINATOR, TERMINATOR_INDEX};
use crate::arena::{Node, NodeArena, NodeRef};
use crate::{Config, Stats};

/// How [`PriorityTrie::update_priority`] ranks a terminal. Fixed at
/// construction for the trie's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Policy {
    /// Priority is the value of a per-trie access clock at update time.
    /// Strictly increasing across all terminals of the trie: the most
    /// recently updated word always ranks highest.
    #[default]
    Recency,
    /// Priority is the number of updates this terminal has received.
    /// Ties across words are possible; on a tie the older achiever keeps
    /// the cache (strict-less propagation).
    Frequency,
}

/// Encoded word: one child-slot index per letter.
type EncodedWord = SmallVec<[u8; 24]>;

/// A priority-ranked prefix index over lowercase words.
///
/// See the crate docs for the data model. All operations are
/// single-threaded; nothing blocks or performs I/O.
pub struct PriorityTrie {
    arena: NodeArena,
    root: NodeRef,
    policy: Policy,
    /// Recency clock, owned by the instance so independently-ranked
    /// tries can coexist.
    access_clock: i64,
    words: usize,
}

impl PriorityTrie {
    /// Create an empty trie ranking by `policy`.
    pub fn new(policy: Policy) -> Self {
        Self::with_config(Config {
            policy,
            ..Config::default()
        })
    }

    /// Create an empty trie from a [`Config`].
    pub fn with_config(config: Config) -> Self {
        let mut arena = NodeArena::with_capacity(config.initial_capacity);
        let root = arena.alloc(NodeRef::NULL);
        PriorityTrie {
            arena,
            root,
            policy: config.policy,
            access_clock: 0,
            words: 0,
        }
    }

    /// The root node. Never `NULL`.
    #[inline]
    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// The ranking policy this trie was constructed with.
    #[inline]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Borrow a node by reference; `NULL` is absent.
    #[inline]
    pub fn node(&self, r: NodeRef) -> Option<&Node> {
        self.arena.get(r)
    }

    /// Insert `word` (lowercase letters only; the terminator is appended
    /// internally). Returns `Ok(true)` if the word is new, `Ok(false)`
    /// for a duplicate or the empty word; both leave the trie untouched,
    /// ranks included.
    ///
    /// The word is validated before any node is created, so a rejected
    /// symbol never leaves a partial path behind.
    pub fn insert(&mut self, word: &str) -> Result<bool, InvalidSymbol> {
        let encoded = encode_word(word)?;
        if encoded.is_empty() {
            return Ok(false);
        }

        let mut current = self.root;
        for &id in &encoded {
            let slot = id as usize;
            let next = self.arena.node(current).children[slot];
            current = if next.is_null() {
                let child = self.arena.alloc(current);
                self.arena.node_mut(current).children[slot] = child;
                child
            } else {
                next
            };
        }

        if !self.arena.node(current).children[TERMINATOR_INDEX].is_null() {
            // Duplicate word: only explicit priority updates change ranks.
            return Ok(false);
        }

        let terminal = self.arena.alloc(current);
        {
            let node = self.arena.node_mut(terminal);
            node.priority = 0;
            node.best_priority = 0;
            node.best_terminal = terminal;
            let mut payload = String::with_capacity(word.len() + 1);
            payload.push_str(word);
            payload.push(TERMINATOR);
            node.word = Some(payload.into_boxed_str());
        }
        self.arena.node_mut(current).children[TERMINATOR_INDEX] = terminal;
        self.words += 1;

        self.repair_upward(terminal);
        Ok(true)
    }

    /// One alphabet step from `node` through `symbol`.
    ///
    /// Returns `NULL` when `node` is `NULL` or the transition is absent;
    /// neither is an error. The symbol itself must be in the alphabet.
    #[inline]
    pub fn descend(&self, node: NodeRef, symbol: char) -> Result<NodeRef, InvalidSymbol> {
        let slot = alphabet::index_of(symbol)?;
        Ok(match self.arena.get(node) {
            Some(n) => n.children[slot],
            None => NodeRef::NULL,
        })
    }

    /// The best-ranked terminal in `node`'s subtree, in O(1).
    ///
    /// Returns `NULL` when `node` is `NULL` or no completion exists under
    /// it yet.
    #[inline]
    pub fn autocomplete(&self, node: NodeRef) -> NodeRef {
        match self.arena.get(node) {
            Some(n) => n.best_terminal,
            None => NodeRef::NULL,
        }
    }

    /// Raise `terminal`'s rank according to the trie's policy, then
    /// repair subtree caches along the root path.
    ///
    /// A `NULL` or non-terminal reference is ignored: only terminals
    /// carry a rank. Cost is O(depth), not O(subtree size).
    pub fn update_priority(&mut self, terminal: NodeRef) {
        match self.arena.get(terminal) {
            Some(node) if node.is_terminal() => {}
            _ => return,
        }

        let new = match self.policy {
            Policy::Frequency => self.arena.node(terminal).priority + 1,
            Policy::Recency => {
                self.access_clock += 1;
                self.access_clock
            }
        };

        let node = self.arena.node_mut(terminal);
        node.priority = new;
        // A terminal's subtree is only itself.
        node.best_priority = new;

        self.repair_upward(terminal);
    }

    /// Propagate `terminal`'s rank upward until an ancestor's cache
    /// already dominates. Once one ancestor is skipped, every ancestor
    /// above it holds the true subtree maximum as well, so stopping is
    /// exact.
    fn repair_upward(&mut self, terminal: NodeRef) {
        let (value, mut current) = {
            let node = self.arena.node(terminal);
            (node.priority, node.parent)
        };
        while !current.is_null() {
            let node = self.arena.node_mut(current);
            if node.best_priority < value {
                node.best_priority = value;
                node.best_terminal = terminal;
                current = node.parent;
            } else {
                break;
            }
        }
    }

    /// Walk a whole prefix from the root, one [`descend`](Self::descend)
    /// step per character. `NULL` once the path leaves the trie.
    pub fn node_at(&self, prefix: &str) -> Result<NodeRef, InvalidSymbol> {
        let mut current = self.root;
        for symbol in prefix.chars() {
            current = self.descend(current, symbol)?;
        }
        Ok(current)
    }

    /// Whether `word` has been inserted.
    pub fn contains(&self, word: &str) -> Result<bool, InvalidSymbol> {
        let encoded = encode_word(word)?;
        if encoded.is_empty() {
            return Ok(false);
        }
        let mut current = self.root;
        for &id in &encoded {
            current = self.arena.node(current).children[id as usize];
            if current.is_null() {
                return Ok(false);
            }
        }
        Ok(!self.arena.node(current).children[TERMINATOR_INDEX].is_null())
    }

    /// Best completion for `prefix`, terminator stripped. `None` when no
    /// stored word extends the prefix.
    pub fn suggest(&self, prefix: &str) -> Result<Option<&str>, InvalidSymbol> {
        let node = self.node_at(prefix)?;
        let best = self.autocomplete(node);
        Ok(self
            .node(best)
            .and_then(Node::word)
            .map(|w| w.strip_suffix(TERMINATOR).unwrap_or(w)))
    }

    /// Total number of nodes ever created, root included. Monotonic.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of distinct words stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.words
    }

    /// Whether no word has been stored yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Diagnostics snapshot.
    pub fn stats(&self) -> Stats {
        Stats {
            node_count: self.arena.len(),
            word_count: self.words,
            access_clock: self.access_clock,
            arena_bytes: self.arena.capacity_bytes(),
        }
    }

    /// Iterate the stored words in lexicographic order, terminator
    /// stripped. O(nodes) overall; for ranking queries use
    /// [`autocomplete`](Self::autocomplete) instead.
    pub fn words(&self) -> Words<'_> {
        Words {
            trie: self,
            stack: vec![self.root],
        }
    }
}

impl Default for PriorityTrie {
    fn default() -> Self {
        Self::new(Policy::Recency)
    }
}

/// Depth-first iterator over stored words, created by
/// [`PriorityTrie::words`].
pub struct Words<'a> {
    trie: &'a PriorityTrie,
    stack: Vec<NodeRef>,
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(r) = self.stack.pop() {
            let node = self.trie.arena.node(r);
            if let Some(word) = node.word() {
                return Some(word.strip_suffix(TERMINATOR).unwrap_or(word));
            }
            // Letters pushed in reverse so 'a' pops first; the terminator
            // pushed last so a word precedes its extensions.
            for slot in (0..TERMINATOR_INDEX).rev() {
                let child = node.children[slot];
                if !child.is_null() {
                    self.stack.push(child);
                }
            }
            let terminal = node.children[TERMINATOR_INDEX];
            if !terminal.is_null() {
                self.stack.push(terminal);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Words<'_> {}

/// Map a caller word to child-slot indices, rejecting anything outside
/// `a`..`z`. The terminator is internal and never valid in caller input.
fn encode_word(word: &str) -> Result<EncodedWord, InvalidSymbol> {
    let mut encoded = EncodedWord::with_capacity(word.len());
    for symbol in word.chars() {
        let slot = alphabet::index_of(symbol)?;
        if slot == TERMINATOR_INDEX {
            return Err(InvalidSymbol(symbol));
        }
        encoded.push(slot as u8);
    }
    Ok(encoded)
}
