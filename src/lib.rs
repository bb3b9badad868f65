//! # ranktrie
//!
//! A priority-ranked prefix index: a trie over a fixed 27-symbol alphabet
//! (lowercase letters plus a word terminator) that answers "which stored
//! word under this prefix is most likely wanted" in O(1), and keeps that
//! answer current as words are used.
//!
//! ## Features
//!
//! - **O(1) best-completion lookup**: every node caches the best-ranked
//!   terminal of its subtree
//! - **O(depth) updates**: raising a word's rank repairs caches along the
//!   root path only, short-circuiting as soon as an ancestor's cache
//!   already dominates
//! - **Two ranking policies**: most-recently-used or most-frequently-used,
//!   chosen at construction
//! - **Stable handles**: nodes live in an append-only arena addressed by
//!   32-bit references, valid for the trie's lifetime
//!
//! ## Architecture
//!
//! Two components, instantiated together:
//!
//! 1. **Node store** ([`arena`]): owns the nodes and their
//!    parent/child/cache relationships, addressed by [`NodeRef`] indices.
//!    The [`alphabet`] module provides the shared symbol-to-slot mapping.
//!
//! 2. **Priority index** ([`trie`]): insertion, single-character descent,
//!    cached best-completion lookup, and priority updates, built on the
//!    node store. Callers interact with this layer only.
//!
//! ## Example
//!
//! ```rust
//! use ranktrie::{Policy, PriorityTrie};
//!
//! let mut trie = PriorityTrie::new(Policy::Frequency);
//! trie.insert("cat")?;
//! trie.insert("cart")?;
//!
//! // Walk a prefix one character at a time, as a typist would.
//! let mut node = trie.root();
//! for c in "ca".chars() {
//!     node = trie.descend(node, c)?;
//! }
//! assert!(!node.is_null());
//!
//! // "cart" is used twice, overtaking "cat" under the shared prefix.
//! let cart = trie.node_at("cart$")?;
//! trie.update_priority(cart);
//! trie.update_priority(cart);
//! assert_eq!(trie.suggest("ca")?, Some("cart"));
//! # Ok::<(), ranktrie::InvalidSymbol>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alphabet;
pub mod arena;
pub mod trie;

pub use alphabet::{InvalidSymbol, SIGMA, TERMINATOR};
pub use arena::{Node, NodeRef, UNSET_PRIORITY};
pub use trie::{Policy, PriorityTrie, Words};

/// Construction-time configuration for a [`PriorityTrie`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Ranking policy, fixed for the trie's lifetime.
    pub policy: Policy,
    /// Capacity hint for the node arena, in nodes.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: Policy::Recency,
            initial_capacity: 1024,
        }
    }
}

/// Diagnostics snapshot returned by [`PriorityTrie::stats`].
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Total nodes ever created, root included. Monotonic.
    pub node_count: usize,
    /// Number of distinct words stored.
    pub word_count: usize,
    /// Current value of the recency clock (0 under the frequency policy).
    pub access_clock: i64,
    /// Bytes reserved for node storage.
    pub arena_bytes: usize,
}

#[cfg(test)]
mod proptests;
