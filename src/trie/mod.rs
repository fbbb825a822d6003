//! Byte-prefix radix tree.
//!
//! Every node carries an edge label of at most
//! [`max_prefix_len`](TrieConfig::max_prefix_len) bytes; a node's full key is
//! the concatenation of the labels from the root down to it. Nodes own their
//! children outright. There are no parent links: operations that have to
//! walk back up record the bytes taken on the way down and re-descend.
//!
//! After every mutation the tree is compact: apart from chains whose labels
//! could not be joined without exceeding the label limit, every node either
//! holds a value or has at least two children.

mod debug;
mod node;
mod visit;

use std::fmt;

use smallvec::SmallVec;

use crate::config::TrieConfig;
use crate::error::TrieError;
use crate::locator::Locator;

pub(crate) use node::Node;
pub use visit::Visit;

use node::Put;

/// Radix tree from byte keys to values, by default block [`Locator`]s.
///
/// Not synchronized: mutation takes `&mut self`. Hand readers a
/// [`clone`](Clone::clone) to give them a stable snapshot.
///
/// ```rust
/// use blockidx::{Locator, Trie};
///
/// let mut trie = Trie::new();
/// trie.insert(b"0x111234", Locator::new(1, 2)).unwrap();
/// trie.insert(b"0x111241", Locator::new(3, 4)).unwrap();
///
/// assert_eq!(trie.get(b"0x111234").unwrap(), Some(&Locator::new(1, 2)));
/// assert!(trie.match_subtree(b"0x111").unwrap());
/// assert!(!trie.match_exact(b"0x111").unwrap());
/// ```
#[derive(Clone)]
pub struct Trie<V = Locator> {
    root: Node<V>,
    config: TrieConfig,
}

/// Where a key lands in the tree.
pub(crate) struct Subtree<'a, V> {
    /// Deepest node reached.
    pub(crate) node: &'a Node<V>,
    /// First label byte of each node below the root on the way to `node`.
    pub(crate) path: SmallVec<[u8; 32]>,
    /// Whether the whole key was consumed.
    pub(crate) matched: bool,
    /// Label bytes of `node` past the point where matching stopped.
    pub(crate) leftover: &'a [u8],
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        let config = TrieConfig::default();
        Self {
            root: Node::with_label(&[], &config),
            config,
        }
    }

    /// Creates an empty trie with the given shape.
    pub fn with_config(config: TrieConfig) -> Result<Self, TrieError> {
        let config = config.validate()?;
        Ok(Self {
            root: Node::with_label(&[], &config),
            config,
        })
    }

    pub fn config(&self) -> TrieConfig {
        self.config
    }

    /// Whether no key is stored.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Drops every key.
    pub fn clear(&mut self) {
        self.root = Node::with_label(&[], &self.config);
    }

    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns whether the insertion happened.
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<bool, TrieError> {
        Ok(matches!(self.put(key, value, false)?, Put::Inserted))
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub fn set(&mut self, key: &[u8], value: V) -> Result<Option<V>, TrieError> {
        match self.put(key, value, true)? {
            Put::Replaced(old) => Ok(Some(old)),
            Put::Inserted | Put::Occupied => Ok(None),
        }
    }

    fn put(&mut self, key: &[u8], value: V, replace: bool) -> Result<Put<V>, TrieError> {
        if key.is_empty() {
            return Err(TrieError::EmptyKey);
        }
        if self.is_empty() {
            self.root = Node::chain(key, value, &self.config);
            return Ok(Put::Inserted);
        }
        Ok(put_at(&mut self.root, key, value, replace, &self.config))
    }

    /// Value stored exactly at `key`.
    ///
    /// Interior nodes that merely lead to longer keys yield `None`.
    pub fn get(&self, key: &[u8]) -> Result<Option<&V>, TrieError> {
        if key.is_empty() {
            return Err(TrieError::EmptyKey);
        }
        let found = self.find_subtree(key);
        if !found.matched || !found.leftover.is_empty() {
            return Ok(None);
        }
        Ok(found.node.value.as_ref())
    }

    /// Whether a value is stored exactly at `key`.
    pub fn match_exact(&self, key: &[u8]) -> Result<bool, TrieError> {
        Ok(self.get(key)?.is_some())
    }

    /// Whether any stored key starts with `prefix` (including `prefix`
    /// itself).
    pub fn match_subtree(&self, prefix: &[u8]) -> Result<bool, TrieError> {
        if prefix.is_empty() {
            return Err(TrieError::EmptyKey);
        }
        Ok(self.find_subtree(prefix).matched)
    }

    /// Removes the value stored at `key`. Returns whether there was one.
    pub fn delete(&mut self, key: &[u8]) -> Result<bool, TrieError> {
        Ok(self.remove(key)?.is_some())
    }

    /// Removes and returns the value stored at `key`.
    pub fn remove(&mut self, key: &[u8]) -> Result<Option<V>, TrieError> {
        if key.is_empty() {
            return Err(TrieError::EmptyKey);
        }
        let found = self.find_subtree(key);
        if !found.matched || !found.leftover.is_empty() || found.node.value.is_none() {
            return Ok(None);
        }
        let path = found.path;

        let Some(node) = self.root.descend_mut(&path) else {
            return Ok(None);
        };
        let value = node.value.take();

        if node.children.is_empty() {
            self.prune(&path);
        } else {
            self.compact_upward(&path);
        }
        Ok(value)
    }

    /// Removes every key starting with `prefix` in a single cut. Returns
    /// whether anything matched.
    pub fn delete_subtree(&mut self, prefix: &[u8]) -> Result<bool, TrieError> {
        if prefix.is_empty() {
            return Err(TrieError::EmptyKey);
        }
        let found = self.find_subtree(prefix);
        if !found.matched {
            return Ok(false);
        }
        let path = found.path;
        self.prune(&path);
        Ok(true)
    }

    /// Follows `prefix` down from the root as far as it matches.
    pub(crate) fn find_subtree<'a>(&'a self, mut prefix: &[u8]) -> Subtree<'a, V> {
        let mut node = &self.root;
        let mut path = SmallVec::new();
        loop {
            let common = node.common_prefix_len(prefix);
            prefix = &prefix[common..];
            let leftover = &node.label[common..];

            if prefix.is_empty() {
                return Subtree {
                    node,
                    path,
                    matched: true,
                    leftover,
                };
            }
            // Diverged inside this node's label.
            if !leftover.is_empty() {
                return Subtree {
                    node,
                    path,
                    matched: false,
                    leftover,
                };
            }

            match node.children.get(prefix[0]) {
                Some(child) => {
                    path.push(prefix[0]);
                    node = child;
                }
                None => {
                    return Subtree {
                        node,
                        path,
                        matched: false,
                        leftover,
                    }
                }
            }
        }
    }

    /// Detaches the branch that ends at `path`, whose end node must not be
    /// kept, by cutting below the nearest ancestor that still holds a value
    /// or has other children.
    fn prune(&mut self, path: &[u8]) {
        let mut keep = None;
        let mut node = &self.root;
        for (depth, &byte) in path.iter().enumerate() {
            if node.value.is_some() || node.children.len() >= 2 {
                keep = Some(depth);
            }
            match node.children.get(byte) {
                Some(child) => node = child,
                None => break,
            }
        }

        let Some(depth) = keep else {
            self.clear();
            return;
        };
        if let Some(cut) = self.root.descend_mut(&path[..depth]) {
            cut.children.remove(path[depth]);
        }
        self.compact_upward(&path[..depth]);
    }

    /// Compacts the node at `path`, then its ancestors for as long as merges
    /// keep happening.
    fn compact_upward(&mut self, path: &[u8]) {
        let max = self.config.max_prefix_len;
        for depth in (0..=path.len()).rev() {
            let merged = if depth == 0 {
                self.root.compact(max)
            } else {
                match self.root.descend_mut(&path[..depth - 1]) {
                    Some(parent) => parent.compact_child(path[depth - 1], max),
                    None => false,
                }
            };
            if !merged {
                break;
            }
        }
    }
}

fn put_at<V>(node: &mut Node<V>, key: &[u8], value: V, replace: bool, config: &TrieConfig) -> Put<V> {
    let common = node.common_prefix_len(key);
    let rest = &key[common..];

    if common < node.label.len() {
        node.split(common, config);
        if rest.is_empty() {
            node.value = Some(value);
        } else {
            node.children.insert(Box::new(Node::chain(rest, value, config)));
        }
        return Put::Inserted;
    }

    if rest.is_empty() {
        return node.place(value, replace);
    }
    if let Some(child) = node.children.get_mut(rest[0]) {
        let put = put_at(child, rest, value, replace, config);
        // Splitting the child shortens its label, so a valueless node that
        // could not absorb it before may be able to now.
        node.compact(config.max_prefix_len);
        return put;
    }
    node.children.insert(Box::new(Node::chain(rest, value, config)));
    Put::Inserted
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Trie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        self.for_each(|key, value| {
            map.entry(&hex::encode(key), value);
        });
        map.finish()
    }
}

#[cfg(test)]
impl<V> Trie<V> {
    /// Panics unless every structural invariant holds: labels fit the limit
    /// and are non-empty below the root, siblings have distinct first bytes,
    /// and no valueless node keeps a single child it could merge with.
    pub(crate) fn assert_compact(&self) {
        fn check<V>(node: &Node<V>, is_root: bool, max: usize) {
            assert!(node.label.len() <= max, "label longer than {max}");
            if !is_root {
                assert!(!node.label.is_empty(), "empty label below the root");
            }
            if node.value.is_none() && node.children.len() < 2 {
                if node.children.is_empty() {
                    assert!(is_root, "dangling valueless leaf");
                    assert!(node.label.is_empty(), "empty tree with a leftover label");
                } else if let Some(child) = node.children.first() {
                    assert!(
                        node.label.len() + child.label.len() > max,
                        "mergeable valueless node with a single child"
                    );
                }
            }
            let mut seen = std::collections::HashSet::new();
            for child in node.children.ordered() {
                assert!(seen.insert(child.first_byte()), "siblings share a first byte");
                check(child, false, max);
            }
        }
        check(&self.root, true, self.config.max_prefix_len);
    }
}
