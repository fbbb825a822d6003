//! Trie nodes and the structural rewrites they support.

use smallvec::SmallVec;

use crate::children::Children;
use crate::config::{TrieConfig, DEFAULT_MAX_PREFIX_LEN};

/// Edge label bytes, inline up to the default maximum label length.
pub(crate) type Label = SmallVec<[u8; DEFAULT_MAX_PREFIX_LEN]>;

/// A node: its edge label relative to the parent, an optional value, and
/// the children below it.
#[derive(Clone)]
pub(crate) struct Node<V> {
    pub(crate) label: Label,
    pub(crate) value: Option<V>,
    pub(crate) children: Children<V>,
}

/// Outcome of placing a value at a node.
pub(crate) enum Put<V> {
    Inserted,
    Replaced(V),
    Occupied,
}

impl<V> Node<V> {
    pub(crate) fn with_label(label: &[u8], config: &TrieConfig) -> Self {
        Self {
            label: Label::from_slice(label),
            value: None,
            children: Children::new(config.sparse_capacity),
        }
    }

    /// Builds the chain of nodes spelling `key`, each label at most
    /// `max_prefix_len` bytes, with `value` on the last one.
    pub(crate) fn chain(key: &[u8], value: V, config: &TrieConfig) -> Self {
        let mut chunks = key.chunks(config.max_prefix_len).rev();
        let mut node = Self::with_label(chunks.next().unwrap_or_default(), config);
        node.value = Some(value);
        for chunk in chunks {
            let mut parent = Self::with_label(chunk, config);
            parent.children.insert(Box::new(node));
            node = parent;
        }
        node
    }

    /// Key byte this node is filed under in its parent.
    ///
    /// # Panics
    ///
    /// On an empty label, which only the root may have.
    #[inline]
    pub(crate) fn first_byte(&self) -> u8 {
        match self.label.first() {
            Some(&b) => b,
            None => panic!("empty edge label below the root"),
        }
    }

    #[inline]
    pub(crate) fn common_prefix_len(&self, key: &[u8]) -> usize {
        self.label
            .iter()
            .zip(key)
            .take_while(|(a, b)| a == b)
            .count()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    pub(crate) fn place(&mut self, value: V, replace: bool) -> Put<V> {
        match self.value.as_mut() {
            None => {
                self.value = Some(value);
                Put::Inserted
            }
            Some(slot) if replace => Put::Replaced(std::mem::replace(slot, value)),
            Some(_) => Put::Occupied,
        }
    }

    /// Cuts the label at `at`. This node keeps `label[..at]` and nothing
    /// else; everything it held moves into a new child labelled
    /// `label[at..]`, which is compacted right away.
    pub(crate) fn split(&mut self, at: usize, config: &TrieConfig) {
        debug_assert!(at < self.label.len());
        let head = Self::with_label(&self.label[..at], config);
        let mut tail = std::mem::replace(self, head);
        tail.label.drain(..at);
        tail.compact(config.max_prefix_len);
        self.children.insert(Box::new(tail));
    }

    /// Takes this node's only child and prefixes its label with ours.
    ///
    /// Applies to valueless nodes with exactly one child whose joined label
    /// fits in `max_prefix_len`. This node is left without children.
    fn take_merged(&mut self, max_prefix_len: usize) -> Option<Box<Node<V>>> {
        if self.value.is_some() || self.children.len() != 1 {
            return None;
        }
        let (byte, child_len) = match self.children.first() {
            Some(child) => (child.first_byte(), child.label.len()),
            None => return None,
        };
        if self.label.len() + child_len > max_prefix_len {
            return None;
        }

        let mut child = self.children.remove(byte);
        let mut label = self.label.clone();
        label.extend_from_slice(&child.label);
        child.label = label;
        Some(child)
    }

    /// Merges this node into its only child, in place. Returns whether a
    /// merge happened.
    pub(crate) fn compact(&mut self, max_prefix_len: usize) -> bool {
        match self.take_merged(max_prefix_len) {
            Some(merged) => {
                *self = *merged;
                true
            }
            None => false,
        }
    }

    /// Merges the child keyed by `byte` into its own only child, swapping the
    /// result into the child's slot.
    pub(crate) fn compact_child(&mut self, byte: u8, max_prefix_len: usize) -> bool {
        let merged = match self.children.get_mut(byte) {
            Some(child) => child.take_merged(max_prefix_len),
            None => None,
        };
        match merged {
            Some(merged) => {
                self.children.replace(byte, merged);
                true
            }
            None => false,
        }
    }

    pub(crate) fn descend_mut(&mut self, path: &[u8]) -> Option<&mut Node<V>> {
        let mut node = self;
        for &byte in path {
            node = node.children.get_mut(byte)?;
        }
        Some(node)
    }

    /// This node plus all of its descendants.
    pub(crate) fn total_nodes(&self) -> usize {
        1 + self.children.total_nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(max_prefix_len: usize) -> TrieConfig {
        TrieConfig {
            max_prefix_len,
            ..TrieConfig::default()
        }
    }

    #[test]
    fn test_chain_splits_long_keys() {
        let key: Vec<u8> = (0u8..70).collect();
        let node = Node::chain(&key, 7u64, &cfg(32));

        assert_eq!(node.label.as_slice(), &key[..32]);
        assert!(node.value.is_none());
        let mid = node.children.first().map(|n| n.label.to_vec());
        assert_eq!(mid.as_deref(), Some(&key[32..64]));
        assert_eq!(node.total_nodes(), 3);
    }

    #[test]
    fn test_split_moves_contents() {
        let mut node = Node::chain(b"abcdef", 1u64, &cfg(32));
        node.split(2, &cfg(32));

        assert_eq!(node.label.as_slice(), b"ab");
        assert!(node.value.is_none());
        let tail = node.children.get(b'c').map(|n| (n.label.to_vec(), n.value));
        assert_eq!(tail, Some((b"cdef".to_vec(), Some(1))));
    }

    #[test]
    fn test_compact_respects_values_and_limits() {
        let config = cfg(4);
        let mut node: Node<u64> = Node::with_label(b"ab", &config);
        node.children.insert(Box::new(Node::chain(b"cd", 1, &config)));
        assert!(node.compact(config.max_prefix_len));
        assert_eq!(node.label.as_slice(), b"abcd");
        assert_eq!(node.value, Some(1));

        // Too long once joined.
        let mut node: Node<u64> = Node::with_label(b"ab", &config);
        node.children.insert(Box::new(Node::chain(b"cde", 1, &config)));
        assert!(!node.compact(config.max_prefix_len));

        // A node holding a value is never merged away.
        let mut node: Node<u64> = Node::with_label(b"ab", &config);
        node.value = Some(9);
        node.children.insert(Box::new(Node::chain(b"c", 1, &config)));
        assert!(!node.compact(config.max_prefix_len));
    }

    #[test]
    fn test_place() {
        let mut node: Node<u64> = Node::with_label(b"k", &cfg(32));
        assert!(matches!(node.place(1, false), Put::Inserted));
        assert!(matches!(node.place(2, false), Put::Occupied));
        assert!(matches!(node.place(3, true), Put::Replaced(1)));
        assert_eq!(node.value, Some(3));
    }
}
