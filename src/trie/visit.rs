//! Ordered, cancellable traversal.
//!
//! Visitors are called with the full key and value of every value-bearing
//! node, in ascending lexicographic key order. Returning `Err` aborts the walk
//! and hands the error back to the caller unchanged.

use std::convert::Infallible;

use super::{Node, Trie};
use crate::error::TrieError;

/// What a visitor wants to happen after seeing a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    /// Don't descend below this node; siblings are still visited.
    SkipSubtree,
}

impl<V> Node<V> {
    /// Visits this node and everything below it. `key` must hold the full
    /// key of the parent; it is restored before returning, also on error.
    pub(crate) fn descend<E, F>(&self, key: &mut Vec<u8>, visitor: &mut F) -> Result<(), E>
    where
        F: FnMut(&[u8], &V) -> Result<Visit, E>,
    {
        let mark = key.len();
        key.extend_from_slice(&self.label);
        let result = self.visit_here(key, visitor);
        key.truncate(mark);
        result
    }

    fn visit_here<E, F>(&self, key: &mut Vec<u8>, visitor: &mut F) -> Result<(), E>
    where
        F: FnMut(&[u8], &V) -> Result<Visit, E>,
    {
        if let Some(value) = &self.value {
            if visitor(key.as_slice(), value)? == Visit::SkipSubtree {
                return Ok(());
            }
        }
        self.children.walk(key, visitor)
    }
}

impl<V> Trie<V> {
    /// Visits every stored key in ascending order.
    ///
    /// ```rust
    /// use blockidx::{Locator, Trie, Visit};
    ///
    /// let mut trie = Trie::new();
    /// trie.insert(b"b", Locator::new(2, 2)).unwrap();
    /// trie.insert(b"a", Locator::new(1, 1)).unwrap();
    ///
    /// let mut keys = Vec::new();
    /// trie.visit(|key, _| {
    ///     keys.push(key.to_vec());
    ///     Ok::<_, ()>(Visit::Continue)
    /// })
    /// .unwrap();
    /// assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
    /// ```
    pub fn visit<E, F>(&self, mut visitor: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &V) -> Result<Visit, E>,
    {
        let mut key = Vec::new();
        self.root.descend(&mut key, &mut visitor)
    }

    /// Visits every stored key starting with `prefix`. Does nothing when no
    /// key does.
    pub fn visit_subtree<E, F>(&self, prefix: &[u8], mut visitor: F) -> Result<(), E>
    where
        E: From<TrieError>,
        F: FnMut(&[u8], &V) -> Result<Visit, E>,
    {
        if prefix.is_empty() {
            return Err(TrieError::EmptyKey.into());
        }
        let found = self.find_subtree(prefix);
        if !found.matched {
            return Ok(());
        }

        // The subtree root's full key is the prefix plus whatever of its label
        // the prefix didn't cover.
        let mut key = Vec::with_capacity(prefix.len() + found.leftover.len());
        key.extend_from_slice(prefix);
        key.extend_from_slice(found.leftover);
        found.node.visit_here(&mut key, &mut visitor)
    }

    /// Visits the stored keys that are prefixes of `key`, `key` itself
    /// included, shortest first.
    ///
    /// Returning [`Visit::SkipSubtree`] stops the walk.
    pub fn visit_prefixes<E, F>(&self, key: &[u8], mut visitor: F) -> Result<(), E>
    where
        E: From<TrieError>,
        F: FnMut(&[u8], &V) -> Result<Visit, E>,
    {
        if key.is_empty() {
            return Err(TrieError::EmptyKey.into());
        }
        let mut node = &self.root;
        let mut depth = 0;
        loop {
            let rest = &key[depth..];
            if node.common_prefix_len(rest) < node.label.len() {
                return Ok(());
            }
            depth += node.label.len();

            if let Some(value) = &node.value {
                if visitor(&key[..depth], value)? == Visit::SkipSubtree {
                    return Ok(());
                }
            }
            let Some(&next) = key.get(depth) else {
                return Ok(());
            };
            match node.children.get(next) {
                Some(child) => node = child,
                None => return Ok(()),
            }
        }
    }

    /// Calls `f` on every entry in key order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&[u8], &V),
    {
        let result = self.visit(|key, value| {
            f(key, value);
            Ok::<_, Infallible>(Visit::Continue)
        });
        if let Err(never) = result {
            match never {}
        }
    }

    /// Number of stored keys. Walks the whole tree.
    pub fn size(&self) -> usize {
        let mut n = 0;
        self.for_each(|_, _| n += 1);
        n
    }

    /// All entries in key order.
    pub fn entries(&self) -> Vec<(Vec<u8>, V)>
    where
        V: Clone,
    {
        let mut out = Vec::new();
        self.for_each(|key, value| out.push((key.to_vec(), value.clone())));
        out
    }
}
