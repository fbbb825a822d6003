//! Child storage for trie nodes.
//!
//! Most nodes have a handful of children, so they start out [`Sparse`]: a
//! short unordered list searched linearly. Once a sparse list would grow past
//! its capacity it is rebuilt, once, as a [`Dense`] byte-indexed array with
//! O(1) lookup. Dense collections never turn back into sparse ones, even when
//! children are removed later.
//!
//! Every child is keyed by the first byte of its edge label; siblings never
//! share a first byte.

mod dense;
mod sparse;

use smallvec::SmallVec;

use crate::tracing_helpers::trace_log;
use crate::trie::{Node, Visit};

use dense::Dense;
use sparse::Sparse;

#[derive(Clone)]
pub(crate) enum Children<V> {
    Sparse(Sparse<V>),
    Dense(Dense<V>),
}

impl<V> Children<V> {
    pub(crate) fn new(sparse_capacity: usize) -> Self {
        Children::Sparse(Sparse::new(sparse_capacity))
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Children::Sparse(s) => s.len(),
            Children::Dense(d) => d.len(),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) fn is_dense(&self) -> bool {
        matches!(self, Children::Dense(_))
    }

    /// Child with the smallest first byte.
    pub(crate) fn first(&self) -> Option<&Node<V>> {
        match self {
            Children::Sparse(s) => s.first(),
            Children::Dense(d) => d.first(),
        }
    }

    #[inline]
    pub(crate) fn get(&self, byte: u8) -> Option<&Node<V>> {
        match self {
            Children::Sparse(s) => s.get(byte),
            Children::Dense(d) => d.get(byte),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, byte: u8) -> Option<&mut Node<V>> {
        match self {
            Children::Sparse(s) => s.get_mut(byte),
            Children::Dense(d) => d.get_mut(byte),
        }
    }

    /// Adds a child, promoting a full sparse list to a dense array.
    ///
    /// # Panics
    ///
    /// If a child with the same first byte is already present.
    pub(crate) fn insert(&mut self, child: Box<Node<V>>) {
        match self {
            Children::Sparse(s) if !s.is_full() => s.push(child),
            Children::Sparse(s) => {
                trace_log!(children = s.len(), "promoting sparse children to dense");
                let nodes = std::mem::replace(s, Sparse::new(0)).into_nodes();
                *self = Children::Dense(Dense::from_nodes(nodes, child));
            }
            Children::Dense(d) => d.insert(child),
        }
    }

    /// Detaches the child keyed by `byte`.
    ///
    /// # Panics
    ///
    /// If there is no such child.
    pub(crate) fn remove(&mut self, byte: u8) -> Box<Node<V>> {
        match self {
            Children::Sparse(s) => s.remove(byte),
            Children::Dense(d) => d.remove(byte),
        }
    }

    /// Swaps the child keyed by `byte` for `child`, returning the old one.
    ///
    /// # Panics
    ///
    /// If `child` does not start with `byte`, or no child is keyed by `byte`.
    pub(crate) fn replace(&mut self, byte: u8, child: Box<Node<V>>) -> Box<Node<V>> {
        let first = child.first_byte();
        if first != byte {
            panic!("child prefix mismatch: {first:#04x} != {byte:#04x}");
        }
        match self {
            Children::Sparse(s) => s.replace(byte, child),
            Children::Dense(d) => d.replace(byte, child),
        }
    }

    /// Children in ascending first-byte order.
    pub(crate) fn ordered(&self) -> SmallVec<[&Node<V>; 16]> {
        match self {
            Children::Sparse(s) => s.ordered(),
            Children::Dense(d) => d.iter().collect(),
        }
    }

    /// Depth-first walk over every descendant. `key` holds the full key of
    /// the owning node on entry and is restored before returning.
    pub(crate) fn walk<E, F>(&self, key: &mut Vec<u8>, visitor: &mut F) -> Result<(), E>
    where
        F: FnMut(&[u8], &V) -> Result<Visit, E>,
    {
        match self {
            Children::Sparse(s) => {
                for child in s.ordered() {
                    child.descend(key, visitor)?;
                }
            }
            Children::Dense(d) => {
                for child in d.iter() {
                    child.descend(key, visitor)?;
                }
            }
        }
        Ok(())
    }

    /// Number of nodes below this collection.
    pub(crate) fn total_nodes(&self) -> usize {
        match self {
            Children::Sparse(s) => s.iter().map(Node::total_nodes).sum(),
            Children::Dense(d) => d.iter().map(Node::total_nodes).sum(),
        }
    }
}
