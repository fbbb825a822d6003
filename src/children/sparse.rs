//! Unordered, capacity-bounded child list.

use smallvec::SmallVec;

use crate::trie::Node;

/// Children kept in insertion order and searched linearly.
#[derive(Clone)]
pub(crate) struct Sparse<V> {
    pub(super) nodes: Vec<Box<Node<V>>>,
    pub(super) capacity: usize,
}

impl<V> Sparse<V> {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::new(),
            capacity,
        }
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(super) fn is_full(&self) -> bool {
        self.nodes.len() >= self.capacity
    }

    #[inline]
    fn position(&self, byte: u8) -> Option<usize> {
        self.nodes.iter().position(|n| n.first_byte() == byte)
    }

    pub(super) fn get(&self, byte: u8) -> Option<&Node<V>> {
        self.nodes
            .iter()
            .find(|n| n.first_byte() == byte)
            .map(|n| &**n)
    }

    pub(super) fn get_mut(&mut self, byte: u8) -> Option<&mut Node<V>> {
        self.nodes
            .iter_mut()
            .find(|n| n.first_byte() == byte)
            .map(|n| &mut **n)
    }

    /// Child with the smallest first byte.
    pub(super) fn first(&self) -> Option<&Node<V>> {
        self.nodes.iter().min_by_key(|n| n.first_byte()).map(|n| &**n)
    }

    pub(super) fn push(&mut self, child: Box<Node<V>>) {
        let byte = child.first_byte();
        if self.position(byte).is_some() {
            panic!("sparse child collision on byte {byte:#04x}");
        }
        self.nodes.push(child);
    }

    pub(super) fn remove(&mut self, byte: u8) -> Box<Node<V>> {
        match self.position(byte) {
            Some(i) => self.nodes.swap_remove(i),
            None => panic!("removing non-existent sparse child {byte:#04x}"),
        }
    }

    pub(super) fn replace(&mut self, byte: u8, child: Box<Node<V>>) -> Box<Node<V>> {
        match self.position(byte) {
            Some(i) => std::mem::replace(&mut self.nodes[i], child),
            None => panic!("replacing non-existent sparse child {byte:#04x}"),
        }
    }

    /// Children sorted by label. Recomputed on every call; storage order is
    /// left untouched.
    pub(super) fn ordered(&self) -> SmallVec<[&Node<V>; 16]> {
        let mut out: SmallVec<[&Node<V>; 16]> = self.nodes.iter().map(|n| &**n).collect();
        out.sort_unstable_by(|a, b| a.label.cmp(&b.label));
        out
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = &Node<V>> {
        self.nodes.iter().map(|n| &**n)
    }

    pub(super) fn into_nodes(self) -> Vec<Box<Node<V>>> {
        self.nodes
    }
}
