//! Byte-indexed child array.

use crate::trie::Node;

/// Children addressed by `first_byte - min`.
///
/// `slots` spans every byte in `[min, min + slots.len())` seen so far. The
/// span only ever grows. `head` is the lowest occupied slot whenever `len > 0`.
#[derive(Clone)]
pub(crate) struct Dense<V> {
    min: u8,
    slots: Vec<Option<Box<Node<V>>>>,
    len: usize,
    head: usize,
}

impl<V> Dense<V> {
    /// Builds a dense array holding every node of a full sparse list plus the
    /// child that overflowed it.
    pub(super) fn from_nodes(nodes: Vec<Box<Node<V>>>, extra: Box<Node<V>>) -> Self {
        let first = extra.first_byte();
        let (min, max) = nodes.iter().fold((first, first), |(lo, hi), n| {
            let b = n.first_byte();
            (lo.min(b), hi.max(b))
        });

        let mut dense = Self {
            min,
            slots: Vec::with_capacity(usize::from(max - min) + 1),
            len: 0,
            head: 0,
        };
        dense.slots.resize_with(usize::from(max - min) + 1, || None);
        for node in nodes {
            dense.insert(node);
        }
        dense.insert(extra);
        dense
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn index(&self, byte: u8) -> Option<usize> {
        let idx = usize::from(byte.checked_sub(self.min)?);
        (idx < self.slots.len()).then_some(idx)
    }

    pub(super) fn get(&self, byte: u8) -> Option<&Node<V>> {
        self.slots[self.index(byte)?].as_deref()
    }

    pub(super) fn get_mut(&mut self, byte: u8) -> Option<&mut Node<V>> {
        let idx = self.index(byte)?;
        self.slots[idx].as_deref_mut()
    }

    pub(super) fn first(&self) -> Option<&Node<V>> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.head].as_deref()
    }

    pub(super) fn insert(&mut self, child: Box<Node<V>>) {
        let byte = child.first_byte();
        let idx = match self.index(byte) {
            Some(idx) => {
                if self.slots[idx].is_some() {
                    panic!("dense child collision on byte {byte:#04x}");
                }
                self.slots[idx] = Some(child);
                idx
            }
            None if byte < self.min => {
                let shift = usize::from(self.min - byte);
                let mut slots = Vec::with_capacity(self.slots.len() + shift);
                slots.push(Some(child));
                slots.resize_with(shift, || None);
                slots.append(&mut self.slots);
                self.slots = slots;
                self.min = byte;
                self.head += shift;
                0
            }
            None => {
                let idx = usize::from(byte - self.min);
                self.slots.resize_with(idx + 1, || None);
                self.slots[idx] = Some(child);
                idx
            }
        };

        self.len += 1;
        if self.len == 1 || idx < self.head {
            self.head = idx;
        }
    }

    pub(super) fn remove(&mut self, byte: u8) -> Box<Node<V>> {
        let Some(node) = self.index(byte).and_then(|idx| self.slots[idx].take()) else {
            panic!("removing non-existent dense child {byte:#04x}");
        };
        self.len -= 1;

        let idx = usize::from(byte - self.min);
        if idx == self.head {
            if let Some(next) = self.slots[idx..].iter().position(Option::is_some) {
                self.head = idx + next;
            }
        }
        node
    }

    pub(super) fn replace(&mut self, byte: u8, child: Box<Node<V>>) -> Box<Node<V>> {
        let slot = match self.index(byte) {
            Some(idx) => self.slots[idx].as_mut(),
            None => None,
        };
        match slot {
            Some(slot) => std::mem::replace(slot, child),
            None => panic!("replacing non-existent dense child {byte:#04x}"),
        }
    }

    /// Occupied slots in ascending byte order.
    pub(super) fn iter(&self) -> impl Iterator<Item = &Node<V>> {
        self.slots[self.head..]
            .iter()
            .flatten()
            .map(|n| &**n)
    }
}
