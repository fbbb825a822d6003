//! Diagnostic rendering of the node structure, and node counts.

use std::fmt::{self, Write};

use super::{Node, Trie};

impl<V: fmt::Debug> Node<V> {
    fn dump_into(&self, out: &mut String, depth: usize) -> fmt::Result {
        let label = if self.label.is_empty() {
            String::from("''")
        } else {
            hex::encode(&self.label)
        };
        write!(out, "{:indent$}{label} ", "", indent = depth * 2)?;
        match &self.value {
            Some(value) => writeln!(out, "{value:?}")?,
            None => writeln!(out, "-")?,
        }
        for child in self.children.ordered() {
            child.dump_into(out, depth + 1)?;
        }
        Ok(())
    }
}

impl<V: fmt::Debug> Trie<V> {
    /// Renders the tree one node per line, children indented below their
    /// parent: the hex edge label, then the value or `-`.
    ///
    /// Meant for debugging; the format is not stable.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.root.dump_into(&mut out, 0);
        out
    }
}

impl<V> Trie<V> {
    /// Number of nodes in the tree, root included.
    pub fn total_node_count(&self) -> usize {
        self.root.total_nodes()
    }
}
