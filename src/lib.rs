//! This crate exposes a family of ordered search trees behind one contract, [`OrderedTree`].
//!
//! ## Search trees
//!
//! A search tree stores unique keys under a strict total order and supports finding, inserting,
//! and removing them. Binary search trees are defined recursively using the notion of a `Node`
//! holding one key and up to two children. The most important invariants of a BST are:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree have a key less than its own key.
//! 2. For every `Node`, all the `Node`s in its right subtree have a key greater than its own key.
//!
//! Searching takes `O(height)`, so the interesting part of each variant is how it keeps the
//! height down:
//!
//! - [`SearchTree`] does nothing at all. Inserting sorted keys gives a linked list.
//! - [`AvlTree`] restructures the tree after every mutation so that the heights of every node's
//!   subtrees differ by at most one, bounding the height to about `1.44 * lg N`.
//! - [`BTree`] stores up to `2 * order - 1` keys per node and splits full nodes on the way down,
//!   so every leaf sits at the same depth.
//!
//! # Examples
//!
//! ```
//! use ordtree::{AvlTree, BTree, OrderedTree, SearchTree};
//!
//! let mut trees: Vec<Box<dyn OrderedTree<i32>>> = vec![
//!     Box::new(SearchTree::new()),
//!     Box::new(AvlTree::new()),
//!     Box::new(BTree::new(2).unwrap()),
//! ];
//!
//! for tree in &mut trees {
//!     for key in [5, 3, 8, 1, 4] {
//!         tree.insert(key);
//!     }
//!     tree.remove(&5);
//!
//!     assert_eq!(tree.traverse(), "1 3 4 8");
//!     assert_eq!(tree.find(&4), Some(&4));
//!     assert_eq!(tree.find(&5), None);
//!     assert_eq!(tree.len(), 4);
//! }
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod bst;
pub mod btree;
mod error;
mod store;

#[cfg(test)]
mod test {
    pub(crate) mod quick;
}

use std::fmt;

pub use avl::AvlTree;
pub use bst::SearchTree;
pub use btree::BTree;
pub use error::{Error, Result};

/// The contract shared by every tree in this crate. Keys are unique: inserting a key that is
/// already present leaves the tree untouched, and removing a missing key does nothing.
pub trait OrderedTree<K: Ord> {
    /// Returns the stored key equal to `key`, if any.
    fn find(&self, key: &K) -> Option<&K>;

    /// Inserts `key` unless an equal key is already stored.
    fn insert(&mut self, key: K);

    /// Removes the key equal to `key`, if any.
    fn remove(&mut self, key: &K);

    /// All keys in ascending order.
    fn keys(&self) -> Vec<&K>;

    /// Number of keys in the tree.
    fn len(&self) -> usize;

    /// Whether the tree holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an equal key is stored.
    fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// The in-order key sequence separated by single spaces. An empty tree gives an empty
    /// string.
    fn traverse(&self) -> String
    where
        K: fmt::Display,
    {
        join_keys(self.keys())
    }
}

pub(crate) fn join_keys<K: fmt::Display>(keys: Vec<&K>) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
