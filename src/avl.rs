//! A self-balancing Binary Search Tree (specifically, an AVL tree). It wraps a [`SearchTree`]
//! and, after every insert and remove, walks up from the change looking for a node whose
//! subtrees differ in height by more than one. Such a node is fixed with a trinode
//! restructuring: one or two rotations over the node, its taller child, and that child's
//! taller child.
//!
//! # Examples
//!
//! ```
//! use ordtree::{AvlTree, OrderedTree};
//!
//! let mut tree = AvlTree::new();
//! for key in 1..=3 {
//!     tree.insert(key);
//! }
//!
//! // Ascending inserts would make a plain BST a list; here 2 was rotated up to the root.
//! assert_eq!(tree.root_key(), Some(&2));
//! assert_eq!(tree.height(), 2);
//! assert_eq!(tree.traverse(), "1 2 3");
//!
//! assert_eq!(tree.count_less_than(&3), 2);
//! ```

use std::fmt;
use std::io;

use crate::bst::{DeleteResult, SearchTree};
use crate::store::Handle;
use crate::OrderedTree;

/// A height-balanced search tree. For every node the heights of its two subtrees differ by at
/// most one, so the height of a tree with `N` keys stays below `1.44 * lg(N + 2)`.
#[derive(Clone)]
pub struct AvlTree<K> {
    tree: SearchTree<K>,
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for AvlTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<K> AvlTree<K> {
    /// Generate a new, empty `AvlTree`.
    pub fn new() -> Self {
        Self {
            tree: SearchTree::new(),
        }
    }

    /// Number of levels in the tree. An empty tree has height 0.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// The key stored at the root, if any.
    pub fn root_key(&self) -> Option<&K> {
        self.tree.root_key()
    }

    /// See [`SearchTree::print_levels`].
    pub fn print_levels<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        K: fmt::Display,
    {
        self.tree.print_levels(out)
    }

    /// See [`SearchTree::print_mirrored`].
    pub fn print_mirrored<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        K: fmt::Display,
    {
        self.tree.print_mirrored(out)
    }

    /// Walks up from `start` and returns the grandchild `x` to restructure around the first
    /// unbalanced ancestor `z`, or `None` if every node on the path is balanced.
    ///
    /// `y` is the taller child of `z` and `x` the taller child of `y`. When `y`'s children are
    /// equally tall `x` is taken on the same side as `y`, so the restructuring is a single
    /// rotation. That tie only happens after a removal.
    fn find_restructure_node(&self, start: Option<Handle>) -> Option<Handle> {
        let mut current = start;
        while let Some(z) = current {
            let node = self.tree.node(z);
            let balance = self.tree.balance_factor(z);
            if balance.abs() > 1 {
                let (y, leaning_right) = if balance > 0 {
                    (node.right?, true)
                } else {
                    (node.left?, false)
                };
                let y_node = self.tree.node(y);
                let x = match self.tree.balance_factor(y) {
                    b if b > 0 => y_node.right,
                    b if b < 0 => y_node.left,
                    _ if leaning_right => y_node.right,
                    _ => y_node.left,
                };
                return x;
            }
            current = node.parent;
        }
        None
    }

    /// Trinode restructuring around `x`, its parent `y`, and its grandparent `z`. Returns the
    /// node now at the top of the restructured subtree.
    fn restructure(&mut self, x: Handle) -> Handle {
        let y = self
            .tree
            .node(x)
            .parent
            .expect("restructured node has a parent");
        let z = self
            .tree
            .node(y)
            .parent
            .expect("restructured node has a grandparent");

        let x_is_right = self.tree.node(y).right == Some(x);
        let y_is_right = self.tree.node(z).right == Some(y);

        if x_is_right == y_is_right {
            // `y` holds the middle key.
            log::trace!("single rotation of {:?}", y);
            self.tree.rotate(y);
            y
        } else {
            // `x` holds the middle key.
            log::trace!("double rotation of {:?}", x);
            self.tree.rotate(x);
            self.tree.rotate(x);
            x
        }
    }

    /// Restores the balance invariant on the path from `start` to the root. An insert needs at
    /// most one restructuring, a remove can need one per level.
    fn rebalance(&mut self, start: Option<Handle>) {
        let mut current = start;
        while let Some(x) = self.find_restructure_node(current) {
            let top = self.restructure(x);
            current = self.tree.node(top).parent;
        }

        if cfg!(debug_assertions) {
            if let Some(root) = self.tree.root() {
                assert!(self.tree.balance_factor(root).abs() <= 1);
            }
        }
    }
}

impl<K: Ord> AvlTree<K> {
    /// Counts the keys strictly less than `key`.
    ///
    /// A node less than `key` contributes itself and every key in its left subtree, and its
    /// right subtree still has to be searched. Otherwise only the left subtree can contribute.
    /// Nodes don't track subtree sizes, so this visits every smaller key: `O(N)` in the worst
    /// case even though the tree is balanced.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::AvlTree;
    ///
    /// let tree: AvlTree<_> = [10, 20, 30, 40].into_iter().collect();
    ///
    /// assert_eq!(tree.count_less_than(&5), 0);
    /// assert_eq!(tree.count_less_than(&30), 2);
    /// assert_eq!(tree.count_less_than(&31), 3);
    /// ```
    pub fn count_less_than(&self, key: &K) -> usize {
        self.count_below(self.tree.root(), key)
    }

    fn count_below(&self, handle: Option<Handle>, key: &K) -> usize {
        let Some(handle) = handle else {
            return 0;
        };
        let node = self.tree.node(handle);
        if node.key < *key {
            1 + self.count_below(node.left, key) + self.count_below(node.right, key)
        } else {
            self.count_below(node.left, key)
        }
    }
}

impl<K: Ord> OrderedTree<K> for AvlTree<K> {
    fn find(&self, key: &K) -> Option<&K> {
        self.tree.find(key)
    }

    fn insert(&mut self, key: K) {
        if let Some(leaf) = self.tree.attach(key) {
            let parent = self.tree.node(leaf).parent;
            self.rebalance(parent);
        }
    }

    fn remove(&mut self, key: &K) {
        if let DeleteResult::Spliced { at } = self.tree.splice_out(key) {
            self.rebalance(at);
        }
    }

    fn keys(&self) -> Vec<&K> {
        self.tree.keys()
    }

    fn len(&self) -> usize {
        self.tree.len()
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
