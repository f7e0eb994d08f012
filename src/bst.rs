//! An unbalanced Binary Search Tree. Nodes know their parent and cache the height of their
//! subtree, which makes this the shared engine underneath [`AvlTree`](crate::AvlTree).
//!
//! # Examples
//!
//! ```
//! use ordtree::{OrderedTree, SearchTree};
//!
//! let mut tree = SearchTree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.find(&1), None);
//!
//! tree.insert(1);
//! assert_eq!(tree.find(&1), Some(&1));
//!
//! // Inserting the same key again does nothing.
//! tree.insert(1);
//! assert_eq!(tree.len(), 1);
//!
//! tree.remove(&1);
//! assert_eq!(tree.find(&1), None);
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::io;

use crate::store::{Handle, Node, NodeStore};
use crate::OrderedTree;

/// A Binary Search Tree with no balancing. Inserting keys in sorted order degrades it to a
/// linked list of height `N`.
#[derive(Clone)]
pub struct SearchTree<K> {
    store: NodeStore<K>,
    root: Option<Handle>,
}

/// Outcome of [`SearchTree::splice_out`].
pub(crate) enum DeleteResult {
    /// The key wasn't found so nothing was deleted.
    NotFound,
    /// A node was unlinked. `at` is the parent of the node that physically left the tree, which
    /// is where heights started changing. `None` means the removed node was the root.
    Spliced { at: Option<Handle> },
}

impl<K> Default for SearchTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for SearchTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.in_order()).finish()
    }
}

impl<K> SearchTree<K> {
    /// Generate a new, empty `SearchTree`.
    pub fn new() -> Self {
        Self {
            store: NodeStore::new(),
            root: None,
        }
    }

    /// Number of levels in the tree. An empty tree has height 0 and a lone root has height 1.
    pub fn height(&self) -> usize {
        self.store.height(self.root)
    }

    /// The key stored at the root, if any.
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|root| &self.store.get(root).key)
    }

    /// Writes every node that has children as a `parent left right` line, visiting nodes in
    /// breadth first order. The output starts with a `BST:` header and every line after it is
    /// preceded by a newline.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{OrderedTree, SearchTree};
    ///
    /// let tree: SearchTree<_> = [5, 3, 8, 1].into_iter().collect();
    /// let mut out = Vec::new();
    /// tree.print_levels(&mut out).unwrap();
    ///
    /// assert_eq!(String::from_utf8(out).unwrap(), "BST:\n5 3 8\n3 1");
    /// ```
    pub fn print_levels<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        K: fmt::Display,
    {
        self.print_breadth_first(out, "BST:", false)
    }

    /// Same as [`print_levels`](Self::print_levels) except the right child is listed before the
    /// left one, which is the level order of the mirrored tree. The header is `BSMT:`.
    pub fn print_mirrored<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        K: fmt::Display,
    {
        self.print_breadth_first(out, "BSMT:", true)
    }

    fn print_breadth_first<W: io::Write>(
        &self,
        out: &mut W,
        header: &str,
        mirrored: bool,
    ) -> io::Result<()>
    where
        K: fmt::Display,
    {
        write!(out, "{}", header)?;

        let mut queue: VecDeque<Handle> = self.root.into_iter().collect();
        while let Some(current) = queue.pop_front() {
            let node = self.store.get(current);
            let children = if mirrored {
                [node.right, node.left]
            } else {
                [node.left, node.right]
            };
            if children.iter().all(Option::is_none) {
                continue;
            }

            write!(out, "\n{}", node.key)?;
            for child in children.into_iter().flatten() {
                queue.push_back(child);
                write!(out, " {}", self.store.get(child).key)?;
            }
        }

        Ok(())
    }

    /// Keys in ascending order. Walks with an explicit stack because an unbalanced tree can be
    /// as deep as it is long.
    pub(crate) fn in_order(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.store.len());
        let mut stack = Vec::new();
        let mut current = self.root;

        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.store.get(handle).left;
            }
            let Some(handle) = stack.pop() else {
                break;
            };
            let node = self.store.get(handle);
            keys.push(&node.key);
            current = node.right;
        }

        keys
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.store.get(handle)
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    #[cfg(test)]
    pub(crate) fn subtree_height(&self, handle: Option<Handle>) -> usize {
        self.store.height(handle)
    }

    pub(crate) fn balance_factor(&self, handle: Handle) -> isize {
        self.store.balance_factor(handle)
    }

    /// Recomputes heights from `start` up to the root. Only this path can change after linking
    /// or unlinking a node below `start`.
    pub(crate) fn update_heights(&mut self, start: Option<Handle>) {
        let mut current = start;
        while let Some(handle) = current {
            self.store.fix_height(handle);
            current = self.store.get(handle).parent;
        }
    }

    /// Exchanges `x` with its parent `y`. `x` takes over `y`'s slot, `x`'s child facing `y`
    /// moves under `y`, and `y` becomes `x`'s child on the other side. Does nothing for the root.
    ///
    /// # Diagram
    ///
    /// Rotating `x` up when it's the left child:
    ///
    /// ```text
    ///      Option<parent>        Option<parent>
    ///          /                     /
    ///         y                     x
    ///        / \                   / \
    ///       x   c     rotate ->   a   y
    ///      / \                       / \
    ///     a   b                     b   c
    /// ```
    pub(crate) fn rotate(&mut self, x: Handle) {
        let Some(y) = self.store.get(x).parent else {
            return;
        };
        let grandparent = self.store.get(y).parent;
        log::trace!("rotating {:?} above {:?}", x, y);

        if self.store.get(y).left == Some(x) {
            let inner = self.store.get(x).right;
            self.store.get_mut(y).left = inner;
            self.store.get_mut(x).right = Some(y);
            self.set_parent(inner, Some(y));
        } else {
            let inner = self.store.get(x).left;
            self.store.get_mut(y).right = inner;
            self.store.get_mut(x).left = Some(y);
            self.set_parent(inner, Some(y));
        }

        self.store.get_mut(y).parent = Some(x);
        self.store.get_mut(x).parent = grandparent;
        self.replace_child(grandparent, y, Some(x));

        // `y` is now below `x` so fixing from `y` upward covers both.
        self.update_heights(Some(y));
    }

    fn set_parent(&mut self, child: Option<Handle>, parent: Option<Handle>) {
        if let Some(child) = child {
            self.store.get_mut(child).parent = parent;
        }
    }

    /// Points whichever of `parent`'s child links referred to `old` at `new` instead. A `None`
    /// parent means `old` was the root.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = self.store.get_mut(parent);
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    parent.right = new;
                }
            }
        }
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.store.get(handle).left {
            handle = left;
        }
        handle
    }

    /// Unlinks a node with at most one child by moving that child into its slot. Returns the
    /// removed node's parent after its height has been fixed.
    fn unlink(&mut self, handle: Handle) -> Option<Handle> {
        let node = self.store.get(handle);
        debug_assert!(node.left.is_none() || node.right.is_none());
        let child = node.left.or(node.right);
        let parent = node.parent;

        self.set_parent(child, parent);
        self.replace_child(parent, handle, child);
        self.update_heights(parent);
        parent
    }
}

impl<K: Ord> SearchTree<K> {
    /// Finds the node holding `key` or, when there isn't one, the node `key` would hang from.
    /// Only returns `None` for an empty tree.
    pub(crate) fn closest(&self, key: &K) -> Option<Handle> {
        let mut current = self.root?;
        loop {
            let node = self.store.get(current);
            let next = match key.cmp(&node.key) {
                Ordering::Equal => return Some(current),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            match next {
                Some(next) => current = next,
                None => return Some(current),
            }
        }
    }

    fn locate(&self, key: &K) -> Option<Handle> {
        self.closest(key)
            .filter(|&handle| self.store.get(handle).key == *key)
    }

    /// Links a new leaf for `key` below its closest node. Returns the new node, or `None` when
    /// the key was already present.
    pub(crate) fn attach(&mut self, key: K) -> Option<Handle> {
        let Some(closest) = self.closest(&key) else {
            let root = self.store.alloc(Node::new(key, None));
            self.root = Some(root);
            return Some(root);
        };

        let ordering = key.cmp(&self.store.get(closest).key);
        if ordering == Ordering::Equal {
            return None;
        }

        let leaf = self.store.alloc(Node::new(key, Some(closest)));
        let parent = self.store.get_mut(closest);
        if ordering == Ordering::Less {
            parent.left = Some(leaf);
        } else {
            parent.right = Some(leaf);
        }
        self.update_heights(Some(closest));

        Some(leaf)
    }

    /// Structurally removes `key` without any rebalancing.
    ///
    /// A node with two children is not unlinked itself: its in-order successor (the leftmost
    /// node of its right subtree, which has no left child) is unlinked instead and its key moves
    /// into the node.
    pub(crate) fn splice_out(&mut self, key: &K) -> DeleteResult {
        let Some(found) = self.locate(key) else {
            return DeleteResult::NotFound;
        };

        let node = self.store.get(found);
        let at = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let successor = self.leftmost(right);
                let at = self.unlink(successor);
                let successor = self.store.take(successor);
                self.store.get_mut(found).key = successor.key;
                at
            }
            _ => {
                let at = self.unlink(found);
                self.store.take(found);
                at
            }
        };

        if cfg!(debug_assertions) {
            if let Some(at) = at {
                let node = self.store.get(at);
                let expected = self.store.height(node.left).max(self.store.height(node.right)) + 1;
                assert_eq!(node.height, expected);
            }
        }

        DeleteResult::Spliced { at }
    }
}

impl<K: Ord> OrderedTree<K> for SearchTree<K> {
    fn find(&self, key: &K) -> Option<&K> {
        self.locate(key).map(|handle| &self.store.get(handle).key)
    }

    fn insert(&mut self, key: K) {
        self.attach(key);
    }

    fn remove(&mut self, key: &K) {
        self.splice_out(key);
    }

    fn keys(&self) -> Vec<&K> {
        self.in_order()
    }

    fn len(&self) -> usize {
        self.store.len()
    }
}

impl<K: Ord> Extend<K> for SearchTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for SearchTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

/// Walks every node checking the search order, parent links, and cached heights. With `balanced`
/// set it also checks that sibling subtree heights differ by at most one.
#[cfg(test)]
pub(crate) fn assert_consistent<K: Ord + fmt::Debug>(tree: &SearchTree<K>, balanced: bool) {
    fn walk<K: Ord + fmt::Debug>(
        tree: &SearchTree<K>,
        handle: Option<Handle>,
        parent: Option<Handle>,
        balanced: bool,
    ) -> usize {
        let Some(handle) = handle else {
            return 0;
        };
        let node = tree.node(handle);
        assert_eq!(node.parent, parent, "bad parent link at {:?}", node.key);
        if let Some(left) = node.left {
            assert!(tree.node(left).key < node.key);
        }
        if let Some(right) = node.right {
            assert!(tree.node(right).key > node.key);
        }

        let left_height = walk(tree, node.left, Some(handle), balanced);
        let right_height = walk(tree, node.right, Some(handle), balanced);
        assert_eq!(node.height, left_height.max(right_height) + 1, "bad height at {:?}", node.key);
        if balanced {
            assert!(
                left_height.abs_diff(right_height) <= 1,
                "unbalanced at {:?}",
                node.key
            );
        }
        node.height
    }

    walk(tree, tree.root(), None, balanced);
    let keys = tree.in_order();
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(keys.len(), tree.len());
}
