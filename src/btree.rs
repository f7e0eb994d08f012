//! A B-tree. Every node holds a sorted run of keys and, unless it is a leaf, one more child than
//! it has keys. The `order` bounds how full a node can get: at most `2 * order - 1` keys, and at
//! least `order - 1` keys for every node except the root.
//!
//! Insertion never descends into a full node. A full child is split before the search enters it,
//! promoting its median key into the parent, so a single downward pass is enough and the tree
//! only ever grows at the root. Removal works the same way in reverse: a child holding the
//! minimum number of keys is topped up (borrowing from a sibling or merging with one) before the
//! search enters it.
//!
//! # Examples
//!
//! ```
//! use ordtree::{BTree, OrderedTree};
//!
//! let mut tree = BTree::new(2).unwrap();
//! for key in 1..=5 {
//!     tree.insert(key);
//! }
//!
//! assert_eq!(tree.traverse(), "1 2 3 4 5");
//! assert_eq!(tree.height(), 2);
//!
//! tree.remove(&3);
//! assert_eq!(tree.find(&3), None);
//! assert_eq!(tree.traverse(), "1 2 4 5");
//!
//! // An order below 2 can't be split into two valid halves.
//! assert!(BTree::<i32>::new(1).is_err());
//! ```

use std::fmt;
use std::mem;

use crate::error::{Error, Result};
use crate::OrderedTree;

/// The order used by [`BTree::default`]: up to three keys per node.
pub const DEFAULT_ORDER: usize = 2;

/// A B-tree of unique keys. See the [module documentation](self) for the node bounds.
#[derive(Clone)]
pub struct BTree<K> {
    root: Node<K>,
    order: usize,
    len: usize,
}

/// A node is a leaf exactly when `children` is empty.
#[derive(Clone, Debug)]
struct Node<K> {
    keys: Vec<K>,
    children: Vec<Node<K>>,
}

impl<K> Default for BTree<K> {
    fn default() -> Self {
        Self {
            root: Node::new(DEFAULT_ORDER),
            order: DEFAULT_ORDER,
            len: 0,
        }
    }
}

impl<K> fmt::Debug for BTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = Vec::with_capacity(self.len);
        self.root.collect(&mut keys);
        f.debug_set().entries(keys).finish()
    }
}

impl<K> BTree<K> {
    /// Creates an empty tree whose nodes hold at most `2 * order - 1` keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `order` is less than 2.
    pub fn new(order: usize) -> Result<Self> {
        if order < 2 {
            return Err(Error::InvalidOrder { order });
        }
        log::debug!("creating B-tree of order {}", order);

        Ok(Self {
            root: Node::new(order),
            order,
            len: 0,
        })
    }

    /// The order this tree was created with.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of levels in the tree. Every leaf sits at this depth. An empty tree has height 0.
    pub fn height(&self) -> usize {
        if self.root.keys.is_empty() {
            return 0;
        }

        let mut height = 1;
        let mut node = &self.root;
        while let Some(child) = node.children.first() {
            node = child;
            height += 1;
        }
        height
    }

    fn max_keys(&self) -> usize {
        2 * self.order - 1
    }
}

impl<K: Ord> OrderedTree<K> for BTree<K> {
    fn find(&self, key: &K) -> Option<&K> {
        let mut node = &self.root;
        loop {
            match node.keys.binary_search(key) {
                Ok(index) => return Some(&node.keys[index]),
                Err(_) if node.is_leaf() => return None,
                // `index` is the rank of `key` among the node's keys, which is also the child
                // to the right of the largest key less than `key`.
                Err(index) => node = &node.children[index],
            }
        }
    }

    fn insert(&mut self, key: K) {
        if self.contains(&key) {
            return;
        }

        if self.root.keys.len() == self.max_keys() {
            log::trace!("splitting full root");
            let old_root = mem::replace(&mut self.root, Node::new(self.order));
            self.root.children.push(old_root);
            self.root.split_child(0, self.order);
        }

        self.root.insert_non_full(key, self.order);
        self.len += 1;
    }

    fn remove(&mut self, key: &K) {
        if !self.contains(key) {
            return;
        }

        self.root.remove(key, self.order);
        self.len -= 1;

        // A merge can pull the root's last key down into its only child.
        if self.root.keys.is_empty() {
            if let Some(child) = self.root.children.pop() {
                log::trace!("collapsing empty root");
                self.root = child;
            }
        }
    }

    fn keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        self.root.collect(&mut keys);
        keys
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<K: Ord> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for BTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<K> Node<K> {
    fn new(order: usize) -> Self {
        Self {
            keys: Vec::with_capacity(2 * order - 1),
            children: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// In-order walk: each child's keys come before the key separating it from the next child.
    fn collect<'a>(&'a self, out: &mut Vec<&'a K>) {
        for (index, key) in self.keys.iter().enumerate() {
            if let Some(child) = self.children.get(index) {
                child.collect(out);
            }
            out.push(key);
        }
        if let Some(last) = self.children.get(self.keys.len()) {
            last.collect(out);
        }
    }

    /// Splits the full child at `index` around its median. The child keeps the lower
    /// `order - 1` keys, a new sibling inserted right after it takes the upper `order - 1` keys
    /// (and upper `order` children), and the median moves up into `self` at `index`.
    fn split_child(&mut self, index: usize, order: usize) {
        let child = &mut self.children[index];
        debug_assert_eq!(child.keys.len(), 2 * order - 1);

        let mut sibling = Node::new(order);
        sibling.keys = child.keys.split_off(order);
        if !child.is_leaf() {
            sibling.children = child.children.split_off(order);
        }
        let median = child.keys.pop().expect("a full node has a median");
        log::trace!(
            "split child {} into {} + {} keys",
            index,
            child.keys.len(),
            sibling.keys.len()
        );

        self.keys.insert(index, median);
        self.children.insert(index + 1, sibling);
    }

    /// Pulls the separator at `index` and the child right of it down into the child left of it.
    /// Both children must hold `order - 1` keys so the result holds exactly `2 * order - 1`.
    fn merge_children(&mut self, index: usize) {
        let right = self.children.remove(index + 1);
        let separator = self.keys.remove(index);
        let left = &mut self.children[index];
        log::trace!("merging children {} and {}", index, index + 1);

        left.keys.push(separator);
        left.keys.extend(right.keys);
        left.children.extend(right.children);
    }

    /// Rotates a key from the child at `index - 1` through the parent into the child at `index`.
    fn borrow_from_left(&mut self, index: usize) {
        let (before, after) = self.children.split_at_mut(index);
        let sibling = &mut before[index - 1];
        let child = &mut after[0];
        log::trace!("child {} borrowing from its left sibling", index);

        let borrowed = sibling.keys.pop().expect("left sibling can spare a key");
        let separator = mem::replace(&mut self.keys[index - 1], borrowed);
        child.keys.insert(0, separator);
        if let Some(grandchild) = sibling.children.pop() {
            child.children.insert(0, grandchild);
        }
    }

    /// Rotates a key from the child at `index + 1` through the parent into the child at `index`.
    fn borrow_from_right(&mut self, index: usize) {
        let (before, after) = self.children.split_at_mut(index + 1);
        let child = &mut before[index];
        let sibling = &mut after[0];
        log::trace!("child {} borrowing from its right sibling", index);

        let borrowed = sibling.keys.remove(0);
        let separator = mem::replace(&mut self.keys[index], borrowed);
        child.keys.push(separator);
        if !sibling.is_leaf() {
            child.children.push(sibling.children.remove(0));
        }
    }

    /// Makes sure the child at `index` holds at least `order` keys so a removal below it can't
    /// leave it short. Returns the index of the child that now covers the same key range, which
    /// moves left by one when the child is merged into its left sibling.
    fn fill_child(&mut self, index: usize, order: usize) -> usize {
        if self.children[index].keys.len() >= order {
            return index;
        }

        let has_right = index + 1 < self.children.len();
        if index > 0 && self.children[index - 1].keys.len() >= order {
            self.borrow_from_left(index);
            index
        } else if has_right && self.children[index + 1].keys.len() >= order {
            self.borrow_from_right(index);
            index
        } else if has_right {
            self.merge_children(index);
            index
        } else {
            self.merge_children(index - 1);
            index - 1
        }
    }

    /// Removes and returns the largest key below `self`.
    fn pop_max(&mut self, order: usize) -> K {
        if self.is_leaf() {
            return self.keys.pop().expect("non-root nodes are never empty");
        }
        let index = self.fill_child(self.children.len() - 1, order);
        self.children[index].pop_max(order)
    }

    /// Removes and returns the smallest key below `self`.
    fn pop_min(&mut self, order: usize) -> K {
        if self.is_leaf() {
            return self.keys.remove(0);
        }
        let index = self.fill_child(0, order);
        self.children[index].pop_min(order)
    }
}

impl<K: Ord> Node<K> {
    /// Inserts into a node known not to be full, splitting full children on the way down.
    fn insert_non_full(&mut self, key: K, order: usize) {
        let mut index = match self.keys.binary_search(&key) {
            Ok(_) => return,
            Err(index) => index,
        };

        if self.is_leaf() {
            self.keys.insert(index, key);
            return;
        }

        if self.children[index].keys.len() == 2 * order - 1 {
            self.split_child(index, order);
            if key > self.keys[index] {
                index += 1;
            }
        }
        self.children[index].insert_non_full(key, order);
    }

    /// Removes `key`, which must be present below `self`. `self` is either the root or holds at
    /// least `order` keys, so it can give one up.
    fn remove(&mut self, key: &K, order: usize) {
        match self.keys.binary_search(key) {
            Ok(index) if self.is_leaf() => {
                self.keys.remove(index);
            }
            Ok(index) => {
                if self.children[index].keys.len() >= order {
                    self.keys[index] = self.children[index].pop_max(order);
                } else if self.children[index + 1].keys.len() >= order {
                    self.keys[index] = self.children[index + 1].pop_min(order);
                } else {
                    self.merge_children(index);
                    self.children[index].remove(key, order);
                }
            }
            Err(_) if self.is_leaf() => {}
            Err(index) => {
                let index = self.fill_child(index, order);
                self.children[index].remove(key, order);
            }
        }
    }
}
