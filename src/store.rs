//! The node store backing the binary trees.
//!
//! Nodes live in a slot arena owned by their tree and refer to each other through [`Handle`]s.
//! A `parent` handle is only a way back up the tree and says nothing about who owns the node:
//! the store owns every node, so bidirectional links never form an ownership cycle.

use std::num::NonZeroUsize;

/// An index into a [`NodeStore`]. Stored as `index + 1` so that `Option<Handle>` is the same size
/// as `Handle`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Handle(NonZeroUsize);

impl Handle {
    fn from_index(index: usize) -> Self {
        Self(NonZeroUsize::new(index + 1).expect("`index + 1` is never zero"))
    }

    fn to_index(self) -> usize {
        self.0.get() - 1
    }
}

/// A binary tree node. `height` counts the levels in the subtree rooted here, so a leaf has a
/// height of 1 and a missing child counts as 0.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) parent: Option<Handle>,
    pub(crate) height: usize,
}

impl<K> Node<K> {
    pub(crate) fn new(key: K, parent: Option<Handle>) -> Self {
        Self {
            key,
            left: None,
            right: None,
            parent,
            height: 1,
        }
    }
}

/// Growable arena of [`Node`]s. Freed slots are recycled by later allocations.
#[derive(Clone, Debug)]
pub(crate) struct NodeStore<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<Handle>,
}

impl<K> Default for NodeStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> NodeStore<K> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, node: Node<K>) -> Handle {
        match self.free.pop() {
            Some(handle) => {
                self.slots[handle.to_index()] = Some(node);
                handle
            }
            None => {
                self.slots.push(Some(node));
                Handle::from_index(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn get(&self, handle: Handle) -> &Node<K> {
        self.slots[handle.to_index()]
            .as_ref()
            .expect("`NodeStore::get()` - `handle` is invalid!")
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.slots[handle.to_index()]
            .as_mut()
            .expect("`NodeStore::get_mut()` - `handle` is invalid!")
    }

    /// Removes the node from the store, handing it back to the caller. The handle may be reused
    /// by the next allocation.
    pub(crate) fn take(&mut self, handle: Handle) -> Node<K> {
        let node = self.slots[handle.to_index()]
            .take()
            .expect("`NodeStore::take()` - `handle` is invalid!");
        self.free.push(handle);
        node
    }

    /// Height of a possibly-missing subtree.
    pub(crate) fn height(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| self.get(h).height)
    }

    /// Recomputes `height` for `handle` from its children.
    pub(crate) fn fix_height(&mut self, handle: Handle) {
        let node = self.get(handle);
        let height = self.height(node.left).max(self.height(node.right)) + 1;
        self.get_mut(handle).height = height;
    }

    /// `height(right) - height(left)`.
    pub(crate) fn balance_factor(&self, handle: Handle) -> isize {
        let node = self.get(handle);
        self.height(node.right) as isize - self.height(node.left) as isize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_round_trip() {
        for index in [0, 1, 7, 1 << 20] {
            assert_eq!(Handle::from_index(index).to_index(), index);
        }
        assert_eq!(
            std::mem::size_of::<Handle>(),
            std::mem::size_of::<Option<Handle>>()
        );
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut store = NodeStore::new();
        let a = store.alloc(Node::new(1, None));
        let b = store.alloc(Node::new(2, Some(a)));
        assert_eq!(store.len(), 2);

        let taken = store.take(a);
        assert_eq!(taken.key, 1);
        assert_eq!(store.len(), 1);

        let c = store.alloc(Node::new(3, None));
        assert_eq!(c, a);
        assert_eq!(store.get(c).key, 3);
        assert_eq!(store.get(b).parent, Some(a));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn heights_and_balance() {
        let mut store = NodeStore::new();
        let root = store.alloc(Node::new(5, None));
        let right = store.alloc(Node::new(7, Some(root)));
        store.get_mut(root).right = Some(right);

        assert_eq!(store.height(None), 0);
        store.fix_height(root);
        assert_eq!(store.height(Some(root)), 2);
        assert_eq!(store.balance_factor(root), 1);
        assert_eq!(store.balance_factor(right), 0);
    }

    #[test]
    #[should_panic(expected = "`NodeStore::get()` - `handle` is invalid!")]
    fn stale_handle_panics() {
        let mut store = NodeStore::new();
        let a = store.alloc(Node::new(1, None));
        store.take(a);
        store.get(a);
    }

    quickcheck::quickcheck! {
        fn store_behaves_like_vec(values: Vec<(bool, u8)>) -> bool {
            let mut model: Vec<(Handle, u8)> = Vec::new();
            let mut store = NodeStore::new();

            for (alloc, value) in values {
                if alloc || model.is_empty() {
                    model.push((store.alloc(Node::new(value, None)), value));
                } else {
                    let index = value as usize % model.len();
                    let (handle, expected) = model.swap_remove(index);
                    if store.take(handle).key != expected {
                        return false;
                    }
                }
            }

            store.len() == model.len()
                && model.iter().all(|&(handle, value)| store.get(handle).key == value)
        }
    }
}
