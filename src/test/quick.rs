use std::collections::BTreeSet;

use quickcheck::{Arbitrary, Gen};

use crate::OrderedTree;

/// An enum for the various kinds of "things" to do to
/// search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<K> {
    /// Insert the K into the data structure
    Insert(K),
    /// Remove the K from the data structure
    Remove(K),
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation. Inserts are twice as likely as
    /// removes so trees actually grow.
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 1, 2]).unwrap() {
            0 | 1 => Op::Insert(K::arbitrary(g)),
            2 => Op::Remove(K::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}

/// Applies a set of operations to a tree and a `BTreeSet`.
/// This way we can ensure that after a random smattering of inserts
/// and removes we have the same set of keys in both.
pub(crate) fn apply<K, T>(ops: &[Op<K>], tree: &mut T, set: &mut BTreeSet<K>)
where
    K: Ord + Clone,
    T: OrderedTree<K>,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                tree.insert(k.clone());
                set.insert(k.clone());
            }
            Op::Remove(k) => {
                tree.remove(k);
                set.remove(k);
            }
        }
        assert_eq!(tree.len(), set.len());
    }
}
