use ordtree::{AvlTree, BTree, OrderedTree, SearchTree};

use std::collections::BTreeSet;

use crate::Op;

/// One of every tree, boxed behind the shared contract.
fn all_trees() -> Vec<Box<dyn OrderedTree<i8>>> {
    vec![
        Box::new(SearchTree::new()),
        Box::new(AvlTree::new()),
        Box::new(BTree::new(2).unwrap()),
        Box::new(BTree::new(5).unwrap()),
    ]
}

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and removes we have the same keys in both.
fn do_ops(ops: &[Op<i8>], tree: &mut dyn OrderedTree<i8>, set: &mut BTreeSet<i8>) {
    for op in ops {
        match op {
            Op::Insert(k) => {
                tree.insert(*k);
                set.insert(*k);
            }
            Op::Remove(k) => {
                tree.remove(k);
                set.remove(k);
            }
        }
    }
}

fn expected_traversal(set: &BTreeSet<i8>) -> String {
    set.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        all_trees().into_iter().all(|mut tree| {
            let mut set = BTreeSet::new();
            do_ops(&ops, tree.as_mut(), &mut set);

            tree.len() == set.len()
                && tree.traverse() == expected_traversal(&set)
                && (i8::MIN..=i8::MAX).all(|k| tree.contains(&k) == set.contains(&k))
        })
    }

    fn traversal_is_strictly_increasing(xs: Vec<i8>) -> bool {
        all_trees().into_iter().all(|mut tree| {
            for x in &xs {
                tree.insert(*x);
            }
            tree.keys().windows(2).all(|pair| pair[0] < pair[1])
        })
    }

    fn insert_is_idempotent(xs: Vec<i8>, again: i8) -> bool {
        all_trees().into_iter().all(|mut tree| {
            for x in &xs {
                tree.insert(*x);
            }
            tree.insert(again);
            let traversal = tree.traverse();
            let len = tree.len();

            tree.insert(again);
            tree.traverse() == traversal && tree.len() == len
        })
    }

    fn removing_everything_empties(xs: Vec<i8>) -> bool {
        all_trees().into_iter().all(|mut tree| {
            for x in &xs {
                tree.insert(*x);
            }
            for x in &xs {
                tree.remove(x);
            }
            tree.is_empty() && tree.traverse().is_empty()
        })
    }

    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        all_trees().into_iter().all(|mut tree| {
            for x in &xs {
                tree.insert(*x);
            }
            let added: BTreeSet<_> = xs.iter().collect();
            nots.iter()
                .filter(|x| !added.contains(x))
                .all(|x| tree.find(x).is_none())
        })
    }
}
