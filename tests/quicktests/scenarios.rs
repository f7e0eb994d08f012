use ordtree::{AvlTree, BTree, Error, OrderedTree, SearchTree};

#[test]
fn avl_ascending_inserts_rotate_once() {
    let mut tree = AvlTree::new();
    tree.insert(1);
    tree.insert(2);
    assert_eq!(tree.root_key(), Some(&1));

    tree.insert(3);
    assert_eq!(tree.traverse(), "1 2 3");
    assert_eq!(tree.root_key(), Some(&2));
    assert_eq!(tree.height(), 2);
}

#[test]
fn btree_root_splits_after_fourth_key() {
    let mut tree = BTree::new(2).unwrap();
    let mut heights = Vec::new();
    for key in 1..=5 {
        tree.insert(key);
        heights.push(tree.height());
    }

    assert_eq!(heights, [1, 1, 1, 2, 2]);
    assert_eq!(tree.traverse(), "1 2 3 4 5");
}

#[test]
fn bst_remove_with_two_children() {
    let mut tree = SearchTree::new();
    for key in [5, 3, 8, 1, 4] {
        tree.insert(key);
    }
    tree.remove(&5);

    assert_eq!(tree.len(), 4);
    assert_eq!(tree.traverse(), "1 3 4 8");
}

#[test]
fn btree_rejects_small_orders() {
    assert_eq!(
        BTree::<u8>::new(1).unwrap_err(),
        Error::InvalidOrder { order: 1 }
    );
}

#[test]
fn balanced_trees_stay_shallow_on_sorted_input() {
    let n = 1 << 12;
    let bst: SearchTree<u32> = (0..n).collect();
    let avl: AvlTree<u32> = (0..n).collect();
    let btree: BTree<u32> = (0..n).collect();

    assert_eq!(bst.height(), n as usize);
    assert!(avl.height() <= 18);
    assert!(btree.height() <= 12);
    assert_eq!(avl.count_less_than(&100), 100);
}

#[test]
fn avl_debug_dump_matches_shape() {
    let tree: AvlTree<_> = (1..=7).collect();

    let mut out = Vec::new();
    tree.print_levels(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "BST:\n4 2 6\n2 1 3\n6 5 7"
    );

    let mut out = Vec::new();
    tree.print_mirrored(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "BSMT:\n4 6 2\n6 7 5\n2 3 1"
    );
}
