use std::cmp::Ordering;
use std::sync::Once;

use akai_tree::{Color, Error, Handle, NaturalOrder, RbTree};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use simplelog::{Config, LevelFilter, TestLogger};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 4_000;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = TestLogger::init(LevelFilter::Debug, Config::default());
    });
}

/// Generates values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

/// Collects the payloads by walking `first`/`successor`.
fn in_order<T: Copy, C>(tree: &RbTree<T, C>) -> Vec<T> {
    let mut values = Vec::with_capacity(tree.len());
    let mut node = tree.first();
    while let Some(handle) = node {
        values.push(*tree.get(handle));
        node = tree.successor(handle);
    }
    values
}

fn tree_of(values: &[i64]) -> (RbTree<i64>, Vec<Handle>) {
    let mut tree = RbTree::default();
    let handles = values.iter().map(|&value| tree.push(value)).collect();
    (tree, handles)
}

fn value_of<C>(tree: &RbTree<i64, C>, handle: Option<Handle>) -> Option<i64> {
    handle.map(|h| *tree.get(h))
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn ascending_three_rotate_into_black_root_with_red_children() {
    init_logging();
    let (tree, handles) = tree_of(&[10, 20, 30]);

    let root = tree.root().unwrap();
    assert_eq!(root, handles[1]);
    assert_eq!(*tree.get(root), 20);
    assert_eq!(tree.color(root), Color::Black);
    assert_eq!(tree.parent(root), None);

    let left = tree.left(root).unwrap();
    let right = tree.right(root).unwrap();
    assert_eq!((*tree.get(left), tree.color(left)), (10, Color::Red));
    assert_eq!((*tree.get(right), tree.color(right)), (30, Color::Red));
    assert_eq!(tree.parent(left), Some(root));
    assert_eq!(tree.parent(right), Some(root));

    for leaf in [left, right] {
        assert_eq!(tree.left(leaf), None);
        assert_eq!(tree.right(leaf), None);
    }
    assert_eq!(tree.check_invariants(), Ok(1));
}

#[test]
fn boundary_searches_on_three_nodes() {
    init_logging();
    let (tree, handles) = tree_of(&[10, 20, 30]);

    assert_eq!(tree.find_less_or_equal(&25), Some(handles[1]));
    assert_eq!(tree.find_greater_or_equal(&25), Some(handles[2]));
    assert_eq!(tree.find_less_or_equal(&5), None);
    assert_eq!(tree.find_greater_or_equal(&35), None);

    assert_eq!(tree.find_less_or_equal(&30), Some(handles[2]));
    assert_eq!(tree.find_greater_or_equal(&10), Some(handles[0]));
    assert_eq!(tree.find(&20), Some(handles[1]));
    assert_eq!(tree.find(&21), None);
}

#[test]
fn deleting_the_root_of_three_nodes() {
    init_logging();
    let (mut tree, handles) = tree_of(&[10, 20, 30]);

    tree.delete(handles[1]);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.find(&20), None);
    assert_eq!(tree.find_less_or_equal(&20), Some(handles[0]));
    assert_eq!(tree.find_greater_or_equal(&20), Some(handles[2]));
    assert_eq!(in_order(&tree), [10, 30]);
    assert!(tree.check_invariants().is_ok());

    // The deleted node is detached but keeps its payload.
    assert!(!tree.is_linked(handles[1]));
    assert_eq!(*tree.get(handles[1]), 20);
}

#[test]
fn empty_tree() {
    let tree: RbTree<i64> = RbTree::default();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.root(), None);
    assert_eq!(tree.first(), None);
    assert_eq!(tree.find(&0), None);
    assert_eq!(tree.find_less_or_equal(&0), None);
    assert_eq!(tree.find_greater_or_equal(&0), None);
    assert_eq!(tree.check_invariants(), Ok(0));
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[test]
fn emptied_tree_behaves_like_new() {
    init_logging();
    let values: Vec<i64> = (0..500).map(|i| (i * 7919) % 1000).collect();
    let (mut tree, handles) = tree_of(&values);

    for &handle in handles.iter().step_by(2).chain(handles.iter().skip(1).step_by(2)) {
        tree.delete(handle);
    }

    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
    assert_eq!(tree.check_invariants(), Ok(0));

    let fresh = tree.push(42);
    assert_eq!(tree.root(), Some(fresh));
    assert_eq!(tree.color(fresh), Color::Black);
    assert_eq!(tree.parent(fresh), None);
    assert_eq!(tree.check_invariants(), Ok(1));
}

#[test]
fn detached_nodes_can_be_reinserted() {
    let (mut tree, handles) = tree_of(&[1, 2, 3, 4, 5]);

    tree.delete(handles[0]);
    tree.delete(handles[4]);
    *tree.get_mut(handles[0]) = 6;
    *tree.get_mut(handles[4]) = 0;
    tree.insert(handles[0]);
    tree.insert(handles[4]);

    assert_eq!(in_order(&tree), [0, 2, 3, 4, 6]);
    assert_eq!(tree.first(), Some(handles[4]));
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn remove_releases_and_reuses_handles() {
    let (mut tree, handles) = tree_of(&[1, 2, 3]);

    assert_eq!(tree.remove(handles[1]), 2);
    assert!(!tree.contains(handles[1]));
    assert_eq!(tree.len(), 2);

    let reused = tree.push(7);
    assert_eq!(reused, handles[1]);
    assert_eq!(in_order(&tree), [1, 3, 7]);
}

#[test]
fn checked_operations_report_misuse() {
    let (mut tree, handles) = tree_of(&[1, 2]);

    assert_eq!(tree.try_insert(handles[0]), Err(Error::AlreadyLinked(handles[0])));

    let detached = tree.alloc(3);
    assert_eq!(tree.try_delete(detached), Err(Error::NotLinked(detached)));
    assert_eq!(tree.try_insert(detached), Ok(()));
    assert_eq!(tree.try_delete(detached), Ok(()));

    tree.remove(detached);
    assert_eq!(tree.try_insert(detached), Err(Error::InvalidHandle(detached)));
    assert_eq!(tree.try_delete(detached), Err(Error::InvalidHandle(detached)));
}

#[test]
fn clear_drops_detached_nodes_too() {
    let (mut tree, _) = tree_of(&[1, 2, 3]);
    let detached = tree.alloc(4);

    tree.clear();
    assert!(tree.is_empty());
    assert!(!tree.contains(detached));
    assert_eq!(tree.check_invariants(), Ok(0));
}

// ─── Drain ───────────────────────────────────────────────────────────────────

#[test]
fn drain_releases_linked_nodes_only() {
    init_logging();
    let (mut tree, handles) = tree_of(&[5, 3, 8, 1, 4]);
    tree.delete(handles[2]);

    let drain = tree.drain();
    assert_eq!(drain.len(), 4);
    let mut drained: Vec<i64> = drain.collect();
    drained.sort_unstable();

    assert_eq!(drained, [1, 3, 4, 5]);
    assert!(tree.is_empty());
    assert!(!tree.contains(handles[0]));
    assert!(tree.contains(handles[2]));
    assert_eq!(tree.remove(handles[2]), 8);
}

#[test]
fn dropped_drain_still_empties_the_tree() {
    let (mut tree, _) = tree_of(&(0..100).collect::<Vec<_>>());

    let mut drain = tree.drain();
    assert!(drain.next().is_some());
    drop(drain);

    assert!(tree.is_empty());
    assert_eq!(tree.check_invariants(), Ok(0));
    tree.push(1);
    assert_eq!(in_order(&tree), [1]);
}

#[test]
fn leaked_drain_leaves_a_valid_empty_tree() {
    let values: Vec<i64> = (0..64).collect();
    let (mut tree, handles) = tree_of(&values);

    let mut drain = tree.drain();
    assert_eq!(drain.len(), 64);
    assert!(drain.next().is_some());
    assert!(drain.next().is_some());
    assert_eq!(drain.len(), 62);
    std::mem::forget(drain);

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.root(), None);
    assert_eq!(tree.check_invariants(), Ok(0));

    // The nodes that were never yielded stay allocated and detached.
    let leftovers: Vec<Handle> = handles.iter().copied().filter(|&h| tree.contains(h)).collect();
    assert_eq!(leftovers.len(), 62);
    let leftover = leftovers[0];
    assert!(!tree.is_linked(leftover));
    assert_eq!(tree.try_delete(leftover), Err(Error::NotLinked(leftover)));

    assert_eq!(tree.try_insert(leftover), Ok(()));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root(), Some(leftover));
    assert_eq!(tree.left(leftover), None);
    assert_eq!(tree.check_invariants(), Ok(1));

    tree.clear();
    assert!(leftovers.iter().all(|&h| !tree.contains(h)));
}

// ─── Duplicates ──────────────────────────────────────────────────────────────

#[test]
fn duplicates_keep_insertion_order() {
    let mut tree = RbTree::new(|a: &(i64, char), b: &(i64, char)| a.0.cmp(&b.0));
    for entry in [(2, 'a'), (1, 'b'), (2, 'c'), (2, 'd'), (3, 'e')] {
        tree.push(entry);
    }

    assert_eq!(in_order(&tree), [(1, 'b'), (2, 'a'), (2, 'c'), (2, 'd'), (3, 'e')]);
    assert!(tree.check_invariants().is_ok());

    let found = tree.find(&(2, '?')).unwrap();
    assert_eq!(tree.get(found).0, 2);
}

#[test]
fn insert_unique_rejects_equal_nodes() {
    let (mut tree, handles) = tree_of(&[1, 2, 3]);

    let twin = tree.alloc(2);
    assert_eq!(tree.insert_unique(twin), Err(Error::Duplicate(handles[1])));
    assert!(!tree.is_linked(twin));

    *tree.get_mut(twin) = 4;
    assert_eq!(tree.insert_unique(twin), Ok(()));
    assert_eq!(in_order(&tree), [1, 2, 3, 4]);
}

// ─── Comparators over embedded keys ──────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Timer {
    deadline: u64,
    id: u32,
}

fn by_deadline(a: &Timer, b: &Timer) -> Ordering {
    a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id))
}

#[test]
fn timers_walk_forward_from_a_boundary() {
    let mut timers = RbTree::new(by_deadline);
    for (id, deadline) in [(1, 500), (2, 100), (3, 300), (4, 900), (5, 300)] {
        timers.push(Timer { deadline, id });
    }

    // Everything due at or after t=300.
    let mut node = timers.find_greater_or_equal_by(|timer| 300_u64.cmp(&timer.deadline).then(Ordering::Less));
    let mut due = Vec::new();
    while let Some(handle) = node {
        due.push(timers.get(handle).id);
        node = timers.successor(handle);
    }
    assert_eq!(due, [3, 5, 1, 4]);

    // The latest timer due no later than t=899.
    let last = timers.find_less_or_equal_by(|timer| 899_u64.cmp(&timer.deadline).then(Ordering::Greater));
    assert_eq!(last.map(|h| timers.get(h).id), Some(1));
}

#[test]
fn minimum_of_a_subtree() {
    let (tree, _) = tree_of(&(1..=15).collect::<Vec<_>>());
    let root = tree.root().unwrap();

    assert_eq!(tree.minimum(root), tree.first().unwrap());
    let right = tree.right(root).unwrap();
    assert_eq!(*tree.get(tree.minimum(right)), *tree.get(root) + 1);
}

#[test]
fn reversed_comparator() {
    let mut tree = RbTree::new(|a: &i64, b: &i64| b.cmp(a));
    for value in [1, 5, 3] {
        tree.push(value);
    }
    assert_eq!(in_order(&tree), [5, 3, 1]);
    assert_eq!(value_of(&tree, tree.find_less_or_equal(&4)), Some(5));
    assert_eq!(value_of(&tree, tree.find_greater_or_equal(&4)), Some(3));
}

#[test]
fn with_capacity_and_natural_order() {
    let mut tree: RbTree<u8> = RbTree::with_capacity(8, NaturalOrder);
    assert!(tree.capacity() >= 8);
    for value in (0..8).rev() {
        tree.push(value);
    }
    assert_eq!(in_order(&tree), (0..8).collect::<Vec<_>>());
    assert_eq!(format!("{tree:?}"), "[0, 1, 2, 3, 4, 5, 6, 7]");
}

// ─── Randomized differential testing ─────────────────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64),
    Delete(usize),
    Find(i64),
    LessOrEqual(i64),
    GreaterOrEqual(i64),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => value_strategy().prop_map(TreeOp::Insert),
        3 => any::<usize>().prop_map(TreeOp::Delete),
        2 => value_strategy().prop_map(TreeOp::Find),
        2 => value_strategy().prop_map(TreeOp::LessOrEqual),
        2 => value_strategy().prop_map(TreeOp::GreaterOrEqual),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays random operations against a sorted reference sequence, allowing duplicates.
    #[test]
    fn operations_match_sorted_reference(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        let mut tree: RbTree<i64> = RbTree::default();
        let mut linked: Vec<Handle> = Vec::new();
        let mut model: Vec<i64> = Vec::new();

        for (step, op) in ops.iter().enumerate() {
            match *op {
                TreeOp::Insert(v) => {
                    linked.push(tree.push(v));
                    let at = model.partition_point(|x| *x <= v);
                    model.insert(at, v);
                }
                TreeOp::Delete(which) => {
                    if linked.is_empty() {
                        continue;
                    }
                    let handle = linked.swap_remove(which % linked.len());
                    let v = tree.remove(handle);
                    let at = model.binary_search(&v).expect("removed value is in the model");
                    model.remove(at);
                }
                TreeOp::Find(v) => {
                    let found = value_of(&tree, tree.find(&v));
                    let expected = model.binary_search(&v).ok().map(|_| v);
                    prop_assert_eq!(found, expected, "find({})", v);
                }
                TreeOp::LessOrEqual(v) => {
                    let found = value_of(&tree, tree.find_less_or_equal(&v));
                    let expected = model[..model.partition_point(|x| *x <= v)].last().copied();
                    prop_assert_eq!(found, expected, "find_less_or_equal({})", v);
                }
                TreeOp::GreaterOrEqual(v) => {
                    let found = value_of(&tree, tree.find_greater_or_equal(&v));
                    let expected = model.get(model.partition_point(|x| *x < v)).copied();
                    prop_assert_eq!(found, expected, "find_greater_or_equal({})", v);
                }
            }

            prop_assert_eq!(tree.len(), model.len(), "len mismatch after {:?}", op);
            if step % 250 == 0 {
                prop_assert!(tree.check_invariants().is_ok(), "invariants broken after {:?}", op);
                prop_assert_eq!(in_order(&tree), model.clone());
            }
        }

        prop_assert!(tree.check_invariants().is_ok());
        prop_assert_eq!(in_order(&tree), model);
    }

    /// Every linked node is found by its own payload.
    #[test]
    fn find_returns_the_inserted_node(values in proptest::collection::vec(value_strategy(), 1..500)) {
        let mut tree: RbTree<i64> = RbTree::default();
        let mut linked: Vec<(i64, Handle)> = Vec::new();

        for v in values {
            let handle = tree.alloc(v);
            if tree.insert_unique(handle).is_ok() {
                linked.push((v, handle));
            } else {
                tree.remove(handle);
            }
        }

        for &(v, handle) in &linked {
            prop_assert_eq!(tree.find(&v), Some(handle));
        }
        prop_assert!(tree.check_invariants().is_ok());
    }

    /// Invariants hold after every single insert and delete.
    #[test]
    fn invariants_hold_at_every_step(
        values in proptest::collection::vec(value_strategy(), 0..200),
        order in proptest::collection::vec(any::<usize>(), 200),
    ) {
        let (mut tree, mut handles) = tree_of(&values);
        prop_assert!(tree.check_invariants().is_ok());

        for which in order {
            if handles.is_empty() {
                break;
            }
            let handle = handles.swap_remove(which % handles.len());
            tree.delete(handle);
            prop_assert!(tree.check_invariants().is_ok());
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.check_invariants(), Ok(0));
    }
}
