use crate::avl_tree::node::Node;
use crate::avl_tree::{TraversalOrder, Violation};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;
use std::result;

pub type Tree<T> = Option<Box<Node<T>>>;

pub fn height<T>(tree: &Tree<T>) -> usize {
    match tree {
        None => 0,
        Some(ref node) => (**node).height,
    }
}

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = match node.right.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.right = child.left.take();
    node.update();
    child.left = Some(node);
    child.update();
    child
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = match node.left.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.left = child.right.take();
    node.update();
    child.right = Some(node);
    child.update();
    child
}

// `descent` is the side of the heavy child that the new value went down. A rotation here restores
// the subtree's height from before the insertion, so no ancestor rotates afterwards.
fn rebalance_inserted<T>(tree: &mut Tree<T>, descent: Ordering) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update();

    if node.balance() > 1 {
        if descent == Ordering::Greater {
            trace!("insert rebalance: left-right case at height {}", node.height);
            let child = node.left.take().expect("Expected left child of left-heavy node.");
            node.left = Some(rotate_left(child));
        } else {
            trace!("insert rebalance: left-left case at height {}", node.height);
        }
        node = rotate_right(node);
    } else if node.balance() < -1 {
        if descent == Ordering::Less {
            trace!("insert rebalance: right-left case at height {}", node.height);
            let child = node.right.take().expect("Expected right child of right-heavy node.");
            node.right = Some(rotate_right(child));
        } else {
            trace!("insert rebalance: right-right case at height {}", node.height);
        }
        node = rotate_left(node);
    }

    *tree = Some(node);
}

// The removed value is gone by the time this runs, so the heavy child's own balance picks the case.
fn rebalance_removed<T>(tree: &mut Tree<T>) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update();

    if node.balance() > 1 {
        if let Some(child) = node.left.take() {
            if child.balance() < 0 {
                trace!("remove rebalance: left-right case at height {}", node.height);
                node.left = Some(rotate_left(child));
            } else {
                trace!("remove rebalance: left-left case at height {}", node.height);
                node.left = Some(child);
            }
        }
        node = rotate_right(node);
    } else if node.balance() < -1 {
        if let Some(child) = node.right.take() {
            if child.balance() > 0 {
                trace!("remove rebalance: right-left case at height {}", node.height);
                node.right = Some(rotate_right(child));
            } else {
                trace!("remove rebalance: right-right case at height {}", node.height);
                node.right = Some(child);
            }
        }
        node = rotate_left(node);
    }

    *tree = Some(node);
}

// precondition: there exists a minimum node in the tree
fn remove_min<T>(tree: &mut Tree<T>) -> Box<Node<T>> {
    if let Some(ref mut node) = tree {
        if node.left.is_some() {
            let min = remove_min(&mut node.left);
            rebalance_removed(tree);
            return min;
        }
    }

    let mut node = tree.take().expect("Expected a non-empty tree.");
    *tree = node.right.take();
    node
}

/// Inserts `value` into the tree. Returns `None` if an equal value is already present, in which
/// case the tree is left untouched. Otherwise returns the side of the subtree's root the value
/// descended to, or `Ordering::Equal` if the value became the root of the subtree.
pub fn insert<T>(tree: &mut Tree<T>, value: T) -> Option<Ordering>
where
    T: Ord,
{
    let (descent, child_descent) = match tree {
        Some(ref mut node) => {
            let descent = value.cmp(&node.value);
            let child_descent = match descent {
                Ordering::Less => insert(&mut node.left, value),
                Ordering::Greater => insert(&mut node.right, value),
                Ordering::Equal => return None,
            };
            (descent, child_descent?)
        },
        None => {
            *tree = Some(Box::new(Node::new(value)));
            return Some(Ordering::Equal);
        },
    };

    rebalance_inserted(tree, child_descent);
    Some(descent)
}

pub fn remove<T, V>(tree: &mut Tree<T>, key: &V) -> Option<T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let ret = match tree.take() {
        Some(mut node) => match key.cmp(node.value.borrow()) {
            Ordering::Less => {
                let ret = remove(&mut node.left, key);
                *tree = Some(node);
                ret
            },
            Ordering::Greater => {
                let ret = remove(&mut node.right, key);
                *tree = Some(node);
                ret
            },
            Ordering::Equal => {
                if node.left.is_some() && node.right.is_some() {
                    debug!("splicing in-order successor into node of height {}", node.height);
                    let successor = *remove_min(&mut node.right);
                    let Node { value: successor_value, .. } = successor;
                    let ret = mem::replace(&mut node.value, successor_value);
                    *tree = Some(node);
                    Some(ret)
                } else {
                    let Node { value, left, right, .. } = *node;
                    *tree = left.or(right);
                    Some(value)
                }
            },
        },
        None => return None,
    };

    rebalance_removed(tree);
    ret
}

pub fn get<'a, T, V>(tree: &'a Tree<T>, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    tree.as_ref().and_then(|node| {
        match key.cmp(node.value.borrow()) {
            Ordering::Less => get(&node.left, key),
            Ordering::Greater => get(&node.right, key),
            Ordering::Equal => Some(&node.value),
        }
    })
}

pub fn ceil<'a, T, V>(tree: &'a Tree<T>, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    tree.as_ref().and_then(|node| {
        match key.cmp(node.value.borrow()) {
            Ordering::Greater => ceil(&node.right, key),
            Ordering::Less => {
                match ceil(&node.left, key) {
                    None => Some(&node.value),
                    res => res,
                }
            },
            Ordering::Equal => Some(&node.value),
        }
    })
}

pub fn floor<'a, T, V>(tree: &'a Tree<T>, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    tree.as_ref().and_then(|node| {
        match key.cmp(node.value.borrow()) {
            Ordering::Less => floor(&node.left, key),
            Ordering::Greater => {
                match floor(&node.right, key) {
                    None => Some(&node.value),
                    res => res,
                }
            },
            Ordering::Equal => Some(&node.value),
        }
    })
}

pub fn min<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref left_node) = curr.left {
            curr = left_node;
        }
        &curr.value
    })
}

pub fn max<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref right_node) = curr.right {
            curr = right_node;
        }
        &curr.value
    })
}

pub fn traverse<'a, T, F>(tree: &'a Tree<T>, order: TraversalOrder, sink: &mut F)
where
    F: FnMut(&'a T),
{
    if let Some(ref node) = tree {
        if order == TraversalOrder::PreOrder {
            sink(&node.value);
        }
        traverse(&node.left, order, sink);
        if order == TraversalOrder::InOrder {
            sink(&node.value);
        }
        traverse(&node.right, order, sink);
        if order == TraversalOrder::PostOrder {
            sink(&node.value);
        }
    }
}

/// Checks ordering, balance and height bookkeeping of every node. Returns the height of the tree.
pub fn validate<T>(tree: &Tree<T>) -> result::Result<usize, Violation>
where
    T: Ord,
{
    validate_bounded(tree, None, None)
}

fn validate_bounded<T>(
    tree: &Tree<T>,
    lower: Option<&T>,
    upper: Option<&T>,
) -> result::Result<usize, Violation>
where
    T: Ord,
{
    let node = match tree {
        Some(ref node) => node,
        None => return Ok(0),
    };

    if lower.map_or(false, |lower| node.value <= *lower)
        || upper.map_or(false, |upper| node.value >= *upper)
    {
        return Err(Violation::Unordered);
    }

    let left_height = validate_bounded(&node.left, lower, Some(&node.value))?;
    let right_height = validate_bounded(&node.right, Some(&node.value), upper)?;

    let expected = left_height.max(right_height) + 1;
    if node.height != expected {
        return Err(Violation::HeightMismatch { expected, actual: node.height });
    }

    let balance = left_height as i32 - right_height as i32;
    if balance.abs() > 1 {
        return Err(Violation::Unbalanced { balance });
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(values: &[u32]) -> Tree<u32> {
        let mut tree = None;
        for value in values {
            insert(&mut tree, *value);
        }
        tree
    }

    fn root(tree: &Tree<u32>) -> Option<u32> {
        tree.as_ref().map(|node| node.value)
    }

    fn collect(tree: &Tree<u32>, order: TraversalOrder) -> Vec<u32> {
        let mut values = Vec::new();
        traverse(tree, order, &mut |value| values.push(*value));
        values
    }

    #[test]
    fn test_rotate_left() {
        let mut node = Box::new(Node::new(1));
        let mut child = Node::new(2);
        child.right = Some(Box::new(Node::new(3)));
        child.update();
        node.right = Some(Box::new(child));
        node.update();

        let node = rotate_left(node);
        assert_eq!(node.value, 2);
        assert_eq!(node.height, 2);
        assert_eq!(node.left.as_ref().map(|node| node.height), Some(1));
        assert_eq!(node.right.as_ref().map(|node| node.value), Some(3));
    }

    #[test]
    fn test_rotate_right() {
        let mut node = Box::new(Node::new(3));
        let mut child = Node::new(2);
        child.left = Some(Box::new(Node::new(1)));
        child.update();
        node.left = Some(Box::new(child));
        node.update();

        let node = rotate_right(node);
        assert_eq!(node.value, 2);
        assert_eq!(node.height, 2);
        assert_eq!(node.right.as_ref().map(|node| node.height), Some(1));
        assert_eq!(node.left.as_ref().map(|node| node.value), Some(1));
    }

    #[test]
    fn test_insert_left_left() {
        let tree = build(&[3, 2, 1]);
        assert_eq!(root(&tree), Some(2));
        assert_eq!(validate(&tree), Ok(2));
    }

    #[test]
    fn test_insert_left_right() {
        let tree = build(&[3, 1, 2]);
        assert_eq!(root(&tree), Some(2));
        assert_eq!(validate(&tree), Ok(2));
    }

    #[test]
    fn test_insert_right_right() {
        let tree = build(&[1, 2, 3]);
        assert_eq!(root(&tree), Some(2));
        assert_eq!(validate(&tree), Ok(2));
    }

    #[test]
    fn test_insert_right_left() {
        let tree = build(&[10, 40, 20]);
        assert_eq!(root(&tree), Some(20));
        assert_eq!(collect(&tree, TraversalOrder::PreOrder), vec![20, 10, 40]);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut tree = build(&[2, 1, 3]);
        assert_eq!(insert(&mut tree, 1), None);
        assert_eq!(collect(&tree, TraversalOrder::InOrder), vec![1, 2, 3]);
        assert_eq!(insert(&mut tree, 4), Some(Ordering::Greater));
    }

    #[test]
    fn test_remove_leaf_and_single_child() {
        let mut tree = build(&[2, 1, 3, 4]);
        assert_eq!(remove(&mut tree, &1), Some(1));
        assert_eq!(root(&tree), Some(3));
        assert_eq!(remove(&mut tree, &3), Some(3));
        assert_eq!(collect(&tree, TraversalOrder::InOrder), vec![2, 4]);
        assert!(validate(&tree).is_ok());
    }

    #[test]
    fn test_remove_with_balanced_heavy_child() {
        // the left child of 20 is balanced after removing 30, which calls for a single rotation
        let mut tree = build(&[20, 10, 30, 5, 15]);
        assert_eq!(remove(&mut tree, &30), Some(30));
        assert_eq!(root(&tree), Some(10));
        assert_eq!(collect(&tree, TraversalOrder::PreOrder), vec![10, 5, 20, 15]);
        assert_eq!(validate(&tree), Ok(3));
    }

    #[test]
    fn test_remove_left_right() {
        let mut tree = build(&[20, 10, 30, 15]);
        assert_eq!(remove(&mut tree, &30), Some(30));
        assert_eq!(root(&tree), Some(15));
        assert_eq!(validate(&tree), Ok(2));
    }

    #[test]
    fn test_remove_two_children_splices_successor() {
        let mut tree = build(&[10, 40, 20, 30, 50]);
        assert_eq!(remove(&mut tree, &20), Some(20));
        assert_eq!(root(&tree), Some(30));
        assert_eq!(collect(&tree, TraversalOrder::PreOrder), vec![30, 10, 40, 50]);
        assert_eq!(validate(&tree), Ok(3));
    }

    #[test]
    fn test_remove_min_rebalances_path() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7, 8]);
        // removing 4 pulls 5 out of the right subtree, leaving 6 right-heavy
        assert_eq!(remove(&mut tree, &4), Some(4));
        assert_eq!(root(&tree), Some(5));
        assert_eq!(collect(&tree, TraversalOrder::InOrder), vec![1, 2, 3, 5, 6, 7, 8]);
        assert!(validate(&tree).is_ok());
    }

    #[test]
    fn test_remove_missing() {
        let mut tree = build(&[2, 1, 3]);
        assert_eq!(remove(&mut tree, &4), None);
        assert_eq!(collect(&tree, TraversalOrder::PreOrder), vec![2, 1, 3]);
    }

    #[test]
    fn test_traversal_orders() {
        let tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(collect(&tree, TraversalOrder::InOrder), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(collect(&tree, TraversalOrder::PreOrder), vec![4, 2, 1, 3, 6, 5, 7]);
        assert_eq!(collect(&tree, TraversalOrder::PostOrder), vec![1, 3, 2, 5, 7, 6, 4]);
    }

    #[test]
    fn test_validate_unordered() {
        let mut node = Box::new(Node::new(2));
        node.left = Some(Box::new(Node::new(3)));
        node.update();
        assert_eq!(validate(&Some(node)), Err(Violation::Unordered));
    }

    #[test]
    fn test_validate_height_mismatch() {
        let mut node = Box::new(Node::new(2));
        node.left = Some(Box::new(Node::new(1)));
        assert_eq!(
            validate(&Some(node)),
            Err(Violation::HeightMismatch { expected: 2, actual: 1 }),
        );
    }

    #[test]
    fn test_validate_unbalanced() {
        let mut child = Node::new(2);
        child.right = Some(Box::new(Node::new(3)));
        child.update();
        let mut node = Box::new(Node::new(1));
        node.right = Some(Box::new(child));
        node.update();
        assert_eq!(validate(&Some(node)), Err(Violation::Unbalanced { balance: -2 }));
    }
}
