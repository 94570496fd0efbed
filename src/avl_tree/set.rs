use crate::avl_tree::node::Node;
use crate::avl_tree::tree;
use crate::avl_tree::{Result, TraversalOrder};
use std::borrow::Borrow;
use std::fmt;
use std::io::Write;
use std::iter::FromIterator;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Every insertion and removal
/// restores that invariant with at most one single or double rotation per ancestor, so the height
/// of a tree with `n` values never exceeds roughly `1.44 * log2(n + 2)`.
///
/// # Examples
///
/// ```
/// use avl_collections::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
pub struct AvlSet<T> {
    tree: tree::Tree<T>,
    len: usize,
}

impl<T> AvlSet<T> {
    /// Constructs a new, empty `AvlSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        AvlSet { tree: None, len: 0 }
    }

    /// Inserts a value into the set. Returns `false` and leaves the set untouched if an equal
    /// value is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        let inserted = tree::insert(&mut self.tree, value).is_some();
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes a value from the set. If the value exists in the set, it will return the removed
    /// value. Otherwise it will return `None` and leave the set untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let AvlSet {
            ref mut tree,
            ref mut len,
        } = self;
        tree::remove(tree, key).map(|value| {
            *len -= 1;
            value
        })
    }

    /// Checks if a value exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the value in the set that is equal to a particular key. Returns
    /// `None` if such a value does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(String::from("avl"));
    /// assert_eq!(set.get("avl"), Some(&String::from("avl")));
    /// assert_eq!(set.get("bst"), None);
    /// ```
    pub fn get<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get(&self.tree, key)
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree = None;
        self.len = 0;
    }

    /// Returns the height of the underlying tree. An empty set has height zero and a single value
    /// has height one.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = (1..8).collect();
    /// assert_eq!(set.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        tree::height(&self.tree)
    }

    /// Returns the value stored at the root of the underlying tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![1, 2, 3].into_iter().collect();
    /// assert_eq!(set.root(), Some(&2));
    /// ```
    pub fn root(&self) -> Option<&T> {
        self.tree.as_ref().map(|node| &node.value)
    }

    /// Returns a value in the set that is less than or equal to a particular key. Returns `None`
    /// if such a value does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::floor(&self.tree, key)
    }

    /// Returns a value in the set that is greater than or equal to a particular key. Returns
    /// `None` if such a value does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::ceil(&self.tree, key)
    }

    /// Returns the minimum value of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        tree::min(&self.tree)
    }

    /// Returns the maximum value of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        tree::max(&self.tree)
    }

    /// Feeds every value of the set to `sink` in the given traversal order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::{AvlSet, TraversalOrder};
    ///
    /// let set: AvlSet<u32> = vec![2, 1, 3].into_iter().collect();
    ///
    /// let mut values = Vec::new();
    /// set.traverse(TraversalOrder::PostOrder, |value| values.push(*value));
    /// assert_eq!(values, vec![1, 3, 2]);
    /// ```
    pub fn traverse<'a, F>(&'a self, order: TraversalOrder, mut sink: F)
    where
        F: FnMut(&'a T),
    {
        tree::traverse(&self.tree, order, &mut sink);
    }

    /// Writes every value of the set to `out` in the given traversal order, each followed by a
    /// single space. Errors from `out` are propagated and stop the traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::{AvlSet, TraversalOrder};
    ///
    /// let set: AvlSet<u32> = vec![2, 1, 3].into_iter().collect();
    ///
    /// let mut out = Vec::new();
    /// set.write_traversal(TraversalOrder::PreOrder, &mut out).unwrap();
    /// assert_eq!(out, b"2 1 3 ");
    /// ```
    pub fn write_traversal<W>(&self, order: TraversalOrder, out: &mut W) -> Result<()>
    where
        T: fmt::Display,
        W: Write,
    {
        match order {
            TraversalOrder::InOrder => {
                for value in self.iter() {
                    write!(out, "{} ", value)?;
                }
            },
            TraversalOrder::PreOrder => {
                for value in self.pre_order_iter() {
                    write!(out, "{} ", value)?;
                }
            },
            TraversalOrder::PostOrder => {
                for value in self.post_order_iter() {
                    write!(out, "{} ", value)?;
                }
            },
        }
        Ok(())
    }

    /// Checks that the underlying tree is ordered, balanced and has consistent heights. A set
    /// built only through its public methods always passes.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = (0..100).collect();
    /// assert!(set.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()>
    where
        T: Ord,
    {
        tree::validate(&self.tree)?;
        Ok(())
    }

    /// Returns an iterator over the set. The iterator will yield values using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter<T> {
        AvlSetIter {
            current: &self.tree,
            stack: Vec::new(),
        }
    }

    /// Returns an iterator over the set that yields each value before the values of its
    /// subtrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![2, 1, 3].into_iter().collect();
    /// assert_eq!(set.pre_order_iter().collect::<Vec<&u32>>(), vec![&2, &1, &3]);
    /// ```
    pub fn pre_order_iter(&self) -> AvlSetPreOrderIter<T> {
        AvlSetPreOrderIter {
            stack: self.tree.iter().map(|node| &**node).collect(),
        }
    }

    /// Returns an iterator over the set that yields each value after the values of its subtrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![2, 1, 3].into_iter().collect();
    /// assert_eq!(set.post_order_iter().collect::<Vec<&u32>>(), vec![&1, &3, &2]);
    /// ```
    pub fn post_order_iter(&self) -> AvlSetPostOrderIter<T> {
        AvlSetPostOrderIter {
            stack: self.tree.iter().map(|node| (&**node, false)).collect(),
        }
    }
}

impl<T> IntoIterator for AvlSet<T> {
    type Item = T;
    type IntoIter = AvlSetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            current: self.tree,
            stack: Vec::new(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = AvlSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned values.
pub struct AvlSetIntoIter<T> {
    current: tree::Tree<T>,
    stack: Vec<Node<T>>,
}

impl<T> Iterator for AvlSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut node) = self.current.take() {
            self.current = node.left.take();
            self.stack.push(*node);
        }
        self.stack.pop().map(|node| {
            let Node { value, right, .. } = node;
            self.current = right;
            value
        })
    }
}

/// An iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct AvlSetIter<'a, T>
where
    T: 'a,
{
    current: &'a tree::Tree<T>,
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ref node) = self.current {
            self.current = &node.left;
            self.stack.push(node);
        }
        self.stack.pop().map(|node| {
            self.current = &node.right;
            &node.value
        })
    }
}

/// A pre-order iterator for `AvlSet<T>`.
///
/// This iterator yields a node's value, then the values of its left and right subtrees.
pub struct AvlSetPreOrderIter<'a, T>
where
    T: 'a,
{
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for AvlSetPreOrderIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|node| {
            if let Some(ref right) = node.right {
                self.stack.push(&**right);
            }
            if let Some(ref left) = node.left {
                self.stack.push(&**left);
            }
            &node.value
        })
    }
}

/// A post-order iterator for `AvlSet<T>`.
///
/// This iterator yields the values of a node's left and right subtrees, then the node's value.
pub struct AvlSetPostOrderIter<'a, T>
where
    T: 'a,
{
    // the flag marks nodes whose subtrees have already been pushed
    stack: Vec<(&'a Node<T>, bool)>,
}

impl<'a, T> Iterator for AvlSetPostOrderIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(&node.value);
            }
            self.stack.push((node, true));
            if let Some(ref right) = node.right {
                self.stack.push((&**right, false));
            }
            if let Some(ref left) = node.left {
                self.stack.push((&**left, false));
            }
        }
        None
    }
}

impl<T> Clone for AvlSet<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        AvlSet {
            tree: self.tree.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for AvlSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AvlSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for AvlSet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &AvlSet<T>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> Eq for AvlSet<T> where T: Eq {}

impl<T> FromIterator<T> for AvlSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = AvlSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for AvlSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}
